use crate::template::{
    LogicalResource, Output, Parameter, ParameterHandle, Reference, ResourceHandle, Section,
    TemplateError,
};
use eyre::WrapErr;
use serde::Serialize;
use std::collections::HashSet;

/// CloudFormation template under construction
///
/// Entries are registered in any order and cross-referenced by logical name.
/// References are only checked when the template is serialized, which allows
/// a resource to point at another one registered later.
#[derive(Clone, Debug, Default)]
pub struct Template {
    version: Option<String>,
    description: Option<String>,
    parameters: Vec<Parameter>,
    resources: Vec<LogicalResource>,
    outputs: Vec<Output>,

    /// Dependencies declared apart from the resources, (resource, depends on)
    dependencies: Vec<(String, String)>,

    /// Names of parameters and resources, they share the `Ref` namespace
    names: HashSet<String>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    fn register(&mut self, section: Section, name: &str) -> Result<(), TemplateError> {
        if !self.names.insert(name.to_string()) {
            log::error!("Duplicate logical name {name} in {section}");

            return Err(TemplateError::DuplicateName {
                section,
                name: name.to_string(),
            });
        }

        log::debug!("Registered {name} in {section}");
        Ok(())
    }

    pub fn add_parameter(&mut self, parameter: Parameter) -> Result<ParameterHandle, TemplateError> {
        self.register(Section::Parameters, parameter.name())?;

        let handle = ParameterHandle {
            name: parameter.name().to_string(),
        };

        self.parameters.push(parameter);
        Ok(handle)
    }

    pub fn add_resource(
        &mut self,
        resource: impl Into<LogicalResource>,
    ) -> Result<ResourceHandle, TemplateError> {
        let resource = resource.into();
        self.register(Section::Resources, resource.name())?;

        let handle = ResourceHandle {
            name: resource.name().to_string(),
        };

        self.resources.push(resource);
        Ok(handle)
    }

    /// Outputs have a namespace of their own
    pub fn add_output(&mut self, output: Output) -> Result<(), TemplateError> {
        if self.outputs.iter().any(|o| o.name() == output.name()) {
            log::error!("Duplicate output {}", output.name());

            return Err(TemplateError::DuplicateName {
                section: Section::Outputs,
                name: output.name().to_string(),
            });
        }

        log::debug!("Registered {} in {}", output.name(), Section::Outputs);
        self.outputs.push(output);
        Ok(())
    }

    /// Make `resource` wait for `depends_on` at provisioning time
    ///
    /// Only annotates the serialized resource. Both names are checked at serialization.
    pub fn declare_dependency(&mut self, resource: &str, depends_on: &str) -> Result<(), TemplateError> {
        let dependency = (resource.to_string(), depends_on.to_string());

        if !self.dependencies.contains(&dependency) {
            self.dependencies.push(dependency);
        }

        Ok(())
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn resources(&self) -> &[LogicalResource] {
        &self.resources
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    fn is_resource(&self, name: &str) -> bool {
        self.resources.iter().any(|r| r.name() == name)
    }

    /// Parameters have no attributes, so only resources can be a target of Fn::GetAtt
    fn resolves(&self, reference: &Reference) -> bool {
        if reference.is_pseudo() {
            return true;
        }

        match reference.attribute_name() {
            Some(_) => self.is_resource(reference.target()),
            None => self.names.contains(reference.target()),
        }
    }

    /// Check the graph is closed, entries are walked in insertion order
    pub fn validate(&self) -> Result<(), TemplateError> {
        let dangling = |resource: &str, target: &str| {
            log::error!("Dangling reference from {resource} to {target}");

            TemplateError::DanglingReference {
                resource: resource.to_string(),
                target: target.to_string(),
            }
        };

        for resource in self.resources.iter() {
            if let Some(reference) = resource.references().into_iter().find(|r| !self.resolves(r)) {
                return Err(dangling(resource.name(), reference.target()));
            }

            if let Some(target) = resource.dependencies().iter().find(|d| !self.is_resource(d)) {
                return Err(dangling(resource.name(), target));
            }
        }

        for (resource, depends_on) in self.dependencies.iter() {
            if !self.is_resource(resource) {
                return Err(dangling("DependsOn", resource));
            }

            if !self.is_resource(depends_on) {
                return Err(dangling(resource, depends_on));
            }
        }

        for output in self.outputs.iter() {
            let reference = output
                .values()
                .flat_map(|v| v.references())
                .find(|r| !self.resolves(r));

            if let Some(reference) = reference {
                return Err(dangling(
                    &format!("{}.{}", Section::Outputs, output.name()),
                    reference.target(),
                ));
            }
        }

        Ok(())
    }

    /// Validate the graph and emit the CloudFormation document
    ///
    /// The output is deterministic: sections, entries, and properties keep the insertion order.
    pub fn serialize(&self) -> Result<serde_json::Value, TemplateError> {
        self.validate()?;

        let mut document = serde_json::Map::new();

        if let Some(version) = &self.version {
            document.insert("AWSTemplateFormatVersion".into(), version.as_str().into());
        }

        if let Some(description) = &self.description {
            document.insert("Description".into(), description.as_str().into());
        }

        if !self.parameters.is_empty() {
            let mut parameters = serde_json::Map::new();

            for parameter in self.parameters.iter() {
                parameters.insert(parameter.name().into(), parameter.to_json());
            }

            document.insert(Section::Parameters.to_string(), parameters.into());
        }

        let mut resources = serde_json::Map::new();

        for resource in self.resources.iter() {
            let name = resource.name();
            let mut resource = resource.clone();

            for (_, depends_on) in self.dependencies.iter().filter(|(n, _)| n == name) {
                resource.add_dependency(depends_on);
            }

            resources.insert(name.into(), resource.to_json());
        }

        document.insert(Section::Resources.to_string(), resources.into());

        if !self.outputs.is_empty() {
            let mut outputs = serde_json::Map::new();

            for output in self.outputs.iter() {
                outputs.insert(output.name().into(), output.to_json());
            }

            document.insert(Section::Outputs.to_string(), outputs.into());
        }

        log::info!(
            "Serialized template with {} parameters, {} resources, {} outputs",
            self.parameters.len(),
            self.resources.len(),
            self.outputs.len()
        );

        Ok(document.into())
    }

    /// Pretty printed JSON document, indented with four spaces
    pub fn to_json(&self) -> eyre::Result<String> {
        let document = self.serialize()?;
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);

        document
            .serialize(&mut serializer)
            .wrap_err("Failed to serialize the template")?;

        String::from_utf8(buffer).wrap_err("Serialized template is not valid UTF-8")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{ParameterType, Value};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn queue(name: &str) -> LogicalResource {
        LogicalResource::new(name, "AWS::SQS::Queue")
    }

    #[test]
    fn duplicate_resource_is_rejected_on_second_add() {
        let mut template = Template::new();
        template.add_resource(queue("A")).unwrap();

        assert_eq!(
            template.add_resource(queue("A")),
            Err(TemplateError::DuplicateName {
                section: Section::Resources,
                name: "A".into()
            })
        );

        assert_eq!(template.resources().len(), 1);
    }

    #[test]
    fn parameter_and_resource_share_namespace() {
        let mut template = Template::new();
        template
            .add_parameter(Parameter::new("A", ParameterType::String))
            .unwrap();

        assert!(matches!(
            template.add_resource(queue("A")),
            Err(TemplateError::DuplicateName { .. })
        ));
    }

    #[test]
    fn outputs_have_own_namespace() {
        let mut template = Template::new();
        let key = template
            .add_resource(LogicalResource::new("ApiKey", "AWS::ApiGateway::ApiKey"))
            .unwrap();

        template
            .add_output(Output::new("ApiKey", key.reference()))
            .unwrap();

        assert_eq!(
            template.add_output(Output::new("ApiKey", key.reference())),
            Err(TemplateError::DuplicateName {
                section: Section::Outputs,
                name: "ApiKey".into()
            })
        );
    }

    #[test]
    fn forward_reference_resolves() {
        let mut template = Template::new();

        template
            .add_resource(queue("B").property("Target", Value::attribute("A", "Arn")))
            .unwrap();

        template.add_resource(queue("A")).unwrap();

        let document = template.serialize().unwrap();

        assert_eq!(
            document["Resources"]["B"]["Properties"]["Target"],
            json!({ "Fn::GetAtt": ["A", "Arn"] })
        );
    }

    #[test]
    fn dangling_reference_names_resource_and_target() {
        let mut template = Template::new();

        template
            .add_resource(queue("B").property("Target", Value::reference("Missing")))
            .unwrap();

        assert_eq!(
            template.serialize(),
            Err(TemplateError::DanglingReference {
                resource: "B".into(),
                target: "Missing".into()
            })
        );
    }

    #[test]
    fn attribute_of_parameter_is_dangling() {
        let mut template = Template::new();
        template
            .add_parameter(Parameter::new("P", ParameterType::Number))
            .unwrap();

        template
            .add_resource(queue("A").property("Size", Value::attribute("P", "Arn")))
            .unwrap();

        assert!(matches!(
            template.serialize(),
            Err(TemplateError::DanglingReference { .. })
        ));
    }

    #[test]
    fn pseudo_parameters_resolve() {
        let mut template = Template::new();

        template
            .add_resource(queue("A").property("Region", Value::reference("AWS::Region")))
            .unwrap();

        assert!(template.serialize().is_ok());
    }

    #[test]
    fn dangling_output_is_prefixed_with_section() {
        let mut template = Template::new();

        template
            .add_output(Output::new("Url", Value::join("", [Value::reference("Api")])))
            .unwrap();

        assert_eq!(
            template.serialize(),
            Err(TemplateError::DanglingReference {
                resource: "Outputs.Url".into(),
                target: "Api".into()
            })
        );
    }

    #[test]
    fn declared_dependency_annotates_resource() {
        let mut template = Template::new();
        template.declare_dependency("B", "A").unwrap();
        template.declare_dependency("B", "A").unwrap();
        template.add_resource(queue("A")).unwrap();
        template.add_resource(queue("B")).unwrap();

        let document = template.serialize().unwrap();

        assert_eq!(document["Resources"]["B"]["DependsOn"], json!("A"));
        assert_eq!(document["Resources"]["A"].get("DependsOn"), None);
    }

    #[test]
    fn dependency_on_unknown_resource_is_dangling() {
        let mut template = Template::new();
        template.add_resource(queue("B")).unwrap();
        template.declare_dependency("B", "A").unwrap();

        assert_eq!(
            template.serialize(),
            Err(TemplateError::DanglingReference {
                resource: "B".into(),
                target: "A".into()
            })
        );

        let mut template = Template::new();
        template.add_resource(queue("A")).unwrap();
        template.declare_dependency("B", "A").unwrap();

        assert_eq!(
            template.serialize(),
            Err(TemplateError::DanglingReference {
                resource: "DependsOn".into(),
                target: "B".into()
            })
        );
    }

    #[test]
    fn sections_are_ordered_and_empty_ones_skipped() {
        let mut template = Template::new()
            .with_version("2010-09-09")
            .with_description("Queue");

        template.add_resource(queue("A")).unwrap();

        let document = template.serialize().unwrap();
        let keys: Vec<&String> = document.as_object().unwrap().keys().collect();

        assert_eq!(keys, ["AWSTemplateFormatVersion", "Description", "Resources"]);
    }

    #[test]
    fn json_is_indented_with_four_spaces() {
        let mut template = Template::new();
        template.add_resource(queue("A")).unwrap();

        assert_eq!(
            template.to_json().unwrap(),
            "{\n    \"Resources\": {\n        \"A\": {\n            \"Type\": \"AWS::SQS::Queue\"\n        }\n    }\n}"
        );
    }
}
