use crate::template::Value;
use std::fmt::Display;

/// CloudFormation parameter types supported by the builder
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParameterType {
    Number,
    String,
    CommaDelimitedList,
}

impl Display for ParameterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            ParameterType::Number => "Number",
            ParameterType::String => "String",
            ParameterType::CommaDelimitedList => "CommaDelimitedList",
        };

        write!(f, "{}", str)
    }
}

/// A named input of the template, substituted into properties with `Ref`
#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    name: String,
    kind: ParameterType,
    default: Option<String>,
    description: Option<String>,
    allowed_values: Vec<serde_json::Value>,
}

impl Parameter {
    pub fn new(name: &str, kind: ParameterType) -> Self {
        Parameter {
            name: name.to_string(),
            kind,
            default: None,
            description: None,
            allowed_values: vec![],
        }
    }

    pub fn with_default(mut self, default: &str) -> Self {
        self.default = Some(default.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_allowed_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<serde_json::Value>,
    {
        self.allowed_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ParameterType {
        self.kind
    }

    pub(crate) fn to_json(&self) -> serde_json::Value {
        let mut parameter = serde_json::Map::new();
        parameter.insert("Type".into(), self.kind.to_string().into());

        if let Some(description) = &self.description {
            parameter.insert("Description".into(), description.as_str().into());
        }

        if let Some(default) = &self.default {
            parameter.insert("Default".into(), default.as_str().into());
        }

        if !self.allowed_values.is_empty() {
            parameter.insert("AllowedValues".into(), self.allowed_values.clone().into());
        }

        parameter.into()
    }
}

/// Returned on registration, used to reference the parameter from properties
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterHandle {
    pub(crate) name: String,
}

impl ParameterHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reference(&self) -> Value {
        Value::reference(&self.name)
    }
}
