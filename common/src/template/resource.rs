use crate::template::{Reference, Value};

/// Ordered property record of a resource or a nested property type
///
/// Setting a key twice replaces the value but keeps the original position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Properties(Vec<(String, Value)>);

impl Properties {
    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        let value = value.into();

        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((key.to_string(), value)),
        }

        self
    }

    /// Set the property only if the value is present
    pub fn maybe<V: Into<Value>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.set(key, value),
            None => self,
        }
    }

    /// Set a list property, empty lists are skipped
    pub fn list<V: Into<Value>>(self, key: &str, values: Vec<V>) -> Self {
        if values.is_empty() {
            return self;
        }

        self.set(key, Value::list(values))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<Properties> for Value {
    fn from(properties: Properties) -> Self {
        Value::Record(properties.0)
    }
}

/// A typed resource or property type that knows its CloudFormation shape
pub trait Descriptor: Sized {
    /// CloudFormation resource type, e.g. `AWS::Lambda::Function`
    const KIND: &'static str;

    fn properties(self) -> Properties;

    /// Turn the descriptor into a resource registered under the logical name
    fn named(self, name: &str) -> LogicalResource {
        LogicalResource::new(name, Self::KIND).with_properties(self.properties())
    }
}

/// An entry of the Resources section
#[derive(Clone, Debug, PartialEq)]
pub struct LogicalResource {
    name: String,
    kind: String,
    properties: Properties,
    depends_on: Vec<String>,
}

impl LogicalResource {
    pub fn new(name: &str, kind: &str) -> Self {
        LogicalResource {
            name: name.to_string(),
            kind: kind.to_string(),
            properties: Properties::default(),
            depends_on: vec![],
        }
    }

    pub fn property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties = self.properties.set(key, value);
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Annotate the resource with an explicit provisioning order
    pub fn depends_on(mut self, name: &str) -> Self {
        self.add_dependency(name);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn dependencies(&self) -> &[String] {
        &self.depends_on
    }

    pub(crate) fn add_dependency(&mut self, name: &str) {
        if !self.depends_on.iter().any(|d| d == name) {
            self.depends_on.push(name.to_string());
        }
    }

    pub(crate) fn references(&self) -> Vec<&Reference> {
        self.properties
            .iter()
            .flat_map(|(_, value)| value.references())
            .collect()
    }

    /// A single dependency is emitted as a string, several as a list
    pub(crate) fn to_json(&self) -> serde_json::Value {
        let mut resource = serde_json::Map::new();
        resource.insert("Type".into(), self.kind.as_str().into());

        match self.depends_on.as_slice() {
            [] => {}
            [single] => {
                resource.insert("DependsOn".into(), single.as_str().into());
            }
            many => {
                resource.insert("DependsOn".into(), many.to_vec().into());
            }
        }

        if !self.properties.is_empty() {
            resource.insert(
                "Properties".into(),
                Value::from(self.properties.clone()).resolve(),
            );
        }

        resource.into()
    }
}

/// Returned on registration, used to reference the resource from properties
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceHandle {
    pub(crate) name: String,
}

impl ResourceHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `Ref` of the resource
    pub fn reference(&self) -> Value {
        Value::reference(&self.name)
    }

    /// `Fn::GetAtt` of one of the resource runtime attributes
    pub fn attribute(&self, attribute: &str) -> Value {
        Value::attribute(&self.name, attribute)
    }
}
