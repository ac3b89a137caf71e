use crate::template::Value;

/// A named value exported by the stack, e.g. an endpoint URL
#[derive(Clone, Debug, PartialEq)]
pub struct Output {
    name: String,
    value: Value,
    description: Option<String>,
    export_name: Option<Value>,
}

impl Output {
    pub fn new(name: &str, value: impl Into<Value>) -> Self {
        Output {
            name: name.to_string(),
            value: value.into(),
            description: None,
            export_name: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Make the value importable by other stacks under the given name
    pub fn with_export(mut self, export_name: impl Into<Value>) -> Self {
        self.export_name = Some(export_name.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &Value> {
        std::iter::once(&self.value).chain(self.export_name.iter())
    }

    pub(crate) fn to_json(&self) -> serde_json::Value {
        let mut output = serde_json::Map::new();

        if let Some(description) = &self.description {
            output.insert("Description".into(), description.as_str().into());
        }

        output.insert("Value".into(), self.value.resolve());

        if let Some(export_name) = &self.export_name {
            let mut export = serde_json::Map::new();
            export.insert("Name".into(), export_name.resolve());
            output.insert("Export".into(), export.into());
        }

        output.into()
    }
}
