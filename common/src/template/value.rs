use serde_json::json;

/// A symbolic pointer to a parameter or a resource of the same template
///
/// Resolved into `Ref` or `Fn::GetAtt` only when the template is serialized,
/// so the target may be registered after the entry that points at it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Reference {
    target: String,
    attribute: Option<String>,
}

impl Reference {
    /// Points at the identity of a parameter or resource
    pub fn new(target: &str) -> Self {
        Reference {
            target: target.to_string(),
            attribute: None,
        }
    }

    /// Points at a runtime attribute of a resource, e.g. its Arn
    pub fn attribute(target: &str, attribute: &str) -> Self {
        Reference {
            target: target.to_string(),
            attribute: Some(attribute.to_string()),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn attribute_name(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    /// Pseudo parameters (AWS::Region, AWS::AccountId, ...) are provided by CloudFormation
    pub fn is_pseudo(&self) -> bool {
        self.attribute.is_none() && self.target.starts_with("AWS::")
    }

    pub(crate) fn resolve(&self) -> serde_json::Value {
        match &self.attribute {
            Some(attribute) => json!({ "Fn::GetAtt": [self.target, attribute] }),
            None => json!({ "Ref": self.target }),
        }
    }
}

/// A property value of a template entry
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Opaque JSON, emitted as is
    Literal(serde_json::Value),

    Reference(Reference),

    /// Fn::Join of the parts with a delimiter
    Join { delimiter: String, parts: Vec<Value> },

    List(Vec<Value>),

    /// Nested record, keys are emitted in insertion order
    Record(Vec<(String, Value)>),
}

impl Value {
    pub fn reference(target: &str) -> Self {
        Value::Reference(Reference::new(target))
    }

    pub fn attribute(target: &str, attribute: &str) -> Self {
        Value::Reference(Reference::attribute(target, attribute))
    }

    pub fn join<I, V>(delimiter: &str, parts: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Join {
            delimiter: delimiter.to_string(),
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }

    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(values.into_iter().map(Into::into).collect())
    }

    pub fn record<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Record(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// All references found in the value, depth first
    pub fn references(&self) -> Vec<&Reference> {
        let mut found = Vec::new();
        self.collect_references(&mut found);
        found
    }

    fn collect_references<'a>(&'a self, found: &mut Vec<&'a Reference>) {
        match self {
            Value::Literal(_) => {}
            Value::Reference(reference) => found.push(reference),
            Value::Join { parts, .. } => parts.iter().for_each(|p| p.collect_references(found)),
            Value::List(values) => values.iter().for_each(|v| v.collect_references(found)),
            Value::Record(entries) => entries
                .iter()
                .for_each(|(_, v)| v.collect_references(found)),
        }
    }

    /// Convert into the CloudFormation JSON representation
    pub(crate) fn resolve(&self) -> serde_json::Value {
        match self {
            Value::Literal(literal) => literal.clone(),
            Value::Reference(reference) => reference.resolve(),

            Value::Join { delimiter, parts } => {
                let parts: Vec<serde_json::Value> = parts.iter().map(Value::resolve).collect();
                json!({ "Fn::Join": [delimiter, parts] })
            }

            Value::List(values) => {
                serde_json::Value::Array(values.iter().map(Value::resolve).collect())
            }

            Value::Record(entries) => {
                let mut map = serde_json::Map::new();

                for (key, value) in entries {
                    map.insert(key.clone(), value.resolve());
                }

                serde_json::Value::Object(map)
            }
        }
    }
}

impl From<Reference> for Value {
    fn from(reference: Reference) -> Self {
        Value::Reference(reference)
    }
}

impl From<serde_json::Value> for Value {
    fn from(literal: serde_json::Value) -> Self {
        Value::Literal(literal)
    }
}

impl From<&str> for Value {
    fn from(literal: &str) -> Self {
        Value::Literal(literal.into())
    }
}

impl From<String> for Value {
    fn from(literal: String) -> Self {
        Value::Literal(literal.into())
    }
}

impl From<&String> for Value {
    fn from(literal: &String) -> Self {
        Value::Literal(literal.as_str().into())
    }
}

impl From<bool> for Value {
    fn from(literal: bool) -> Self {
        Value::Literal(literal.into())
    }
}

impl From<u32> for Value {
    fn from(literal: u32) -> Self {
        Value::Literal(literal.into())
    }
}

impl From<u64> for Value {
    fn from(literal: u64) -> Self {
        Value::Literal(literal.into())
    }
}

impl From<i64> for Value {
    fn from(literal: i64) -> Self {
        Value::Literal(literal.into())
    }
}

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(values: Vec<V>) -> Self {
        Value::list(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolves_plain_and_attribute_references() {
        assert_eq!(Value::reference("Api").resolve(), json!({ "Ref": "Api" }));

        assert_eq!(
            Value::attribute("Role", "Arn").resolve(),
            json!({ "Fn::GetAtt": ["Role", "Arn"] })
        );
    }

    #[test]
    fn join_keeps_literals_and_resolves_parts() {
        let value = Value::join(
            "",
            [
                Value::from("https://"),
                Value::reference("Api"),
                Value::from(".execute-api.eu-west-1.amazonaws.com/"),
            ],
        );

        assert_eq!(
            value.resolve(),
            json!({
                "Fn::Join": ["", [
                    "https://",
                    { "Ref": "Api" },
                    ".execute-api.eu-west-1.amazonaws.com/"
                ]]
            })
        );
    }

    #[test]
    fn collects_nested_references_in_order() {
        let value = Value::record([
            ("Credentials", Value::attribute("Role", "Arn")),
            (
                "Uri",
                Value::join("", [Value::from("x"), Value::attribute("Fn", "Arn")]),
            ),
            ("Keys", Value::list([Value::reference("Key")])),
        ]);

        let targets: Vec<&str> = value.references().iter().map(|r| r.target()).collect();
        assert_eq!(targets, vec!["Role", "Fn", "Key"]);
    }

    #[test]
    fn record_preserves_insertion_order() {
        let value = Value::record([("Zeta", 1u32), ("Alpha", 2u32)]);
        let text = serde_json::to_string(&value.resolve()).unwrap();
        assert_eq!(text, r#"{"Zeta":1,"Alpha":2}"#);
    }

    #[test]
    fn pseudo_parameters_are_detected() {
        assert!(Reference::new("AWS::Region").is_pseudo());
        assert!(!Reference::attribute("AWS::Region", "Arn").is_pseudo());
        assert!(!Reference::new("Region").is_pseudo());
    }
}
