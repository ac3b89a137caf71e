use crate::template::{Descriptor, Properties, Value};

pub const POLICY_VERSION: &str = "2012-10-17";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Effect {
    #[default]
    Allow,
    Deny,
}

impl Effect {
    fn as_str(&self) -> &'static str {
        match self {
            Effect::Allow => "Allow",
            Effect::Deny => "Deny",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Statement {
    pub effect: Effect,
    pub principal: Option<Value>,
    pub action: Vec<String>,
    pub resource: Option<Value>,
}

impl Statement {
    pub fn allow(action: &[&str], resource: impl Into<Value>) -> Self {
        Statement {
            effect: Effect::Allow,
            principal: None,
            action: action.iter().map(|a| a.to_string()).collect(),
            resource: Some(resource.into()),
        }
    }

    /// Let the AWS services assume the role
    pub fn assume_role(services: &[&str]) -> Self {
        Statement {
            effect: Effect::Allow,
            principal: Some(Value::record([("Service", Value::list(services.to_vec()))])),
            action: vec!["sts:AssumeRole".to_string()],
            resource: None,
        }
    }
}

impl From<Statement> for Value {
    fn from(statement: Statement) -> Self {
        Properties::default()
            .set("Effect", statement.effect.as_str())
            .maybe("Principal", statement.principal)
            .set("Action", statement.action)
            .maybe("Resource", statement.resource)
            .into()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PolicyDocument {
    pub statement: Vec<Statement>,
}

impl From<PolicyDocument> for Value {
    fn from(document: PolicyDocument) -> Self {
        Properties::default()
            .set("Version", POLICY_VERSION)
            .set("Statement", document.statement)
            .into()
    }
}

/// Inline policy of a role
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Policy {
    pub policy_name: String,
    pub policy_document: PolicyDocument,
}

impl From<Policy> for Value {
    fn from(policy: Policy) -> Self {
        Properties::default()
            .set("PolicyName", policy.policy_name)
            .set("PolicyDocument", policy.policy_document)
            .into()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Role {
    pub assume_role_policy_document: PolicyDocument,
    pub path: Option<String>,
    pub policies: Vec<Policy>,
}

impl Descriptor for Role {
    const KIND: &'static str = "AWS::IAM::Role";

    fn properties(self) -> Properties {
        Properties::default()
            .set("AssumeRolePolicyDocument", self.assume_role_policy_document)
            .maybe("Path", self.path)
            .list("Policies", self.policies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn role_with_inline_policy() {
        let role = Role {
            assume_role_policy_document: PolicyDocument {
                statement: vec![Statement::assume_role(&["lambda.amazonaws.com"])],
            },
            path: Some("/".into()),
            policies: vec![Policy {
                policy_name: "root".into(),
                policy_document: PolicyDocument {
                    statement: vec![Statement::allow(&["logs:*"], "arn:aws:logs:*:*:*")],
                },
            }],
        }
        .named("Role");

        assert_eq!(role.kind(), "AWS::IAM::Role");

        assert_eq!(
            role.to_json()["Properties"],
            json!({
                "AssumeRolePolicyDocument": {
                    "Version": "2012-10-17",
                    "Statement": [{
                        "Effect": "Allow",
                        "Principal": { "Service": ["lambda.amazonaws.com"] },
                        "Action": ["sts:AssumeRole"]
                    }]
                },
                "Path": "/",
                "Policies": [{
                    "PolicyName": "root",
                    "PolicyDocument": {
                        "Version": "2012-10-17",
                        "Statement": [{
                            "Effect": "Allow",
                            "Action": ["logs:*"],
                            "Resource": "arn:aws:logs:*:*:*"
                        }]
                    }
                }]
            })
        );
    }
}
