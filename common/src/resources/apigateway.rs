use crate::template::{Descriptor, Properties, Value};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RestApi {
    pub name: Option<String>,
}

impl Descriptor for RestApi {
    const KIND: &'static str = "AWS::ApiGateway::RestApi";

    fn properties(self) -> Properties {
        Properties::default().maybe("Name", self.name)
    }
}

/// Path segment of a REST API
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Resource {
    pub parent_id: Option<Value>,
    pub path_part: String,
    pub rest_api_id: Option<Value>,
}

impl Descriptor for Resource {
    const KIND: &'static str = "AWS::ApiGateway::Resource";

    fn properties(self) -> Properties {
        Properties::default()
            .maybe("ParentId", self.parent_id)
            .set("PathPart", self.path_part)
            .maybe("RestApiId", self.rest_api_id)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct IntegrationResponse {
    pub status_code: String,
}

impl From<IntegrationResponse> for Value {
    fn from(response: IntegrationResponse) -> Self {
        Properties::default()
            .set("StatusCode", response.status_code)
            .into()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MethodResponse {
    pub status_code: String,
}

impl From<MethodResponse> for Value {
    fn from(response: MethodResponse) -> Self {
        Properties::default()
            .set("StatusCode", response.status_code)
            .into()
    }
}

/// Backend of a method, e.g. a Lambda function
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Integration {
    pub credentials: Option<Value>,
    pub integration_http_method: Option<String>,
    pub integration_responses: Vec<IntegrationResponse>,

    /// Content type to mapping template
    pub request_templates: Vec<(String, String)>,

    /// Integration type, e.g. AWS or AWS_PROXY
    pub kind: String,
    pub uri: Option<Value>,
}

impl From<Integration> for Value {
    fn from(integration: Integration) -> Self {
        let request_templates = (!integration.request_templates.is_empty())
            .then(|| Value::record(integration.request_templates));

        Properties::default()
            .maybe("Credentials", integration.credentials)
            .maybe("IntegrationHttpMethod", integration.integration_http_method)
            .list("IntegrationResponses", integration.integration_responses)
            .maybe("RequestTemplates", request_templates)
            .set("Type", integration.kind)
            .maybe("Uri", integration.uri)
            .into()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Method {
    pub authorization_type: String,
    pub http_method: String,
    pub integration: Option<Integration>,
    pub method_responses: Vec<MethodResponse>,

    /// Request parameter to whether it is required
    pub request_parameters: Vec<(String, bool)>,
    pub resource_id: Option<Value>,
    pub rest_api_id: Option<Value>,
}

impl Descriptor for Method {
    const KIND: &'static str = "AWS::ApiGateway::Method";

    fn properties(self) -> Properties {
        let request_parameters = (!self.request_parameters.is_empty())
            .then(|| Value::record(self.request_parameters));

        Properties::default()
            .set("AuthorizationType", self.authorization_type)
            .set("HttpMethod", self.http_method)
            .maybe("Integration", self.integration)
            .list("MethodResponses", self.method_responses)
            .maybe("RequestParameters", request_parameters)
            .maybe("ResourceId", self.resource_id)
            .maybe("RestApiId", self.rest_api_id)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Deployment {
    pub rest_api_id: Option<Value>,
    pub stage_name: Option<String>,
}

impl Descriptor for Deployment {
    const KIND: &'static str = "AWS::ApiGateway::Deployment";

    fn properties(self) -> Properties {
        Properties::default()
            .maybe("RestApiId", self.rest_api_id)
            .maybe("StageName", self.stage_name)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stage {
    pub deployment_id: Option<Value>,
    pub rest_api_id: Option<Value>,
    pub stage_name: String,
}

impl Descriptor for Stage {
    const KIND: &'static str = "AWS::ApiGateway::Stage";

    fn properties(self) -> Properties {
        Properties::default()
            .maybe("DeploymentId", self.deployment_id)
            .maybe("RestApiId", self.rest_api_id)
            .set("StageName", self.stage_name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StageKey {
    pub rest_api_id: Value,
    pub stage_name: Value,
}

impl From<StageKey> for Value {
    fn from(key: StageKey) -> Self {
        Properties::default()
            .set("RestApiId", key.rest_api_id)
            .set("StageName", key.stage_name)
            .into()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApiKey {
    pub stage_keys: Vec<StageKey>,
}

impl Descriptor for ApiKey {
    const KIND: &'static str = "AWS::ApiGateway::ApiKey";

    fn properties(self) -> Properties {
        Properties::default().list("StageKeys", self.stage_keys)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiStage {
    pub api_id: Value,
    pub stage: Value,
}

impl From<ApiStage> for Value {
    fn from(stage: ApiStage) -> Self {
        Properties::default()
            .set("ApiId", stage.api_id)
            .set("Stage", stage.stage)
            .into()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuotaSettings {
    pub limit: u64,

    /// DAY, WEEK, or MONTH
    pub period: String,
}

impl From<QuotaSettings> for Value {
    fn from(quota: QuotaSettings) -> Self {
        Properties::default()
            .set("Limit", quota.limit)
            .set("Period", quota.period)
            .into()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ThrottleSettings {
    pub burst_limit: u64,
    pub rate_limit: u64,
}

impl From<ThrottleSettings> for Value {
    fn from(throttle: ThrottleSettings) -> Self {
        Properties::default()
            .set("BurstLimit", throttle.burst_limit)
            .set("RateLimit", throttle.rate_limit)
            .into()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UsagePlan {
    pub api_stages: Vec<ApiStage>,
    pub description: Option<String>,
    pub quota: Option<QuotaSettings>,
    pub throttle: Option<ThrottleSettings>,
    pub usage_plan_name: Option<String>,
}

impl Descriptor for UsagePlan {
    const KIND: &'static str = "AWS::ApiGateway::UsagePlan";

    fn properties(self) -> Properties {
        Properties::default()
            .list("ApiStages", self.api_stages)
            .maybe("Description", self.description)
            .maybe("Quota", self.quota)
            .maybe("Throttle", self.throttle)
            .maybe("UsagePlanName", self.usage_plan_name)
    }
}

/// Binds an API key to a usage plan
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UsagePlanKey {
    pub key_id: Option<Value>,
    pub key_type: String,
    pub usage_plan_id: Option<Value>,
}

impl Descriptor for UsagePlanKey {
    const KIND: &'static str = "AWS::ApiGateway::UsagePlanKey";

    fn properties(self) -> Properties {
        Properties::default()
            .maybe("KeyId", self.key_id)
            .set("KeyType", self.key_type)
            .maybe("UsagePlanId", self.usage_plan_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn method_with_integration() {
        let method = Method {
            authorization_type: "NONE".into(),
            http_method: "GET".into(),
            integration: Some(Integration {
                credentials: Some(Value::attribute("Role", "Arn")),
                integration_http_method: Some("POST".into()),
                integration_responses: vec![IntegrationResponse {
                    status_code: "200".into(),
                }],
                request_templates: vec![("application/json".into(), "{}".into())],
                kind: "AWS".into(),
                uri: Some(Value::join(
                    "",
                    [Value::from("arn:"), Value::attribute("Fn", "Arn")],
                )),
            }),
            method_responses: vec![MethodResponse {
                status_code: "200".into(),
            }],
            request_parameters: vec![("method.request.querystring.id".into(), true)],
            resource_id: Some(Value::reference("Resource")),
            rest_api_id: Some(Value::reference("Api")),
        }
        .named("Method");

        assert_eq!(
            method.to_json()["Properties"],
            json!({
                "AuthorizationType": "NONE",
                "HttpMethod": "GET",
                "Integration": {
                    "Credentials": { "Fn::GetAtt": ["Role", "Arn"] },
                    "IntegrationHttpMethod": "POST",
                    "IntegrationResponses": [{ "StatusCode": "200" }],
                    "RequestTemplates": { "application/json": "{}" },
                    "Type": "AWS",
                    "Uri": { "Fn::Join": ["", ["arn:", { "Fn::GetAtt": ["Fn", "Arn"] }]] }
                },
                "MethodResponses": [{ "StatusCode": "200" }],
                "RequestParameters": { "method.request.querystring.id": true },
                "ResourceId": { "Ref": "Resource" },
                "RestApiId": { "Ref": "Api" }
            })
        );
    }

    #[test]
    fn usage_plan_settings() {
        let plan = UsagePlan {
            api_stages: vec![ApiStage {
                api_id: Value::reference("Api"),
                stage: Value::reference("Stage"),
            }],
            quota: Some(QuotaSettings {
                limit: 50000,
                period: "MONTH".into(),
            }),
            throttle: Some(ThrottleSettings {
                burst_limit: 500,
                rate_limit: 5000,
            }),
            ..Default::default()
        }
        .named("Plan");

        assert_eq!(
            plan.to_json()["Properties"],
            json!({
                "ApiStages": [{ "ApiId": { "Ref": "Api" }, "Stage": { "Ref": "Stage" } }],
                "Quota": { "Limit": 50000, "Period": "MONTH" },
                "Throttle": { "BurstLimit": 500, "RateLimit": 5000 }
            })
        );
    }
}
