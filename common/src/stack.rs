//! The API Gateway stack: a REST API with a Lambda function behind each path,
//! deployed to a stage and guarded by an API key with a usage plan.
mod config;

use crate::resources::apigateway::{
    ApiKey, ApiStage, Deployment, Integration, IntegrationResponse, Method, MethodResponse,
    QuotaSettings, Resource, RestApi, Stage, StageKey, ThrottleSettings, UsagePlan, UsagePlanKey,
};
use crate::resources::iam::{Policy, PolicyDocument, Role, Statement};
use crate::resources::lambda::{memory_values, Code, Environment, Function};
use crate::template::{
    Descriptor, Output, Parameter, ParameterType, ResourceHandle, Template, TemplateError, Value,
};
pub use config::{FunctionConfig, StageConfig, UsagePlanConfig, DEFAULT_REGION};

/// Role used both by the functions and by API Gateway to invoke them
fn execution_role(stage: &StageConfig) -> Role {
    let mut statement = vec![
        Statement::allow(&["logs:*"], "arn:aws:logs:*:*:*"),
        Statement::allow(&["lambda:*"], "*"),
    ];

    statement.extend(stage.extra_statements.iter().cloned());

    Role {
        assume_role_policy_document: PolicyDocument {
            statement: vec![Statement::assume_role(&[
                "lambda.amazonaws.com",
                "apigateway.amazonaws.com",
            ])],
        },
        path: Some("/".to_string()),
        policies: vec![Policy {
            policy_name: "root".to_string(),
            policy_document: PolicyDocument { statement },
        }],
    }
}

/// Method of the REST API invoking the function through a Lambda integration
fn method(
    stage: &StageConfig,
    function: &FunctionConfig,
    api: &ResourceHandle,
    role: &ResourceHandle,
    lambda: &ResourceHandle,
    path: &ResourceHandle,
) -> Method {
    let uri = Value::join(
        "",
        [
            Value::from(format!(
                "arn:aws:apigateway:{region}:lambda:path/2015-03-31/functions/",
                region = stage.region
            )),
            lambda.attribute("Arn"),
            Value::from("/invocations"),
        ],
    );

    let request_templates = function
        .request_template
        .iter()
        .map(|t| ("application/json".to_string(), t.clone()))
        .collect();

    Method {
        authorization_type: "NONE".to_string(),
        http_method: function.http_method.clone(),
        integration: Some(Integration {
            credentials: Some(role.attribute("Arn")),
            integration_http_method: Some("POST".to_string()),
            integration_responses: vec![IntegrationResponse {
                status_code: "200".to_string(),
            }],
            request_templates,
            kind: "AWS".to_string(),
            uri: Some(uri),
        }),
        method_responses: vec![MethodResponse {
            status_code: "200".to_string(),
        }],
        request_parameters: function.request_parameters.clone(),
        resource_id: Some(path.reference()),
        rest_api_id: Some(api.reference()),
    }
}

/// Build the CloudFormation template of the gateway stack for a stage
pub fn template(stage: &StageConfig) -> Result<Template, TemplateError> {
    log::info!("Building the template for {} stage", stage.name);
    let mut template = Template::new();

    let (memory_size, timeout) = if stage.lambda_parameters {
        let memory_size = template.add_parameter(
            Parameter::new("LambdaMemorySize", ParameterType::Number)
                .with_description("Amount of memory to allocate to the Lambda Function")
                .with_default("256")
                .with_allowed_values(memory_values()),
        )?;

        let timeout = template.add_parameter(
            Parameter::new("LambdaTimeout", ParameterType::Number)
                .with_description("Timeout in seconds for the Lambda function")
                .with_default("10"),
        )?;

        (Some(memory_size.reference()), Some(timeout.reference()))
    } else {
        (None, None)
    };

    let api = template.add_resource(
        RestApi {
            name: Some(stage.api_name()),
        }
        .named(&stage.api_name()),
    )?;

    let role = template.add_resource(execution_role(stage).named(&stage.role_name))?;
    let mut lambdas = Vec::with_capacity(stage.functions.len());

    for function in stage.functions.iter() {
        let environment = (!function.environment.is_empty()).then(|| Environment {
            variables: function
                .environment
                .iter()
                .map(|(k, v)| (k.clone(), Value::from(v)))
                .collect(),
        });

        let lambda = Function {
            code: Code {
                s3_bucket: function.s3_bucket.clone(),
                s3_key: function.s3_key.clone(),
            },
            environment,
            handler: function.handler.clone(),
            memory_size: memory_size.clone(),
            role: Some(role.attribute("Arn")),
            runtime: function.runtime.clone(),
            timeout: timeout.clone(),
        };

        lambdas.push(template.add_resource(lambda.named(&function.function_name()))?);
    }

    for (function, lambda) in stage.functions.iter().zip(lambdas.iter()) {
        let path = template.add_resource(
            Resource {
                parent_id: Some(api.attribute("RootResourceId")),
                path_part: function.path_part.clone(),
                rest_api_id: Some(api.reference()),
            }
            .named(&function.resource_name()),
        )?;

        template.add_resource(
            method(stage, function, &api, &role, lambda, &path)
                .named(&function.method_name())
                .depends_on(lambda.name()),
        )?;
    }

    let deployment = template.add_resource(
        Deployment {
            rest_api_id: Some(api.reference()),
            stage_name: None,
        }
        .named(&stage.deployment_name()),
    )?;

    for name in stage.deployment_depends_on.iter() {
        template.declare_dependency(deployment.name(), &config::method_name(name))?;
    }

    let api_stage = template.add_resource(
        Stage {
            deployment_id: Some(deployment.reference()),
            rest_api_id: Some(api.reference()),
            stage_name: stage.name.clone(),
        }
        .named(&stage.stage_name()),
    )?;

    let key = template.add_resource(
        ApiKey {
            stage_keys: vec![StageKey {
                rest_api_id: api.reference(),
                stage_name: api_stage.reference(),
            }],
        }
        .named("ApiKey"),
    )?;

    let plan = &stage.usage_plan;

    let usage_plan = template.add_resource(
        UsagePlan {
            api_stages: vec![ApiStage {
                api_id: api.reference(),
                stage: api_stage.reference(),
            }],
            description: Some(plan.description.clone()),
            quota: Some(QuotaSettings {
                limit: plan.quota_limit,
                period: plan.quota_period.clone(),
            }),
            throttle: Some(ThrottleSettings {
                burst_limit: plan.burst_limit,
                rate_limit: plan.rate_limit,
            }),
            usage_plan_name: Some(plan.name.clone()),
        }
        .named(&plan.name),
    )?;

    template.add_resource(
        UsagePlanKey {
            key_id: Some(key.reference()),
            key_type: "API_KEY".to_string(),
            usage_plan_id: Some(usage_plan.reference()),
        }
        .named(&format!("{}Key", plan.name)),
    )?;

    template.add_output(
        Output::new(
            "ApiEndpoint",
            Value::join(
                "",
                [
                    Value::from("https://"),
                    api.reference(),
                    Value::from(format!(
                        ".execute-api.{region}.amazonaws.com/",
                        region = stage.region
                    )),
                    Value::from(&stage.name),
                ],
            ),
        )
        .with_description("Endpoint for this stage of the api"),
    )?;

    template.add_output(Output::new("ApiKey", key.reference()).with_description("API key"))?;

    Ok(template)
}
