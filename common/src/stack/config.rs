use crate::resources::iam::Statement;

pub const DEFAULT_REGION: &str = "eu-west-1";
const ROLE_NAME: &str = "TransformGatewayLambdaExecutionRole";
const RUNTIME: &str = "java8";

/// Encrypted with the KMS key the Dev role is allowed to use
const DEV_ENCRYPTED_TABLE_NAME: &str = "AQICAHj7TcK9LFOMG7ASr1CqzDG9KZmgHFc2e261yVwVuEFE1wF/FZ8lRXdsyWqRM5qip4qIAAAAbTBrBgkqhkiG9w0BBwagXjBcAgEAMFcGCSqGSIb3DQEHATAeBglghkgBZQMEAS4wEQQMSJd7TiLcc2NGXkcuAgEQgCoqmyAloKi2XTKoUh9BeRUMhsH5s4Rs/glL9U9nogdAyituOg3OSWmqfhw=";
const DEV_KMS_KEY_ARN: &str = "arn:aws:kms:*:*:key/274ee5ea-e1a5-4ae6-bcaf-b7f32c0215b4";
const DEV_TABLE_ARN: &str = "arn:aws:dynamodb:*:*:table/DevCompanyTable";

/// A Lambda function exposed as a path of the REST API
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionConfig {
    /// Prefix of the logical names, e.g. `Uppercase` gives `UppercaseFunction`
    pub name: String,

    pub s3_bucket: String,
    pub s3_key: String,
    pub handler: String,
    pub runtime: String,
    pub path_part: String,
    pub http_method: String,

    /// Method request parameter to whether it is required
    pub request_parameters: Vec<(String, bool)>,

    /// Mapping template for application/json requests
    pub request_template: Option<String>,

    /// Values are passed as is, secrets are expected to be encrypted already
    pub environment: Vec<(String, String)>,
}

impl FunctionConfig {
    fn new(name: &str, bucket: &str, key: &str, handler: &str, path_part: &str) -> Self {
        FunctionConfig {
            name: name.to_string(),
            s3_bucket: bucket.to_string(),
            s3_key: key.to_string(),
            handler: handler.to_string(),
            runtime: RUNTIME.to_string(),
            path_part: path_part.to_string(),
            http_method: "POST".to_string(),
            request_parameters: vec![],
            request_template: None,
            environment: vec![],
        }
    }

    pub fn function_name(&self) -> String {
        format!("{}Function", self.name)
    }

    pub fn resource_name(&self) -> String {
        format!("{}Resource", self.name)
    }

    pub fn method_name(&self) -> String {
        method_name(&self.name)
    }
}

/// Logical name of the method serving a function
pub fn method_name(function: &str) -> String {
    format!("{function}LambdaMethod")
}

#[derive(Clone, Debug, PartialEq)]
pub struct UsagePlanConfig {
    pub name: String,
    pub description: String,
    pub quota_limit: u64,
    pub quota_period: String,
    pub burst_limit: u64,
    pub rate_limit: u64,
}

impl Default for UsagePlanConfig {
    fn default() -> Self {
        UsagePlanConfig {
            name: "ExampleUsagePlan".to_string(),
            description: "Example usage plan".to_string(),
            quota_limit: 50000,
            quota_period: "MONTH".to_string(),
            burst_limit: 500,
            rate_limit: 5000,
        }
    }
}

/// Everything that differs between the stages of the gateway stack
#[derive(Clone, Debug, PartialEq)]
pub struct StageConfig {
    /// Stage name, also prefixes the API, deployment, and stage logical names
    pub name: String,

    pub region: String,

    /// Declare LambdaMemorySize and LambdaTimeout parameters and use them in functions
    pub lambda_parameters: bool,

    /// Logical name of the role shared by functions and integrations
    pub role_name: String,

    /// Appended to the logs and lambda statements of the role
    pub extra_statements: Vec<Statement>,

    pub functions: Vec<FunctionConfig>,

    /// Names of the functions whose methods the deployment waits for
    pub deployment_depends_on: Vec<String>,

    pub usage_plan: UsagePlanConfig,
}

impl StageConfig {
    /// Functions and wiring shared by all stages
    fn base(name: &str) -> Self {
        let mut get_company = FunctionConfig::new(
            "GetCompany",
            "gs-lambda-store",
            "get-company.zip",
            "greenhills.GetCompanyHandler",
            "company",
        );

        get_company.http_method = "GET".to_string();

        get_company.request_parameters = vec![
            ("method.request.path.proxy".to_string(), true),
            ("method.request.querystring.id".to_string(), true),
        ];

        get_company.request_template = Some("{\"id\": $input.params('id')}".to_string());

        StageConfig {
            name: name.to_string(),
            region: DEFAULT_REGION.to_string(),
            lambda_parameters: false,
            role_name: ROLE_NAME.to_string(),
            extra_statements: vec![],
            functions: vec![
                FunctionConfig::new(
                    "Uppercase",
                    "gs-serverless-store",
                    "uppercase.zip",
                    "greenhills.Uppercase",
                    "uppercase",
                ),
                FunctionConfig::new(
                    "Lowercase",
                    "gs-lambda-store",
                    "lowercase-lambda.zip",
                    "greenhills.Lowercase",
                    "lowercase",
                ),
                get_company,
            ],
            deployment_depends_on: vec!["Uppercase".to_string(), "Lowercase".to_string()],
            usage_plan: UsagePlanConfig::default(),
        }
    }

    /// Development stage, reads the company table
    pub fn dev() -> Self {
        let mut stage = Self::base("Dev");
        stage.lambda_parameters = true;

        stage.extra_statements = vec![
            Statement::allow(&["dynamodb:GetItem", "dynamodb:Query"], DEV_TABLE_ARN),
            Statement::allow(
                &[
                    "kms:Encrypt",
                    "kms:Decrypt",
                    "kms:ReEncrypt*",
                    "kms:GenerateDataKey*",
                    "kms:DescribeKey",
                ],
                DEV_KMS_KEY_ARN,
            ),
        ];

        for function in stage.functions.iter_mut() {
            if function.name == "GetCompany" {
                function.environment = vec![(
                    "ENCRYPTED_TABLE_NAME".to_string(),
                    DEV_ENCRYPTED_TABLE_NAME.to_string(),
                )];
            }
        }

        stage
    }

    /// Integration stage, no lambda parameters and no table access
    pub fn int() -> Self {
        Self::base("Int")
    }

    pub fn presets() -> Vec<Self> {
        vec![Self::dev(), Self::int()]
    }

    /// Look up a built-in stage, the name is case-insensitive
    pub fn preset(name: &str) -> Option<Self> {
        Self::presets()
            .into_iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn api_name(&self) -> String {
        format!("{}TransformGatewayApi", self.name)
    }

    pub fn deployment_name(&self) -> String {
        format!("{}Deployment", self.name)
    }

    pub fn stage_name(&self) -> String {
        format!("{}Stage", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_found_by_any_case() {
        assert_eq!(StageConfig::preset("dev").map(|s| s.name), Some("Dev".into()));
        assert_eq!(StageConfig::preset("INT").map(|s| s.name), Some("Int".into()));
        assert_eq!(StageConfig::preset("prod"), None);
    }

    #[test]
    fn only_dev_reads_the_table() {
        let dev = StageConfig::dev();
        let int = StageConfig::int();

        assert!(dev.lambda_parameters);
        assert_eq!(dev.extra_statements.len(), 2);
        assert!(!int.lambda_parameters);
        assert!(int.extra_statements.is_empty());

        let environments: Vec<usize> = int.functions.iter().map(|f| f.environment.len()).collect();
        assert_eq!(environments, vec![0, 0, 0]);

        let environments: Vec<usize> = dev.functions.iter().map(|f| f.environment.len()).collect();
        assert_eq!(environments, vec![0, 0, 1]);
    }

    #[test]
    fn derived_logical_names() {
        let stage = StageConfig::int();

        assert_eq!(stage.api_name(), "IntTransformGatewayApi");
        assert_eq!(stage.deployment_name(), "IntDeployment");
        assert_eq!(stage.stage_name(), "IntStage");
        assert_eq!(stage.functions[2].method_name(), "GetCompanyLambdaMethod");
    }

    #[test]
    fn deployment_waits_for_function_methods() {
        let stage = StageConfig::int();

        let methods: Vec<String> = stage.deployment_depends_on.iter().map(|n| method_name(n)).collect();
        let expected: Vec<String> = stage.functions[..2].iter().map(|f| f.method_name()).collect();

        assert_eq!(methods, expected);
    }
}
