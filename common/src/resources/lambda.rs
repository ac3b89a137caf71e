use crate::template::{Descriptor, Properties, Value};

pub const MINIMUM_MEMORY: u32 = 128;
pub const MAXIMUM_MEMORY: u32 = 3008;

/// Memory sizes accepted by Lambda, in MB
pub fn memory_values() -> Vec<u32> {
    (MINIMUM_MEMORY..=MAXIMUM_MEMORY).step_by(64).collect()
}

/// Location of the deployment package
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Code {
    pub s3_bucket: String,
    pub s3_key: String,
}

impl From<Code> for Value {
    fn from(code: Code) -> Self {
        Properties::default()
            .set("S3Bucket", code.s3_bucket)
            .set("S3Key", code.s3_key)
            .into()
    }
}

/// Environment variables, values are opaque (may be encrypted blobs)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Environment {
    pub variables: Vec<(String, Value)>,
}

impl From<Environment> for Value {
    fn from(environment: Environment) -> Self {
        Properties::default()
            .set("Variables", Value::Record(environment.variables))
            .into()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Function {
    pub code: Code,
    pub environment: Option<Environment>,
    pub handler: String,
    pub memory_size: Option<Value>,
    pub role: Option<Value>,
    pub runtime: String,
    pub timeout: Option<Value>,
}

impl Descriptor for Function {
    const KIND: &'static str = "AWS::Lambda::Function";

    fn properties(self) -> Properties {
        Properties::default()
            .set("Code", self.code)
            .maybe("Environment", self.environment)
            .set("Handler", self.handler)
            .maybe("MemorySize", self.memory_size)
            .maybe("Role", self.role)
            .set("Runtime", self.runtime)
            .maybe("Timeout", self.timeout)
    }
}
