//! Typed descriptors of the CloudFormation resources used by the stack
pub mod apigateway;
pub mod iam;
pub mod lambda;
