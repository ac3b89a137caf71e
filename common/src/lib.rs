pub mod resources;
pub mod stack;
pub mod template;

pub use stack::{FunctionConfig, StageConfig, UsagePlanConfig};
pub use template::{Template, TemplateError};
