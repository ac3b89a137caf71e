mod error;
mod output;
mod parameter;
mod resource;
pub mod sanitize;
#[allow(clippy::module_inception)]
mod template;
mod value;

pub use error::{Section, TemplateError};
pub use output::Output;
pub use parameter::{Parameter, ParameterHandle, ParameterType};
pub use resource::{Descriptor, LogicalResource, Properties, ResourceHandle};
pub use template::Template;
pub use value::{Reference, Value};
