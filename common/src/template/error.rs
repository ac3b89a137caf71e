use std::fmt::Display;
use thiserror::Error;

/// Top level section of a template
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Parameters,
    Resources,
    Outputs,
}

impl Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            Section::Parameters => "Parameters",
            Section::Resources => "Resources",
            Section::Outputs => "Outputs",
        };

        write!(f, "{}", str)
    }
}

/// Graph integrity errors, both are fatal for the template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Raised at registration
    #[error("Logical name {name:?} is already defined, can not add it to {section}")]
    DuplicateName { section: Section, name: String },

    /// Raised at serialization
    ///
    /// `resource` is the logical name of the entry holding the reference,
    /// outputs are named as `Outputs.<name>`.
    #[error("{resource:?} references {target:?}, which is not defined in the template")]
    DanglingReference { resource: String, target: String },
}
