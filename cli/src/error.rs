use apistack_common::TemplateError;

/// Display global error message in unified format
#[derive(Debug)]
pub struct Error(String, Option<String>);

impl Error {
    pub fn new(message: &str, details: Option<&str>) -> Self {
        Error(message.to_string(), details.map(|d| d.to_string()))
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Display the message and details, as sort of a hint
impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}\n\n{}",
            self.0,
            console::style(self.1.clone().unwrap_or("".into())).dim()
        )
    }
}

/// Implement std::error::Error trait for Error
impl std::error::Error for Error {}

/// Graph errors get a hint on how to fix the stage definition
impl From<TemplateError> for Error {
    fn from(error: TemplateError) -> Self {
        let hint = match &error {
            TemplateError::DuplicateName { .. } => {
                "Two entries of the stage got the same logical name, check the function names."
            }

            TemplateError::DanglingReference { .. } => {
                "The stage refers to something it does not define, check deployment dependencies."
            }
        };

        Error::new(&error.to_string(), Some(hint))
    }
}

/// Automatically convert all eyre error reports
///
/// Keeps user-facing errors raised deeper in the call chain, the rest is shown as is.
impl From<eyre::ErrReport> for Error {
    fn from(error: eyre::ErrReport) -> Self {
        match error.downcast::<Error>() {
            Ok(error) => error,
            Err(error) => match error.downcast::<TemplateError>() {
                Ok(error) => error.into(),
                Err(error) => {
                    log::error!("{error:?}");
                    Error::new(&format!("{error:#}"), None)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_errors_keep_their_message() {
        let error: Error = TemplateError::DanglingReference {
            resource: "IntDeployment".into(),
            target: "MissingLambdaMethod".into(),
        }
        .into();

        assert!(error.message().contains("MissingLambdaMethod"));
        assert!(error.to_string().contains("deployment dependencies"));
    }

    #[test]
    fn reports_unwrap_to_user_errors() {
        let report: eyre::Report = Error::new("Stage \"Qa\" not found", None).into();
        assert_eq!(Error::from(report).message(), "Stage \"Qa\" not found");

        let report: eyre::Report = TemplateError::DuplicateName {
            section: apistack_common::template::Section::Resources,
            name: "ApiKey".into(),
        }
        .into();

        assert!(Error::from(report).message().contains("ApiKey"));

        let report = eyre::eyre!("disk is full");
        assert_eq!(Error::from(report).message(), "disk is full");
    }
}
