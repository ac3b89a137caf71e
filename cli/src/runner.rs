use crate::{config::ConfigFile, error::Error, writer::Writer};
use std::error::Error as StdError;
use std::path::Path;

/// What every command gets from the global flags
pub(crate) struct Context<'a> {
    pub(crate) writer: &'a Writer,
    pub(crate) config_path: Option<&'a Path>,
}

pub(crate) trait Runner {
    /// Stages configuration, built-in stages merged with apistack.toml
    fn config(&self, path: Option<&Path>) -> Result<ConfigFile, Error> {
        ConfigFile::load(path).map_err(|e| {
            self.error(
                Some("Invalid configuration"),
                Some(&format!("{e:#}")),
                Some(e.into()),
            )
        })
    }

    /// Run the command
    ///
    /// Returns an error shown to the user in case of failure
    fn run(&mut self) -> Result<(), Error>;

    /// Construct an error shown to the user
    fn error(
        &self,
        title: Option<&str>,
        description: Option<&str>,
        origin: Option<Box<dyn StdError>>,
    ) -> Error {
        if let Some(origin) = origin {
            log::error!("{origin:?}");
        }

        if let Some(title) = title {
            Error::new(title, description)
        } else {
            Error::new(
                "Failed to run the command",
                Some("Run again with RUST_LOG=debug to see the details."),
            )
        }
    }
}

/// Return a runner for a command
pub(crate) trait Runnable {
    fn runner<'a>(&self, context: &Context<'a>) -> impl Runner + 'a;
}
