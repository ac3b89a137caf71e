use crate::runner::{Context, Runnable, Runner};
use crate::{error::Error, writer::Writer};
use apistack_common::stack;
use std::path::{Path, PathBuf};

#[derive(clap::Args, Clone)]
pub(crate) struct SynthCommand {
    /// Stage to build the template for, e.g. dev or int
    #[arg(short, long, default_value = "dev")]
    pub(crate) stage: String,

    /// Write the template into a file instead of stdout
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,
}

impl Default for SynthCommand {
    fn default() -> Self {
        SynthCommand {
            stage: "dev".to_string(),
            output: None,
        }
    }
}

impl Runnable for SynthCommand {
    fn runner<'a>(&self, context: &Context<'a>) -> impl Runner + 'a {
        SynthRunner {
            command: self.clone(),
            writer: context.writer,
            config_path: context.config_path,
        }
    }
}

struct SynthRunner<'a> {
    command: SynthCommand,
    writer: &'a Writer,
    config_path: Option<&'a Path>,
}

impl Runner for SynthRunner<'_> {
    /// Build the stage template and print it
    ///
    /// Nothing is written when the template is invalid.
    fn run(&mut self) -> Result<(), Error> {
        let stage = self.config(self.config_path)?.stage(&self.command.stage)?;
        let template = stack::template(&stage)?;

        let document = template.to_json()?;

        self.writer
            .document(&document, self.command.output.as_deref())?;

        if let Some(path) = &self.command.output {
            self.writer.error(&format!(
                "{} {} {}\n",
                console::style("Template").green().bold(),
                console::style("saved to").dim(),
                console::style(path.display()).underlined().bold()
            ))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CONFIG_FILENAME;
    use pretty_assertions::assert_eq;

    fn empty_config(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn default_stage_into_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = empty_config(&dir);
        let output = dir.path().join("template.json");
        let writer = Writer::new(false);

        let context = Context {
            writer: &writer,
            config_path: Some(config.as_path()),
        };

        let command = SynthCommand {
            output: Some(output.clone()),
            ..SynthCommand::default()
        };

        command.runner(&context).run().unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.ends_with("}\n"));

        let document: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            document["Resources"]["DevTransformGatewayApi"]["Type"],
            serde_json::json!("AWS::ApiGateway::RestApi")
        );
        assert!(document["Parameters"].is_object());
        assert!(document["Outputs"]["ApiEndpoint"].is_object());
    }

    #[test]
    fn default_stage_into_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let config = empty_config(&dir);
        let writer = Writer::new(true);

        let context = Context {
            writer: &writer,
            config_path: Some(config.as_path()),
        };

        assert!(SynthCommand::default().runner(&context).run().is_ok());
    }

    #[test]
    fn unknown_stage_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = empty_config(&dir);
        let output = dir.path().join("template.json");
        let writer = Writer::new(false);

        let context = Context {
            writer: &writer,
            config_path: Some(config.as_path()),
        };

        let command = SynthCommand {
            stage: "prod".to_string(),
            output: Some(output.clone()),
        };

        let error = command.runner(&context).run().unwrap_err();
        assert!(error.message().contains("prod"));
        assert!(!output.exists());
    }
}
