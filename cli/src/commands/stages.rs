use crate::runner::{Context, Runnable, Runner};
use crate::{error::Error, writer::Writer};
use apistack_common::StageConfig;
use serde_json::json;
use std::path::Path;

#[derive(clap::Args, Clone)]
pub(crate) struct StagesCommand {}

impl Runnable for StagesCommand {
    fn runner<'a>(&self, context: &Context<'a>) -> impl Runner + 'a {
        StagesRunner {
            writer: context.writer,
            config_path: context.config_path,
        }
    }
}

struct StagesRunner<'a> {
    writer: &'a Writer,
    config_path: Option<&'a Path>,
}

impl Runner for StagesRunner<'_> {
    /// List built-in and configured stages
    fn run(&mut self) -> Result<(), Error> {
        let config = self.config(self.config_path)?;
        let stages = config.stages()?;

        if self.writer.is_structured() {
            return self.writer.json(summary(&stages));
        }

        let source = config
            .path()
            .map(|p| format!("built-in and {}", p.display()))
            .unwrap_or("built-in".to_string());

        self.writer.text(&format!(
            "{} {}\n\n",
            console::style("Stages").green().bold(),
            console::style(format!("from {source}")).dim()
        ))?;

        for stage in stages.iter() {
            self.writer.text(&format!(
                "{} {}\n",
                console::style(&stage.name).bold(),
                console::style(format!("{} {}", stage.region, stage.api_name())).dim()
            ))?;
        }

        Ok(())
    }
}

/// Structured listing of the stages
fn summary(stages: &[StageConfig]) -> serde_json::Value {
    let stages = stages
        .iter()
        .map(|s| {
            json!({
                "name": s.name,
                "region": s.region,
                "api": s.api_name(),
                "lambda_parameters": s.lambda_parameters,
                "functions": s.functions.iter().map(|f| f.name.clone()).collect::<Vec<_>>(),
            })
        })
        .collect::<Vec<_>>();

    json!(stages)
}
