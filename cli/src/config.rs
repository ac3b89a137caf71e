use crate::error::Error;
use apistack_common::template::sanitize::{escape_resource_name, is_valid_logical_name};
use apistack_common::StageConfig;
use eyre::{ContextCompat, WrapErr};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub(crate) const CONFIG_FILENAME: &str = "apistack.toml";

/// ConfigFile is the structure of apistack.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ConfigFile {
    /// [[stage]]
    /// name = "Qa"
    /// base = "int"
    #[serde(default, rename = "stage")]
    stages: Vec<StageSection>,

    #[serde(skip)]
    path: Option<PathBuf>,
}

/// Overrides of a built-in stage
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StageSection {
    name: String,

    /// Built-in stage to start from, the stage with the same name or dev by default
    base: Option<String>,

    region: Option<String>,
    lambda_parameters: Option<bool>,

    #[serde(default)]
    usage_plan: UsagePlanSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct UsagePlanSection {
    quota_limit: Option<u64>,
    quota_period: Option<String>,
    burst_limit: Option<u64>,
    rate_limit: Option<u64>,
}

impl StageSection {
    fn apply(&self) -> eyre::Result<StageConfig> {
        let name = escape_resource_name(&self.name);

        if !is_valid_logical_name(&name) {
            return Err(Error::new(
                &format!("Invalid stage name {:?}", self.name),
                Some("Use latin letters and digits in stage names."),
            )
            .into());
        }

        let preset = StageConfig::preset(&name);

        let base = self
            .base
            .clone()
            .or_else(|| preset.as_ref().map(|_| name.clone()))
            .unwrap_or("dev".into());

        let mut stage = StageConfig::preset(&base).wrap_err(Error::new(
            &format!("Unknown base stage {base:?} for {:?}", self.name),
            Some("Built-in stages are dev and int."),
        ))?;

        // A preset keeps its own name, logical names derive from it
        stage.name = preset.map(|p| p.name).unwrap_or(name);

        if let Some(region) = &self.region {
            stage.region = region.clone();
        }

        if let Some(lambda_parameters) = self.lambda_parameters {
            stage.lambda_parameters = lambda_parameters;
        }

        let plan = &self.usage_plan;
        stage.usage_plan.quota_limit = plan.quota_limit.unwrap_or(stage.usage_plan.quota_limit);
        stage.usage_plan.burst_limit = plan.burst_limit.unwrap_or(stage.usage_plan.burst_limit);
        stage.usage_plan.rate_limit = plan.rate_limit.unwrap_or(stage.usage_plan.rate_limit);

        if let Some(period) = &plan.quota_period {
            stage.usage_plan.quota_period = period.clone();
        }

        Ok(stage)
    }
}

impl ConfigFile {
    /// Reads the config from an explicit path, or from the current dir
    ///
    /// An explicitly passed file must exist. Otherwise a missing apistack.toml
    /// means built-in stages only.
    pub(crate) fn load(path: Option<&Path>) -> eyre::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::from_dir(&std::env::current_dir().wrap_err("Failed to get current dir")?),
        }
    }

    /// Reads a `ConfigFile` from apistack.toml in a given directory, if there is one
    pub(crate) fn from_dir(dir: &Path) -> eyre::Result<Self> {
        let path = dir.join(CONFIG_FILENAME);

        if !path.exists() {
            log::debug!("No {CONFIG_FILENAME} in {dir:?}, using built-in stages");
            return Ok(Self::default());
        }

        Self::from_file(&path)
    }

    pub(crate) fn from_file(path: &Path) -> eyre::Result<Self> {
        let toml_string = fs::read_to_string(path).wrap_err(Error::new(
            &format!("Failed to read {path:?}"),
            Some("Check the path passed in --config."),
        ))?;

        let mut config: ConfigFile = toml::from_str(&toml_string).wrap_err(Error::new(
            &format!("Failed to parse TOML in {path:?}"),
            Some("Stages are defined in [[stage]] sections."),
        ))?;

        config.path = Some(path.to_path_buf());
        log::info!("Loaded {} stage(s) from {path:?}", config.stages.len());
        Ok(config)
    }

    pub(crate) fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Built-in stages with the configured ones applied on top
    ///
    /// A configured stage replaces the stage with the same name.
    pub(crate) fn stages(&self) -> eyre::Result<Vec<StageConfig>> {
        let mut stages = StageConfig::presets();

        for section in self.stages.iter() {
            let stage = section.apply()?;

            match stages
                .iter_mut()
                .find(|s| s.name.eq_ignore_ascii_case(&stage.name))
            {
                Some(existing) => *existing = stage,
                None => stages.push(stage),
            }
        }

        Ok(stages)
    }

    /// Find a stage by name, case-insensitive
    pub(crate) fn stage(&self, name: &str) -> eyre::Result<StageConfig> {
        let name = escape_resource_name(name);

        self.stages()?
            .into_iter()
            .find(|s| s.name.eq_ignore_ascii_case(&name))
            .wrap_err(Error::new(
                &format!("Stage {name:?} not found"),
                Some("Run `apistack stages` to see the list of stages."),
            ))
    }
}
