pub mod stages;
pub mod synth;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Build the CloudFormation template of a stage (the default command)
    Synth(synth::SynthCommand),

    /// List stages, built-in ones and those from apistack.toml
    Stages(stages::StagesCommand),
}
