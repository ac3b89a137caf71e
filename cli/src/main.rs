mod commands;
mod config;
mod error;
mod logger;
mod runner;
mod writer;
use crate::commands::synth::SynthCommand;
use crate::commands::Commands;
use crate::logger::Logger;
use crate::runner::{Context, Runnable, Runner};
use crate::writer::Writer;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the stages config, apistack.toml in the current dir by default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Structured (JSON) output for listings
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Derive a runner from the command and run it
///
/// Exits with status 1 on failure, nothing is written to stdout in that case.
fn run(command: impl Runnable, context: &Context) {
    if let Err(error) = command.runner(context).run() {
        log::debug!("Command failed: {}", error.message());

        // Shown in structured mode too, stdout stays clean
        eprintln!("\n{}\n{error}", console::style("Error").red().bold());
        std::process::exit(1);
    }
}

fn main() {
    Logger::init();
    let cli = Cli::parse();
    let writer = Writer::new(cli.json);

    let context = Context {
        writer: &writer,
        config_path: cli.config.as_deref(),
    };

    // Argument-free invocation prints the default stage template
    match cli.command {
        None => run(SynthCommand::default(), &context),
        Some(Commands::Synth(cmd)) => run(cmd, &context),
        Some(Commands::Stages(cmd)) => run(cmd, &context),
    }
}
