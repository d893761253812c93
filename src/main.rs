//! Interpose CLI - run call scripts through generated wrappers
//!
//! Commands:
//!   interpose run <script.json>   - wrap a demo target and run the script's calls
//!   interpose surface <target>    - list the intercepted surface of a demo target

mod cli;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cli::script::{self, Report, Script};
use cli::settings::Settings;
use interpose::Surface;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "interpose")]
#[command(about = "Run call scripts through interpose wrappers", long_about = None)]
struct Cli {
    /// Tracing filter, used when RUST_LOG is unset
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a call script
    Run {
        /// Path to the script (JSON)
        script: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the operations a wrapper around a demo target intercepts
    Surface {
        /// Demo target name
        target: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load().context("failed to load settings")?;
    init_logging(cli.log_level.as_deref().unwrap_or(&settings.log_level));

    match cli.command {
        Commands::Run { script, json } => run_command(&script, json || settings.json),
        Commands::Surface { target } => surface_command(&target),
    }
}

fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_command(path: &Path, json: bool) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let script: Script = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse script {}", path.display()))?;

    let report = script::run(&script)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &Report) {
    println!("{} ({})", report.target, report.mode);
    for call in &report.calls {
        let args = call
            .args
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        match (&call.result, &call.error) {
            (_, Some(error)) => println!("  {}({}) !! {}", call.operation, args, error),
            (Some(result), None) => println!("  {}({}) => {}", call.operation, args, result),
            (None, None) => println!("  {}({})", call.operation, args),
        }
    }
    if !report.events.is_empty() {
        println!("events:");
        for event in &report.events {
            println!("  {}", event);
        }
    }
}

fn surface_command(target: &str) -> anyhow::Result<()> {
    let object = cli::catalog::build(target).ok_or_else(|| {
        anyhow::anyhow!(
            "unknown target '{}' (available: {})",
            target,
            cli::catalog::TARGETS.join(", ")
        )
    })?;
    for name in Surface::of(&object).names() {
        println!("{}", name);
    }
    Ok(())
}
