//! Binary entry point for promptscope.
//!
//! This binary provides the CLI interface for the promptscope capture
//! sidecar.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow stdout/stderr printing in the main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]

use anyhow::Context;
use clap::{Parser, Subcommand};
use promptscope::config::PromptScopeConfig;
use promptscope::hooks::{HookHandler, PromptReadyHandler};
use promptscope::observability::{self, InitOptions};
use promptscope::{CaptureStore, CapturePipeline, FileSink};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Promptscope - a capture and export sidecar for chat prompt structures.
#[derive(Parser)]
#[command(name = "promptscope")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "PROMPTSCOPE_CONFIG_PATH")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Capture a prompt structure payload.
    Capture {
        /// File holding the payload JSON; stdin when omitted.
        file: Option<PathBuf>,

        /// Export the capture as an artifact immediately.
        #[arg(short, long)]
        export: bool,
    },

    /// Handle host hook events.
    Hook {
        /// Hook event type.
        #[command(subcommand)]
        event: HookEvent,
    },

    /// Show status.
    Status,

    /// Manage configuration.
    Config {
        /// Show current configuration.
        #[arg(long)]
        show: bool,
    },
}

/// Hook events.
#[derive(Subcommand)]
enum HookEvent {
    /// Prompt ready hook: payload on stdin, response on stdout.
    PromptReady,
}

/// Main entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    observability::init(InitOptions {
        verbose: cli.verbose || config.debug_mode,
    });

    match run_command(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(cli: Cli, config: PromptScopeConfig) -> anyhow::Result<()> {
    match cli.command {
        Commands::Capture { file, export } => cmd_capture(config, file, export),
        Commands::Hook { event } => cmd_hook(event, config),
        Commands::Status => cmd_status(&config),
        Commands::Config { show } => cmd_config(&config, show),
    }
}

/// Loads configuration, preferring an explicit path over the defaults.
fn load_config(path: Option<&str>) -> anyhow::Result<PromptScopeConfig> {
    if let Some(config_path) = path {
        if !config_path.trim().is_empty() {
            return PromptScopeConfig::load_from_file(std::path::Path::new(config_path))
                .map_err(Into::into);
        }
    }
    Ok(PromptScopeConfig::load_default())
}

/// Builds the pipeline the commands run against.
fn build_pipeline(config: PromptScopeConfig) -> CapturePipeline {
    let sink = Box::new(FileSink::new(&config.output_dir));
    CapturePipeline::new(config, Arc::new(CaptureStore::new()), sink)
}

/// Capture command.
fn cmd_capture(
    config: PromptScopeConfig,
    file: Option<PathBuf>,
    export: bool,
) -> anyhow::Result<()> {
    let payload = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => read_stdin()?,
    };

    let mut handler = PromptReadyHandler::new(build_pipeline(config));
    let response = handler.handle(&payload)?;
    println!("{response}");

    if export {
        let artifact = handler.pipeline_mut().export_now()?;
        println!("Exported: {artifact}");
    }

    Ok(())
}

/// Hook command.
fn cmd_hook(event: HookEvent, config: PromptScopeConfig) -> anyhow::Result<()> {
    let input = read_stdin()?;

    let response = match event {
        HookEvent::PromptReady => {
            let mut handler = PromptReadyHandler::new(build_pipeline(config));
            handler.handle(&input)?
        },
    };

    println!("{response}");
    Ok(())
}

/// Status command.
fn cmd_status(config: &PromptScopeConfig) -> anyhow::Result<()> {
    println!("Promptscope Status");
    println!("==================");
    println!();
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Capture: {}", if config.enabled { "enabled" } else { "disabled" });
    println!(
        "Auto-Export: {}",
        if config.auto_export { "on" } else { "off" }
    );

    let output_status = if config.output_dir.exists() {
        "exists"
    } else {
        "will be created on first export"
    };
    println!("Output Directory: {output_status}");
    println!("  Path: {}", config.output_dir.display());

    println!();
    println!("Use 'promptscope config --show' to view full configuration");

    Ok(())
}

/// Config command.
fn cmd_config(config: &PromptScopeConfig, show: bool) -> anyhow::Result<()> {
    if show {
        println!("Current Configuration");
        println!("=====================");
        println!();
        println!("Enabled: {}", config.enabled);
        println!("Auto-Export: {}", config.auto_export);
        println!("Debug Mode: {}", config.debug_mode);
        println!("Pretty Print: {}", config.pretty_print);
        println!("Include Raw Data: {}", config.include_raw_data);
        println!("Output Directory: {}", config.output_dir.display());
    } else {
        println!("Use --show to display configuration");
    }

    Ok(())
}

/// Reads a payload from stdin, defaulting to an empty JSON object.
fn read_stdin() -> anyhow::Result<String> {
    use std::io::Read;

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    if input.trim().is_empty() {
        Ok("{}".to_string())
    } else {
        Ok(input)
    }
}
