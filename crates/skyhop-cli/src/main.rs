//! Skyhop CLI - Headless driver for the Skyhop gameplay core

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{check, simulate, OutputFormat};
use skyhop_input::Action;

#[derive(Parser)]
#[command(name = "skyhop")]
#[command(about = "Run Skyhop maps headless and inspect the result", long_about = None)]
#[command(version)]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a map for a number of frames and print the final state
    Simulate {
        /// Path to map file
        map: String,

        /// Path to a TOML game config
        #[arg(long)]
        config: Option<String>,

        /// Number of frames to run
        #[arg(long, default_value = "120")]
        frames: u64,

        /// Seconds per frame
        #[arg(long, default_value = "0.016666668")]
        dt: f32,

        /// Hold an action for the whole run: action[:controller]
        #[arg(long, value_parser = parse_hold)]
        hold: Vec<(Action, usize)>,

        /// Press an action for one frame: action@frame[:controller]
        #[arg(long, value_parser = parse_tap)]
        tap: Vec<(Action, u64, usize)>,

        /// Print the draw calls of the final frame
        #[arg(long)]
        render: bool,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Load a map and report what it contains
    Check {
        /// Path to map file
        map: String,

        /// Path to a TOML game config
        #[arg(long)]
        config: Option<String>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
}

/// Split an optional `:controller` suffix
fn split_controller(s: &str) -> Result<(&str, usize), String> {
    match s.split_once(':') {
        Some((head, ctrl)) => {
            let ctrl = ctrl
                .parse()
                .map_err(|e| format!("invalid controller '{}': {}", ctrl, e))?;
            Ok((head, ctrl))
        }
        None => Ok((s, 0)),
    }
}

fn parse_hold(s: &str) -> Result<(Action, usize), String> {
    let (action, ctrl) = split_controller(s)?;
    let action = action.parse::<Action>().map_err(|e| e.to_string())?;
    Ok((action, ctrl))
}

fn parse_tap(s: &str) -> Result<(Action, u64, usize), String> {
    let (head, ctrl) = split_controller(s)?;
    let (action, frame) = head
        .split_once('@')
        .ok_or_else(|| format!("expected action@frame, got '{}'", head))?;
    let action = action.parse::<Action>().map_err(|e| e.to_string())?;
    let frame = frame
        .parse()
        .map_err(|e| format!("invalid frame '{}': {}", frame, e))?;
    Ok((action, frame, ctrl))
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Commands::Simulate {
            map,
            config,
            frames,
            dt,
            hold,
            tap,
            render,
            format,
        } => simulate::run(simulate::SimulateArgs {
            map,
            config,
            frames,
            dt,
            hold,
            tap,
            render,
            format,
        }),
        Commands::Check {
            map,
            config,
            format,
        } => check::run(&map, config.as_deref(), format),
    }
}
