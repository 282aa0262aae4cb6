pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use pattybot_core::config::AppConfig;

#[derive(Debug, Parser)]
#[command(
    name = "pattybot",
    about = "Conversational burger-kiosk assistant",
    long_about = "Chat with the kiosk, browse the menu, and inspect kiosk configuration.",
    after_help = "Examples:\n  pattybot\n  pattybot menu\n  pattybot doctor --json"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a pattybot.toml config file")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Start an interactive ordering session (the default)")]
    Chat,
    #[command(about = "Print the menu grouped by category")]
    Menu,
    #[command(about = "Inspect effective configuration values with secret redaction")]
    Config,
    #[command(about = "Validate config and LLM endpoint readiness checks")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => match commands::chat::run(cli.config).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                eprintln!("pattybot: {error:#}");
                ExitCode::FAILURE
            }
        },
        Command::Menu => {
            println!("{}", commands::menu::run());
            ExitCode::SUCCESS
        }
        Command::Config => {
            println!("{}", commands::config::run(cli.config));
            ExitCode::SUCCESS
        }
        Command::Doctor { json } => {
            println!("{}", commands::doctor::run(cli.config, json));
            ExitCode::SUCCESS
        }
    }
}

pub fn init_logging(config: &AppConfig) {
    use pattybot_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}
