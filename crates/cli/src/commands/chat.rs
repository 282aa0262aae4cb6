use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use pattybot_agent::llm::OpenAiCompatClient;
use pattybot_agent::runtime::AgentRuntime;
use pattybot_agent::tools::KioskState;
use pattybot_core::config::{AppConfig, LoadOptions};
use pattybot_core::menu::Menu;
use pattybot_core::validation::validate_order;

const EXIT_KEYWORDS: &[&str] = &["exit", "quit", "bye"];
const CANCEL_KEYWORDS: &[&str] = &["cancel", "reset", "start over"];

pub async fn run(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = AppConfig::load(LoadOptions { config_path, ..LoadOptions::default() })
        .context("failed to load configuration")?;
    crate::init_logging(&config);

    let llm = OpenAiCompatClient::from_config(&config.llm)
        .map_err(|error| anyhow::anyhow!("failed to build llm client: {error}"))?;
    let state = KioskState::new(Menu::standard());
    let mut runtime = AgentRuntime::new(Arc::new(llm), state, &config);

    tracing::info!(
        event_name = "cli.chat.session_started",
        model = %config.llm.model,
        "interactive session started"
    );

    println!("Welcome to Pattybot! I can take your burger order.");
    println!("Type `menu` in chat to hear the options, `cancel` to start over,");
    println!("or `exit` when you are done.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let input = tokio::select! {
            line = prompt_line(&mut lines, "\nYou: ") => line?,
            _ = tokio::signal::ctrl_c() => {
                println!();
                None
            }
        };

        let Some(input) = input else {
            // EOF or interrupt ends the session like an explicit exit.
            finish_session(&mut runtime, &mut lines).await?;
            return Ok(());
        };

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let lowered = input.to_lowercase();
        if EXIT_KEYWORDS.contains(&lowered.as_str()) {
            finish_session(&mut runtime, &mut lines).await?;
            return Ok(());
        }
        if CANCEL_KEYWORDS.contains(&lowered.as_str()) {
            runtime.reset().await;
            println!("Kiosk: No problem, I've cleared your order. What would you like?");
            continue;
        }

        let reply = runtime.handle_turn(input).await;
        println!("Kiosk: {}", reply.message);
        if let Some(total) = reply.order_total {
            println!("       Current total: ${total}");
        }
    }
}

/// Offer to confirm a non-empty order before the customer walks away.
async fn finish_session(
    runtime: &mut AgentRuntime,
    lines: &mut Lines<BufReader<Stdin>>,
) -> anyhow::Result<()> {
    let pending = {
        let order = runtime.state().order.lock().await;
        !order.is_empty()
    };

    if pending {
        let answer = prompt_line(
            lines,
            "\nYou still have items in your order. Confirm it before you go? (yes/no): ",
        )
        .await?
        .unwrap_or_default();

        if matches!(answer.trim().to_lowercase().as_str(), "yes" | "y") {
            let menu = runtime.state().menu.clone();
            let mut order = runtime.state().order.lock().await;
            let report = validate_order(&order, &menu);
            for warning in &report.warnings {
                println!("Note: {warning}");
            }
            match order.confirm() {
                Ok(()) => {
                    println!("\n{}", order.receipt());
                    println!("Order {} confirmed. It'll be right up!", order.id.0);
                }
                Err(error) => println!("Sorry, I couldn't confirm that order: {error}"),
            }
        } else {
            println!("Okay, I won't place the order.");
        }
    }

    tracing::info!(event_name = "cli.chat.session_ended", "interactive session ended");
    println!("Thanks for visiting Pattybot. Goodbye!");
    Ok(())
}

async fn prompt_line(
    lines: &mut Lines<BufReader<Stdin>>,
    prompt: &str,
) -> anyhow::Result<Option<String>> {
    print!("{prompt}");
    std::io::stdout().flush().context("failed to flush stdout")?;
    lines.next_line().await.context("failed to read from stdin")
}
