use std::path::PathBuf;

use pattybot_core::config::{AppConfig, ConfigOverrides, LoadOptions};

pub fn run(config_path: Option<PathBuf>) -> String {
    let config = match AppConfig::load(LoadOptions {
        config_path,
        overrides: ConfigOverrides::default(),
        require_file: false,
    }) {
        Ok(config) => config,
        Err(error) => {
            return format!(
                "config validation failed: {error}\nhint: run `pattybot doctor` for a full readiness report"
            )
        }
    };

    render(&config)
}

fn render(config: &AppConfig) -> String {
    let api_key = if config.llm.api_key.is_some() { "<set>" } else { "<unset>" };

    [
        "effective config (source precedence: overrides > env > file > default):".to_string(),
        format!("  llm.provider            = {:?}", config.llm.provider),
        format!("  llm.api_key             = {api_key}"),
        format!("  llm.base_url            = {}", config.llm.base_url),
        format!("  llm.model               = {}", config.llm.model),
        format!("  llm.timeout_secs        = {}", config.llm.timeout_secs),
        format!("  llm.max_retries         = {}", config.llm.max_retries),
        format!("  llm.retry_base_delay_ms = {}", config.llm.retry_base_delay_ms),
        format!("  llm.retry_max_delay_ms  = {}", config.llm.retry_max_delay_ms),
        format!("  kiosk.max_tool_iterations = {}", config.kiosk.max_tool_iterations),
        format!("  kiosk.history_window      = {}", config.kiosk.history_window),
        format!("  logging.level  = {}", config.logging.level),
        format!("  logging.format = {:?}", config.logging.format),
    ]
    .join("\n")
}
