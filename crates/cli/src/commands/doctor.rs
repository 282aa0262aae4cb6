use std::path::PathBuf;

use pattybot_core::config::{AppConfig, LlmProvider, LoadOptions};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(config_path: Option<PathBuf>, json_output: bool) -> String {
    let report = build_report(config_path);

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report(config_path: Option<PathBuf>) -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions { config_path, ..LoadOptions::default() }) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_api_credentials(&config));
            checks.push(check_endpoint_url(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "llm_credentials",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
            checks.push(DoctorCheck {
                name: "llm_endpoint",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_api_credentials(config: &AppConfig) -> DoctorCheck {
    match (config.llm.provider, config.llm.api_key.is_some()) {
        (LlmProvider::OpenAi, true) => DoctorCheck {
            name: "llm_credentials",
            status: CheckStatus::Pass,
            details: "api key present for the openai provider".to_string(),
        },
        (LlmProvider::OpenAi, false) => DoctorCheck {
            name: "llm_credentials",
            status: CheckStatus::Fail,
            details: "llm.api_key is required when llm.provider = \"openai\"".to_string(),
        },
        (LlmProvider::Ollama, _) => DoctorCheck {
            name: "llm_credentials",
            status: CheckStatus::Pass,
            details: "ollama runs without credentials".to_string(),
        },
    }
}

// Static sanity only. Doctor never sends traffic to the endpoint.
fn check_endpoint_url(config: &AppConfig) -> DoctorCheck {
    let base_url = config.llm.base_url.trim();
    if base_url.starts_with("http://") || base_url.starts_with("https://") {
        DoctorCheck {
            name: "llm_endpoint",
            status: CheckStatus::Pass,
            details: format!("base url `{base_url}` looks reachable by scheme"),
        }
    } else {
        DoctorCheck {
            name: "llm_endpoint",
            status: CheckStatus::Fail,
            details: format!("base url `{base_url}` must start with http:// or https://"),
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
