use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    pattybot_cli::run().await
}
