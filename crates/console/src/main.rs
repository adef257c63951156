//! Interactive console for playing chess locally or against the advisor.

mod app;
mod command;
mod config;

use advisor::{AdvisorConfig, GeminiAdvisor};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::config::ConsoleConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Logs go to stderr so they don't interleave with the board on stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = ConsoleConfig::from_env();

    let advisor = match AdvisorConfig::from_env() {
        Ok(advisor_config) => {
            info!(model = %advisor_config.model, "Advisor configured");
            Some(GeminiAdvisor::new(advisor_config)?)
        }
        Err(e) => {
            warn!("{e} - advised games and evaluation disabled");
            None
        }
    };

    let mut app = App::new(config, advisor, std::io::stdout());
    app.greet()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        app.prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if app.handle_line(&line).await?.is_break() {
            break;
        }
    }

    info!("Goodbye");
    Ok(())
}
