use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use lexis_config::Config;
use lexis_core::api::{self, ApiResponse};
use tracing_subscriber::EnvFilter;

pub mod cli;
pub mod state;


use self::cli::{Cli, Command};
use self::state::AppState;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match run(cli, Config::new()).await {
        Ok(response) => {
            match serde_json::to_string_pretty(&response.body) {
                Ok(body) => println!("{body}"),
                Err(e) => tracing::error!("Failed to render response: {e}"),
            }

            if response.status == 200 {
                ExitCode::SUCCESS
            } else {
                tracing::warn!("Request finished with status {}", response.status);
                ExitCode::from(1)
            }
        }
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<ApiResponse> {
    let state = AppState::new(config).await?;
    let requester = cli.identity.requester();

    let response = match cli.command {
        Command::Lookup { word } => api::lookup_word(&state.lookup, &word, requester.as_ref()).await,
        Command::UploadIcon { entry, file } => {
            let requester = requester.context("--user is required to upload icons")?;
            let image = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            api::upload_icon(&state.icons, &entry, &image, &requester).await
        }
        Command::ApproveIcon { id } => {
            let requester = requester.context("--user is required to approve icons")?;
            api::approve_icon(&state.icons, id, &requester).await
        }
        Command::PendingIcons => {
            let requester = requester.context("--user is required to list icons")?;
            api::pending_icons(&state.icons, &requester).await
        }
        Command::Audio { key } => api::pronunciation(&state.audio, &key).await,
    };

    state.report_calls();
    Ok(response)
}
