use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jobtrack_client::action::{RenderHook, TriggerOutcome};
use jobtrack_client::config::Config;
use jobtrack_client::cover_letter::{self, CoverLetterRequest};
use jobtrack_client::transport::HttpTransport;

/// Renders the action lifecycle to the terminal: progress and errors on
/// stderr, the letter itself on stdout so it can be piped.
struct ConsoleRenderer;

impl RenderHook for ConsoleRenderer {
    fn on_working(&self) {
        eprintln!("Generating cover letter...");
    }

    fn on_succeeded(&self, value: &str) {
        println!("{value}");
    }

    fn on_failed(&self, reason: &str) {
        eprintln!("error: {reason}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Logs go to stderr so stdout carries only the letter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{bin}={level},jobtrack_client={level}",
                bin = env!("CARGO_CRATE_NAME"),
                level = &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting jobtrack v{}", env!("CARGO_PKG_VERSION"));

    let mut job_description = String::new();
    tokio::io::stdin()
        .read_to_string(&mut job_description)
        .await
        .context("Failed to read job description from stdin")?;

    let transport = HttpTransport::new(config.base_url.clone(), config.request_timeout)?;
    info!(
        "Cover letter endpoint: {}",
        transport.resolve(cover_letter::GENERATE_ENDPOINT)
    );

    let renderer = Arc::new(ConsoleRenderer);
    let action = match CoverLetterRequest::new(job_description).into_action() {
        Ok(action) => action,
        Err(e) => {
            renderer.on_failed(&e.reason());
            std::process::exit(2);
        }
    };

    let controller = cover_letter::controller(Arc::new(transport), renderer);

    match controller.trigger(action).await {
        TriggerOutcome::Settled(result) if result.ok => Ok(()),
        _ => std::process::exit(1),
    }
}
