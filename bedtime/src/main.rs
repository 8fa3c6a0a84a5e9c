//! Bedtime story generator.
//!
//! Asks for a story idea, has Claude write and judge the story, then keeps
//! revising it for as long as the listener wants changes.
//!
//! ```bash
//! ANTHROPIC_API_KEY=... cargo run -p bedtime
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=bedtime_core=debug` to see model calls.

use anyhow::Context;
use bedtime_core::{ClaudeGateway, StdinInput, StoryConfig, StoryController, Storyteller};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bedtime=warn,bedtime_core=warn,claude=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = StoryConfig::from_env().context("reading BEDTIME_* settings")?;

    let api_key = std::env::var("ANTHROPIC_API_KEY").ok();
    if api_key.is_none() {
        tracing::warn!("ANTHROPIC_API_KEY is not set; story requests will fail");
        eprintln!("Warning: ANTHROPIC_API_KEY environment variable not set.");
        eprintln!("Please set it in .env file or with: export ANTHROPIC_API_KEY=your_key_here");
    }

    let gateway =
        ClaudeGateway::new(api_key, config.model.clone()).context("creating model gateway")?;
    tracing::info!(model = %config.model, "starting story session");

    let controller = StoryController::new(Storyteller::new(gateway).with_config(config));
    controller
        .run(&mut StdinInput, &mut std::io::stdout())
        .await
        .context("story session failed")?;

    Ok(())
}
