//! Bedtime story generator with an AI judge.
//!
//! This crate provides:
//! - Prompt templates for writing, revising and judging children's stories
//! - A [`ModelGateway`] trait with a Claude-backed implementation
//! - A judge pass that scores a story and may trigger one automatic revision
//! - An interactive session state machine driven by any [`InputSource`]
//!
//! # Quick Start
//!
//! ```ignore
//! use bedtime_core::{ClaudeGateway, StdinInput, StoryConfig, StoryController, Storyteller};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoryConfig::from_env()?;
//!     let api_key = std::env::var("ANTHROPIC_API_KEY").ok();
//!     let gateway = ClaudeGateway::new(api_key, config.model.clone())?;
//!
//!     let controller = StoryController::new(Storyteller::new(gateway).with_config(config));
//!     controller.run(&mut StdinInput, &mut std::io::stdout()).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod controller;
pub mod gateway;
pub mod judge;
pub mod prompts;
pub mod storyteller;
pub mod testing;

// Primary public API
pub use config::{ConfigError, GenerationParams, StoryConfig};
pub use controller::{is_affirmative, InputSource, SessionState, StdinInput, StoryController};
pub use gateway::{ClaudeGateway, GatewayError, ModelGateway};
pub use judge::{parse_verdict, JudgeOutcome, Verdict};
pub use storyteller::{StoryError, Storyteller};
pub use testing::{MockGateway, ScriptedInput};
