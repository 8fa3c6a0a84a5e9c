//! Storyteller - story generation, revision and the judge pass.
//!
//! Wraps a [`ModelGateway`] and a [`StoryConfig`] into the three story
//! operations the session needs. Stories are plain strings; every operation
//! returns a new one instead of editing in place.

use crate::config::StoryConfig;
use crate::gateway::{GatewayError, ModelGateway};
use crate::judge::{judge_story, JudgeOutcome};
use crate::prompts::{refine_story_prompt, story_prompt};
use std::io::Write;
use thiserror::Error;

/// Errors from story operations.
#[derive(Debug, Error)]
pub enum StoryError {
    #[error("Model gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Generates, revises and judges stories through a model gateway.
pub struct Storyteller<G> {
    gateway: G,
    config: StoryConfig,
}

impl<G: ModelGateway> Storyteller<G> {
    /// Create a storyteller with default settings.
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            config: StoryConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: StoryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &StoryConfig {
        &self.config
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Write a new story from the user's request.
    pub async fn generate(&self, user_request: &str) -> Result<String, StoryError> {
        tracing::info!(request_len = user_request.len(), "generating story");
        let story = self
            .gateway
            .call_model(&story_prompt(user_request), self.config.story_params())
            .await?;
        Ok(story)
    }

    /// Rewrite `story` according to `feedback`.
    ///
    /// The feedback may come from the judge or straight from the user; it is
    /// passed through untouched.
    pub async fn revise(&self, story: &str, feedback: &str) -> Result<String, StoryError> {
        tracing::info!(feedback = %feedback, "revising story");
        let revised = self
            .gateway
            .call_model(
                &refine_story_prompt(story, feedback),
                self.config.story_params(),
            )
            .await?;
        Ok(revised)
    }

    /// Run the judge over `story`, revising it when the score is too low.
    ///
    /// Each pass judges the current story once; a low score triggers one
    /// revision, and the revised text is not judged again within that pass.
    /// An unreadable verdict stops the passes and keeps the story unchanged.
    /// Progress is narrated to `out`.
    pub async fn evaluate<W: Write>(
        &self,
        mut story: String,
        out: &mut W,
    ) -> Result<String, StoryError> {
        for pass in 0..self.config.max_auto_revisions {
            let outcome =
                judge_story(&self.gateway, &story, self.config.judge_params()).await?;

            let verdict = match outcome {
                JudgeOutcome::Verdict(verdict) => verdict,
                JudgeOutcome::Unavailable { .. } => {
                    writeln!(out, "Judge failed to parse response.")?;
                    return Ok(story);
                }
            };

            writeln!(out, "\nJudge Score: {}", verdict.score)?;
            writeln!(out, "Judge Feedback: {}", verdict.feedback)?;

            if !verdict.needs_revision(self.config.judge_threshold) {
                writeln!(out, "Judge approved story — no auto refinement needed.")?;
                return Ok(story);
            }

            writeln!(out, "Judge requests improvement — refining story...")?;
            tracing::debug!(pass, score = verdict.score, "automatic revision");
            story = self.revise(&story, &verdict.feedback).await?;
        }

        Ok(story)
    }
}
