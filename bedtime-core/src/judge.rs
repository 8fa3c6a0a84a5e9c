//! The story judge.
//!
//! The judge is a second model call that scores a story against the rubric in
//! [`crate::prompts::judge_prompt`]. Its reply is soft-contracted JSON, so
//! parsing never fails loudly: a reply that doesn't fit becomes
//! [`JudgeOutcome::Unavailable`] and the caller keeps the story as it is.

use crate::config::GenerationParams;
use crate::gateway::{GatewayError, ModelGateway};
use crate::prompts::judge_prompt;
use serde::Deserialize;

/// A parsed judge verdict.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Verdict {
    /// Nominally 0–10. Not range checked.
    pub score: f64,
    /// One sentence on what to improve.
    pub feedback: String,
}

impl Verdict {
    /// Whether the story scored below `threshold`.
    pub fn needs_revision(&self, threshold: f64) -> bool {
        self.score < threshold
    }
}

/// Result of asking the judge about a story.
#[derive(Debug, Clone, PartialEq)]
pub enum JudgeOutcome {
    /// The judge replied with a usable verdict.
    Verdict(Verdict),
    /// The reply could not be read as a verdict.
    Unavailable { reason: String },
}

impl JudgeOutcome {
    pub fn verdict(&self) -> Option<&Verdict> {
        match self {
            JudgeOutcome::Verdict(v) => Some(v),
            JudgeOutcome::Unavailable { .. } => None,
        }
    }
}

/// Interpret a raw judge reply.
///
/// Accepts a bare JSON object, or one wrapped in a single Markdown code
/// fence. Extra fields are ignored; a missing or non-numeric `score` or a
/// missing `feedback` makes the verdict unavailable.
pub fn parse_verdict(raw: &str) -> JudgeOutcome {
    let body = strip_code_fence(raw.trim());
    match serde_json::from_str::<Verdict>(body) {
        Ok(verdict) => JudgeOutcome::Verdict(verdict),
        Err(e) => JudgeOutcome::Unavailable {
            reason: e.to_string(),
        },
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(rest) = rest.strip_suffix("```") else {
        return text;
    };
    // The body is a JSON object, so any leading letters are the info string ("json").
    rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()).trim()
}

/// Ask the model to judge `story`.
///
/// Gateway failures propagate; unreadable replies do not.
pub async fn judge_story<G>(
    gateway: &G,
    story: &str,
    params: GenerationParams,
) -> Result<JudgeOutcome, GatewayError>
where
    G: ModelGateway + ?Sized,
{
    let reply = gateway.call_model(&judge_prompt(story), params).await?;
    let outcome = parse_verdict(&reply);

    match &outcome {
        JudgeOutcome::Verdict(v) => {
            tracing::info!(score = v.score, feedback = %v.feedback, "judge verdict");
        }
        JudgeOutcome::Unavailable { reason } => {
            tracing::warn!(%reason, reply_len = reply.len(), "judge reply was not a verdict");
        }
    }

    Ok(outcome)
}
