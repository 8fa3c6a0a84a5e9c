//! Testing utilities.
//!
//! This module provides tools for deterministic tests without API calls:
//! - `MockGateway` returns scripted model replies and records every call
//! - `ScriptedInput` feeds scripted user lines to the story controller

use crate::config::GenerationParams;
use crate::controller::InputSource;
use crate::gateway::{GatewayError, ModelGateway};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A call the mock gateway received.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prompt: String,
    pub params: GenerationParams,
}

/// A model gateway that replies from a script.
///
/// Replies are handed out in order. Once the script runs dry every call
/// fails, which makes a missing reply in a test loud instead of silent.
#[derive(Debug, Default)]
pub struct MockGateway {
    replies: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockGateway {
    /// Create a mock gateway with scripted replies.
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Add a reply to the end of the script.
    pub fn queue_reply(&self, reply: impl Into<String>) {
        lock(&self.replies).push_back(Ok(reply.into()));
    }

    /// Add a failing call to the end of the script.
    pub fn queue_failure(&self, message: impl Into<String>) {
        lock(&self.replies).push_back(Err(message.into()));
    }

    /// Every call received so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Number of calls whose prompt contains `needle`.
    pub fn calls_containing(&self, needle: &str) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|c| c.prompt.contains(needle))
            .count()
    }

    /// Replies not yet handed out.
    pub fn remaining(&self) -> usize {
        lock(&self.replies).len()
    }
}

#[async_trait]
impl ModelGateway for MockGateway {
    async fn call_model(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<String, GatewayError> {
        lock(&self.calls).push(RecordedCall {
            prompt: prompt.to_string(),
            params,
        });

        match lock(&self.replies).pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(GatewayError::Other(message)),
            None => Err(GatewayError::Other(
                "mock gateway has no more scripted replies".to_string(),
            )),
        }
    }
}

/// An input source that replays scripted lines.
///
/// Returns end-of-input once the script is exhausted.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts shown so far, oldest first.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Lines not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl InputSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
