//! Story generation settings.
//!
//! Defaults are tuned for short bedtime stories. Every knob can be
//! overridden through the builder methods or, at startup, through
//! `BEDTIME_*` environment variables.

use std::str::FromStr;
use thiserror::Error;

/// Model used when nothing else is configured.
pub const DEFAULT_MODEL: &str = "claude-3-5-haiku-20241022";

/// Errors from reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Sampling parameters for a single gateway call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    /// Maximum output length in tokens.
    pub max_output_tokens: usize,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_output_tokens: 700,
            temperature: 0.5,
        }
    }
}

/// Configuration for a storytelling session.
#[derive(Debug, Clone)]
pub struct StoryConfig {
    /// Model identifier sent with every request.
    pub model: String,

    /// Maximum tokens for any single response.
    pub max_tokens: usize,

    /// Temperature for story generation and revision.
    pub temperature: f32,

    /// Temperature for judge calls. Kept low so scoring stays literal.
    pub judge_temperature: f32,

    /// Stories scoring at or above this are left alone.
    pub judge_threshold: f64,

    /// Judge-and-revise passes after generation. Zero skips the judge.
    pub max_auto_revisions: usize,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 700,
            temperature: 0.5,
            judge_temperature: 0.2,
            judge_threshold: 8.0,
            max_auto_revisions: 1,
        }
    }
}

impl StoryConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with any `BEDTIME_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overlaid with values from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(model) = lookup("BEDTIME_MODEL") {
            let model = model.trim();
            if !model.is_empty() {
                config.model = model.to_string();
            }
        }
        if let Some(value) = parse_var(&lookup, "BEDTIME_MAX_TOKENS")? {
            config.max_tokens = value;
        }
        if let Some(value) = parse_finite(&lookup, "BEDTIME_TEMPERATURE")? {
            config.temperature = value;
        }
        if let Some(value) = parse_finite(&lookup, "BEDTIME_JUDGE_THRESHOLD")? {
            config.judge_threshold = value;
        }
        if let Some(value) = parse_var(&lookup, "BEDTIME_AUTO_REVISIONS")? {
            config.max_auto_revisions = value;
        }

        Ok(config)
    }

    /// Set the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set max tokens for responses.
    pub fn with_max_tokens(mut self, tokens: usize) -> Self {
        self.max_tokens = tokens;
        self
    }

    /// Set temperature for story generation.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = temp;
        self
    }

    /// Set temperature for judge calls.
    pub fn with_judge_temperature(mut self, temp: f32) -> Self {
        self.judge_temperature = temp;
        self
    }

    /// Set the score a story needs to skip automatic revision.
    pub fn with_judge_threshold(mut self, threshold: f64) -> Self {
        self.judge_threshold = threshold;
        self
    }

    /// Set how many judge-and-revise passes run after generation.
    pub fn with_max_auto_revisions(mut self, passes: usize) -> Self {
        self.max_auto_revisions = passes;
        self
    }

    /// Parameters for generation and revision calls.
    pub fn story_params(&self) -> GenerationParams {
        GenerationParams {
            max_output_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// Parameters for judge calls.
    pub fn judge_params(&self) -> GenerationParams {
        GenerationParams {
            max_output_tokens: self.max_tokens,
            temperature: self.judge_temperature,
        }
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            var,
            value: raw.clone(),
            reason: e.to_string(),
        })
}

/// Like [`parse_var`], but rejects NaN and infinities.
fn parse_finite<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Into<f64> + Copy,
    T::Err: std::fmt::Display,
{
    match parse_var::<F, T>(lookup, var)? {
        Some(value) if !value.into().is_finite() => Err(ConfigError::InvalidValue {
            var,
            value: lookup(var).unwrap_or_default(),
            reason: "must be a finite number".to_string(),
        }),
        parsed => Ok(parsed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StoryConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, 700);
        assert_eq!(config.temperature, 0.5);
        assert_eq!(config.judge_temperature, 0.2);
        assert_eq!(config.judge_threshold, 8.0);
        assert_eq!(config.max_auto_revisions, 1);
    }

    #[test]
    fn test_params() {
        let config = StoryConfig::new().with_max_tokens(300).with_temperature(0.9);
        assert_eq!(
            config.story_params(),
            GenerationParams {
                max_output_tokens: 300,
                temperature: 0.9,
            }
        );
        assert_eq!(config.judge_params().temperature, 0.2);
        assert_eq!(config.judge_params().max_output_tokens, 300);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = StoryConfig::from_lookup(lookup_from(&[
            ("BEDTIME_MODEL", "claude-test"),
            ("BEDTIME_MAX_TOKENS", "1024"),
            ("BEDTIME_JUDGE_THRESHOLD", "7.5"),
            ("BEDTIME_AUTO_REVISIONS", " 2 "),
        ]))
        .unwrap();

        assert_eq!(config.model, "claude-test");
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.judge_threshold, 7.5);
        assert_eq!(config.max_auto_revisions, 2);
        assert_eq!(config.temperature, 0.5);
    }

    #[test]
    fn test_from_lookup_empty_values_keep_defaults() {
        let config = StoryConfig::from_lookup(lookup_from(&[
            ("BEDTIME_MODEL", "  "),
            ("BEDTIME_MAX_TOKENS", ""),
        ]))
        .unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, 700);
    }

    #[test]
    fn test_from_lookup_rejects_non_finite_numbers() {
        for (var, raw) in [
            ("BEDTIME_JUDGE_THRESHOLD", "NaN"),
            ("BEDTIME_JUDGE_THRESHOLD", "inf"),
            ("BEDTIME_TEMPERATURE", "NaN"),
            ("BEDTIME_TEMPERATURE", "-inf"),
        ] {
            let err = StoryConfig::from_lookup(lookup_from(&[(var, raw)])).unwrap_err();
            match err {
                ConfigError::InvalidValue { var: bad, value, .. } => {
                    assert_eq!(bad, var);
                    assert_eq!(value, raw);
                }
            }
        }
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = StoryConfig::from_lookup(lookup_from(&[("BEDTIME_AUTO_REVISIONS", "lots")]))
            .unwrap_err();
        match err {
            ConfigError::InvalidValue { var, value, .. } => {
                assert_eq!(var, "BEDTIME_AUTO_REVISIONS");
                assert_eq!(value, "lots");
            }
        }
    }
}
