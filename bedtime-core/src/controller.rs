//! The interactive story session.
//!
//! A session is a small state machine:
//!
//! ```text
//! Generating -> Judging -> Presenting -> AwaitingChoice -+-> Revising -> Presenting
//!                                                        +-> Done
//! ```
//!
//! User lines come from an [`InputSource`] and everything the user sees is
//! written to a caller-supplied writer, so a whole session can be driven
//! from a script in tests.

use crate::gateway::ModelGateway;
use crate::storyteller::{StoryError, Storyteller};
use std::io::{self, BufRead, Write};

/// Where user input comes from.
pub trait InputSource {
    /// Show `prompt` and read one line. `Ok(None)` means end of input.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// Line input from the process's stdin, prompting on stdout.
#[derive(Debug, Default)]
pub struct StdinInput;

impl InputSource for StdinInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let mut stdout = io::stdout();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Whether a reply to the yes/no question means yes.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "yes" | "y")
}

/// Where a session currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the story request.
    Generating,
    /// A fresh story awaits the judge.
    Judging { story: String },
    /// The story is about to be shown. `updated` is set after a user revision.
    Presenting { story: String, updated: bool },
    /// Asking whether the user wants changes.
    AwaitingChoice { story: String },
    /// Reading the change request.
    Revising { story: String },
    /// Finished. `story` is `None` if input ended before a request arrived.
    Done { story: Option<String> },
}

const REQUEST_PROMPT: &str = "🌙 What kind of bedtime story would you like? ";
const CHOICE_PROMPT: &str = "\nWould you like to change anything in the story? (yes/no) ";
const FEEDBACK_HINT: &str =
    "\nTell me what you'd like to change (e.g., 'add a dragon', 'make it funnier'):";
const FEEDBACK_PROMPT: &str = "> ";
const GOODBYE: &str = "\n🌜 Goodnight and sweet dreams! ✨";

/// Drives one interactive storytelling session.
pub struct StoryController<G> {
    storyteller: Storyteller<G>,
}

impl<G: ModelGateway> StoryController<G> {
    pub fn new(storyteller: Storyteller<G>) -> Self {
        Self { storyteller }
    }

    pub fn storyteller(&self) -> &Storyteller<G> {
        &self.storyteller
    }

    /// Run a session to completion and return the final story.
    ///
    /// Gateway failures end the session with an error; everything else the
    /// user types is passed through as-is.
    pub async fn run<I, W>(&self, input: &mut I, out: &mut W) -> Result<Option<String>, StoryError>
    where
        I: InputSource,
        W: Write,
    {
        let mut state = SessionState::Generating;
        loop {
            state = match state {
                SessionState::Done { story } => {
                    writeln!(out, "{GOODBYE}")?;
                    out.flush()?;
                    return Ok(story);
                }
                state => self.step(state, input, out).await?,
            };
        }
    }

    /// Advance the session by one state.
    pub async fn step<I, W>(
        &self,
        state: SessionState,
        input: &mut I,
        out: &mut W,
    ) -> Result<SessionState, StoryError>
    where
        I: InputSource,
        W: Write,
    {
        let next = match state {
            SessionState::Generating => match input.read_line(REQUEST_PROMPT)? {
                Some(request) => SessionState::Judging {
                    story: self.storyteller.generate(&request).await?,
                },
                None => SessionState::Done { story: None },
            },

            SessionState::Judging { story } => SessionState::Presenting {
                story: self.storyteller.evaluate(story, out).await?,
                updated: false,
            },

            SessionState::Presenting { story, updated } => {
                let header = if updated {
                    "✨ Updated story:"
                } else {
                    "⭐ Your bedtime story:"
                };
                writeln!(out, "\n{header}\n")?;
                writeln!(out, "{story}")?;
                out.flush()?;
                SessionState::AwaitingChoice { story }
            }

            SessionState::AwaitingChoice { story } => match input.read_line(CHOICE_PROMPT)? {
                Some(answer) if is_affirmative(&answer) => SessionState::Revising { story },
                _ => SessionState::Done { story: Some(story) },
            },

            SessionState::Revising { story } => {
                writeln!(out, "{FEEDBACK_HINT}")?;
                out.flush()?;
                match input.read_line(FEEDBACK_PROMPT)? {
                    Some(feedback) => SessionState::Presenting {
                        story: self.storyteller.revise(&story, &feedback).await?,
                        updated: true,
                    },
                    None => SessionState::Done { story: Some(story) },
                }
            }

            done @ SessionState::Done { .. } => done,
        };

        tracing::trace!(?next, "session step");
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockGateway, ScriptedInput};

    #[test]
    fn test_affirmative_answers() {
        for answer in ["yes", "Yes", "YES", "y", "Y", "  y ", "\tyes\n"] {
            assert!(is_affirmative(answer), "{answer:?} should be affirmative");
        }
    }

    #[test]
    fn test_negative_answers() {
        for answer in ["no", "", "maybe", "n", "yes please", "ye", " "] {
            assert!(!is_affirmative(answer), "{answer:?} should not be affirmative");
        }
    }

    #[tokio::test]
    async fn test_step_presenting_moves_to_choice() {
        let controller = StoryController::new(Storyteller::new(MockGateway::default()));
        let mut input = ScriptedInput::default();
        let mut out = Vec::new();

        let next = controller
            .step(
                SessionState::Presenting {
                    story: "The end.".to_string(),
                    updated: true,
                },
                &mut input,
                &mut out,
            )
            .await
            .unwrap();

        assert_eq!(
            next,
            SessionState::AwaitingChoice {
                story: "The end.".to_string()
            }
        );
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Updated story:"));
        assert!(out.contains("The end."));
        assert!(controller.storyteller().gateway().calls().is_empty());
    }

    #[tokio::test]
    async fn test_eof_before_request_ends_without_calls() {
        let controller = StoryController::new(Storyteller::new(MockGateway::default()));
        let mut input = ScriptedInput::default();
        let mut out = Vec::new();

        let story = controller.run(&mut input, &mut out).await.unwrap();

        assert_eq!(story, None);
        assert!(controller.storyteller().gateway().calls().is_empty());
        assert!(String::from_utf8(out).unwrap().contains("Goodnight"));
    }

    #[tokio::test]
    async fn test_eof_at_feedback_keeps_story() {
        let controller = StoryController::new(Storyteller::new(MockGateway::default()));
        let mut input = ScriptedInput::default();

        let next = controller
            .step(
                SessionState::Revising {
                    story: "Kept.".to_string(),
                },
                &mut input,
                &mut std::io::sink(),
            )
            .await
            .unwrap();

        assert_eq!(
            next,
            SessionState::Done {
                story: Some("Kept.".to_string())
            }
        );
    }
}
