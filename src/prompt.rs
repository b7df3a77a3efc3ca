//! Terminal Prompts
//!
//! Interactive questions asked during a run. Every prompt can be dismissed
//! (Esc or Ctrl-C), which ends the run without touching anything else.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Password, Select};

use crate::error::{Error, Result};

/// Outcome of a single prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer<T> {
    /// The user answered
    Answered(T),

    /// The user dismissed the prompt
    Cancelled,
}

impl<T> Answer<T> {
    /// Unwrap the answer, turning a dismissed prompt into [`Error::Cancelled`]
    pub fn or_cancel(self) -> Result<T> {
        match self {
            Answer::Answered(value) => Ok(value),
            Answer::Cancelled => Err(Error::Cancelled),
        }
    }
}

impl<T> From<Option<T>> for Answer<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Answer::Cancelled, Answer::Answered)
    }
}

/// Source of interactive answers
#[cfg_attr(test, mockall::automock)]
pub trait Prompter {
    /// Ask for free text; an empty answer is allowed
    fn input(&self, message: &str) -> Result<Answer<String>>;

    /// Ask for a secret without echoing it; an empty answer is allowed
    fn secret(&self, message: &str) -> Result<Answer<String>>;

    /// Pick one of `items`, returning its index
    fn select(&self, message: &str, items: &[String]) -> Result<Answer<usize>>;

    /// Ask a yes/no question
    fn confirm(&self, message: &str, default: bool) -> Result<Answer<bool>>;
}

/// Prompter backed by the terminal
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if a dialoguer error is an interrupted error (CTRL+C)
fn is_interrupted_error(err: &dialoguer::Error) -> bool {
    match err {
        dialoguer::Error::IO(error) => error.kind() == std::io::ErrorKind::Interrupted,
    }
}

/// Map a dialoguer result onto an [`Answer`]
fn answer_from<T>(result: std::result::Result<Option<T>, dialoguer::Error>) -> Result<Answer<T>> {
    match result {
        Ok(value) => Ok(value.into()),
        Err(e) if is_interrupted_error(&e) => Ok(Answer::Cancelled),
        Err(e) => Err(e.into()),
    }
}

impl Prompter for TerminalPrompter {
    fn input(&self, message: &str) -> Result<Answer<String>> {
        let result = Input::<String>::with_theme(&self.theme)
            .with_prompt(message)
            .allow_empty(true)
            .interact_text()
            .map(Some);
        answer_from(result)
    }

    fn secret(&self, message: &str) -> Result<Answer<String>> {
        let result = Password::with_theme(&self.theme)
            .with_prompt(message)
            .allow_empty_password(true)
            .interact()
            .map(Some);
        answer_from(result)
    }

    fn select(&self, message: &str, items: &[String]) -> Result<Answer<usize>> {
        if items.is_empty() {
            return Err(Error::config_validation(format!(
                "Nothing to choose from: {}",
                message
            )));
        }

        let result = Select::with_theme(&self.theme)
            .with_prompt(message)
            .items(items)
            .default(0)
            .interact_opt();
        answer_from(result)
    }

    fn confirm(&self, message: &str, default: bool) -> Result<Answer<bool>> {
        let result = Confirm::with_theme(&self.theme)
            .with_prompt(message)
            .default(default)
            .interact_opt();
        answer_from(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_cancel() {
        assert_eq!(Answer::Answered(3).or_cancel().unwrap(), 3);
        let err = Answer::<u8>::Cancelled.or_cancel().unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_answer_from_option() {
        assert_eq!(Answer::from(Some(true)), Answer::Answered(true));
        assert_eq!(Answer::<bool>::from(None), Answer::Cancelled);
    }

    #[test]
    fn test_interrupted_maps_to_cancelled() {
        let interrupted = dialoguer::Error::IO(std::io::Error::new(
            std::io::ErrorKind::Interrupted,
            "ctrl-c",
        ));
        let answer = answer_from::<String>(Err(interrupted)).unwrap();
        assert_eq!(answer, Answer::Cancelled);

        let broken = dialoguer::Error::IO(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "gone",
        ));
        assert!(answer_from::<String>(Err(broken)).is_err());
    }
}
