//! Session Resolution
//!
//! Completes the session configuration by asking for whatever the command
//! line and environment did not provide.

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::prompt::Prompter;

const TOKEN_PROMPT: &str = "What is your personal auth token?";
const ACCOUNT_PROMPT: &str =
    "What organization would you like to use? (Hit Enter to select from a list)";

/// Fill in the credential and account, prompting when they are missing
///
/// An empty credential answer ends the run like a cancelled prompt. An empty
/// account answer is kept: the account is then picked from a list once the
/// client exists.
///
/// # Errors
/// [`Error::Cancelled`] if a prompt is dismissed, or a prompt I/O error
pub fn resolve_session(
    mut session: SessionConfig,
    prompter: &dyn Prompter,
) -> Result<SessionConfig> {
    if session.access_token.trim().is_empty() {
        let token = prompter.secret(TOKEN_PROMPT)?.or_cancel()?;
        let token = token.trim();
        if token.is_empty() {
            tracing::debug!("empty access token, stopping");
            return Err(Error::Cancelled);
        }
        session.access_token = token.to_string();
    }

    if session.account.trim().is_empty() {
        let account = prompter.input(ACCOUNT_PROMPT)?.or_cancel()?;
        session.account = account.trim().to_string();
    }

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_API_URL;
    use crate::prompt::{Answer, MockPrompter};

    fn empty_session() -> SessionConfig {
        SessionConfig {
            access_token: String::new(),
            account: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    #[test]
    fn test_complete_session_asks_nothing() {
        let prompter = MockPrompter::new();
        let session = SessionConfig {
            access_token: "token".to_string(),
            account: "acme".to_string(),
            ..empty_session()
        };

        let resolved = resolve_session(session.clone(), &prompter).unwrap();
        assert_eq!(resolved, session);
    }

    #[test]
    fn test_prompts_for_missing_values() {
        let mut prompter = MockPrompter::new();
        prompter
            .expect_secret()
            .times(1)
            .returning(|_| Ok(Answer::Answered(" token \n".to_string())));
        prompter
            .expect_input()
            .times(1)
            .returning(|_| Ok(Answer::Answered("acme".to_string())));

        let resolved = resolve_session(empty_session(), &prompter).unwrap();
        assert_eq!(resolved.access_token, "token");
        assert_eq!(resolved.account, "acme");
    }

    #[test]
    fn test_empty_token_cancels() {
        let mut prompter = MockPrompter::new();
        prompter
            .expect_secret()
            .returning(|_| Ok(Answer::Answered(String::new())));
        prompter.expect_input().never();

        let err = resolve_session(empty_session(), &prompter).unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_dismissed_token_prompt_cancels() {
        let mut prompter = MockPrompter::new();
        prompter.expect_secret().returning(|_| Ok(Answer::Cancelled));
        prompter.expect_input().never();

        let err = resolve_session(empty_session(), &prompter).unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_empty_account_is_kept() {
        let mut prompter = MockPrompter::new();
        prompter
            .expect_input()
            .returning(|_| Ok(Answer::Answered(String::new())));
        let session = SessionConfig {
            access_token: "token".to_string(),
            ..empty_session()
        };

        let resolved = resolve_session(session, &prompter).unwrap();
        assert!(resolved.account.is_empty());
    }

    #[test]
    fn test_dismissed_account_prompt_cancels() {
        let mut prompter = MockPrompter::new();
        prompter.expect_input().returning(|_| Ok(Answer::Cancelled));
        let session = SessionConfig {
            access_token: "token".to_string(),
            ..empty_session()
        };

        assert!(resolve_session(session, &prompter)
            .unwrap_err()
            .is_cancelled());
    }
}
