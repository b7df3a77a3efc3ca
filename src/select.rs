//! Account and Repository Selection
//!
//! Picks the organization and repository the labels are applied to.

use colored::Colorize;

use crate::error::{Error, Result};
use crate::github::LabelService;
use crate::prompt::Prompter;

const ACCOUNT_SELECT_PROMPT: &str = "Please select an organization to select a repo from:";
const REPO_PROMPT: &str =
    "Which repo would you like to add labels to? (Hit Enter to select from a list)";
const REPO_SELECT_PROMPT: &str = "Please select a repo:";

/// Pick one of `choices` through the prompter
fn choose(prompter: &dyn Prompter, message: &str, mut choices: Vec<String>) -> Result<String> {
    let index = prompter.select(message, &choices)?.or_cancel()?;
    if index >= choices.len() {
        return Err(Error::generic(format!(
            "Selection {} out of range ({} choices)",
            index,
            choices.len()
        )));
    }
    Ok(choices.swap_remove(index))
}

/// Let the user pick one of the organizations reachable by the credential
///
/// # Errors
/// If listing fails, no organization is reachable, or the prompt is dismissed
pub async fn select_account(service: &dyn LabelService, prompter: &dyn Prompter) -> Result<String> {
    let organizations = service.list_organizations().await?;
    if organizations.is_empty() {
        return Err(Error::config_validation(
            "No organizations are reachable with this token; set LABEL_AUTH_ORG or --org",
        ));
    }

    let account = choose(prompter, ACCOUNT_SELECT_PROMPT, organizations)?;
    tracing::info!(account = %account, "selected account");
    Ok(account)
}

/// Let the user pick one of the repositories of `account`
///
/// # Errors
/// If listing fails, the account has no repositories, or the prompt is dismissed
pub async fn select_repository_from_list(
    service: &dyn LabelService,
    prompter: &dyn Prompter,
    account: &str,
) -> Result<String> {
    let repositories = service.list_repositories(account).await?;
    if repositories.is_empty() {
        return Err(Error::config_validation(format!(
            "Account '{}' has no repositories",
            account
        )));
    }

    choose(prompter, REPO_SELECT_PROMPT, repositories)
}

/// Ask for the target repository until a valid one is given
///
/// An empty answer switches to list selection; a name that does not exist
/// prints a message and asks again.
///
/// # Errors
/// If a prompt is dismissed, or the existence check fails for any reason
/// other than the repository missing
pub async fn select_repository(
    service: &dyn LabelService,
    prompter: &dyn Prompter,
    account: &str,
) -> Result<String> {
    loop {
        let answer = prompter.input(REPO_PROMPT)?.or_cancel()?;
        let name = answer.trim();

        let repo = if name.is_empty() {
            select_repository_from_list(service, prompter, account).await?
        } else if service.repository_exists(account, name).await? {
            name.to_string()
        } else {
            println!(
                "\n{} The repo name '{}' does not exist. Please enter another.\n",
                "✗".red(),
                name.cyan()
            );
            continue;
        };

        tracing::info!(account, repo = %repo, "selected repository");
        return Ok(repo);
    }
}
