//! Existing Label Audit
//!
//! Offers to clear the labels already present on the target repository.

use colored::Colorize;

use crate::error::Result;
use crate::github::LabelService;
use crate::prompt::Prompter;

/// List the labels on `account/repo` and delete them all if the user agrees
///
/// Deletion is sequential and stops at the first failure, leaving whatever
/// was already deleted gone.
///
/// # Returns
/// Names of the deleted labels, in deletion order (empty when declined)
///
/// # Errors
/// If listing or any deletion fails, or the prompt is dismissed
pub async fn audit_existing_labels(
    service: &dyn LabelService,
    prompter: &dyn Prompter,
    account: &str,
    repo: &str,
) -> Result<Vec<String>> {
    let existing = service.list_labels(account, repo).await?;
    tracing::debug!(account, repo, count = existing.len(), "existing labels");
    if existing.is_empty() {
        return Ok(Vec::new());
    }

    let message = format!(
        "This repo already has {} labels. Should we delete these existing labels?",
        existing.len()
    );
    if !prompter.confirm(&message, false)?.or_cancel()? {
        tracing::info!(account, repo, "keeping existing labels");
        return Ok(Vec::new());
    }

    let mut deleted = Vec::with_capacity(existing.len());
    for label in existing {
        println!("{} Deleting label: {}", "-".red(), label.name.cyan());
        service.delete_label(account, repo, &label.name).await?;
        deleted.push(label.name);
    }

    tracing::info!(
        account,
        repo,
        count = deleted.len(),
        "deleted existing labels"
    );
    Ok(deleted)
}
