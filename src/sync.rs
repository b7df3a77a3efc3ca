//! Label Synchronization Functionality
//!
//! Applies the configured labels to the target repository one by one,
//! asking before overwriting a label that already exists.

use colored::Colorize;

use crate::config::LabelConfig;
use crate::error::{Error, Result};
use crate::github::LabelService;
use crate::prompt::Prompter;

/// Types of label synchronization operations
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOperation {
    /// An existing label was deleted before synchronization
    Delete { name: String },

    /// A label was created
    Create { label: LabelConfig },

    /// A conflicting label was overwritten
    Update { label: LabelConfig },

    /// A conflicting label was left as it was
    Skip { name: String },
}

/// Synchronization result
#[derive(Debug, Clone, Default)]
pub struct SyncResult {
    /// List of executed operations
    pub operations: Vec<SyncOperation>,

    /// Number of labels created
    pub created: u32,

    /// Number of labels updated
    pub updated: u32,

    /// Number of labels deleted
    pub deleted: u32,

    /// Number of conflicting labels left untouched
    pub skipped: u32,
}

impl SyncResult {
    /// Create a new empty synchronization result
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an operation and update statistics
    pub fn add_operation(&mut self, operation: SyncOperation) {
        match &operation {
            SyncOperation::Delete { .. } => self.deleted += 1,
            SyncOperation::Create { .. } => self.created += 1,
            SyncOperation::Update { .. } => self.updated += 1,
            SyncOperation::Skip { .. } => self.skipped += 1,
        }
        self.operations.push(operation);
    }

    /// Whether anything changed on the repository
    pub fn has_changes(&self) -> bool {
        self.created > 0 || self.updated > 0 || self.deleted > 0
    }

    /// Get total number of operations
    pub fn total_operations(&self) -> u32 {
        self.created + self.updated + self.deleted + self.skipped
    }
}

/// Label Synchronization Engine
///
/// Creates the configured labels on one repository
pub struct LabelSyncer<'a> {
    service: &'a dyn LabelService,
    prompter: &'a dyn Prompter,
    account: &'a str,
    repo: &'a str,
}

impl<'a> LabelSyncer<'a> {
    /// Create a new label synchronization engine for `account/repo`
    pub fn new(
        service: &'a dyn LabelService,
        prompter: &'a dyn Prompter,
        account: &'a str,
        repo: &'a str,
    ) -> Self {
        Self {
            service,
            prompter,
            account,
            repo,
        }
    }

    /// Synchronize labels
    ///
    /// Labels are handled in list order, one request at a time. A label
    /// whose name is already taken is overwritten only if the user agrees.
    ///
    /// # Errors
    /// Any API failure other than a name conflict aborts the whole run;
    /// labels handled before it stay as they are
    pub async fn sync_labels(&self, labels: &[LabelConfig], result: &mut SyncResult) -> Result<()> {
        for label in labels {
            let operation = self.apply_label(label).await?;
            result.add_operation(operation);
        }

        Ok(())
    }

    /// Create one label, falling back to the overwrite prompt on conflict
    async fn apply_label(&self, label: &LabelConfig) -> Result<SyncOperation> {
        println!("{} Creating label: {}", "+".green(), label.name.cyan());

        match self.service.create_label(self.account, self.repo, label).await {
            Ok(_) => Ok(SyncOperation::Create {
                label: label.clone(),
            }),
            Err(Error::LabelAlreadyExists(_)) => {
                tracing::debug!(name = %label.name, "label already exists");
                let message = format!(
                    "The label '{}' already exists. Should we overwrite it?",
                    label.name
                );

                if self.prompter.confirm(&message, false)?.or_cancel()? {
                    self.service
                        .update_label(self.account, self.repo, label)
                        .await?;
                    Ok(SyncOperation::Update {
                        label: label.clone(),
                    })
                } else {
                    Ok(SyncOperation::Skip {
                        name: label.name.clone(),
                    })
                }
            }
            Err(e) => Err(e),
        }
    }
}
