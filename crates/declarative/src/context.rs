//! Provider traits for progress reporting and confirmation
//!
//! These traits allow the declarative crate to be used without
//! depending on a specific terminal UI.

use crate::types::ApplyResult;
use anyhow::Result;

/// Progress callback for execution operations
///
/// Implement this trait to receive progress updates during execution.
pub trait ProgressCallback: Send {
    /// Called before the first change is applied
    fn on_start(&mut self, count: usize);

    /// Called when starting to apply a single change
    fn on_resource_start(&mut self, label: &str, description: &str);

    /// Called when a change completes
    fn on_resource_complete(&mut self, label: &str, result: &ApplyResult);

    /// Called after the last change
    fn on_complete(&mut self);
}

/// Confirmation callback for user interaction
pub trait ConfirmCallback: Send {
    /// Ask the user to confirm an action
    ///
    /// Returns `true` if the user confirmed, `false` otherwise.
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_start(&mut self, _count: usize) {}
    fn on_resource_start(&mut self, _label: &str, _description: &str) {}
    fn on_resource_complete(&mut self, _label: &str, _result: &ApplyResult) {}
    fn on_complete(&mut self) {}
}

/// Auto-confirm callback (always returns true)
pub struct AutoConfirm;

impl ConfirmCallback for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Auto-decline callback (always returns false)
pub struct AutoDecline;

impl ConfirmCallback for AutoDecline {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(false)
    }
}
