//! Confirmation collaborator for destructive actions.
//!
//! Deleting an entry and resetting the customization are user-confirmed
//! actions; the surrounding application owns the actual prompt.

/// Asks the operator to confirm a destructive action.
#[async_trait::async_trait]
pub trait ConfirmPrompt: Send + Sync {
    /// Present the prompt; `true` means proceed, `false` aborts the
    /// operation entirely with no partial effect.
    async fn confirm(&self, message: &str) -> bool;
}

/// A prompt that approves every request. Suitable for non-interactive
/// callers that gate confirmation elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

#[async_trait::async_trait]
impl ConfirmPrompt for AlwaysConfirm {
    async fn confirm(&self, _message: &str) -> bool {
        true
    }
}

/// A prompt that declines every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConfirm;

#[async_trait::async_trait]
impl ConfirmPrompt for NeverConfirm {
    async fn confirm(&self, _message: &str) -> bool {
        false
    }
}
