use async_trait::async_trait;

/// Asks the person at the keyboard to confirm a destructive action.
#[async_trait]
pub trait ConfirmationPort: Send + Sync {
    /// `false` cancels the action with no state change.
    async fn confirm(&self, prompt: &str) -> bool;
}
