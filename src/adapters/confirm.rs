use async_trait::async_trait;
use nh_core::ports::ConfirmationPort;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;

/// Asks on the terminal; only `y` or `yes` confirms.
pub struct StdinConfirmation;

#[async_trait]
impl ConfirmationPort for StdinConfirmation {
    async fn confirm(&self, prompt: &str) -> bool {
        let mut stdout = tokio::io::stdout();
        if stdout.write_all(format!("{prompt} [y/N] ").as_bytes()).await.is_err()
            || stdout.flush().await.is_err()
        {
            return false;
        }

        let mut answer = String::new();
        match BufReader::new(tokio::io::stdin()).read_line(&mut answer).await {
            Ok(_) => is_yes(&answer),
            Err(err) => {
                warn!(error = %err, "failed to read confirmation, treating as no");
                false
            }
        }
    }
}

/// Confirms everything. Used for `--yes`.
pub struct AssumeYes;

#[async_trait]
impl ConfirmationPort for AssumeYes {
    async fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
