//! Outcome of a mirrored write.

/// Where a write landed.
///
/// Every write reaches the local mirror. `LocalOnly` means the remote half was
/// skipped or failed; nothing is retried, so the caller decides whether to
/// tell the user that the hosted database is behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Synced,
    LocalOnly { reason: String },
}

impl WriteOutcome {
    pub fn is_synced(&self) -> bool {
        matches!(self, WriteOutcome::Synced)
    }

    /// Folds several outcomes: synced only if all of them are.
    pub fn merge(self, other: WriteOutcome) -> WriteOutcome {
        match (self, other) {
            (WriteOutcome::Synced, WriteOutcome::Synced) => WriteOutcome::Synced,
            (WriteOutcome::LocalOnly { reason }, _) | (_, WriteOutcome::LocalOnly { reason }) => {
                WriteOutcome::LocalOnly { reason }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_first_failure() {
        let merged = WriteOutcome::Synced
            .merge(WriteOutcome::LocalOnly { reason: "a".into() })
            .merge(WriteOutcome::LocalOnly { reason: "b".into() });
        assert_eq!(merged, WriteOutcome::LocalOnly { reason: "a".into() });
        assert!(WriteOutcome::Synced.merge(WriteOutcome::Synced).is_synced());
    }
}
