use nh_core::{Backup, WriteOutcome};
use tracing::info;

use crate::data_service::{DataError, DataService};

pub struct ExportBackup {
    data: DataService,
}

impl ExportBackup {
    pub fn new(data: DataService) -> Self {
        Self { data }
    }

    #[tracing::instrument(name = "usecase.export_backup.execute", skip(self))]
    pub async fn execute(&self) -> Result<Backup, DataError> {
        let backup = self.data.export_full_backup().await?;
        info!(file = %backup.file_name(), "backup exported");
        Ok(backup)
    }
}

/// Writes a backup document back through the normal upsert paths.
///
/// Records absent from the backup are left alone; the caller reloads the
/// working set afterwards.
pub struct RestoreBackup {
    data: DataService,
}

impl RestoreBackup {
    pub fn new(data: DataService) -> Self {
        Self { data }
    }

    #[tracing::instrument(name = "usecase.restore_backup.execute", skip(self, backup))]
    pub async fn execute(&self, backup: &Backup) -> Result<WriteOutcome, DataError> {
        self.data.restore_backup(backup).await
    }
}
