//! Full data export document.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Lead, Report, User};

const FILE_PREFIX: &str = "NazoratHub_Backup";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub users: Vec<User>,
    pub reports: Vec<Report>,
    pub leads: Vec<Lead>,
    pub export_date: DateTime<Utc>,
}

impl Backup {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// `NazoratHub_Backup_<YYYY-MM-DD>.json`, stamped with the export date.
    pub fn file_name(&self) -> String {
        file_name_for(self.export_date.date_naive())
    }
}

pub fn file_name_for(date: NaiveDate) -> String {
    format!("{FILE_PREFIX}_{}.json", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn file_name_uses_export_day() {
        let backup = Backup {
            users: vec![],
            reports: vec![],
            leads: vec![],
            export_date: Utc.with_ymd_and_hms(2026, 10, 19, 23, 59, 0).unwrap(),
        };
        assert_eq!(backup.file_name(), "NazoratHub_Backup_2026-10-19.json");
    }

    #[test]
    fn document_keeps_export_date_key() {
        let backup = Backup {
            users: vec![],
            reports: vec![],
            leads: vec![],
            export_date: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        };
        let json = backup.to_json_pretty().unwrap();
        assert!(json.contains("\"exportDate\""));
        assert_eq!(Backup::from_json(&json).unwrap(), backup);
    }
}
