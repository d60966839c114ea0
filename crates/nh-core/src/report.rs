//! Visit reports. A report is immutable once created.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{LeadId, ReportId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: ReportId,
    pub operator_name: String,
    pub visit_status: String,
    /// Free-text summary of the work done during the visit.
    pub tasks_completed: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub lead_id: Option<LeadId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_reference_is_optional() {
        let report: Report = serde_json::from_str(
            r#"{"id":"r1","operatorName":"Jasur","visitStatus":"visited","tasksCompleted":"met client","timestamp":"2026-03-01T09:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(report.lead_id, None);
        assert_eq!(report.operator_name, "Jasur");

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value.get("leadId"), Some(&serde_json::Value::Null));
    }
}
