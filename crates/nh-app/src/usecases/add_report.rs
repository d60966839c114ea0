use nh_core::{Lead, LeadId, LeadStatus, Report, ReportId, WriteOutcome};
use tracing::debug;

use crate::data_service::{DataError, DataService};
use crate::state::WorkingSet;

/// Fields an operator fills in; id and timestamp are stamped on submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDraft {
    pub operator_name: String,
    pub visit_status: String,
    pub tasks_completed: String,
    pub lead_id: Option<LeadId>,
}

pub struct AddReport {
    data: DataService,
}

impl AddReport {
    pub fn new(data: DataService) -> Self {
        Self { data }
    }

    /// Stores the report and marks the referenced lead, if it is in the
    /// working set, as called.
    #[tracing::instrument(name = "usecase.add_report.execute", skip(self, state, draft))]
    pub async fn execute(
        &self,
        state: &mut WorkingSet,
        draft: ReportDraft,
    ) -> Result<(Report, WriteOutcome), DataError> {
        let report = Report {
            id: ReportId::new(),
            operator_name: draft.operator_name,
            visit_status: draft.visit_status,
            tasks_completed: draft.tasks_completed,
            timestamp: self.data.now(),
            lead_id: draft.lead_id,
        };

        let mut outcome = self.data.save_report(&report).await?;
        state.reports.insert(0, report.clone());

        if let Some(lead_id) = report.lead_id.as_ref() {
            let referenced = state.leads.iter().find(|l| &l.id == lead_id).cloned();
            match referenced {
                Some(lead) => {
                    let called = Lead {
                        status: LeadStatus::Called,
                        ..lead
                    };
                    outcome = outcome.merge(self.data.update_lead(&called).await?);
                    if let Some(slot) = state.lead_mut(lead_id) {
                        *slot = called;
                    }
                }
                None => debug!(lead_id = %lead_id, "report references a lead outside the working set"),
            }
        }

        Ok((report, outcome))
    }
}
