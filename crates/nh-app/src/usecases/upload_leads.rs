use nh_core::{Lead, LeadStatus, UserId, WriteOutcome};
use tracing::info;

use crate::data_service::{DataError, DataService};
use crate::state::WorkingSet;

/// Adds a batch of leads, optionally pre-assigned to one operator.
pub struct UploadLeads {
    data: DataService,
}

impl UploadLeads {
    pub fn new(data: DataService) -> Self {
        Self { data }
    }

    #[tracing::instrument(
        name = "usecase.upload_leads.execute",
        skip(self, state, leads),
        fields(count = leads.len())
    )]
    pub async fn execute(
        &self,
        state: &mut WorkingSet,
        leads: Vec<Lead>,
        operator: Option<UserId>,
    ) -> Result<WriteOutcome, DataError> {
        let stamped: Vec<Lead> = leads
            .into_iter()
            .map(|lead| Lead {
                assigned_to: operator.clone(),
                status: LeadStatus::New,
                ..lead
            })
            .collect();

        let outcome = self.data.save_leads(&stamped).await?;
        info!(count = stamped.len(), operator = ?operator, "leads uploaded");
        state.leads.extend(stamped);
        Ok(outcome)
    }
}
