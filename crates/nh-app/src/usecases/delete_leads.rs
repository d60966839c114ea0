use std::sync::Arc;

use nh_core::ports::ConfirmationPort;
use nh_core::{Lead, LeadId, UserId, WriteOutcome};
use tracing::info;

use crate::data_service::{DataError, DataService};
use crate::state::WorkingSet;

/// Which leads a bulk delete targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadScope {
    /// Every lead assigned to one operator, whatever its status.
    Operator(UserId),
    /// Every unassigned lead, whatever its status.
    GeneralPool,
}

impl LeadScope {
    fn matches(&self, lead: &Lead) -> bool {
        match self {
            LeadScope::Operator(op) => lead.is_assigned_to(op),
            LeadScope::GeneralPool => lead.assigned_to.is_none(),
        }
    }

    fn prompt(&self) -> String {
        match self {
            LeadScope::Operator(op) => format!("Delete all leads assigned to operator {op}?"),
            LeadScope::GeneralPool => "Delete every lead in the general pool?".to_string(),
        }
    }
}

/// Result of a confirmed destructive action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deletion {
    Cancelled,
    Completed {
        removed: Vec<LeadId>,
        outcome: WriteOutcome,
    },
}

pub struct DeleteLeads {
    data: DataService,
    confirmation: Arc<dyn ConfirmationPort>,
}

impl DeleteLeads {
    pub fn new(data: DataService, confirmation: Arc<dyn ConfirmationPort>) -> Self {
        Self { data, confirmation }
    }

    /// Asks for confirmation, then deletes the scoped leads from both stores
    /// and the working set. A refusal changes nothing.
    #[tracing::instrument(name = "usecase.delete_leads.execute", skip(self, state))]
    pub async fn execute(
        &self,
        state: &mut WorkingSet,
        scope: LeadScope,
    ) -> Result<Deletion, DataError> {
        if !self.confirmation.confirm(&scope.prompt()).await {
            info!("lead deletion cancelled");
            return Ok(Deletion::Cancelled);
        }

        let deletion = self.data.delete_leads(|lead| scope.matches(lead)).await?;

        // Filter by scope, not by the removed ids: the working set may hold
        // leads the remote read did not return.
        state.leads.retain(|lead| !scope.matches(lead));

        Ok(Deletion::Completed {
            removed: deletion.removed,
            outcome: deletion.outcome,
        })
    }
}
