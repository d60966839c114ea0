use nh_core::lead::{select_for_distribution, InsufficientPool};
use nh_core::{Lead, UserId, UserRole, WriteOutcome};
use thiserror::Error;
use tracing::info;

use crate::data_service::{DataError, DataService};
use crate::state::WorkingSet;

#[derive(Debug, Error)]
pub enum DistributeLeadsError {
    #[error(transparent)]
    InsufficientPool(#[from] InsufficientPool),

    #[error("{0} is not an operator")]
    UnknownOperator(UserId),

    #[error(transparent)]
    Data(#[from] DataError),
}

/// Moves leads from the general pool to one operator.
pub struct DistributeLeads {
    data: DataService,
}

impl DistributeLeads {
    pub fn new(data: DataService) -> Self {
        Self { data }
    }

    /// Assigns the first `count` pool leads, in working-set order, to
    /// `operator`. A pool smaller than `count` rejects the whole request and
    /// leaves every lead untouched.
    #[tracing::instrument(
        name = "usecase.distribute_leads.execute",
        skip(self, state),
        fields(operator = %operator)
    )]
    pub async fn execute(
        &self,
        state: &mut WorkingSet,
        operator: &UserId,
        count: usize,
    ) -> Result<WriteOutcome, DistributeLeadsError> {
        match state.user(operator) {
            Some(user) if user.role == UserRole::Operator => {}
            _ => return Err(DistributeLeadsError::UnknownOperator(operator.clone())),
        }

        let selected = select_for_distribution(&state.leads, count)?;

        let assigned: Vec<Lead> = state
            .leads
            .iter()
            .filter(|l| selected.contains(&l.id))
            .map(|l| Lead {
                assigned_to: Some(operator.clone()),
                ..l.clone()
            })
            .collect();

        // Working set changes only once every lead is stored.
        let outcome = self.data.save_leads(&assigned).await?;
        for lead in assigned {
            if let Some(slot) = state.lead_mut(&lead.id) {
                *slot = lead;
            }
        }

        info!(assigned = selected.len(), "leads distributed");
        Ok(outcome)
    }
}
