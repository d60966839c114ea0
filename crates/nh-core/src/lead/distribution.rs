use thiserror::Error;

use super::Lead;
use crate::ids::LeadId;

/// The unassigned pool cannot satisfy a distribution request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("only {available} leads remain in the pool, {requested} requested")]
pub struct InsufficientPool {
    pub available: usize,
    pub requested: usize,
}

/// Picks the first `count` pool leads in their current order.
///
/// All-or-nothing: when the pool holds fewer than `count` leads nothing is
/// selected and [`InsufficientPool`] is returned.
pub fn select_for_distribution(leads: &[Lead], count: usize) -> Result<Vec<LeadId>, InsufficientPool> {
    let pool: Vec<&Lead> = leads.iter().filter(|l| l.is_in_pool()).collect();
    if pool.len() < count {
        return Err(InsufficientPool {
            available: pool.len(),
            requested: count,
        });
    }

    Ok(pool.into_iter().take(count).map(|l| l.id.clone()).collect())
}
