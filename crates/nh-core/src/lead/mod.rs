//! Prospective customers and their assignment to operators.

mod distribution;

pub use distribution::{select_for_distribution, InsufficientPool};

use serde::{Deserialize, Serialize};

use crate::ids::{LeadId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    /// Not contacted yet.
    New,
    /// A report referencing the lead has been submitted.
    Called,
    Other,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Called => "called",
            LeadStatus::Other => "other",
        }
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<UserId>,
    pub status: LeadStatus,
}

impl Lead {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: LeadId::new(),
            name: name.into(),
            phone: phone.into(),
            address: None,
            note: None,
            assigned_to: None,
            status: LeadStatus::New,
        }
    }

    /// Unassigned and never called: eligible for distribution.
    pub fn is_in_pool(&self) -> bool {
        self.assigned_to.is_none() && self.status == LeadStatus::New
    }

    pub fn is_assigned_to(&self, operator: &UserId) -> bool {
        self.assigned_to.as_ref() == Some(operator)
    }
}
