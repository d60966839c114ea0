//! Branch offices. The list is static reference data and never stored remotely.

use serde::{Deserialize, Serialize};

use crate::ids::BranchId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub id: BranchId,
    pub name: String,
    pub location: String,
}

impl Branch {
    fn new(id: &str, name: &str, location: &str) -> Self {
        Self {
            id: BranchId::from(id),
            name: name.to_string(),
            location: location.to_string(),
        }
    }
}

/// Head office first, then regional branches in alphabetical order.
pub fn default_branches() -> Vec<Branch> {
    vec![
        Branch::new("main", "Bosh Ofis", "Toshkent shahri"),
        Branch::new("and", "Andijon Filiali", "Andijon"),
        Branch::new("bux", "Buxoro Filiali", "Buxoro"),
        Branch::new("fer", "Farg'ona Filiali", "Farg'ona"),
        Branch::new("jiz", "Jizzax Filiali", "Jizzax"),
        Branch::new("nam", "Namangan Filiali", "Namangan"),
        Branch::new("nav", "Navoiy Filiali", "Navoiy"),
        Branch::new("qash", "Qashqadaryo Filiali", "Qarshi"),
        Branch::new("qor", "Qoraqalpog'iston Filiali", "Nukus"),
        Branch::new("sam", "Samarqand Filiali", "Samarqand"),
        Branch::new("sir", "Sirdaryo Filiali", "Guliston"),
        Branch::new("sur", "Surxondaryo Filiali", "Termiz"),
        Branch::new("xor", "Xorazm Filiali", "Urganch"),
        Branch::new("tosh_v", "Toshkent Viloyat Filiali", "Nurafshon"),
    ]
}

/// Looks up a branch, falling back to the head office for unknown or missing ids.
pub fn branch_or_head_office<'a>(branches: &'a [Branch], id: Option<&BranchId>) -> Option<&'a Branch> {
    id.and_then(|id| branches.iter().find(|b| &b.id == id))
        .or_else(|| branches.first())
}
