//! In-memory working set owned by the controller.

use nh_core::branch::default_branches;
use nh_core::{Branch, Lead, LeadId, Report, User, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingSet {
    pub users: Vec<User>,
    pub reports: Vec<Report>,
    pub leads: Vec<Lead>,
    pub branches: Vec<Branch>,
    /// True when a remote handle exists.
    pub is_cloud: bool,
    pub current_user: Option<User>,
}

impl Default for WorkingSet {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            reports: Vec::new(),
            leads: Vec::new(),
            branches: default_branches(),
            is_cloud: false,
            current_user: None,
        }
    }
}

impl WorkingSet {
    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|u| &u.id == id)
    }

    pub fn lead_mut(&mut self, id: &LeadId) -> Option<&mut Lead> {
        self.leads.iter_mut().find(|l| &l.id == id)
    }

    pub fn admin(&self) -> Option<&User> {
        self.users.iter().find(|u| u.is_admin())
    }

    pub fn pool_size(&self) -> usize {
        self.leads.iter().filter(|l| l.is_in_pool()).count()
    }

    pub fn leads_of<'a>(&'a self, operator: &'a UserId) -> impl Iterator<Item = &'a Lead> + 'a {
        self.leads.iter().filter(move |l| l.is_assigned_to(operator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nh_core::LeadStatus;

    #[test]
    fn default_carries_static_branches() {
        let state = WorkingSet::default();
        assert_eq!(state.branches.len(), 14);
        assert!(state.users.is_empty());
        assert!(!state.is_cloud);
    }

    #[test]
    fn pool_excludes_assigned_and_called() {
        let mut state = WorkingSet::default();
        let mut assigned = Lead::new("A", "1");
        assigned.assigned_to = Some(UserId::from("op"));
        let mut called = Lead::new("B", "2");
        called.status = LeadStatus::Called;
        state.leads = vec![assigned, called, Lead::new("C", "3")];

        assert_eq!(state.pool_size(), 1);
        assert_eq!(state.leads_of(&UserId::from("op")).count(), 1);
    }
}
