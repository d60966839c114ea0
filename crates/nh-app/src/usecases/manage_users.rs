//! Staff account management: create, edit, remove.
//!
//! Exactly one administrator exists at any time, so none of these use cases
//! can create a second one or remove the existing one.

use std::sync::Arc;

use nh_core::crypto::hash_password;
use nh_core::ports::ConfirmationPort;
use nh_core::{BranchId, Lead, User, UserId, UserRole, WriteOutcome};
use thiserror::Error;
use tracing::info;

use crate::data_service::{DataError, DataService};
use crate::state::WorkingSet;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("user {0} not found")]
    NotFound(UserId),

    #[error("user id {0} is already taken")]
    DuplicateId(UserId),

    #[error("an administrator already exists")]
    AdminAlreadyExists,

    #[error("the administrator account cannot be removed or demoted")]
    AdminRequired,

    #[error("user name must not be empty")]
    EmptyName,

    #[error("failed to hash password: {0}")]
    Hash(#[source] anyhow::Error),

    #[error(transparent)]
    Data(#[from] DataError),
}

/// Input for a new account. The password is hashed before anything is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    /// `None` generates a fresh id.
    pub id: Option<UserId>,
    pub name: String,
    pub role: UserRole,
    pub branch_id: Option<BranchId>,
    pub password: String,
    pub is_approved: bool,
}

/// Partial edit; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub role: Option<UserRole>,
    pub branch_id: Option<Option<BranchId>>,
    pub password: Option<String>,
    pub is_approved: Option<bool>,
}

impl UserChanges {
    pub fn approve() -> Self {
        Self {
            is_approved: Some(true),
            ..Self::default()
        }
    }
}

pub struct AddUser {
    data: DataService,
}

impl AddUser {
    pub fn new(data: DataService) -> Self {
        Self { data }
    }

    #[tracing::instrument(name = "usecase.add_user.execute", skip(self, state, draft), fields(role = %draft.role))]
    pub async fn execute(
        &self,
        state: &mut WorkingSet,
        draft: UserDraft,
    ) -> Result<(User, WriteOutcome), UserError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(UserError::EmptyName);
        }

        let id = draft.id.unwrap_or_default();
        if state.user(&id).is_some() {
            return Err(UserError::DuplicateId(id));
        }
        if draft.role == UserRole::Admin && state.admin().is_some() {
            return Err(UserError::AdminAlreadyExists);
        }

        let user = User {
            id,
            name: name.to_string(),
            role: draft.role,
            branch_id: draft.branch_id,
            password_hash: hash_password(&draft.password).map_err(UserError::Hash)?,
            is_approved: draft.is_approved,
            created_at: self.data.now(),
        };

        let outcome = self.data.save_user(&user).await?;
        info!(user_id = %user.id, "user added");
        state.users.push(user.clone());
        Ok((user, outcome))
    }
}

pub struct UpdateUser {
    data: DataService,
}

impl UpdateUser {
    pub fn new(data: DataService) -> Self {
        Self { data }
    }

    /// Applies `changes` and refreshes the current user when it is the one edited.
    #[tracing::instrument(name = "usecase.update_user.execute", skip(self, state, changes), fields(user_id = %id))]
    pub async fn execute(
        &self,
        state: &mut WorkingSet,
        id: &UserId,
        changes: UserChanges,
    ) -> Result<(User, WriteOutcome), UserError> {
        let mut user = state
            .user(id)
            .cloned()
            .ok_or_else(|| UserError::NotFound(id.clone()))?;

        if let Some(role) = changes.role {
            if user.is_admin() && role != UserRole::Admin {
                return Err(UserError::AdminRequired);
            }
            if !user.is_admin() && role == UserRole::Admin {
                return Err(UserError::AdminAlreadyExists);
            }
            user.role = role;
        }
        if let Some(name) = changes.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(UserError::EmptyName);
            }
            user.name = name.to_string();
        }
        if let Some(branch_id) = changes.branch_id {
            user.branch_id = branch_id;
        }
        if let Some(password) = changes.password {
            user.password_hash = hash_password(&password).map_err(UserError::Hash)?;
        }
        if let Some(approved) = changes.is_approved {
            user.is_approved = approved;
        }

        let outcome = self.data.save_user(&user).await?;

        if let Some(slot) = state.users.iter_mut().find(|u| &u.id == id) {
            *slot = user.clone();
        }
        if state.current_user.as_ref().is_some_and(|u| &u.id == id) {
            state.current_user = Some(user.clone());
        }
        Ok((user, outcome))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRemoval {
    Cancelled,
    Removed { outcome: WriteOutcome },
}

pub struct DeleteUser {
    data: DataService,
    confirmation: Arc<dyn ConfirmationPort>,
}

impl DeleteUser {
    pub fn new(data: DataService, confirmation: Arc<dyn ConfirmationPort>) -> Self {
        Self { data, confirmation }
    }

    /// Removes the account after confirmation. Leads assigned to it go back
    /// to the general pool instead of being deleted.
    #[tracing::instrument(name = "usecase.delete_user.execute", skip(self, state), fields(user_id = %id))]
    pub async fn execute(&self, state: &mut WorkingSet, id: &UserId) -> Result<UserRemoval, UserError> {
        let user = state.user(id).ok_or_else(|| UserError::NotFound(id.clone()))?;
        if user.is_admin() {
            return Err(UserError::AdminRequired);
        }

        let prompt = format!("Delete user {}?", user.name);
        if !self.confirmation.confirm(&prompt).await {
            info!("user deletion cancelled");
            return Ok(UserRemoval::Cancelled);
        }

        // Leads go back to the pool before the account disappears, so a
        // failure never leaves leads assigned to a missing user.
        let released: Vec<Lead> = state
            .leads
            .iter()
            .filter(|l| l.is_assigned_to(id))
            .map(|l| Lead {
                assigned_to: None,
                ..l.clone()
            })
            .collect();
        let mut outcome = self.data.save_leads(&released).await?;
        for lead in state.leads.iter_mut().filter(|l| l.is_assigned_to(id)) {
            lead.assigned_to = None;
        }

        outcome = outcome.merge(self.data.delete_user(id).await?);
        state.users.retain(|u| &u.id != id);
        if state.current_user.as_ref().is_some_and(|u| &u.id == id) {
            state.current_user = None;
        }

        info!(released = released.len(), "user deleted");
        Ok(UserRemoval::Removed { outcome })
    }
}
