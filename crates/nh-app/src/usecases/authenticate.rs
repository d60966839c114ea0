use nh_core::crypto::verify_password;
use nh_core::User;
use thiserror::Error;
use tracing::{info, warn};

use crate::state::WorkingSet;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid name or password")]
    InvalidCredentials,

    #[error("account is waiting for administrator approval")]
    NotApproved,

    #[error("failed to verify password: {0}")]
    Hash(#[source] anyhow::Error),
}

/// Matches a name and password against the users in the working set.
///
/// Names compare case-insensitively. Several users may share a name; the
/// first one whose password verifies wins.
#[derive(Debug, Default)]
pub struct Authenticate;

impl Authenticate {
    pub fn new() -> Self {
        Self
    }

    #[tracing::instrument(name = "usecase.authenticate.execute", skip(self, state, password))]
    pub fn execute(&self, state: &mut WorkingSet, name: &str, password: &str) -> Result<User, AuthError> {
        let name = name.trim();
        let mut matched: Option<&User> = None;

        for user in state.users.iter().filter(|u| u.name.eq_ignore_ascii_case(name)) {
            if verify_password(password, &user.password_hash).map_err(AuthError::Hash)? {
                matched = Some(user);
                break;
            }
        }

        let user = matched.cloned().ok_or_else(|| {
            warn!("login rejected");
            AuthError::InvalidCredentials
        })?;
        if !user.is_approved {
            return Err(AuthError::NotApproved);
        }

        info!(user_id = %user.id, role = %user.role, "user logged in");
        state.current_user = Some(user.clone());
        Ok(user)
    }
}
