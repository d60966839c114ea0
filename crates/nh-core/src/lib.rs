//! # nh-core
//!
//! Core domain models and business rules for NazoratHub.
//!
//! This crate contains pure business logic without any infrastructure dependencies.
//! Infrastructure (remote backend, local mirror, AI endpoint) is reached only
//! through the traits in [`ports`].

pub mod backup;
pub mod branch;
pub mod config;
pub mod crypto;
pub mod ids;
pub mod lead;
pub mod ports;
pub mod report;
pub mod sync;
pub mod user;

// Re-export commonly used types at the crate root
pub use backup::Backup;
pub use branch::Branch;
pub use config::AppConfig;
pub use ids::{BranchId, LeadId, ReportId, UserId};
pub use lead::{Lead, LeadStatus};
pub use report::Report;
pub use sync::WriteOutcome;
pub use user::{User, UserRole};
