//! One use case per controller action.
//!
//! Use cases hold cloned [`DataService`](crate::DataService) handles and the
//! ports they need; the ones that change the working set take it as
//! `&mut WorkingSet`.

pub mod add_report;
pub mod analyze_reports;
pub mod authenticate;
pub mod backup;
pub mod delete_leads;
pub mod distribute_leads;
pub mod load_workspace;
pub mod manage_users;
pub mod reconfigure_remote;
pub mod upload_leads;

pub use add_report::{AddReport, ReportDraft};
pub use analyze_reports::AnalyzeReports;
pub use authenticate::{AuthError, Authenticate};
pub use backup::{ExportBackup, RestoreBackup};
pub use delete_leads::{DeleteLeads, Deletion, LeadScope};
pub use distribute_leads::{DistributeLeads, DistributeLeadsError};
pub use load_workspace::LoadWorkspace;
pub use manage_users::{AddUser, DeleteUser, UpdateUser, UserChanges, UserDraft, UserError, UserRemoval};
pub use reconfigure_remote::ReconfigureRemote;
pub use upload_leads::UploadLeads;
