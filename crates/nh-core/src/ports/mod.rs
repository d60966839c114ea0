//! Port interfaces for the application layer
//!
//! Ports define the contract between the application logic (use cases)
//! and infrastructure implementations. The Data Service only ever talks to
//! the hosted backend and the local mirror through these traits.

mod clock;
mod confirmation;
pub mod errors;
mod local_mirror;
mod remote_connector;
mod remote_table;
mod summary;

pub use clock::ClockPort;
pub use confirmation::ConfirmationPort;
pub use errors::{MirrorError, RemoteError, SummaryError};
pub use local_mirror::{LocalMirrorPort, MirrorKey};
pub use remote_connector::{RemoteConfig, RemoteConnectorPort};
pub use remote_table::{RemoteTablePort, SelectOrder, Table};
pub use summary::SummaryGeneratorPort;
