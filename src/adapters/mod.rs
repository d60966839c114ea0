//! Adapters that only make sense for the command-line front end.

mod confirm;

pub use confirm::{AssumeYes, StdinConfirmation};
