//! NazoratHub application layer
//!
//! [`DataService`] mirrors every entity between the hosted backend and the
//! local mirror. [`AppController`] owns the in-memory [`WorkingSet`] and
//! routes each user action through one use case in [`usecases`].

pub mod controller;
pub mod data_service;
pub mod state;
pub mod usecases;

pub use controller::{AppController, ControllerDeps};
pub use data_service::{DataError, DataService, LeadDeletion};
pub use state::WorkingSet;
