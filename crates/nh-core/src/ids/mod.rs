//! ID type wrappers for type safety.
//!
//! All identifiers are opaque strings on the wire: the hosted backend and the
//! local mirror both store them as plain text columns.

mod id_macro;

use id_macro::impl_id;
use serde::{Deserialize, Serialize};

/// Identifier of a [`crate::User`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

/// Identifier of a [`crate::Lead`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadId(String);

/// Identifier of a [`crate::Report`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(String);

/// Identifier of a [`crate::Branch`]. Branch ids are short mnemonic codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchId(String);

impl_id!(UserId, LeadId, ReportId, BranchId);
