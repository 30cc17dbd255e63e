//! Local record stores: typed, in-memory collections mirrored to durable
//! key-value storage.
//!
//! # Responsibility
//! - Own one domain's collection and apply create/update/delete to it.
//! - Persist the whole collection as one JSON document after every mutation.
//! - Decide what happens when a stored document cannot be read.
//!
//! # Invariants
//! - Record ids are unique within every collection a store holds.
//! - In-memory state changes only after the durable write succeeded.
//! - A malformed document is never silently overwritten: `load` copies it to
//!   the first free `<key>.malformed[.N]` slot before continuing with an
//!   empty collection. Earlier quarantined values are never replaced.

mod categorized;
mod document;
mod flat;
mod id;

pub use categorized::CategorizedStore;
pub use flat::RecordStore;
pub use id::IdAllocator;

use crate::model::record::RecordId;
use crate::repo::kv_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from record store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Durable storage read/write failure.
    Repo(RepoError),
    /// No record with `id` exists in the addressed collection.
    NotFound { key: &'static str, id: RecordId },
    /// Stored value exists but does not decode into the expected shape.
    MalformedStoredData { key: &'static str, message: String },
    /// A collection handed to `persist` repeats an id.
    DuplicateId { key: &'static str, id: RecordId },
    /// The collection already holds the largest representable id.
    IdExhausted { key: &'static str },
    /// Collection could not be encoded as JSON.
    Serialize(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::NotFound { key, id } => write!(f, "record not found in `{key}`: {id}"),
            Self::MalformedStoredData { key, message } => {
                write!(f, "malformed stored data under `{key}`: {message}")
            }
            Self::DuplicateId { key, id } => write!(f, "duplicate record id in `{key}`: {id}"),
            Self::IdExhausted { key } => write!(f, "no record ids left in `{key}`"),
            Self::Serialize(err) => write!(f, "failed to encode collection: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Serialize(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// How `load` reacts to a stored document that does not decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MalformedPolicy {
    /// Quarantine the raw value, log, and continue as if it were absent.
    FailSafe,
    /// Surface `StoreError::MalformedStoredData`.
    Strict,
}
