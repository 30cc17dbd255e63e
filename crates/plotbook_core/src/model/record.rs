//! Record envelope shared by every domain.
//!
//! # Responsibility
//! - Pair a system-assigned id with domain-specific free-text fields.
//! - Describe, at the type level, which durable key and category set a
//!   field struct belongs to.
//!
//! # Invariants
//! - `id` is unique within its collection and never changes after creation.
//! - Field values are free text; the empty string is always valid.

use crate::model::domain::Domain;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Opaque record identifier.
///
/// Derived from epoch milliseconds at creation time, so ids written by older
/// browser-based versions of the workbook load unchanged.
pub type RecordId = i64;

/// One persisted item: an id plus the domain's named fields.
///
/// Serialized flat, so a character is `{"id":1,"name":"Aria",...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record<F> {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: F,
}

impl<F> Record<F> {
    pub fn new(id: RecordId, fields: F) -> Self {
        Self { id, fields }
    }
}

/// Field set of one content domain.
pub trait RecordFields:
    Debug + Clone + Default + PartialEq + Serialize + DeserializeOwned
{
    /// Domain whose durable key stores records with these fields.
    const DOMAIN: Domain;
}

/// Field set of a domain partitioned by a fixed category enumeration.
pub trait CategorizedFields: RecordFields {
    type Category: Category;
}

/// Closed enumeration of categories for one partitioned domain.
///
/// `Ord` must follow declaration order, which is also the tab order and the
/// serialization order of categorized documents.
pub trait Category: Debug + Copy + Eq + Ord + Hash + Send + Sync + 'static {
    /// Every category, in declaration order.
    const ALL: &'static [Self];

    /// Stable key used inside persisted JSON documents.
    fn key(self) -> &'static str;

    /// Human-readable tab label.
    fn label(self) -> &'static str;

    fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.key() == key)
    }
}
