//! Collection shapes persisted as one JSON document per domain.
//!
//! # Responsibility
//! - Name the flat collection shape (`Vec<Record<F>>`).
//! - Provide a category-keyed collection that can only hold known categories.
//!
//! # Invariants
//! - A `CategorizedCollection` maps every category of `C::ALL` to a list,
//!   possibly empty, and no other keys.
//! - Serialization writes categories in `C::ALL` order.

use crate::model::record::{Category, Record, RecordId};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashSet};

/// Ordered records of one domain or one category. Append order is kept.
pub type Collection<F> = Vec<Record<F>>;

/// Fixed mapping from category to collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorizedCollection<C, F> {
    lists: BTreeMap<C, Collection<F>>,
}

impl<C: Category, F> CategorizedCollection<C, F> {
    /// Creates a collection with every category mapped to an empty list.
    pub fn new() -> Self {
        Self {
            lists: C::ALL.iter().map(|category| (*category, Vec::new())).collect(),
        }
    }

    pub fn get(&self, category: C) -> &[Record<F>] {
        self.lists.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get_mut(&mut self, category: C) -> &mut Collection<F> {
        self.lists.entry(category).or_default()
    }

    /// Replaces one category's list and returns the previous one.
    pub fn replace(&mut self, category: C, records: Collection<F>) -> Collection<F> {
        std::mem::replace(self.get_mut(category), records)
    }

    /// Iterates categories in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (C, &[Record<F>])> + '_ {
        C::ALL
            .iter()
            .map(move |category| (*category, self.get(*category)))
    }

    /// Total number of records across all categories.
    pub fn len(&self) -> usize {
        self.lists.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Largest id across all categories.
    pub fn max_id(&self) -> Option<RecordId> {
        self.lists.values().flatten().map(|record| record.id).max()
    }
}

impl<C: Category, F> Default for CategorizedCollection<C, F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Category, F> FromIterator<(C, Collection<F>)> for CategorizedCollection<C, F> {
    fn from_iter<I: IntoIterator<Item = (C, Collection<F>)>>(iter: I) -> Self {
        let mut collection = Self::new();
        for (category, records) in iter {
            collection.replace(category, records);
        }
        collection
    }
}

impl<C: Category, F: Serialize> Serialize for CategorizedCollection<C, F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(category, records)| (category.key(), records)))
    }
}

impl<'de, C: Category, F: Deserialize<'de>> Deserialize<'de> for CategorizedCollection<C, F> {
    /// Missing categories load empty; unknown keys are dropped with a warning.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Collection<F>>::deserialize(deserializer)?;
        let mut collection = Self::new();
        for (key, records) in raw {
            match C::from_key(&key) {
                Some(category) => {
                    collection.replace(category, records);
                }
                None => warn!(
                    "event=category_dropped module=model status=warn key_len={} records={}",
                    key.len(),
                    records.len()
                ),
            }
        }
        Ok(collection)
    }
}

/// Returns the first id that occurs more than once, if any.
pub fn first_duplicate_id<'a, F: 'a>(
    records: impl IntoIterator<Item = &'a Record<F>>,
) -> Option<RecordId> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .map(|record| record.id)
        .find(|id| !seen.insert(*id))
}
