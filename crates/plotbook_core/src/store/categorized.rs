//! Categorized record store: one collection per category, persisted together
//! as a single document under one durable key.
//!
//! # Invariants
//! - Operations on one category leave every other category's list unchanged.
//! - The persisted document always lists every category, empty or not.
//! - Ids are allocated from one sequence shared by all categories.

use super::document::{read_document, write_document};
use super::{IdAllocator, MalformedPolicy, StoreError, StoreResult};
use crate::model::collection::{first_duplicate_id, CategorizedCollection, Collection};
use crate::model::record::{CategorizedFields, Category, Record, RecordId};
use crate::repo::kv_repo::KeyValueRepository;
use log::info;

type CategoryOf<F> = <F as CategorizedFields>::Category;

/// Local record store for a partitioned domain (settings, world elements).
pub struct CategorizedStore<F: CategorizedFields, R> {
    repo: R,
    collection: CategorizedCollection<CategoryOf<F>, F>,
    ids: IdAllocator,
}

impl<F: CategorizedFields, R: KeyValueRepository> CategorizedStore<F, R> {
    /// Creates a store and loads its collection from durable storage.
    pub fn open(repo: R) -> StoreResult<Self> {
        Self::open_with_ids(repo, IdAllocator::new())
    }

    /// Same as [`CategorizedStore::open`] with a caller-provided id allocator.
    pub fn open_with_ids(repo: R, ids: IdAllocator) -> StoreResult<Self> {
        let mut store = Self {
            repo,
            collection: CategorizedCollection::new(),
            ids,
        };
        store.load()?;
        Ok(store)
    }

    pub fn storage_key(&self) -> &'static str {
        F::DOMAIN.storage_key()
    }

    /// Re-reads every category from durable storage.
    ///
    /// Absent and malformed documents both yield all-empty categories; a
    /// malformed one is preserved under `<key>.malformed` (or the next free
    /// numbered slot) first.
    pub fn load(&mut self) -> StoreResult<&CategorizedCollection<CategoryOf<F>, F>> {
        self.load_with(MalformedPolicy::FailSafe)
    }

    /// Like [`CategorizedStore::load`], but a malformed document is an error.
    pub fn try_load(&mut self) -> StoreResult<&CategorizedCollection<CategoryOf<F>, F>> {
        self.load_with(MalformedPolicy::Strict)
    }

    /// Current snapshot of every category.
    pub fn collection(&self) -> &CategorizedCollection<CategoryOf<F>, F> {
        &self.collection
    }

    /// Current snapshot of one category, in append order.
    pub fn records(&self, category: CategoryOf<F>) -> &[Record<F>] {
        self.collection.get(category)
    }

    pub fn get(&self, category: CategoryOf<F>, id: RecordId) -> Option<&Record<F>> {
        self.records(category).iter().find(|record| record.id == id)
    }

    /// Total number of records across categories.
    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    /// Appends a record to `category` and persists every category.
    ///
    /// # Errors
    /// - `IdExhausted` when no id above the stored ones is left; nothing is
    ///   written.
    pub fn create(&mut self, category: CategoryOf<F>, fields: F) -> StoreResult<Record<F>> {
        let id = self.ids.next_id().ok_or(StoreError::IdExhausted {
            key: self.storage_key(),
        })?;
        let record = Record::new(id, fields);
        let mut next = self.collection.clone();
        next.get_mut(category).push(record.clone());
        self.commit(next)?;

        info!(
            "event=record_create module=store status=ok key={} category={} id={} count={}",
            self.storage_key(),
            category.key(),
            record.id,
            self.records(category).len()
        );
        Ok(record)
    }

    /// Replaces every non-id field of record `id` within `category`.
    ///
    /// # Errors
    /// - `NotFound` when `category` has no record with `id`, even if another
    ///   category does; nothing is written.
    pub fn update(
        &mut self,
        category: CategoryOf<F>,
        id: RecordId,
        fields: F,
    ) -> StoreResult<Record<F>> {
        let index = self
            .records(category)
            .iter()
            .position(|record| record.id == id)
            .ok_or(StoreError::NotFound {
                key: self.storage_key(),
                id,
            })?;

        let mut next = self.collection.clone();
        let records = next.get_mut(category);
        records[index].fields = fields;
        let updated = records[index].clone();
        self.commit(next)?;

        info!(
            "event=record_update module=store status=ok key={} category={} id={}",
            self.storage_key(),
            category.key(),
            id
        );
        Ok(updated)
    }

    /// Removes record `id` from `category` and persists every category.
    ///
    /// Returns whether a record was removed.
    pub fn delete(&mut self, category: CategoryOf<F>, id: RecordId) -> StoreResult<bool> {
        let mut next = self.collection.clone();
        let records = next.get_mut(category);
        let before = records.len();
        records.retain(|record| record.id != id);
        let removed = records.len() != before;
        self.commit(next)?;

        info!(
            "event=record_delete module=store status=ok key={} category={} id={} removed={}",
            self.storage_key(),
            category.key(),
            id,
            removed
        );
        Ok(removed)
    }

    /// Replaces every category and writes the document.
    ///
    /// # Errors
    /// - `DuplicateId` when any one category repeats an id; nothing is written.
    pub fn persist(&mut self, collection: CategorizedCollection<CategoryOf<F>, F>) -> StoreResult<()> {
        if let Some(id) = duplicate_in_any_category(&collection) {
            return Err(StoreError::DuplicateId {
                key: self.storage_key(),
                id,
            });
        }
        self.commit(collection)
    }

    /// Replaces one category's list, carrying the others through unchanged.
    pub fn persist_category(
        &mut self,
        category: CategoryOf<F>,
        records: Collection<F>,
    ) -> StoreResult<()> {
        let mut next = self.collection.clone();
        next.replace(category, records);
        self.persist(next)
    }

    fn commit(&mut self, collection: CategorizedCollection<CategoryOf<F>, F>) -> StoreResult<()> {
        write_document(&self.repo, self.storage_key(), &collection)?;
        self.replace(collection);
        Ok(())
    }

    fn replace(&mut self, collection: CategorizedCollection<CategoryOf<F>, F>) {
        if let Some(max_id) = collection.max_id() {
            self.ids.observe(max_id);
        }
        self.collection = collection;
    }

    fn load_with(
        &mut self,
        policy: MalformedPolicy,
    ) -> StoreResult<&CategorizedCollection<CategoryOf<F>, F>> {
        let loaded = read_document::<CategorizedCollection<CategoryOf<F>, F>, _>(
            &self.repo,
            self.storage_key(),
            policy,
            |collection| match duplicate_in_any_category(collection) {
                Some(id) => Err(format!("duplicate record id {id}")),
                None => Ok(()),
            },
        )?;
        self.replace(loaded.unwrap_or_default());
        Ok(&self.collection)
    }
}

fn duplicate_in_any_category<C: Category, F>(
    collection: &CategorizedCollection<C, F>,
) -> Option<RecordId> {
    collection
        .iter()
        .find_map(|(_, records)| first_duplicate_id(records))
}
