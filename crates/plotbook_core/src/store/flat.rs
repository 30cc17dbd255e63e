//! Flat record store: one ordered collection under one durable key.
//!
//! # Invariants
//! - New records are appended; existing records keep their position.
//! - `update` never changes a record's id.
//! - `delete` of an unknown id is a no-op that still rewrites the document.

use super::document::{read_document, write_document};
use super::{IdAllocator, MalformedPolicy, StoreError, StoreResult};
use crate::model::collection::{first_duplicate_id, Collection};
use crate::model::record::{Record, RecordFields, RecordId};
use crate::repo::kv_repo::KeyValueRepository;
use log::info;

/// Local record store for a non-partitioned domain (characters, plot events).
pub struct RecordStore<F, R> {
    repo: R,
    records: Collection<F>,
    ids: IdAllocator,
}

impl<F: RecordFields, R: KeyValueRepository> RecordStore<F, R> {
    /// Creates a store and loads its collection from durable storage.
    pub fn open(repo: R) -> StoreResult<Self> {
        Self::open_with_ids(repo, IdAllocator::new())
    }

    /// Same as [`RecordStore::open`] with a caller-provided id allocator.
    pub fn open_with_ids(repo: R, ids: IdAllocator) -> StoreResult<Self> {
        let mut store = Self {
            repo,
            records: Vec::new(),
            ids,
        };
        store.load()?;
        Ok(store)
    }

    /// Durable-storage key of this store's document.
    pub fn storage_key(&self) -> &'static str {
        F::DOMAIN.storage_key()
    }

    /// Re-reads the collection from durable storage.
    ///
    /// Absent and malformed documents both yield an empty collection; a
    /// malformed one is preserved under `<key>.malformed` (or the next free
    /// numbered slot) first.
    pub fn load(&mut self) -> StoreResult<&[Record<F>]> {
        self.load_with(MalformedPolicy::FailSafe)
    }

    /// Like [`RecordStore::load`], but a malformed document is an error and
    /// leaves the in-memory collection untouched.
    pub fn try_load(&mut self) -> StoreResult<&[Record<F>]> {
        self.load_with(MalformedPolicy::Strict)
    }

    /// Current snapshot, in append order.
    pub fn records(&self) -> &[Record<F>] {
        &self.records
    }

    pub fn get(&self, id: RecordId) -> Option<&Record<F>> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends a record with a fresh id and persists the collection.
    ///
    /// # Errors
    /// - `IdExhausted` when no id above the stored ones is left; nothing is
    ///   written.
    pub fn create(&mut self, fields: F) -> StoreResult<Record<F>> {
        let id = self.ids.next_id().ok_or(StoreError::IdExhausted {
            key: self.storage_key(),
        })?;
        let record = Record::new(id, fields);
        let mut next = self.records.clone();
        next.push(record.clone());
        self.commit(next)?;

        info!(
            "event=record_create module=store status=ok key={} id={} count={}",
            self.storage_key(),
            record.id,
            self.records.len()
        );
        Ok(record)
    }

    /// Replaces every non-id field of record `id` and persists the collection.
    ///
    /// # Errors
    /// - `NotFound` when no record has `id`; nothing is written.
    pub fn update(&mut self, id: RecordId, fields: F) -> StoreResult<Record<F>> {
        let index = self
            .records
            .iter()
            .position(|record| record.id == id)
            .ok_or(StoreError::NotFound {
                key: self.storage_key(),
                id,
            })?;

        let mut next = self.records.clone();
        next[index].fields = fields;
        let updated = next[index].clone();
        self.commit(next)?;

        info!(
            "event=record_update module=store status=ok key={} id={}",
            self.storage_key(),
            id
        );
        Ok(updated)
    }

    /// Removes record `id` and persists the collection.
    ///
    /// Returns whether a record was removed.
    pub fn delete(&mut self, id: RecordId) -> StoreResult<bool> {
        let next = self
            .records
            .iter()
            .filter(|record| record.id != id)
            .cloned()
            .collect::<Vec<_>>();
        let removed = next.len() != self.records.len();
        self.commit(next)?;

        info!(
            "event=record_delete module=store status=ok key={} id={} removed={}",
            self.storage_key(),
            id,
            removed
        );
        Ok(removed)
    }

    /// Replaces the whole collection and writes it to durable storage.
    ///
    /// # Errors
    /// - `DuplicateId` when `records` repeats an id; nothing is written.
    pub fn persist(&mut self, records: Collection<F>) -> StoreResult<()> {
        if let Some(id) = first_duplicate_id(&records) {
            return Err(StoreError::DuplicateId {
                key: self.storage_key(),
                id,
            });
        }
        self.commit(records)
    }

    fn commit(&mut self, records: Collection<F>) -> StoreResult<()> {
        write_document(&self.repo, self.storage_key(), &records)?;
        self.replace(records);
        Ok(())
    }

    fn replace(&mut self, records: Collection<F>) {
        for record in &records {
            self.ids.observe(record.id);
        }
        self.records = records;
    }

    fn load_with(&mut self, policy: MalformedPolicy) -> StoreResult<&[Record<F>]> {
        let loaded = read_document::<Collection<F>, _>(
            &self.repo,
            self.storage_key(),
            policy,
            |records| match first_duplicate_id(records) {
                Some(id) => Err(format!("duplicate record id {id}")),
                None => Ok(()),
            },
        )?;
        self.replace(loaded.unwrap_or_default());
        Ok(&self.records)
    }
}
