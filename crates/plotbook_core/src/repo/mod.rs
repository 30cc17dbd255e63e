//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the durable key-value contract the record stores write through.
//! - Isolate SQLite query details from store and service orchestration.
//!
//! # Invariants
//! - A repository only ever sees opaque string values; JSON shape is the
//!   stores' concern.
//! - Repository constructors reject connections that are not fully migrated.

pub mod kv_repo;
