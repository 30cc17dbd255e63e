//! Typed domain model for the writing workbook.
//!
//! # Responsibility
//! - Define one explicit field struct per content domain.
//! - Define the closed category enumerations used by partitioned domains.
//! - Define the generic collection shapes persisted by the stores.
//!
//! # Invariants
//! - Every record carries one system-assigned `RecordId`, never reassigned.
//! - Categorized collections always hold every category of their enumeration.

pub mod character;
pub mod collection;
pub mod domain;
pub mod plot;
pub mod record;
pub mod setting;
pub mod world;
