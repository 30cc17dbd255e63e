//! Core domain logic for Plotbook, a local organizer for novel-writing notes.
//! This crate is the single source of truth for record and storage invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::character::{Character, CharacterFields};
pub use model::collection::{CategorizedCollection, Collection};
pub use model::domain::Domain;
pub use model::plot::{PlotEvent, PlotEventFields};
pub use model::record::{CategorizedFields, Category, Record, RecordFields, RecordId};
pub use model::setting::{Setting, SettingCategory, SettingFields};
pub use model::world::{WorldCategory, WorldElement, WorldElementFields};
pub use repo::kv_repo::{KeyValueRepository, RepoError, RepoResult, SqliteKeyValueRepository};
pub use service::workbook_service::{DomainSummary, WorkbookOverview, WorkbookService};
pub use store::{CategorizedStore, IdAllocator, RecordStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
