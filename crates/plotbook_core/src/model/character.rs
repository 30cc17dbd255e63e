//! Character records.

use crate::model::domain::Domain;
use crate::model::record::{Record, RecordFields};
use serde::{Deserialize, Serialize};

/// A persisted character.
pub type Character = Record<CharacterFields>;

/// Free-text fields describing one character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterFields {
    pub name: String,
    pub role: String,
    pub description: String,
    pub background: String,
    /// Free text; not linked to other character records.
    pub relationships: String,
}

impl RecordFields for CharacterFields {
    const DOMAIN: Domain = Domain::Characters;
}
