//! Plot event records.

use crate::model::domain::Domain;
use crate::model::record::{Record, RecordFields};
use serde::{Deserialize, Serialize};

/// A persisted plot event.
pub type PlotEvent = Record<PlotEventFields>;

/// Free-text fields describing one plot event.
///
/// `characters` and `location` are plain text, not references to character
/// or world records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotEventFields {
    pub title: String,
    pub description: String,
    pub chapter: String,
    pub characters: String,
    pub location: String,
    pub notes: String,
}

impl RecordFields for PlotEventFields {
    const DOMAIN: Domain = Domain::PlotEvents;
}
