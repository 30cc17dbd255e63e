//! World elements (geography, history, ...), partitioned by world category.

use crate::model::domain::Domain;
use crate::model::record::{CategorizedFields, Category, Record, RecordFields};
use serde::{Deserialize, Serialize};

/// A persisted world element.
pub type WorldElement = Record<WorldElementFields>;

/// World element partitions, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorldCategory {
    Geography,
    History,
    Races,
    Organizations,
    Artifacts,
}

impl Category for WorldCategory {
    const ALL: &'static [Self] = &[
        Self::Geography,
        Self::History,
        Self::Races,
        Self::Organizations,
        Self::Artifacts,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::Geography => "geography",
            Self::History => "history",
            Self::Races => "races",
            Self::Organizations => "organizations",
            Self::Artifacts => "artifacts",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Geography => "地理・地形",
            Self::History => "歴史・伝説",
            Self::Races => "種族・民族",
            Self::Organizations => "組織・勢力",
            Self::Artifacts => "遺物・宝物",
        }
    }
}

/// Free-text fields describing one world element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldElementFields {
    pub name: String,
    pub description: String,
    pub details: String,
    pub significance: String,
    pub notes: String,
}

impl RecordFields for WorldElementFields {
    const DOMAIN: Domain = Domain::WorldElements;
}

impl CategorizedFields for WorldElementFields {
    type Category = WorldCategory;
}
