//! World-building settings, partitioned by setting category.

use crate::model::domain::Domain;
use crate::model::record::{CategorizedFields, Category, Record, RecordFields};
use serde::{Deserialize, Serialize};

/// A persisted setting entry.
pub type Setting = Record<SettingFields>;

/// Setting partitions, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingCategory {
    Magic,
    Technology,
    Culture,
    Religion,
    Politics,
}

impl Category for SettingCategory {
    const ALL: &'static [Self] = &[
        Self::Magic,
        Self::Technology,
        Self::Culture,
        Self::Religion,
        Self::Politics,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::Magic => "magic",
            Self::Technology => "technology",
            Self::Culture => "culture",
            Self::Religion => "religion",
            Self::Politics => "politics",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Magic => "魔法システム",
            Self::Technology => "科学技術",
            Self::Culture => "文化・風習",
            Self::Religion => "宗教・信仰",
            Self::Politics => "政治・社会制度",
        }
    }
}

/// Free-text fields describing one setting entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingFields {
    pub name: String,
    pub description: String,
    pub rules: String,
    pub limitations: String,
    pub notes: String,
}

impl RecordFields for SettingFields {
    const DOMAIN: Domain = Domain::Settings;
}

impl CategorizedFields for SettingFields {
    type Category = SettingCategory;
}
