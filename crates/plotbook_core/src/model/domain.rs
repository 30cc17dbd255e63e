//! Content domains of a workbook.
//!
//! # Invariants
//! - Each domain owns exactly one durable-storage key.
//! - Storage keys match the ones written by the browser version of the
//!   workbook, so exported documents can be imported verbatim.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Characters,
    PlotEvents,
    Settings,
    WorldElements,
}

impl Domain {
    /// Every domain, in navigation order.
    pub const ALL: [Domain; 4] = [
        Domain::Characters,
        Domain::PlotEvents,
        Domain::Settings,
        Domain::WorldElements,
    ];

    /// Key of the single JSON document holding this domain's records.
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::Characters => "characters",
            Self::PlotEvents => "plotEvents",
            Self::Settings => "worldSettings",
            Self::WorldElements => "worldElements",
        }
    }

    /// Whether records are partitioned by a category enumeration.
    pub fn is_categorized(self) -> bool {
        match self {
            Self::Characters | Self::PlotEvents => false,
            Self::Settings | Self::WorldElements => true,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Characters => "キャラクター管理",
            Self::PlotEvents => "プロット管理",
            Self::Settings => "設定管理",
            Self::WorldElements => "世界観構築",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Characters => "登場人物の設定や関係性を管理します。",
            Self::PlotEvents => "ストーリーの展開やイベントを管理します。",
            Self::Settings => "世界観や魔法システムなどの設定を管理します。",
            Self::WorldElements => "舞台となる世界の地理や歴史を構築します。",
        }
    }

    /// Route of the domain's list page in the UI.
    pub fn route(self) -> &'static str {
        match self {
            Self::Characters => "/characters",
            Self::PlotEvents => "/plot",
            Self::Settings => "/settings",
            Self::WorldElements => "/world",
        }
    }
}
