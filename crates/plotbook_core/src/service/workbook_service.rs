//! Workbook use-case service.
//!
//! # Responsibility
//! - Own one store per content domain, all writing through one repository.
//! - Summarize the workbook for the landing page.
//!
//! # Invariants
//! - Each domain has exactly one store instance; there is no shared global
//!   state between workbooks.
//! - Service APIs never bypass store persistence contracts.

use crate::model::character::CharacterFields;
use crate::model::domain::Domain;
use crate::model::plot::PlotEventFields;
use crate::model::setting::SettingFields;
use crate::model::world::WorldElementFields;
use crate::repo::kv_repo::KeyValueRepository;
use crate::store::{CategorizedStore, RecordStore, StoreResult};
use log::info;
use std::time::Instant;

pub type CharacterStore<R> = RecordStore<CharacterFields, R>;
pub type PlotEventStore<R> = RecordStore<PlotEventFields, R>;
pub type SettingStore<R> = CategorizedStore<SettingFields, R>;
pub type WorldElementStore<R> = CategorizedStore<WorldElementFields, R>;

/// Landing-page card for one domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainSummary {
    pub domain: Domain,
    pub title: &'static str,
    pub description: &'static str,
    pub route: &'static str,
    /// Records in the domain, summed over categories for partitioned domains.
    pub record_count: usize,
}

/// Per-domain summaries, in navigation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbookOverview {
    pub domains: Vec<DomainSummary>,
}

impl WorkbookOverview {
    pub fn total_records(&self) -> usize {
        self.domains.iter().map(|summary| summary.record_count).sum()
    }

    pub fn count_for(&self, domain: Domain) -> usize {
        self.domains
            .iter()
            .find(|summary| summary.domain == domain)
            .map_or(0, |summary| summary.record_count)
    }
}

/// The four domain stores of one novel.
pub struct WorkbookService<R> {
    characters: CharacterStore<R>,
    plot_events: PlotEventStore<R>,
    settings: SettingStore<R>,
    world: WorldElementStore<R>,
}

impl<R: KeyValueRepository + Clone> WorkbookService<R> {
    /// Opens every domain store over `repo` and loads its collection.
    pub fn open(repo: R) -> StoreResult<Self> {
        let started_at = Instant::now();
        let service = Self {
            characters: RecordStore::open(repo.clone())?,
            plot_events: RecordStore::open(repo.clone())?,
            settings: CategorizedStore::open(repo.clone())?,
            world: CategorizedStore::open(repo)?,
        };
        info!(
            "event=workbook_open module=service status=ok records={} duration_ms={}",
            service.overview().total_records(),
            started_at.elapsed().as_millis()
        );
        Ok(service)
    }
}

impl<R: KeyValueRepository> WorkbookService<R> {
    pub fn characters(&self) -> &CharacterStore<R> {
        &self.characters
    }

    pub fn characters_mut(&mut self) -> &mut CharacterStore<R> {
        &mut self.characters
    }

    pub fn plot_events(&self) -> &PlotEventStore<R> {
        &self.plot_events
    }

    pub fn plot_events_mut(&mut self) -> &mut PlotEventStore<R> {
        &mut self.plot_events
    }

    pub fn settings(&self) -> &SettingStore<R> {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingStore<R> {
        &mut self.settings
    }

    pub fn world(&self) -> &WorldElementStore<R> {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut WorldElementStore<R> {
        &mut self.world
    }

    /// Re-reads every domain from durable storage.
    pub fn reload(&mut self) -> StoreResult<()> {
        self.characters.load()?;
        self.plot_events.load()?;
        self.settings.load()?;
        self.world.load()?;
        Ok(())
    }

    /// Builds the landing-page summary from the current snapshots.
    pub fn overview(&self) -> WorkbookOverview {
        let domains = Domain::ALL
            .into_iter()
            .map(|domain| DomainSummary {
                domain,
                title: domain.title(),
                description: domain.description(),
                route: domain.route(),
                record_count: self.record_count(domain),
            })
            .collect();
        WorkbookOverview { domains }
    }

    fn record_count(&self, domain: Domain) -> usize {
        match domain {
            Domain::Characters => self.characters.len(),
            Domain::PlotEvents => self.plot_events.len(),
            Domain::Settings => self.settings.len(),
            Domain::WorldElements => self.world.len(),
        }
    }
}
