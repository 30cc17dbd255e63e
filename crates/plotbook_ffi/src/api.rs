//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose list/save/delete per content domain to Dart via FRB.
//! - Keep error semantics simple: every call returns an envelope.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Each call opens the workbook, applies one use-case, and drops it; no
//!   record state is cached between calls.
//! - Category arguments are validated against the closed enumerations.

use log::warn;
use plotbook_core::db::open_db;
use plotbook_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Category, CharacterFields, PlotEventFields, Record, RecordId, SettingCategory, SettingFields,
    SqliteKeyValueRepository, StoreResult, WorkbookService, WorldCategory, WorldElementFields,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const DB_FILE_NAME: &str = "plotbook.sqlite3";
const DB_PATH_ENV: &str = "PLOTBOOK_DB_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

type Workbook<'conn> = WorkbookService<SqliteKeyValueRepository<'conn>>;

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Selects the workbook database file for this process.
///
/// Must run before the first workbook call; afterwards the path is fixed.
/// Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_db_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "db path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "db path already set to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// Result of a create/update/delete call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Id of the created, updated or deleted record.
    pub record_id: Option<i64>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, record_id: RecordId) -> Self {
        Self {
            ok: true,
            record_id: Some(record_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            record_id: None,
            message: message.into(),
        }
    }
}

/// One card on the landing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainCard {
    pub title: String,
    pub description: String,
    pub route: String,
    pub record_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewResponse {
    pub ok: bool,
    pub cards: Vec<DomainCard>,
    pub message: String,
}

/// A category tab: stable key plus display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTab {
    pub key: String,
    pub label: String,
}

/// Character form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterForm {
    pub name: String,
    pub role: String,
    pub description: String,
    pub background: String,
    pub relationships: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterCard {
    pub id: i64,
    pub form: CharacterForm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterListResponse {
    pub ok: bool,
    pub items: Vec<CharacterCard>,
    pub message: String,
}

/// Plot event form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlotEventForm {
    pub title: String,
    pub description: String,
    pub chapter: String,
    pub characters: String,
    pub location: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotEventCard {
    pub id: i64,
    pub form: PlotEventForm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotEventListResponse {
    pub ok: bool,
    pub items: Vec<PlotEventCard>,
    pub message: String,
}

/// Setting form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingForm {
    pub name: String,
    pub description: String,
    pub rules: String,
    pub limitations: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingCard {
    pub id: i64,
    pub form: SettingForm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingListResponse {
    pub ok: bool,
    pub items: Vec<SettingCard>,
    pub message: String,
}

/// World element form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorldElementForm {
    pub name: String,
    pub description: String,
    pub details: String,
    pub significance: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldElementCard {
    pub id: i64,
    pub form: WorldElementForm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldElementListResponse {
    pub ok: bool,
    pub items: Vec<WorldElementCard>,
    pub message: String,
}

/// Returns one card per content domain with current record counts.
#[flutter_rust_bridge::frb(sync)]
pub fn workbook_overview() -> OverviewResponse {
    match with_workbook(|workbook| Ok(workbook.overview())) {
        Ok(overview) => OverviewResponse {
            ok: true,
            cards: overview
                .domains
                .into_iter()
                .map(|summary| DomainCard {
                    title: summary.title.to_string(),
                    description: summary.description.to_string(),
                    route: summary.route.to_string(),
                    record_count: u32::try_from(summary.record_count).unwrap_or(u32::MAX),
                })
                .collect(),
            message: String::new(),
        },
        Err(err) => OverviewResponse {
            ok: false,
            cards: Vec::new(),
            message: format!("workbook_overview failed: {err}"),
        },
    }
}

/// Lists characters in creation order.
#[flutter_rust_bridge::frb(sync)]
pub fn character_list() -> CharacterListResponse {
    match with_workbook(|workbook| Ok(workbook.characters().records().to_vec())) {
        Ok(records) => CharacterListResponse {
            ok: true,
            message: count_message(records.len()),
            items: records.into_iter().map(to_character_card).collect(),
        },
        Err(err) => CharacterListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("character_list failed: {err}"),
        },
    }
}

/// Creates a character when `id` is `None`, otherwise replaces its fields.
#[flutter_rust_bridge::frb(sync)]
pub fn character_save(id: Option<i64>, form: CharacterForm) -> ActionResponse {
    let fields = CharacterFields {
        name: form.name,
        role: form.role,
        description: form.description,
        background: form.background,
        relationships: form.relationships,
    };
    let result = with_workbook(|workbook| {
        let store = workbook.characters_mut();
        match id {
            Some(id) => store.update(id, fields),
            None => store.create(fields),
        }
    });
    save_response("character_save", id, result.map(|record| record.id))
}

#[flutter_rust_bridge::frb(sync)]
pub fn character_delete(id: i64) -> ActionResponse {
    let result = with_workbook(|workbook| workbook.characters_mut().delete(id));
    delete_response("character_delete", id, result)
}

/// Lists plot events in creation order.
#[flutter_rust_bridge::frb(sync)]
pub fn plot_event_list() -> PlotEventListResponse {
    match with_workbook(|workbook| Ok(workbook.plot_events().records().to_vec())) {
        Ok(records) => PlotEventListResponse {
            ok: true,
            message: count_message(records.len()),
            items: records.into_iter().map(to_plot_event_card).collect(),
        },
        Err(err) => PlotEventListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("plot_event_list failed: {err}"),
        },
    }
}

/// Creates a plot event when `id` is `None`, otherwise replaces its fields.
#[flutter_rust_bridge::frb(sync)]
pub fn plot_event_save(id: Option<i64>, form: PlotEventForm) -> ActionResponse {
    let fields = PlotEventFields {
        title: form.title,
        description: form.description,
        chapter: form.chapter,
        characters: form.characters,
        location: form.location,
        notes: form.notes,
    };
    let result = with_workbook(|workbook| {
        let store = workbook.plot_events_mut();
        match id {
            Some(id) => store.update(id, fields),
            None => store.create(fields),
        }
    });
    save_response("plot_event_save", id, result.map(|record| record.id))
}

#[flutter_rust_bridge::frb(sync)]
pub fn plot_event_delete(id: i64) -> ActionResponse {
    let result = with_workbook(|workbook| workbook.plot_events_mut().delete(id));
    delete_response("plot_event_delete", id, result)
}

/// Setting tabs in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn setting_categories() -> Vec<CategoryTab> {
    category_tabs::<SettingCategory>()
}

/// Lists one setting category in creation order.
#[flutter_rust_bridge::frb(sync)]
pub fn setting_list(category: String) -> SettingListResponse {
    let result = parse_category::<SettingCategory>(&category).and_then(|category| {
        with_workbook(|workbook| Ok(workbook.settings().records(category).to_vec()))
    });
    match result {
        Ok(records) => SettingListResponse {
            ok: true,
            message: count_message(records.len()),
            items: records.into_iter().map(to_setting_card).collect(),
        },
        Err(err) => SettingListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("setting_list failed: {err}"),
        },
    }
}

/// Creates a setting in `category` when `id` is `None`, otherwise replaces
/// the fields of that setting within `category`.
#[flutter_rust_bridge::frb(sync)]
pub fn setting_save(category: String, id: Option<i64>, form: SettingForm) -> ActionResponse {
    let fields = SettingFields {
        name: form.name,
        description: form.description,
        rules: form.rules,
        limitations: form.limitations,
        notes: form.notes,
    };
    let result = parse_category::<SettingCategory>(&category).and_then(|category| {
        with_workbook(|workbook| {
            let store = workbook.settings_mut();
            match id {
                Some(id) => store.update(category, id, fields),
                None => store.create(category, fields),
            }
        })
    });
    save_response("setting_save", id, result.map(|record| record.id))
}

#[flutter_rust_bridge::frb(sync)]
pub fn setting_delete(category: String, id: i64) -> ActionResponse {
    let result = parse_category::<SettingCategory>(&category).and_then(|category| {
        with_workbook(|workbook| workbook.settings_mut().delete(category, id))
    });
    delete_response("setting_delete", id, result)
}

/// World element tabs in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn world_categories() -> Vec<CategoryTab> {
    category_tabs::<WorldCategory>()
}

/// Lists one world category in creation order.
#[flutter_rust_bridge::frb(sync)]
pub fn world_element_list(category: String) -> WorldElementListResponse {
    let result = parse_category::<WorldCategory>(&category).and_then(|category| {
        with_workbook(|workbook| Ok(workbook.world().records(category).to_vec()))
    });
    match result {
        Ok(records) => WorldElementListResponse {
            ok: true,
            message: count_message(records.len()),
            items: records.into_iter().map(to_world_element_card).collect(),
        },
        Err(err) => WorldElementListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("world_element_list failed: {err}"),
        },
    }
}

/// Creates a world element in `category` when `id` is `None`, otherwise
/// replaces the fields of that element within `category`.
#[flutter_rust_bridge::frb(sync)]
pub fn world_element_save(
    category: String,
    id: Option<i64>,
    form: WorldElementForm,
) -> ActionResponse {
    let fields = WorldElementFields {
        name: form.name,
        description: form.description,
        details: form.details,
        significance: form.significance,
        notes: form.notes,
    };
    let result = parse_category::<WorldCategory>(&category).and_then(|category| {
        with_workbook(|workbook| {
            let store = workbook.world_mut();
            match id {
                Some(id) => store.update(category, id, fields),
                None => store.create(category, fields),
            }
        })
    });
    save_response("world_element_save", id, result.map(|record| record.id))
}

#[flutter_rust_bridge::frb(sync)]
pub fn world_element_delete(category: String, id: i64) -> ActionResponse {
    let result = parse_category::<WorldCategory>(&category).and_then(|category| {
        with_workbook(|workbook| workbook.world_mut().delete(category, id))
    });
    delete_response("world_element_delete", id, result)
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_workbook<T>(f: impl FnOnce(&mut Workbook<'_>) -> StoreResult<T>) -> Result<T, String> {
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("workbook DB open failed: {err}"))?;
    let repo = SqliteKeyValueRepository::try_new(&conn)
        .map_err(|err| format!("workbook repo init failed: {err}"))?;
    let mut workbook =
        WorkbookService::open(repo).map_err(|err| format!("workbook load failed: {err}"))?;
    f(&mut workbook).map_err(|err| err.to_string())
}

fn parse_category<C: Category>(key: &str) -> Result<C, String> {
    C::from_key(key.trim()).ok_or_else(|| {
        let expected = C::ALL
            .iter()
            .map(|category| category.key())
            .collect::<Vec<_>>()
            .join("|");
        warn!("event=ffi_category_rejected module=ffi status=error expected={expected}");
        format!("unknown category `{key}`; expected {expected}")
    })
}

fn category_tabs<C: Category>() -> Vec<CategoryTab> {
    C::ALL
        .iter()
        .map(|category| CategoryTab {
            key: category.key().to_string(),
            label: category.label().to_string(),
        })
        .collect()
}

fn save_response(
    operation: &str,
    requested_id: Option<i64>,
    result: Result<RecordId, String>,
) -> ActionResponse {
    match (result, requested_id) {
        (Ok(id), None) => ActionResponse::success("Record created.", id),
        (Ok(id), Some(_)) => ActionResponse::success("Record updated.", id),
        (Err(err), _) => ActionResponse::failure(format!("{operation} failed: {err}")),
    }
}

fn delete_response(operation: &str, id: i64, result: Result<bool, String>) -> ActionResponse {
    match result {
        Ok(true) => ActionResponse::success("Record deleted.", id),
        Ok(false) => ActionResponse::success("Record already absent.", id),
        Err(err) => ActionResponse::failure(format!("{operation} failed: {err}")),
    }
}

fn count_message(count: usize) -> String {
    if count == 0 {
        "No records.".to_string()
    } else {
        format!("{count} record(s).")
    }
}

fn to_character_card(record: Record<CharacterFields>) -> CharacterCard {
    let fields = record.fields;
    CharacterCard {
        id: record.id,
        form: CharacterForm {
            name: fields.name,
            role: fields.role,
            description: fields.description,
            background: fields.background,
            relationships: fields.relationships,
        },
    }
}

fn to_plot_event_card(record: Record<PlotEventFields>) -> PlotEventCard {
    let fields = record.fields;
    PlotEventCard {
        id: record.id,
        form: PlotEventForm {
            title: fields.title,
            description: fields.description,
            chapter: fields.chapter,
            characters: fields.characters,
            location: fields.location,
            notes: fields.notes,
        },
    }
}

fn to_setting_card(record: Record<SettingFields>) -> SettingCard {
    let fields = record.fields;
    SettingCard {
        id: record.id,
        form: SettingForm {
            name: fields.name,
            description: fields.description,
            rules: fields.rules,
            limitations: fields.limitations,
            notes: fields.notes,
        },
    }
}

fn to_world_element_card(record: Record<WorldElementFields>) -> WorldElementCard {
    let fields = record.fields;
    WorldElementCard {
        id: record.id,
        form: WorldElementForm {
            name: fields.name,
            description: fields.description,
            details: fields.details,
            significance: fields.significance,
            notes: fields.notes,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{
        character_delete, character_list, character_save, configure_db_path, core_version,
        init_logging, ping, plot_event_list, plot_event_save, setting_categories, setting_delete,
        setting_list, setting_save, workbook_overview, world_categories, world_element_list,
        world_element_save, CharacterForm, PlotEventForm, SettingForm, WorldElementForm,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn configure_db_path_rejects_empty_path() {
        assert!(!configure_db_path("  ".to_string()).is_empty());
    }

    #[test]
    fn configure_db_path_is_fixed_after_first_use() {
        use_test_db();
        assert!(configure_db_path(test_db_path()).is_empty());
        let error = configure_db_path(format!("{}.other", test_db_path()));
        assert!(error.contains("refusing to switch"));
    }

    #[test]
    fn character_save_list_update_delete_flow() {
        use_test_db();
        let token = unique_token("character");
        let created = character_save(
            None,
            CharacterForm {
                name: token.clone(),
                role: "Mage".to_string(),
                ..CharacterForm::default()
            },
        );
        assert!(created.ok, "{}", created.message);
        let id = created.record_id.expect("create should return record_id");

        let updated = character_save(
            Some(id),
            CharacterForm {
                name: token.clone(),
                role: "Archmage".to_string(),
                ..CharacterForm::default()
            },
        );
        assert!(updated.ok, "{}", updated.message);
        assert_eq!(updated.record_id, Some(id));

        let listed = character_list();
        assert!(listed.ok, "{}", listed.message);
        let card = listed
            .items
            .iter()
            .find(|card| card.id == id)
            .expect("saved character should be listed");
        assert_eq!(card.form.role, "Archmage");

        let deleted = character_delete(id);
        assert!(deleted.ok, "{}", deleted.message);
        assert!(character_list().items.iter().all(|card| card.id != id));
    }

    #[test]
    fn character_save_with_unknown_id_fails() {
        use_test_db();
        let response = character_save(Some(-1), CharacterForm::default());
        assert!(!response.ok);
        assert!(response.message.contains("not found"));
    }

    #[test]
    fn plot_event_save_appends_to_list() {
        use_test_db();
        let token = unique_token("plot");
        let created = plot_event_save(
            None,
            PlotEventForm {
                title: token.clone(),
                chapter: "2".to_string(),
                ..PlotEventForm::default()
            },
        );
        assert!(created.ok, "{}", created.message);

        let listed = plot_event_list();
        assert!(listed
            .items
            .iter()
            .any(|card| card.form.title == token && card.form.chapter == "2"));
    }

    #[test]
    fn setting_save_is_scoped_to_category() {
        use_test_db();
        let token = unique_token("setting");
        let created = setting_save(
            "magic".to_string(),
            None,
            SettingForm {
                name: token.clone(),
                ..SettingForm::default()
            },
        );
        assert!(created.ok, "{}", created.message);
        let id = created.record_id.expect("create should return record_id");

        assert!(setting_list("magic".to_string())
            .items
            .iter()
            .any(|card| card.id == id));
        assert!(setting_list("religion".to_string())
            .items
            .iter()
            .all(|card| card.id != id));

        let wrong_category = setting_save("religion".to_string(), Some(id), SettingForm::default());
        assert!(!wrong_category.ok);

        assert!(setting_delete("magic".to_string(), id).ok);
    }

    #[test]
    fn unknown_category_is_rejected() {
        use_test_db();
        let response = world_element_save(
            "astrology".to_string(),
            None,
            WorldElementForm::default(),
        );
        assert!(!response.ok);
        assert!(response.message.contains("unknown category"));

        let listed = world_element_list("astrology".to_string());
        assert!(!listed.ok);
    }

    #[test]
    fn category_tabs_follow_display_order() {
        let settings = setting_categories()
            .into_iter()
            .map(|tab| tab.key)
            .collect::<Vec<_>>();
        assert_eq!(
            settings,
            vec!["magic", "technology", "culture", "religion", "politics"]
        );
        let world = world_categories();
        assert_eq!(world.len(), 5);
        assert_eq!(world[0].label, "地理・地形");
    }

    #[test]
    fn overview_lists_four_domains() {
        use_test_db();
        let overview = workbook_overview();
        assert!(overview.ok, "{}", overview.message);
        let routes = overview
            .cards
            .iter()
            .map(|card| card.route.as_str())
            .collect::<Vec<_>>();
        assert_eq!(routes, vec!["/characters", "/plot", "/settings", "/world"]);
    }

    fn test_db_path() -> String {
        std::env::temp_dir()
            .join(format!("plotbook-ffi-test-{}.sqlite3", std::process::id()))
            .to_string_lossy()
            .into_owned()
    }

    fn use_test_db() {
        let error = configure_db_path(test_db_path());
        assert!(error.is_empty(), "{error}");
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
