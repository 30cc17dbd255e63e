use plotbook_core::db::open_db_in_memory;
use plotbook_core::{
    CategorizedCollection, CategorizedStore, Category, KeyValueRepository, Record,
    SettingCategory, SettingFields, SqliteKeyValueRepository, StoreError, WorldCategory,
    WorldElementFields,
};

fn setting(name: &str) -> SettingFields {
    SettingFields {
        name: name.to_string(),
        ..SettingFields::default()
    }
}

fn element(name: &str) -> WorldElementFields {
    WorldElementFields {
        name: name.to_string(),
        ..WorldElementFields::default()
    }
}

#[test]
fn absent_document_loads_every_category_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();
    let mut store: CategorizedStore<SettingFields, _> = CategorizedStore::open(repo).unwrap();

    let loaded = store.load().unwrap();
    for category in SettingCategory::ALL {
        assert!(loaded.get(*category).is_empty());
    }
    assert_eq!(loaded.iter().count(), SettingCategory::ALL.len());
}

#[test]
fn creates_land_in_their_own_category() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();
    let mut store: CategorizedStore<SettingFields, _> = CategorizedStore::open(repo).unwrap();

    store
        .create(SettingCategory::Magic, setting("Elemental Binding"))
        .unwrap();
    store
        .create(SettingCategory::Religion, setting("Sun Cult"))
        .unwrap();

    let mut reopened: CategorizedStore<SettingFields, _> = CategorizedStore::open(repo).unwrap();
    let loaded = reopened.load().unwrap();
    assert_eq!(loaded.get(SettingCategory::Magic).len(), 1);
    assert_eq!(loaded.get(SettingCategory::Religion).len(), 1);
    assert!(loaded.get(SettingCategory::Culture).is_empty());
    assert_eq!(
        loaded.get(SettingCategory::Magic)[0].fields.name,
        "Elemental Binding"
    );
}

#[test]
fn mutating_one_category_leaves_others_untouched() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();
    let mut store: CategorizedStore<WorldElementFields, _> = CategorizedStore::open(repo).unwrap();
    let ridge = store
        .create(WorldCategory::Geography, element("Iron Ridge"))
        .unwrap();
    let war = store
        .create(WorldCategory::History, element("The Long War"))
        .unwrap();
    let history_before = store.records(WorldCategory::History).to_vec();

    store
        .update(WorldCategory::Geography, ridge.id, element("Iron Ridges"))
        .unwrap();
    store
        .create(WorldCategory::Geography, element("Salt Flats"))
        .unwrap();
    store.delete(WorldCategory::Geography, ridge.id).unwrap();

    assert_eq!(store.records(WorldCategory::History), history_before.as_slice());
    assert_eq!(store.records(WorldCategory::History), &[war]);
    assert_eq!(store.records(WorldCategory::Geography).len(), 1);
}

#[test]
fn update_is_scoped_to_the_named_category() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();
    let mut store: CategorizedStore<SettingFields, _> = CategorizedStore::open(repo).unwrap();
    let cult = store
        .create(SettingCategory::Religion, setting("Sun Cult"))
        .unwrap();

    let err = store
        .update(SettingCategory::Politics, cult.id, setting("Sun Court"))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::NotFound { key: "worldSettings", id } if id == cult.id
    ));

    let updated = store
        .update(SettingCategory::Religion, cult.id, setting("Sun Court"))
        .unwrap();
    assert_eq!(updated.id, cult.id);
    assert_eq!(
        store.get(SettingCategory::Religion, cult.id),
        Some(&Record::new(cult.id, setting("Sun Court")))
    );
}

#[test]
fn delete_in_wrong_category_is_a_noop() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();
    let mut store: CategorizedStore<WorldElementFields, _> = CategorizedStore::open(repo).unwrap();
    let crown = store
        .create(WorldCategory::Artifacts, element("Crown of Dusk"))
        .unwrap();

    assert!(!store.delete(WorldCategory::Races, crown.id).unwrap());
    assert_eq!(store.records(WorldCategory::Artifacts), &[crown.clone()]);

    assert!(store.delete(WorldCategory::Artifacts, crown.id).unwrap());
    assert!(store.is_empty());
}

#[test]
fn ids_are_unique_across_categories() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();
    let mut store: CategorizedStore<WorldElementFields, _> = CategorizedStore::open(repo).unwrap();

    let mut ids = Vec::new();
    for category in WorldCategory::ALL.iter().cycle().take(20) {
        ids.push(store.create(*category, element("x")).unwrap().id);
    }
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), ids.len());
}

#[test]
fn max_id_in_one_category_exhausts_ids_for_all_categories() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();
    let stored = r#"{"magic":[{"id":9223372036854775807,"name":"Last"}]}"#;
    repo.put_value("worldSettings", stored).unwrap();

    let mut store: CategorizedStore<SettingFields, _> = CategorizedStore::open(repo).unwrap();
    let err = store
        .create(SettingCategory::Politics, setting("Senate"))
        .unwrap_err();
    assert!(matches!(err, StoreError::IdExhausted { key: "worldSettings" }));

    assert!(store.records(SettingCategory::Politics).is_empty());
    assert_eq!(repo.get_value("worldSettings").unwrap().as_deref(), Some(stored));
}

#[test]
fn persisted_document_lists_every_category() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();
    let mut store: CategorizedStore<SettingFields, _> = CategorizedStore::open(repo).unwrap();
    store
        .create(SettingCategory::Technology, setting("Clockwork"))
        .unwrap();

    let raw = repo.get_value("worldSettings").unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let object = value.as_object().unwrap();
    let keys = SettingCategory::ALL
        .iter()
        .map(|category| category.key())
        .collect::<Vec<_>>();
    assert_eq!(object.len(), keys.len());
    for key in keys {
        assert!(object[key].is_array(), "missing category {key}");
    }
    assert_eq!(object["technology"][0]["name"], "Clockwork");
}

#[test]
fn persist_then_load_round_trips() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();
    let mut store: CategorizedStore<SettingFields, _> = CategorizedStore::open(repo).unwrap();

    let collection: CategorizedCollection<SettingCategory, SettingFields> = [
        (
            SettingCategory::Magic,
            vec![
                Record::new(10, setting("Runes")),
                Record::new(11, setting("Blood Pacts")),
            ],
        ),
        (SettingCategory::Politics, vec![Record::new(12, setting("Council"))]),
    ]
    .into_iter()
    .collect();
    store.persist(collection.clone()).unwrap();

    let mut reopened: CategorizedStore<SettingFields, _> = CategorizedStore::open(repo).unwrap();
    assert_eq!(reopened.load().unwrap(), &collection);
}

#[test]
fn persist_category_replaces_only_that_category() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();
    let mut store: CategorizedStore<SettingFields, _> = CategorizedStore::open(repo).unwrap();
    let runes = store.create(SettingCategory::Magic, setting("Runes")).unwrap();

    store
        .persist_category(SettingCategory::Culture, vec![Record::new(1, setting("Tea"))])
        .unwrap();

    assert_eq!(store.records(SettingCategory::Magic), &[runes]);
    assert_eq!(store.records(SettingCategory::Culture).len(), 1);
}

#[test]
fn persist_rejects_duplicate_ids_within_a_category() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();
    let mut store: CategorizedStore<SettingFields, _> = CategorizedStore::open(repo).unwrap();

    let err = store
        .persist_category(
            SettingCategory::Magic,
            vec![Record::new(4, setting("a")), Record::new(4, setting("b"))],
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateId { id: 4, .. }));
    assert_eq!(repo.get_value("worldSettings").unwrap(), None);
}

#[test]
fn malformed_document_loads_empty_and_is_quarantined() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();
    repo.put_value("worldElements", r#"{"geography": "oops"}"#)
        .unwrap();

    let mut store: CategorizedStore<WorldElementFields, _> =
        CategorizedStore::open(repo).unwrap();
    assert!(store.is_empty());
    assert_eq!(
        repo.get_value("worldElements.malformed").unwrap().as_deref(),
        Some(r#"{"geography": "oops"}"#)
    );
    assert!(matches!(
        store.try_load().unwrap_err(),
        StoreError::MalformedStoredData {
            key: "worldElements",
            ..
        }
    ));
}

#[test]
fn partial_browser_document_loads_and_is_completed_on_next_write() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();
    repo.put_value(
        "worldElements",
        r#"{"races":[{"id":1712000000000,"name":"Sylphs"}]}"#,
    )
    .unwrap();

    let mut store: CategorizedStore<WorldElementFields, _> =
        CategorizedStore::open(repo).unwrap();
    assert_eq!(store.records(WorldCategory::Races).len(), 1);

    let added = store
        .create(WorldCategory::Races, element("Dwarves"))
        .unwrap();
    assert!(added.id > 1_712_000_000_000);

    let raw = repo.get_value("worldElements").unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value.as_object().map(|o| o.len()), Some(5));
    assert_eq!(value["races"].as_array().map(Vec::len), Some(2));
}
