use chrono::{Duration, TimeZone, Utc};
use kitshelf_core::{CategoryId, ItemId, LocationId};
use kitshelf_store::{
    Category, FileStorage, InventoryState, InventoryStore, Item, ItemDraft, LendRequest, Location, MemoryStorage,
    StorageBackend, StoreConfig,
};
use proptest::prelude::*;

const KEY: &str = "inventory-storage";

fn init_logging() {
    kitshelf_observability::init();
}

fn populate(store: &mut InventoryStore) {
    let t0 = Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap();
    store.add_item(Item::new(ItemId::from("1"), "Drill", "123", "Tools", "Warehouse", 2, t0));
    store.add_item(
        Item::new(ItemId::from("2"), "Projector", "456", "Electronics", "Main Office", 1, t0)
            .with_description("HDMI only")
            .with_image("file:///photos/projector.jpg"),
    );
    store.lend_item(
        &ItemId::from("2"),
        "Alice",
        "Conference Room",
        Some((t0 + Duration::days(7)).to_rfc3339()),
        Some("bring back the remote".to_string()),
    );
    store.add_category(Category::new("4", "Garden"));
    store.remove_location(&LocationId::from("3"));
}

#[test]
fn file_store_survives_restart() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig {
        storage_key: KEY.to_string(),
        backend: StorageBackend::File {
            dir: Some(dir.path().to_path_buf()),
        },
    };

    let expected = {
        let mut store = InventoryStore::open(&config).unwrap();
        populate(&mut store);
        store.state().clone()
    };
    assert!(dir.path().join("inventory-storage.json").exists());

    let reopened = InventoryStore::open(&config).unwrap();
    assert_eq!(reopened.state(), &expected);
    assert!(reopened.items()[1].is_lent());
    assert_eq!(reopened.items()[1].lending_info().unwrap().borrower, "Alice");
}

#[test]
fn sqlite_store_survives_restart() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig {
        storage_key: KEY.to_string(),
        backend: StorageBackend::Sqlite {
            path: Some(dir.path().join("nested").join("inventory.db")),
        },
    };

    let expected = {
        let mut store = InventoryStore::open(&config).unwrap();
        populate(&mut store);
        store.return_item(&ItemId::from("2"));
        store.state().clone()
    };

    let reopened = InventoryStore::open(&config).unwrap();
    assert_eq!(reopened.state(), &expected);
    assert!(reopened.lent_items().is_empty());
}

#[test]
fn missing_snapshot_starts_from_defaults() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let store = InventoryStore::with_storage(FileStorage::new(dir.path()), KEY).unwrap();
    assert_eq!(store.state(), &InventoryState::default());
}

#[test]
fn corrupt_snapshot_falls_back_to_defaults() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("inventory-storage.json"), "{ this is not json").unwrap();

    let mut store = InventoryStore::with_storage(FileStorage::new(dir.path()), KEY).unwrap();
    assert_eq!(store.state(), &InventoryState::default());

    // The next mutation overwrites the corrupt document.
    store.add_category(Category::new("4", "Garden"));
    store.flush();
    let raw = std::fs::read_to_string(dir.path().join("inventory-storage.json")).unwrap();
    assert!(raw.contains("Garden"));
}

#[test]
fn newer_snapshot_version_falls_back_to_defaults() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("inventory-storage.json"),
        r#"{"state": {"items": [], "categories": [], "locations": []}, "version": 9}"#,
    )
    .unwrap();

    let store = InventoryStore::with_storage(FileStorage::new(dir.path()), KEY).unwrap();
    assert_eq!(store.categories().len(), 3);
}

#[test]
fn reset_persists_defaults() {
    let storage = MemoryStorage::new();
    {
        let mut store = InventoryStore::with_storage(storage.clone(), KEY).unwrap();
        populate(&mut store);
        store.reset();
    }

    let reopened = InventoryStore::with_storage(storage, KEY).unwrap();
    assert_eq!(reopened.state(), &InventoryState::default());
}

#[test]
fn stores_under_different_keys_are_independent() {
    let storage = MemoryStorage::new();
    {
        let mut a = InventoryStore::with_storage(storage.clone(), "a").unwrap();
        a.add_location(Location::new("4", "Garage"));
    }

    let b = InventoryStore::with_storage(storage.clone(), "b").unwrap();
    assert_eq!(b.locations().len(), 3);
    let a = InventoryStore::with_storage(storage, "a").unwrap();
    assert_eq!(a.locations().len(), 4);
}

#[test]
fn add_and_lend_through_form_validation() {
    let mut store = InventoryStore::in_memory();

    let draft = ItemDraft {
        name: "Ladder".to_string(),
        barcode: "777".to_string(),
        category: "Tools".to_string(),
        location: "Storage Room".to_string(),
        quantity: "1".to_string(),
        ..ItemDraft::default()
    };
    let item = draft.into_item(Utc::now()).unwrap();
    let id = item.id_typed().clone();
    store.add_item(item);

    let request = LendRequest {
        item_id: id.clone(),
        borrower: "  Sam ".to_string(),
        expected_return: String::new(),
        notes: String::new(),
    };
    let terms = request.validate(store.state()).unwrap();
    store.lend_item_with(&id, terms);

    let info = store.item(&id).unwrap().lending_info().unwrap();
    assert_eq!(info.borrower, "Sam");
    assert_eq!(info.location, "Storage Room");

    // A second request for the same item is refused by validation.
    assert!(request.validate(store.state()).is_err());
    store.remove_category(&CategoryId::from("3"));
    assert_eq!(store.item(&id).unwrap().category, "Tools");
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 32,
        ..ProptestConfig::default()
    })]

    /// Property: whatever was committed is exactly what a fresh store loads.
    #[test]
    fn persisted_state_reloads_equal(
        names in proptest::collection::vec("[A-Za-z][A-Za-z ]{0,15}", 0..8),
        lend_mask in proptest::collection::vec(any::<bool>(), 8),
    ) {
        let storage = MemoryStorage::new();
        let expected = {
            let mut store = InventoryStore::with_storage(storage.clone(), KEY).unwrap();
            for (n, name) in names.iter().enumerate() {
                let id = ItemId::from(n.to_string());
                store.add_item(Item::new(id.clone(), name.clone(), format!("BC{n}"), "Tools", "Warehouse", n as i64, Utc::now()));
                if lend_mask[n] {
                    store.lend_item(&id, "Borrower", "Elsewhere", None, None);
                }
            }
            store.state().clone()
        };

        let reopened = InventoryStore::with_storage(storage, KEY).unwrap();
        prop_assert_eq!(reopened.state(), &expected);
    }
}
