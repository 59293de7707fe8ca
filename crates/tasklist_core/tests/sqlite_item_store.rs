use std::time::{SystemTime, UNIX_EPOCH};
use tasklist_core::db::open_db_in_memory;
use tasklist_core::{
    ItemListQuery, ItemPatch, ItemStore, NewItem, OwnerId, SortOrder, SqliteItemStore,
    StoreError,
};

fn store() -> SqliteItemStore {
    SqliteItemStore::new(open_db_in_memory().unwrap())
}

fn add(store: &mut SqliteItemStore, owner: &OwnerId, text: &str) -> tasklist_core::ItemId {
    store
        .add_item(owner, &NewItem::parse(text).unwrap())
        .unwrap()
}

#[test]
fn add_assigns_key_timestamp_and_incomplete_state() {
    let mut store = store();
    let owner = OwnerId::new("alice");

    let id = add(&mut store, &owner, "  Buy milk  ");
    let items = store.list_items(&owner, &ItemListQuery::default()).unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, id);
    assert_eq!(items[0].text, "Buy milk");
    assert!(!items[0].completed);
    assert!(items[0].created_at > 0);
}

#[test]
fn created_at_is_epoch_milliseconds() {
    let mut store = store();
    let owner = OwnerId::new("alice");

    let before = epoch_millis();
    add(&mut store, &owner, "Buy milk");
    let after = epoch_millis();
    let items = store.list_items(&owner, &ItemListQuery::default()).unwrap();

    // Small slack for float rounding inside SQLite's clock.
    let created_at = items[0].created_at;
    assert!(created_at + 5 >= before, "{created_at} < {before}");
    assert!(created_at <= after + 5, "{created_at} > {after}");
}

fn epoch_millis() -> i64 {
    let elapsed = SystemTime::now().duration_since(UNIX_EPOCH).unwrap();
    i64::try_from(elapsed.as_millis()).unwrap()
}

#[test]
fn generated_ids_are_unique() {
    let mut store = store();
    let owner = OwnerId::new("alice");
    let first = add(&mut store, &owner, "a");
    let second = add(&mut store, &owner, "a");
    assert_ne!(first, second);
}

#[test]
fn owners_never_see_each_others_items() {
    let mut store = store();
    let alice = OwnerId::new("alice");
    let bob = OwnerId::new("bob");

    let alice_item = add(&mut store, &alice, "alice task");
    add(&mut store, &bob, "bob task");

    let bob_items = store.list_items(&bob, &ItemListQuery::default()).unwrap();
    assert_eq!(bob_items.len(), 1);
    assert_eq!(bob_items[0].text, "bob task");

    let err = store.delete_item(&bob, &alice_item).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == alice_item));
    let err = store
        .update_item(&bob, &alice_item, &ItemPatch::completed(true))
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    assert_eq!(
        store.list_items(&alice, &ItemListQuery::default()).unwrap().len(),
        1
    );
}

#[test]
fn update_patches_fields_and_preserves_identity() {
    let mut store = store();
    let owner = OwnerId::new("alice");
    let id = add(&mut store, &owner, "draft");
    let before = store.list_items(&owner, &ItemListQuery::default()).unwrap()[0].clone();

    store
        .update_item(&owner, &id, &ItemPatch::completed(true))
        .unwrap();
    store
        .update_item(&owner, &id, &ItemPatch::text("final").unwrap())
        .unwrap();

    let after = store.list_items(&owner, &ItemListQuery::default()).unwrap()[0].clone();
    assert_eq!(after.id, before.id);
    assert_eq!(after.created_at, before.created_at);
    assert_eq!(after.text, "final");
    assert!(after.completed);
}

#[test]
fn update_rejects_blank_text_without_writing() {
    let mut store = store();
    let owner = OwnerId::new("alice");
    let id = add(&mut store, &owner, "keep me");

    let patch = ItemPatch {
        text: Some("   ".to_string()),
        completed: None,
    };
    let err = store.update_item(&owner, &id, &patch).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(
        store.list_items(&owner, &ItemListQuery::default()).unwrap()[0].text,
        "keep me"
    );
}

#[test]
fn delete_removes_item_and_missing_id_is_not_found() {
    let mut store = store();
    let owner = OwnerId::new("alice");
    let keep = add(&mut store, &owner, "keep");
    let gone = add(&mut store, &owner, "gone");

    store.delete_item(&owner, &gone).unwrap();
    let err = store.delete_item(&owner, &gone).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));

    let items = store.list_items(&owner, &ItemListQuery::default()).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, keep);
}

#[test]
fn list_filters_by_completion_and_orders_by_creation() {
    let mut store = store();
    let owner = OwnerId::new("alice");
    let first = add(&mut store, &owner, "first");
    add(&mut store, &owner, "second");
    add(&mut store, &owner, "third");
    store
        .update_item(&owner, &first, &ItemPatch::completed(true))
        .unwrap();

    let texts = |query: ItemListQuery| {
        store
            .list_items(&owner, &query)
            .unwrap()
            .into_iter()
            .map(|item| item.text)
            .collect::<Vec<_>>()
    };

    assert_eq!(
        texts(ItemListQuery {
            completed: None,
            sort: Some(SortOrder::NewestFirst),
        }),
        vec!["third", "second", "first"]
    );
    assert_eq!(
        texts(ItemListQuery {
            completed: None,
            sort: Some(SortOrder::OldestFirst),
        }),
        vec!["first", "second", "third"]
    );
    assert_eq!(
        texts(ItemListQuery {
            completed: Some(false),
            sort: Some(SortOrder::NewestFirst),
        }),
        vec!["third", "second"]
    );
    assert_eq!(
        texts(ItemListQuery {
            completed: Some(true),
            sort: None,
        }),
        vec!["first"]
    );
}

#[test]
fn corrupted_completed_value_is_rejected_on_read() {
    let mut store = store();
    let owner = OwnerId::new("alice");
    add(&mut store, &owner, "x");
    store
        .connection()
        .execute_batch("PRAGMA ignore_check_constraints = ON; UPDATE items SET completed = 7;")
        .unwrap();

    let err = store
        .list_items(&owner, &ItemListQuery::default())
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}
