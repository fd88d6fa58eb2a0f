//! Behavioural coverage for the in-memory record store.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use actix_rt::System;
use rstest::rstest;
use serde_json::{Map, Value, json};

use pagination::SortSpec;

use crate::domain::ports::{FieldFilter, RecordStore, RowRange, SelectQuery};

use super::InMemoryRecordStore;

fn insert_named(store: &InMemoryRecordStore, name: &str, tenant: &str) -> Value {
    System::new().block_on(async {
        store
            .insert("assets", &json!({ "name": name, "tenant_id": tenant }))
            .await
            .expect("insert succeeds")
    })
}

#[rstest]
fn insert_assigns_id_and_matching_timestamps() {
    let store = InMemoryRecordStore::new();
    let stored = insert_named(&store, "pump", "acme");

    assert!(stored["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(stored["created_at"], stored["updated_at"]);

    System::new().block_on(async {
        let id = stored["id"].as_str().expect("id assigned");
        let fetched = store.fetch("assets", id).await.expect("fetch succeeds");
        assert_eq!(fetched, Some(stored.clone()));
    });
}

#[rstest]
fn insert_rejects_non_object_records() {
    let store = InMemoryRecordStore::new();
    System::new().block_on(async {
        let outcome = store.insert("assets", &json!("not an object")).await;
        assert!(outcome.is_err());
    });
}

#[rstest]
fn patch_changes_only_supplied_fields_and_bumps_updated_at() {
    let store = InMemoryRecordStore::new();
    let stored = insert_named(&store, "pump", "acme");
    let id = stored["id"].as_str().expect("id assigned").to_owned();

    System::new().block_on(async {
        let mut changes = Map::new();
        changes.insert("name".to_owned(), Value::String("valve".to_owned()));
        let patched = store
            .patch("assets", &id, &changes)
            .await
            .expect("patch succeeds")
            .expect("row exists");

        assert_eq!(patched["name"], "valve");
        assert_eq!(patched["tenant_id"], stored["tenant_id"]);
        assert_eq!(patched["created_at"], stored["created_at"]);
        assert_ne!(patched["updated_at"], Value::Null);
    });
}

#[rstest]
fn patch_on_unknown_id_creates_nothing() {
    let store = InMemoryRecordStore::new();
    System::new().block_on(async {
        let outcome = store
            .patch("assets", "missing", &Map::new())
            .await
            .expect("patch succeeds");
        assert_eq!(outcome, None);

        let page = store
            .select("assets", &SelectQuery::default())
            .await
            .expect("select succeeds");
        assert_eq!(page.total, 0);
    });
}

#[rstest]
fn select_sorts_and_windows() {
    let store = InMemoryRecordStore::new();
    for name in ["charlie", "alpha", "bravo"] {
        insert_named(&store, name, "acme");
    }

    System::new().block_on(async {
        let query = SelectQuery {
            filter: None,
            sort: Some(SortSpec::ascending("name").expect("valid field")),
            range: Some(RowRange { offset: 1, count: 1 }),
        };
        let page = store.select("assets", &query).await.expect("select succeeds");

        assert_eq!(page.total, 3);
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records.first().map(|r| r["name"].clone()), Some(json!("bravo")));

        let descending = SelectQuery {
            filter: None,
            sort: Some(SortSpec::descending("name").expect("valid field")),
            range: None,
        };
        let page = store
            .select("assets", &descending)
            .await
            .expect("select succeeds");
        let names: Vec<&str> = page
            .records
            .iter()
            .filter_map(|r| r["name"].as_str())
            .collect();
        assert_eq!(names, vec!["charlie", "bravo", "alpha"]);
    });
}

#[rstest]
fn select_filters_by_tenant_equality() {
    let store = InMemoryRecordStore::new();
    insert_named(&store, "pump", "acme");
    insert_named(&store, "valve", "acme");
    insert_named(&store, "belt", "globex");

    System::new().block_on(async {
        let query = SelectQuery {
            filter: Some(FieldFilter::eq("tenant_id", "acme")),
            sort: None,
            range: None,
        };
        let page = store.select("assets", &query).await.expect("select succeeds");
        assert_eq!(page.total, 2);
        assert!(page.records.iter().all(|r| r["tenant_id"] == "acme"));
    });
}

#[rstest]
fn remove_reports_whether_a_row_existed() {
    let store = InMemoryRecordStore::new();
    let stored = insert_named(&store, "pump", "acme");
    let id = stored["id"].as_str().expect("id assigned").to_owned();

    System::new().block_on(async {
        assert!(store.remove("assets", &id).await.expect("remove succeeds"));
        assert!(!store.remove("assets", &id).await.expect("remove succeeds"));
    });
}

#[rstest]
fn unknown_collection_selects_empty() {
    let store = InMemoryRecordStore::new();
    System::new().block_on(async {
        let page = store
            .select("nowhere", &SelectQuery::default())
            .await
            .expect("select succeeds");
        assert_eq!(page.total, 0);
        assert!(page.records.is_empty());
    });
}
