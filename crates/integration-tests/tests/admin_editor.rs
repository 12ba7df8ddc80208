//! Integration tests for the admin editor workflow.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use secrecy::SecretString;
use serde_json::json;
use shopfront::admin::{EditorMode, ProductForm};
use shopfront::api::ApiSchema;
use shopfront::storage::LocalStorage;
use shopfront::{Notice, Storefront, StorefrontError};
use shopfront_core::ProductId;
use shopfront_integration_tests::{FakeProductStore, sample_products};

fn logged_in(fake: &FakeProductStore) -> Storefront {
    let mut store = Storefront::with_storage(
        fake.config(&std::env::temp_dir()),
        LocalStorage::in_memory(),
    );
    store
        .login_with_token(SecretString::from("admin-token".to_string()))
        .unwrap();
    store
}

fn fill(form: &mut ProductForm) {
    form.product_id = "p-9".to_owned();
    form.name = "Yellow Scarf".to_owned();
    form.price = "8.50".to_owned();
    form.stock = "4".to_owned();
    form.image = "https://img.example/scarf.png".to_owned();
    form.description = "Wool".to_owned();
    form.tags = "a, b,c".to_owned();
}

// ============================================================================
// Loading & gating
// ============================================================================

#[tokio::test]
async fn test_open_admin_loads_records() {
    let fake = FakeProductStore::with_products(ApiSchema::Backend, &sample_products()).await;
    let mut store = logged_in(&fake);

    assert_eq!(store.open_admin().await.unwrap(), 3);
    assert_eq!(store.admin().records().len(), 3);
    assert_eq!(store.admin().mode(), &EditorMode::Create);
}

#[tokio::test]
async fn test_failed_admin_load_is_not_fatal() {
    let fake = FakeProductStore::with_products(ApiSchema::Backend, &sample_products()).await;
    fake.fail_with(StatusCode::INTERNAL_SERVER_ERROR);
    let mut store = logged_in(&fake);

    assert_eq!(store.open_admin().await.unwrap(), 0);
    assert!(store.admin().records().is_empty());
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_admin_requires_login() {
    let fake = FakeProductStore::with_products(ApiSchema::Backend, &sample_products()).await;
    let mut store = Storefront::with_storage(
        fake.config(&std::env::temp_dir()),
        LocalStorage::in_memory(),
    );

    assert!(store.open_admin().await.unwrap_err().redirects_to_login());
    assert!(store.admin_submit().await.unwrap_err().redirects_to_login());
    assert_eq!(fake.requests(), 0);
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_splits_tags_and_resets_form() {
    let fake = FakeProductStore::start(ApiSchema::Backend).await;
    let mut store = logged_in(&fake);
    fill(store.admin_form().unwrap());

    let notice = store.admin_submit().await.unwrap();

    assert_eq!(notice, Notice::ProductCreated);
    assert_eq!(notice.to_string(), "商品新增成功!");

    let stored = fake.records();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["product_id"], json!("p-9"));
    assert_eq!(stored[0]["tags"], json!(["a", "b", "c"]));
    assert_eq!(stored[0]["stock"], json!(4));

    let records = store.admin().records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].tags, vec!["a", "b", "c"]);
    assert_eq!(store.admin().mode(), &EditorMode::Create);
    assert!(store.admin().form().product_id.is_empty());
}

#[tokio::test]
async fn test_empty_product_id_rejected_before_network() {
    let fake = FakeProductStore::with_products(ApiSchema::Backend, &sample_products()).await;
    let mut store = logged_in(&fake);
    store.open_admin().await.unwrap();
    let requests = fake.requests();

    let form = store.admin_form().unwrap();
    fill(form);
    form.product_id = String::new();
    let err = store.admin_submit().await.unwrap_err();

    assert!(matches!(err, StorefrontError::Validation(_)));
    assert_eq!(err.notice().to_string(), "所有欄位均為必填！");
    assert_eq!(fake.requests(), requests);
    assert_eq!(store.admin().records().len(), 3);
    assert_eq!(fake.records().len(), 3);
}

#[tokio::test]
async fn test_failed_create_keeps_form() {
    let fake = FakeProductStore::start(ApiSchema::Backend).await;
    let mut store = logged_in(&fake);
    fill(store.admin_form().unwrap());
    fake.fail_with(StatusCode::BAD_REQUEST);

    let err = store.admin_submit().await.unwrap_err();

    assert!(matches!(err, StorefrontError::CreateFailed(_)));
    assert_eq!(err.notice(), Notice::ProductCreateFailed);
    assert_eq!(store.admin().form().name, "Yellow Scarf");
    assert_eq!(store.admin().mode(), &EditorMode::Create);
    assert!(store.admin().records().is_empty());

    // The kept form can be resubmitted as is
    fake.recover();
    assert_eq!(store.admin_submit().await.unwrap(), Notice::ProductCreated);
}

#[tokio::test]
async fn test_fakestore_create_uses_assigned_id() {
    let fake = FakeProductStore::with_products(ApiSchema::FakeStore, &sample_products()).await;
    let mut store = logged_in(&fake);
    fill(store.admin_form().unwrap());

    store.admin_submit().await.unwrap();

    let stored = fake.records();
    assert_eq!(stored.len(), 4);
    assert_eq!(stored[3]["title"], json!("Yellow Scarf"));
    assert_eq!(stored[3]["category"], json!("a"));
    let created = &store.admin().records()[0];
    assert_eq!(created.id.as_str(), "4");
}

// ============================================================================
// Edit
// ============================================================================

#[tokio::test]
async fn test_edit_patches_and_replaces_record() {
    let fake = FakeProductStore::with_products(ApiSchema::Backend, &sample_products()).await;
    let mut store = logged_in(&fake);
    store.open_admin().await.unwrap();

    store.admin_edit(1).unwrap();
    assert_eq!(
        store.admin().mode(),
        &EditorMode::Edit(ProductId::from_store("p-2"))
    );
    assert_eq!(store.admin().form().tags, "飾品配件");
    store.admin_form().unwrap().price = "6.75".to_owned();

    assert_eq!(store.admin_submit().await.unwrap(), Notice::ProductUpdated);

    assert_eq!(fake.records()[1]["price"], json!(6.75));
    assert_eq!(store.admin().records()[1].price.to_string(), "$6.75");
    assert_eq!(store.admin().records().len(), 3);
    assert_eq!(store.admin().mode(), &EditorMode::Create);
}

#[tokio::test]
async fn test_edit_targets_loaded_record_when_id_field_changes() {
    let fake = FakeProductStore::with_products(ApiSchema::Backend, &sample_products()).await;
    let mut store = logged_in(&fake);
    store.open_admin().await.unwrap();

    store.admin_edit(0).unwrap();
    store.admin_form().unwrap().product_id = "p-3".to_owned();
    store.admin_submit().await.unwrap();

    let stored = fake.records();
    assert_eq!(stored[0]["product_id"], json!("p-3"));
    assert_eq!(stored[2]["name"], json!("Green Shirt"));
    let records = store.admin().records();
    assert_eq!(records[0].id.as_str(), "p-3");
    assert_eq!(records[0].name, "Red Shirt");
    assert_eq!(records[2].name, "Green Shirt");
}

#[tokio::test]
async fn test_failed_update_keeps_edit_mode() {
    let fake = FakeProductStore::with_products(ApiSchema::Backend, &sample_products()).await;
    let mut store = logged_in(&fake);
    store.open_admin().await.unwrap();
    store.admin_edit(0).unwrap();
    store.admin_form().unwrap().name = "Dark Red Shirt".to_owned();
    fake.fail_with(StatusCode::INTERNAL_SERVER_ERROR);

    let err = store.admin_submit().await.unwrap_err();

    assert_eq!(err.notice(), Notice::ProductUpdateFailed);
    assert_eq!(
        store.admin().mode(),
        &EditorMode::Edit(ProductId::from_store("p-1"))
    );
    assert_eq!(store.admin().form().name, "Dark Red Shirt");
    assert_eq!(store.admin().records()[0].name, "Red Shirt");
}

#[tokio::test]
async fn test_reset_cancels_edit() {
    let fake = FakeProductStore::with_products(ApiSchema::Backend, &sample_products()).await;
    let mut store = logged_in(&fake);
    store.open_admin().await.unwrap();
    store.admin_edit(2).unwrap();

    store.admin_reset();

    assert_eq!(store.admin().mode(), &EditorMode::Create);
    assert!(store.admin().form().name.is_empty());
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_delete_requires_confirmation() {
    let fake = FakeProductStore::with_products(ApiSchema::Backend, &sample_products()).await;
    let mut store = logged_in(&fake);
    store.open_admin().await.unwrap();
    let requests = fake.requests();
    let id = ProductId::from_store("p-3");

    assert_eq!(store.admin_delete(&id, false).await.unwrap(), None);
    assert_eq!(fake.requests(), requests);
    assert_eq!(store.admin().records().len(), 3);

    let notice = store.admin_delete(&id, true).await.unwrap();
    assert_eq!(notice, Some(Notice::ProductDeleted));
    assert_eq!(store.admin().records().len(), 2);
    assert_eq!(fake.records().len(), 2);
}

#[tokio::test]
async fn test_failed_delete_keeps_list() {
    let fake = FakeProductStore::with_products(ApiSchema::Backend, &sample_products()).await;
    let mut store = logged_in(&fake);
    store.open_admin().await.unwrap();

    let err = store
        .admin_delete(&ProductId::from_store("missing"), true)
        .await
        .unwrap_err();

    assert!(matches!(err, StorefrontError::DeleteFailed(_)));
    assert_eq!(err.notice().to_string(), "刪除商品失敗!");
    assert_eq!(store.admin().records().len(), 3);
}
