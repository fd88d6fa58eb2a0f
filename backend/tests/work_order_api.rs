//! End-to-end HTTP coverage for the work order endpoints.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use serde_json::{Value, json};

use backend::api::HealthState;
use backend::outbound::events::TracingEventSink;
use backend::outbound::persistence::InMemoryRecordStore;
use backend::server::{self, AppContext};

async fn spawn_app() -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
    let store = Arc::new(InMemoryRecordStore::new());
    let context = web::Data::new(AppContext::new(store, Arc::new(TracingEventSink)));
    let health = web::Data::new(HealthState::new());
    health.mark_ready();

    test::init_service(
        App::new()
            .app_data(context)
            .app_data(health)
            .configure(server::configure),
    )
    .await
}

async fn create_order(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    body: Value,
) -> Value {
    let request = test::TestRequest::post()
        .uri("/api/v1/work-orders")
        .set_json(body)
        .to_request();
    let response = test::call_service(app, request).await;
    assert_eq!(response.status().as_u16(), 201);
    test::read_body_json(response).await
}

async fn run_action(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    id: &str,
    body: Value,
) -> Value {
    let request = test::TestRequest::post()
        .uri(&format!("/api/v1/work-orders/{id}/workflow"))
        .set_json(body)
        .to_request();
    let response = test::call_service(app, request).await;
    assert_eq!(response.status().as_u16(), 200);
    test::read_body_json(response).await
}

#[actix_web::test]
async fn a_work_order_flows_from_open_to_completed() {
    let app = spawn_app().await;
    let created = create_order(&app, json!({ "title": "Replace pump seal" })).await;
    let id = created["id"].as_str().expect("id assigned");
    assert_eq!(created["status"], "open");

    let outcome = run_action(&app, id, json!({ "action": "assign", "assignee": "sam" })).await;
    assert_eq!(outcome["success"], true);

    let outcome = run_action(&app, id, json!({ "action": "start" })).await;
    assert_eq!(outcome["success"], true);
    assert_eq!(outcome["next_state"], "in_progress");
    assert_eq!(outcome["follow_ups"][0]["kind"], "notification");

    let outcome = run_action(&app, id, json!({ "action": "complete" })).await;
    assert_eq!(outcome["success"], true);
    assert_eq!(outcome["next_state"], "completed");
    assert_eq!(outcome["follow_ups"][1]["kind"], "inspection");

    let request = test::TestRequest::get()
        .uri(&format!("/api/v1/work-orders/{id}"))
        .to_request();
    let order: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(order["status"], "completed");
    assert!(order["started_at"].is_string());
    assert!(order["completed_at"].is_string());
}

#[actix_web::test]
async fn illegal_transitions_come_back_as_rejections_not_errors() {
    let app = spawn_app().await;
    let created = create_order(&app, json!({ "title": "Inspect boiler" })).await;
    let id = created["id"].as_str().expect("id assigned");

    let outcome = run_action(&app, id, json!({ "action": "complete" })).await;
    assert_eq!(outcome["success"], false);
    assert_eq!(
        outcome["errors"][0],
        "cannot complete a work order in the open state"
    );

    let request = test::TestRequest::get()
        .uri(&format!("/api/v1/work-orders/{id}"))
        .to_request();
    let order: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(order["status"], "open", "rejection leaves the record alone");
}

#[actix_web::test]
async fn lists_paginate_and_filter_by_tenant() {
    let app = spawn_app().await;
    for (title, tenant) in [
        ("alpha", "acme"),
        ("bravo", "acme"),
        ("charlie", "globex"),
    ] {
        create_order(&app, json!({ "title": title, "tenant_id": tenant })).await;
    }

    let request = test::TestRequest::get()
        .uri("/api/v1/work-orders?limit=2&sort_by=title")
        .to_request();
    let page: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(page["total"], 3);
    assert_eq!(page["total_pages"], 2);
    assert_eq!(page["items"][0]["title"], "alpha");
    assert_eq!(page["items"].as_array().map(Vec::len), Some(2));

    let request = test::TestRequest::get()
        .uri("/api/v1/work-orders?tenant_id=acme")
        .to_request();
    let page: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(page["total"], 2);

    let request = test::TestRequest::get()
        .uri("/api/v1/work-orders?sort_by=title&sort_order=sideways")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 400);
}

#[actix_web::test]
async fn unknown_records_use_the_error_envelope() {
    let app = spawn_app().await;

    let request = test::TestRequest::get()
        .uri("/api/v1/work-orders/missing")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 404);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "not_found");
    assert_eq!(body["status"], 404);
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
}

#[actix_web::test]
async fn updates_patch_only_the_supplied_fields() {
    let app = spawn_app().await;
    let created = create_order(
        &app,
        json!({ "title": "Inspect boiler", "description": "annual" }),
    )
    .await;
    let id = created["id"].as_str().expect("id assigned");

    let request = test::TestRequest::patch()
        .uri(&format!("/api/v1/work-orders/{id}"))
        .set_json(json!({ "title": "Inspect boiler room", "id": "evil" }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(updated["title"], "Inspect boiler room");
    assert_eq!(updated["description"], "annual");
    assert_eq!(updated["id"], created["id"], "store-owned fields are immutable");

    let request = test::TestRequest::patch()
        .uri(&format!("/api/v1/work-orders/{id}"))
        .set_json(json!({}))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 400);
}

#[actix_web::test]
async fn delete_removes_the_record() {
    let app = spawn_app().await;
    let created = create_order(&app, json!({ "title": "Grease bearings" })).await;
    let id = created["id"].as_str().expect("id assigned");

    let request = test::TestRequest::delete()
        .uri(&format!("/api/v1/work-orders/{id}"))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 204);

    let request = test::TestRequest::get()
        .uri(&format!("/api/v1/work-orders/{id}"))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[actix_web::test]
async fn health_probes_answer() {
    let app = spawn_app().await;

    let response =
        test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request()).await;
    assert_eq!(response.status().as_u16(), 200);

    let response =
        test::call_service(&app, test::TestRequest::get().uri("/health/live").to_request()).await;
    assert_eq!(response.status().as_u16(), 200);
}
