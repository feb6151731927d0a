//! Router tests against the in-memory ticket store

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use cycletrack_server::models::enums::ServiceStatus;

use crate::common::{priced_ticket, send, staff_token, test_app, ticket_for, FakeTicketStore};

fn setup() -> (Arc<FakeTicketStore>, axum::Router, String) {
    let store = Arc::new(FakeTicketStore::default());
    let app = test_app(store.clone());
    (store, app, staff_token())
}

#[tokio::test]
async fn test_health_check() {
    let (_, app, _) = setup();
    let (status, body) = send(&app, "GET", "/api/v1/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_reports_missing_database() {
    let (_, app, _) = setup();
    let (status, body) = send(&app, "GET", "/api/v1/ready", None, None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "database unavailable");
}

#[tokio::test]
async fn test_tickets_require_token() {
    let (_, app, _) = setup();
    let (status, body) = send(&app, "GET", "/api/v1/service-tickets", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "NotAuthorized");

    let (status, _) = send(&app, "GET", "/api/v1/service-tickets", None, Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_intake_then_first_move() {
    let (store, app, token) = setup();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/service-tickets",
        Some(json!({
            "customer": {
                "name": "Jane Doe",
                "email": "jane@riders.test",
                "phone": "555-0199"
            },
            "serviceRequest": {
                "equipmentBrand": "Canyon",
                "serviceType": "Full Service"
            }
        })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["ticket"]["status"], "todo");
    assert_eq!(body["ticket"]["customer"]["name"], "Jane Doe");
    assert_eq!(body["serviceRequest"]["recipient"], "Self");
    assert_eq!(body["ticket"]["comments"], json!([]));

    let ticket_id = body["ticket"]["id"].as_str().unwrap().to_string();
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/service-tickets/update-status",
        Some(json!({ "ticketId": ticket_id, "updates": { "status": "in-progress" } })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["archived"], false);

    let comments = body["ticket"]["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["author"], "Sam Spokes");
    assert_eq!(comments[0]["body"]["kind"], "status_change");
    assert_eq!(comments[0]["body"]["status"], "in-progress");

    let stored = store.snapshot(ticket_id.parse().unwrap());
    assert_eq!(stored.status, ServiceStatus::InProgress);
    assert_eq!(
        stored.comments[0].encode().split('|').nth(1),
        Some("moved the card in-progress")
    );
}

#[tokio::test]
async fn test_intake_rejects_bad_email() {
    let (_, app, token) = setup();
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/service-tickets",
        Some(json!({
            "customer": { "name": "Jane Doe", "email": "jane", "phone": "555-0199" },
            "serviceRequest": { "equipmentBrand": "Canyon", "serviceType": "Other" }
        })),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_done_then_archived_keeps_completion_date() {
    let (store, app, token) = setup();
    let id = store.insert(ticket_for("Ada", ServiceStatus::InProgress, Utc::now()));

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/service-tickets/update-status",
        Some(json!({ "ticketId": id, "updates": { "status": "done", "newComment": "Ready for pickup" } })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let completed: Value = body["ticket"]["completionDate"].clone();
    assert!(completed.is_string());
    let comments = body["ticket"]["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["body"]["kind"], "status_change");
    assert_eq!(comments[1]["body"]["text"], "Ready for pickup");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/service-tickets/update-status",
        Some(json!({ "ticketId": id, "updates": { "status": "archived" } })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["archived"], true);
    assert_eq!(body["ticket"]["completionDate"], completed);
    assert_eq!(store.snapshot(id).status, ServiceStatus::Archived);
}

#[tokio::test]
async fn test_unknown_status_leaves_ticket_untouched() {
    let (store, app, token) = setup();
    let id = store.insert(ticket_for("Ada", ServiceStatus::Todo, Utc::now()));

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/service-tickets/update-status",
        Some(json!({ "ticketId": id, "updates": { "status": "finished" } })),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let stored = store.snapshot(id);
    assert_eq!(stored.status, ServiceStatus::Todo);
    assert!(stored.comments.is_empty());
}

#[tokio::test]
async fn test_archived_ticket_cannot_move() {
    let (store, app, token) = setup();
    let id = store.insert(ticket_for("Ada", ServiceStatus::Archived, Utc::now()));

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/service-tickets/update-status",
        Some(json!({ "ticketId": id, "updates": { "status": "todo" } })),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "InvalidTransition");
    assert!(store.snapshot(id).comments.is_empty());
}

#[tokio::test]
async fn test_update_rejects_unknown_field() {
    let (store, app, token) = setup();
    let id = store.insert(ticket_for("Ada", ServiceStatus::Todo, Utc::now()));

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/service-tickets/update",
        Some(json!({ "ticketId": id, "updates": { "colour": "red" } })),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_writes_allowed_fields() {
    let (store, app, token) = setup();
    let id = store.insert(ticket_for("Ada", ServiceStatus::Todo, Utc::now()));

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/service-tickets/update",
        Some(json!({
            "ticketId": id,
            "updates": { "status": "in-progress", "totalCost": 80, "additionalDetails": "Bent derailleur hanger" }
        })),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ticket"]["status"], "in-progress");
    assert_eq!(body["ticket"]["totalCost"].as_f64(), Some(80.0));
    let stored = store.snapshot(id);
    assert_eq!(stored.additional_details, "Bent derailleur hanger");
    assert_eq!(stored.comments.len(), 1);
}

#[tokio::test]
async fn test_comment_is_appended() {
    let (store, app, token) = setup();
    let id = store.insert(ticket_for("Ada", ServiceStatus::Todo, Utc::now()));

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/service-tickets/comment",
        Some(json!({ "ticketId": id, "comment": "Customer called" })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["comments"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/service-tickets/comment",
        Some(json!({ "ticketId": id, "comment": "   " })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(store.snapshot(id).comments.len(), 1);
}

#[tokio::test]
async fn test_missing_ticket_is_not_found() {
    let (_, app, token) = setup();
    let uri = format!("/api/v1/service-tickets/{}", uuid::Uuid::new_v4());
    let (status, body) = send(&app, "GET", &uri, None, Some(&token)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchRecord");
}

#[tokio::test]
async fn test_dashboard_estimates_open_revenue() {
    let (store, app, token) = setup();
    store.insert(priced_ticket(ServiceStatus::Done, 120));
    store.insert(priced_ticket(ServiceStatus::Done, 80));
    for _ in 0..4 {
        store.insert(priced_ticket(ServiceStatus::InProgress, 0));
    }
    store.insert(ticket_for("Old", ServiceStatus::Done, Utc::now() - Duration::days(90)));

    let (status, body) = send(&app, "GET", "/api/v1/dashboard?timeRange=30", None, Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let stats = &body["stats"];
    assert_eq!(stats["doneCount"], 2);
    assert_eq!(stats["inProgressCount"], 4);
    assert_eq!(stats["totalRevenue"].as_f64(), Some(200.0));
    assert_eq!(stats["estimatedRevenue"].as_f64(), Some(400.0));
}

#[tokio::test]
async fn test_dashboard_rejects_bad_window() {
    let (_, app, token) = setup();
    let (status, _) = send(&app, "GET", "/api/v1/dashboard?timeRange=0", None, Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_board_move_settles_into_new_column() {
    let (store, app, token) = setup();
    let id = store.insert(ticket_for("Ada", ServiceStatus::Todo, Utc::now()));

    let (status, body) = send(&app, "GET", "/api/v1/workshop/board", None, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let columns = body["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 5);
    assert_eq!(columns[0]["title"], "To Do");
    assert_eq!(columns[0]["cards"][0]["id"], id.to_string());

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/workshop/board/move",
        Some(json!({ "ticketId": id, "toStatus": "waiting-for-parts" })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["archived"], false);
    let columns = body["board"]["columns"].as_array().unwrap();
    assert!(columns[0]["cards"].as_array().unwrap().is_empty());
    assert_eq!(columns[2]["cards"][0]["id"], id.to_string());
    assert_eq!(columns[2]["cards"][0]["pending"], false);
    assert_eq!(store.snapshot(id).status, ServiceStatus::WaitingForParts);
}

#[tokio::test]
async fn test_custom_receipt_is_public_and_totals_lines() {
    let (_, app, _) = setup();
    let items = json!([
        { "name": "Chain", "quantity": 2, "price": 10, "serviceFee": 0 },
        { "name": "Labor", "quantity": 1, "price": 0, "serviceFee": 25 }
    ]);
    let url = reqwest::Url::parse_with_params(
        "http://localhost/api/v1/receipt/custom",
        &[("id", "CS-1"), ("customerName", "Jane Doe"), ("items", &items.to_string())],
    )
    .unwrap();
    let uri = format!("{}?{}", url.path(), url.query().unwrap());

    let (status, body) = send(&app, "GET", &uri, None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["widthMm"].as_f64(), Some(80.0));
    let texts: Vec<&str> = body["ops"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|op| op["op"] == "text")
        .filter_map(|op| op["text"].as_str())
        .collect();
    assert!(texts.contains(&"Receipt #CS-1"));
    assert!(texts.iter().any(|t| t.contains("Jane Doe")));
    assert!(texts.iter().any(|t| t.contains("20.00")));
    assert!(texts.iter().any(|t| t.contains("25.00")));
    assert!(texts.iter().any(|t| t.contains("45.00")));
}

#[tokio::test]
async fn test_save_receipt_recomputes_total() {
    let (store, app, token) = setup();
    let id = store.insert(ticket_for("Ada", ServiceStatus::Done, Utc::now()));

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/service-tickets/receipt/save",
        Some(json!({
            "ticketId": id,
            "receiptData": {
                "items": [
                    { "id": "p1", "name": "Chain", "quantity": 2, "price": 10, "serviceFee": 0 },
                    { "id": "p2", "name": "Labor", "quantity": 1, "price": 0, "serviceFee": 25 }
                ],
                "totalAmount": 99
            }
        })),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ticket"]["receipt"]["totalAmount"].as_f64(), Some(45.0));
    assert_eq!(store.snapshot(id).receipt.unwrap().items.len(), 2);
}
