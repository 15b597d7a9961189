//! HTTP adapter integration tests.
//!
//! Starts an axum server standing in for the Floranet API and drives it
//! through `HttpBackend`.

use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use floranet::api::{
    CommunityBackend, FootageUpload, HttpBackend, Mutation, RecordPatch, ResourceBackend,
};
use floranet::controller::{
    FetchOutcome, FilteredListController, ListQuery, MutationOutcome, Severity,
};
use floranet::error::FloranetError;
use floranet::types::{
    CctvRequest, CollectionBatch, Complaint, ComplaintStatus, Priority, RecordId,
};

#[derive(Clone, Default)]
struct Recorded {
    requests: Arc<Mutex<Vec<String>>>,
}

impl Recorded {
    fn push(&self, entry: impl Into<String>) {
        self.requests.lock().unwrap().push(entry.into());
    }

    fn entries(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn complaint_json(id: u64, status: &str) -> Value {
    json!({
        "id": id,
        "title": "Broken gate latch",
        "category": "Security",
        "status": status,
        "priority": "high",
        "remarks": null,
        "followups": "[2026-03-05 15:00 - Guard] Logged.\n\n[Admin]: Latch ordered.",
        "resident": { "name": "Ana Reyes", "unit_number": "B-12" },
        "created_at": "2026-03-05T14:30:00Z",
    })
}

async fn list_complaints(State(rec): State<Recorded>, RawQuery(query): RawQuery) -> Json<Value> {
    rec.push(format!("GET complaints?{}", query.unwrap_or_default()));
    Json(json!({
        "data": [complaint_json(19, "pending"), complaint_json(20, "resolved")],
        "meta": { "current_page": 3, "last_page": 3, "per_page": 9, "total": 20 },
    }))
}

async fn list_collections() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": [{ "id": 5, "title": "October dues", "total_amount": 1234567.5, "status": "open" }],
        "current_page": 1,
        "last_page": 1,
        "per_page": 15,
        "total": 1,
    }))
}

async fn show_complaint(Path(id): Path<u64>) -> impl IntoResponse {
    if id == 404 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Complaint not found." })),
        );
    }
    (StatusCode::OK, Json(json!({ "data": complaint_json(id, "in_progress") })))
}

async fn patch_status(
    State(rec): State<Recorded>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    rec.push(format!("PATCH status {id} {body} {auth}"));
    if id == 19 {
        return Json(json!({ "status": "success", "message": "Status updated" }));
    }
    let status = body["status"].as_str().unwrap_or_default();
    Json(json!({ "data": complaint_json(id, status) }))
}

async fn patch_priority(Json(_body): Json<Value>) -> Json<Value> {
    Json(json!({ "message": "Priority updated" }))
}

async fn patch_remarks() -> impl IntoResponse {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "message": "The remarks field must not be greater than 1000 characters." })),
    )
}

async fn upload_footage(
    State(rec): State<Recorded>,
    Path(id): Path<u64>,
    mut multipart: Multipart,
) -> Json<Value> {
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.unwrap();
        match file_name {
            Some(file_name) => rec.push(format!("UPLOAD {id} {name} {file_name} {}", bytes.len())),
            None => rec.push(format!(
                "UPLOAD {id} {name} {}",
                String::from_utf8_lossy(&bytes)
            )),
        }
    }
    Json(json!({ "message": "Footage uploaded" }))
}

async fn list_cctv() -> Json<Value> {
    Json(json!({
        "data": [{ "id": 41, "location": "Gate 2", "status": "pending" }],
        "meta": { "current_page": 3, "last_page": 3, "per_page": "nine", "total": 20 },
    }))
}

async fn show_cctv(Path(id): Path<u64>) -> Json<Value> {
    Json(json!({
        "id": id,
        "location": "Gate 2",
        "status": "completed",
        "footage": [{ "id": 9, "file_path": "cctv-footage/gate2.mp4" }],
    }))
}

async fn list_posts(RawQuery(query): RawQuery) -> Json<Value> {
    let archived = query.unwrap_or_default().contains("archived=1");
    let id = if archived { 2 } else { 1 };
    Json(json!({
        "success": true,
        "data": [{
            "id": id,
            "content": "Water interruption",
            "likes_count": 3,
            "archived": archived,
        }],
    }))
}

async fn like_post() -> Json<Value> {
    Json(json!({ "success": false, "message": "Post is no longer available" }))
}

async fn archive_post(State(rec): State<Recorded>, Path(id): Path<u64>) -> StatusCode {
    rec.push(format!("ARCHIVE {id}"));
    StatusCode::NO_CONTENT
}

fn router(rec: Recorded) -> Router {
    Router::new()
        .route("/api/complaints", get(list_complaints))
        .route("/api/complaints/:id", get(show_complaint))
        .route("/api/complaints/:id/status", patch(patch_status))
        .route("/api/complaints/:id/priority", patch(patch_priority))
        .route("/api/complaints/:id/remarks", patch(patch_remarks))
        .route("/api/collections", get(list_collections))
        .route("/api/cctv-requests", get(list_cctv))
        .route("/api/cctv-requests/:id", get(show_cctv))
        .route("/api/cctv-requests/:id/footage", post(upload_footage))
        .route("/api/community-posts", get(list_posts))
        .route("/api/community-posts/:id/like", post(like_post))
        .route("/api/community-posts/:id/archive", post(archive_post))
        .with_state(rec)
}

/// Bind to port 0 and return the API base URL.
async fn start_server(rec: Recorded) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(rec)).await.unwrap();
    });
    format!("http://{addr}/api")
}

async fn backend() -> (HttpBackend, Recorded) {
    let rec = Recorded::default();
    let base = start_server(rec.clone()).await;
    let backend = HttpBackend::new(&base).unwrap().with_token("admin-token");
    (backend, rec)
}

// ============================================================================
// Lists
// ============================================================================

#[tokio::test]
async fn test_meta_envelope_and_query_string() {
    let (backend, rec) = backend().await;

    let mut query = ListQuery::new();
    query.set_search_text(" fence ");
    query.set_filter("status", "pending");
    query.set_page(3);

    let page = ResourceBackend::<Complaint>::fetch_page(&backend, &query)
        .await
        .unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.from, Some(19));
    assert_eq!(page.to, Some(20));
    assert_eq!(page.total, 20);
    assert_eq!(page.items[0].followups.len(), 2);
    assert_eq!(page.items[0].followups[1].content, "Latch ordered.");
    assert_eq!(
        page.items[0].resident.as_ref().unwrap().unit.as_deref(),
        Some("B-12")
    );

    let entries = rec.entries();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].contains("page=3"));
    assert!(entries[0].contains("search=fence"));
    assert!(entries[0].contains("filter%5Bstatus%5D=pending"));
}

#[tokio::test]
async fn test_malformed_meta_fails_the_fetch() {
    let (backend, _) = backend().await;

    let result = ResourceBackend::<CctvRequest>::fetch_page(&backend, &ListQuery::new()).await;
    assert!(matches!(result, Err(FloranetError::Json(_))));

    let mut controller = FilteredListController::<CctvRequest, _>::new(backend);
    assert_eq!(controller.fetch_list().await, FetchOutcome::Failed);
    assert!(controller.page().is_none());
    assert_eq!(controller.feedback().severity, Severity::Error);
}

#[tokio::test]
async fn test_flat_envelope() {
    let (backend, _) = backend().await;

    let page = ResourceBackend::<CollectionBatch>::fetch_page(&backend, &ListQuery::new())
        .await
        .unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.per_page, 15);
    assert_eq!(page.from, Some(1));
    assert_eq!(page.to, Some(1));
    assert_eq!(page.items[0].total_amount, Some(1234567.5));
}

// ============================================================================
// Records and mutations
// ============================================================================

#[tokio::test]
async fn test_fetch_record_unwraps_data() {
    let (backend, _) = backend().await;

    let complaint: Complaint = backend.fetch_record(&RecordId::Int(7)).await.unwrap();
    assert_eq!(complaint.id, RecordId::Int(7));
    assert_eq!(complaint.status, ComplaintStatus::InProgress);
}

#[tokio::test]
async fn test_missing_record_is_not_found() {
    let (backend, _) = backend().await;

    let result: Result<Complaint, _> = backend.fetch_record(&RecordId::Int(404)).await;
    assert!(matches!(result, Err(FloranetError::RecordNotFound(id)) if id == "404"));
}

#[tokio::test]
async fn test_status_patch_body_and_response() {
    let (backend, rec) = backend().await;

    let mutation: Mutation<Complaint> = Mutation::Status(ComplaintStatus::Resolved);
    let patch = backend.mutate(&RecordId::Int(12), &mutation).await.unwrap();

    assert_eq!(patch, Some(RecordPatch::Status(ComplaintStatus::Resolved)));
    assert_eq!(
        rec.entries(),
        vec![r#"PATCH status 12 {"status":"resolved"} Bearer admin-token"#.to_string()]
    );
}

#[tokio::test]
async fn test_patch_response_without_field() {
    let (backend, _) = backend().await;

    let mutation: Mutation<Complaint> = Mutation::Priority(Priority::Urgent);
    let patch = backend.mutate(&RecordId::Int(12), &mutation).await.unwrap();
    assert_eq!(patch, None);
}

#[tokio::test]
async fn test_status_reply_without_usable_field_refetches_row() {
    let (backend, rec) = backend().await;
    let mut controller = FilteredListController::<Complaint, _>::new(backend);
    assert_eq!(controller.fetch_list().await, FetchOutcome::Applied);
    assert_eq!(controller.items()[0].status, ComplaintStatus::Pending);

    let outcome = controller
        .apply_row_mutation(
            &RecordId::Int(19),
            Mutation::Status(ComplaintStatus::InProgress),
        )
        .await;

    assert_eq!(outcome, MutationOutcome::Refetched);
    assert_eq!(controller.items()[0].id, RecordId::Int(19));
    assert_eq!(controller.items()[0].status, ComplaintStatus::InProgress);
    assert_eq!(controller.items()[1].status, ComplaintStatus::Resolved);
    assert_eq!(controller.feedback().severity, Severity::Success);
    assert!(
        rec.entries()
            .iter()
            .any(|e| e.starts_with(r#"PATCH status 19 {"status":"in_progress"}"#))
    );
}

#[tokio::test]
async fn test_backend_message_is_passed_through() {
    let (backend, _) = backend().await;

    let mutation: Mutation<Complaint> = Mutation::Remarks("x".repeat(1001));
    let err = backend
        .mutate(&RecordId::Int(12), &mutation)
        .await
        .unwrap_err();

    assert!(matches!(err, FloranetError::Api { status: Some(422), .. }));
    assert_eq!(
        err.feedback_message(),
        "The remarks field must not be greater than 1000 characters."
    );
}

#[tokio::test]
async fn test_footage_upload_is_multipart_then_refetched() {
    let (backend, rec) = backend().await;
    let mut controller = FilteredListController::<CctvRequest, _>::new(backend);

    let upload = FootageUpload {
        file_name: "gate2.mp4".to_string(),
        bytes: vec![7; 64],
        description: Some("Gate 2 camera".to_string()),
    };
    let outcome = controller
        .apply_row_mutation(&RecordId::Int(42), Mutation::UploadFootage(upload))
        .await;

    assert_eq!(outcome, MutationOutcome::Refetched);
    let entries = rec.entries();
    assert!(entries.contains(&"UPLOAD 42 file gate2.mp4 64".to_string()));
    assert!(entries.contains(&"UPLOAD 42 description Gate 2 camera".to_string()));
}

#[tokio::test]
async fn test_storage_url() {
    let (backend, _) = backend().await;

    let url = backend.storage_url("/storage/cctv-footage/gate 2.mp4").unwrap();
    assert!(url.as_str().ends_with("/api/storage/cctv-footage/gate%202.mp4"));
    assert!(backend.storage_url("  ").is_err());
}

// ============================================================================
// Community posts
// ============================================================================

#[tokio::test]
async fn test_list_posts_by_archive_state() {
    let (backend, _) = backend().await;

    let active = backend.list_posts(false).await.unwrap();
    let archived = backend.list_posts(true).await.unwrap();

    assert_eq!(active[0].id, RecordId::Int(1));
    assert!(!active[0].archived);
    assert_eq!(archived[0].id, RecordId::Int(2));
    assert!(archived[0].archived);
}

#[tokio::test]
async fn test_unsuccessful_envelope_is_error() {
    let (backend, _) = backend().await;

    let err = backend.like_post(&RecordId::Int(1)).await.unwrap_err();
    assert_eq!(err.feedback_message(), "Post is no longer available");
}

#[tokio::test]
async fn test_empty_body_is_success() {
    let (backend, rec) = backend().await;

    backend.archive_post(&RecordId::Int(8)).await.unwrap();
    assert_eq!(rec.entries(), vec!["ARCHIVE 8".to_string()]);
}
