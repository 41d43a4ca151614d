// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use coursework_client::{
    config::{Config, base_url},
    state::AppState,
    storage::{KeyValueStore, MemoryStore},
};
use serde_json::{Value, json};

/// In-memory stand-in for the coursework backend.
#[derive(Default)]
pub struct MockBackend {
    pub assignments: Vec<Value>,
    pub enrollments: Vec<Value>,
    pub submissions: Vec<Value>,

    /// Every request as "METHOD /path", in arrival order.
    pub requests: Vec<String>,
    pub auth_headers: Vec<String>,
    pub submit_calls: Vec<(String, Value)>,
    pub grade_calls: Vec<(String, Value)>,

    /// Respond without the `{data: ...}` envelope.
    pub bare_payloads: bool,
    pub enrollments_delay: Option<Duration>,
    pub assignment_delay: Option<Duration>,

    /// Canned `(status, raw body)` failures.
    pub fail_assignment: Option<(u16, String)>,
    pub fail_submit: Option<(u16, String)>,
    pub fail_grade: Option<(u16, String)>,
    pub fail_list: Option<(u16, String)>,

    /// Raw body returned by a successful grade instead of the updated record.
    pub grade_response: Option<String>,
}

pub type SharedBackend = Arc<Mutex<MockBackend>>;

pub struct TestApp {
    pub address: String,
    pub backend: SharedBackend,
    pub store: Arc<MemoryStore>,
    pub state: AppState,
}

impl TestApp {
    pub fn requests(&self) -> Vec<String> {
        self.backend.lock().unwrap().requests.clone()
    }

    pub fn count(&self, request: &str) -> usize {
        self.requests().iter().filter(|r| r.as_str() == request).count()
    }
}

/// Spawns the mock backend on a random port and builds an `AppState`
/// pointing at it, backed by a fresh `MemoryStore`.
pub async fn spawn_app(mock: MockBackend) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    spawn_app_with_store(mock, store.clone(), store).await
}

pub async fn spawn_app_with_store(
    mock: MockBackend,
    store: Arc<dyn KeyValueStore>,
    memory: Arc<MemoryStore>,
) -> TestApp {
    let backend = Arc::new(Mutex::new(mock));
    let app = router(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = Config {
        api_base_url: base_url(&address).unwrap(),
        api_token: Some("test-token".to_string()),
        draft_store_url: "sqlite::memory:".to_string(),
        page_size: 2,
        request_timeout_secs: 5,
        rust_log: "error".to_string(),
    };
    let state = AppState::new(config, store).unwrap();

    TestApp {
        address,
        backend,
        store: memory,
        state,
    }
}

fn router(backend: SharedBackend) -> Router {
    Router::new()
        .route("/api/assignments", get(list_assignments))
        .route("/api/assignments/{id}", get(get_assignment))
        .route("/api/assignments/{id}/submissions", get(list_submissions))
        .route("/api/assignments/{id}/submit", post(submit_assignment))
        .route("/api/submissions/{id}", put(grade_submission))
        .route("/api/enrollments/my", get(my_enrollments))
        .with_state(backend)
}

fn id_of(value: &Value) -> String {
    match &value["id"] {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn wrap(bare: bool, payload: Value) -> Value {
    if bare { payload } else { json!({ "data": payload }) }
}

fn raw(status: u16, body: String) -> Response {
    let status = StatusCode::from_u16(status).unwrap();
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

fn record(backend: &SharedBackend, line: String, headers: &HeaderMap) {
    let mut db = backend.lock().unwrap();
    db.requests.push(line);
    if let Some(auth) = headers.get(header::AUTHORIZATION) {
        db.auth_headers.push(auth.to_str().unwrap_or_default().to_string());
    }
}

async fn list_assignments(State(backend): State<SharedBackend>, headers: HeaderMap) -> Json<Value> {
    record(&backend, "GET /api/assignments".to_string(), &headers);
    let db = backend.lock().unwrap();
    Json(wrap(db.bare_payloads, Value::Array(db.assignments.clone())))
}

async fn get_assignment(
    State(backend): State<SharedBackend>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    record(&backend, format!("GET /api/assignments/{}", id), &headers);
    let delay = backend.lock().unwrap().assignment_delay;
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let db = backend.lock().unwrap();

    if let Some((status, body)) = db.fail_assignment.clone() {
        return raw(status, body);
    }

    match db.assignments.iter().find(|a| id_of(a) == id) {
        Some(a) => Json(wrap(db.bare_payloads, a.clone())).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Assignment not found" })),
        )
            .into_response(),
    }
}

async fn list_submissions(
    State(backend): State<SharedBackend>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    record(&backend, format!("GET /api/assignments/{}/submissions", id), &headers);
    let db = backend.lock().unwrap();

    if let Some((status, body)) = db.fail_list.clone() {
        return raw(status, body);
    }

    let rows: Vec<Value> = db
        .submissions
        .iter()
        .filter(|s| id == "all" || s["assignmentId"].as_str() == Some(id.as_str()))
        .cloned()
        .collect();

    Json(wrap(db.bare_payloads, Value::Array(rows))).into_response()
}

async fn submit_assignment(
    State(backend): State<SharedBackend>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&backend, format!("POST /api/assignments/{}/submit", id), &headers);
    let mut db = backend.lock().unwrap();
    db.submit_calls.push((id.clone(), body));

    if let Some((status, body)) = db.fail_submit.clone() {
        return raw(status, body);
    }

    let attempt = db.submit_calls.iter().filter(|(a, _)| *a == id).count();
    let result = json!({
        "id": format!("sub-{}", attempt),
        "status": "SUBMITTED",
        "attemptNumber": attempt,
        "submittedAt": "2026-10-16T10:00:00Z"
    });

    Json(wrap(db.bare_payloads, result)).into_response()
}

async fn grade_submission(
    State(backend): State<SharedBackend>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&backend, format!("PUT /api/submissions/{}", id), &headers);
    let mut db = backend.lock().unwrap();
    db.grade_calls.push((id.clone(), body.clone()));

    if let Some((status, raw_body)) = db.fail_grade.clone() {
        return raw(status, raw_body);
    }
    if let Some(raw_body) = db.grade_response.clone() {
        return raw(200, raw_body);
    }

    let Some(row) = db.submissions.iter_mut().find(|s| id_of(s) == id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Submission not found" })),
        )
            .into_response();
    };
    row["score"] = body["score"].clone();
    row["status"] = body["status"].clone();
    row["feedback"] = body["feedback"].clone();
    let updated = row.clone();

    Json(json!({ "data": updated })).into_response()
}

async fn my_enrollments(State(backend): State<SharedBackend>, headers: HeaderMap) -> Json<Value> {
    record(&backend, "GET /api/enrollments/my".to_string(), &headers);
    let delay = backend.lock().unwrap().enrollments_delay;
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let db = backend.lock().unwrap();
    Json(wrap(db.bare_payloads, Value::Array(db.enrollments.clone())))
}

/// Three-question assignment: single-select multiple choice, true/false, essay.
pub fn three_question_assignment(id: &str, course_id: &str) -> Value {
    json!({
        "id": id,
        "title": "Week 1 Check-in",
        "description": "Short warm-up",
        "status": "PUBLISHED",
        "courseId": course_id,
        "totalPoints": 10,
        "passingScore": 6,
        "maxAttempts": 3,
        "timeLimit": 20,
        "dueDate": "2030-01-01T00:00:00Z",
        "allowLateSubmission": false,
        "questions": [
            { "type": "MULTIPLE_CHOICE", "question": "Pick B", "points": 2,
              "options": ["A", "B", "C"], "correctAnswer": "B" },
            { "type": "TRUE_FALSE", "question": "Rust is memory safe", "points": 2,
              "options": ["true", "false"], "correctAnswer": "true" },
            { "type": "ESSAY", "question": "Explain ownership", "points": 6 }
        ]
    })
}

/// Assignment whose only question accepts several options.
pub fn multi_select_assignment(id: &str) -> Value {
    json!({
        "id": id,
        "title": "Primes",
        "courseId": "c1",
        "questions": [
            { "type": "MULTIPLE_CHOICE", "question": "Which are prime?", "points": 3,
              "options": ["2", "4", "5", "9"], "correctAnswer": ["2", "5"] }
        ]
    })
}

pub fn sample_submissions() -> Vec<Value> {
    vec![
        json!({ "id": "s1", "assignmentId": "a1", "status": "SUBMITTED", "attemptNumber": 1,
                "submittedAt": "2026-10-01T09:00:00Z", "timeSpent": 300,
                "student": { "id": 1, "name": "ALICE Wong", "email": "alice@example.com" } }),
        json!({ "id": "s2", "assignmentId": "a1", "status": "LATE", "attemptNumber": 1,
                "student": { "id": 2, "name": "Bob", "email": "bob@example.com" } }),
        json!({ "id": "s3", "assignmentId": "a1", "status": "GRADED", "score": 70,
                "feedback": "Check question 2",
                "student": { "id": 3, "name": "Carol", "email": "carol@school.edu" } }),
        json!({ "id": "s4", "assignmentId": "a2", "status": "SUBMITTED",
                "student": { "id": 4, "name": "Dan", "email": "dan@example.com" } }),
        json!({ "id": "s5", "assignmentId": "a2", "status": "IN_PROGRESS",
                "student": { "id": 5, "name": "Eve", "email": "eve@school.edu" } }),
    ]
}
