//! In-process course service speaking the same REST contract as the real one.

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use course_catalog::models::{Course, CoursePayload, Schedule};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct Catalog {
    next_id: u64,
    next_schedule_id: u64,
    courses: Vec<Course>,
}

#[derive(Clone, Default)]
pub struct CatalogState {
    catalog: Arc<Mutex<Catalog>>,
    requests: Arc<AtomicUsize>,
}

impl CatalogState {
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn courses(&self) -> Vec<Course> {
        self.catalog.lock().unwrap().courses.clone()
    }

    fn hit(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct TestServer {
    /// Base URL of the well-behaved API (`http://127.0.0.1:port/api`).
    pub base_url: String,
    /// Same routes, but every list call answers 500.
    pub broken_url: String,
    /// Same routes, but every list call takes two seconds.
    pub slow_url: String,
    pub state: CatalogState,
}

pub async fn spawn_server() -> TestServer {
    let state = CatalogState::default();
    let app = Router::new()
        .route("/api/courses/", get(list_courses).post(create_course))
        .route(
            "/api/courses/{id}/",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/broken/courses/", get(broken))
        .route("/slow/courses/", get(slow))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("No local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });

    TestServer {
        base_url: format!("http://{}/api", addr),
        broken_url: format!("http://{}/broken", addr),
        slow_url: format!("http://{}/slow", addr),
        state,
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

async fn list_courses(
    State(state): State<CatalogState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<Course>> {
    state.hit();
    let catalog = state.catalog.lock().unwrap();
    let courses = catalog
        .courses
        .iter()
        .filter(|c| {
            params.get("search").map_or(true, |q| {
                contains(&c.name, q) || contains(&c.description, q)
            })
        })
        .filter(|c| {
            params
                .get("category")
                .map_or(true, |q| c.category.eq_ignore_ascii_case(q))
        })
        .filter(|c| params.get("instructor").map_or(true, |q| contains(&c.instructor, q)))
        .cloned()
        .collect();
    Json(courses)
}

async fn get_course(State(state): State<CatalogState>, Path(id): Path<u64>) -> Response {
    state.hit();
    let catalog = state.catalog.lock().unwrap();
    match catalog.courses.iter().find(|c| c.id == id) {
        Some(course) => Json(course.clone()).into_response(),
        None => not_found(),
    }
}

fn validate(payload: &CoursePayload) -> Result<(), Response> {
    if payload.name.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "name": ["This field may not be blank."] })),
        )
            .into_response());
    }
    Ok(())
}

fn assign_schedule_ids(catalog: &mut Catalog, schedules: Vec<Schedule>) -> Vec<Schedule> {
    schedules
        .into_iter()
        .map(|mut s| {
            if s.id.is_none() {
                catalog.next_schedule_id += 1;
                s.id = Some(catalog.next_schedule_id);
            }
            s
        })
        .collect()
}

async fn create_course(
    State(state): State<CatalogState>,
    Json(payload): Json<CoursePayload>,
) -> Response {
    state.hit();
    if let Err(rejection) = validate(&payload) {
        return rejection;
    }

    let mut catalog = state.catalog.lock().unwrap();
    catalog.next_id += 1;
    let id = catalog.next_id;
    let schedules = assign_schedule_ids(&mut catalog, payload.schedules);
    let course = Course {
        id,
        name: payload.name,
        instructor: payload.instructor,
        category: payload.category,
        description: payload.description,
        schedules,
    };
    catalog.courses.push(course.clone());
    (StatusCode::CREATED, Json(course)).into_response()
}

async fn update_course(
    State(state): State<CatalogState>,
    Path(id): Path<u64>,
    Json(payload): Json<CoursePayload>,
) -> Response {
    state.hit();
    if let Err(rejection) = validate(&payload) {
        return rejection;
    }

    let mut catalog = state.catalog.lock().unwrap();
    let schedules = assign_schedule_ids(&mut catalog, payload.schedules);
    match catalog.courses.iter_mut().find(|c| c.id == id) {
        Some(course) => {
            course.name = payload.name;
            course.instructor = payload.instructor;
            course.category = payload.category;
            course.description = payload.description;
            course.schedules = schedules;
            Json(course.clone()).into_response()
        }
        None => not_found(),
    }
}

async fn delete_course(State(state): State<CatalogState>, Path(id): Path<u64>) -> Response {
    state.hit();
    let mut catalog = state.catalog.lock().unwrap();
    let before = catalog.courses.len();
    catalog.courses.retain(|c| c.id != id);
    if catalog.courses.len() == before {
        return not_found();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn broken(State(state): State<CatalogState>) -> Response {
    state.hit();
    (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response()
}

async fn slow(State(state): State<CatalogState>) -> Json<Vec<Course>> {
    state.hit();
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(Vec::new())
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." }))).into_response()
}

/// A local address nothing is listening on.
pub fn unused_address() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind probe");
    let addr = listener.local_addr().expect("No local address");
    drop(listener);
    format!("http://{}/api", addr)
}
