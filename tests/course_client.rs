mod support;

use course_catalog::api::{ApiError, CourseApi, CourseClient};
use course_catalog::models::{CourseFilter, CoursePayload, Schedule, Weekday};
use reqwest::StatusCode;
use std::time::Duration;

fn client(base_url: &str) -> CourseClient {
    CourseClient::with_timeout(base_url, Duration::from_secs(5)).unwrap()
}

fn payload(name: &str, instructor: &str, category: &str) -> CoursePayload {
    CoursePayload {
        name: name.to_string(),
        instructor: instructor.to_string(),
        category: category.to_string(),
        description: format!("{} for beginners", name),
        schedules: vec![Schedule {
            id: None,
            day: Weekday::Mon,
            start_time: "09:00".to_string(),
            end_time: "10:00".to_string(),
            location: "Room 1".to_string(),
        }],
    }
}

#[tokio::test]
async fn test_list_empty_catalog() {
    let server = support::spawn_server().await;
    let courses = client(&server.base_url)
        .list_courses(&CourseFilter::default())
        .await
        .unwrap();
    assert!(courses.is_empty());
}

#[tokio::test]
async fn test_create_then_get() {
    let server = support::spawn_server().await;
    let api = client(&server.base_url);

    let created = api
        .create_course(&payload("Algorithms", "A. Turing", "CS"))
        .await
        .unwrap();
    assert_eq!(created.name, "Algorithms");
    assert_eq!(created.schedules.len(), 1);
    assert!(created.schedules[0].id.is_some());

    let fetched = api.get_course(created.id).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.schedules[0].day, Weekday::Mon);
}

#[tokio::test]
async fn test_list_applies_filters() {
    let server = support::spawn_server().await;
    let api = client(&server.base_url);
    api.create_course(&payload("Algorithms", "A. Turing", "CS"))
        .await
        .unwrap();
    api.create_course(&payload("Painting", "F. Kahlo", "Art"))
        .await
        .unwrap();

    let by_category = CourseFilter {
        category: "art".to_string(),
        ..Default::default()
    };
    let courses = api.list_courses(&by_category).await.unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].name, "Painting");

    let by_search = CourseFilter {
        search: "  algo ".to_string(),
        instructor: "turing".to_string(),
        ..Default::default()
    };
    let courses = api.list_courses(&by_search).await.unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].instructor, "A. Turing");

    let blank = CourseFilter {
        search: "   ".to_string(),
        ..Default::default()
    };
    assert_eq!(api.list_courses(&blank).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_replaces_course() {
    let server = support::spawn_server().await;
    let api = client(&server.base_url);
    let created = api
        .create_course(&payload("Algorithms", "A. Turing", "CS"))
        .await
        .unwrap();

    let mut changed = payload("Advanced Algorithms", "A. Turing", "CS");
    changed.schedules.push(Schedule {
        id: None,
        day: Weekday::Thu,
        start_time: "14:00".to_string(),
        end_time: "15:30".to_string(),
        location: String::new(),
    });
    let updated = api.update_course(created.id, &changed).await.unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Advanced Algorithms");
    assert_eq!(updated.schedules.len(), 2);
    assert_eq!(server.state.courses()[0].name, "Advanced Algorithms");
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let server = support::spawn_server().await;
    let api = client(&server.base_url);
    let created = api
        .create_course(&payload("Algorithms", "A. Turing", "CS"))
        .await
        .unwrap();

    api.delete_course(created.id).await.unwrap();

    let err = api.get_course(created.id).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert!(err.is_client_fault());
}

#[tokio::test]
async fn test_rejected_payload_carries_status_and_body() {
    let server = support::spawn_server().await;
    let api = client(&server.base_url);

    let err = api
        .create_course(&payload("", "A. Turing", "CS"))
        .await
        .unwrap_err();

    match err {
        ApiError::Server { status, body } => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(body.contains("may not be blank"));
        }
        other => panic!("expected server error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_internal_error_is_server_fault() {
    let server = support::spawn_server().await;
    let err = client(&server.broken_url)
        .list_courses(&CourseFilter::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "server");
    assert!(err.is_server_fault());
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let err = client(&support::unused_address())
        .list_courses(&CourseFilter::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Network { .. }));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_timeout_is_network_error() {
    let server = support::spawn_server().await;
    let api = CourseClient::with_timeout(server.slow_url.as_str(), Duration::from_millis(200))
        .unwrap();

    let err = api
        .list_courses(&CourseFilter::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Network { .. }));
}

#[tokio::test]
async fn test_malformed_base_url_is_request_error() {
    let api = CourseClient::with_timeout("not a url", Duration::from_secs(1)).unwrap();
    let err = api.get_course(1).await.unwrap_err();
    assert!(matches!(err, ApiError::Request { .. }));
}
