use std::{fs, future::Future, path::PathBuf, sync::Arc, sync::Mutex};

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use rozklad_proxy::{
    schedule::{error::ScheduleError, models::Config, schedule_getter::ScheduleGetter},
    server::{build_router, AppState},
};
use serde_json::{json, Value};
use tower::util::ServiceExt;

/// Stands in for timetable_export.cgi, answering from the fixture files in `tests/`.
pub struct TestGetter {
    pub teacher_schedule_path: String,
    pub queries: Mutex<Vec<String>>,
}

impl TestGetter {
    fn new(teacher_schedule_path: &str) -> Self {
        Self {
            teacher_schedule_path: teacher_schedule_path.to_owned(),
            queries: Mutex::new(Vec::new()),
        }
    }
}

impl ScheduleGetter for TestGetter {
    fn fetch(&self, query: String) -> impl Future<Output = Result<String, ScheduleError>> + Send {
        let path = if query.contains("req_mode=teacher") {
            PathBuf::from(&self.teacher_schedule_path)
        } else if query.contains("req_type=obj_list") {
            PathBuf::from("tests/test.room_list.json")
        } else if query.contains("req_mode=room") {
            PathBuf::from("tests/test.room_schedule.json")
        } else {
            PathBuf::from("_")
        };
        self.queries.lock().unwrap().push(query.clone());
        async move {
            Ok::<_, ScheduleError>(
                fs::read_to_string(path).unwrap_or_else(|_| json!({ "echo": query }).to_string()),
            )
        }
    }
}

/// Always fails as if the API were unreachable.
pub struct DownGetter;

impl ScheduleGetter for DownGetter {
    fn fetch(&self, _query: String) -> impl Future<Output = Result<String, ScheduleError>> + Send {
        async {
            Err::<String, _>(ScheduleError::Upstream {
                message: "connection refused".to_owned(),
                code: None,
            })
        }
    }
}

fn march_15_2025() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
}

fn setup_app(getter: Arc<TestGetter>) -> Router {
    build_router(AppState {
        schedule_getter: getter,
        config: Arc::new(Config {
            upstream_url: "https://rozklad.test/cgi-bin/timetable_export.cgi".to_owned(),
            ..Config::default()
        }),
        today: march_15_2025,
    })
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn item(description: &str, hours: u8) -> Value {
    json!({ "description": description, "hours": hours })
}

#[tokio::test]
async fn teacher_load_groups_fixture_lessons() {
    let getter = Arc::new(TestGetter::new("tests/test.teacher_schedule.json"));
    let (status, body) = get(
        setup_app(Arc::clone(&getter)),
        "/api/schedule/teacher-load?teacherId=1234&month=9",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["teacher_id"], 1234);
    assert_eq!(body["month_id"], 9);
    assert_eq!(
        body["full_time"]["lectures"],
        json!([
            item("Програмування (Л) КІ-25-1 02.09.2025 08:00-09:20", 2),
            item(" 05.09.2025 13:00-14:20", 2),
        ])
    );
    assert_eq!(
        body["full_time"]["labs"],
        json!([item(
            "Програмування (Лаб) КІ-25-1 півпара 02.09.2025 09:35-10:55",
            1
        )])
    );
    assert_eq!(
        body["part_time"]["practice"],
        json!([item("Бази даних (Пр) з-24-1 03.09.2025 11:10-12:30", 2)])
    );
    assert_eq!(
        body["hourly"]["exams"],
        json!([item(
            "Увага! Заміна Бази даних (Екз) мз-24-1 04.09.2025 08:00-09:20",
            0
        )])
    );
    assert_eq!(body["hourly"]["lectures"], json!([]));
    assert_eq!(body["part_time"]["exam_consultations"], json!([]));

    // September is still ahead on March 15th, so it stays in 2025
    let queries = getter.queries.lock().unwrap();
    assert!(queries[0].contains("OBJ_ID=1234"));
    assert!(queries[0].contains("begin_date=01.09.2025&end_date=30.09.2025"));
}

#[tokio::test]
async fn teacher_load_past_month_asks_for_next_year() {
    let getter = Arc::new(TestGetter::new("tests/test.teacher_schedule.json"));
    let (status, _) = get(
        setup_app(Arc::clone(&getter)),
        "/api/schedule/teacher-load?teacherId=7&month=2",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(getter.queries.lock().unwrap()[0]
        .contains("begin_date=01.02.2026&end_date=28.02.2026"));
}

#[tokio::test]
async fn teacher_load_for_empty_schedule_has_every_key() {
    let getter = Arc::new(TestGetter::new("tests/non_existent.json"));
    let (status, body) = get(
        setup_app(getter),
        "/api/schedule/teacher-load?teacherId=1&month=5",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let empty = json!({
        "lectures": [],
        "practice": [],
        "labs": [],
        "credits": [],
        "exam_consultations": [],
        "exams": []
    });
    assert_eq!(body["full_time"], empty);
    assert_eq!(body["part_time"], empty);
    assert_eq!(body["hourly"], empty);
}

#[tokio::test]
async fn teacher_load_api_error_is_bad_gateway() {
    let getter = Arc::new(TestGetter::new("tests/test.api_error.json"));
    let (status, body) = get(
        setup_app(getter),
        "/api/schedule/teacher-load?teacherId=1&month=5",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "timetable API error: Об'єкт не знайдено");
}

#[tokio::test]
async fn teacher_load_validation() {
    let cases = [
        (
            "/api/schedule/teacher-load?teacherId=0&month=5",
            "Teacher ID must be a positive number",
        ),
        (
            "/api/schedule/teacher-load?teacherId=-3&month=5",
            "Teacher ID must be a positive number",
        ),
        (
            "/api/schedule/teacher-load?month=5",
            "Teacher ID must be a positive number",
        ),
        (
            "/api/schedule/teacher-load?teacherId=3&month=13",
            "Month must be between 1 and 12",
        ),
        (
            "/api/schedule/teacher-load?teacherId=3&month=0",
            "Month must be between 1 and 12",
        ),
        (
            "/api/schedule/teacher-schedule?teacherId=3&monthId=-1",
            "Month ID must be between 1 and 12",
        ),
    ];
    for (uri, message) in cases {
        let getter = Arc::new(TestGetter::new("tests/test.teacher_schedule.json"));
        let (status, body) = get(setup_app(Arc::clone(&getter)), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"], message, "{uri}");
        assert!(getter.queries.lock().unwrap().is_empty(), "{uri}");
    }
}

#[tokio::test]
async fn unparsable_query_values_are_json_bad_request() {
    let cases = [
        "/api/schedule/teacher-load?teacherId=abc&month=5",
        "/api/schedule/teacher-load?teacherId=3&month=may",
        "/api/schedule/teacher-schedule?teacherId=3&monthId=x",
        "/api/schedule/room?roomId=101&from=08.09.2025&to=2025-09-14",
        "/api/schedule/room?roomId=101&from=2025-09-08&to=2025-13-01",
    ];
    for uri in cases {
        let getter = Arc::new(TestGetter::new("tests/test.teacher_schedule.json"));
        let (status, body) = get(setup_app(Arc::clone(&getter)), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["error"].is_string(), "{uri}");
        assert!(getter.queries.lock().unwrap().is_empty(), "{uri}");
    }
}

#[tokio::test]
async fn teacher_load_numeric_api_error_is_bad_gateway() {
    let getter = Arc::new(TestGetter::new("tests/test.api_error_numeric.json"));
    let (status, body) = get(
        setup_app(getter),
        "/api/schedule/teacher-load?teacherId=1&month=5",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "timetable API error: Об'єкт не знайдено");
}

#[tokio::test]
async fn teacher_schedule_lists_classified_lessons() {
    let getter = Arc::new(TestGetter::new("tests/test.teacher_schedule.json"));
    let (status, body) = get(
        setup_app(getter),
        "/api/schedule/teacher-schedule?teacherId=1234&monthId=9",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lessons_count"], 6);
    let lab = &body["lessons"][1];
    assert_eq!(lab["lesson_description"], "Програмування (Лаб) КІ-25-1 півпара");
    assert_eq!(lab["lesson_type"], "laboratory");
    assert_eq!(lab["hour_type"], "full_time");
    assert_eq!(lab["half_lesson"], true);
    assert_eq!(lab["lesson_hours"], 1);
    let unknown = &body["lessons"][5];
    assert_eq!(unknown["lesson_type"], "unspecified");
    assert_eq!(unknown["comment"], "");
}

#[tokio::test]
async fn proxy_passes_body_through() {
    let getter = Arc::new(TestGetter::new("tests/test.teacher_schedule.json"));
    let request = Request::builder()
        .uri("/api/schedule/proxy?q=req_type%3Dgroup_list%26show_ID%3Dyes")
        .body(Body::empty())
        .unwrap();
    let response = setup_app(Arc::clone(&getter))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["echo"], "req_type=group_list&show_ID=yes");
    assert_eq!(
        getter.queries.lock().unwrap()[0],
        "req_type=group_list&show_ID=yes"
    );
}

#[tokio::test]
async fn proxy_requires_query() {
    for uri in ["/api/schedule/proxy", "/api/schedule/proxy?q="] {
        let getter = Arc::new(TestGetter::new("_"));
        let (status, body) = get(setup_app(getter), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Query parameter 'q' is required");
    }
}

#[tokio::test]
async fn proxy_upstream_down_is_bad_gateway() {
    let app = build_router(AppState::new(DownGetter, Config::default()));
    let (status, body) = get(app, "/api/schedule/proxy?q=req_type%3Dobj_list").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "timetable API error: connection refused");
}

#[tokio::test]
async fn blocks_skip_empty_buildings() {
    let getter = Arc::new(TestGetter::new("_"));
    let (status, body) = get(setup_app(getter), "/api/schedule/blocks").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{
            "name": "Корпус 1",
            "objects": [
                { "name": "1-101", "ID": "101" },
                { "name": "1-102", "ID": "102" }
            ]
        }])
    );
}

#[tokio::test]
async fn room_schedule_groups_by_day() {
    let getter = Arc::new(TestGetter::new("_"));
    let (status, body) = get(
        setup_app(Arc::clone(&getter)),
        "/api/schedule/room?roomId=101&from=2025-09-08&to=2025-09-14",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["room_id"], "101");
    assert_eq!(body["days"][0]["date"], "08.09.2025");
    assert_eq!(body["days"][0]["lessons"].as_array().unwrap().len(), 2);
    assert_eq!(body["days"][1]["date"], "09.09.2025");
    assert_eq!(
        body["export_url"],
        "https://rozklad.test/cgi-bin/timetable_export.cgi?req_type=rozklad&req_mode=room&OBJ_ID=101&OBJ_name=&dep_name=&ros_text=united&begin_date=08.09.2025&end_date=14.09.2025&req_format=iCal&coding_mode=UTF8&bs=ok"
    );
    assert!(getter.queries.lock().unwrap()[0]
        .contains("begin_date=08.09.2025&end_date=14.09.2025&req_format=json"));
}

#[tokio::test]
async fn room_schedule_validation() {
    let cases = [
        "/api/schedule/room?from=2025-09-08&to=2025-09-14",
        "/api/schedule/room?roomId=1%262&from=2025-09-08&to=2025-09-14",
        "/api/schedule/room?roomId=101&from=2025-09-08",
        "/api/schedule/room?roomId=101&from=2025-09-14&to=2025-09-08",
    ];
    for uri in cases {
        let (status, body) = get(setup_app(Arc::new(TestGetter::new("_"))), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["error"].is_string(), "{uri}");
    }
}

#[tokio::test]
async fn periods_use_injected_today() {
    let (status, body) = get(
        setup_app(Arc::new(TestGetter::new("_"))),
        "/api/schedule/periods",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["value"], "to_end_of_week");
    assert_eq!(body[0]["from_date"], "2025-03-15");
    assert_eq!(body[0]["to_date"], "2025-03-16");
    assert_eq!(body[3]["value"], "previous_month");
    assert_eq!(body[3]["from_date"], "2025-02-01");
    assert_eq!(body[3]["to_date"], "2025-02-28");
    assert_eq!(body[4]["from_date"], "2025-02-20");
}

#[tokio::test]
async fn health_endpoint() {
    let (status, body) = get(setup_app(Arc::new(TestGetter::new("_"))), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}
