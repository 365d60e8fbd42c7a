//! HTTP-level tests for `CampusHttpClient` and `ScreenClient` against a mock
//! server.

use std::time::Duration;

use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use campus::controller::{ActionRequest, Target};
use campus::screen::{EXAMS, PROMOTIONS, SUBMISSIONS};
use campus::types::{
    Exam, GradeBand, GradeCriteria, ListQuery, NewExam, PromotionRequest, Submission,
};
use campus::{
    ActionKind, AuthContext, CampusConfig, CampusError, CampusHttpClient, ErrorClass,
    ModerationController, ModerationStatus, NoticeLevel, ScreenClient,
};

fn client(server: &MockServer) -> CampusHttpClient {
    let config = CampusConfig {
        api_url: format!("{}/api/", server.uri()),
        request_timeout: Some(Duration::from_millis(500)),
        ..Default::default()
    };
    let auth = AuthContext::new(Some("tok-123".into()), "admin-1");
    CampusHttpClient::new(&config, auth).unwrap()
}

fn promotion_json(id: &str, status: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "studentName": "Asha Verma",
        "email": "asha@example.edu",
        "batch": "2024-A",
        "currentYear": 2,
        "status": status,
        "createdAt": "2024-07-01T09:30:00Z"
    })
}

fn list_body(
    items: Vec<serde_json::Value>,
    current: u32,
    pages: u32,
    total: u64,
) -> serde_json::Value {
    json!({
        "success": true,
        "data": {
            "items": items,
            "pagination": {
                "currentPage": current,
                "totalPages": pages,
                "totalCount": total,
                "limit": 10
            }
        }
    })
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_list_sends_bearer_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/student-promotions"))
        .and(header("authorization", "Bearer tok-123"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "10"))
        .and(query_param("status", "pending"))
        .and(query_param("search", "asha"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(
            vec![promotion_json("p1", "pending")],
            2,
            3,
            23,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let query = ListQuery::new(2, 10)
        .unwrap()
        .with_filter("status", "pending")
        .with_filter("search", "asha")
        .with_filter("batch", "all");
    let page = client(&server)
        .list::<PromotionRequest>(&PROMOTIONS, &query)
        .await
        .unwrap();

    assert_eq!(page.current_page, 2);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items[0].id, "p1");
    assert_eq!(page.items[0].status, ModerationStatus::Pending);
}

#[tokio::test]
async fn test_unauthorized_is_auth_class() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"success": false, "message": "jwt expired"})),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .list::<PromotionRequest>(&PROMOTIONS, &ListQuery::new(1, 10).unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::Auth);
    match err {
        CampusError::Auth { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "jwt expired");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_is_transport_class() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client(&server)
        .summary(&PROMOTIONS)
        .await
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::Transport);
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(2))
                .set_body_json(json!({"success": true, "data": {}})),
        )
        .mount(&server)
        .await;

    let err = client(&server).summary(&PROMOTIONS).await.unwrap_err();
    assert!(matches!(err, CampusError::Timeout));
}

// ---------------------------------------------------------------------------
// Moderation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_success_false_is_application_error() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/admin/student-promotions/p1/approve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"success": false, "message": "Request already processed"}),
        ))
        .mount(&server)
        .await;

    let err = client(&server)
        .approve::<PromotionRequest>(&PROMOTIONS, "p1", None)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Request already processed");
    assert_eq!(err.class(), ErrorClass::Application);
}

#[tokio::test]
async fn test_reject_sends_reason_and_admin() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/admin/student-promotions/p1/reject"))
        .and(body_partial_json(json!({
            "reason": "Invalid documents",
            "adminId": "admin-1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Promotion rejected",
            "data": promotion_json("p1", "rejected")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let updated: Option<PromotionRequest> = client(&server)
        .reject(&PROMOTIONS, "p1", "  Invalid documents ", Some(""))
        .await
        .unwrap();
    assert_eq!(updated.unwrap().status, ModerationStatus::Rejected);
}

#[tokio::test]
async fn test_blank_reject_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let http = client(&server);
    let err = http
        .reject::<PromotionRequest>(&PROMOTIONS, "p1", " \t", None)
        .await
        .unwrap_err();
    assert!(matches!(err, CampusError::Validation(_)));

    let err = http
        .bulk(&PROMOTIONS, ActionKind::Reject, &["p1".to_string()], "")
        .await
        .unwrap_err();
    assert!(matches!(err, CampusError::Validation(_)));
}

#[tokio::test]
async fn test_grade_out_of_range_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let http = client(&server);
    for marks in [dec!(-1), dec!(100.5)] {
        let err = http
            .grade::<Submission>(&SUBMISSIONS, "s1", marks, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, CampusError::Validation(_)));
    }
}

#[tokio::test]
async fn test_grade_sends_marks() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/mentor/submissions/s1"))
        .and(body_partial_json(json!({
            "marks": 42.5,
            "maxMarks": 50.0,
            "gradedBy": "admin-1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let updated = client(&server)
        .grade::<Submission>(&SUBMISSIONS, "s1", dec!(42.5), Some(dec!(50)), Some("Good"))
        .await
        .unwrap();
    assert!(updated.is_none());
}

fn submission_json(id: &str, max_marks: u32) -> serde_json::Value {
    json!({
        "_id": id,
        "studentName": "Kiran Das",
        "taskTitle": "Linked lists",
        "status": "pending",
        "maxMarks": max_marks
    })
}

#[tokio::test]
async fn test_grade_over_http_uses_task_maximum() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/mentor/submissions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(
            vec![submission_json("s1", 10)],
            1,
            1,
            1,
        )))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/mentor/submissions/s1"))
        .and(body_partial_json(json!({"marks": 8.0, "maxMarks": 10.0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let api = ScreenClient::<Submission>::new(client(&server), &SUBMISSIONS);
    let mut c = ModerationController::<Submission>::new(&SUBMISSIONS, 10).unwrap();
    c.refresh(&api).await;

    let grade = |marks| ActionRequest::Grade {
        marks,
        max_marks: None,
        feedback: None,
    };
    let err = c
        .perform(&api, Target::One("s1".into()), grade(dec!(50)))
        .await
        .unwrap_err();
    assert!(matches!(err, CampusError::Validation(_)));

    c.perform(&api, Target::One("s1".into()), grade(dec!(8)))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_bulk_partial_report() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/admin/student-promotions/bulk-approve"))
        .and(body_partial_json(json!({"adminId": "admin-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"approved": ["a", "c", "e"]}
        })))
        .mount(&server)
        .await;

    let ids: Vec<String> = ["a", "b", "c", "d", "e"].iter().map(|s| s.to_string()).collect();
    let result = client(&server)
        .bulk(&PROMOTIONS, ActionKind::Approve, &ids, "")
        .await
        .unwrap();
    assert_eq!(result.succeeded_ids.len(), 3);
    assert!(result.failed_ids.contains_key("b"));
    assert!(result.failed_ids.contains_key("d"));
}

#[tokio::test]
async fn test_bulk_without_report_is_all_or_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/admin/student-promotions/bulk-reject"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    let ids = vec!["a".to_string(), "b".to_string()];
    let result = client(&server)
        .bulk(&PROMOTIONS, ActionKind::Reject, &ids, "Duplicate")
        .await
        .unwrap();
    assert!(result.is_complete());
    assert_eq!(result.succeeded_ids.len(), 2);
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_create_exam_validates_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let exam = NewExam {
        title: " ".into(),
        subject: "Maths".into(),
        total_marks: 100,
        duration_minutes: 60,
        scheduled_at: None,
    };
    let err = client(&server).create_exam(&exam).await.unwrap_err();
    assert!(matches!(err, CampusError::Validation(_)));
}

#[tokio::test]
async fn test_delete_exam() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/admin/exams/e1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "message": "Exam deleted"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    client(&server).delete_item(&EXAMS, "e1").await.unwrap();
}

#[tokio::test]
async fn test_fetch_single_submission() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/mentor/submissions/s7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": submission_json("s7", 10)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sub: Submission = client(&server)
        .fetch_item(&SUBMISSIONS, "s7")
        .await
        .unwrap();
    assert_eq!(sub.max_marks, Some(dec!(10)));
}

fn exam_json(id: &str, title: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "title": title,
        "subject": "Maths",
        "totalMarks": 100,
        "durationMinutes": 90,
        "isPublished": false
    })
}

#[tokio::test]
async fn test_edit_exam_patches_row_in_place() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/exams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(
            vec![exam_json("e1", "Midterm"), exam_json("e2", "Quiz")],
            1,
            1,
            2,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/admin/exams/e1"))
        .and(body_partial_json(json!({"title": "Midterm (rescheduled)"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": exam_json("e1", "Midterm (rescheduled)")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = ScreenClient::<Exam>::new(client(&server), &EXAMS);
    let mut c = ModerationController::<Exam>::new(&EXAMS, 10).unwrap();
    c.refresh(&api).await;

    let rec = c
        .perform(
            &api,
            Target::One("e1".into()),
            ActionRequest::Edit {
                body: json!({"title": "Midterm (rescheduled)"}),
            },
        )
        .await
        .unwrap();
    assert_eq!(rec.patched, vec!["e1".to_string()]);
    assert!(!rec.needs_refetch);
    let page = c.page().unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].title, "Midterm (rescheduled)");
}

// ---------------------------------------------------------------------------
// Grade criteria
// ---------------------------------------------------------------------------

fn band(grade: &str, min: rust_decimal::Decimal, max: rust_decimal::Decimal) -> GradeBand {
    GradeBand {
        grade: grade.into(),
        min_percent: min,
        max_percent: max,
    }
}

#[tokio::test]
async fn test_overlapping_bands_send_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let criteria = GradeCriteria {
        id: String::new(),
        name: "Semester".into(),
        bands: vec![band("A", dec!(80), dec!(100)), band("B", dec!(60), dec!(85))],
    };
    let err = client(&server).create_criteria(&criteria).await.unwrap_err();
    assert!(matches!(err, CampusError::Validation(_)));
}

#[tokio::test]
async fn test_create_criteria_posts_bands() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/grade-criteria"))
        .and(body_partial_json(json!({
            "name": "Semester",
            "bands": [{"grade": "A", "minPercent": 80.0, "maxPercent": 100.0}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "_id": "gc1",
                "name": "Semester",
                "bands": [{"grade": "A", "minPercent": 80, "maxPercent": 100}]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let criteria = GradeCriteria {
        id: String::new(),
        name: "Semester".into(),
        bands: vec![band("A", dec!(80), dec!(100))],
    };
    let created = client(&server).create_criteria(&criteria).await.unwrap();
    assert_eq!(created.id, "gc1");
    assert_eq!(created.grade_for(dec!(91)).unwrap().grade, "A");
}

// ---------------------------------------------------------------------------
// Controller over HTTP
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_controller_round_trip_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/student-promotions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(
            vec![promotion_json("p1", "pending"), promotion_json("p2", "pending")],
            1,
            1,
            2,
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/student-promotions/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"pending": 2, "approved": 0, "rejected": 0, "total": 2}
        })))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/admin/student-promotions/p1/approve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Student promoted",
            "data": promotion_json("p1", "approved")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = ScreenClient::<PromotionRequest>::new(client(&server), &PROMOTIONS);
    let mut c = ModerationController::<PromotionRequest>::new(&PROMOTIONS, 10).unwrap();
    c.refresh(&api).await;
    assert_eq!(c.summary().unwrap().pending, 2);

    let rec = c
        .perform(&api, Target::One("p1".into()), ActionRequest::Approve { note: None })
        .await
        .unwrap();
    assert_eq!(rec.removed, vec!["p1".to_string()]);
    assert_eq!(c.page().unwrap().items.len(), 1);
    assert_eq!(c.notice().unwrap().level, NoticeLevel::Success);
}
