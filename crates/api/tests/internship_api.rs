mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    admin_token, body_json, build_test_app, build_test_app_with, delete_auth, fresh_upload_dir,
    get, get_auth, post_json, post_json_auth, post_multipart, put_json_auth, Part,
    RecordingNotifier, TestOptions,
};
use serde_json::json;
use sqlx::PgPool;

fn inline_resume() -> serde_json::Value {
    json!({
        "file_name": "cv.pdf",
        "file_url": "https://drive.example.com/cv.pdf",
        "file_type": "application/pdf",
        "uploaded_at": "2026-01-10T09:00:00Z",
    })
}

fn application_body(email: &str) -> serde_json::Value {
    json!({
        "full_name": "Kiran Shetty",
        "email": email,
        "phone": "+91 90000 11111",
        "college": "NIT Karnataka",
        "degree": "B.Tech",
        "branch": "ECE",
        "year_of_study": 3,
        "graduation_year": 2027,
        "cgpa": 8.4,
        "position": "AI_ML",
        "resume": inline_resume(),
        "skills": ["Python", "PyTorch"],
        "projects": [{
            "name": "Rover",
            "description": "An autonomous rover with lidar mapping.",
            "technologies": ["ROS"],
        }],
    })
}

async fn apply(pool: &PgPool, email: &str) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/internships/apply", application_body(email)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn apply_with_inline_resume(pool: PgPool) {
    let notifier = Arc::new(RecordingNotifier::default());
    let app = build_test_app_with(
        pool,
        TestOptions {
            notifier: notifier.clone(),
            ..Default::default()
        },
    );
    let response = post_json(app, "/api/v1/internships/apply", application_body("kiran@example.com")).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "applied");
    assert_eq!(json["data"]["resume"]["file_name"], "cv.pdf");
    assert_eq!(json["data"]["projects"][0]["name"], "Rover");
    assert_eq!(notifier.recipients(), vec!["kiran@example.com".to_string()]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cgpa_out_of_range_is_rejected(pool: PgPool) {
    let mut body = application_body("kiran@example.com");
    body["cgpa"] = json!(11);

    let app = build_test_app(pool);
    let response = post_json(app, "/api/v1/internships/apply", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["details"]["cgpa"].is_array());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_resume_is_reported_with_other_errors(pool: PgPool) {
    let mut body = application_body("kiran@example.com");
    body.as_object_mut().unwrap().remove("resume");
    body["position"] = json!("DEVOPS");

    let app = build_test_app(pool);
    let response = post_json(app, "/api/v1/internships/apply", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["details"]["resume"], json!(["is required"]));
    assert!(json["details"]["position"].is_array());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_graduation_year_is_rejected(pool: PgPool) {
    let mut body = application_body("kiran@example.com");
    body.as_object_mut().unwrap().remove("graduation_year");

    let app = build_test_app(pool);
    let response = post_json(app, "/api/v1/internships/apply", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["details"]["graduation_year"], json!(["is required"]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unsafe_inline_resume_is_rejected(pool: PgPool) {
    let cases = [
        ("file_url", json!("javascript:alert(1)")),
        ("file_type", json!("text/html")),
        ("file_name", json!("")),
        ("file_name", json!("payload.exe")),
    ];
    for (key, value) in cases {
        let mut body = application_body("kiran@example.com");
        body["resume"][key] = value.clone();

        let app = build_test_app(pool.clone());
        let response = post_json(app, "/api/v1/internships/apply", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{key} = {value}");
        let json = body_json(response).await;
        assert!(json["details"]["resume"].is_array(), "{key} = {value}: {json}");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn portfolio_link_must_be_a_url(pool: PgPool) {
    for url in ["not a url", "javascript:alert(1)"] {
        let mut body = application_body("kiran@example.com");
        body["portfolio"] = json!({ "type": "link", "url": url });

        let app = build_test_app(pool.clone());
        let response = post_json(app, "/api/v1/internships/apply", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{url}");
        let json = body_json(response).await;
        assert!(json["details"]["portfolio"].is_array(), "{url}: {json}");
    }

    let mut body = application_body("kiran@example.com");
    body["portfolio"] = json!({ "type": "link", "url": "https://kiran.dev" });
    let app = build_test_app(pool);
    let response = post_json(app, "/api/v1/internships/apply", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["portfolio"]["url"], "https://kiran.dev");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn nested_project_errors_are_indexed(pool: PgPool) {
    let mut body = application_body("kiran@example.com");
    body["projects"][0]["description"] = json!("short");

    let app = build_test_app(pool);
    let response = post_json(app, "/api/v1/internships/apply", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["details"]["projects[0].description"].is_array());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn uploaded_resume_wins_over_inline(pool: PgPool) {
    let upload_dir = fresh_upload_dir();
    let app = build_test_app_with(
        pool,
        TestOptions {
            upload_dir: upload_dir.clone(),
            ..Default::default()
        },
    );
    let response = post_multipart(
        app,
        "/api/v1/internships/apply",
        &[
            Part::Text {
                name: "data",
                value: application_body("kiran@example.com").to_string(),
            },
            Part::File {
                name: "resume",
                file_name: "Kiran Resume.pdf",
                content_type: "application/pdf",
                bytes: b"%PDF-1.4\n",
            },
            Part::File {
                name: "portfolio_file",
                file_name: "work.zip",
                content_type: "application/zip",
                bytes: b"PK\x03\x04",
            },
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["resume"]["file_name"], "Kiran Resume.pdf");
    assert!(json["data"]["resume"]["file_url"]
        .as_str()
        .unwrap()
        .starts_with("/uploads/"));
    assert_eq!(json["data"]["portfolio"]["type"], "file");
    assert_eq!(json["data"]["portfolio"]["file"]["file_name"], "work.zip");

    let stored = std::fs::read_dir(&upload_dir).unwrap().count();
    assert_eq!(stored, 2);
    let _ = std::fs::remove_dir_all(upload_dir);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_pipeline_and_assignment_flow(pool: PgPool) {
    let id = apply(&pool, "kiran@example.com").await;
    let token = admin_token(&pool).await;

    // Submitting before an assignment exists.
    let app = build_test_app(pool.clone());
    let submission = json!({
        "email": "kiran@example.com",
        "submission_url": "https://github.com/kiran/take-home",
    });
    let response = post_json(
        app,
        &format!("/api/v1/internships/{id}/assignment/submission"),
        submission.clone(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let app = build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/internships/{id}/status"),
        json!({ "status": "shortlisted" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "shortlisted");
    assert_eq!(json["data"]["status_history"].as_array().unwrap().last().unwrap()["from"], "applied");

    let app = build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/internships/{id}/assignment"),
        json!({
            "title": "Lidar filter",
            "description": "Implement a voxel grid filter for the rover point cloud.",
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["assignment"]["title"], "Lidar filter");
    assert!(json["data"]["assignment"]["assigned_at"].is_string());

    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/v1/internships/{id}/assignment/submission"),
        json!({
            "email": "someone-else@example.com",
            "submission_url": "https://github.com/kiran/take-home",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = build_test_app(pool.clone());
    let mut upper = submission.clone();
    upper["email"] = json!("KIRAN@example.com");
    let response = post_json(
        app,
        &format!("/api/v1/internships/{id}/assignment/submission"),
        upper,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json["data"]["assignment"]["submission_url"],
        "https://github.com/kiran/take-home"
    );
    assert!(json["data"]["assignment"]["submitted_at"].is_string());

    let app = build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/internships/{id}/scores"),
        json!({ "technical_score": 8.5 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["technical_score"], 8.5);

    let app = build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/internships/{id}/scores"),
        json!({ "interview_score": 12 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/internships/{id}/notes"),
        json!({ "note": "Strong ROS background", "added_by": "mentor" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["notes"][0]["added_by"], "mentor");

    let app = build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/internships/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/internships/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_listing_filters_and_stats(pool: PgPool) {
    apply(&pool, "a@example.com").await;
    apply(&pool, "b@example.com").await;
    let mut other = application_body("c@example.com");
    other["position"] = json!("PCB_DESIGN");
    let app = build_test_app(pool.clone());
    assert_eq!(
        post_json(app, "/api/v1/internships/apply", other).await.status(),
        StatusCode::CREATED
    );
    let token = admin_token(&pool).await;

    let app = build_test_app(pool.clone());
    let response = get(app, "/api/v1/internships").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let app = build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/internships?position=AI_ML&sort_by=full_name&sort_order=asc", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["pagination"]["total"], 2);

    let app = build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/internships?position=DEVOPS", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = build_test_app(pool);
    let response = get_auth(app, "/api/v1/internships/stats", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 3);
    assert_eq!(json["data"]["by_position"][0]["label"], "AI_ML");
    assert_eq!(json["data"]["by_position"][0]["count"], 2);
}
