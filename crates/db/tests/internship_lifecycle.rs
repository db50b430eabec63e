//! Integration tests for the internship-application repository.

use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use protolab_core::attachment::FileAttachment;
use protolab_core::internship::{ApplicantProject, Portfolio, SORTABLE_COLUMNS};
use protolab_core::lifecycle::OrderNote;
use protolab_core::pagination::{PageRequest, SortSpec, MAX_PAGE_LIMIT};
use protolab_core::validation::collect_errors;
use protolab_db::models::internship::{
    ApplicationListParams, CreateInternshipApplication, SetAssignment, UpdateScores,
};
use protolab_db::repositories::InternshipRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn resume() -> FileAttachment {
    FileAttachment {
        file_name: "cv.pdf".to_string(),
        file_url: "/uploads/cv.pdf".to_string(),
        file_type: "application/pdf".to_string(),
        uploaded_at: chrono::Utc::now(),
    }
}

fn new_application(position: &str, email: &str) -> CreateInternshipApplication {
    CreateInternshipApplication {
        full_name: "Ravi Kumar".to_string(),
        email: email.to_string(),
        phone: "+91 98765 43210".to_string(),
        linkedin_url: None,
        github_url: Some("https://github.com/ravi".to_string()),
        college: "IIT Madras".to_string(),
        degree: "B.Tech".to_string(),
        branch: Some("ECE".to_string()),
        year_of_study: Some(3),
        graduation_year: Some(2027),
        cgpa: Some(8.7),
        position: position.to_string(),
        resume: None,
        portfolio: None,
        projects: vec![ApplicantProject {
            name: "Line follower".to_string(),
            description: "PID tuned line following robot".to_string(),
            technologies: vec!["C".to_string(), "STM32".to_string()],
            github_url: None,
            live_url: None,
        }],
        skills: vec!["Rust".to_string(), "KiCad".to_string()],
        cover_letter: None,
        availability: Some("Summer 2026".to_string()),
        preferred_start_date: None,
    }
}

async fn seed(pool: &PgPool, position: &str, email: &str) -> i64 {
    InternshipRepo::create(pool, &new_application(position, email), &resume(), None)
        .await
        .unwrap()
        .id
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn test_graduation_year_is_required() {
    let mut body = serde_json::json!({
        "full_name": "Ravi Kumar",
        "email": "ravi@example.com",
        "phone": "+91 98765 43210",
        "college": "IIT Madras",
        "degree": "B.Tech",
        "position": "AI_ML",
    });
    let input: CreateInternshipApplication = serde_json::from_value(body.clone()).unwrap();
    assert_eq!(input.graduation_year, None);
    assert_eq!(
        collect_errors(&input).get("graduation_year"),
        Some(&vec!["is required".to_string()])
    );

    body["graduation_year"] = 2027.into();
    let input: CreateInternshipApplication = serde_json::from_value(body).unwrap();
    assert!(!collect_errors(&input).contains_key("graduation_year"));
}

#[test]
fn test_inline_attachments_are_validated() {
    let mut input = new_application("AI_ML", "ravi@example.com");
    input.resume = Some(FileAttachment {
        file_url: "javascript:alert(1)".to_string(),
        ..resume()
    });
    input.portfolio = Some(Portfolio::Link {
        url: "not a url".to_string(),
    });
    let errors = collect_errors(&input);
    assert!(errors.contains_key("resume"), "{errors:?}");
    assert!(errors.contains_key("portfolio"), "{errors:?}");

    input.resume = Some(resume());
    input.portfolio = Some(Portfolio::Link {
        url: "https://ravi.dev".to_string(),
    });
    assert!(collect_errors(&input).is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_defaults(pool: PgPool) {
    let portfolio = Portfolio::Link {
        url: "https://ravi.dev".to_string(),
    };
    let created = InternshipRepo::create(
        &pool,
        &new_application("AI_ML", "ravi@example.com"),
        &resume(),
        Some(&portfolio),
    )
    .await
    .unwrap();

    assert_eq!(created.status, "applied");
    assert!(created.notes.0.is_empty());
    assert!(created.assignment.is_none());
    assert_eq!(created.resume.0.file_name, "cv.pdf");
    assert_eq!(created.portfolio.map(|p| p.0), Some(portfolio));
    assert_eq!(created.projects.0.len(), 1);
    assert_eq!(created.skills, ["Rust", "KiCad"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cgpa_check_constraint(pool: PgPool) {
    let mut input = new_application("AI_ML", "ravi@example.com");
    input.cgpa = Some(11.0);
    let err = InternshipRepo::create(&pool, &input, &resume(), None)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        sqlx::Error::Database(ref db_err)
            if db_err.constraint() == Some("ck_internship_applications_cgpa")
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_status_and_notes(pool: PgPool) {
    let id = seed(&pool, "ROBOTICS", "ravi@example.com").await;

    InternshipRepo::set_status(&pool, id, "shortlisted", "priya")
        .await
        .unwrap()
        .unwrap();
    let note = OrderNote::new("Strong embedded background", Some("priya")).unwrap();
    let updated = InternshipRepo::append_note(&pool, id, &note)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.status, "shortlisted");
    assert_eq!(updated.notes.0.len(), 1);
    assert_eq!(updated.notes.0[0].added_by, "priya");
    assert_eq!(updated.status_history.0.len(), 1);
    assert_eq!(updated.status_history.0[0].from, "applied");
    assert_eq!(updated.status_history.0[0].changed_by, "priya");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_partial_scores(pool: PgPool) {
    let id = seed(&pool, "FULL_STACK", "ravi@example.com").await;

    InternshipRepo::update_scores(
        &pool,
        id,
        &UpdateScores {
            interview_score: Some(7.5),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let updated = InternshipRepo::update_scores(
        &pool,
        id,
        &UpdateScores {
            technical_score: Some(9.0),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.interview_score, Some(7.5));
    assert_eq!(updated.technical_score, Some(9.0));
    assert_eq!(updated.communication_score, None);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_assignment_flow(pool: PgPool) {
    let id = seed(&pool, "BACKEND", "ravi@example.com").await;

    // No assignment yet: submission is refused.
    assert!(InternshipRepo::submit_assignment(&pool, id, "https://github.com/ravi/task")
        .await
        .unwrap()
        .is_none());

    let assignment = SetAssignment {
        title: "REST API".to_string(),
        description: "Build a small CRUD service with tests".to_string(),
        due_date: None,
        score: None,
        feedback: None,
    };
    let set = InternshipRepo::set_assignment(&pool, id, &assignment)
        .await
        .unwrap()
        .unwrap();
    let assigned_at = set.assignment.unwrap().0.assigned_at;

    let submitted = InternshipRepo::submit_assignment(&pool, id, "https://github.com/ravi/task")
        .await
        .unwrap()
        .unwrap()
        .assignment
        .unwrap()
        .0;
    assert_eq!(
        submitted.submission_url.as_deref(),
        Some("https://github.com/ravi/task")
    );
    assert!(submitted.submitted_at.is_some());

    // Grading keeps the submission and the original assignment time.
    let graded = InternshipRepo::set_assignment(
        &pool,
        id,
        &SetAssignment {
            score: Some(88.0),
            feedback: Some("Clean code".to_string()),
            ..assignment
        },
    )
    .await
    .unwrap()
    .unwrap()
    .assignment
    .unwrap()
    .0;
    assert_eq!(graded.score, Some(88.0));
    assert_eq!(graded.assigned_at, assigned_at);
    assert!(graded.submission_url.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_filters_sorting_and_stats(pool: PgPool) {
    seed(&pool, "AI_ML", "a@example.com").await;
    seed(&pool, "AI_ML", "b@example.com").await;
    let id = seed(&pool, "FRONTEND", "c@example.com").await;
    InternshipRepo::set_status(&pool, id, "rejected", "admin")
        .await
        .unwrap();

    let params = ApplicationListParams {
        position: Some("AI_ML".into()),
        ..Default::default()
    };
    let sort = SortSpec::resolve(Some("full_name"), Some("asc"), SORTABLE_COLUMNS);
    let page = PageRequest::new(None, Some(1), 50, MAX_PAGE_LIMIT);
    let (rows, total) = InternshipRepo::list(&pool, &params, sort, page).await.unwrap();
    assert_eq!(total, 2);
    assert_eq!(rows.len(), 1);
    assert_eq!(page.meta(total).pages, 2);

    let stats = InternshipRepo::stats(&pool).await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.by_position[0].label, "AI_ML");
    assert_eq!(stats.by_position[0].count, 2);
    assert!(stats
        .by_status
        .iter()
        .any(|c| c.label == "rejected" && c.count == 1));

    assert!(InternshipRepo::delete(&pool, id).await.unwrap());
    assert!(InternshipRepo::find_by_id(&pool, id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_grading_keeps_due_date(pool: PgPool) {
    let id = seed(&pool, "BACKEND", "ravi@example.com").await;
    let due = Utc.with_ymd_and_hms(2026, 11, 30, 18, 0, 0).unwrap();

    let assignment = SetAssignment {
        title: "REST API".to_string(),
        description: "Build a small CRUD service with tests".to_string(),
        due_date: Some(due),
        score: None,
        feedback: None,
    };
    InternshipRepo::set_assignment(&pool, id, &assignment)
        .await
        .unwrap()
        .unwrap();

    let graded = InternshipRepo::set_assignment(
        &pool,
        id,
        &SetAssignment {
            due_date: None,
            score: Some(75.0),
            ..assignment
        },
    )
    .await
    .unwrap()
    .unwrap()
    .assignment
    .unwrap()
    .0;
    assert_eq!(graded.due_date, Some(due));
    assert_eq!(graded.score, Some(75.0));
}
