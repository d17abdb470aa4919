mod common;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use common::{sample_form, start_service, MockGenerator};
use rpp_generator::lesson_plan::{routes, LessonPlan};
use rpp_generator::storage::MemoryStore;
use rpp_generator::ErrorResponse;
use serde_json::json;
use std::sync::Arc;

async fn app_state(generator: Arc<MockGenerator>) -> web::Data<rpp_generator::LessonPlanService> {
    web::Data::new(start_service(generator, MemoryStore::new()).await)
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .service(web::scope("/api").configure(routes::config)),
        )
        .await
    };
}

#[actix_web::test]
async fn test_plan_is_not_found_before_generation() {
    let state = app_state(Arc::new(MockGenerator::new())).await;
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/lesson-plan").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "NotFound");
}

#[actix_web::test]
async fn test_form_data_round_trip() {
    let state = app_state(Arc::new(MockGenerator::new())).await;
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/form-data").to_request();
    let empty: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(empty["schoolName"], "");

    let req = test::TestRequest::put()
        .uri("/api/form-data")
        .set_json(sample_form())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = test::TestRequest::get().uri("/api/form-data").to_request();
    let saved: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(saved["schoolName"], "SD Negeri 1 Cakung");
    assert_eq!(saved["principalNip"], "197501012000031002");
}

#[actix_web::test]
async fn test_generate_then_edit_section() {
    let state = app_state(Arc::new(MockGenerator::new())).await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/lesson-plan/generate")
        .set_json(sample_form())
        .to_request();
    let plan: LessonPlan = test::call_and_read_body_json(&app, req).await;
    assert_eq!(plan.learning_topic, "Perjalanan Setetes Air");

    let req = test::TestRequest::put()
        .uri("/api/lesson-plan/sections/learningTopic")
        .set_json(json!({ "value": "Air di Sekitar Kita" }))
        .to_request();
    let plan: LessonPlan = test::call_and_read_body_json(&app, req).await;
    assert_eq!(plan.learning_topic, "Air di Sekitar Kita");

    let req = test::TestRequest::get()
        .uri("/api/lesson-plan/sections/coreActivities/parsed")
        .to_request();
    let parsed: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(parsed["kind"], "list");
    assert_eq!(parsed["content"][3]["ordinal"], 4);
}

#[actix_web::test]
async fn test_generate_rejects_incomplete_form() {
    let state = app_state(Arc::new(MockGenerator::new())).await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/lesson-plan/generate")
        .set_json(json!({ "schoolName": "SDN 1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert!(body.message.starts_with("Validasi gagal"));
}

#[actix_web::test]
async fn test_unknown_section_and_format_are_rejected() {
    let state = app_state(Arc::new(MockGenerator::new())).await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/lesson-plan/generate")
        .set_json(sample_form())
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/lesson-plan/sections/noSuchSection/regenerate")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::get()
        .uri("/api/lesson-plan/export/odt")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::get()
        .uri("/api/lesson-plan/preview?theme=not-a-colour")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn test_failed_ai_call_maps_to_bad_gateway() {
    let generator = Arc::new(MockGenerator::new());
    let state = app_state(generator.clone()).await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/lesson-plan/generate")
        .set_json(sample_form())
        .to_request();
    let before: LessonPlan = test::call_and_read_body_json(&app, req).await;

    generator.set_failing(true);
    let req = test::TestRequest::post()
        .uri("/api/lesson-plan/sections/coreActivities/refine")
        .set_json(json!({ "instruction": "Tambahkan permainan" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.message, "Gagal menyempurnakan bagian \"Kegiatan Inti\".");

    let req = test::TestRequest::get().uri("/api/lesson-plan").to_request();
    let after: LessonPlan = test::call_and_read_body_json(&app, req).await;
    assert_eq!(after.core_activities, before.core_activities);
}

#[actix_web::test]
async fn test_export_sets_attachment_headers() {
    let state = app_state(Arc::new(MockGenerator::new())).await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/lesson-plan/generate")
        .set_json(sample_form())
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/lesson-plan/export/html?theme=%23800000")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"Perencanaan_Pembelajaran.html\""
    );
    let body = test::read_body(resp).await;
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("background-color: #800000;"));

    let req = test::TestRequest::get()
        .uri("/api/exports/status")
        .to_request();
    let status: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(status["exports"], json!([]));
}

#[actix_web::test]
async fn test_reset_clears_plan_and_form() {
    let state = app_state(Arc::new(MockGenerator::new())).await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/lesson-plan/generate")
        .set_json(sample_form())
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::delete().uri("/api/lesson-plan").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );

    let req = test::TestRequest::get().uri("/api/lesson-plan").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
    let req = test::TestRequest::get().uri("/api/form-data").to_request();
    let form: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(form["teacherName"], "");
}

#[actix_web::test]
async fn test_theme_palette_lists_default_first() {
    let state = app_state(Arc::new(MockGenerator::new())).await;
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/themes").to_request();
    let themes: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(themes.as_array().unwrap().len(), 12);
    assert_eq!(themes[0]["hex"], "#343a40");
}
