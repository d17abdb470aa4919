use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod ai;
pub mod config;
pub mod export;
pub mod lesson_plan;
pub mod service;
pub mod storage;
pub mod text;

pub use crate::config::AppConfig;
pub use crate::service::{LessonPlanService, ServiceError};

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn conflict(message: &str) -> Self {
        Self::new("Conflict", message)
    }

    pub fn bad_gateway(message: &str) -> Self {
        Self::new("BadGateway", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::lesson_plan::routes::get_form_data,
        crate::lesson_plan::routes::save_form_data,
        crate::lesson_plan::routes::generate_lesson_plan,
        crate::lesson_plan::routes::get_lesson_plan,
        crate::lesson_plan::routes::reset_lesson_plan,
        crate::lesson_plan::routes::update_section,
        crate::lesson_plan::routes::refine_section,
        crate::lesson_plan::routes::regenerate_section,
        crate::lesson_plan::routes::get_parsed_section,
        crate::lesson_plan::routes::get_preview,
        crate::lesson_plan::routes::export_lesson_plan,
        crate::lesson_plan::routes::get_export_status,
        crate::lesson_plan::routes::list_themes
    ),
    components(
        schemas(
            lesson_plan::LessonPlan,
            lesson_plan::FormData,
            lesson_plan::SectionKey,
            lesson_plan::SectionValue,
            lesson_plan::routes::UpdateSectionRequest,
            lesson_plan::routes::RefineRequest,
            lesson_plan::routes::ExportStatus,
            lesson_plan::routes::ThemeOption,
            export::ExportFormat,
            text::ParsedSection,
            text::ListItem,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Lesson Plan", description = "Lesson plan (RPP) generation, editing and export endpoints.")
    ),
    servers(
        (url = "http://127.0.0.1:8080", description = "Localhost server")
    )
)]
pub struct ApiDoc;

pub async fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    log::info!(
        "Using model {} with data stored in {}",
        config.ai.model,
        config.data_dir.display()
    );

    let generator = ai::GeminiClient::new(&config.ai).context("Failed to build the AI client")?;
    let store = lesson_plan::PlanStore::new(Arc::new(storage::FileStore::new(&config.data_dir)));
    let service = LessonPlanService::start(
        Arc::new(generator),
        store,
        export::TypstEngine::new(config.typst_bin.clone()),
        config.persist_debounce,
    )
    .await;
    let service = web::Data::new(service);

    let prometheus = PrometheusMetricsBuilder::new("rpp_generator")
        .endpoint("/metrics")
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create Prometheus metrics middleware: {}", e))?;

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        let service = service.clone();
        let prometheus = prometheus.clone();
        let cors = Cors::default()
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:8080")
            .allowed_origin("http://127.0.0.1:8080")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .expose_headers(vec![header::CONTENT_DISPOSITION])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(service)
            .service(web::scope("/api").configure(lesson_plan::routes::config))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
