use crate::export::{ExportFormat, ThemeColor, THEME_COLORS};
use crate::lesson_plan::{FormData, LessonPlan, SectionKey, SectionValue};
use crate::service::{LessonPlanService, ServiceError};
use crate::text::ParsedSection;
use crate::ErrorResponse;
use actix_web::http::{header, StatusCode};
use actix_web::{web, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSectionRequest {
    /// Text, or a list of labels for `graduateProfileDimensions`
    pub value: SectionValue,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RefineRequest {
    pub instruction: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ThemeQuery {
    /// `#rrggbb` or `#rgb`; defaults to the first palette colour
    pub theme: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExportStatus {
    pub exports: Vec<ExportFormat>,
    pub sections: Vec<SectionKey>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ThemeOption {
    pub name: String,
    pub hex: String,
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) | ServiceError::NotEditable(_) => StatusCode::BAD_REQUEST,
            ServiceError::NoPlan | ServiceError::UnknownSection(_) => StatusCode::NOT_FOUND,
            ServiceError::GenerationBusy
            | ServiceError::SectionBusy(_)
            | ServiceError::ExportBusy(_) => StatusCode::CONFLICT,
            ServiceError::Ai { .. } => StatusCode::BAD_GATEWAY,
            ServiceError::Export { .. } | ServiceError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = self.to_string();
        let body = match self.status_code() {
            StatusCode::BAD_REQUEST => ErrorResponse::bad_request(&message),
            StatusCode::NOT_FOUND => ErrorResponse::not_found(&message),
            StatusCode::CONFLICT => ErrorResponse::conflict(&message),
            StatusCode::BAD_GATEWAY => ErrorResponse::bad_gateway(&message),
            _ => ErrorResponse::internal_error(&message),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

fn section_key(path: web::Path<String>) -> Result<SectionKey, ServiceError> {
    Ok(path.into_inner().parse::<SectionKey>()?)
}

fn theme(query: &ThemeQuery) -> Result<ThemeColor, ServiceError> {
    ThemeColor::from_query(query.theme.as_deref())
        .map_err(|e| ServiceError::Validation(e.to_string()))
}

#[utoipa::path(
    get,
    path = "/api/form-data",
    tag = "Lesson Plan",
    responses(
        (status = 200, description = "Saved form data, or empty fields", body = FormData)
    )
)]
pub async fn get_form_data(service: web::Data<LessonPlanService>) -> HttpResponse {
    HttpResponse::Ok().json(service.form_data())
}

#[utoipa::path(
    put,
    path = "/api/form-data",
    tag = "Lesson Plan",
    request_body = FormData,
    responses(
        (status = 200, description = "Form data saved", body = FormData)
    )
)]
pub async fn save_form_data(
    service: web::Data<LessonPlanService>,
    form: web::Json<FormData>,
) -> HttpResponse {
    HttpResponse::Ok().json(service.save_form(form.into_inner()).await)
}

#[utoipa::path(
    post,
    path = "/api/lesson-plan/generate",
    tag = "Lesson Plan",
    request_body = FormData,
    responses(
        (status = 200, description = "Lesson plan generated", body = LessonPlan),
        (status = 400, description = "Form is incomplete", body = ErrorResponse),
        (status = 409, description = "A generation is already running", body = ErrorResponse),
        (status = 502, description = "The AI call failed", body = ErrorResponse)
    )
)]
pub async fn generate_lesson_plan(
    service: web::Data<LessonPlanService>,
    form: web::Json<FormData>,
) -> Result<HttpResponse, ServiceError> {
    let plan = service.generate(form.into_inner()).await?;
    Ok(HttpResponse::Ok().json(plan))
}

#[utoipa::path(
    get,
    path = "/api/lesson-plan",
    tag = "Lesson Plan",
    responses(
        (status = 200, description = "Current lesson plan", body = LessonPlan),
        (status = 404, description = "No lesson plan yet", body = ErrorResponse)
    )
)]
pub async fn get_lesson_plan(
    service: web::Data<LessonPlanService>,
) -> Result<HttpResponse, ServiceError> {
    Ok(HttpResponse::Ok().json(service.current_plan()?))
}

#[utoipa::path(
    delete,
    path = "/api/lesson-plan",
    tag = "Lesson Plan",
    responses(
        (status = 204, description = "Lesson plan and form data cleared")
    )
)]
pub async fn reset_lesson_plan(service: web::Data<LessonPlanService>) -> HttpResponse {
    service.reset().await;
    HttpResponse::NoContent().finish()
}

#[utoipa::path(
    put,
    path = "/api/lesson-plan/sections/{key}",
    tag = "Lesson Plan",
    params(
        ("key" = String, Path, description = "Section key, e.g. coreActivities")
    ),
    request_body = UpdateSectionRequest,
    responses(
        (status = 200, description = "Section updated", body = LessonPlan),
        (status = 400, description = "Value has the wrong shape", body = ErrorResponse),
        (status = 404, description = "Unknown section or no lesson plan", body = ErrorResponse)
    )
)]
pub async fn update_section(
    service: web::Data<LessonPlanService>,
    path: web::Path<String>,
    item: web::Json<UpdateSectionRequest>,
) -> Result<HttpResponse, ServiceError> {
    let key = section_key(path)?;
    let plan = service.update_section(key, item.into_inner().value).await?;
    Ok(HttpResponse::Ok().json(plan))
}

#[utoipa::path(
    post,
    path = "/api/lesson-plan/sections/{key}/refine",
    tag = "Lesson Plan",
    params(
        ("key" = String, Path, description = "Section key")
    ),
    request_body = RefineRequest,
    responses(
        (status = 200, description = "Section rewritten by the AI", body = LessonPlan),
        (status = 400, description = "Section is not AI-editable or instruction is empty", body = ErrorResponse),
        (status = 409, description = "The section is already being processed", body = ErrorResponse),
        (status = 502, description = "The AI call failed; section left unchanged", body = ErrorResponse)
    )
)]
pub async fn refine_section(
    service: web::Data<LessonPlanService>,
    path: web::Path<String>,
    item: web::Json<RefineRequest>,
) -> Result<HttpResponse, ServiceError> {
    let key = section_key(path)?;
    let plan = service.refine(key, &item.instruction).await?;
    Ok(HttpResponse::Ok().json(plan))
}

#[utoipa::path(
    post,
    path = "/api/lesson-plan/sections/{key}/regenerate",
    tag = "Lesson Plan",
    params(
        ("key" = String, Path, description = "Section key")
    ),
    responses(
        (status = 200, description = "Section written again by the AI", body = LessonPlan),
        (status = 409, description = "The section is already being processed", body = ErrorResponse),
        (status = 502, description = "The AI call failed; section left unchanged", body = ErrorResponse)
    )
)]
pub async fn regenerate_section(
    service: web::Data<LessonPlanService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let key = section_key(path)?;
    let plan = service.regenerate(key).await?;
    Ok(HttpResponse::Ok().json(plan))
}

#[utoipa::path(
    get,
    path = "/api/lesson-plan/sections/{key}/parsed",
    tag = "Lesson Plan",
    params(
        ("key" = String, Path, description = "Section key")
    ),
    responses(
        (status = 200, description = "Paragraph or numbered items", body = ParsedSection),
        (status = 404, description = "Unknown section or no lesson plan", body = ErrorResponse)
    )
)]
pub async fn get_parsed_section(
    service: web::Data<LessonPlanService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let key = section_key(path)?;
    Ok(HttpResponse::Ok().json(service.parsed_section(key)?))
}

#[utoipa::path(
    get,
    path = "/api/lesson-plan/preview",
    tag = "Lesson Plan",
    params(ThemeQuery),
    responses(
        (status = 200, description = "Editable HTML preview fragment", content_type = "text/html"),
        (status = 400, description = "Invalid theme colour", body = ErrorResponse),
        (status = 404, description = "No lesson plan yet", body = ErrorResponse)
    )
)]
pub async fn get_preview(
    service: web::Data<LessonPlanService>,
    query: web::Query<ThemeQuery>,
) -> Result<HttpResponse, ServiceError> {
    let html = service.preview(&theme(&query)?)?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

#[utoipa::path(
    get,
    path = "/api/lesson-plan/export/{format}",
    tag = "Lesson Plan",
    params(
        ("format" = String, Path, description = "docx, pdf or html"),
        ThemeQuery
    ),
    responses(
        (status = 200, description = "The rendered document as an attachment"),
        (status = 400, description = "Unsupported format or invalid theme", body = ErrorResponse),
        (status = 409, description = "An export in this format is already running", body = ErrorResponse),
        (status = 500, description = "Rendering failed", body = ErrorResponse)
    )
)]
pub async fn export_lesson_plan(
    service: web::Data<LessonPlanService>,
    path: web::Path<String>,
    query: web::Query<ThemeQuery>,
) -> Result<HttpResponse, ServiceError> {
    let format = path
        .into_inner()
        .parse::<ExportFormat>()
        .map_err(ServiceError::Validation)?;
    let document = service.export(format, theme(&query)?).await?;

    log::info!(
        "Exported {} ({} bytes)",
        document.filename,
        document.bytes.len()
    );
    Ok(HttpResponse::Ok()
        .content_type(document.content_type.as_str())
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", document.filename),
        ))
        .body(document.bytes))
}

#[utoipa::path(
    get,
    path = "/api/exports/status",
    tag = "Lesson Plan",
    responses(
        (status = 200, description = "Exports and AI section calls currently running", body = ExportStatus)
    )
)]
pub async fn get_export_status(service: web::Data<LessonPlanService>) -> HttpResponse {
    HttpResponse::Ok().json(ExportStatus {
        exports: service.active_exports(),
        sections: service.active_sections(),
    })
}

#[utoipa::path(
    get,
    path = "/api/themes",
    tag = "Lesson Plan",
    responses(
        (status = 200, description = "Header colour palette", body = Vec<ThemeOption>)
    )
)]
pub async fn list_themes() -> HttpResponse {
    let themes: Vec<ThemeOption> = THEME_COLORS
        .iter()
        .map(|(name, hex)| ThemeOption {
            name: name.to_string(),
            hex: hex.to_string(),
        })
        .collect();
    HttpResponse::Ok().json(themes)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/form-data")
            .route(web::get().to(get_form_data))
            .route(web::put().to(save_form_data)),
    )
    .service(
        web::resource("/lesson-plan")
            .route(web::get().to(get_lesson_plan))
            .route(web::delete().to(reset_lesson_plan)),
    )
    .service(web::resource("/lesson-plan/generate").route(web::post().to(generate_lesson_plan)))
    .service(web::resource("/lesson-plan/preview").route(web::get().to(get_preview)))
    .service(
        web::resource("/lesson-plan/export/{format}").route(web::get().to(export_lesson_plan)),
    )
    .service(web::resource("/lesson-plan/sections/{key}").route(web::put().to(update_section)))
    .service(
        web::resource("/lesson-plan/sections/{key}/refine").route(web::post().to(refine_section)),
    )
    .service(
        web::resource("/lesson-plan/sections/{key}/regenerate")
            .route(web::post().to(regenerate_section)),
    )
    .service(
        web::resource("/lesson-plan/sections/{key}/parsed")
            .route(web::get().to(get_parsed_section)),
    )
    .service(web::resource("/exports/status").route(web::get().to(get_export_status)))
    .service(web::resource("/themes").route(web::get().to(list_themes)));
}
