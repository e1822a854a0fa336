use actix_web::{get, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::{resolve_class_id, AuthenticatedUser},
    errors::AppError,
    models::dto::{ClassQuery, DashboardResponse},
};

/// Class summary plus one performance row per published lesson.
#[get("/dashboard")]
async fn get_dashboard(
    state: web::Data<AppState>,
    query: web::Query<ClassQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    query.validate()?;
    let class_id = resolve_class_id(&auth.0, query.class_id.as_deref())?;

    let report = state.progress_service.class_report(&class_id).await?;
    let summary = report.summary();
    log::debug!(
        "Dashboard for '{}': {} students, {} at risk",
        class_id,
        summary.total_students,
        summary.at_risk_count
    );

    Ok(HttpResponse::Ok().json(DashboardResponse::new(
        class_id,
        report.roster.name,
        &summary,
    )))
}
