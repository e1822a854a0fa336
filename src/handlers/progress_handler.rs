use actix_web::{get, http::header, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::{require_self_or_staff, require_staff, require_student, resolve_class_id, AuthenticatedUser},
    db::is_valid_key,
    errors::AppError,
    models::{
        domain::{LessonSlot, Status},
        dto::{
            AssessmentHistoryResponse, AtRiskResponse, ClassProgressResponse, ClassQuery,
            StudentProgressResponse, StudentQuery,
        },
    },
    services::export::gradebook_csv,
};

fn require_key(kind: &str, value: &str) -> Result<(), AppError> {
    if is_valid_key(value) {
        Ok(())
    } else {
        Err(AppError::ValidationError(format!("Invalid {} '{}'", kind, value)))
    }
}

#[get("/lessons/{slot}/pages/{page_id}/assessment-history")]
async fn get_assessment_history(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    query: web::Query<StudentQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (raw_slot, page_id) = path.into_inner();
    let slot = LessonSlot::parse(&raw_slot, state.progress_service.slot_count())?;
    require_key("page id", &page_id)?;
    query.validate()?;

    let student_id = query
        .into_inner()
        .student_id
        .unwrap_or_else(|| auth.0.sub.clone());
    require_self_or_staff(&auth.0, &student_id)?;

    let history = state
        .progress_service
        .assessment_history(&student_id, slot, &page_id)
        .await?;
    Ok(HttpResponse::Ok().json(AssessmentHistoryResponse::from(history)))
}

#[get("/me/progress")]
async fn get_my_progress(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_student(&auth.0)?;

    let row = state.progress_service.student_row(&auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(StudentProgressResponse::from(row)))
}

#[get("/class/students/progress")]
async fn get_class_progress(
    state: web::Data<AppState>,
    query: web::Query<ClassQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    query.validate()?;
    let class_id = resolve_class_id(&auth.0, query.class_id.as_deref())?;

    let report = state.progress_service.class_report(&class_id).await?;
    log::info!(
        "Class '{}' progress: {} rows, {} unavailable",
        class_id,
        report.gradebook.rows.len(),
        report.gradebook.unavailable.len()
    );

    Ok(HttpResponse::Ok().json(ClassProgressResponse {
        success: true,
        class_id,
        class_name: report.roster.name,
        students: report.gradebook.rows,
        unavailable: report.gradebook.unavailable,
    }))
}

#[get("/class/students/at-risk")]
async fn get_at_risk_students(
    state: web::Data<AppState>,
    query: web::Query<ClassQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    query.validate()?;
    let class_id = resolve_class_id(&auth.0, query.class_id.as_deref())?;

    let report = state.progress_service.class_report(&class_id).await?;
    let students = report
        .gradebook
        .rows
        .into_iter()
        .filter(|row| row.status == Status::AtRisk)
        .collect();

    Ok(HttpResponse::Ok().json(AtRiskResponse {
        success: true,
        class_id,
        students,
    }))
}

#[get("/class/students/{student_id}/progress")]
async fn get_student_progress(
    state: web::Data<AppState>,
    student_id: web::Path<String>,
    query: web::Query<ClassQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_staff(&auth.0)?;
    require_key("student id", &student_id)?;
    query.validate()?;
    let class_id = resolve_class_id(&auth.0, query.class_id.as_deref())?;

    let row = state
        .progress_service
        .class_student_row(&class_id, &student_id)
        .await?;
    Ok(HttpResponse::Ok().json(StudentProgressResponse::from(row)))
}

#[get("/class/gradebook.csv")]
async fn get_gradebook_csv(
    state: web::Data<AppState>,
    query: web::Query<ClassQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    query.validate()?;
    let class_id = resolve_class_id(&auth.0, query.class_id.as_deref())?;

    let report = state.progress_service.class_report(&class_id).await?;
    let csv = gradebook_csv(&report.gradebook.rows)?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}-gradebook.csv\"", class_id),
        ))
        .body(csv))
}
