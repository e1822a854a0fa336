use serde::Serialize;

use crate::{errors::AppResult, models::domain::GradebookRow};

#[derive(Serialize)]
struct GradebookCsvRow<'a> {
    student_id: &'a str,
    name: &'a str,
    email: &'a str,
    lessons_completed: u32,
    lessons_total: u32,
    avg_progress_percent: String,
    assessments_completed: u32,
    assessments_total: u32,
    avg_assessment_score_percent: String,
    quizzes_taken: u32,
    quizzes_total: u32,
    avg_quiz_score: String,
    simulations_passed: u32,
    simulations_total: u32,
    tasks_graded: u32,
    tasks_total: u32,
    avg_task_score_percent: String,
    status: &'static str,
}

impl<'a> From<&'a GradebookRow> for GradebookCsvRow<'a> {
    fn from(row: &'a GradebookRow) -> Self {
        Self {
            student_id: &row.student.id,
            name: row.student.label(),
            email: row.student.email.as_deref().unwrap_or(""),
            lessons_completed: row.lms.lessons_completed,
            lessons_total: row.lms.lessons_total,
            avg_progress_percent: format!("{:.1}", row.lms.avg_progress_percent),
            assessments_completed: row.lms.assessments_completed,
            assessments_total: row.lms.assessments_total,
            avg_assessment_score_percent: format!("{:.1}", row.lms.avg_assessment_score_percent),
            quizzes_taken: row.game.quizzes_taken,
            quizzes_total: row.game.quizzes_total,
            avg_quiz_score: format!("{:.1}", row.game.avg_quiz_score),
            simulations_passed: row.game.simulations_passed,
            simulations_total: row.game.simulations_total,
            tasks_graded: row.tasks.tasks_graded,
            tasks_total: row.tasks.tasks_total,
            avg_task_score_percent: format!("{:.1}", row.tasks.avg_task_score_percent),
            status: row.status.as_str(),
        }
    }
}

/// Gradebook as CSV with a header row, one line per student in the given order.
pub fn gradebook_csv(rows: &[GradebookRow]) -> AppResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if rows.is_empty() {
        // serde only emits headers alongside the first record
        writer.write_record([
            "student_id",
            "name",
            "email",
            "lessons_completed",
            "lessons_total",
            "avg_progress_percent",
            "assessments_completed",
            "assessments_total",
            "avg_assessment_score_percent",
            "quizzes_taken",
            "quizzes_total",
            "avg_quiz_score",
            "simulations_passed",
            "simulations_total",
            "tasks_graded",
            "tasks_total",
            "avg_task_score_percent",
            "status",
        ])?;
    }
    for row in rows {
        writer.serialize(GradebookCsvRow::from(row))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| crate::errors::AppError::InternalError(format!("CSV flush failed: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| crate::errors::AppError::InternalError(format!("CSV is not UTF-8: {}", e)))
}
