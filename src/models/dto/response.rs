use serde::Serialize;

use crate::models::domain::{
    AssessmentAttempt, AssessmentSummary, ClassSummary, GradebookRow, LessonPerformance,
    LessonSlot, PageHistory, UnavailableStudent,
};

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentHistoryResponse {
    pub success: bool,
    pub summary: Option<AssessmentSummary>,
    pub last_attempt: Option<AssessmentAttempt>,
}

impl From<PageHistory> for AssessmentHistoryResponse {
    fn from(history: PageHistory) -> Self {
        Self {
            success: true,
            summary: history.summary,
            last_attempt: history.last_attempt,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProgressResponse {
    pub success: bool,
    pub student: GradebookRow,
}

impl From<GradebookRow> for StudentProgressResponse {
    fn from(student: GradebookRow) -> Self {
        Self {
            success: true,
            student,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassProgressResponse {
    pub success: bool,
    pub class_id: String,
    pub class_name: String,
    pub students: Vec<GradebookRow>,
    pub unavailable: Vec<UnavailableStudent>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtRiskResponse {
    pub success: bool,
    pub class_id: String,
    pub students: Vec<GradebookRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPerformanceDto {
    pub slot: LessonSlot,
    pub title: String,
    pub avg_quiz_score: f64,
    pub completion_rate: f64,
}

impl From<&LessonPerformance> for LessonPerformanceDto {
    fn from(lesson: &LessonPerformance) -> Self {
        Self {
            slot: lesson.slot,
            title: lesson.title.clone(),
            avg_quiz_score: round_to(lesson.avg_quiz_score, 1),
            completion_rate: lesson.completion_rate.round(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSummaryDto {
    pub total_students: u32,
    pub avg_quiz_score: f64,
    pub avg_lessons_completed: f64,
    pub total_simulations_passed: u32,
    pub at_risk_count: u32,
}

impl From<&ClassSummary> for ClassSummaryDto {
    fn from(summary: &ClassSummary) -> Self {
        Self {
            total_students: summary.total_students,
            avg_quiz_score: round_to(summary.avg_quiz_score, 1),
            avg_lessons_completed: round_to(summary.avg_lessons_completed, 1),
            total_simulations_passed: summary.total_simulations_passed,
            at_risk_count: summary.at_risk_count,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub success: bool,
    pub class_id: String,
    pub class_name: String,
    pub summary: ClassSummaryDto,
    pub lesson_performance: Vec<LessonPerformanceDto>,
}

impl DashboardResponse {
    pub fn new(class_id: String, class_name: String, summary: &ClassSummary) -> Self {
        Self {
            success: true,
            class_id,
            class_name,
            summary: summary.into(),
            lesson_performance: summary.lesson_performance.iter().map(Into::into).collect(),
        }
    }
}
