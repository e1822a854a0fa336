use serde::Serialize;

use crate::models::domain::{
    lesson::LessonSlot,
    metrics::{GameMetrics, LmsMetrics, Status, TaskMetrics},
    student::StudentIdentity,
};

/// One student's combined progress across the three domains.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradebookRow {
    pub student: StudentIdentity,
    pub lms: LmsMetrics,
    pub game: GameMetrics,
    pub tasks: TaskMetrics,
    pub status: Status,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPerformance {
    pub slot: LessonSlot,
    pub title: String,
    pub avg_quiz_score: f64,
    /// Percentage in [0, 100], unrounded.
    pub completion_rate: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSummary {
    pub total_students: u32,
    pub avg_quiz_score: f64,
    pub avg_lessons_completed: f64,
    pub total_simulations_passed: u32,
    pub at_risk_count: u32,
    pub lesson_performance: Vec<LessonPerformance>,
}

/// A student left out of a class aggregation because their records could not be read.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailableStudent {
    pub student_id: String,
    pub reason: String,
}

/// Rows for every student whose records were readable, plus the ones that were not.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassGradebook {
    pub rows: Vec<GradebookRow>,
    pub unavailable: Vec<UnavailableStudent>,
}
