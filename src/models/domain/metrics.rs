use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::domain::lesson::LessonSlot;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonProgress {
    pub slot: LessonSlot,
    pub pages_completed: u32,
    pub pages_total: u32,
    pub completed: bool,
}

impl LessonProgress {
    /// Share of pages with a summary. A lesson without pages has no progress.
    pub fn ratio(&self) -> f64 {
        if self.pages_total == 0 {
            0.0
        } else {
            self.pages_completed as f64 / self.pages_total as f64
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LmsMetrics {
    pub lessons_completed: u32,
    pub lessons_total: u32,
    pub avg_progress_percent: f64,
    pub assessments_completed: u32,
    pub assessments_total: u32,
    pub avg_assessment_score_percent: f64,
    pub lessons: Vec<LessonProgress>,
}

impl LmsMetrics {
    pub fn has_activity(&self) -> bool {
        self.assessments_completed > 0
    }

    pub fn completed_lesson(&self, slot: LessonSlot) -> bool {
        self.lessons.iter().any(|l| l.slot == slot && l.completed)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMetrics {
    pub quizzes_taken: u32,
    pub quizzes_total: u32,
    /// 0-10 scale, over attempted quizzes only.
    pub avg_quiz_score: f64,
    pub simulations_passed: u32,
    /// Simulations with at least one attempt, passed or not.
    pub simulations_attempted: u32,
    pub simulations_total: u32,
    /// Mean quiz score per lesson slot, only for lessons with an attempted quiz.
    pub lesson_quiz_scores: BTreeMap<u32, f64>,
}

impl GameMetrics {
    pub fn has_activity(&self) -> bool {
        self.quizzes_taken > 0 || self.simulations_attempted > 0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskMetrics {
    pub tasks_graded: u32,
    pub tasks_total: u32,
    pub avg_task_score_percent: f64,
}

impl TaskMetrics {
    pub fn has_activity(&self) -> bool {
        self.tasks_graded > 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    OnTrack,
    AtRisk,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::OnTrack => "ON_TRACK",
            Status::AtRisk => "AT_RISK",
        }
    }
}

/// Arithmetic mean, `None` for an empty input.
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(vec![]), None);
        assert_eq!(mean(vec![2.0, 4.0]), Some(3.0));
        assert_eq!(mean(vec![0.0]), Some(0.0));
    }

    #[test]
    fn test_status_serializes_screaming_case() {
        assert_eq!(serde_json::to_string(&Status::AtRisk).unwrap(), "\"AT_RISK\"");
        assert_eq!(Status::OnTrack.as_str(), "ON_TRACK");
    }

    #[test]
    fn test_empty_lesson_has_zero_ratio() {
        let progress = LessonProgress {
            slot: LessonSlot::new(1, 6).unwrap(),
            pages_completed: 0,
            pages_total: 0,
            completed: false,
        };
        assert_eq!(progress.ratio(), 0.0);
    }
}
