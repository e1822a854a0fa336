use serde::Deserialize;

use crate::models::domain::record::{lenient_f64, lenient_string, lenient_timestamp, lenient_u32};

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinition {
    #[serde(default, skip_deserializing)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub lesson_slot: Option<u32>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub max_score: Option<f64>,
}

/// A student's submission for one task. `score` is set once an instructor grades it.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskGrade {
    #[serde(default, skip_deserializing)]
    pub task_id: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub max_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub submitted_at: Option<i64>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub graded_at: Option<i64>,
}

impl TaskGrade {
    pub fn is_graded(&self) -> bool {
        self.score.is_some()
    }
}
