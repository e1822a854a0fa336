use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::domain::record::{lenient_bool, lenient_f64, lenient_timestamp, lenient_u32};

/// One raw scored submission for a lesson page. Never mutated once stored.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentAttempt {
    /// Store key of the attempt node.
    #[serde(default, skip_deserializing)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub attempt_number: Option<u32>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<i64>,
}

impl AssessmentAttempt {
    /// Attempts stored without a number compare as attempt 0.
    pub fn number(&self) -> u32 {
        self.attempt_number.unwrap_or(0)
    }
}

/// Derived per-page record written whenever a new attempt is recorded.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentSummary {
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub best_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub latest_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u32", skip_serializing_if = "Option::is_none")]
    pub attempt_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient_bool", skip_serializing_if = "Option::is_none")]
    pub passed: Option<bool>,
    #[serde(default, deserialize_with = "lenient_timestamp", skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    /// Fields this service does not interpret, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AssessmentSummary {
    /// Recorded score as a percentage. A `maxScore` that is missing or not
    /// positive means the score is already a percentage.
    pub fn score_percent(&self) -> Option<f64> {
        let score = self.best_score.or(self.latest_score)?;
        let percent = match self.max_score {
            Some(max) if max > 0.0 => score / max * 100.0,
            _ => score,
        };
        Some(percent.clamp(0.0, 100.0))
    }
}

/// Raw stored records for one (student, lesson, page).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageRecords {
    pub summary: Option<AssessmentSummary>,
    /// In store key order.
    pub attempts: Vec<AssessmentAttempt>,
}

/// What a student sees for one assessment page.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageHistory {
    pub summary: Option<AssessmentSummary>,
    pub last_attempt: Option<AssessmentAttempt>,
}

impl PageHistory {
    pub fn not_attempted() -> Self {
        Self::default()
    }

    pub fn is_attempted(&self) -> bool {
        self.summary.is_some()
    }
}
