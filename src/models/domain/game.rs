use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::domain::record::{lenient_bool, lenient_f64, lenient_string, lenient_timestamp, lenient_u32};

/// Quiz or simulation as published in the game catalog.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    #[serde(default, skip_deserializing)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub lesson_slot: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GameCatalog {
    pub quizzes: Vec<CatalogItem>,
    pub simulations: Vec<CatalogItem>,
}

impl GameCatalog {
    pub fn quiz_lesson(&self, quiz_id: &str) -> Option<u32> {
        self.quizzes
            .iter()
            .find(|q| q.id == quiz_id)
            .and_then(|q| q.lesson_slot)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    #[serde(default, skip_deserializing)]
    pub id: String,
    /// 0-10 scale.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationAttempt {
    #[serde(default, skip_deserializing)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub outcome: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub passed: Option<bool>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<i64>,
}

impl SimulationAttempt {
    pub fn is_pass(&self) -> bool {
        self.passed.unwrap_or(false)
            || self
                .outcome
                .as_deref()
                .is_some_and(|o| o.trim().eq_ignore_ascii_case("pass"))
    }
}

/// One student's quiz and simulation attempts keyed by catalog id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GameRecords {
    pub quizzes: BTreeMap<String, Vec<QuizAttempt>>,
    pub simulations: BTreeMap<String, Vec<SimulationAttempt>>,
}
