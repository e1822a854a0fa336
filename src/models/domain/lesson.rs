use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// 1-based position of a lesson in the course sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LessonSlot(u32);

impl LessonSlot {
    pub fn new(slot: u32, slot_count: u32) -> AppResult<Self> {
        if slot == 0 || slot > slot_count {
            return Err(AppError::ValidationError(format!(
                "Lesson slot must be between 1 and {}, got {}",
                slot_count, slot
            )));
        }
        Ok(Self(slot))
    }

    /// Parses a slot taken from a request path.
    pub fn parse(raw: &str, slot_count: u32) -> AppResult<Self> {
        let slot = raw.trim().parse::<u32>().map_err(|_| {
            AppError::ValidationError(format!("Lesson slot '{}' is not a positive integer", raw))
        })?;
        Self::new(slot, slot_count)
    }

    pub fn all(slot_count: u32) -> impl Iterator<Item = LessonSlot> {
        (1..=slot_count).map(LessonSlot)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for LessonSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPage {
    pub id: String,
    pub title: String,
    pub order: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub slot: LessonSlot,
    pub title: String,
    pub pages: Vec<LessonPage>,
}

impl Lesson {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
