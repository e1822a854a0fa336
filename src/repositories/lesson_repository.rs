use std::sync::Arc;

use serde_json::Value;

use crate::{
    db::{read_snapshot, DocumentStore, Snapshot, StorePath},
    errors::AppResult,
    models::domain::{
        record::{parse_bool, parse_f64},
        Lesson, LessonPage, LessonSlot,
    },
};

/// Reads the authored lesson catalog under `lessons/{slot}`.
pub struct LessonRepository {
    store: Arc<dyn DocumentStore>,
}

impl LessonRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Published lessons with a slot in `1..=slot_count`, ascending by slot.
    pub async fn published_lessons(&self, slot_count: u32) -> AppResult<Vec<Lesson>> {
        let snapshot = read_snapshot(self.store.as_ref(), &StorePath::root().child("lessons")).await?;

        let mut lessons: Vec<Lesson> = snapshot
            .children()
            .into_iter()
            .filter_map(|(key, value)| {
                let slot = key
                    .parse::<u32>()
                    .ok()
                    .and_then(|s| LessonSlot::new(s, slot_count).ok());
                match slot {
                    Some(slot) => parse_lesson(slot, value),
                    None => {
                        log::warn!("Ignoring lesson stored under out-of-range key '{}'", key);
                        None
                    }
                }
            })
            .collect();

        lessons.sort_by_key(|l| l.slot);
        Ok(lessons)
    }
}

/// Lessons without a `published` flag are treated as published.
fn parse_lesson(slot: LessonSlot, value: &Value) -> Option<Lesson> {
    let published = value.get("published").and_then(parse_bool).unwrap_or(true);
    if !published {
        return None;
    }

    let title = value
        .get("title")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Lesson {}", slot));

    let pages_snapshot = Snapshot::new(value.get("pages").cloned());
    let mut pages: Vec<LessonPage> = pages_snapshot
        .children()
        .into_iter()
        .map(|(id, page)| LessonPage {
            title: page
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or(&id)
                .to_string(),
            order: page
                .get("order")
                .and_then(parse_f64)
                .map(|o| o as i64)
                .unwrap_or(i64::MAX),
            id,
        })
        .collect();
    pages.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));

    Some(Lesson { slot, title, pages })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_published_lessons_filters_and_sorts() {
        let store = MemoryStore::from_value(json!({
            "lessons": {
                "3": { "title": "Loops", "pages": { "p2": { "order": 2 }, "p1": { "order": 1 } } },
                "1": { "title": "Intro", "pages": { "welcome": { "title": "Welcome" } } },
                "2": { "title": "Draft", "published": false },
                "9": { "title": "Out of range" }
            }
        }));
        let repository = LessonRepository::new(Arc::new(store));

        let lessons = repository.published_lessons(6).await.unwrap();
        let slots: Vec<u32> = lessons.iter().map(|l| l.slot.get()).collect();
        assert_eq!(slots, vec![1, 3]);

        let page_ids: Vec<&str> = lessons[1].pages.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(page_ids, vec!["p1", "p2"]);
        assert_eq!(lessons[0].pages[0].title, "Welcome");
    }

    #[tokio::test]
    async fn test_array_encoded_lessons() {
        let store = MemoryStore::from_value(json!({
            "lessons": [null, { "title": "Intro" }, { "title": "Vars" }]
        }));
        let repository = LessonRepository::new(Arc::new(store));

        let lessons = repository.published_lessons(6).await.unwrap();
        assert_eq!(lessons.len(), 2);
        assert_eq!(lessons[1].title, "Vars");
        assert!(lessons[1].pages.is_empty());
    }

    #[tokio::test]
    async fn test_no_lessons() {
        let repository = LessonRepository::new(Arc::new(MemoryStore::new()));
        assert!(repository.published_lessons(6).await.unwrap().is_empty());
    }
}
