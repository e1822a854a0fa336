use std::sync::Arc;

use crate::{
    db::{read_snapshot, DocumentStore, Snapshot, StorePath},
    errors::AppResult,
    models::domain::{
        record::from_record, AssessmentAttempt, AssessmentSummary, LessonSlot, PageRecords,
    },
};

/// Reads `lmsAssessments/{studentId}/{slot}/{pageId}/{summary,attempts}`.
pub struct LmsRepository {
    store: Arc<dyn DocumentStore>,
}

impl LmsRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn page_path(student_id: &str, slot: LessonSlot, page_id: &str) -> StorePath {
        StorePath::root()
            .child("lmsAssessments")
            .child(student_id)
            .child(slot)
            .child(page_id)
    }

    pub async fn page_records(
        &self,
        student_id: &str,
        slot: LessonSlot,
        page_id: &str,
    ) -> AppResult<PageRecords> {
        let path = Self::page_path(student_id, slot, page_id);
        let snapshot = read_snapshot(self.store.as_ref(), &path).await?;

        let summary = snapshot
            .child("summary")
            .map(|v| from_record::<AssessmentSummary>(&format!("{}/summary", path), v));

        let attempts = Snapshot::new(snapshot.child("attempts").cloned())
            .children()
            .into_iter()
            .map(|(key, value)| {
                let mut attempt =
                    from_record::<AssessmentAttempt>(&format!("{}/attempts/{}", path, key), value);
                if attempt.attempt_number.is_none() {
                    log::warn!("Attempt {}/attempts/{} has no attemptNumber", path, key);
                }
                attempt.id = key;
                attempt
            })
            .collect();

        Ok(PageRecords { summary, attempts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_page_records_reads_summary_and_attempts() {
        let store = MemoryStore::from_value(json!({
            "lmsAssessments": { "s1": { "1": { "quiz": {
                "summary": { "bestScore": 4, "maxScore": 5 },
                "attempts": {
                    "-a": { "attemptNumber": 1, "score": 2 },
                    "-b": { "attemptNumber": "2", "score": 4 }
                }
            } } } }
        }));
        let repository = LmsRepository::new(Arc::new(store));

        let slot = LessonSlot::new(1, 6).unwrap();
        let records = repository.page_records("s1", slot, "quiz").await.unwrap();
        assert_eq!(records.summary.unwrap().best_score, Some(4.0));
        assert_eq!(records.attempts.len(), 2);
        assert_eq!(records.attempts[1].id, "-b");
        assert_eq!(records.attempts[1].attempt_number, Some(2));
    }

    #[tokio::test]
    async fn test_missing_page_is_empty() {
        let repository = LmsRepository::new(Arc::new(MemoryStore::new()));
        let slot = LessonSlot::new(2, 6).unwrap();
        let records = repository.page_records("s1", slot, "quiz").await.unwrap();
        assert_eq!(records, PageRecords::default());
    }
}
