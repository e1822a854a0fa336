use std::sync::Arc;

use crate::{
    db::{read_snapshot, DocumentStore, StorePath},
    errors::AppResult,
    models::domain::{record::from_record, TaskDefinition, TaskGrade},
};

/// Reads `taskCatalog` and the per-student grades under `taskGrades/{studentId}`.
pub struct TaskRepository {
    store: Arc<dyn DocumentStore>,
}

impl TaskRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn catalog(&self) -> AppResult<Vec<TaskDefinition>> {
        let path = StorePath::root().child("taskCatalog");
        let snapshot = read_snapshot(self.store.as_ref(), &path).await?;

        Ok(snapshot
            .children()
            .into_iter()
            .map(|(id, value)| {
                let mut task = from_record::<TaskDefinition>(&format!("{}/{}", path, id), value);
                task.id = id;
                task
            })
            .collect())
    }

    pub async fn grades(&self, student_id: &str) -> AppResult<Vec<TaskGrade>> {
        let path = StorePath::root().child("taskGrades").child(student_id);
        let snapshot = read_snapshot(self.store.as_ref(), &path).await?;

        Ok(snapshot
            .children()
            .into_iter()
            .map(|(task_id, value)| {
                let mut grade = from_record::<TaskGrade>(&format!("{}/{}", path, task_id), value);
                grade.task_id = task_id;
                grade
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_catalog_and_grades() {
        let store = MemoryStore::from_value(json!({
            "taskCatalog": { "t1": { "title": "Essay", "maxScore": 20 }, "t2": { "title": "Lab" } },
            "taskGrades": { "s1": {
                "t1": { "score": 15, "submittedAt": "2024-03-01T10:00:00Z" },
                "t2": { "submittedAt": 1709287200000i64 }
            } }
        }));
        let repository = TaskRepository::new(Arc::new(store));

        let catalog = repository.catalog().await.unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].max_score, Some(20.0));

        let grades = repository.grades("s1").await.unwrap();
        assert_eq!(grades.len(), 2);
        assert!(grades[0].is_graded());
        assert!(!grades[1].is_graded());
        assert_eq!(grades[1].task_id, "t2");
    }
}
