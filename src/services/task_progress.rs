use std::{collections::BTreeSet, sync::Arc};

use crate::{
    db::DocumentStore,
    errors::AppResult,
    models::domain::{metrics::mean, TaskDefinition, TaskGrade, TaskMetrics},
    repositories::TaskRepository,
};

const DEFAULT_MAX_SCORE: f64 = 100.0;

/// Percentage for a graded task; the grade's own `maxScore` wins over the catalog's.
pub fn grade_percent(grade: &TaskGrade, definition: Option<&TaskDefinition>) -> Option<f64> {
    let score = grade.score?;
    let max = grade
        .max_score
        .or_else(|| definition.and_then(|d| d.max_score))
        .filter(|m| *m > 0.0)
        .unwrap_or(DEFAULT_MAX_SCORE);
    Some((score / max * 100.0).clamp(0.0, 100.0))
}

pub fn task_metrics(catalog: &[TaskDefinition], grades: &[TaskGrade]) -> TaskMetrics {
    let mut task_ids: BTreeSet<&str> = catalog.iter().map(|t| t.id.as_str()).collect();

    let percents: Vec<f64> = grades
        .iter()
        .filter_map(|grade| {
            if task_ids.insert(grade.task_id.as_str()) {
                log::warn!("Task '{}' has a submission but is not in the catalog", grade.task_id);
            }
            let definition = catalog.iter().find(|t| t.id == grade.task_id);
            grade_percent(grade, definition)
        })
        .collect();

    TaskMetrics {
        tasks_graded: percents.len() as u32,
        tasks_total: task_ids.len() as u32,
        avg_task_score_percent: mean(percents).unwrap_or(0.0),
    }
}

pub struct TaskProgressExtractor {
    repository: TaskRepository,
}

impl TaskProgressExtractor {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            repository: TaskRepository::new(store),
        }
    }

    pub async fn catalog(&self) -> AppResult<Vec<TaskDefinition>> {
        self.repository.catalog().await
    }

    pub async fn extract(&self, student_id: &str, catalog: &[TaskDefinition]) -> AppResult<TaskMetrics> {
        let grades = self.repository.grades(student_id).await?;
        Ok(task_metrics(catalog, &grades))
    }
}
