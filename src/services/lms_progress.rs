use std::{collections::BTreeMap, sync::Arc};

use futures::future::try_join_all;

use crate::{
    db::DocumentStore,
    errors::AppResult,
    models::domain::{
        metrics::mean, AssessmentAttempt, Lesson, LessonProgress, LessonSlot, LmsMetrics,
        PageHistory, PageRecords,
    },
    repositories::LmsRepository,
};

pub type PageKey = (LessonSlot, String);

/// The attempt with the highest `attemptNumber`. Ties go to the later
/// timestamp, then to the greater store key; a missing timestamp sorts first.
pub fn select_last_attempt(attempts: &[AssessmentAttempt]) -> Option<&AssessmentAttempt> {
    attempts.iter().max_by(|a, b| {
        a.number()
            .cmp(&b.number())
            .then(a.timestamp.cmp(&b.timestamp))
            .then_with(|| a.id.cmp(&b.id))
    })
}

/// A page counts as attempted only when both a summary and at least one attempt are stored.
pub fn page_history(records: PageRecords) -> PageHistory {
    let last_attempt = select_last_attempt(&records.attempts).cloned();
    match (records.summary, last_attempt) {
        (Some(summary), Some(last_attempt)) => PageHistory {
            summary: Some(summary),
            last_attempt: Some(last_attempt),
        },
        _ => PageHistory::not_attempted(),
    }
}

pub fn lms_metrics(lessons: &[Lesson], histories: &BTreeMap<PageKey, PageHistory>) -> LmsMetrics {
    let mut metrics = LmsMetrics {
        lessons_total: lessons.len() as u32,
        ..LmsMetrics::default()
    };
    let mut scores = Vec::new();

    for lesson in lessons {
        let mut pages_completed = 0u32;
        for page in &lesson.pages {
            let summary = histories
                .get(&(lesson.slot, page.id.clone()))
                .and_then(|h| h.summary.as_ref());
            if let Some(summary) = summary {
                pages_completed += 1;
                if let Some(percent) = summary.score_percent() {
                    scores.push(percent);
                }
            }
        }

        let pages_total = lesson.page_count() as u32;
        let completed = pages_total > 0 && pages_completed == pages_total;
        if completed {
            metrics.lessons_completed += 1;
        }
        metrics.assessments_completed += pages_completed;
        metrics.assessments_total += pages_total;
        metrics.lessons.push(LessonProgress {
            slot: lesson.slot,
            pages_completed,
            pages_total,
            completed,
        });
    }

    metrics.avg_progress_percent =
        mean(metrics.lessons.iter().map(|l| l.ratio() * 100.0)).unwrap_or(0.0);
    metrics.avg_assessment_score_percent = mean(scores).unwrap_or(0.0);
    metrics
}

/// Reads a student's assessment history and reduces it to [`LmsMetrics`].
pub struct LmsProgressExtractor {
    repository: LmsRepository,
}

impl LmsProgressExtractor {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            repository: LmsRepository::new(store),
        }
    }

    pub async fn page_history(
        &self,
        student_id: &str,
        slot: LessonSlot,
        page_id: &str,
    ) -> AppResult<PageHistory> {
        let records = self.repository.page_records(student_id, slot, page_id).await?;
        Ok(page_history(records))
    }

    /// Every page of every lesson is read concurrently.
    pub async fn histories(
        &self,
        student_id: &str,
        lessons: &[Lesson],
    ) -> AppResult<BTreeMap<PageKey, PageHistory>> {
        let reads = lessons.iter().flat_map(|lesson| {
            lesson.pages.iter().map(move |page| async move {
                let history = self.page_history(student_id, lesson.slot, &page.id).await?;
                Ok::<_, crate::errors::AppError>(((lesson.slot, page.id.clone()), history))
            })
        });

        Ok(try_join_all(reads).await?.into_iter().collect())
    }

    pub async fn extract(&self, student_id: &str, lessons: &[Lesson]) -> AppResult<LmsMetrics> {
        let histories = self.histories(student_id, lessons).await?;
        Ok(lms_metrics(lessons, &histories))
    }
}
