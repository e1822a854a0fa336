use std::sync::Arc;

use futures::future::join_all;

use crate::{
    config::Config,
    db::DocumentStore,
    errors::{AppError, AppResult},
    models::domain::{
        ClassGradebook, ClassRoster, ClassSummary, GameCatalog, GradebookRow, Lesson, LessonSlot,
        PageHistory, TaskDefinition, UnavailableStudent,
    },
    repositories::{LessonRepository, RosterRepository},
    services::{
        class_summary::summarize_class,
        game_progress::GameProgressExtractor,
        gradebook_service::{build_row, RiskPolicy},
        lms_progress::LmsProgressExtractor,
        task_progress::TaskProgressExtractor,
    },
};

/// Course-wide data every student's row is computed against.
struct CourseSnapshot {
    lessons: Vec<Lesson>,
    game_catalog: GameCatalog,
    task_catalog: Vec<TaskDefinition>,
}

pub struct ClassReport {
    pub roster: ClassRoster,
    pub lessons: Vec<Lesson>,
    pub gradebook: ClassGradebook,
}

impl ClassReport {
    pub fn summary(&self) -> ClassSummary {
        summarize_class(&self.gradebook.rows, &self.lessons)
    }
}

/// Reads a snapshot of the store and turns it into gradebook rows and class summaries.
/// Nothing is cached; every call recomputes from the store.
pub struct ProgressService {
    lessons: LessonRepository,
    roster: RosterRepository,
    lms: LmsProgressExtractor,
    game: GameProgressExtractor,
    tasks: TaskProgressExtractor,
    policy: Arc<dyn RiskPolicy>,
    slot_count: u32,
}

impl ProgressService {
    pub fn new(store: Arc<dyn DocumentStore>, policy: Arc<dyn RiskPolicy>, config: &Config) -> Self {
        Self {
            lessons: LessonRepository::new(store.clone()),
            roster: RosterRepository::new(store.clone()),
            lms: LmsProgressExtractor::new(store.clone()),
            game: GameProgressExtractor::new(store.clone(), config.quiz_score_policy),
            tasks: TaskProgressExtractor::new(store),
            policy,
            slot_count: config.lesson_slot_count,
        }
    }

    pub fn slot_count(&self) -> u32 {
        self.slot_count
    }

    pub async fn assessment_history(
        &self,
        student_id: &str,
        slot: LessonSlot,
        page_id: &str,
    ) -> AppResult<PageHistory> {
        self.lms.page_history(student_id, slot, page_id).await
    }

    async fn course(&self) -> AppResult<CourseSnapshot> {
        let (lessons, game_catalog, task_catalog) = futures::try_join!(
            self.lessons.published_lessons(self.slot_count),
            self.game.catalog(),
            self.tasks.catalog(),
        )?;
        Ok(CourseSnapshot {
            lessons,
            game_catalog,
            task_catalog,
        })
    }

    async fn row_for(&self, student_id: &str, course: &CourseSnapshot) -> AppResult<GradebookRow> {
        let (student, lms, game, tasks) = futures::try_join!(
            self.roster.find_student(student_id),
            self.lms.extract(student_id, &course.lessons),
            self.game.extract(student_id, &course.game_catalog),
            self.tasks.extract(student_id, &course.task_catalog),
        )?;
        Ok(build_row(student, lms, game, tasks, self.policy.as_ref()))
    }

    pub async fn student_row(&self, student_id: &str) -> AppResult<GradebookRow> {
        let course = self.course().await?;
        self.row_for(student_id, &course).await
    }

    pub async fn roster(&self, class_id: &str) -> AppResult<ClassRoster> {
        self.roster
            .find_class(class_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Class '{}' not found", class_id)))
    }

    /// Row for one student of a class; students outside the roster are not found.
    pub async fn class_student_row(&self, class_id: &str, student_id: &str) -> AppResult<GradebookRow> {
        let roster = self.roster(class_id).await?;
        if !roster.student_ids.iter().any(|id| id == student_id) {
            return Err(AppError::NotFound(format!(
                "Student '{}' is not enrolled in class '{}'",
                student_id, class_id
            )));
        }
        self.student_row(student_id).await
    }

    /// Rows in roster order. A student whose records cannot be read is listed
    /// under `unavailable` instead of being reported with zeroed metrics.
    pub async fn class_report(&self, class_id: &str) -> AppResult<ClassReport> {
        let (roster, course) = futures::try_join!(self.roster(class_id), self.course())?;
        log::debug!(
            "Aggregating {} students of class '{}' over {} lessons",
            roster.student_ids.len(),
            class_id,
            course.lessons.len()
        );

        let results = join_all(
            roster
                .student_ids
                .iter()
                .map(|student_id| self.row_for(student_id, &course)),
        )
        .await;

        let mut gradebook = ClassGradebook::default();
        for (student_id, result) in roster.student_ids.iter().zip(results) {
            match result {
                Ok(row) => gradebook.rows.push(row),
                Err(err) => {
                    log::error!("Excluding student '{}' from class '{}': {}", student_id, class_id, err);
                    gradebook.unavailable.push(UnavailableStudent {
                        student_id: student_id.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        Ok(ClassReport {
            roster,
            lessons: course.lessons,
            gradebook,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{memory::lookup, MockDocumentStore, StorePath},
        models::domain::Status,
        services::gradebook_service::ThresholdRiskPolicy,
        test_utils::fixtures,
    };
    use serde_json::json;

    fn service(store: Arc<dyn DocumentStore>) -> ProgressService {
        ProgressService::new(
            store,
            Arc::new(ThresholdRiskPolicy::default()),
            &Config::test_config(),
        )
    }

    #[tokio::test]
    async fn test_student_row_end_to_end() {
        let svc = service(Arc::new(fixtures::course_store()));
        let row = svc.student_row(fixtures::STUDENT_PROGRESSING).await.unwrap();

        assert_eq!(row.lms.lessons_completed, 2);
        assert_eq!(row.lms.lessons_total, 6);
        assert!((row.lms.avg_progress_percent - 250.0 / 6.0).abs() < 1e-9);
        assert_eq!(row.lms.lessons[2].pages_completed, 1);
        assert_eq!(row.lms.lessons[3].pages_completed, 0);
        assert_eq!(row.student.label(), "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_student_without_activity_defaults_to_at_risk() {
        let svc = service(Arc::new(fixtures::course_store()));
        let row = svc.student_row(fixtures::STUDENT_IDLE).await.unwrap();

        assert_eq!(row.status, Status::AtRisk);
        assert_eq!(row.game.quizzes_taken, 0);
        assert_eq!(row.tasks.tasks_graded, 0);
    }

    #[tokio::test]
    async fn test_class_report_isolates_failing_student() {
        let mut mock = MockDocumentStore::new();
        let backing = fixtures::course_value();
        let failing_prefix = format!("lmsAssessments/{}", fixtures::STUDENT_IDLE);
        mock.expect_read().returning(move |path: &StorePath| {
            if path.to_string().starts_with(&failing_prefix) {
                return Err(AppError::StoreUnavailable("timeout".to_string()));
            }
            Ok(lookup(&backing, path))
        });

        let report = service(Arc::new(mock))
            .class_report(fixtures::CLASS_ID)
            .await
            .unwrap();

        assert_eq!(report.gradebook.unavailable.len(), 1);
        assert_eq!(report.gradebook.unavailable[0].student_id, fixtures::STUDENT_IDLE);
        assert!(report
            .gradebook
            .rows
            .iter()
            .all(|r| r.student.id != fixtures::STUDENT_IDLE));
        assert_eq!(report.summary().total_students, report.gradebook.rows.len() as u32);
    }

    #[tokio::test]
    async fn test_store_failure_on_roster_propagates() {
        let mut mock = MockDocumentStore::new();
        mock.expect_read()
            .returning(|_| Err(AppError::StoreUnavailable("connection reset".to_string())));

        let result = service(Arc::new(mock)).class_report("any").await;
        assert!(matches!(result, Err(AppError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_unknown_class_not_found() {
        let svc = service(Arc::new(fixtures::course_store()));
        assert!(matches!(svc.class_report("nope").await, Err(AppError::NotFound(_))));
        assert!(matches!(
            svc.class_student_row(fixtures::CLASS_ID, "stranger").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_aggregation_is_idempotent() {
        let svc = service(Arc::new(fixtures::course_store()));
        let first = svc.class_report(fixtures::CLASS_ID).await.unwrap();
        let second = svc.class_report(fixtures::CLASS_ID).await.unwrap();

        let encode = |r: &ClassReport| {
            serde_json::to_string(&json!({ "rows": r.gradebook, "summary": r.summary() })).unwrap()
        };
        assert_eq!(encode(&first), encode(&second));
    }
}
