pub mod assessment;
pub mod game;
pub mod gradebook;
pub mod lesson;
pub mod metrics;
pub mod record;
pub mod student;
pub mod task;

pub use assessment::{AssessmentAttempt, AssessmentSummary, PageHistory, PageRecords};
pub use game::{CatalogItem, GameCatalog, GameRecords, QuizAttempt, SimulationAttempt};
pub use gradebook::{ClassGradebook, ClassSummary, GradebookRow, LessonPerformance, UnavailableStudent};
pub use lesson::{Lesson, LessonPage, LessonSlot};
pub use metrics::{GameMetrics, LessonProgress, LmsMetrics, Status, TaskMetrics};
pub use student::{ClassRoster, StudentIdentity};
pub use task::{TaskDefinition, TaskGrade};
