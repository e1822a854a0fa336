use crate::models::domain::{
    metrics::mean, ClassSummary, GradebookRow, Lesson, LessonPerformance, Status,
};

/// Dashboard statistics over a class.
///
/// The class quiz average only covers students who took at least one quiz.
/// `lesson_performance` has one row per published lesson, ascending by slot,
/// and zero values where nobody has data.
pub fn summarize_class(rows: &[GradebookRow], lessons: &[Lesson]) -> ClassSummary {
    let total_students = rows.len() as u32;

    let avg_quiz_score = mean(
        rows.iter()
            .filter(|r| r.game.quizzes_taken > 0)
            .map(|r| r.game.avg_quiz_score),
    )
    .unwrap_or(0.0);

    let avg_lessons_completed =
        mean(rows.iter().map(|r| r.lms.lessons_completed as f64)).unwrap_or(0.0);

    let mut lessons: Vec<&Lesson> = lessons.iter().collect();
    lessons.sort_by_key(|l| l.slot);

    let lesson_performance = lessons
        .into_iter()
        .map(|lesson| {
            let completed = rows
                .iter()
                .filter(|r| r.lms.completed_lesson(lesson.slot))
                .count();
            let completion_rate = if total_students == 0 {
                0.0
            } else {
                completed as f64 / total_students as f64 * 100.0
            };
            let avg_quiz_score = mean(
                rows.iter()
                    .filter_map(|r| r.game.lesson_quiz_scores.get(&lesson.slot.get()).copied()),
            )
            .unwrap_or(0.0);

            LessonPerformance {
                slot: lesson.slot,
                title: lesson.title.clone(),
                avg_quiz_score,
                completion_rate,
            }
        })
        .collect();

    ClassSummary {
        total_students,
        avg_quiz_score,
        avg_lessons_completed,
        total_simulations_passed: rows.iter().map(|r| r.game.simulations_passed).sum(),
        at_risk_count: rows.iter().filter(|r| r.status == Status::AtRisk).count() as u32,
        lesson_performance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::{
        GameMetrics, LessonProgress, LessonSlot, LmsMetrics, StudentIdentity, TaskMetrics,
    };

    fn slot(s: u32) -> LessonSlot {
        LessonSlot::new(s, 6).unwrap()
    }

    fn lesson(s: u32) -> Lesson {
        Lesson {
            slot: slot(s),
            title: format!("Lesson {}", s),
            pages: vec![],
        }
    }

    fn row(id: &str, quizzes_taken: u32, avg_quiz: f64, completed: &[u32]) -> GradebookRow {
        let mut game = GameMetrics {
            quizzes_taken,
            quizzes_total: 3,
            avg_quiz_score: avg_quiz,
            simulations_passed: 1,
            simulations_attempted: 1,
            ..GameMetrics::default()
        };
        if quizzes_taken > 0 {
            game.lesson_quiz_scores.insert(1, avg_quiz);
        }
        GradebookRow {
            student: StudentIdentity::unknown(id),
            lms: LmsMetrics {
                lessons_completed: completed.len() as u32,
                lessons_total: 6,
                lessons: completed
                    .iter()
                    .map(|s| LessonProgress {
                        slot: slot(*s),
                        pages_completed: 1,
                        pages_total: 1,
                        completed: true,
                    })
                    .collect(),
                ..LmsMetrics::default()
            },
            game,
            tasks: TaskMetrics::default(),
            status: Status::OnTrack,
        }
    }

    #[test]
    fn test_class_quiz_average_excludes_students_without_quizzes() {
        let rows = vec![row("a", 2, 8.0, &[]), row("b", 1, 6.0, &[]), row("c", 0, 0.0, &[])];
        let summary = summarize_class(&rows, &[lesson(1)]);

        assert_eq!(summary.total_students, 3);
        assert_eq!(summary.avg_quiz_score, 7.0);
        assert_eq!(summary.lesson_performance[0].avg_quiz_score, 7.0);
        assert_eq!(summary.total_simulations_passed, 3);
    }

    #[test]
    fn test_one_row_per_lesson_sorted_with_zero_defaults() {
        let rows = vec![row("a", 0, 0.0, &[1, 2]), row("b", 0, 0.0, &[1]), row("c", 0, 0.0, &[])];
        let lessons = vec![lesson(3), lesson(1), lesson(2)];
        let summary = summarize_class(&rows, &lessons);

        let slots: Vec<u32> = summary.lesson_performance.iter().map(|l| l.slot.get()).collect();
        assert_eq!(slots, vec![1, 2, 3]);
        assert!((summary.lesson_performance[0].completion_rate - 200.0 / 3.0).abs() < 1e-9);
        assert!((summary.lesson_performance[1].completion_rate - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.lesson_performance[2].completion_rate, 0.0);
        assert_eq!(summary.lesson_performance[2].avg_quiz_score, 0.0);
        assert_eq!(summary.avg_lessons_completed, 1.0);
    }

    #[test]
    fn test_empty_class() {
        let summary = summarize_class(&[], &[lesson(1), lesson(2)]);
        assert_eq!(summary.total_students, 0);
        assert_eq!(summary.avg_quiz_score, 0.0);
        assert_eq!(summary.lesson_performance.len(), 2);
        assert!(summary
            .lesson_performance
            .iter()
            .all(|l| l.completion_rate == 0.0 && l.avg_quiz_score == 0.0));
    }
}
