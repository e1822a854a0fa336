use crate::{
    config::RiskThresholds,
    models::domain::{
        metrics::mean, GameMetrics, GradebookRow, LmsMetrics, Status, StudentIdentity, TaskMetrics,
    },
};

/// Decides whether a student is on track from their three metrics records.
///
/// Any `Fn(&LmsMetrics, &GameMetrics, &TaskMetrics) -> Status` closure is a policy.
pub trait RiskPolicy: Send + Sync {
    fn classify(&self, lms: &LmsMetrics, game: &GameMetrics, tasks: &TaskMetrics) -> Status;
}

impl<F> RiskPolicy for F
where
    F: Fn(&LmsMetrics, &GameMetrics, &TaskMetrics) -> Status + Send + Sync,
{
    fn classify(&self, lms: &LmsMetrics, game: &GameMetrics, tasks: &TaskMetrics) -> Status {
        self(lms, game, tasks)
    }
}

/// Mean of the score indicators a student actually has, as a percentage.
/// Quiz scores are on a 0-10 scale and are scaled up.
pub fn mean_score_percent(lms: &LmsMetrics, game: &GameMetrics, tasks: &TaskMetrics) -> Option<f64> {
    let indicators = [
        (lms.assessments_completed > 0).then_some(lms.avg_assessment_score_percent),
        (game.quizzes_taken > 0).then_some(game.avg_quiz_score * 10.0),
        (tasks.tasks_graded > 0).then_some(tasks.avg_task_score_percent),
    ];
    mean(indicators.into_iter().flatten())
}

/// Default policy: no activity anywhere is at risk; otherwise low progress
/// together with low scores, or critically low scores alone.
#[derive(Clone, Debug, Default)]
pub struct ThresholdRiskPolicy {
    thresholds: RiskThresholds,
}

impl ThresholdRiskPolicy {
    pub fn new(thresholds: RiskThresholds) -> Self {
        Self { thresholds }
    }
}

impl RiskPolicy for ThresholdRiskPolicy {
    fn classify(&self, lms: &LmsMetrics, game: &GameMetrics, tasks: &TaskMetrics) -> Status {
        if !lms.has_activity() && !game.has_activity() && !tasks.has_activity() {
            return Status::AtRisk;
        }

        let score = mean_score_percent(lms, game, tasks);
        let low_progress = lms.avg_progress_percent < self.thresholds.min_progress_percent;
        let low_score = score.map_or(true, |s| s < self.thresholds.min_score_percent);
        let critical_score = score.is_some_and(|s| s < self.thresholds.critical_score_percent);

        if (low_progress && low_score) || critical_score {
            Status::AtRisk
        } else {
            Status::OnTrack
        }
    }
}

pub fn build_row(
    student: StudentIdentity,
    lms: LmsMetrics,
    game: GameMetrics,
    tasks: TaskMetrics,
    policy: &dyn RiskPolicy,
) -> GradebookRow {
    let status = policy.classify(&lms, &game, &tasks);
    GradebookRow {
        student,
        lms,
        game,
        tasks,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lms(progress: f64, completed: u32, score: f64) -> LmsMetrics {
        LmsMetrics {
            avg_progress_percent: progress,
            assessments_completed: completed,
            assessments_total: 10,
            avg_assessment_score_percent: score,
            ..LmsMetrics::default()
        }
    }

    fn game(taken: u32, avg: f64) -> GameMetrics {
        GameMetrics {
            quizzes_taken: taken,
            quizzes_total: 5,
            avg_quiz_score: avg,
            ..GameMetrics::default()
        }
    }

    #[test]
    fn test_zero_activity_is_at_risk() {
        let policy = ThresholdRiskPolicy::default();
        let status = policy.classify(
            &LmsMetrics::default(),
            &GameMetrics::default(),
            &TaskMetrics::default(),
        );
        assert_eq!(status, Status::AtRisk);
    }

    #[test]
    fn test_failed_simulations_are_activity() {
        let policy = ThresholdRiskPolicy::new(RiskThresholds {
            min_progress_percent: 0.0,
            ..RiskThresholds::default()
        });
        let game = GameMetrics {
            simulations_attempted: 1,
            simulations_total: 2,
            ..GameMetrics::default()
        };
        let status = policy.classify(&LmsMetrics::default(), &game, &TaskMetrics::default());
        assert_eq!(status, Status::OnTrack);
    }

    #[test]
    fn test_low_progress_with_low_score_is_at_risk() {
        let policy = ThresholdRiskPolicy::default();
        let status = policy.classify(&lms(20.0, 2, 50.0), &game(1, 5.0), &TaskMetrics::default());
        assert_eq!(status, Status::AtRisk);
    }

    #[test]
    fn test_low_progress_with_good_score_is_on_track() {
        let policy = ThresholdRiskPolicy::default();
        let status = policy.classify(&lms(20.0, 2, 90.0), &game(1, 8.0), &TaskMetrics::default());
        assert_eq!(status, Status::OnTrack);
    }

    #[test]
    fn test_critical_score_is_at_risk_even_with_progress() {
        let policy = ThresholdRiskPolicy::default();
        let status = policy.classify(&lms(90.0, 9, 30.0), &game(0, 0.0), &TaskMetrics::default());
        assert_eq!(status, Status::AtRisk);
    }

    #[test]
    fn test_mean_score_ignores_missing_domains() {
        let tasks = TaskMetrics {
            tasks_graded: 1,
            tasks_total: 3,
            avg_task_score_percent: 80.0,
        };
        let score = mean_score_percent(&lms(0.0, 0, 0.0), &game(2, 6.0), &tasks);
        assert_eq!(score, Some(70.0));
        assert_eq!(
            mean_score_percent(&LmsMetrics::default(), &GameMetrics::default(), &TaskMetrics::default()),
            None
        );
    }

    #[test]
    fn test_closure_policy_and_build_row() {
        let everyone_on_track = |_: &LmsMetrics, _: &GameMetrics, _: &TaskMetrics| Status::OnTrack;
        let row = build_row(
            StudentIdentity::unknown("s1"),
            LmsMetrics::default(),
            GameMetrics::default(),
            TaskMetrics::default(),
            &everyone_on_track,
        );
        assert_eq!(row.status, Status::OnTrack);
        assert_eq!(row.student.id, "s1");
    }
}
