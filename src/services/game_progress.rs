use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use crate::{
    config::QuizScorePolicy,
    db::DocumentStore,
    errors::AppResult,
    models::domain::{metrics::mean, GameCatalog, GameMetrics, GameRecords, QuizAttempt},
    repositories::GameRepository,
};

const MAX_QUIZ_SCORE: f64 = 10.0;

/// The score that represents one quiz, or `None` when no attempt carries a score.
pub fn quiz_score(attempts: &[QuizAttempt], policy: QuizScorePolicy) -> Option<f64> {
    let score = match policy {
        QuizScorePolicy::Best => attempts
            .iter()
            .filter_map(|a| a.score)
            .max_by(|a, b| a.total_cmp(b)),
        QuizScorePolicy::Latest => attempts
            .iter()
            .filter(|a| a.score.is_some())
            .max_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)))
            .and_then(|a| a.score),
    };
    score.map(|s| s.clamp(0.0, MAX_QUIZ_SCORE))
}

pub fn game_metrics(
    catalog: &GameCatalog,
    records: &GameRecords,
    policy: QuizScorePolicy,
) -> GameMetrics {
    let mut quiz_ids: BTreeSet<&str> = catalog.quizzes.iter().map(|q| q.id.as_str()).collect();
    let mut simulation_ids: BTreeSet<&str> =
        catalog.simulations.iter().map(|s| s.id.as_str()).collect();

    let mut scores = Vec::new();
    let mut by_lesson: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for (quiz_id, attempts) in &records.quizzes {
        if quiz_ids.insert(quiz_id.as_str()) {
            log::warn!("Quiz '{}' has attempts but is not in the game catalog", quiz_id);
        }
        let Some(score) = quiz_score(attempts, policy) else {
            continue;
        };
        scores.push(score);
        if let Some(slot) = catalog.quiz_lesson(quiz_id) {
            by_lesson.entry(slot).or_default().push(score);
        }
    }

    let mut simulations_passed = 0;
    let mut simulations_attempted = 0;
    for (simulation_id, attempts) in &records.simulations {
        if simulation_ids.insert(simulation_id.as_str()) {
            log::warn!(
                "Simulation '{}' has attempts but is not in the game catalog",
                simulation_id
            );
        }
        if !attempts.is_empty() {
            simulations_attempted += 1;
        }
        if attempts.iter().any(|a| a.is_pass()) {
            simulations_passed += 1;
        }
    }

    GameMetrics {
        quizzes_taken: scores.len() as u32,
        quizzes_total: quiz_ids.len() as u32,
        avg_quiz_score: mean(scores).unwrap_or(0.0),
        simulations_passed,
        simulations_attempted,
        simulations_total: simulation_ids.len() as u32,
        lesson_quiz_scores: by_lesson
            .into_iter()
            .filter_map(|(slot, s)| mean(s).map(|m| (slot, m)))
            .collect(),
    }
}

pub struct GameProgressExtractor {
    repository: GameRepository,
    policy: QuizScorePolicy,
}

impl GameProgressExtractor {
    pub fn new(store: Arc<dyn DocumentStore>, policy: QuizScorePolicy) -> Self {
        Self {
            repository: GameRepository::new(store),
            policy,
        }
    }

    pub async fn catalog(&self) -> AppResult<GameCatalog> {
        self.repository.catalog().await
    }

    pub async fn extract(&self, student_id: &str, catalog: &GameCatalog) -> AppResult<GameMetrics> {
        let records = self.repository.records(student_id).await?;
        Ok(game_metrics(catalog, &records, self.policy))
    }
}
