use std::{collections::BTreeMap, sync::Arc};

use serde::Deserialize;
use serde_json::Value;

use crate::{
    db::{read_snapshot, DocumentStore, Snapshot, StorePath},
    errors::AppResult,
    models::domain::{
        record::from_record, CatalogItem, GameCatalog, GameRecords, QuizAttempt,
        SimulationAttempt,
    },
};

/// Reads the quiz/simulation catalog and per-student attempts under `gameData`.
pub struct GameRepository {
    store: Arc<dyn DocumentStore>,
}

impl GameRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn catalog(&self) -> AppResult<GameCatalog> {
        let path = StorePath::root().child("gameCatalog");
        let snapshot = read_snapshot(self.store.as_ref(), &path).await?;

        let items = |kind: &str| -> Vec<CatalogItem> {
            Snapshot::new(snapshot.child(kind).cloned())
                .children()
                .into_iter()
                .map(|(id, value)| {
                    let mut item = from_record::<CatalogItem>(&format!("{}/{}/{}", path, kind, id), value);
                    item.id = id;
                    item
                })
                .collect()
        };

        Ok(GameCatalog {
            quizzes: items("quizzes"),
            simulations: items("simulations"),
        })
    }

    pub async fn records(&self, student_id: &str) -> AppResult<GameRecords> {
        let path = StorePath::root().child("gameData").child(student_id);
        let snapshot = read_snapshot(self.store.as_ref(), &path).await?;

        Ok(GameRecords {
            quizzes: attempts_by_id::<QuizAttempt>(&snapshot, &path, "quizzes", |a, k| a.id = k),
            simulations: attempts_by_id::<SimulationAttempt>(&snapshot, &path, "simulations", |a, k| {
                a.id = k
            }),
        })
    }
}

fn attempts_by_id<T>(
    snapshot: &Snapshot,
    path: &StorePath,
    kind: &str,
    set_key: impl Fn(&mut T, String),
) -> BTreeMap<String, Vec<T>>
where
    T: for<'de> Deserialize<'de> + Default,
{
    Snapshot::new(snapshot.child(kind).cloned())
        .children()
        .into_iter()
        .map(|(item_id, attempts): (String, &Value)| {
            let parsed = Snapshot::new(Some(attempts.clone()))
                .children()
                .into_iter()
                .map(|(key, value)| {
                    let mut attempt =
                        from_record::<T>(&format!("{}/{}/{}/{}", path, kind, item_id, key), value);
                    set_key(&mut attempt, key);
                    attempt
                })
                .collect();
            (item_id, parsed)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use serde_json::json;

    fn repository() -> GameRepository {
        let store = MemoryStore::from_value(json!({
            "gameCatalog": {
                "quizzes": { "q1": { "title": "Variables", "lessonSlot": 1 }, "q2": { "lessonSlot": "2" } },
                "simulations": { "sim1": { "title": "Traffic light" } }
            },
            "gameData": { "s1": {
                "quizzes": { "q1": { "-a": { "score": 6 }, "-b": { "score": "8.5" } } },
                "simulations": { "sim1": { "-a": { "outcome": "fail" }, "-b": { "outcome": "pass" } } }
            } }
        }));
        GameRepository::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_catalog() {
        let catalog = repository().catalog().await.unwrap();
        assert_eq!(catalog.quizzes.len(), 2);
        assert_eq!(catalog.quiz_lesson("q2"), Some(2));
        assert_eq!(catalog.simulations[0].id, "sim1");
    }

    #[tokio::test]
    async fn test_records_grouped_by_item() {
        let records = repository().records("s1").await.unwrap();
        let q1 = &records.quizzes["q1"];
        assert_eq!(q1.len(), 2);
        assert_eq!(q1[1].id, "-b");
        assert_eq!(q1[1].score, Some(8.5));
        assert!(records.simulations["sim1"][1].is_pass());
    }

    #[tokio::test]
    async fn test_records_for_unknown_student_are_empty() {
        let records = repository().records("nobody").await.unwrap();
        assert_eq!(records, GameRecords::default());
    }
}
