use std::sync::Arc;

use serde_json::Value;

use crate::{
    db::{read_snapshot, DocumentStore, Snapshot, StorePath},
    errors::AppResult,
    models::domain::{record::from_record, ClassRoster, StudentIdentity},
};

pub struct RosterRepository {
    store: Arc<dyn DocumentStore>,
}

impl RosterRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn find_class(&self, class_id: &str) -> AppResult<Option<ClassRoster>> {
        let path = StorePath::root().child("classes").child(class_id);
        let snapshot = read_snapshot(self.store.as_ref(), &path).await?;
        if !snapshot.exists() {
            return Ok(None);
        }

        let name = snapshot
            .child("name")
            .and_then(Value::as_str)
            .unwrap_or(class_id)
            .to_string();

        let members = Snapshot::new(snapshot.child("students").cloned());
        // Membership entries are `true` or a small profile object; `false` marks a removed student.
        let mut student_ids: Vec<String> = members
            .children()
            .into_iter()
            .filter(|(_, v)| !matches!(v, Value::Bool(false)))
            .map(|(k, _)| k)
            .collect();
        student_ids.sort();
        student_ids.dedup();

        Ok(Some(ClassRoster {
            id: class_id.to_string(),
            name,
            student_ids,
        }))
    }

    /// Profile under `users/{id}`. A missing profile is not an error.
    pub async fn find_student(&self, student_id: &str) -> AppResult<StudentIdentity> {
        let path = StorePath::root().child("users").child(student_id);
        let snapshot = read_snapshot(self.store.as_ref(), &path).await?;

        let mut identity = match snapshot.value() {
            Some(value) => from_record::<StudentIdentity>(&path.to_string(), value),
            None => StudentIdentity::default(),
        };
        identity.id = student_id.to_string();
        Ok(identity)
    }
}
