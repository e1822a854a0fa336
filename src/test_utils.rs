#[cfg(test)]
pub mod fixtures {
    use serde_json::Value;

    use crate::{
        auth::{claims::Claims, Role},
        db::MemoryStore,
    };

    pub const CLASS_ID: &str = "cs101";
    /// Lessons 1-2 complete, lesson 3 half done, 4-6 untouched.
    pub const STUDENT_PROGRESSING: &str = "ada";
    /// Every lesson complete with high scores.
    pub const STUDENT_STRONG: &str = "grace";
    /// Enrolled but no activity in any domain.
    pub const STUDENT_IDLE: &str = "idle";

    pub fn course_value() -> Value {
        serde_json::from_str(include_str!("../fixtures/course.json"))
            .expect("fixtures/course.json is valid JSON")
    }

    pub fn course_store() -> MemoryStore {
        MemoryStore::from_value(course_value())
    }

    pub fn claims(sub: &str, role: Role, class_ids: &[&str]) -> Claims {
        Claims {
            sub: sub.to_string(),
            role,
            class_ids: class_ids.iter().map(|c| c.to_string()).collect(),
            iat: 0,
            exp: 9_999_999_999,
        }
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::db::{DocumentStore, StorePath};

    #[tokio::test]
    async fn test_course_store_has_roster() {
        let store = course_store();
        let students = store
            .read(&StorePath::root().child("classes").child(CLASS_ID).child("students"))
            .await
            .unwrap()
            .unwrap();
        for id in [STUDENT_PROGRESSING, STUDENT_STRONG, STUDENT_IDLE] {
            assert!(students.get(id).is_some(), "{} should be enrolled", id);
        }
    }
}
