use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::db::is_valid_key;

fn validate_store_key(value: &str) -> Result<(), ValidationError> {
    if is_valid_key(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("store_key");
        err.message = Some("must be a non-empty key without . $ # [ ] or /".into());
        Err(err)
    }
}

/// `?classId=` on the class routes.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClassQuery {
    #[validate(custom(function = "validate_store_key"))]
    pub class_id: Option<String>,
}

/// `?studentId=` on the assessment history route.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudentQuery {
    #[validate(custom(function = "validate_store_key"))]
    pub student_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_ids_are_valid() {
        assert!(ClassQuery::default().validate().is_ok());
        assert!(StudentQuery::default().validate().is_ok());
    }

    #[test]
    fn test_plain_ids_are_valid() {
        let query = ClassQuery {
            class_id: Some("cs101".to_string()),
        };
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_path_like_ids_rejected() {
        for bad in ["", "a/b", "a.b", "$key", "x[0]"] {
            let query = StudentQuery {
                student_id: Some(bad.to_string()),
            };
            assert!(query.validate().is_err(), "{:?} should be rejected", bad);
        }
    }
}
