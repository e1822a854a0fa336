use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Instructor,
    Admin,
}

impl Role {
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Instructor | Role::Admin)
    }
}

/// Bearer token claims. Tokens are issued by the identity provider; this service only verifies them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: String, // Subject (student or staff account id)
    pub role: Role,
    /// Classes an instructor teaches or a student is enrolled in.
    #[serde(default)]
    pub class_ids: Vec<String>,
    pub exp: usize,
    pub iat: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_deserialize_without_classes() {
        let claims: Claims = serde_json::from_str(
            r#"{ "sub": "ada", "role": "student", "exp": 10, "iat": 1 }"#,
        )
        .unwrap();

        assert_eq!(claims.role, Role::Student);
        assert!(claims.class_ids.is_empty());
        assert!(!claims.role.is_staff());
    }

    #[test]
    fn test_staff_roles() {
        assert!(Role::Instructor.is_staff());
        assert!(Role::Admin.is_staff());
    }
}
