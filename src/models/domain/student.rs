use serde::{Deserialize, Serialize};

use crate::models::domain::record::lenient_string;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentIdentity {
    #[serde(default, skip_deserializing)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl StudentIdentity {
    pub fn unknown(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Self::default()
        }
    }

    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassRoster {
    pub id: String,
    pub name: String,
    /// Sorted, deduplicated.
    pub student_ids: Vec<String>,
}
