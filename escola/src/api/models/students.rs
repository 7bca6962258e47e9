//! API request/response models for students.

use crate::api::extractors::{Validate, require_email, require_text};
use crate::db::models::students::StudentDBResponse;
use crate::errors::Error;
use crate::types::StudentId;
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use utoipa::ToSchema;

/// Request body for creating a new student.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentCreate {
    /// Full name
    #[serde(rename = "nome")]
    #[schema(example = "João Silva")]
    pub name: String,
    /// Contact email (must be unique)
    #[schema(example = "joao.silva@example.com")]
    pub email: String,
    /// Optional phone number
    #[serde(rename = "telefone", default)]
    #[schema(example = "111111111")]
    pub phone: Option<String>,
}

impl Validate for StudentCreate {
    fn validate(&self) -> Result<(), Error> {
        require_text("nome", &self.name)?;
        require_email("email", &self.email)
    }
}

/// Request body for updating a student. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct StudentUpdate {
    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone number (absent = no change, null = clear, text = set)
    #[serde(rename = "telefone", default, skip_serializing_if = "Option::is_none", with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
}

impl Validate for StudentUpdate {
    fn validate(&self) -> Result<(), Error> {
        if let Some(name) = &self.name {
            require_text("nome", name)?;
        }
        if let Some(email) = &self.email {
            require_email("email", email)?;
        }
        Ok(())
    }
}

/// Student record returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StudentResponse {
    pub id: StudentId,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
}

impl From<StudentDBResponse> for StudentResponse {
    fn from(db: StudentDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            email: db.email,
            phone: db.phone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_distinguishes_absent_and_null_phone() {
        let absent: StudentUpdate = serde_json::from_value(json!({ "nome": "Maria" })).unwrap();
        assert_eq!(absent.phone, None);

        let cleared: StudentUpdate = serde_json::from_value(json!({ "telefone": null })).unwrap();
        assert_eq!(cleared.phone, Some(None));

        let set: StudentUpdate = serde_json::from_value(json!({ "telefone": "222" })).unwrap();
        assert_eq!(set.phone, Some(Some("222".to_string())));
    }

    #[test]
    fn test_create_validation() {
        let ok: StudentCreate = serde_json::from_value(json!({ "nome": "João", "email": "joao@example.com" })).unwrap();
        assert!(ok.validate().is_ok());
        assert_eq!(ok.phone, None);

        let bad_email: StudentCreate = serde_json::from_value(json!({ "nome": "João", "email": "email_invalido" })).unwrap();
        assert!(matches!(bad_email.validate(), Err(Error::Validation { .. })));
    }

    #[test]
    fn test_response_uses_portuguese_field_names() {
        let response = StudentResponse {
            id: 1,
            name: "João Silva".to_string(),
            email: "joao@example.com".to_string(),
            phone: None,
        };

        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({ "id": 1, "nome": "João Silva", "email": "joao@example.com", "telefone": null })
        );
    }
}
