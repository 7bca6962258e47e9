//! API request/response models for courses.

use crate::api::extractors::{Validate, require_text};
use crate::db::models::courses::CourseDBResponse;
use crate::errors::Error;
use crate::types::CourseId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

fn require_workload(workload: i32) -> Result<(), Error> {
    if workload < 0 {
        return Err(Error::validation("O campo 'carga_horaria' não pode ser negativo"));
    }
    Ok(())
}

/// Request body for creating a new course.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CourseCreate {
    /// Course code, used to address the course in routes (must be unique)
    #[serde(rename = "codigo")]
    #[schema(example = "CS101")]
    pub code: String,
    #[serde(rename = "nome")]
    #[schema(example = "Ciência da Computação")]
    pub name: String,
    /// Workload in hours
    #[serde(rename = "carga_horaria")]
    #[schema(example = 3600, minimum = 0)]
    pub workload: i32,
}

impl Validate for CourseCreate {
    fn validate(&self) -> Result<(), Error> {
        require_text("codigo", &self.code)?;
        require_text("nome", &self.name)?;
        require_workload(self.workload)
    }
}

/// Request body for updating a course. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CourseUpdate {
    #[serde(rename = "codigo", default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "carga_horaria", default, skip_serializing_if = "Option::is_none")]
    pub workload: Option<i32>,
}

impl Validate for CourseUpdate {
    fn validate(&self) -> Result<(), Error> {
        if let Some(code) = &self.code {
            require_text("codigo", code)?;
        }
        if let Some(name) = &self.name {
            require_text("nome", name)?;
        }
        if let Some(workload) = self.workload {
            require_workload(workload)?;
        }
        Ok(())
    }
}

/// Course record returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CourseResponse {
    pub id: CourseId,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "carga_horaria")]
    pub workload: i32,
}

impl From<CourseDBResponse> for CourseResponse {
    fn from(db: CourseDBResponse) -> Self {
        Self {
            id: db.id,
            code: db.code,
            name: db.name,
            workload: db.workload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_negative_workload_rejected() {
        let create: CourseCreate =
            serde_json::from_value(json!({ "codigo": "X", "nome": "Curso X", "carga_horaria": -1 })).unwrap();
        assert!(matches!(create.validate(), Err(Error::Validation { .. })));

        let update: CourseUpdate = serde_json::from_value(json!({ "carga_horaria": -5 })).unwrap();
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_empty_update_is_valid() {
        let update: CourseUpdate = serde_json::from_value(json!({})).unwrap();
        assert!(update.validate().is_ok());
        assert!(update.code.is_none() && update.name.is_none() && update.workload.is_none());
    }
}
