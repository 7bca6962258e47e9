//! Database models for courses.

use crate::api::models::courses::{CourseCreate, CourseUpdate};
use crate::types::CourseId;

/// Database request for creating a new course
#[derive(Debug, Clone)]
pub struct CourseCreateDBRequest {
    pub code: String,
    pub name: String,
    pub workload: i32,
}

impl From<CourseCreate> for CourseCreateDBRequest {
    fn from(api: CourseCreate) -> Self {
        Self {
            code: api.code,
            name: api.name,
            workload: api.workload,
        }
    }
}

/// Database request for updating a course
#[derive(Debug, Clone, Default)]
pub struct CourseUpdateDBRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub workload: Option<i32>,
}

impl From<CourseUpdate> for CourseUpdateDBRequest {
    fn from(api: CourseUpdate) -> Self {
        Self {
            code: api.code,
            name: api.name,
            workload: api.workload,
        }
    }
}

/// Database response for a course
#[derive(Debug, Clone, PartialEq)]
pub struct CourseDBResponse {
    pub id: CourseId,
    pub code: String,
    pub name: String,
    pub workload: i32,
}
