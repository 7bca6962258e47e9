//! API request/response models for enrollments.

use crate::api::extractors::Validate;
use crate::api::models::{courses::CourseResponse, students::StudentResponse};
use crate::db::models::enrollments::EnrollmentDetailDBResponse;
use crate::errors::Error;
use crate::types::{CourseId, EnrollmentId, StudentId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for creating an enrollment, also used to re-point one on update.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct EnrollmentCreate {
    #[serde(rename = "aluno_id")]
    #[schema(example = 1)]
    pub student_id: StudentId,
    #[serde(rename = "curso_id")]
    #[schema(example = 1)]
    pub course_id: CourseId,
}

// Existence of the referenced rows is checked against the database by the handler
impl Validate for EnrollmentCreate {
    fn validate(&self) -> Result<(), Error> {
        Ok(())
    }
}

/// Enrollment with its student and course expanded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EnrollmentResponse {
    pub id: EnrollmentId,
    #[serde(rename = "aluno_id")]
    pub student_id: StudentId,
    #[serde(rename = "curso_id")]
    pub course_id: CourseId,
    #[serde(rename = "aluno")]
    pub student: StudentResponse,
    #[serde(rename = "curso")]
    pub course: CourseResponse,
}

impl From<EnrollmentDetailDBResponse> for EnrollmentResponse {
    fn from(db: EnrollmentDetailDBResponse) -> Self {
        Self {
            id: db.id,
            student_id: db.student.id,
            course_id: db.course.id,
            student: db.student.into(),
            course: db.course.into(),
        }
    }
}

/// Names of the courses a student is enrolled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StudentCoursesResponse {
    /// Student name
    #[serde(rename = "aluno")]
    #[schema(example = "João Silva")]
    pub student: String,
    /// Course names, in enrollment order
    #[serde(rename = "cursos")]
    pub courses: Vec<String>,
}

/// Names of the students enrolled in a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CourseStudentsResponse {
    /// Course name
    #[serde(rename = "curso")]
    #[schema(example = "Ciência da Computação")]
    pub course: String,
    /// Student names, in enrollment order
    #[serde(rename = "alunos")]
    pub students: Vec<String>,
}
