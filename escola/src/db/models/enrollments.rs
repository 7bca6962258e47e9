//! Database models for enrollments.

use crate::api::models::enrollments::EnrollmentCreate;
use crate::db::models::{courses::CourseDBResponse, students::StudentDBResponse};
use crate::types::{CourseId, EnrollmentId, StudentId};

/// Database request for creating an enrollment. Updates re-point both references, so the
/// same shape is used for [`EnrollmentUpdateDBRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrollmentCreateDBRequest {
    pub student_id: StudentId,
    pub course_id: CourseId,
}

pub type EnrollmentUpdateDBRequest = EnrollmentCreateDBRequest;

impl From<EnrollmentCreate> for EnrollmentCreateDBRequest {
    fn from(api: EnrollmentCreate) -> Self {
        Self {
            student_id: api.student_id,
            course_id: api.course_id,
        }
    }
}

/// Database response for a bare enrollment row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrollmentDBResponse {
    pub id: EnrollmentId,
    /// `None` once the student has been deleted
    pub student_id: Option<StudentId>,
    pub course_id: CourseId,
}

/// An enrollment joined with the student and course it references
#[derive(Debug, Clone, PartialEq)]
pub struct EnrollmentDetailDBResponse {
    pub id: EnrollmentId,
    pub student: StudentDBResponse,
    pub course: CourseDBResponse,
}
