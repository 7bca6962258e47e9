//! Database models for students.

use crate::api::models::students::{StudentCreate, StudentUpdate};
use crate::types::StudentId;

/// Database request for creating a new student
#[derive(Debug, Clone)]
pub struct StudentCreateDBRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<StudentCreate> for StudentCreateDBRequest {
    fn from(api: StudentCreate) -> Self {
        Self {
            name: api.name,
            email: api.email,
            phone: api.phone,
        }
    }
}

/// Database request for updating a student. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct StudentUpdateDBRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    /// `Some(None)` clears the phone number
    pub phone: Option<Option<String>>,
}

impl From<StudentUpdate> for StudentUpdateDBRequest {
    fn from(api: StudentUpdate) -> Self {
        Self {
            name: api.name,
            email: api.email,
            phone: api.phone,
        }
    }
}

/// Database response for a student
#[derive(Debug, Clone, PartialEq)]
pub struct StudentDBResponse {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}
