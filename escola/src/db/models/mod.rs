//! Database record models matching table schemas.
//!
//! These structs are what repositories accept and return. They are distinct from the
//! transfer contracts in [`crate::api::models`] so the storage layout (Portuguese column
//! names, integer keys) can evolve independently of the wire format.
//!
//! - [`students`]: rows of the `alunos` table
//! - [`courses`]: rows of the `cursos` table
//! - [`enrollments`]: rows of the `matriculas` table, plus the joined shapes used by the
//!   lookup endpoints
//!
//! API models convert into `*DBRequest` types with `From`, and `*DBResponse` types
//! convert back into API responses:
//!
//! ```ignore
//! use escola::api::models::students::StudentResponse;
//!
//! let db_student = repo.get_by_id(id).await?.unwrap();
//! let response: StudentResponse = db_student.into();
//! ```

pub mod courses;
pub mod enrollments;
pub mod students;
