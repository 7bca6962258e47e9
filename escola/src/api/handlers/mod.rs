//! HTTP request handlers for all API endpoints.
//!
//! Each handler acquires a pooled connection (or opens a transaction when several
//! statements must agree), runs the repository calls, and converts database records into
//! API responses. Lookup failures are reported with the Portuguese messages below, which
//! clients match on.

pub mod courses;
pub mod enrollments;
pub mod students;

pub(crate) const STUDENT_NOT_FOUND: &str = "Aluno não encontrado";
pub(crate) const COURSE_NOT_FOUND: &str = "Curso não encontrado";
pub(crate) const ENROLLMENT_NOT_FOUND: &str = "Matrícula não encontrada";
