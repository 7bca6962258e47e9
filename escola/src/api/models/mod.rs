//! API request and response data models.
//!
//! This module contains the data structures used for HTTP request deserialization
//! and response serialization. These models define the public API contract.
//!
//! Field names on the wire are Portuguese (`nome`, `carga_horaria`, `aluno_id`, ...) and
//! are mapped to English Rust fields with `#[serde(rename)]`.
//!
//! - [`students`]: student records and create/update payloads
//! - [`courses`]: course records and create/update payloads
//! - [`enrollments`]: expanded enrollment records and the per-student / per-course
//!   name listings
//!
//! Request payloads implement [`crate::api::extractors::Validate`] and are decoded with
//! [`crate::api::extractors::ValidatedJson`].

pub mod courses;
pub mod enrollments;
pub mod students;
