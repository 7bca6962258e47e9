//! Common type definitions.
//!
//! All entity IDs are `SERIAL` integer keys assigned by PostgreSQL, wrapped in type
//! aliases so signatures read in terms of the entity they refer to:
//!
//! - [`StudentId`]: Student (aluno) identifier
//! - [`CourseId`]: Course (curso) identifier
//! - [`EnrollmentId`]: Enrollment (matrícula) identifier
//!
//! Courses are additionally addressed by their unique code in routes; that is a plain
//! `String` and has no alias.

// Type aliases for IDs
pub type StudentId = i32;
pub type CourseId = i32;
pub type EnrollmentId = i32;

/// Escape `%`, `_` and `\` so a user-supplied search term matches literally inside an
/// `ILIKE '%' || $1 || '%'` pattern.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
