//! Repository implementations for database access.
//!
//! Each repository:
//! - Wraps a borrowed [`sqlx::PgConnection`] (a pooled connection or an open transaction)
//! - Provides strongly-typed CRUD operations
//! - Returns records from [`crate::db::models`]
//!
//! # Available Repositories
//!
//! - [`Students`]: the `alunos` table, with name and email lookups
//! - [`Courses`]: the `cursos` table, with code lookup and cascading delete
//! - [`Enrollments`]: the `matriculas` table, with joined views over students and courses
//!
//! # Common Pattern
//!
//! ```ignore
//! use escola::db::handlers::{Repository, Students};
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut tx = pool.begin().await?;
//!     let mut repo = Students::new(&mut tx);
//!
//!     let students = repo.list().await?;
//!
//!     tx.commit().await?;
//!     Ok(())
//! }
//! ```

pub mod courses;
pub mod enrollments;
pub mod repository;
pub mod students;

pub use courses::Courses;
pub use enrollments::Enrollments;
pub use repository::Repository;
pub use students::Students;
