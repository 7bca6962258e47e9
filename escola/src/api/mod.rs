//! API layer for HTTP request handling and data models.
//!
//! This module contains the REST API implementation, organized into:
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//! - **[`extractors`]**: The validating JSON body extractor
//!
//! # API Structure
//!
//! - **Students** (`/alunos/*`): CRUD plus lookups by name substring and exact email
//! - **Courses** (`/cursos/*`): CRUD, addressed by course code except for delete
//! - **Enrollments** (`/matriculas/*`): CRUD plus per-student and per-course listings
//!
//! Every error response has the body `{"detail": "<message>"}`.
//!
//! # OpenAPI Documentation
//!
//! All endpoints are documented with OpenAPI annotations using `utoipa`.
//! API documentation is available at `/docs` when the server is running.

pub mod extractors;
pub mod handlers;
pub mod models;
