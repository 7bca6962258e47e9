//! # escola: school administration backend
//!
//! `escola` is a REST backend for a school's records: students (`alunos`), courses (`cursos`)
//! and the enrollments (`matriculas`) that link them. It exposes create/read/update/delete
//! endpoints for each entity plus lookups by student name, student email and course code.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for the HTTP layer and
//! uses PostgreSQL (through sqlx) for persistence.
//!
//! The **API layer** ([`api`]) decodes and validates request bodies, runs the business
//! preconditions (referenced rows exist, an enrollment pair is not taken) and maps records to
//! response contracts. The **database layer** ([`db`]) holds one repository per table behind a
//! shared [`db::handlers::Repository`] trait. Errors from both layers meet in [`errors::Error`],
//! which renders every failure as `{"detail": "<message>"}` with the matching status code.
//!
//! Integrity rules live in the schema where they can: unique emails, unique course codes and
//! unique (student, course) pairs are constraints, and a violation that slips past a pre-check
//! is still translated into the same client-facing error. Deleting a course removes its
//! enrollments in the same transaction; deleting a student keeps them with the student
//! reference cleared, and every enrollment read joins against `alunos`, so they simply stop
//! being listed.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use escola::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = escola::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     escola::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod telemetry;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use crate::api::handlers::{courses, enrollments, students};
use crate::config::CorsOrigin;
use crate::openapi::ApiDoc;
use axum::http::HeaderValue;
use axum::{Json, Router, routing::get};
use bon::Builder;
pub use config::Config;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use sqlx::postgres::PgConnectOptions;
use std::str::FromStr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Application state shared across all request handlers.
///
/// ```ignore
/// let state = AppState::builder().db(pool).config(config).build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

/// Get the escola database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Connect the pool described by the config and bring the schema up to date.
async fn setup_database(config: &Config) -> anyhow::Result<PgPool> {
    let connect_options = PgConnectOptions::from_str(&config.database.url)?.log_slow_statements(
        log::LevelFilter::Warn,
        Duration::from_millis(config.slow_statement_threshold_ms),
    );

    let pool = config.database.pool.pool_options().connect_with(connect_options).await?;
    info!("Connected to database");

    migrator().run(&pool).await?;
    debug!("Database migrations applied");

    Ok(pool)
}

fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.cors.allowed_origins {
        let header_value = match origin {
            CorsOrigin::Wildcard => "*".parse::<HeaderValue>()?,
            // Browsers send the bare origin, without the trailing slash a parsed Url carries
            CorsOrigin::Url(url) => url.origin().ascii_serialization().parse::<HeaderValue>()?,
        };
        origins.push(header_value);
    }

    // Methods and headers are mirrored rather than `*`, which is not allowed with credentials
    let mut cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(config.cors.allow_credentials);

    if let Some(max_age) = config.cors.max_age {
        cors = cors.max_age(Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router with all endpoints and middleware.
///
/// Returns an error if the CORS configuration is invalid.
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    let api_routes = Router::new()
        // Students
        .route("/alunos", get(students::list_students).post(students::create_student))
        .route(
            "/alunos/{id}",
            get(students::get_student)
                .put(students::update_student)
                .delete(students::delete_student),
        )
        .route("/alunos/nome/{nome}", get(students::find_students_by_name))
        .route("/alunos/email/{email}", get(students::get_student_by_email))
        // Courses. GET/PUT address a course by code and DELETE by id; they share one route
        // because the router cannot tell the two segments apart.
        .route("/cursos", get(courses::list_courses).post(courses::create_course))
        .route(
            "/cursos/{codigo}",
            get(courses::get_course)
                .put(courses::update_course)
                .delete(courses::delete_course),
        )
        // Enrollments
        .route(
            "/matriculas",
            get(enrollments::list_enrollments).post(enrollments::create_enrollment),
        )
        .route(
            "/matriculas/{id}",
            axum::routing::put(enrollments::update_enrollment).delete(enrollments::delete_enrollment),
        )
        .route("/matriculas/aluno/{nome}", get(enrollments::list_courses_by_student_name))
        .route("/matriculas/curso/{codigo}", get(enrollments::list_students_by_course_code))
        .with_state(state.clone());

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(api_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    let cors_layer = create_cors_layer(&state.config)?;

    let router = router.layer(cors_layer).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// Main application struct that owns the router, the pool and the configuration.
///
/// 1. **Create**: [`Application::new`] connects to the database, runs migrations and builds
///    the router
/// 2. **Serve**: [`Application::serve`] binds to the configured address and handles requests
/// 3. **Shutdown**: when the shutdown future resolves, in-flight requests finish, the pool is
///    closed and telemetry is flushed
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::new_with_pool(config, None).await
    }

    /// Create an application on an existing pool (migrations are still applied), or connect
    /// one from the config when `pool` is `None`.
    pub async fn new_with_pool(config: Config, pool: Option<PgPool>) -> anyhow::Result<Self> {
        debug!("Starting escola with configuration: {:#?}", config);

        let pool = match pool {
            Some(pool) => {
                migrator().run(&pool).await?;
                pool
            }
            None => setup_database(&config).await?,
        };

        let app_state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(&app_state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(any(test, feature = "test-utils"))]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router.into_make_service()).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "escola listening on http://{}, docs at http://localhost:{}/docs",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
