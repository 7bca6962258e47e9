//! Test utilities for integration testing (available with `test-utils` feature).

use crate::config::{Config, DatabaseConfig, PoolSettings};
use crate::db::handlers::{Courses, Enrollments, Students, repository::Repository};
use crate::db::models::{
    courses::{CourseCreateDBRequest, CourseDBResponse},
    enrollments::{EnrollmentCreateDBRequest, EnrollmentDBResponse},
    students::{StudentCreateDBRequest, StudentDBResponse},
};
use crate::types::{CourseId, StudentId};
use axum_test::TestServer;
use sqlx::PgPool;

pub async fn create_test_app(pool: PgPool) -> TestServer {
    let config = create_test_config();

    let app = crate::Application::new_with_pool(config, Some(pool))
        .await
        .expect("Failed to create application");

    app.into_test_server()
}

pub fn create_test_config() -> Config {
    Config {
        database_url: None,
        database: DatabaseConfig {
            // The pool is injected by the test harness, the URL is never dialled
            url: "postgres://localhost/escola_test".to_string(),
            pool: PoolSettings {
                max_connections: 2,
                min_connections: 1,
                ..Default::default()
            },
        },
        ..Default::default()
    }
}

pub async fn create_test_student(pool: &PgPool, name: &str, email: &str) -> StudentDBResponse {
    create_test_student_with_phone(pool, name, email, None).await
}

pub async fn create_test_student_with_phone(pool: &PgPool, name: &str, email: &str, phone: Option<&str>) -> StudentDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let mut repo = Students::new(&mut conn);

    let request = StudentCreateDBRequest {
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.map(str::to_string),
    };

    repo.create(&request).await.expect("Failed to create test student")
}

pub async fn create_test_course(pool: &PgPool, code: &str, name: &str, workload: i32) -> CourseDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let mut repo = Courses::new(&mut conn);

    let request = CourseCreateDBRequest {
        code: code.to_string(),
        name: name.to_string(),
        workload,
    };

    repo.create(&request).await.expect("Failed to create test course")
}

pub async fn create_test_enrollment(pool: &PgPool, student_id: StudentId, course_id: CourseId) -> EnrollmentDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let mut repo = Enrollments::new(&mut conn);

    repo.create(&EnrollmentCreateDBRequest { student_id, course_id })
        .await
        .expect("Failed to create test enrollment")
}

/// A small school: three students, two courses, and João then Maria enrolled in CS101.
pub struct SeedData {
    pub joao: StudentDBResponse,
    pub maria: StudentDBResponse,
    pub pedro: StudentDBResponse,
    pub cs101: CourseDBResponse,
    pub ee101: CourseDBResponse,
    pub enrollments: Vec<EnrollmentDBResponse>,
}

pub async fn seed_school(pool: &PgPool) -> SeedData {
    let joao = create_test_student_with_phone(pool, "João Silva", "joao.silva@example.com", Some("111111111")).await;
    let maria = create_test_student_with_phone(pool, "Maria Silva", "maria.silva@example.com", Some("222222222")).await;
    let pedro = create_test_student_with_phone(pool, "Pedro Santos", "pedro.santos@example.com", Some("333333333")).await;

    let cs101 = create_test_course(pool, "CS101", "Ciência da Computação", 3600).await;
    let ee101 = create_test_course(pool, "EE101", "Engenharia Elétrica", 4000).await;

    let enrollments = vec![
        create_test_enrollment(pool, joao.id, cs101.id).await,
        create_test_enrollment(pool, maria.id, cs101.id).await,
    ];

    SeedData {
        joao,
        maria,
        pedro,
        cs101,
        ee101,
        enrollments,
    }
}
