//! Database repository for courses.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::courses::{CourseCreateDBRequest, CourseDBResponse, CourseUpdateDBRequest},
};
use crate::types::CourseId;
use sqlx::{Connection, FromRow, PgConnection};
use tracing::{debug, instrument};

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct Course {
    pub id: CourseId,
    #[sqlx(rename = "codigo")]
    pub code: String,
    #[sqlx(rename = "nome")]
    pub name: String,
    #[sqlx(rename = "carga_horaria")]
    pub workload: i32,
}

impl From<Course> for CourseDBResponse {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            code: course.code,
            name: course.name,
            workload: course.workload,
        }
    }
}

pub struct Courses<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Courses<'c> {
    type CreateRequest = CourseCreateDBRequest;
    type UpdateRequest = CourseUpdateDBRequest;
    type Response = CourseDBResponse;
    type Id = CourseId;

    #[instrument(skip(self, request), fields(code = %request.code), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO cursos (codigo, nome, carga_horaria)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&request.code)
        .bind(&request.name)
        .bind(request.workload)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(course.into())
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let course = sqlx::query_as::<_, Course>("SELECT * FROM cursos WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(course.map(CourseDBResponse::from))
    }

    #[instrument(skip(self), err)]
    async fn list(&mut self) -> Result<Vec<Self::Response>> {
        let courses = sqlx::query_as::<_, Course>("SELECT * FROM cursos ORDER BY id")
            .fetch_all(&mut *self.db)
            .await?;

        Ok(courses.into_iter().map(CourseDBResponse::from).collect())
    }

    /// Deletes the course together with every enrollment that references it.
    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        // Enrollments and course go together or not at all, whatever connection we were given.
        let mut tx = self.db.begin().await?;

        // Locking the row blocks concurrent enrollment inserts (their FK check needs a key
        // share lock) until the cascade below has committed.
        let exists = sqlx::query_scalar::<_, CourseId>("SELECT id FROM cursos WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        if exists.is_none() {
            return Ok(None);
        }

        let enrollments = sqlx::query("DELETE FROM matriculas WHERE curso_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let course = sqlx::query_as::<_, Course>("DELETE FROM cursos WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(
            course_id = id,
            enrollments_removed = enrollments.rows_affected(),
            "Deleted course and its enrollments"
        );

        Ok(Some(course.into()))
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            UPDATE cursos SET
                codigo = COALESCE($2, codigo),
                nome = COALESCE($3, nome),
                carga_horaria = COALESCE($4, carga_horaria)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.code.as_deref())
        .bind(request.name.as_deref())
        .bind(request.workload)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(course.into())
    }
}

impl<'c> Courses<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_code(&mut self, code: &str) -> Result<Option<CourseDBResponse>> {
        let course = sqlx::query_as::<_, Course>("SELECT * FROM cursos WHERE codigo = $1")
            .bind(code)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(course.map(CourseDBResponse::from))
    }
}
