//! Database repository for students.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::students::{StudentCreateDBRequest, StudentDBResponse, StudentUpdateDBRequest},
};
use crate::types::{StudentId, escape_like};
use sqlx::{FromRow, PgConnection};
use tracing::instrument;

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct Student {
    pub id: StudentId,
    #[sqlx(rename = "nome")]
    pub name: String,
    pub email: String,
    #[sqlx(rename = "telefone")]
    pub phone: Option<String>,
}

impl From<Student> for StudentDBResponse {
    fn from(student: Student) -> Self {
        Self {
            id: student.id,
            name: student.name,
            email: student.email,
            phone: student.phone,
        }
    }
}

pub struct Students<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Students<'c> {
    type CreateRequest = StudentCreateDBRequest;
    type UpdateRequest = StudentUpdateDBRequest;
    type Response = StudentDBResponse;
    type Id = StudentId;

    #[instrument(skip(self, request), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        // Email uniqueness is left to the alunos_email_key constraint
        let student = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO alunos (nome, email, telefone)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(&request.email)
        .bind(request.phone.as_deref())
        .fetch_one(&mut *self.db)
        .await?;

        Ok(student.into())
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let student = sqlx::query_as::<_, Student>("SELECT * FROM alunos WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(student.map(StudentDBResponse::from))
    }

    #[instrument(skip(self), err)]
    async fn list(&mut self) -> Result<Vec<Self::Response>> {
        let students = sqlx::query_as::<_, Student>("SELECT * FROM alunos ORDER BY id")
            .fetch_all(&mut *self.db)
            .await?;

        Ok(students.into_iter().map(StudentDBResponse::from).collect())
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        // Enrollments are deliberately left in place; reads join against alunos and skip them
        let student = sqlx::query_as::<_, Student>("DELETE FROM alunos WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(student.map(StudentDBResponse::from))
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            UPDATE alunos SET
                nome = COALESCE($2, nome),
                email = COALESCE($3, email),
                telefone = CASE
                    WHEN $4 THEN $5
                    ELSE telefone
                END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.name.as_deref())
        .bind(request.email.as_deref())
        // telefone
        .bind(request.phone.is_some())
        .bind(request.phone.as_ref().and_then(|inner| inner.as_deref()))
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(student.into())
    }
}

impl<'c> Students<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Case-insensitive substring search on the student's name, ordered by ID
    #[instrument(skip(self), err)]
    pub async fn find_by_name(&mut self, name: &str) -> Result<Vec<StudentDBResponse>> {
        let students = sqlx::query_as::<_, Student>("SELECT * FROM alunos WHERE nome ILIKE '%' || $1 || '%' ORDER BY id")
            .bind(escape_like(name))
            .fetch_all(&mut *self.db)
            .await?;

        Ok(students.into_iter().map(StudentDBResponse::from).collect())
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_email(&mut self, email: &str) -> Result<Option<StudentDBResponse>> {
        let student = sqlx::query_as::<_, Student>("SELECT * FROM alunos WHERE email = $1")
            .bind(email)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(student.map(StudentDBResponse::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    fn student(name: &str, email: &str) -> StudentCreateDBRequest {
        StudentCreateDBRequest {
            name: name.to_string(),
            email: email.to_string(),
            phone: Some("111111111".to_string()),
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_and_get_student(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Students::new(&mut conn);

        let created = repo.create(&student("João Silva", "joao.silva@example.com")).await.unwrap();
        assert_eq!(created.name, "João Silva");
        assert_eq!(created.email, "joao.silva@example.com");
        assert_eq!(created.phone.as_deref(), Some("111111111"));

        let fetched = repo.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_empty(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Students::new(&mut conn);

        assert!(repo.list().await.unwrap().is_empty());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_duplicate_email_is_unique_violation(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Students::new(&mut conn);

        repo.create(&student("Ana", "ana@example.com")).await.unwrap();
        let err = repo.create(&student("Outra Ana", "ana@example.com")).await.unwrap_err();

        match err {
            DbError::UniqueViolation { table, constraint, .. } => {
                assert_eq!(table.as_deref(), Some("alunos"));
                assert_eq!(constraint.as_deref(), Some("alunos_email_key"));
            }
            other => panic!("expected unique violation, got {other:?}"),
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_partial_update_keeps_unset_fields(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Students::new(&mut conn);

        let created = repo.create(&student("Maria Silva", "maria@example.com")).await.unwrap();

        let updated = repo
            .update(
                created.id,
                &StudentUpdateDBRequest {
                    name: Some("Maria Souza".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Maria Souza");
        assert_eq!(updated.email, "maria@example.com");
        assert_eq!(updated.phone.as_deref(), Some("111111111"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_can_clear_phone(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Students::new(&mut conn);

        let created = repo.create(&student("Pedro Santos", "pedro@example.com")).await.unwrap();

        let updated = repo
            .update(
                created.id,
                &StudentUpdateDBRequest {
                    phone: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.phone, None);
        assert_eq!(updated.name, "Pedro Santos");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_missing_student(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Students::new(&mut conn);

        let result = repo.update(999, &StudentUpdateDBRequest::default()).await;
        assert!(matches!(result, Err(DbError::NotFound)));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_returns_previous_row(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Students::new(&mut conn);

        let created = repo.create(&student("Ana Turing", "ana.turing@example.com")).await.unwrap();

        let deleted = repo.delete(created.id).await.unwrap();
        assert_eq!(deleted, Some(created.clone()));
        assert_eq!(repo.get_by_id(created.id).await.unwrap(), None);
        assert_eq!(repo.delete(created.id).await.unwrap(), None);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_find_by_name_is_case_insensitive_and_ordered(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Students::new(&mut conn);

        let joao = repo.create(&student("João Silva", "joao@example.com")).await.unwrap();
        let maria = repo.create(&student("Maria Silva", "maria@example.com")).await.unwrap();
        repo.create(&student("Pedro Santos", "pedro@example.com")).await.unwrap();

        let found = repo.find_by_name("silva").await.unwrap();
        let ids: Vec<_> = found.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![joao.id, maria.id]);

        assert!(repo.find_by_name("Inexistente").await.unwrap().is_empty());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_find_by_name_treats_wildcards_literally(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Students::new(&mut conn);

        repo.create(&student("João Silva", "joao@example.com")).await.unwrap();

        assert!(repo.find_by_name("%").await.unwrap().is_empty());
        assert!(repo.find_by_name("_").await.unwrap().is_empty());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_get_by_email_is_exact(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Students::new(&mut conn);

        let created = repo.create(&student("João Silva", "joao@example.com")).await.unwrap();

        assert_eq!(repo.get_by_email("joao@example.com").await.unwrap(), Some(created));
        assert_eq!(repo.get_by_email("joao@example").await.unwrap(), None);
    }
}
