//! Database repository for enrollments.
//!
//! Besides plain CRUD on `matriculas`, this repository owns the joined views used by the
//! enrollment endpoints. Deleting a student sets `aluno_id` to NULL on its enrollments, and
//! every joined query uses inner joins against `alunos` and `cursos`, so those rows never
//! show up in them.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::{
        courses::CourseDBResponse,
        enrollments::{EnrollmentCreateDBRequest, EnrollmentDBResponse, EnrollmentDetailDBResponse, EnrollmentUpdateDBRequest},
        students::StudentDBResponse,
    },
};
use crate::types::{CourseId, EnrollmentId, StudentId};
use sqlx::{FromRow, PgConnection};
use tracing::instrument;

const DETAIL_SELECT: &str = r#"
    SELECT
        m.id,
        a.id AS aluno_id,
        a.nome AS aluno_nome,
        a.email AS aluno_email,
        a.telefone AS aluno_telefone,
        c.id AS curso_id,
        c.codigo AS curso_codigo,
        c.nome AS curso_nome,
        c.carga_horaria AS curso_carga_horaria
    FROM matriculas m
    JOIN alunos a ON a.id = m.aluno_id
    JOIN cursos c ON c.id = m.curso_id
"#;

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct Enrollment {
    pub id: EnrollmentId,
    #[sqlx(rename = "aluno_id")]
    pub student_id: Option<StudentId>,
    #[sqlx(rename = "curso_id")]
    pub course_id: CourseId,
}

impl From<Enrollment> for EnrollmentDBResponse {
    fn from(enrollment: Enrollment) -> Self {
        Self {
            id: enrollment.id,
            student_id: enrollment.student_id,
            course_id: enrollment.course_id,
        }
    }
}

// Flattened row produced by DETAIL_SELECT
#[derive(Debug, Clone, FromRow)]
struct EnrollmentDetail {
    pub id: EnrollmentId,
    pub aluno_id: StudentId,
    pub aluno_nome: String,
    pub aluno_email: String,
    pub aluno_telefone: Option<String>,
    pub curso_id: CourseId,
    pub curso_codigo: String,
    pub curso_nome: String,
    pub curso_carga_horaria: i32,
}

impl From<EnrollmentDetail> for EnrollmentDetailDBResponse {
    fn from(row: EnrollmentDetail) -> Self {
        Self {
            id: row.id,
            student: StudentDBResponse {
                id: row.aluno_id,
                name: row.aluno_nome,
                email: row.aluno_email,
                phone: row.aluno_telefone,
            },
            course: CourseDBResponse {
                id: row.curso_id,
                code: row.curso_codigo,
                name: row.curso_nome,
                workload: row.curso_carga_horaria,
            },
        }
    }
}

pub struct Enrollments<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Enrollments<'c> {
    type CreateRequest = EnrollmentCreateDBRequest;
    type UpdateRequest = EnrollmentUpdateDBRequest;
    type Response = EnrollmentDBResponse;
    type Id = EnrollmentId;

    #[instrument(skip(self), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let enrollment = sqlx::query_as::<_, Enrollment>(
            r#"
            INSERT INTO matriculas (aluno_id, curso_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(request.student_id)
        .bind(request.course_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(enrollment.into())
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let enrollment = sqlx::query_as::<_, Enrollment>("SELECT * FROM matriculas WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(enrollment.map(EnrollmentDBResponse::from))
    }

    #[instrument(skip(self), err)]
    async fn list(&mut self) -> Result<Vec<Self::Response>> {
        let enrollments = sqlx::query_as::<_, Enrollment>("SELECT * FROM matriculas ORDER BY id")
            .fetch_all(&mut *self.db)
            .await?;

        Ok(enrollments.into_iter().map(EnrollmentDBResponse::from).collect())
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let enrollment = sqlx::query_as::<_, Enrollment>("DELETE FROM matriculas WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(enrollment.map(EnrollmentDBResponse::from))
    }

    #[instrument(skip(self), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let enrollment = sqlx::query_as::<_, Enrollment>(
            r#"
            UPDATE matriculas SET
                aluno_id = $2,
                curso_id = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.student_id)
        .bind(request.course_id)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(enrollment.into())
    }
}

impl<'c> Enrollments<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Find the enrollment holding a (student, course) pair, ignoring the enrollment `excluding`
    /// so that re-saving an enrollment with its own pair is not reported as a collision.
    #[instrument(skip(self), err)]
    pub async fn find_by_pair(
        &mut self,
        student_id: StudentId,
        course_id: CourseId,
        excluding: Option<EnrollmentId>,
    ) -> Result<Option<EnrollmentDBResponse>> {
        let enrollment = sqlx::query_as::<_, Enrollment>(
            r#"
            SELECT * FROM matriculas
            WHERE aluno_id = $1
              AND curso_id = $2
              AND ($3::INTEGER IS NULL OR id <> $3)
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .bind(excluding)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(enrollment.map(EnrollmentDBResponse::from))
    }

    /// Fetch one enrollment with its student and course expanded
    #[instrument(skip(self), err)]
    pub async fn get_detail(&mut self, id: EnrollmentId) -> Result<Option<EnrollmentDetailDBResponse>> {
        let query = format!("{DETAIL_SELECT} WHERE m.id = $1");
        let detail = sqlx::query_as::<_, EnrollmentDetail>(&query)
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(detail.map(EnrollmentDetailDBResponse::from))
    }

    /// List every enrollment with its student and course expanded, in a single query
    #[instrument(skip(self), err)]
    pub async fn list_detailed(&mut self) -> Result<Vec<EnrollmentDetailDBResponse>> {
        let query = format!("{DETAIL_SELECT} ORDER BY m.id");
        let details = sqlx::query_as::<_, EnrollmentDetail>(&query)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(details.into_iter().map(EnrollmentDetailDBResponse::from).collect())
    }

    /// Names of the courses a student is enrolled in, in enrollment order
    #[instrument(skip(self), err)]
    pub async fn course_names_for_student(&mut self, student_id: StudentId) -> Result<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT c.nome
            FROM matriculas m
            JOIN cursos c ON c.id = m.curso_id
            WHERE m.aluno_id = $1
            ORDER BY m.id
            "#,
        )
        .bind(student_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(names)
    }

    /// Names of the students enrolled in a course, in enrollment order
    #[instrument(skip(self), err)]
    pub async fn student_names_for_course(&mut self, course_id: CourseId) -> Result<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT a.nome
            FROM matriculas m
            JOIN alunos a ON a.id = m.aluno_id
            WHERE m.curso_id = $1
            ORDER BY m.id
            "#,
        )
        .bind(course_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::handlers::Students;
    use crate::test_utils::{create_test_course, create_test_enrollment, create_test_student};
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_duplicate_pair_is_unique_violation(pool: PgPool) {
        let student = create_test_student(&pool, "João Silva", "joao@example.com").await;
        let course = create_test_course(&pool, "CS101", "Ciência da Computação", 3600).await;
        create_test_enrollment(&pool, student.id, course.id).await;

        let mut conn = pool.acquire().await.unwrap();
        let err = Enrollments::new(&mut conn)
            .create(&EnrollmentCreateDBRequest {
                student_id: student.id,
                course_id: course.id,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::UniqueViolation { ref constraint, .. } if constraint.as_deref() == Some("uq_aluno_curso")
        ));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_find_by_pair_excludes_self(pool: PgPool) {
        let student = create_test_student(&pool, "João Silva", "joao@example.com").await;
        let course = create_test_course(&pool, "CS101", "Ciência da Computação", 3600).await;
        let enrollment = create_test_enrollment(&pool, student.id, course.id).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Enrollments::new(&mut conn);

        assert_eq!(repo.find_by_pair(student.id, course.id, None).await.unwrap(), Some(enrollment));
        assert_eq!(repo.find_by_pair(student.id, course.id, Some(enrollment.id)).await.unwrap(), None);
        assert_eq!(repo.find_by_pair(student.id, 999, None).await.unwrap(), None);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_repoints_in_place(pool: PgPool) {
        let student = create_test_student(&pool, "João Silva", "joao@example.com").await;
        let course = create_test_course(&pool, "CS101", "Ciência da Computação", 3600).await;
        let other_course = create_test_course(&pool, "EE101", "Engenharia Elétrica", 4000).await;
        let enrollment = create_test_enrollment(&pool, student.id, course.id).await;

        let mut conn = pool.acquire().await.unwrap();
        let updated = Enrollments::new(&mut conn)
            .update(
                enrollment.id,
                &EnrollmentUpdateDBRequest {
                    student_id: student.id,
                    course_id: other_course.id,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, enrollment.id);
        assert_eq!(updated.course_id, other_course.id);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_detail_views_expand_and_order(pool: PgPool) {
        let joao = create_test_student(&pool, "João Silva", "joao@example.com").await;
        let maria = create_test_student(&pool, "Maria Silva", "maria@example.com").await;
        let cs = create_test_course(&pool, "CS101", "Ciência da Computação", 3600).await;
        let ee = create_test_course(&pool, "EE101", "Engenharia Elétrica", 4000).await;

        let first = create_test_enrollment(&pool, joao.id, ee.id).await;
        create_test_enrollment(&pool, maria.id, cs.id).await;
        create_test_enrollment(&pool, joao.id, cs.id).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Enrollments::new(&mut conn);

        let detail = repo.get_detail(first.id).await.unwrap().unwrap();
        assert_eq!(detail.student, joao);
        assert_eq!(detail.course, ee);

        let all = repo.list_detailed().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, first.id);

        assert_eq!(
            repo.course_names_for_student(joao.id).await.unwrap(),
            vec!["Engenharia Elétrica".to_string(), "Ciência da Computação".to_string()]
        );
        assert_eq!(
            repo.student_names_for_course(cs.id).await.unwrap(),
            vec!["Maria Silva".to_string(), "João Silva".to_string()]
        );
        assert!(repo.student_names_for_course(999).await.unwrap().is_empty());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_student_delete_hides_enrollments_from_joined_views(pool: PgPool) {
        let student = create_test_student(&pool, "Ana Turing", "ana@example.com").await;
        let course = create_test_course(&pool, "ADS01", "Análise e Des. de Sistemas", 2800).await;
        let enrollment = create_test_enrollment(&pool, student.id, course.id).await;

        let mut conn = pool.acquire().await.unwrap();
        Students::new(&mut conn).delete(student.id).await.unwrap();

        let mut repo = Enrollments::new(&mut conn);
        // The row itself survives with the student reference cleared
        let orphan = repo.get_by_id(enrollment.id).await.unwrap().unwrap();
        assert_eq!(orphan.student_id, None);
        assert_eq!(orphan.course_id, course.id);
        // ...but none of the joined views return it
        assert_eq!(repo.get_detail(enrollment.id).await.unwrap(), None);
        assert!(repo.list_detailed().await.unwrap().is_empty());
        assert!(repo.student_names_for_course(course.id).await.unwrap().is_empty());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_with_missing_student_is_foreign_key_violation(pool: PgPool) {
        let course = create_test_course(&pool, "CS101", "Ciência da Computação", 3600).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Enrollments::new(&mut conn);
        let err = repo
            .create(&EnrollmentCreateDBRequest {
                student_id: 424242,
                course_id: course.id,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::ForeignKeyViolation { ref table, .. } if table.as_deref() == Some("matriculas")
        ));
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_to_missing_student_is_foreign_key_violation(pool: PgPool) {
        let student = create_test_student(&pool, "João Silva", "joao@example.com").await;
        let course = create_test_course(&pool, "CS101", "Ciência da Computação", 3600).await;
        let enrollment = create_test_enrollment(&pool, student.id, course.id).await;

        let mut conn = pool.acquire().await.unwrap();
        let err = Enrollments::new(&mut conn)
            .update(
                enrollment.id,
                &EnrollmentUpdateDBRequest {
                    student_id: 424242,
                    course_id: course.id,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
