use super::STUDENT_NOT_FOUND;
use crate::AppState;
use crate::api::extractors::{Path, ValidatedJson};
use crate::api::models::students::{StudentCreate, StudentResponse, StudentUpdate};
use crate::db::errors::DbError;
use crate::db::handlers::{Repository, Students};
use crate::errors::{Error, Result};
use crate::types::StudentId;
use axum::{Json, extract::State};

#[utoipa::path(
    get,
    path = "/alunos",
    tag = "alunos",
    summary = "List students",
    responses(
        (status = 200, description = "All students ordered by id", body = Vec<StudentResponse>),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_students(State(state): State<AppState>) -> Result<Json<Vec<StudentResponse>>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Students::new(&mut pool_conn);

    let students = repo.list().await?;
    Ok(Json(students.into_iter().map(StudentResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/alunos/{id}",
    tag = "alunos",
    summary = "Get student",
    params(("id" = i32, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student details", body = StudentResponse),
        (status = 404, description = "Student not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_student(State(state): State<AppState>, Path(id): Path<StudentId>) -> Result<Json<StudentResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Students::new(&mut pool_conn);

    let student = repo.get_by_id(id).await?.ok_or_else(|| Error::not_found(STUDENT_NOT_FOUND))?;
    Ok(Json(StudentResponse::from(student)))
}

#[utoipa::path(
    post,
    path = "/alunos",
    tag = "alunos",
    summary = "Create student",
    request_body = StudentCreate,
    responses(
        (status = 200, description = "Student created", body = StudentResponse),
        (status = 409, description = "Email already in use"),
        (status = 422, description = "Invalid request body"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_student(
    State(state): State<AppState>,
    ValidatedJson(create): ValidatedJson<StudentCreate>,
) -> Result<Json<StudentResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Students::new(&mut pool_conn);

    let student = repo.create(&create.into()).await?;
    Ok(Json(StudentResponse::from(student)))
}

#[utoipa::path(
    put,
    path = "/alunos/{id}",
    tag = "alunos",
    summary = "Update student",
    params(("id" = i32, Path, description = "Student ID")),
    request_body = StudentUpdate,
    responses(
        (status = 200, description = "Student updated", body = StudentResponse),
        (status = 404, description = "Student not found"),
        (status = 409, description = "Email already in use"),
        (status = 422, description = "Invalid request body"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
    ValidatedJson(update): ValidatedJson<StudentUpdate>,
) -> Result<Json<StudentResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Students::new(&mut pool_conn);

    let student = repo.update(id, &update.into()).await.map_err(|e| match e {
        DbError::NotFound => Error::not_found(STUDENT_NOT_FOUND),
        other => other.into(),
    })?;
    Ok(Json(StudentResponse::from(student)))
}

#[utoipa::path(
    delete,
    path = "/alunos/{id}",
    tag = "alunos",
    summary = "Delete student",
    description = "Deletes the student and returns the deleted record. Enrollments are not removed, \
                   but they stop appearing in enrollment listings.",
    params(("id" = i32, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Deleted student", body = StudentResponse),
        (status = 404, description = "Student not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_student(State(state): State<AppState>, Path(id): Path<StudentId>) -> Result<Json<StudentResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Students::new(&mut pool_conn);

    let student = repo.delete(id).await?.ok_or_else(|| Error::not_found(STUDENT_NOT_FOUND))?;
    Ok(Json(StudentResponse::from(student)))
}

#[utoipa::path(
    get,
    path = "/alunos/nome/{nome}",
    tag = "alunos",
    summary = "Search students by name",
    description = "Case-insensitive substring match on the student name.",
    params(("nome" = String, Path, description = "Part of the student name")),
    responses(
        (status = 200, description = "Matching students ordered by id", body = Vec<StudentResponse>),
        (status = 404, description = "No student matches"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn find_students_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<StudentResponse>>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Students::new(&mut pool_conn);

    let students = repo.find_by_name(&name).await?;
    if students.is_empty() {
        return Err(Error::not_found("Nenhum aluno encontrado com esse nome"));
    }

    Ok(Json(students.into_iter().map(StudentResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/alunos/email/{email}",
    tag = "alunos",
    summary = "Get student by email",
    params(("email" = String, Path, description = "Exact email address")),
    responses(
        (status = 200, description = "Student details", body = StudentResponse),
        (status = 404, description = "No student with this email"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_student_by_email(State(state): State<AppState>, Path(email): Path<String>) -> Result<Json<StudentResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Students::new(&mut pool_conn);

    let student = repo
        .get_by_email(&email)
        .await?
        .ok_or_else(|| Error::not_found("Nenhum aluno encontrado com esse email"))?;
    Ok(Json(StudentResponse::from(student)))
}

#[cfg(test)]
mod tests {
    use crate::api::models::students::StudentResponse;
    use crate::test_utils::*;
    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_students_empty(pool: PgPool) {
        let app = create_test_app(pool).await;

        let response = app.get("/alunos").await;
        response.assert_status_ok();
        assert!(response.json::<Vec<StudentResponse>>().is_empty());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_student(pool: PgPool) {
        let app = create_test_app(pool).await;

        let response = app
            .post("/alunos")
            .json(&json!({ "nome": "Ana Turing", "email": "ana@example.com", "telefone": "999999999" }))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert!(body["id"].as_i64().is_some());
        assert_eq!(body["nome"], "Ana Turing");
        assert_eq!(body["email"], "ana@example.com");
        assert_eq!(body["telefone"], "999999999");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_student_invalid_email(pool: PgPool) {
        let app = create_test_app(pool).await;

        let response = app
            .post("/alunos")
            .json(&json!({ "nome": "Teste", "email": "email_invalido" }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.json::<serde_json::Value>()["detail"].is_string());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_student_missing_field(pool: PgPool) {
        let app = create_test_app(pool).await;

        let response = app.post("/alunos").json(&json!({ "nome": "Sem Email" })).await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_student_duplicate_email(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        create_test_student(&pool, "João Silva", "joao@example.com").await;

        let response = app
            .post("/alunos")
            .json(&json!({ "nome": "Outro João", "email": "joao@example.com" }))
            .await;

        response.assert_status(StatusCode::CONFLICT);
        response.assert_json(&json!({ "detail": "Já existe um aluno com este email" }));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_get_student(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let seed = seed_school(&pool).await;

        let response = app.get(&format!("/alunos/{}", seed.joao.id)).await;
        response.assert_status_ok();
        let student: StudentResponse = response.json();
        assert_eq!(student.name, "João Silva");
        assert_eq!(student.email, "joao.silva@example.com");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_get_student_not_found(pool: PgPool) {
        let app = create_test_app(pool).await;

        let response = app.get("/alunos/999").await;
        response.assert_status_not_found();
        response.assert_json(&json!({ "detail": "Aluno não encontrado" }));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_get_student_non_numeric_id(pool: PgPool) {
        let app = create_test_app(pool).await;

        let response = app.get("/alunos/abc").await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.json::<serde_json::Value>()["detail"].is_string());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_student_partial(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let seed = seed_school(&pool).await;

        let response = app
            .put(&format!("/alunos/{}", seed.joao.id))
            .json(&json!({ "nome": "João Silva Atualizado" }))
            .await;

        response.assert_status_ok();
        let student: StudentResponse = response.json();
        assert_eq!(student.name, "João Silva Atualizado");
        assert_eq!(student.email, "joao.silva@example.com");
        assert_eq!(student.phone.as_deref(), Some("111111111"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_student_clears_phone_with_null(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let seed = seed_school(&pool).await;

        let response = app
            .put(&format!("/alunos/{}", seed.maria.id))
            .json(&json!({ "telefone": null }))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<StudentResponse>().phone, None);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_student_not_found(pool: PgPool) {
        let app = create_test_app(pool).await;

        let response = app.put("/alunos/999").json(&json!({ "nome": "Ninguém" })).await;
        response.assert_status_not_found();
        response.assert_json(&json!({ "detail": "Aluno não encontrado" }));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_student_email_collision(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let seed = seed_school(&pool).await;

        let response = app
            .put(&format!("/alunos/{}", seed.joao.id))
            .json(&json!({ "email": "maria.silva@example.com" }))
            .await;

        response.assert_status(StatusCode::CONFLICT);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_student_returns_record(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let seed = seed_school(&pool).await;

        let response = app.delete(&format!("/alunos/{}", seed.pedro.id)).await;
        response.assert_status_ok();
        assert_eq!(response.json::<StudentResponse>().name, "Pedro Santos");

        app.get(&format!("/alunos/{}", seed.pedro.id)).await.assert_status_not_found();
        app.delete(&format!("/alunos/{}", seed.pedro.id)).await.assert_status_not_found();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_find_students_by_name(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        seed_school(&pool).await;

        let response = app.get("/alunos/nome/silva").await;
        response.assert_status_ok();
        let names: Vec<String> = response.json::<Vec<StudentResponse>>().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["João Silva", "Maria Silva"]);

        let response = app.get("/alunos/nome/Inexistente").await;
        response.assert_status_not_found();
        response.assert_json(&json!({ "detail": "Nenhum aluno encontrado com esse nome" }));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_get_student_by_email(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        seed_school(&pool).await;

        let response = app.get("/alunos/email/maria.silva@example.com").await;
        response.assert_status_ok();
        assert_eq!(response.json::<StudentResponse>().name, "Maria Silva");

        let response = app.get("/alunos/email/ninguem@example.com").await;
        response.assert_status_not_found();
        response.assert_json(&json!({ "detail": "Nenhum aluno encontrado com esse email" }));
    }
}
