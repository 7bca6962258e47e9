use super::COURSE_NOT_FOUND;
use crate::AppState;
use crate::api::extractors::{Path, ValidatedJson};
use crate::api::models::courses::{CourseCreate, CourseResponse, CourseUpdate};
use crate::db::errors::DbError;
use crate::db::handlers::{Courses, Repository};
use crate::errors::{Error, Result};
use crate::types::CourseId;
use axum::{Json, extract::State};

#[utoipa::path(
    get,
    path = "/cursos",
    tag = "cursos",
    summary = "List courses",
    responses(
        (status = 200, description = "All courses ordered by id", body = Vec<CourseResponse>),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<CourseResponse>>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Courses::new(&mut pool_conn);

    let courses = repo.list().await?;
    Ok(Json(courses.into_iter().map(CourseResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/cursos",
    tag = "cursos",
    summary = "Create course",
    request_body = CourseCreate,
    responses(
        (status = 200, description = "Course created", body = CourseResponse),
        (status = 409, description = "Course code already in use"),
        (status = 422, description = "Invalid request body"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_course(
    State(state): State<AppState>,
    ValidatedJson(create): ValidatedJson<CourseCreate>,
) -> Result<Json<CourseResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Courses::new(&mut pool_conn);

    let course = repo.create(&create.into()).await?;
    Ok(Json(CourseResponse::from(course)))
}

#[utoipa::path(
    get,
    path = "/cursos/{codigo}",
    tag = "cursos",
    summary = "Get course by code",
    params(("codigo" = String, Path, description = "Course code (exact, case-sensitive)")),
    responses(
        (status = 200, description = "Course details", body = CourseResponse),
        (status = 404, description = "No course with this code"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_course(State(state): State<AppState>, Path(code): Path<String>) -> Result<Json<CourseResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Courses::new(&mut pool_conn);

    let course = repo
        .get_by_code(&code)
        .await?
        .ok_or_else(|| Error::not_found("Nenhum curso encontrado com esse código"))?;
    Ok(Json(CourseResponse::from(course)))
}

#[utoipa::path(
    put,
    path = "/cursos/{codigo}",
    tag = "cursos",
    summary = "Update course",
    params(("codigo" = String, Path, description = "Current course code")),
    request_body = CourseUpdate,
    responses(
        (status = 200, description = "Course updated", body = CourseResponse),
        (status = 404, description = "Course not found"),
        (status = 409, description = "New course code already in use"),
        (status = 422, description = "Invalid request body"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_course(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ValidatedJson(update): ValidatedJson<CourseUpdate>,
) -> Result<Json<CourseResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Courses::new(&mut pool_conn);

    let existing = repo
        .get_by_code(&code)
        .await?
        .ok_or_else(|| Error::not_found(COURSE_NOT_FOUND))?;

    // A concurrent delete between the lookup and the update still reports as not found
    let course = repo.update(existing.id, &update.into()).await.map_err(|e| match e {
        DbError::NotFound => Error::not_found(COURSE_NOT_FOUND),
        other => other.into(),
    })?;
    Ok(Json(CourseResponse::from(course)))
}

#[utoipa::path(
    delete,
    path = "/cursos/{id}",
    tag = "cursos",
    summary = "Delete course",
    description = "Deletes every enrollment in the course and then the course itself, atomically. \
                   Returns the deleted course.",
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Deleted course", body = CourseResponse),
        (status = 404, description = "Course not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_course(State(state): State<AppState>, Path(id): Path<CourseId>) -> Result<Json<CourseResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Courses::new(&mut pool_conn);

    let course = repo.delete(id).await?.ok_or_else(|| Error::not_found(COURSE_NOT_FOUND))?;
    Ok(Json(CourseResponse::from(course)))
}
