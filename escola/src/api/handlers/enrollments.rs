use super::{COURSE_NOT_FOUND, ENROLLMENT_NOT_FOUND, STUDENT_NOT_FOUND};
use crate::AppState;
use crate::api::extractors::{Path, ValidatedJson};
use crate::api::models::enrollments::{CourseStudentsResponse, EnrollmentCreate, EnrollmentResponse, StudentCoursesResponse};
use crate::db::errors::DbError;
use crate::db::handlers::{Courses, Enrollments, Repository, Students};
use crate::db::models::enrollments::EnrollmentDetailDBResponse;
use crate::errors::{Error, Result};
use crate::types::{CourseId, EnrollmentId, StudentId};
use axum::{Json, extract::State, http::StatusCode};
use sqlx::PgConnection;

const ALREADY_ENROLLED: &str = "Aluno já matriculado neste curso";
const PAIR_TAKEN: &str = "Este aluno já está matriculado neste curso";

/// Maps constraint violations from an enrollment write to the errors the pre-checks would
/// have produced. A duplicate that raced past the pair check hits `uq_aluno_curso`, and a
/// student or course deleted after the existence check hits the matching foreign key.
fn write_conflict(duplicate_message: &'static str) -> impl Fn(DbError) -> Error {
    move |e| {
        let missing = match &e {
            DbError::UniqueViolation { .. } => return Error::conflict(duplicate_message),
            DbError::ForeignKeyViolation { constraint: Some(c), .. } if c.contains("aluno_id") => Some(STUDENT_NOT_FOUND),
            DbError::ForeignKeyViolation { constraint: Some(c), .. } if c.contains("curso_id") => Some(COURSE_NOT_FOUND),
            _ => None,
        };

        match missing {
            Some(message) => Error::not_found(message),
            None => e.into(),
        }
    }
}

/// Both ends of an enrollment must exist before it is written
async fn ensure_references_exist(conn: &mut PgConnection, student_id: StudentId, course_id: CourseId) -> Result<()> {
    Students::new(&mut *conn)
        .get_by_id(student_id)
        .await?
        .ok_or_else(|| Error::not_found(STUDENT_NOT_FOUND))?;

    Courses::new(&mut *conn)
        .get_by_id(course_id)
        .await?
        .ok_or_else(|| Error::not_found(COURSE_NOT_FOUND))?;

    Ok(())
}

async fn load_detail(conn: &mut PgConnection, id: EnrollmentId) -> Result<EnrollmentDetailDBResponse> {
    Enrollments::new(conn).get_detail(id).await?.ok_or_else(|| Error::Internal {
        operation: format!("load enrollment {id} after writing it"),
    })
}

#[utoipa::path(
    post,
    path = "/matriculas",
    tag = "matriculas",
    summary = "Enroll a student in a course",
    request_body = EnrollmentCreate,
    responses(
        (status = 201, description = "Enrollment created", body = EnrollmentResponse),
        (status = 400, description = "Student already enrolled in this course"),
        (status = 404, description = "Student or course not found"),
        (status = 422, description = "Invalid request body"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_enrollment(
    State(state): State<AppState>,
    ValidatedJson(create): ValidatedJson<EnrollmentCreate>,
) -> Result<(StatusCode, Json<EnrollmentResponse>)> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    ensure_references_exist(&mut tx, create.student_id, create.course_id).await?;

    let mut repo = Enrollments::new(&mut tx);
    if repo.find_by_pair(create.student_id, create.course_id, None).await?.is_some() {
        return Err(Error::conflict(ALREADY_ENROLLED));
    }

    let enrollment = repo.create(&create.into()).await.map_err(write_conflict(ALREADY_ENROLLED))?;
    let detail = load_detail(&mut tx, enrollment.id).await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(EnrollmentResponse::from(detail))))
}

#[utoipa::path(
    put,
    path = "/matriculas/{id}",
    tag = "matriculas",
    summary = "Update enrollment",
    description = "Re-points an existing enrollment to another student and/or course.",
    params(("id" = i32, Path, description = "Enrollment ID")),
    request_body = EnrollmentCreate,
    responses(
        (status = 200, description = "Enrollment updated", body = EnrollmentResponse),
        (status = 400, description = "Another enrollment already holds this student/course pair"),
        (status = 404, description = "Enrollment, student or course not found"),
        (status = 422, description = "Invalid request body"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_enrollment(
    State(state): State<AppState>,
    Path(id): Path<EnrollmentId>,
    ValidatedJson(update): ValidatedJson<EnrollmentCreate>,
) -> Result<Json<EnrollmentResponse>> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    Enrollments::new(&mut tx)
        .get_by_id(id)
        .await?
        .ok_or_else(|| Error::not_found(ENROLLMENT_NOT_FOUND))?;

    ensure_references_exist(&mut tx, update.student_id, update.course_id).await?;

    let mut repo = Enrollments::new(&mut tx);
    if repo.find_by_pair(update.student_id, update.course_id, Some(id)).await?.is_some() {
        return Err(Error::conflict(PAIR_TAKEN));
    }

    repo.update(id, &update.into()).await.map_err(|e| match e {
        DbError::NotFound => Error::not_found(ENROLLMENT_NOT_FOUND),
        other => write_conflict(PAIR_TAKEN)(other),
    })?;
    let detail = load_detail(&mut tx, id).await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(EnrollmentResponse::from(detail)))
}

#[utoipa::path(
    get,
    path = "/matriculas",
    tag = "matriculas",
    summary = "List enrollments",
    description = "All enrollments with their student and course expanded, ordered by id.",
    responses(
        (status = 200, description = "All enrollments", body = Vec<EnrollmentResponse>),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_enrollments(State(state): State<AppState>) -> Result<Json<Vec<EnrollmentResponse>>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Enrollments::new(&mut pool_conn);

    let enrollments = repo.list_detailed().await?;
    Ok(Json(enrollments.into_iter().map(EnrollmentResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/matriculas/aluno/{nome}",
    tag = "matriculas",
    summary = "Courses of a student",
    description = "Finds the first student (lowest id) whose name contains the given text, \
                   case-insensitively, and lists the names of the courses they are enrolled in.",
    params(("nome" = String, Path, description = "Part of the student name")),
    responses(
        (status = 200, description = "Student name and course names", body = StudentCoursesResponse),
        (status = 404, description = "Student not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_courses_by_student_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<StudentCoursesResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let student = Students::new(&mut pool_conn)
        .find_by_name(&name)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| Error::not_found(STUDENT_NOT_FOUND))?;

    let courses = Enrollments::new(&mut pool_conn).course_names_for_student(student.id).await?;

    Ok(Json(StudentCoursesResponse {
        student: student.name,
        courses,
    }))
}

#[utoipa::path(
    get,
    path = "/matriculas/curso/{codigo}",
    tag = "matriculas",
    summary = "Students of a course",
    params(("codigo" = String, Path, description = "Course code")),
    responses(
        (status = 200, description = "Course name and student names", body = CourseStudentsResponse),
        (status = 404, description = "Course not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_students_by_course_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<CourseStudentsResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let course = Courses::new(&mut pool_conn)
        .get_by_code(&code)
        .await?
        .ok_or_else(|| Error::not_found(COURSE_NOT_FOUND))?;

    let students = Enrollments::new(&mut pool_conn).student_names_for_course(course.id).await?;

    Ok(Json(CourseStudentsResponse {
        course: course.name,
        students,
    }))
}

#[utoipa::path(
    delete,
    path = "/matriculas/{id}",
    tag = "matriculas",
    summary = "Delete enrollment",
    params(("id" = i32, Path, description = "Enrollment ID")),
    responses(
        (status = 204, description = "Enrollment deleted"),
        (status = 404, description = "Enrollment not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_enrollment(State(state): State<AppState>, Path(id): Path<EnrollmentId>) -> Result<StatusCode> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Enrollments::new(&mut pool_conn);

    repo.delete(id).await?.ok_or_else(|| Error::not_found(ENROLLMENT_NOT_FOUND))?;
    Ok(StatusCode::NO_CONTENT)
}
