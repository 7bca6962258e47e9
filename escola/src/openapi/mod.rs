//! OpenAPI documentation for the school API, served at `/docs` (Scalar UI) and
//! `/api-docs/openapi.json`.

use crate::api::handlers::{courses, enrollments, students};
use crate::api::models::{
    courses::{CourseCreate, CourseResponse, CourseUpdate},
    enrollments::{CourseStudentsResponse, EnrollmentCreate, EnrollmentResponse, StudentCoursesResponse},
    students::{StudentCreate, StudentResponse, StudentUpdate},
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "API de Gestão Escolar",
        version = "1.0.0",
        description = "Endpoints para gerenciar alunos, cursos e matrículas em uma instituição de ensino. \
                       Every error response has the body `{\"detail\": \"<message>\"}`."
    ),
    paths(
        students::list_students,
        students::get_student,
        students::create_student,
        students::update_student,
        students::delete_student,
        students::find_students_by_name,
        students::get_student_by_email,
        courses::list_courses,
        courses::create_course,
        courses::get_course,
        courses::update_course,
        courses::delete_course,
        enrollments::create_enrollment,
        enrollments::update_enrollment,
        enrollments::list_enrollments,
        enrollments::list_courses_by_student_name,
        enrollments::list_students_by_course_code,
        enrollments::delete_enrollment,
    ),
    components(schemas(
        StudentCreate,
        StudentUpdate,
        StudentResponse,
        CourseCreate,
        CourseUpdate,
        CourseResponse,
        EnrollmentCreate,
        EnrollmentResponse,
        StudentCoursesResponse,
        CourseStudentsResponse,
    )),
    tags(
        (name = "alunos", description = "Student management"),
        (name = "cursos", description = "Course management"),
        (name = "matriculas", description = "Enrollments linking students to courses"),
    )
)]
pub struct ApiDoc;
