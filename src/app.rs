use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/teacher", get(handlers::get_teacher))
        .route("/api/login", post(handlers::login))
        .route("/api/logout", post(handlers::logout))
        .route("/api/courses", get(handlers::list_courses))
        .route(
            "/api/courses/:course_id/students",
            get(handlers::list_students).post(handlers::add_student),
        )
        .route("/api/courses/:course_id/students/random", post(handlers::add_random_student))
        .route("/api/courses/:course_id/students/reset", post(handlers::reset_students))
        .route(
            "/api/courses/:course_id/attendance",
            get(handlers::get_attendance).put(handlers::save_attendance),
        )
        .route("/api/courses/:course_id/attendance/mark", post(handlers::mark_attendance))
        .route("/api/courses/:course_id/saved-count", get(handlers::saved_count))
        .route("/api/courses/:course_id/report", get(handlers::report))
        .route("/api/courses/:course_id/summary", get(handlers::summary))
        .route("/api/courses/:course_id/export", get(handlers::export_day))
        .route("/api/courses/:course_id/export-all", get(handlers::export_all))
        .route("/api/clear", post(handlers::clear_all))
        .with_state(state)
}
