use crate::errors::{AppError, AttendanceError};
use crate::ledger::{Ledger, filter_rows};
use crate::models::{
    AddStudentRequest, AttendanceDay, AttendanceView, BulkExport, CourseOverview, DateQuery,
    LoginRequest, MarkQuery, NumberedRow, RangeQuery, ReportResponse, SaveDayRequest,
    SavedCountResponse, Student, TeacherProfile,
};
use crate::seed::SeedReport;
use crate::state::AppState;
use crate::stats::DateFilter;
use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    Json,
};
use chrono::Local;

// Store I/O is blocking, so each ledger call runs on the blocking pool while
// the ledger lock is held.
async fn with_ledger<T, F>(state: &AppState, op: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&Ledger) -> Result<T, AttendanceError> + Send + 'static,
{
    let ledger = state.ledger.clone().lock_owned().await;
    tokio::task::spawn_blocking(move || op(&ledger))
        .await
        .map_err(AppError::internal)?
        .map_err(AppError::from)
}

pub async fn get_teacher(State(state): State<AppState>) -> Result<Json<Option<TeacherProfile>>, AppError> {
    let teacher = with_ledger(&state, |ledger| Ok(ledger.teacher())).await?;
    Ok(Json(teacher))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TeacherProfile>, AppError> {
    let profile = with_ledger(&state, move |ledger| ledger.login(&payload.name, &payload.id)).await?;
    Ok(Json(profile))
}

pub async fn logout(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    with_ledger(&state, |ledger| ledger.logout()).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<CourseOverview>>, AppError> {
    let courses = with_ledger(&state, |ledger| Ok(ledger.course_overview())).await?;
    Ok(Json(courses))
}

pub async fn list_students(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<Vec<Student>>, AppError> {
    let roster = with_ledger(&state, move |ledger| Ok(ledger.roster(&course_id))).await?;
    Ok(Json(roster))
}

pub async fn add_student(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    Json(payload): Json<AddStudentRequest>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let student = with_ledger(&state, move |ledger| {
        ledger.add_student(&course_id, &payload.name, &payload.id)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn add_random_student(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let student = with_ledger(&state, move |ledger| ledger.add_random_sample_student(&course_id)).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn reset_students(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<Vec<Student>>, AppError> {
    let roster = with_ledger(&state, move |ledger| ledger.reset_roster_to_sample(&course_id)).await?;
    Ok(Json(roster))
}

pub async fn get_attendance(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    Query(query): Query<DateQuery>,
) -> Result<Json<AttendanceView>, AppError> {
    let date = date_or_today(query.date);
    let day = with_ledger(&state, move |ledger| ledger.get_day(&course_id, &date)).await?;

    let rows = filter_rows(&day.rows, query.q.as_deref().unwrap_or_default())
        .into_iter()
        .map(|(no, row)| NumberedRow {
            no,
            row: row.clone(),
        })
        .collect();
    Ok(Json(AttendanceView {
        course_id: day.course_id,
        date: day.date,
        saved: day.saved,
        rows,
    }))
}

pub async fn save_attendance(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    Query(query): Query<DateQuery>,
    Json(payload): Json<SaveDayRequest>,
) -> Result<Json<SavedCountResponse>, AppError> {
    let date = date_or_today(query.date);
    let response = with_ledger(&state, move |ledger| {
        ledger.save_day(&course_id, &date, payload.rows)?;
        Ok(SavedCountResponse {
            saved_dates: ledger.saved_date_count(&course_id),
            course_id,
        })
    })
    .await?;
    Ok(Json(response))
}

pub async fn mark_attendance(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    Query(query): Query<MarkQuery>,
) -> Result<Json<AttendanceDay>, AppError> {
    let date = date_or_today(query.date);
    let day = with_ledger(&state, move |ledger| {
        ledger.mark_day(&course_id, &date, query.status)
    })
    .await?;
    Ok(Json(day))
}

pub async fn saved_count(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<SavedCountResponse>, AppError> {
    let response = with_ledger(&state, move |ledger| {
        Ok(SavedCountResponse {
            saved_dates: ledger.saved_date_count(&course_id),
            course_id,
        })
    })
    .await?;
    Ok(Json(response))
}

pub async fn report(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<ReportResponse>, AppError> {
    build_report(&state, course_id, DateFilter::all()).await
}

pub async fn summary(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<ReportResponse>, AppError> {
    build_report(&state, course_id, DateFilter::bounded(query.from, query.to)).await
}

async fn build_report(
    state: &AppState,
    course_id: String,
    filter: DateFilter,
) -> Result<Json<ReportResponse>, AppError> {
    let response = with_ledger(state, move |ledger| {
        let aggregation = ledger.aggregate(&course_id, &filter)?;
        Ok(ReportResponse {
            course_id,
            from: filter.from,
            to: filter.to,
            dates_counted: aggregation.dates_counted,
            students: aggregation.students,
        })
    })
    .await?;
    Ok(Json(response))
}

pub async fn export_day(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    Query(query): Query<DateQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date = date_or_today(query.date);
    let file = with_ledger(&state, move |ledger| ledger.export_day(&course_id, &date)).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.file_name),
            ),
        ],
        file.content,
    ))
}

pub async fn export_all(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<BulkExport>, AppError> {
    let export = with_ledger(&state, move |ledger| ledger.export_all(&course_id)).await?;
    Ok(Json(export))
}

pub async fn clear_all(State(state): State<AppState>) -> Result<Json<SeedReport>, AppError> {
    let report = with_ledger(&state, |ledger| ledger.clear_all()).await?;
    Ok(Json(report))
}

fn date_or_today(date: Option<String>) -> String {
    date.map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(today_string)
}

fn today_string() -> String {
    Local::now().date_naive().to_string()
}
