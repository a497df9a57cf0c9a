//! Lesson meeting routes

use std::sync::Arc;
use std::time::Instant;

use acelab_domain::{Lesson, LessonMeetingRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;

use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::utils::logging::log_request_outcome;
use crate::AppContext;

#[derive(Debug, Serialize)]
pub struct CreateMeetingResponse {
    pub success: bool,
    pub lesson: Lesson,
    pub meeting_link: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CancelMeetingResponse {
    pub success: bool,
    pub lesson: Lesson,
    pub provider_deleted: bool,
}

/// `POST /api/lessons/{id}/create-google-meet`
pub async fn create_google_meet(
    State(ctx): State<Arc<AppContext>>,
    CurrentUser(user_id): CurrentUser,
    Path(lesson_id): Path<i64>,
    payload: Result<Json<LessonMeetingRequest>, JsonRejection>,
) -> Result<Json<CreateMeetingResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError {
        status: StatusCode::UNPROCESSABLE_ENTITY,
        message: rejection.body_text(),
        needs_auth: false,
    })?;

    let start = Instant::now();
    let result =
        ctx.lesson_meetings.create_meeting_for_lesson(user_id, lesson_id, &request).await;
    log_request_outcome("lessons::create_google_meet", start.elapsed(), result.as_ref().err());

    let lesson = result.map_err(|err| ApiError::with_context(&err, "Failed to create Google Meet"))?;
    Ok(Json(CreateMeetingResponse {
        success: true,
        meeting_link: lesson.meeting_link.clone(),
        lesson,
    }))
}

/// `DELETE /api/lessons/{id}/google-meet`
pub async fn delete_google_meet(
    State(ctx): State<Arc<AppContext>>,
    CurrentUser(user_id): CurrentUser,
    Path(lesson_id): Path<i64>,
) -> Result<Json<CancelMeetingResponse>, ApiError> {
    let start = Instant::now();
    let result = ctx.lesson_meetings.cancel_meeting_for_lesson(user_id, lesson_id).await;
    log_request_outcome("lessons::delete_google_meet", start.elapsed(), result.as_ref().err());

    let (lesson, provider_deleted) =
        result.map_err(|err| ApiError::with_context(&err, "Failed to cancel Google Meet"))?;
    Ok(Json(CancelMeetingResponse { success: true, lesson, provider_deleted }))
}
