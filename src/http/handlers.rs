use super::state::AppState;
use crate::error::{InterviewError, SetupIssue};
use crate::interview::{decode_payload, CvDocument, SetupRequest};
use crate::session::{ResultsSummary, SessionSnapshot};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CvUpload {
    pub file_name: String,
    pub content_type: String,
    /// Base64 file contents, optionally as a data URI
    pub data: String,
}

#[derive(Debug, Deserialize)]
pub struct SetupBody {
    pub job_description: Option<String>,
    pub cv: Option<CvUpload>,
}

#[derive(Debug, Deserialize)]
pub struct CodingStageBody {
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct SubmitCodeBody {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct CodingPromptResponse {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub title: String,
    pub description: String,
}

/// Handler error carrying the session failure
pub struct ApiError(InterviewError);

impl From<InterviewError> for ApiError {
    fn from(err: InterviewError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            InterviewError::InvalidSetup(_)
            | InterviewError::MissingResponse { .. }
            | InterviewError::EmptyCode
            | InterviewError::RecordingInProgress => StatusCode::BAD_REQUEST,
            InterviewError::InvalidStage { .. } | InterviewError::Busy => StatusCode::CONFLICT,
            InterviewError::GenerationFailed(_)
            | InterviewError::SubmissionFailed(_)
            | InterviewError::FetchFailed(_)
            | InterviewError::EvaluationFailed(_) => StatusCode::BAD_GATEWAY,
            InterviewError::EncodingFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            InterviewError::DeviceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        warn!("Request failed ({}): {}", status, self.0);

        let notice = self.0.notice();
        (
            status,
            Json(ErrorResponse {
                error: self.0.kind().to_string(),
                message: self.0.to_string(),
                title: notice.title,
                description: notice.description,
            }),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

// ============================================================================
// Handlers
// ============================================================================

/// GET /session
/// Current session snapshot
pub async fn get_session(State(state): State<AppState>) -> ApiResult<Json<SessionSnapshot>> {
    let session = state.read().await;
    Ok(Json(session.snapshot()))
}

/// POST /session/coding-stage
/// Enable or disable the coding challenge (setup only)
pub async fn set_coding_stage(
    State(state): State<AppState>,
    Json(body): Json<CodingStageBody>,
) -> ApiResult<Json<SessionSnapshot>> {
    let mut session = state.session()?;
    session.set_coding_stage(body.enabled)?;
    Ok(Json(session.snapshot()))
}

/// POST /session/setup
/// Complete setup; the body is optional for a fixed question set
pub async fn begin_session(
    State(state): State<AppState>,
    body: Option<Json<SetupBody>>,
) -> ApiResult<Json<SessionSnapshot>> {
    let intake = body.map(|Json(body)| setup_request(body)).transpose()?;

    let mut session = state.session()?;
    session.begin(intake).await?;

    info!("Session {} entered questioning", session.id());
    Ok(Json(session.snapshot()))
}

fn setup_request(body: SetupBody) -> Result<SetupRequest, InterviewError> {
    let cv = body
        .cv
        .map(|upload| {
            let bytes = decode_payload(&upload.data).map_err(|e| {
                warn!("Rejected CV upload {}: {:#}", upload.file_name, e);
                InterviewError::InvalidSetup(SetupIssue::MissingCv)
            })?;
            Ok::<_, InterviewError>(CvDocument {
                file_name: upload.file_name,
                content_type: upload.content_type,
                bytes,
            })
        })
        .transpose()?;

    Ok(SetupRequest {
        job_description: body.job_description.unwrap_or_default(),
        cv,
    })
}

/// POST /session/recording/start
pub async fn start_recording(State(state): State<AppState>) -> ApiResult<Json<SessionSnapshot>> {
    let mut session = state.session()?;
    session.start_recording().await?;
    Ok(Json(session.snapshot()))
}

/// POST /session/recording/stop
pub async fn stop_recording(State(state): State<AppState>) -> ApiResult<Json<SessionSnapshot>> {
    let mut session = state.session()?;
    session.stop_recording().await?;
    Ok(Json(session.snapshot()))
}

/// GET /session/responses/:question_id/audio
/// Playback of the stored answer
pub async fn get_response_audio(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
) -> ApiResult<Response> {
    let session = state.read().await;

    match session.artifact_for(&question_id) {
        Some(artifact) => Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, artifact.mime_type.clone())],
            artifact.data.clone(),
        )
            .into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "not_found".to_string(),
                message: format!("No response recorded for question {}", question_id),
                title: "No recording found".to_string(),
                description: "This question has not been answered yet.".to_string(),
            }),
        )
            .into_response()),
    }
}

/// POST /session/next
pub async fn next_question(State(state): State<AppState>) -> ApiResult<Json<SessionSnapshot>> {
    let mut session = state.session()?;
    session.next().await?;
    Ok(Json(session.snapshot()))
}

/// POST /session/previous
pub async fn previous_question(
    State(state): State<AppState>,
) -> ApiResult<Json<SessionSnapshot>> {
    let mut session = state.session()?;
    session.previous().await?;
    Ok(Json(session.snapshot()))
}

/// POST /session/submit
/// Submit all answers from the last question
pub async fn submit_answers(State(state): State<AppState>) -> ApiResult<Json<SessionSnapshot>> {
    let mut session = state.session()?;
    session.submit().await?;
    Ok(Json(session.snapshot()))
}

/// GET /session/coding/prompt
/// Coding prompt, fetched on first request
pub async fn get_coding_prompt(
    State(state): State<AppState>,
) -> ApiResult<Json<CodingPromptResponse>> {
    let mut session = state.session()?;
    let prompt = session.load_coding_prompt().await?;
    Ok(Json(CodingPromptResponse { prompt }))
}

/// POST /session/coding/prompt/refetch
pub async fn refetch_coding_prompt(
    State(state): State<AppState>,
) -> ApiResult<Json<CodingPromptResponse>> {
    let mut session = state.session()?;
    let prompt = session.refetch_coding_prompt().await?;
    Ok(Json(CodingPromptResponse { prompt }))
}

/// POST /session/coding/submit
pub async fn submit_code(
    State(state): State<AppState>,
    Json(body): Json<SubmitCodeBody>,
) -> ApiResult<Json<SessionSnapshot>> {
    let mut session = state.session()?;
    session.submit_code(&body.code).await?;
    Ok(Json(session.snapshot()))
}

/// GET /session/results
pub async fn get_results(State(state): State<AppState>) -> ApiResult<Json<ResultsSummary>> {
    let session = state.read().await;
    session.results().map(Json).ok_or_else(|| {
        ApiError::from(InterviewError::InvalidStage {
            action: "view results",
            stage: session.stage().name(),
        })
    })
}

/// POST /session/restart
pub async fn restart_session(State(state): State<AppState>) -> ApiResult<Json<SessionSnapshot>> {
    let mut session = state.session()?;
    session.restart().await?;
    Ok(Json(session.snapshot()))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
