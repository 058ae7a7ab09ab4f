//! Error types for interview sessions
//!
//! Every failure here is recoverable: the session stays on its current stage
//! and the triggering action may be retried. Collaborator implementations
//! report `anyhow::Error`; the session state machine is the only place that
//! maps those failures onto a typed kind.

use serde::Serialize;
use thiserror::Error;

/// Session-level error taxonomy
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterviewError {
    /// Capture device could not be acquired or finalized
    #[error("Capture device unavailable: {0}")]
    DeviceUnavailable(String),

    /// Navigation gate: the current question has no recorded response
    #[error("No recorded response for question {question_id}")]
    MissingResponse { question_id: String },

    /// Binary-to-text transcoding of a response failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    /// Question generation round trip failed
    #[error("Question generation failed: {0}")]
    GenerationFailed(String),

    /// Response submission round trip failed
    #[error("Submission failed: {0}")]
    SubmissionFailed(String),

    /// Coding prompt fetch failed
    #[error("Coding prompt fetch failed: {0}")]
    FetchFailed(String),

    /// Coding answer evaluation failed
    #[error("Coding evaluation failed: {0}")]
    EvaluationFailed(String),

    /// Setup intake rejected before any network call
    #[error("Invalid setup: {0}")]
    InvalidSetup(SetupIssue),

    /// Coding answer was blank
    #[error("Coding answer is empty")]
    EmptyCode,

    /// Action needs the capture to be stopped first
    #[error("A recording is still in progress")]
    RecordingInProgress,

    /// Operation is not valid in the current stage
    #[error("Cannot {action} while in {stage} stage")]
    InvalidStage {
        action: &'static str,
        stage: &'static str,
    },

    /// Another call is still outstanding for this session
    #[error("Another operation is in progress")]
    Busy,
}

/// Reason a setup intake was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupIssue {
    MissingJobDescription,
    MissingCv,
    InvalidCvType,
    IntakeRequired,
}

impl std::fmt::Display for SetupIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            SetupIssue::MissingJobDescription => "job description is empty",
            SetupIssue::MissingCv => "CV document is missing",
            SetupIssue::InvalidCvType => "CV document is not a PDF",
            SetupIssue::IntakeRequired => "job description and CV are required",
        };
        f.write_str(text)
    }
}

/// User-facing transient notification for a failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
}

impl Notice {
    fn new(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

impl InterviewError {
    /// Short stable identifier, used by the control API
    pub fn kind(&self) -> &'static str {
        match self {
            InterviewError::DeviceUnavailable(_) => "device_unavailable",
            InterviewError::MissingResponse { .. } => "missing_response",
            InterviewError::EncodingFailed(_) => "encoding_failed",
            InterviewError::GenerationFailed(_) => "generation_failed",
            InterviewError::SubmissionFailed(_) => "submission_failed",
            InterviewError::FetchFailed(_) => "fetch_failed",
            InterviewError::EvaluationFailed(_) => "evaluation_failed",
            InterviewError::InvalidSetup(_) => "invalid_setup",
            InterviewError::EmptyCode => "empty_code",
            InterviewError::RecordingInProgress => "recording_in_progress",
            InterviewError::InvalidStage { .. } => "invalid_stage",
            InterviewError::Busy => "busy",
        }
    }

    /// Notification text shown to the user
    pub fn notice(&self) -> Notice {
        match self {
            InterviewError::DeviceUnavailable(_) => Notice::new(
                "Microphone access denied",
                "Please allow microphone access to record your answer.",
            ),
            InterviewError::MissingResponse { .. } => Notice::new(
                "No recording found",
                "Please record your answer before proceeding.",
            ),
            InterviewError::EncodingFailed(_) => Notice::new(
                "Error preparing answers",
                "Your recordings could not be prepared for upload. Please try again.",
            ),
            InterviewError::GenerationFailed(_) => Notice::new(
                "Error generating questions",
                "We couldn't generate interview questions. Please try again.",
            ),
            InterviewError::SubmissionFailed(_) => {
                Notice::new("Error submitting answers", "Please try again.")
            }
            InterviewError::FetchFailed(_) => Notice::new(
                "Error loading coding question",
                "We couldn't load the coding challenge. Please try again.",
            ),
            InterviewError::EvaluationFailed(_) => Notice::new(
                "Evaluation failed",
                "Failed to evaluate your code. Please try again.",
            ),
            InterviewError::InvalidSetup(issue) => match issue {
                SetupIssue::MissingJobDescription | SetupIssue::IntakeRequired => Notice::new(
                    "Job description required",
                    "Please enter a job description",
                ),
                SetupIssue::MissingCv => {
                    Notice::new("CV file required", "Please upload your CV as a PDF file")
                }
                SetupIssue::InvalidCvType => {
                    Notice::new("Invalid file type", "Please upload a PDF file")
                }
            },
            InterviewError::EmptyCode => Notice::new(
                "Empty answer",
                "Please write some code before submitting.",
            ),
            InterviewError::RecordingInProgress => Notice::new(
                "Recording in progress",
                "Please stop recording before continuing.",
            ),
            InterviewError::InvalidStage { .. } => Notice::new(
                "Action not available",
                "This action isn't available at this point of the interview.",
            ),
            InterviewError::Busy => Notice::new(
                "Please wait",
                "The previous action is still being processed.",
            ),
        }
    }
}

/// Convenience Result type for session operations
pub type Result<T> = std::result::Result<T, InterviewError>;
