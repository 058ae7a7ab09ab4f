pub mod audio;
pub mod capture;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod http;
pub mod interview;
pub mod session;

pub use audio::{AudioBackend, AudioBackendConfig, AudioBackendFactory, AudioFile, AudioFrame, AudioSource};
pub use capture::{Artifact, BackendCaptureDevice, CaptureDevice, RecordingBuffer};
pub use config::Config;
pub use error::{InterviewError, Notice};
pub use evaluation::HttpEvaluationClient;
pub use http::{create_router, AppState};
pub use interview::{
    CodingEvaluation, EncodedResponse, Evaluation, Question, ResponseEncoder, ResponseLedger,
    SessionAggregate, SetupRequest,
};
pub use session::{Collaborators, InterviewSession, QuestionPlan, SessionConfig, Stage};
