//! Interview session management
//!
//! This module provides the `InterviewSession` state machine that manages:
//! - Setup intake and question generation
//! - Answer capture and navigation gating over the response ledger
//! - Submission of all answers and pairing of returned evaluations
//! - The optional coding challenge and the aggregated results

mod config;
mod session;
mod stats;

pub use config::SessionConfig;
pub use session::{Collaborators, InterviewSession, QuestionPlan, Stage};
pub use stats::{EvaluationSummary, Progress, RecordingStatus, ResultsSummary, SessionSnapshot};
