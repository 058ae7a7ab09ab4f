//! Remote collaborators consumed by the session
//!
//! Each trait is one round trip that yields a success value or an error.
//! Implementations report `anyhow::Error`; the session decides which typed
//! failure a given error becomes.
//!
//! `HttpEvaluationClient` implements all four against the remote service.

pub mod client;
pub mod messages;

use anyhow::Result;

use crate::interview::{CvDocument, EncodedResponse, Evaluation, Question};

pub use client::HttpEvaluationClient;

/// Generates a question list from a job description and CV
#[async_trait::async_trait]
pub trait QuestionSource: Send + Sync {
    async fn generate(&self, job_description: &str, cv: &CvDocument) -> Result<Vec<Question>>;
}

/// Scores encoded spoken answers
#[async_trait::async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit(&self, responses: &[EncodedResponse]) -> Result<Vec<Evaluation>>;
}

/// Supplies the coding challenge prompt
#[async_trait::async_trait]
pub trait CodingPromptSource: Send + Sync {
    async fn fetch_prompt(&self) -> Result<String>;
}

/// Scores a coding answer
#[async_trait::async_trait]
pub trait CodingEvaluator: Send + Sync {
    async fn evaluate(&self, prompt: &str, code: &str) -> Result<CodingVerdict>;
}

/// Score and feedback for a coding answer
#[derive(Debug, Clone, PartialEq)]
pub struct CodingVerdict {
    pub score: f64,
    pub feedback: String,
}
