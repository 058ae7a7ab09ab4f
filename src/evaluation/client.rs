use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::{debug, info};

use super::messages::{
    CodingEvaluationMessage, CodingEvaluationRequest, CodingQuestionMessage,
    QuestionEvaluationMessage, QuestionResponseMessage,
};
use super::{CodingEvaluator, CodingPromptSource, CodingVerdict, QuestionSource, SubmissionSink};
use crate::interview::{CvDocument, EncodedResponse, Evaluation, Question};

/// HTTP client for the remote question-generation and scoring service
#[derive(Clone)]
pub struct HttpEvaluationClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpEvaluationClient {
    /// Create a client; `timeout` applies to every request
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let base_url = base_url.trim().trim_end_matches('/').to_string();
        info!("Evaluation service at {}", base_url);

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait::async_trait]
impl QuestionSource for HttpEvaluationClient {
    async fn generate(&self, job_description: &str, cv: &CvDocument) -> Result<Vec<Question>> {
        let url = self.url("/questions/generate");
        debug!("Requesting questions from {}", url);

        let cv_part = Part::bytes(cv.bytes.clone())
            .file_name(cv.file_name.clone())
            .mime_str(&cv.content_type)
            .context("Invalid CV content type")?;

        let form = Form::new()
            .text("jobDescription", job_description.to_string())
            .part("cv", cv_part);

        let questions: Vec<Question> = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .context("Question generation request failed")?
            .error_for_status()
            .context("Question generation service returned an error")?
            .json()
            .await
            .context("Failed to parse generated questions")?;

        info!("Received {} generated questions", questions.len());
        Ok(questions)
    }
}

#[async_trait::async_trait]
impl SubmissionSink for HttpEvaluationClient {
    async fn submit(&self, responses: &[EncodedResponse]) -> Result<Vec<Evaluation>> {
        let url = self.url("/responses/evaluate");
        let body: Vec<QuestionResponseMessage> = responses.iter().map(Into::into).collect();

        debug!("Submitting {} responses to {}", body.len(), url);

        let evaluations: Vec<QuestionEvaluationMessage> = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Submission request failed")?
            .error_for_status()
            .context("Scoring service returned an error")?
            .json()
            .await
            .context("Failed to parse evaluations")?;

        info!("Received {} evaluations", evaluations.len());
        Ok(evaluations.into_iter().map(Into::into).collect())
    }
}

#[async_trait::async_trait]
impl CodingPromptSource for HttpEvaluationClient {
    async fn fetch_prompt(&self) -> Result<String> {
        let url = self.url("/coding/question");
        debug!("Fetching coding prompt from {}", url);

        let msg: CodingQuestionMessage = self
            .client
            .get(&url)
            .send()
            .await
            .context("Coding prompt request failed")?
            .error_for_status()
            .context("Coding prompt service returned an error")?
            .json()
            .await
            .context("Failed to parse coding prompt")?;

        Ok(msg.question)
    }
}

#[async_trait::async_trait]
impl CodingEvaluator for HttpEvaluationClient {
    async fn evaluate(&self, prompt: &str, code: &str) -> Result<CodingVerdict> {
        let url = self.url("/coding/evaluate");
        let body = CodingEvaluationRequest {
            question: prompt.to_string(),
            code: code.to_string(),
        };

        debug!("Submitting coding answer ({} chars) to {}", code.len(), url);

        let msg: CodingEvaluationMessage = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Coding evaluation request failed")?
            .error_for_status()
            .context("Coding evaluation service returned an error")?
            .json()
            .await
            .context("Failed to parse coding evaluation")?;

        info!("Coding answer scored {}", msg.score);
        Ok(CodingVerdict {
            score: msg.score,
            feedback: msg.feedback,
        })
    }
}
