use serde::{Deserialize, Serialize};

use crate::interview::{EncodedResponse, Evaluation};

/// One encoded answer submitted for scoring
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponseMessage {
    pub question_id: String,
    pub audio_blob: String, // Base64-encoded audio, no data-URI prefix
}

impl From<&EncodedResponse> for QuestionResponseMessage {
    fn from(response: &EncodedResponse) -> Self {
        Self {
            question_id: response.question_id.clone(),
            audio_blob: response.payload.clone(),
        }
    }
}

/// Evaluation returned by the scoring service
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionEvaluationMessage {
    pub question_id: String,
    pub question_text: String,
    pub answer_text: String,
    pub score: f64,
    pub feedback: String,
}

impl From<QuestionEvaluationMessage> for Evaluation {
    fn from(msg: QuestionEvaluationMessage) -> Self {
        Self {
            question_id: msg.question_id,
            question_text: msg.question_text,
            answer_text: msg.answer_text,
            score: msg.score,
            feedback: msg.feedback,
        }
    }
}

impl From<&Evaluation> for QuestionEvaluationMessage {
    fn from(evaluation: &Evaluation) -> Self {
        Self {
            question_id: evaluation.question_id.clone(),
            question_text: evaluation.question_text.clone(),
            answer_text: evaluation.answer_text.clone(),
            score: evaluation.score,
            feedback: evaluation.feedback.clone(),
        }
    }
}

/// Coding challenge prompt
#[derive(Debug, Serialize, Deserialize)]
pub struct CodingQuestionMessage {
    pub question: String,
}

/// Coding answer submitted for evaluation
#[derive(Debug, Serialize, Deserialize)]
pub struct CodingEvaluationRequest {
    pub question: String,
    pub code: String,
}

/// Coding evaluation returned by the service
#[derive(Debug, Serialize, Deserialize)]
pub struct CodingEvaluationMessage {
    pub score: f64,
    pub feedback: String,
}
