use serde::{Deserialize, Serialize};

use crate::capture::Artifact;

/// Kind of interview question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Behavioral,
    Technical,
}

/// A question issued for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier within the session
    pub id: String,

    /// Prompt text
    pub text: String,

    #[serde(rename = "type")]
    pub kind: QuestionKind,

    /// Optional category label (e.g., "Teamwork")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Question {
    pub fn new(id: &str, text: &str, kind: QuestionKind, category: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            kind,
            category: category.map(str::to_string),
        }
    }
}

/// The current recorded answer to one question
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub question_id: String,
    pub artifact: Artifact,
    /// Cached prompt text for display
    pub prompt: Option<String>,
}

/// Transport form of a response, produced fresh before every submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedResponse {
    pub question_id: String,
    /// Base64 payload body, no data-URI prefix
    pub payload: String,
}

/// Remote evaluation of one spoken answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub question_id: String,
    pub question_text: String,
    /// Answer text; a transcript supplied by the service for audio answers
    pub answer_text: String,
    pub score: f64,
    pub feedback: String,
}

/// Evaluation of the single coding challenge of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodingEvaluation {
    pub code: String,
    pub score: f64,
    pub feedback: String,
}

/// All evaluations that make up the final score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionAggregate {
    pub evaluations: Vec<Evaluation>,
    pub coding: Option<CodingEvaluation>,
}

impl SessionAggregate {
    pub fn new(evaluations: Vec<Evaluation>, coding: Option<CodingEvaluation>) -> Self {
        Self {
            evaluations,
            coding,
        }
    }

    /// Number of scored items (audio evaluations plus the coding evaluation)
    pub fn item_count(&self) -> usize {
        self.evaluations.len() + usize::from(self.coding.is_some())
    }

    /// Mean over every scored item, rounded to one decimal place
    pub fn average_score(&self) -> f64 {
        let count = self.item_count();
        if count == 0 {
            return 0.0;
        }

        let total: f64 = self.evaluations.iter().map(|e| e.score).sum::<f64>()
            + self.coding.as_ref().map_or(0.0, |c| c.score);

        (total / count as f64 * 10.0).round() / 10.0
    }
}

/// Display band for a score out of 100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Strong,
    Fair,
    Weak,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreBand::Strong
        } else if score >= 60.0 {
            ScoreBand::Fair
        } else {
            ScoreBand::Weak
        }
    }
}
