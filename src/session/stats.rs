use chrono::{DateTime, Utc};
use serde::Serialize;

use super::session::{InterviewSession, Stage};
use crate::capture::{format_elapsed, RecorderState};
use crate::interview::{CodingEvaluation, Question, ScoreBand, SessionAggregate};

/// "Question N of M" progress through the question stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// 1-based position of the current question
    pub current: usize,
    pub total: usize,
    /// Rounded percent complete
    pub percent: u32,
}

impl Progress {
    pub fn new(current: usize, total: usize) -> Self {
        let percent = if total == 0 {
            0
        } else {
            (current as f64 / total as f64 * 100.0).round() as u32
        };
        Self {
            current,
            total,
            percent,
        }
    }
}

/// State of the recorder for the current question
#[derive(Debug, Clone, Serialize)]
pub struct RecordingStatus {
    pub state: RecorderState,
    pub elapsed_secs: u64,
    /// Elapsed time as `m:ss`
    pub elapsed: String,
}

/// One scored answer in the results view
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationSummary {
    pub question_id: String,
    pub question_text: String,
    pub answer_text: String,
    pub score: f64,
    pub band: ScoreBand,
    pub feedback: String,
}

/// Results view of a finished session
#[derive(Debug, Clone, Serialize)]
pub struct ResultsSummary {
    pub average_score: f64,
    pub band: ScoreBand,
    /// Number of scored items, coding evaluation included
    pub item_count: usize,
    pub evaluations: Vec<EvaluationSummary>,
    pub coding: Option<CodingEvaluation>,
}

impl From<&SessionAggregate> for ResultsSummary {
    fn from(aggregate: &SessionAggregate) -> Self {
        let average_score = aggregate.average_score();

        Self {
            average_score,
            band: ScoreBand::from_score(average_score),
            item_count: aggregate.item_count(),
            evaluations: aggregate
                .evaluations
                .iter()
                .map(|e| EvaluationSummary {
                    question_id: e.question_id.clone(),
                    question_text: e.question_text.clone(),
                    answer_text: e.answer_text.clone(),
                    score: e.score,
                    band: ScoreBand::from_score(e.score),
                    feedback: e.feedback.clone(),
                })
                .collect(),
            coding: aggregate.coding.clone(),
        }
    }
}

/// Point-in-time view of a session for a presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub stage: &'static str,
    pub requires_setup: bool,
    pub coding_stage: bool,
    pub progress: Option<Progress>,
    pub current_question: Option<Question>,
    pub has_response: bool,
    pub is_last_question: bool,
    pub answered_count: usize,
    pub recording: RecordingStatus,
    pub coding_prompt: Option<String>,
    pub results: Option<ResultsSummary>,
}

impl InterviewSession {
    pub fn progress(&self) -> Option<Progress> {
        self.cursor()
            .map(|cursor| Progress::new(cursor + 1, self.questions().len()))
    }

    pub fn results(&self) -> Option<ResultsSummary> {
        self.aggregate().map(ResultsSummary::from)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let current_question = self.current_question().cloned();
        let has_response = current_question
            .as_ref()
            .map_or(false, |q| self.ledger().has(&q.id));
        let elapsed_secs = self.recorder().elapsed_secs();

        SessionSnapshot {
            session_id: self.id().to_string(),
            started_at: self.started_at(),
            stage: self.stage().name(),
            requires_setup: self.requires_setup(),
            coding_stage: self.coding_stage_enabled(),
            progress: self.progress(),
            current_question,
            has_response,
            is_last_question: self.is_last_question(),
            answered_count: self.ledger().len(),
            recording: RecordingStatus {
                state: self.recorder().state(),
                elapsed_secs,
                elapsed: format_elapsed(elapsed_secs),
            },
            coding_prompt: self.coding_prompt().map(str::to_string),
            results: match self.stage() {
                Stage::Results { aggregate } => Some(ResultsSummary::from(aggregate)),
                _ => None,
            },
        }
    }
}
