use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::config::SessionConfig;
use crate::capture::{Artifact, CaptureDevice, RecordingBuffer};
use crate::error::{InterviewError, Result, SetupIssue};
use crate::evaluation::{CodingEvaluator, CodingPromptSource, QuestionSource, SubmissionSink};
use crate::interview::{
    CodingEvaluation, Evaluation, Question, ResponseEncoder, ResponseLedger, SessionAggregate,
    SetupRequest,
};

/// Where the question list for a session comes from
#[derive(Clone)]
pub enum QuestionPlan {
    /// Fixed set; setup is skippable and needs no network call
    Fixed(Vec<Question>),
    /// Generated from the setup intake by a remote collaborator
    Generated(Arc<dyn QuestionSource>),
}

/// External collaborators the session drives
#[derive(Clone)]
pub struct Collaborators {
    pub questions: QuestionPlan,
    pub submissions: Arc<dyn SubmissionSink>,
    pub prompts: Arc<dyn CodingPromptSource>,
    pub coding: Arc<dyn CodingEvaluator>,
    pub capture: Arc<dyn CaptureDevice>,
}

/// Top-level stage of a session
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Setup,
    Questioning {
        cursor: usize,
    },
    /// Audio evaluations are in; waiting on the coding evaluation
    Coding {
        evaluations: Vec<Evaluation>,
        prompt: Option<String>,
    },
    Results {
        aggregate: SessionAggregate,
    },
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Setup => "setup",
            Stage::Questioning { .. } => "questioning",
            Stage::Coding { .. } => "coding",
            Stage::Results { .. } => "results",
        }
    }
}

/// Everything scoped to one run through the stages
struct SessionState {
    id: String,
    started_at: DateTime<Utc>,
    stage: Stage,
    questions: Vec<Question>,
    coding_stage: bool,
    ledger: ResponseLedger,
    recorder: RecordingBuffer,
}

impl SessionState {
    fn new(config: &SessionConfig, capture: Arc<dyn CaptureDevice>) -> Self {
        Self {
            id: config.next_session_id(),
            started_at: Utc::now(),
            stage: Stage::Setup,
            questions: Vec::new(),
            coding_stage: config.coding_stage,
            ledger: ResponseLedger::new(),
            recorder: RecordingBuffer::new(capture),
        }
    }
}

/// Mock-interview session state machine
///
/// `Setup -> Questioning -> Coding -> Results`, with `Coding` skipped when the
/// session has no coding stage and `Results -> Setup` on restart. Every
/// operation either completes its transition or leaves the session exactly as
/// it was. Operations take `&mut self`, so at most one collaborator call can be
/// outstanding per session.
pub struct InterviewSession {
    config: SessionConfig,
    collaborators: Collaborators,
    state: SessionState,
}

impl InterviewSession {
    pub fn new(config: SessionConfig, collaborators: Collaborators) -> Self {
        let state = SessionState::new(&config, Arc::clone(&collaborators.capture));
        info!("Created interview session: {}", state.id);

        Self {
            config,
            collaborators,
            state,
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.state.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.state.started_at
    }

    pub fn stage(&self) -> &Stage {
        &self.state.stage
    }

    /// Whether `begin` needs a setup intake
    pub fn requires_setup(&self) -> bool {
        matches!(self.collaborators.questions, QuestionPlan::Generated(_))
    }

    pub fn coding_stage_enabled(&self) -> bool {
        self.state.coding_stage
    }

    pub fn questions(&self) -> &[Question] {
        &self.state.questions
    }

    pub fn cursor(&self) -> Option<usize> {
        match self.state.stage {
            Stage::Questioning { cursor } => Some(cursor),
            _ => None,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.cursor().and_then(|i| self.state.questions.get(i))
    }

    pub fn is_last_question(&self) -> bool {
        self.cursor()
            .map_or(false, |i| i + 1 == self.state.questions.len())
    }

    pub fn ledger(&self) -> &ResponseLedger {
        &self.state.ledger
    }

    pub fn recorder(&self) -> &RecordingBuffer {
        &self.state.recorder
    }

    /// Stored artifact for a question, for playback
    pub fn artifact_for(&self, question_id: &str) -> Option<&Artifact> {
        self.state.ledger.get(question_id).map(|r| &r.artifact)
    }

    /// Audio evaluations received so far
    pub fn evaluations(&self) -> &[Evaluation] {
        match &self.state.stage {
            Stage::Coding { evaluations, .. } => evaluations,
            Stage::Results { aggregate } => &aggregate.evaluations,
            _ => &[],
        }
    }

    pub fn coding_prompt(&self) -> Option<&str> {
        match &self.state.stage {
            Stage::Coding { prompt, .. } => prompt.as_deref(),
            _ => None,
        }
    }

    pub fn aggregate(&self) -> Option<&SessionAggregate> {
        match &self.state.stage {
            Stage::Results { aggregate } => Some(aggregate),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Setup
    // ------------------------------------------------------------------

    /// Choose whether this session has a coding stage (setup only)
    pub fn set_coding_stage(&mut self, enabled: bool) -> Result<()> {
        self.expect_setup("change the coding stage")?;
        info!(
            "Session {}: coding stage {}",
            self.state.id,
            if enabled { "enabled" } else { "disabled" }
        );
        self.state.coding_stage = enabled;
        Ok(())
    }

    /// Complete setup and enter the question stage
    ///
    /// A fixed plan ignores `intake`. A generated plan validates it, then asks
    /// the question source for the list; on any failure the session stays in
    /// `Setup`.
    pub async fn begin(&mut self, intake: Option<SetupRequest>) -> Result<()> {
        self.expect_setup("begin the interview")?;

        let questions = match &self.collaborators.questions {
            QuestionPlan::Fixed(questions) => {
                if intake.is_some() {
                    debug!("Fixed question plan, ignoring setup intake");
                }
                questions.clone()
            }
            QuestionPlan::Generated(source) => {
                let intake =
                    intake.ok_or(InterviewError::InvalidSetup(SetupIssue::IntakeRequired))?;
                let cv = intake.validate()?;

                info!(
                    "Session {}: generating questions from {} ({} bytes)",
                    self.state.id,
                    cv.file_name,
                    cv.bytes.len()
                );

                source
                    .generate(&intake.job_description, cv)
                    .await
                    .map_err(|e| {
                        error!("Question generation failed: {:#}", e);
                        InterviewError::GenerationFailed(e.to_string())
                    })?
            }
        };

        validate_questions(&questions).map_err(|reason| {
            error!("Rejected question list: {}", reason);
            InterviewError::GenerationFailed(reason)
        })?;

        info!(
            "Session {}: questioning with {} questions (coding stage: {})",
            self.state.id,
            questions.len(),
            self.state.coding_stage
        );

        self.state.questions = questions;
        self.state.stage = Stage::Questioning { cursor: 0 };
        Ok(())
    }

    // ------------------------------------------------------------------
    // Questioning
    // ------------------------------------------------------------------

    /// Start capturing an answer for the current question
    pub async fn start_recording(&mut self) -> Result<()> {
        let cursor = self.expect_questioning("start recording")?;
        debug!("Recording answer for question index {}", cursor);
        self.state.recorder.begin().await
    }

    /// Stop capturing and store the answer for the current question
    ///
    /// Returns `false` when nothing was being recorded.
    pub async fn stop_recording(&mut self) -> Result<bool> {
        let cursor = self.expect_questioning("stop recording")?;

        let Some(artifact) = self.state.recorder.end().await? else {
            return Ok(false);
        };

        let question = &self.state.questions[cursor];
        self.state
            .ledger
            .upsert_with_prompt(&question.id, artifact, Some(question.text.clone()));

        info!(
            "Session {}: stored response for question {} ({} of {} answered)",
            self.state.id,
            question.id,
            self.state.ledger.len(),
            self.state.questions.len()
        );
        Ok(true)
    }

    /// Advance to the next question; gated on the current one being answered
    pub async fn next(&mut self) -> Result<()> {
        let cursor = self.expect_questioning("advance")?;

        if cursor + 1 >= self.state.questions.len() {
            return Err(InterviewError::InvalidStage {
                action: "advance past the last question",
                stage: "questioning",
            });
        }

        self.gate_response(cursor)?;

        self.state.recorder.reset().await;
        self.state.stage = Stage::Questioning { cursor: cursor + 1 };
        debug!("Moved to question index {}", cursor + 1);
        Ok(())
    }

    /// Go back one question
    pub async fn previous(&mut self) -> Result<()> {
        let cursor = self.expect_questioning("go back")?;

        if cursor == 0 {
            return Err(InterviewError::InvalidStage {
                action: "go back from the first question",
                stage: "questioning",
            });
        }

        self.state.recorder.reset().await;
        self.state.stage = Stage::Questioning { cursor: cursor - 1 };
        debug!("Moved to question index {}", cursor - 1);
        Ok(())
    }

    /// Submit every response for evaluation from the last question
    ///
    /// encode -> submit -> pair evaluations to questions. On success moves to
    /// `Coding`, or straight to `Results` without a coding stage. On failure
    /// the cursor, ledger and any prior evaluations are untouched.
    pub async fn submit(&mut self) -> Result<()> {
        let cursor = self.expect_questioning("submit")?;

        if cursor + 1 != self.state.questions.len() {
            return Err(InterviewError::InvalidStage {
                action: "submit before the last question",
                stage: "questioning",
            });
        }
        if self.state.recorder.is_recording() {
            return Err(InterviewError::RecordingInProgress);
        }
        self.gate_response(cursor)?;

        let responses = self.state.ledger.all();
        debug_assert_eq!(responses.len(), self.state.questions.len());

        info!(
            "Session {}: submitting {} responses",
            self.state.id,
            responses.len()
        );

        let encoded = ResponseEncoder::encode_all(&responses).await?;

        let returned = self
            .collaborators
            .submissions
            .submit(&encoded)
            .await
            .map_err(|e| {
                error!("Submission failed: {:#}", e);
                InterviewError::SubmissionFailed(e.to_string())
            })?;

        let evaluations = pair_evaluations(&self.state.questions, returned).map_err(|reason| {
            error!("Rejected evaluations: {}", reason);
            InterviewError::SubmissionFailed(reason)
        })?;

        self.state.recorder.reset().await;

        if self.state.coding_stage {
            info!(
                "Session {}: {} evaluations received, entering coding stage",
                self.state.id,
                evaluations.len()
            );
            self.state.stage = Stage::Coding {
                evaluations,
                prompt: None,
            };
        } else {
            let aggregate = SessionAggregate::new(evaluations, None);
            info!(
                "Session {}: results ready, average {}",
                self.state.id,
                aggregate.average_score()
            );
            self.state.stage = Stage::Results { aggregate };
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Coding
    // ------------------------------------------------------------------

    /// Coding prompt, fetched on first use
    pub async fn load_coding_prompt(&mut self) -> Result<String> {
        if let Stage::Coding {
            prompt: Some(prompt),
            ..
        } = &self.state.stage
        {
            return Ok(prompt.clone());
        }

        self.fetch_coding_prompt().await
    }

    /// Fetch the coding prompt again after a failure
    ///
    /// A failed refetch keeps any previously loaded prompt.
    pub async fn refetch_coding_prompt(&mut self) -> Result<String> {
        self.fetch_coding_prompt().await
    }

    async fn fetch_coding_prompt(&mut self) -> Result<String> {
        self.expect_coding("fetch the coding prompt")?;

        let fetched = self.collaborators.prompts.fetch_prompt().await.map_err(|e| {
            error!("Coding prompt fetch failed: {:#}", e);
            InterviewError::FetchFailed(e.to_string())
        })?;

        if let Stage::Coding { prompt, .. } = &mut self.state.stage {
            *prompt = Some(fetched.clone());
        }
        info!("Session {}: coding prompt loaded", self.state.id);
        Ok(fetched)
    }

    /// Submit the coding answer and move to results
    pub async fn submit_code(&mut self, code: &str) -> Result<()> {
        self.expect_coding("submit code")?;

        if code.trim().is_empty() {
            return Err(InterviewError::EmptyCode);
        }

        let prompt = self.load_coding_prompt().await?;

        let verdict = self
            .collaborators
            .coding
            .evaluate(&prompt, code)
            .await
            .map_err(|e| {
                error!("Coding evaluation failed: {:#}", e);
                InterviewError::EvaluationFailed(e.to_string())
            })?;

        let Stage::Coding { evaluations, .. } = &self.state.stage else {
            return Err(self.stage_error("submit code"));
        };

        let aggregate = SessionAggregate::new(
            evaluations.clone(),
            Some(CodingEvaluation {
                code: code.to_string(),
                score: verdict.score,
                feedback: verdict.feedback,
            }),
        );

        info!(
            "Session {}: results ready, average {}",
            self.state.id,
            aggregate.average_score()
        );
        self.state.stage = Stage::Results { aggregate };
        Ok(())
    }

    // ------------------------------------------------------------------
    // Results
    // ------------------------------------------------------------------

    /// Discard the whole session and return to setup
    pub async fn restart(&mut self) -> Result<()> {
        if !matches!(self.state.stage, Stage::Results { .. }) {
            return Err(self.stage_error("restart"));
        }

        self.state.recorder.reset().await;

        let previous = std::mem::replace(
            &mut self.state,
            SessionState::new(&self.config, Arc::clone(&self.collaborators.capture)),
        );

        info!(
            "Session {} restarted as {}",
            previous.id, self.state.id
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Gates
    // ------------------------------------------------------------------

    fn gate_response(&self, cursor: usize) -> Result<()> {
        let question = &self.state.questions[cursor];
        if self.state.ledger.has(&question.id) {
            Ok(())
        } else {
            warn!("No recorded response for question {}", question.id);
            Err(InterviewError::MissingResponse {
                question_id: question.id.clone(),
            })
        }
    }

    fn stage_error(&self, action: &'static str) -> InterviewError {
        InterviewError::InvalidStage {
            action,
            stage: self.state.stage.name(),
        }
    }

    fn expect_setup(&self, action: &'static str) -> Result<()> {
        match self.state.stage {
            Stage::Setup => Ok(()),
            _ => Err(self.stage_error(action)),
        }
    }

    fn expect_questioning(&self, action: &'static str) -> Result<usize> {
        match self.state.stage {
            Stage::Questioning { cursor } => Ok(cursor),
            _ => Err(self.stage_error(action)),
        }
    }

    fn expect_coding(&self, action: &'static str) -> Result<()> {
        match self.state.stage {
            Stage::Coding { .. } => Ok(()),
            _ => Err(self.stage_error(action)),
        }
    }
}

/// A question list must be non-empty with unique identities
fn validate_questions(questions: &[Question]) -> std::result::Result<(), String> {
    if questions.is_empty() {
        return Err("no questions returned".to_string());
    }

    let mut seen = std::collections::HashSet::new();
    for question in questions {
        if !seen.insert(question.id.as_str()) {
            return Err(format!("duplicate question id {}", question.id));
        }
    }
    Ok(())
}

/// Pair returned evaluations with questions by identity, in question order
///
/// Responses are submitted in ledger order, which need not match question
/// order, so position is never used to match them up.
fn pair_evaluations(
    questions: &[Question],
    returned: Vec<Evaluation>,
) -> std::result::Result<Vec<Evaluation>, String> {
    let mut by_id: HashMap<String, Evaluation> = HashMap::with_capacity(returned.len());

    for evaluation in returned {
        if !questions.iter().any(|q| q.id == evaluation.question_id) {
            return Err(format!(
                "evaluation for unknown question {}",
                evaluation.question_id
            ));
        }
        let id = evaluation.question_id.clone();
        if by_id.insert(id.clone(), evaluation).is_some() {
            return Err(format!("duplicate evaluation for question {}", id));
        }
    }

    questions
        .iter()
        .map(|q| {
            by_id
                .remove(&q.id)
                .ok_or_else(|| format!("missing evaluation for question {}", q.id))
        })
        .collect()
}
