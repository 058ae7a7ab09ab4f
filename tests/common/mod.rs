// Shared test doubles for the capture device and remote collaborators
//
// Each double records how it was called and can be switched into a failing
// mode between calls, so tests can drive retry paths deterministically.

#![allow(dead_code)]

use anyhow::{bail, Result};
use mock_interview::capture::{Artifact, CaptureDevice, CaptureHandle};
use mock_interview::evaluation::{
    CodingEvaluator, CodingPromptSource, CodingVerdict, QuestionSource, SubmissionSink,
};
use mock_interview::interview::{
    decode_payload, CvDocument, EncodedResponse, Evaluation, Question, QuestionKind,
    PDF_MIME_TYPE,
};
use mock_interview::{Collaborators, InterviewSession, QuestionPlan, SessionConfig, SetupRequest};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// Capture device
// ============================================================================

#[derive(Default)]
pub struct MockCaptureDevice {
    pub fail_acquire: AtomicBool,
    pub fail_finalize: AtomicBool,
    pub acquired: AtomicUsize,
    pub finalized: AtomicUsize,
    pub released: AtomicUsize,
    next_id: AtomicU64,
    outstanding: Mutex<HashSet<u64>>,
}

impl MockCaptureDevice {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.lock().unwrap().len()
    }

    /// Artifact produced by the capture with the given handle id
    pub fn artifact_for(id: u64) -> Artifact {
        Artifact::wav(format!("capture-{}", id).into_bytes())
    }
}

#[async_trait::async_trait]
impl CaptureDevice for MockCaptureDevice {
    async fn acquire(&self) -> Result<CaptureHandle> {
        if self.fail_acquire.load(Ordering::SeqCst) {
            bail!("Permission denied");
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.acquired.fetch_add(1, Ordering::SeqCst);
        self.outstanding.lock().unwrap().insert(id);
        Ok(CaptureHandle::new(id))
    }

    async fn finalize(&self, handle: &CaptureHandle) -> Result<Artifact> {
        self.finalized.fetch_add(1, Ordering::SeqCst);
        if self.fail_finalize.load(Ordering::SeqCst) {
            bail!("encoder crashed");
        }
        Ok(Self::artifact_for(handle.id()))
    }

    async fn release(&self, handle: CaptureHandle) -> Result<()> {
        self.released.fetch_add(1, Ordering::SeqCst);
        if !self.outstanding.lock().unwrap().remove(&handle.id()) {
            bail!("Handle {} released twice", handle.id());
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// ============================================================================
// Remote service
// ============================================================================

pub struct MockService {
    pub questions: Vec<Question>,
    pub scores: HashMap<String, f64>,
    pub prompt: String,
    pub coding_score: f64,

    pub fail_generate: AtomicBool,
    pub fail_submit: AtomicBool,
    pub fail_fetch: AtomicBool,
    pub fail_evaluate: AtomicBool,
    /// Return evaluations in reverse submission order
    pub reverse_evaluations: AtomicBool,
    /// Drop the last evaluation from the reply
    pub drop_last_evaluation: AtomicBool,

    pub generate_calls: AtomicUsize,
    pub submit_calls: AtomicUsize,
    pub fetch_calls: AtomicUsize,
    pub evaluate_calls: AtomicUsize,
    pub submissions: Mutex<Vec<Vec<EncodedResponse>>>,
    pub evaluated_code: Mutex<Vec<(String, String)>>,
}

impl MockService {
    pub fn new(questions: Vec<Question>, scores: &[f64]) -> Arc<Self> {
        let scores = questions
            .iter()
            .zip(scores.iter())
            .map(|(q, s)| (q.id.clone(), *s))
            .collect();

        Arc::new(Self {
            questions,
            scores,
            prompt: "Write a function that reverses a string.".to_string(),
            coding_score: 70.0,
            fail_generate: AtomicBool::new(false),
            fail_submit: AtomicBool::new(false),
            fail_fetch: AtomicBool::new(false),
            fail_evaluate: AtomicBool::new(false),
            reverse_evaluations: AtomicBool::new(false),
            drop_last_evaluation: AtomicBool::new(false),
            generate_calls: AtomicUsize::new(0),
            submit_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
            evaluate_calls: AtomicUsize::new(0),
            submissions: Mutex::new(Vec::new()),
            evaluated_code: Mutex::new(Vec::new()),
        })
    }

    pub fn set(flag: &AtomicBool, value: bool) {
        flag.store(value, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl QuestionSource for MockService {
    async fn generate(&self, _job_description: &str, _cv: &CvDocument) -> Result<Vec<Question>> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_generate.load(Ordering::SeqCst) {
            bail!("503 Service Unavailable");
        }
        Ok(self.questions.clone())
    }
}

#[async_trait::async_trait]
impl SubmissionSink for MockService {
    async fn submit(&self, responses: &[EncodedResponse]) -> Result<Vec<Evaluation>> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_submit.load(Ordering::SeqCst) {
            bail!("connection reset by peer");
        }
        self.submissions.lock().unwrap().push(responses.to_vec());

        let mut evaluations = responses
            .iter()
            .map(|r| {
                let audio = decode_payload(&r.payload)?;
                let text = self
                    .questions
                    .iter()
                    .find(|q| q.id == r.question_id)
                    .map(|q| q.text.clone())
                    .unwrap_or_default();
                Ok(Evaluation {
                    question_id: r.question_id.clone(),
                    question_text: text,
                    answer_text: String::from_utf8_lossy(&audio).to_string(),
                    score: self.scores.get(&r.question_id).copied().unwrap_or(50.0),
                    feedback: format!("Feedback for {}", r.question_id),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if self.reverse_evaluations.load(Ordering::SeqCst) {
            evaluations.reverse();
        }
        if self.drop_last_evaluation.load(Ordering::SeqCst) {
            evaluations.pop();
        }
        Ok(evaluations)
    }
}

#[async_trait::async_trait]
impl CodingPromptSource for MockService {
    async fn fetch_prompt(&self) -> Result<String> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            bail!("timed out");
        }
        Ok(self.prompt.clone())
    }
}

#[async_trait::async_trait]
impl CodingEvaluator for MockService {
    async fn evaluate(&self, prompt: &str, code: &str) -> Result<CodingVerdict> {
        self.evaluate_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_evaluate.load(Ordering::SeqCst) {
            bail!("500 Internal Server Error");
        }
        self.evaluated_code
            .lock()
            .unwrap()
            .push((prompt.to_string(), code.to_string()));
        Ok(CodingVerdict {
            score: self.coding_score,
            feedback: "Handles the empty string.".to_string(),
        })
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn questions(count: usize) -> Vec<Question> {
    (1..=count)
        .map(|i| {
            Question::new(
                &format!("q{}", i),
                &format!("Question number {}", i),
                if i % 2 == 0 {
                    QuestionKind::Technical
                } else {
                    QuestionKind::Behavioral
                },
                None,
            )
        })
        .collect()
}

pub fn intake() -> SetupRequest {
    SetupRequest::new(
        "Backend engineer working on Rust services",
        CvDocument {
            file_name: "cv.pdf".to_string(),
            content_type: PDF_MIME_TYPE.to_string(),
            bytes: b"%PDF-1.7 test cv".to_vec(),
        },
    )
}

pub struct Harness {
    pub session: InterviewSession,
    pub service: Arc<MockService>,
    pub device: Arc<MockCaptureDevice>,
}

fn collaborators(
    plan: QuestionPlan,
    service: &Arc<MockService>,
    device: &Arc<MockCaptureDevice>,
) -> Collaborators {
    Collaborators {
        questions: plan,
        submissions: service.clone(),
        prompts: service.clone(),
        coding: service.clone(),
        capture: device.clone(),
    }
}

/// Session whose questions come from the mock service
pub fn generated_session(question_count: usize, scores: &[f64], coding_stage: bool) -> Harness {
    let service = MockService::new(questions(question_count), scores);
    let device = MockCaptureDevice::new();
    let plan = QuestionPlan::Generated(service.clone());
    let session = InterviewSession::new(
        SessionConfig::new(coding_stage),
        collaborators(plan, &service, &device),
    );
    Harness {
        session,
        service,
        device,
    }
}

/// Session with a fixed question list
pub fn fixed_session(question_count: usize, scores: &[f64], coding_stage: bool) -> Harness {
    let service = MockService::new(questions(question_count), scores);
    let device = MockCaptureDevice::new();
    let plan = QuestionPlan::Fixed(service.questions.clone());
    let session = InterviewSession::new(
        SessionConfig::new(coding_stage),
        collaborators(plan, &service, &device),
    );
    Harness {
        session,
        service,
        device,
    }
}

/// Record an answer for the current question
pub async fn answer_current(session: &mut InterviewSession) -> Result<()> {
    session.start_recording().await?;
    session.stop_recording().await?;
    Ok(())
}

/// Answer every question and stop on the last one, ready to submit
pub async fn answer_all(session: &mut InterviewSession) -> Result<()> {
    let count = session.questions().len();
    for i in 0..count {
        answer_current(session).await?;
        if i + 1 < count {
            session.next().await?;
        }
    }
    Ok(())
}
