use tracing::debug;

use super::types::Response;
use crate::capture::Artifact;

/// Current response per question identity
///
/// At most one entry exists per question. A later capture replaces the
/// earlier artifact in place, so snapshot order is the order in which each
/// question was first answered.
#[derive(Debug, Default)]
pub struct ResponseLedger {
    entries: Vec<Response>,
}

impl ResponseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the response for `question_id`
    pub fn upsert(&mut self, question_id: &str, artifact: Artifact) {
        self.upsert_with_prompt(question_id, artifact, None);
    }

    /// Like [`upsert`](Self::upsert), also caching the prompt text.
    /// A `None` prompt keeps any previously cached text.
    pub fn upsert_with_prompt(
        &mut self,
        question_id: &str,
        artifact: Artifact,
        prompt: Option<String>,
    ) {
        match self.entries.iter_mut().find(|r| r.question_id == question_id) {
            Some(existing) => {
                debug!("Replacing response for question {}", question_id);
                existing.artifact = artifact;
                if prompt.is_some() {
                    existing.prompt = prompt;
                }
            }
            None => {
                debug!("Recording first response for question {}", question_id);
                self.entries.push(Response {
                    question_id: question_id.to_string(),
                    artifact,
                    prompt,
                });
            }
        }
    }

    pub fn has(&self, question_id: &str) -> bool {
        self.entries.iter().any(|r| r.question_id == question_id)
    }

    pub fn get(&self, question_id: &str) -> Option<&Response> {
        self.entries.iter().find(|r| r.question_id == question_id)
    }

    /// Snapshot in insertion order
    pub fn all(&self) -> Vec<Response> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
