use serde::{Deserialize, Serialize};

/// Configuration for an interview session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Prefix for generated session identifiers (e.g., "interview")
    pub id_prefix: String,

    /// Whether sessions include a coding challenge unless changed during setup
    pub coding_stage: bool,
}

impl SessionConfig {
    pub fn new(coding_stage: bool) -> Self {
        Self {
            coding_stage,
            ..Self::default()
        }
    }

    /// Fresh identifier for a new session
    pub fn next_session_id(&self) -> String {
        format!("{}-{}", self.id_prefix, uuid::Uuid::new_v4())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            id_prefix: "interview".to_string(),
            coding_stage: true,
        }
    }
}
