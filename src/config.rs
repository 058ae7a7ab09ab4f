use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub evaluation: EvaluationConfig,
    #[serde(default)]
    pub interview: InterviewConfig,
    pub audio: AudioConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct EvaluationConfig {
    /// Base URL of the remote scoring / question-generation service
    pub base_url: String,
    /// Per-request timeout applied by the HTTP client
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionSourceKind {
    /// Built-in question set, setup is skipped
    Fixed,
    /// Questions generated from a job description and CV
    Generated,
}

#[derive(Debug, Deserialize)]
pub struct InterviewConfig {
    pub question_source: QuestionSourceKind,
    /// Default for the per-session coding stage flag
    pub coding_stage: bool,
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            question_source: QuestionSourceKind::Generated,
            coding_stage: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioSourceKind {
    File,
    Microphone,
}

#[derive(Debug, Deserialize)]
pub struct AudioConfig {
    pub source: AudioSourceKind,
    /// WAV file replayed by the `file` source
    pub file_path: Option<String>,
    pub sample_rate: u32,
    pub channels: u16,
    #[serde(default = "default_buffer_duration_ms")]
    pub buffer_duration_ms: u64,
    /// Pace file replay in real time instead of as fast as possible
    #[serde(default)]
    pub realtime: bool,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_buffer_duration_ms() -> u64 {
    100
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
