use anyhow::{Context, Result};
use clap::Parser;
use mock_interview::audio::{AudioBackendConfig, AudioBackendFactory, AudioSource};
use mock_interview::config::{AudioSourceKind, QuestionSourceKind};
use mock_interview::interview::default_questions;
use mock_interview::{
    create_router, AppState, BackendCaptureDevice, Collaborators, Config, HttpEvaluationClient,
    InterviewSession, QuestionPlan, SessionConfig,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "mock-interview")]
#[command(about = "Mock interview session service")]
struct Args {
    /// Configuration file (without extension)
    #[arg(short, long, default_value = "config/mock-interview")]
    config: String,

    /// Override the HTTP port from the configuration
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("Mock Interview v0.1.0");
    info!("Loaded config: {}", cfg.service.name);
    info!("Evaluation service: {}", cfg.evaluation.base_url);
    info!(
        "Question source: {:?}, coding stage: {}",
        cfg.interview.question_source, cfg.interview.coding_stage
    );

    let session = build_session(&cfg)?;
    let app = create_router(AppState::new(session));

    let port = args.port.unwrap_or(cfg.service.http.port);
    let addr = format!("{}:{}", cfg.service.http.bind, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP API listening on {}", addr);
    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}

fn build_session(cfg: &Config) -> Result<InterviewSession> {
    let client = Arc::new(HttpEvaluationClient::new(
        &cfg.evaluation.base_url,
        Duration::from_secs(cfg.evaluation.timeout_secs),
    )?);

    let source = match cfg.audio.source {
        AudioSourceKind::Microphone => AudioSource::Microphone,
        AudioSourceKind::File => AudioSource::File(
            cfg.audio
                .file_path
                .clone()
                .context("audio.file_path is required for the file source")?,
        ),
    };
    info!("Audio source: {:?}", source);

    let backend_config = AudioBackendConfig {
        target_sample_rate: cfg.audio.sample_rate,
        target_channels: cfg.audio.channels,
        buffer_duration_ms: cfg.audio.buffer_duration_ms,
        realtime: cfg.audio.realtime,
    };

    let builder_config = backend_config.clone();
    let capture = BackendCaptureDevice::new(backend_config, move || {
        AudioBackendFactory::create(&source, builder_config.clone())
    })
    .into_shared();

    let questions = match cfg.interview.question_source {
        QuestionSourceKind::Fixed => QuestionPlan::Fixed(default_questions()),
        QuestionSourceKind::Generated => QuestionPlan::Generated(client.clone()),
    };

    let collaborators = Collaborators {
        questions,
        submissions: client.clone(),
        prompts: client.clone(),
        coding: client,
        capture,
    };

    Ok(InterviewSession::new(
        SessionConfig::new(cfg.interview.coding_stage),
        collaborators,
    ))
}
