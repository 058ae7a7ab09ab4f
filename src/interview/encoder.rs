use anyhow::{Context, Result as AnyResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use futures::future::try_join_all;
use tracing::{debug, error};

use super::types::{EncodedResponse, Response};
use crate::capture::Artifact;
use crate::error::{InterviewError, Result};

/// Transcodes response artifacts into transport payloads
pub struct ResponseEncoder;

impl ResponseEncoder {
    /// Encode every response, preserving order
    ///
    /// Items are transcoded concurrently on the blocking pool; the call
    /// resolves only once all of them finish and fails as a whole if any
    /// single item fails.
    pub async fn encode_all(responses: &[Response]) -> Result<Vec<EncodedResponse>> {
        let tasks = responses.iter().map(|response| {
            let question_id = response.question_id.clone();
            let data = response.artifact.data.clone();

            async move {
                let payload = tokio::task::spawn_blocking(move || STANDARD.encode(data))
                    .await
                    .map_err(|e| {
                        error!("Encoding task for question {} failed: {}", question_id, e);
                        InterviewError::EncodingFailed(format!(
                            "question {}: {}",
                            question_id, e
                        ))
                    })?;

                Ok::<_, InterviewError>(EncodedResponse {
                    question_id,
                    payload: strip_data_uri_prefix(&payload).to_string(),
                })
            }
        });

        let encoded = try_join_all(tasks).await?;
        debug!("Encoded {} responses", encoded.len());
        Ok(encoded)
    }
}

/// Base64 body of an artifact
pub fn encode_artifact(artifact: &Artifact) -> String {
    STANDARD.encode(&artifact.data)
}

/// Data URI for an artifact (`data:<mime>;base64,<body>`)
pub fn to_data_uri(artifact: &Artifact) -> String {
    format!("data:{};base64,{}", artifact.mime_type, encode_artifact(artifact))
}

/// Strip a leading `data:...,` prefix, leaving only the payload body
pub fn strip_data_uri_prefix(payload: &str) -> &str {
    if payload.starts_with("data:") {
        if let Some((_, body)) = payload.split_once(',') {
            return body;
        }
    }
    payload
}

/// Decode a base64 payload, with or without a data-URI prefix
pub fn decode_payload(payload: &str) -> AnyResult<Vec<u8>> {
    STANDARD
        .decode(strip_data_uri_prefix(payload.trim()))
        .context("Invalid base64 payload")
}
