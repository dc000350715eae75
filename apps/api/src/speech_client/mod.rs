/// Speech transcription client — wraps the external speech-to-text
/// microservice behind one multipart upload per call. No retry: a failed
/// transcription surfaces immediately and the caller decides what to do.
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum SpeechError {
    /// The service could not be reached at all (connect/transport failure).
    #[error("speech service unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// The service answered with a non-success status or an unusable body.
    #[error("speech service error (status {status}): {message}")]
    Service { status: u16, message: String },

    /// The service answered, but the transcription is empty.
    #[error("no speech detected in the uploaded audio")]
    NoSpeech,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: Option<String>,
}

/// The transcription collaborator as seen by the session manager.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(&self, audio: Vec<u8>, file_name: &str) -> Result<String, SpeechError>;
}

#[derive(Clone)]
pub struct SpeechHttpClient {
    client: reqwest::Client,
    endpoint: String,
}

impl SpeechHttpClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl SpeechToText for SpeechHttpClient {
    async fn transcribe(&self, audio: Vec<u8>, file_name: &str) -> Result<String, SpeechError> {
        info!("Transcribing audio file '{file_name}' ({} bytes)", audio.len());

        let part = reqwest::multipart::Part::bytes(audio).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("audio_file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(SpeechError::Unreachable)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Speech service returned {status}: {body}");
            return Err(SpeechError::Service {
                status: status.as_u16(),
                message: body,
            });
        }

        let payload: TranscriptionResponse =
            response.json().await.map_err(|e| SpeechError::Service {
                status: status.as_u16(),
                message: format!("invalid response body: {e}"),
            })?;

        validate_transcription(payload.text)
    }
}

/// An empty or whitespace-only transcription means the audio carried no
/// usable speech; that is the caller's problem, not the service's.
fn validate_transcription(text: Option<String>) -> Result<String, SpeechError> {
    match text {
        Some(t) if !t.trim().is_empty() => Ok(t),
        _ => Err(SpeechError::NoSpeech),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_transcription_passes_text_through() {
        let text = validate_transcription(Some("I used caching.".to_string())).unwrap();
        assert_eq!(text, "I used caching.");
    }

    #[test]
    fn test_validate_transcription_rejects_missing_text() {
        assert!(matches!(
            validate_transcription(None),
            Err(SpeechError::NoSpeech)
        ));
    }

    #[test]
    fn test_validate_transcription_rejects_whitespace_only() {
        assert!(matches!(
            validate_transcription(Some("   \n ".to_string())),
            Err(SpeechError::NoSpeech)
        ));
    }
}
