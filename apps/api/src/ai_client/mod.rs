/// Generative AI client — the single point of entry for all generative calls
/// in this service: question authoring from a CV, and transcript scoring.
///
/// Wraps the Gemini `generateContent` REST endpoint with fixed sampling
/// parameters. Every call is single-shot: no retry, no caching, and only the
/// transport-default timeout. Two identical calls may yield different output.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub mod fences;
pub mod prompts;

use fences::strip_code_fences;
use prompts::{QUESTION_GENERATION_PROMPT, TRANSCRIPT_ANALYSIS_PROMPT};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.95;
const MAX_OUTPUT_TOKENS: u32 = 8192;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("AI returned no content")]
    Empty,

    #[error("AI response malformed: {0}")]
    Malformed(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.is_empty()).then_some(text)
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Payload types
// ────────────────────────────────────────────────────────────────────────────

/// One question as authored by the AI. `difficulty` is a free-text label
/// mapped into the catalog's difficulty enum by the question source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    pub question_text: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_difficulty() -> String {
    "Medium".to_string()
}

fn default_category() -> String {
    "General".to_string()
}

#[derive(Debug, Deserialize)]
struct QuestionsPayload {
    questions: Vec<GeneratedQuestion>,
}

/// One question/answer pair of a session transcript. Unanswered questions
/// carry an empty answer string, verbatim.
#[derive(Debug, Clone)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// The AI's verdict over a full transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptAnalysis {
    pub overall_score: f32,
    pub overall_feedback: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait + Gemini implementation
// ────────────────────────────────────────────────────────────────────────────

/// The generative collaborator as seen by the session manager. Implement this
/// to swap the backend (or to script responses in tests) without touching the
/// orchestrator.
#[async_trait]
pub trait GenAi: Send + Sync {
    async fn generate_questions(
        &self,
        cv_text: &str,
        position: &str,
        count: u32,
    ) -> Result<Vec<GeneratedQuestion>, AiError>;

    async fn analyze_transcript(
        &self,
        position: &str,
        qa_pairs: &[QaPair],
    ) -> Result<TranscriptAnalysis, AiError>;
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Credentials and model id are fixed at construction; there is no
    /// mutable client configuration after startup.
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
        }
    }

    /// Makes one `generateContent` call and returns the raw response text.
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let request_body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        let url = format!("{GEMINI_API_BASE}/{}:generateContent", self.model);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(AiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text = parsed.text().ok_or(AiError::Empty)?;
        if text.trim().is_empty() {
            return Err(AiError::Empty);
        }

        debug!("AI call succeeded: {} chars of output", text.len());
        Ok(text)
    }
}

#[async_trait]
impl GenAi for GeminiClient {
    async fn generate_questions(
        &self,
        cv_text: &str,
        position: &str,
        count: u32,
    ) -> Result<Vec<GeneratedQuestion>, AiError> {
        info!("Generating {count} interview questions for position '{position}'");

        let prompt = QUESTION_GENERATION_PROMPT
            .replace("{question_count}", &count.to_string())
            .replace("{position}", position)
            .replace("{cv_text}", cv_text);

        let raw = self.generate(&prompt).await?;
        let questions = parse_questions_payload(&raw)?;

        info!("AI returned {} questions", questions.len());
        Ok(questions)
    }

    async fn analyze_transcript(
        &self,
        position: &str,
        qa_pairs: &[QaPair],
    ) -> Result<TranscriptAnalysis, AiError> {
        info!(
            "Analyzing transcript of {} answers for position '{position}'",
            qa_pairs.len()
        );

        let prompt = TRANSCRIPT_ANALYSIS_PROMPT
            .replace("{position}", position)
            .replace("{transcript}", &render_transcript(qa_pairs));

        let raw = self.generate(&prompt).await?;
        parse_analysis_payload(&raw)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Response parsing
// ────────────────────────────────────────────────────────────────────────────

fn parse_questions_payload(raw: &str) -> Result<Vec<GeneratedQuestion>, AiError> {
    let cleaned = strip_code_fences(raw);
    let payload: QuestionsPayload = serde_json::from_str(cleaned).map_err(|e| {
        AiError::Malformed(format!(
            "expected a JSON object with a `questions` array: {e}"
        ))
    })?;
    Ok(payload.questions)
}

fn parse_analysis_payload(raw: &str) -> Result<TranscriptAnalysis, AiError> {
    let cleaned = strip_code_fences(raw);
    serde_json::from_str(cleaned).map_err(|e| {
        AiError::Malformed(format!(
            "expected a JSON object with overallScore and overallFeedback: {e}"
        ))
    })
}

/// Renders the transcript block embedded in the analysis prompt. Every bound
/// question appears, answered or not.
fn render_transcript(qa_pairs: &[QaPair]) -> String {
    let mut out = String::new();
    for (i, pair) in qa_pairs.iter().enumerate() {
        out.push_str(&format!("Question {}: {}\n", i + 1, pair.question));
        out.push_str(&format!("Answer {}: {}\n\n", i + 1, pair.answer));
    }
    out
}
