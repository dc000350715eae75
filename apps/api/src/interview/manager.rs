//! Interview Session Manager — owns the session state machine.
//!
//! Flow: start (random draw or CV extraction → AI generation) → answer
//! collection (text, or audio through the transcription client) → completion
//! (caller-supplied verdict, or AI analysis of the full transcript).
//!
//! Sessions move `ONGOING → COMPLETED` and nowhere else. Every operation is
//! one unit of work; external failures surface immediately and partially
//! completed flows are left as-is (no compensation, no retry).

use std::str::FromStr;
use std::sync::Arc;

use anyhow::anyhow;
use bytes::Bytes;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::ai_client::{GenAi, TranscriptAnalysis};
use crate::errors::AppError;
use crate::extraction;
use crate::interview::transcript;
use crate::models::interview::{
    InterviewDetails, InterviewStatus, InterviewSummary, NewInterview,
};
use crate::questions;
use crate::speech_client::SpeechToText;
use crate::stores::{CvStore, InterviewStore, QuestionStore};

/// What happens when `complete_interview` hits an already-COMPLETED session.
///
/// `Overwrite` reproduces the historical behavior: no status check, the new
/// verdict silently replaces score, feedback and completion time. `Reject`
/// refuses the write and mutates nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecompletionPolicy {
    Overwrite,
    Reject,
}

impl FromStr for RecompletionPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "overwrite" => Ok(RecompletionPolicy::Overwrite),
            "reject" => Ok(RecompletionPolicy::Reject),
            other => Err(anyhow!("unknown recompletion policy '{other}'")),
        }
    }
}

/// Parameters for the random-draw start path.
#[derive(Debug, Clone)]
pub struct StartInterview {
    pub user_id: Uuid,
    pub position: String,
    pub cv_id: Option<Uuid>,
    pub question_count: u32,
    pub category: Option<String>,
}

/// The orchestrator. Stores and collaborators are injected as named trait
/// dependencies; all state lives behind them.
#[derive(Clone)]
pub struct InterviewManager {
    interviews: Arc<dyn InterviewStore>,
    questions: Arc<dyn QuestionStore>,
    cvs: Arc<dyn CvStore>,
    ai: Arc<dyn GenAi>,
    speech: Arc<dyn SpeechToText>,
    recompletion_policy: RecompletionPolicy,
}

impl InterviewManager {
    pub fn new(
        interviews: Arc<dyn InterviewStore>,
        questions: Arc<dyn QuestionStore>,
        cvs: Arc<dyn CvStore>,
        ai: Arc<dyn GenAi>,
        speech: Arc<dyn SpeechToText>,
        recompletion_policy: RecompletionPolicy,
    ) -> Self {
        Self {
            interviews,
            questions,
            cvs,
            ai,
            speech,
            recompletion_policy,
        }
    }

    /// Starts a session from a random catalog draw. The referenced CV, if
    /// any, must exist — its content is not read on this path.
    pub async fn start_interview(
        &self,
        request: StartInterview,
    ) -> Result<InterviewDetails, AppError> {
        if let Some(cv_id) = request.cv_id {
            self.cvs
                .get(cv_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("CV {cv_id} not found")))?;
        }

        let selected = questions::select_random(
            self.questions.as_ref(),
            request.question_count,
            request.category.as_deref(),
        )
        .await?;

        info!(
            "Starting interview for position '{}' with {} questions",
            request.position,
            selected.len()
        );

        let id = Uuid::new_v4();
        self.interviews
            .insert(NewInterview {
                id,
                user_id: request.user_id,
                position: request.position,
                cv_id: request.cv_id,
                started_at: Utc::now(),
                question_ids: selected.iter().map(|q| q.id).collect(),
            })
            .await?;

        self.created_details(id).await
    }

    /// Starts a session from an uploaded CV: extract text, generate questions
    /// through the AI, bind exactly the generated set.
    ///
    /// Generated questions join the catalog before the session row exists; a
    /// failure between the two leaves them there as orphans.
    pub async fn start_interview_from_cv(
        &self,
        user_id: Uuid,
        position: String,
        file_bytes: &[u8],
        file_name: &str,
        question_count: u32,
    ) -> Result<InterviewDetails, AppError> {
        let cv_text = extraction::extract_text(file_bytes, file_name)?;
        info!(
            "Extracted {} chars of CV text from '{file_name}'",
            cv_text.len()
        );

        let generated = questions::generate_from_cv(
            self.questions.as_ref(),
            self.ai.as_ref(),
            &cv_text,
            &position,
            question_count,
        )
        .await?;

        let id = Uuid::new_v4();
        self.interviews
            .insert(NewInterview {
                id,
                user_id,
                position,
                cv_id: None,
                started_at: Utc::now(),
                question_ids: generated.iter().map(|q| q.id).collect(),
            })
            .await?;

        self.created_details(id).await
    }

    /// Records a text answer. Resubmission always wins: the previous answer
    /// is overwritten and no history is kept.
    pub async fn submit_answer(
        &self,
        interview_id: Uuid,
        question_id: Uuid,
        answer_text: &str,
    ) -> Result<(), AppError> {
        let details = self.details_or_not_found(interview_id).await?;

        if details.status != InterviewStatus::Ongoing {
            return Err(AppError::NotOngoing(format!(
                "interview {interview_id} is not ongoing"
            )));
        }
        if !details.questions.iter().any(|q| q.question_id == question_id) {
            return Err(AppError::NotFound(format!(
                "question {question_id} is not part of interview {interview_id}"
            )));
        }

        self.interviews
            .set_answer(interview_id, question_id, answer_text)
            .await
    }

    /// Records an audio answer: transcribe first, then the exact validation
    /// and overwrite of `submit_answer`. Unusable audio never touches
    /// session state.
    pub async fn submit_audio_answer(
        &self,
        interview_id: Uuid,
        question_id: Uuid,
        audio: Bytes,
        file_name: &str,
    ) -> Result<String, AppError> {
        let transcribed = self.speech.transcribe(audio.to_vec(), file_name).await?;
        self.submit_answer(interview_id, question_id, &transcribed)
            .await?;
        Ok(transcribed)
    }

    /// Manual completion with a caller-supplied verdict. Stores the score and
    /// feedback verbatim. Whether an already-completed session may be
    /// completed again is decided by the configured `RecompletionPolicy`.
    pub async fn complete_interview(
        &self,
        interview_id: Uuid,
        overall_score: f32,
        overall_feedback: &str,
    ) -> Result<(), AppError> {
        let interview = self
            .interviews
            .get(interview_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("interview {interview_id} not found")))?;

        if self.recompletion_policy == RecompletionPolicy::Reject
            && interview.status == InterviewStatus::Completed
        {
            return Err(AppError::NotOngoing(format!(
                "interview {interview_id} is already completed"
            )));
        }

        self.interviews
            .complete(interview_id, Utc::now(), overall_score, overall_feedback)
            .await?;

        info!("Interview {interview_id} completed with score {overall_score}");
        Ok(())
    }

    /// AI-assisted completion: build the full transcript (unanswered
    /// questions included verbatim), ask the generative client for a verdict,
    /// then transition. An AI failure propagates without mutating the
    /// session.
    pub async fn analyze_and_complete_interview(
        &self,
        interview_id: Uuid,
    ) -> Result<TranscriptAnalysis, AppError> {
        let details = self.details_or_not_found(interview_id).await?;

        if details.status != InterviewStatus::Ongoing {
            return Err(AppError::NotOngoing(format!(
                "interview {interview_id} is not ongoing"
            )));
        }

        let pairs = transcript::qa_pairs(&details);
        let analysis = self.ai.analyze_transcript(&details.position, &pairs).await?;

        self.interviews
            .complete(
                interview_id,
                Utc::now(),
                analysis.overall_score,
                &analysis.overall_feedback,
            )
            .await?;

        info!(
            "Interview {interview_id} analyzed and completed with score {}",
            analysis.overall_score
        );
        Ok(analysis)
    }

    pub async fn get_interview_with_details(
        &self,
        interview_id: Uuid,
    ) -> Result<InterviewDetails, AppError> {
        self.details_or_not_found(interview_id).await
    }

    pub async fn list_interviews_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<InterviewSummary>, AppError> {
        self.interviews.list_by_user(user_id).await
    }

    async fn details_or_not_found(&self, id: Uuid) -> Result<InterviewDetails, AppError> {
        self.interviews
            .get_with_details(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("interview {id} not found")))
    }

    /// Reads back a session this manager just inserted.
    async fn created_details(&self, id: Uuid) -> Result<InterviewDetails, AppError> {
        self.interviews
            .get_with_details(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow!("interview {id} vanished after insert")))
    }
}
