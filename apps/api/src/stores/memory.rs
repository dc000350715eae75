//! In-memory store doubles for session-manager tests.
//!
//! Deterministic stand-ins for the Postgres stores: `find_random` returns the
//! pool in seed order, the unique (interview, question) pair is enforced, and
//! inserts can be made to fail to exercise partial-flow behavior. Test-only.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::interview::{
    BoundQuestion, InterviewDetails, InterviewQuestionRow, InterviewRow, InterviewStatus,
    InterviewSummary, NewInterview,
};
use crate::models::question::{Difficulty, NewQuestion, QuestionRow};
use crate::models::user::{CvRow, UserRow, UserSummary};
use crate::stores::{CvStore, InterviewStore, QuestionStore};

#[derive(Default)]
pub struct MemQuestionStore {
    questions: Mutex<Vec<QuestionRow>>,
}

impl MemQuestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, text: &str, category: &str, difficulty: Difficulty) -> Uuid {
        let id = Uuid::new_v4();
        self.questions.lock().unwrap().push(QuestionRow {
            id,
            text: text.to_string(),
            category: category.to_string(),
            difficulty,
            created_at: Utc::now(),
        });
        id
    }

    pub fn len(&self) -> usize {
        self.questions.lock().unwrap().len()
    }

    fn get_sync(&self, id: Uuid) -> Option<QuestionRow> {
        self.questions
            .lock()
            .unwrap()
            .iter()
            .find(|q| q.id == id)
            .cloned()
    }
}

#[async_trait]
impl QuestionStore for MemQuestionStore {
    async fn find_random(
        &self,
        count: u32,
        category: Option<&str>,
    ) -> Result<Vec<QuestionRow>, AppError> {
        let questions = self.questions.lock().unwrap();
        Ok(questions
            .iter()
            .filter(|q| category.map_or(true, |c| q.category == c))
            .take(count as usize)
            .cloned()
            .collect())
    }

    async fn insert(&self, question: NewQuestion) -> Result<QuestionRow, AppError> {
        let row = QuestionRow {
            id: Uuid::new_v4(),
            text: question.text,
            category: question.category,
            difficulty: question.difficulty,
            created_at: Utc::now(),
        };
        self.questions.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<QuestionRow>, AppError> {
        Ok(self.get_sync(id))
    }
}

#[derive(Default)]
pub struct MemCvStore {
    cvs: Mutex<Vec<CvRow>>,
}

impl MemCvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, user_id: Uuid) -> Uuid {
        let id = Uuid::new_v4();
        self.cvs.lock().unwrap().push(CvRow {
            id,
            user_id,
            file_name: "cv.pdf".to_string(),
            uploaded_at: Utc::now(),
        });
        id
    }
}

#[async_trait]
impl CvStore for MemCvStore {
    async fn get(&self, id: Uuid) -> Result<Option<CvRow>, AppError> {
        Ok(self
            .cvs
            .lock()
            .unwrap()
            .iter()
            .find(|cv| cv.id == id)
            .cloned())
    }
}

pub struct MemInterviewStore {
    interviews: Mutex<HashMap<Uuid, InterviewRow>>,
    bound: Mutex<Vec<InterviewQuestionRow>>,
    users: Mutex<Vec<UserRow>>,
    catalog: Arc<MemQuestionStore>,
    fail_inserts: AtomicBool,
}

impl MemInterviewStore {
    pub fn new(catalog: Arc<MemQuestionStore>) -> Self {
        Self {
            interviews: Mutex::new(HashMap::new()),
            bound: Mutex::new(Vec::new()),
            users: Mutex::new(Vec::new()),
            catalog,
            fail_inserts: AtomicBool::new(false),
        }
    }

    pub fn add_user(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.users.lock().unwrap().push(UserRow {
            id,
            email: format!("{id}@example.com"),
            first_name: None,
            last_name: None,
            created_at: Utc::now(),
        });
        id
    }

    /// Makes every subsequent `insert` fail, for partial-flow tests.
    pub fn fail_inserts(&self) {
        self.fail_inserts.store(true, Ordering::SeqCst);
    }

    /// Raw answer cell for assertions: outer None if the pair is not bound.
    pub fn answer_of(&self, interview_id: Uuid, question_id: Uuid) -> Option<Option<String>> {
        self.bound
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.interview_id == interview_id && b.question_id == question_id)
            .map(|b| b.answer_text.clone())
    }
}

#[async_trait]
impl InterviewStore for MemInterviewStore {
    async fn insert(&self, interview: NewInterview) -> Result<(), AppError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(AppError::Internal(anyhow!("interview insert failed")));
        }

        let mut bound = self.bound.lock().unwrap();
        for (ordinal, question_id) in interview.question_ids.iter().enumerate() {
            if bound
                .iter()
                .any(|b| b.interview_id == interview.id && b.question_id == *question_id)
                || interview.question_ids[..ordinal].contains(question_id)
            {
                return Err(AppError::Internal(anyhow!(
                    "question {question_id} bound twice into interview {}",
                    interview.id
                )));
            }
            bound.push(InterviewQuestionRow {
                id: Uuid::new_v4(),
                interview_id: interview.id,
                question_id: *question_id,
                answer_text: None,
                score: None,
                feedback: None,
                ordinal: ordinal as i32,
            });
        }

        self.interviews.lock().unwrap().insert(
            interview.id,
            InterviewRow {
                id: interview.id,
                user_id: interview.user_id,
                position: interview.position,
                status: InterviewStatus::Ongoing,
                started_at: interview.started_at,
                completed_at: None,
                overall_score: None,
                overall_feedback: None,
                cv_id: interview.cv_id,
            },
        );
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<InterviewRow>, AppError> {
        Ok(self.interviews.lock().unwrap().get(&id).cloned())
    }

    async fn get_with_details(&self, id: Uuid) -> Result<Option<InterviewDetails>, AppError> {
        let Some(interview) = self.interviews.lock().unwrap().get(&id).cloned() else {
            return Ok(None);
        };

        let user: UserSummary = self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == interview.user_id)
            .cloned()
            .ok_or_else(|| AppError::Internal(anyhow!("user {} missing", interview.user_id)))?
            .into();

        let mut rows: Vec<InterviewQuestionRow> = self
            .bound
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.interview_id == id)
            .cloned()
            .collect();
        rows.sort_by_key(|b| b.ordinal);

        let questions = rows
            .into_iter()
            .map(|b| {
                let q = self
                    .catalog
                    .get_sync(b.question_id)
                    .ok_or_else(|| AppError::Internal(anyhow!("question {} missing", b.question_id)))?;
                Ok(BoundQuestion {
                    id: b.id,
                    question_id: b.question_id,
                    text: q.text,
                    category: q.category,
                    difficulty: q.difficulty,
                    answer_text: b.answer_text,
                    score: b.score,
                    feedback: b.feedback,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        // The double does not model CV joins; cv stays None.
        Ok(Some(InterviewDetails::assemble(
            interview, user, None, questions,
        )))
    }

    async fn set_answer(
        &self,
        interview_id: Uuid,
        question_id: Uuid,
        answer_text: &str,
    ) -> Result<(), AppError> {
        let mut bound = self.bound.lock().unwrap();
        if let Some(row) = bound
            .iter_mut()
            .find(|b| b.interview_id == interview_id && b.question_id == question_id)
        {
            row.answer_text = Some(answer_text.to_string());
        }
        Ok(())
    }

    async fn complete(
        &self,
        id: Uuid,
        completed_at: DateTime<Utc>,
        overall_score: f32,
        overall_feedback: &str,
    ) -> Result<(), AppError> {
        if let Some(row) = self.interviews.lock().unwrap().get_mut(&id) {
            row.status = InterviewStatus::Completed;
            row.completed_at = Some(completed_at);
            row.overall_score = Some(overall_score);
            row.overall_feedback = Some(overall_feedback.to_string());
        }
        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<InterviewSummary>, AppError> {
        let mut rows: Vec<InterviewSummary> = self
            .interviews
            .lock()
            .unwrap()
            .values()
            .filter(|i| i.user_id == user_id)
            .map(|i| InterviewSummary {
                id: i.id,
                position: i.position.clone(),
                status: i.status,
                started_at: i.started_at,
                overall_score: i.overall_score,
            })
            .collect();
        rows.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(rows)
    }
}
