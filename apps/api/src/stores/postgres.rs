//! Postgres implementations of the entity stores.
//!
//! One unit of work per call against the shared pool. There is no session
//! lock and no optimistic-concurrency token on interview rows: concurrent
//! writes race with last-write-wins semantics at the storage layer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::interview::{
    BoundQuestion, InterviewDetails, InterviewRow, InterviewSummary, NewInterview,
};
use crate::models::question::{Difficulty, NewQuestion, QuestionRow};
use crate::models::user::{CvRow, UserRow};
use crate::stores::{CvStore, InterviewStore, QuestionStore};

// ────────────────────────────────────────────────────────────────────────────
// Question catalog
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PgQuestionStore {
    pool: PgPool,
}

impl PgQuestionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuestionStore for PgQuestionStore {
    async fn find_random(
        &self,
        count: u32,
        category: Option<&str>,
    ) -> Result<Vec<QuestionRow>, AppError> {
        let rows = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT id, text, category, difficulty, created_at
            FROM questions
            WHERE $2::text IS NULL OR category = $2
            ORDER BY RANDOM()
            LIMIT $1
            "#,
        )
        .bind(count as i64)
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn insert(&self, question: NewQuestion) -> Result<QuestionRow, AppError> {
        let row = QuestionRow {
            id: Uuid::new_v4(),
            text: question.text,
            category: question.category,
            difficulty: question.difficulty,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO questions (id, text, category, difficulty, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(row.id)
        .bind(&row.text)
        .bind(&row.category)
        .bind(row.difficulty)
        .bind(row.created_at)
        .execute(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<QuestionRow>, AppError> {
        let row = sqlx::query_as::<_, QuestionRow>(
            "SELECT id, text, category, difficulty, created_at FROM questions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// CV documents
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PgCvStore {
    pool: PgPool,
}

impl PgCvStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CvStore for PgCvStore {
    async fn get(&self, id: Uuid) -> Result<Option<CvRow>, AppError> {
        let row = sqlx::query_as::<_, CvRow>(
            "SELECT id, user_id, file_name, uploaded_at FROM cvs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Interview sessions
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PgInterviewStore {
    pool: PgPool,
}

impl PgInterviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Flat row shape for the bound-questions join.
#[derive(Debug, FromRow)]
struct BoundQuestionJoinRow {
    id: Uuid,
    question_id: Uuid,
    answer_text: Option<String>,
    score: Option<f32>,
    feedback: Option<String>,
    text: String,
    category: String,
    difficulty: Difficulty,
}

impl From<BoundQuestionJoinRow> for BoundQuestion {
    fn from(row: BoundQuestionJoinRow) -> Self {
        Self {
            id: row.id,
            question_id: row.question_id,
            text: row.text,
            category: row.category,
            difficulty: row.difficulty,
            answer_text: row.answer_text,
            score: row.score,
            feedback: row.feedback,
        }
    }
}

#[async_trait]
impl InterviewStore for PgInterviewStore {
    async fn insert(&self, interview: NewInterview) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO interviews (id, user_id, position, status, started_at, cv_id)
            VALUES ($1, $2, $3, 'ONGOING', $4, $5)
            "#,
        )
        .bind(interview.id)
        .bind(interview.user_id)
        .bind(&interview.position)
        .bind(interview.started_at)
        .bind(interview.cv_id)
        .execute(&mut *tx)
        .await?;

        // The unique (interview_id, question_id) constraint rejects a question
        // bound twice into the same session.
        for (ordinal, question_id) in interview.question_ids.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO interview_questions (id, interview_id, question_id, ordinal)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(interview.id)
            .bind(question_id)
            .bind(ordinal as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<InterviewRow>, AppError> {
        let row = sqlx::query_as::<_, InterviewRow>(
            r#"
            SELECT id, user_id, position, status, started_at, completed_at,
                   overall_score, overall_feedback, cv_id
            FROM interviews
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get_with_details(&self, id: Uuid) -> Result<Option<InterviewDetails>, AppError> {
        let Some(interview) = InterviewStore::get(self, id).await? else {
            return Ok(None);
        };

        let user = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, first_name, last_name, created_at FROM users WHERE id = $1",
        )
        .bind(interview.user_id)
        .fetch_one(&self.pool)
        .await?;

        let cv = match interview.cv_id {
            Some(cv_id) => sqlx::query_as::<_, CvRow>(
                "SELECT id, user_id, file_name, uploaded_at FROM cvs WHERE id = $1",
            )
            .bind(cv_id)
            .fetch_optional(&self.pool)
            .await?,
            None => None,
        };

        let questions = sqlx::query_as::<_, BoundQuestionJoinRow>(
            r#"
            SELECT iq.id, iq.question_id, iq.answer_text, iq.score, iq.feedback,
                   q.text, q.category, q.difficulty
            FROM interview_questions iq
            JOIN questions q ON q.id = iq.question_id
            WHERE iq.interview_id = $1
            ORDER BY iq.ordinal
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(BoundQuestion::from)
        .collect();

        Ok(Some(InterviewDetails::assemble(
            interview,
            user.into(),
            cv.map(Into::into),
            questions,
        )))
    }

    async fn set_answer(
        &self,
        interview_id: Uuid,
        question_id: Uuid,
        answer_text: &str,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE interview_questions
            SET answer_text = $3
            WHERE interview_id = $1 AND question_id = $2
            "#,
        )
        .bind(interview_id)
        .bind(question_id)
        .bind(answer_text)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn complete(
        &self,
        id: Uuid,
        completed_at: DateTime<Utc>,
        overall_score: f32,
        overall_feedback: &str,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE interviews
            SET status = 'COMPLETED', completed_at = $2, overall_score = $3, overall_feedback = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(completed_at)
        .bind(overall_score)
        .bind(overall_feedback)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<InterviewSummary>, AppError> {
        let rows = sqlx::query_as::<_, InterviewSummary>(
            r#"
            SELECT id, position, status, started_at, overall_score
            FROM interviews
            WHERE user_id = $1
            ORDER BY started_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
