//! Q&A transcript assembly for the analysis prompt.

use crate::ai_client::QaPair;
use crate::models::interview::InterviewDetails;

/// Builds the transcript handed to the generative client: every bound
/// question in binding order, answered or not. Unanswered questions carry an
/// empty answer verbatim — the analysis sees exactly what was (not) said.
pub fn qa_pairs(details: &InterviewDetails) -> Vec<QaPair> {
    details
        .questions
        .iter()
        .map(|q| QaPair {
            question: q.text.clone(),
            answer: q.answer_text.clone().unwrap_or_default(),
        })
        .collect()
}
