// Prompt templates for the generative client. Placeholders are `{name}`
// tokens replaced before sending; the literal braces in the JSON examples are
// never substituted.

/// Question-generation template.
/// Replace: {question_count}, {position}, {cv_text}
pub const QUESTION_GENERATION_PROMPT: &str = r#"You are an experienced HR interviewer. Review the CV below and the position applied for, then write {question_count} interview questions tailored to this candidate.

**Position applied for:** {position}

**Candidate CV:**
{cv_text}

Your task:
1. Base the questions on the experience, skills and projects in the CV
2. Mix difficulty levels (Easy, Medium, Hard)
3. Balance technical, behavioural and situational questions
4. Assign every question a category (e.g. Technical, Behavioural, Problem Solving, Leadership)

OUTPUT FORMAT (JSON ONLY, NOTHING ELSE):
Respond with exactly this JSON shape. No explanations, no extra text:

{
  "questions": [
    {
      "questionText": "Question text here",
      "difficulty": "Easy|Medium|Hard",
      "category": "Category name"
    }
  ]
}

IMPORTANT:
- The response must be a single valid JSON object
- Do not use markdown code fences (```)
- Return plain JSON text only
- Produce exactly {question_count} questions
- Every question must have questionText, difficulty and category filled in"#;

/// Transcript-analysis template.
/// Replace: {position}, {transcript}
pub const TRANSCRIPT_ANALYSIS_PROMPT: &str = r#"You are an experienced HR interviewer evaluating a completed job interview for the position of {position}.

Below is the full interview transcript. Unanswered questions appear with an empty answer; weigh them accordingly.

{transcript}

Assess the candidate's overall performance: correctness and depth of the answers, communication, and suitability for the position.

OUTPUT FORMAT (JSON ONLY, NOTHING ELSE):
{
  "overallScore": 7.5,
  "overallFeedback": "Two or three sentences of concrete feedback."
}

IMPORTANT:
- overallScore is a number from 0 to 10
- Do not use markdown code fences (```)
- Return plain JSON text only"#;
