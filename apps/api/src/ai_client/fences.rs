//! Code-fence normalization for AI output.
//!
//! The model is told to return bare JSON but routinely wraps it anyway. The
//! grammar here is deliberately narrow: strip at most one leading fence with
//! an optional language tag, and at most one trailing fence. Anything inside
//! the body is left untouched.

/// Strips one optional leading ```/```lang fence and one optional trailing
/// ``` fence from `text`, returning the trimmed body.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // A language tag is a run of alphanumerics between the fence and the
    // first line break ("```json\n…"). If the first line is anything else,
    // the fence was inline and the whole remainder is body.
    let body = match rest.split_once('\n') {
        Some((tag, body)) if tag.trim().chars().all(|c| c.is_ascii_alphanumeric()) => body,
        _ => rest,
    };

    let body = body.trim_end();
    let body = body.strip_suffix("```").unwrap_or(body);
    body.trim()
}
