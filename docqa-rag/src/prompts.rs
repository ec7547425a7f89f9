//! Prompt templates for the judge and synthesis calls.
//!
//! Templates carry named `{query}` and `{context}` placeholders and ask
//! the model for a strict JSON shape. Models routinely wrap that JSON in
//! markdown code fences anyway, so [`strip_code_fences`] runs before any
//! structural parse.

/// Judge template: decide whether context suffices to answer the query.
///
/// Expected response shape:
/// `{ "search_mode": bool, "detail": string, "search_query": string }`.
pub const VALIDATE_CONTEXT: &str = r#"You are an AI assistant performing context validation.
The user asked: "{query}".
The available context is: "{context}".

Determine if the context is sufficient to answer the query.
If sufficient, set "search_mode": false.
If insufficient, set "search_mode": true and suggest the missing information in "search_query" (5-6 words).
Provide a concise reason in "detail".

Strictly respond in JSON format like this:
{
  "search_mode": true or false,
  "detail": "Concise explanation of missing context or why context is enough.",
  "search_query": "Short phrase (5-6 words) to retrieve missing context if needed."
}"#;

/// Synthesis template: produce a cited answer from the given context.
///
/// Expected response shape: `{ "answer": string, "references": [string] }`.
pub const GENERATE_ANSWER: &str = r#"You are a helpful AI assistant.
The user asked: "{query}".
The available context is: "{context}".

Using the provided context, generate a clear, accurate, and concise answer.
Include the sources from the context that you used.

Strictly respond in JSON format like this:
{
  "answer": "Your answer here.",
  "references": ["Reference 1 from context", "Reference 2 from context"]
}"#;

/// Fill a template's `{query}` and `{context}` placeholders.
pub fn render(template: &str, query: &str, context: &str) -> String {
    template.replace("{query}", query).replace("{context}", context)
}

/// Remove a surrounding markdown code fence, if any.
///
/// Handles ```` ```json ... ``` ```` and bare ```` ``` ... ``` ````
/// wrappers; text without a fence is returned trimmed.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json", "JSON", ...) up to the first newline.
    let rest = match rest.find('\n') {
        Some(i) => &rest[i + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
