//! Prompt templates sent to the model
//!
//! Templates use `{name}` placeholders. Rendering is a single left-to-right
//! pass, so braces inside user-supplied values are copied through untouched.

/// Section marker preceding the rewritten text in a refinement reply
pub const REFINED_TEXT_MARKER: &str = "REFINED TEXT:";
/// Section marker preceding the bullet list of improvements
pub const IMPROVEMENTS_MARKER: &str = "IMPROVEMENTS MADE:";
/// Section marker preceding the numbered title list
pub const SUGGESTED_TITLES_MARKER: &str = "SUGGESTED TITLES:";
/// Section marker preceding the recommended title
pub const PRIMARY_MARKER: &str = "PRIMARY RECOMMENDATION:";
/// Section marker that ends the useful part of a title reply
pub const REASONING_MARKER: &str = "REASONING:";

/// Tone applied when the request does not name one
pub const DEFAULT_TONE: &str = "professional";

pub const REFINE_TEMPLATE: &str = "\
You are an expert editor and writing coach. Refine and improve the text below while keeping its core message and intent.

INSTRUCTIONS:
- Improve clarity, readability, and flow
- Strengthen vocabulary and sentence structure
- Fix grammar and punctuation
- Keep the original meaning and key points
- Use a {tone} tone throughout
- {max_length_instruction}
- Make the text more engaging

ORIGINAL TEXT:
{text}

Reply with the refined version followed by a short list of the main improvements, using exactly this format:

REFINED TEXT:
[The improved version]

IMPROVEMENTS MADE:
- [One improvement per bullet]
";

pub const TITLE_TEMPLATE: &str = "\
You are a creative title writer and content strategist. Read the text below and propose compelling, accurate titles.

INSTRUCTIONS:
- Identify the core message, theme, and key points
- Make titles attention-grabbing but faithful to the content
- Mix styles: descriptive, creative, actionable, question-based
- Keep titles concise but informative (ideally 5-12 words)
- Titles should suit articles, blog posts, or documents

TEXT TO ANALYZE:
{text}

Give several options and pick the best one, using exactly this format:

SUGGESTED TITLES:
1. [Title option 1]
2. [Title option 2]
3. [Title option 3]
4. [Title option 4]
5. [Title option 5]

PRIMARY RECOMMENDATION:
[The best title from the list above]

REASONING:
[Why the primary title works best]
";

/// Substitute `{name}` placeholders in `template` with values from `vars`.
///
/// Placeholders without a matching entry are emitted verbatim.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Length guidance line for the refinement prompt; zero means no limit
pub fn max_length_instruction(max_length: Option<u32>) -> String {
    match max_length {
        Some(n) if n > 0 => format!("Keep the refined text under {} characters", n),
        _ => "Maintain appropriate length for the content".to_string(),
    }
}

pub fn refine_prompt(text: &str, tone: &str, max_length: Option<u32>) -> String {
    let instruction = max_length_instruction(max_length);
    render(
        REFINE_TEMPLATE,
        &[
            ("text", text),
            ("tone", tone),
            ("max_length_instruction", &instruction),
        ],
    )
}

pub fn title_prompt(text: &str) -> String {
    render(TITLE_TEMPLATE, &[("text", text)])
}
