//! Model reply parsing
//!
//! Replies are free text that is expected, but not guaranteed, to follow the
//! section layout requested in [`crate::core::prompts`]. Parsing never fails:
//! when the markers are missing, placeholder values are returned instead.

use crate::core::prompts::{
    IMPROVEMENTS_MARKER, PRIMARY_MARKER, REASONING_MARKER, REFINED_TEXT_MARKER,
    SUGGESTED_TITLES_MARKER,
};
use lazy_static::lazy_static;
use regex::Regex;

/// Improvement list used when the reply has no improvements section
pub const DEFAULT_IMPROVEMENT: &str = "Text has been refined for better clarity and flow";

/// Title list used when the reply contains no recognisable titles
pub const DEFAULT_TITLES: [&str; 3] = ["Generated Title 1", "Generated Title 2", "Generated Title 3"];

lazy_static! {
    static ref NUMBERED_ITEM: Regex = Regex::new(r"^\d+\s*[.)]\s*(.*)$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRefinement {
    pub refined_text: String,
    pub improvements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTitles {
    pub suggested_titles: Vec<String>,
    pub primary_title: String,
}

/// Split a refinement reply into the rewritten text and the improvement bullets.
pub fn parse_refinement(reply: &str) -> ParsedRefinement {
    let mut parts = reply.splitn(3, IMPROVEMENTS_MARKER);
    let head = parts.next().unwrap_or_default();

    let Some(tail) = parts.next() else {
        return ParsedRefinement {
            refined_text: reply.trim().to_string(),
            improvements: vec![DEFAULT_IMPROVEMENT.to_string()],
        };
    };

    let refined_text = head.replace(REFINED_TEXT_MARKER, "").trim().to_string();

    let improvements = tail
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(REFINED_TEXT_MARKER))
        .map(|line| strip_bullet(line).trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();

    ParsedRefinement { refined_text, improvements }
}

// Dashes and spaces first, then bullet dots and spaces.
fn strip_bullet(line: &str) -> &str {
    line.trim_start_matches(|c: char| c == '-' || c == ' ')
        .trim_start_matches(|c: char| c == '•' || c == ' ')
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Titles,
    Primary,
}

/// Extract the suggested titles and the recommended one from a title reply.
pub fn parse_titles(reply: &str) -> ParsedTitles {
    let mut section = Section::Preamble;
    let mut suggested_titles = Vec::new();
    let mut primary_title: Option<String> = None;

    for line in reply.lines().map(str::trim) {
        if line.contains(SUGGESTED_TITLES_MARKER) {
            section = Section::Titles;
            continue;
        }

        if let Some(idx) = line.find(PRIMARY_MARKER) {
            section = Section::Primary;
            // "PRIMARY RECOMMENDATION: Some Title" on a single line
            let inline = clean_title(&line[idx + PRIMARY_MARKER.len()..]);
            if primary_title.is_none() && !inline.is_empty() {
                primary_title = Some(inline.to_string());
            }
            continue;
        }

        if line.contains(REASONING_MARKER) {
            break;
        }

        if line.is_empty() {
            continue;
        }

        match section {
            Section::Titles => {
                if let Some(title) = extract_title(line) {
                    suggested_titles.push(title.to_string());
                }
            }
            Section::Primary if primary_title.is_none() => {
                let candidate = clean_title(line);
                if !candidate.is_empty() {
                    primary_title = Some(candidate.to_string());
                }
            }
            _ => {}
        }
    }

    if suggested_titles.is_empty() {
        return ParsedTitles {
            suggested_titles: DEFAULT_TITLES.iter().map(|t| t.to_string()).collect(),
            primary_title: DEFAULT_TITLES[0].to_string(),
        };
    }

    let primary_title = primary_title.unwrap_or_else(|| suggested_titles[0].clone());

    ParsedTitles { suggested_titles, primary_title }
}

/// Pull the title out of a numbered or bulleted list line.
fn extract_title(line: &str) -> Option<&str> {
    let raw = if let Some(caps) = NUMBERED_ITEM.captures(line) {
        caps.get(1).map_or("", |m| m.as_str())
    } else if line.starts_with(|c: char| c.is_ascii_digit()) && line.contains('.') {
        line.split_once('.').map_or("", |(_, rest)| rest)
    } else if let Some(rest) = line.strip_prefix('-').or_else(|| line.strip_prefix('•')) {
        rest
    } else {
        return None;
    };

    let title = clean_title(raw);
    (!title.is_empty()).then_some(title)
}

fn clean_title(raw: &str) -> &str {
    raw.trim().trim_matches(|c: char| c == '*' || c == '"').trim()
}
