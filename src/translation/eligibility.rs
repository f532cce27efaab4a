/*!
 * Eligibility filter for Markdown cells.
 *
 * Decides whether a cell carries enough prose to be worth a request. Cells
 * that are empty, a single fenced code block, a single math block, or mostly
 * code and formulas are skipped.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum prose length, in characters, after code and math are removed
pub const MIN_TRANSLATABLE_CHARS: usize = 10;

/// Fenced code block, shortest match
static CODE_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```.*?```").unwrap());

/// Whole text is one `$...$` or `$$...$$` block
static SINGLE_MATH_BLOCK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\A(?:\$\$[^$]+\$\$|\$[^$]+\$)\z").unwrap());

/// Display or inline math span, shortest match
static MATH_SPAN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\$\$.*?\$\$|\$[^$]*?\$").unwrap());

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Whether `text` should be sent for translation
pub fn is_translatable(text: &str, skip_code_blocks: bool, skip_math_formulas: bool) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }

    if skip_code_blocks && is_single_code_block(trimmed) {
        return false;
    }

    if skip_math_formulas && SINGLE_MATH_BLOCK_REGEX.is_match(trimmed) {
        return false;
    }

    let mut remaining = trimmed.to_string();
    if skip_code_blocks {
        remaining = CODE_BLOCK_REGEX.replace_all(&remaining, "").into_owned();
    }
    if skip_math_formulas {
        remaining = MATH_SPAN_REGEX.replace_all(&remaining, "").into_owned();
    }

    let collapsed = WHITESPACE_REGEX.replace_all(remaining.trim(), " ");
    collapsed.chars().count() > MIN_TRANSLATABLE_CHARS
}

fn is_single_code_block(trimmed: &str) -> bool {
    CODE_BLOCK_REGEX
        .find(trimmed)
        .is_some_and(|m| m.start() == 0 && m.end() == trimmed.len())
}
