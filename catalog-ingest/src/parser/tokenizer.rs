//! Folder-name tokens: validation and name extraction
//!
//! `is_identity_token` separates plausible studio/model text from the noise that
//! photo-set dumps carry in their names (file counts, sizes, resolutions, dates,
//! serial numbers). `extract_candidate_names` pulls a person-like name off the
//! front of residual text.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+$").expect("valid numeric regex"));

/// YYYY-MM-DD / YYYY.MM.DD
static RE_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}[-.]\d{1,2}[-.]\d{1,2}$").expect("valid date regex"));

/// `<N><unit>` chains: 100P+2V, 29P+1V328M, 1.2GB, 4K
static RE_SIZE_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\d+(?:\.\d+)?\s*(?:MB|GB|P|V|K|M)(?:\s*\+?\s*\d+(?:\.\d+)?\s*(?:MB|GB|P|V|K|M))*$",
    )
    .expect("valid size marker regex")
});

/// NO.123
static RE_SERIAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^NO\.\s*\d+$").expect("valid serial regex"));

static RE_BRACKET_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]*)\]").expect("valid bracket regex"));

static RE_LEADING_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}[-.]\d{1,2}[-.]\d{1,2}").expect("valid date prefix regex"));

static RE_LEADING_SERIAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^NO\.\s*\d+").expect("valid serial prefix regex"));

/// 2-8 ideographs followed by end of text or a non-ideograph
static RE_CJK_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\p{Han}{2,8})(?:$|[^\p{Han}])").expect("valid CJK name regex"));

/// "Emma" or "Emma Stone"
static RE_ENGLISH_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z][A-Za-z]+(?: [A-Z][A-Za-z]+)?)\b").expect("valid English name regex")
});

static RE_WORD_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{Han}A-Za-z0-9]+$").expect("valid word regex"));

/// Separator characters trimmed from the edges of residual text
const SEPARATOR_CHARS: &[char] = &['-', '_', '@', '.', ',', '|', '~', '·', '+'];

/// True when `text` could plausibly be a studio or model name
pub fn is_identity_token(text: &str) -> bool {
    let text = text.trim();

    if text.chars().count() < 2 {
        return false;
    }

    !(RE_NUMERIC.is_match(text)
        || RE_DATE.is_match(text)
        || RE_SIZE_MARKER.is_match(text)
        || RE_SERIAL.is_match(text))
}

pub fn is_date(text: &str) -> bool {
    RE_DATE.is_match(text.trim())
}

/// Inner text of every `[...]` group, in order of appearance
pub fn bracket_groups(name: &str) -> Vec<&str> {
    RE_BRACKET_GROUP
        .captures_iter(name)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

pub fn strip_bracket_groups(text: &str) -> String {
    RE_BRACKET_GROUP.replace_all(text, " ").into_owned()
}

/// Trim whitespace and separator characters from both ends
pub fn trim_separators(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || SEPARATOR_CHARS.contains(&c))
}

/// Drop a leading date, then a leading `NO.<digits>`
pub fn strip_leading_noise(text: &str) -> String {
    let text = trim_separators(text);
    let text = RE_LEADING_DATE.replace(text, "");
    let text = trim_separators(&text).to_string();
    let text = RE_LEADING_SERIAL.replace(&text, "");
    trim_separators(&text).to_string()
}

/// Candidate person names at the start of `text`; first matching rule only
pub fn extract_candidate_names(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    if let Some(caps) = RE_CJK_NAME.captures(text) {
        return vec![caps[1].to_string()];
    }

    if let Some(caps) = RE_ENGLISH_NAME.captures(text) {
        return vec![caps[1].to_string()];
    }

    let first_word = text
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .find(|w| !w.is_empty());

    match first_word {
        Some(word) if is_identity_token(word) && RE_WORD_CHARS.is_match(word) => {
            vec![word.to_string()]
        }
        _ => Vec::new(),
    }
}
