//! Reply parsing for the classification model.

use std::sync::LazyLock;

use regex::Regex;

use super::{ClassificationOutcome, ClassificationResult};

/// `<digits>. ` list markers anywhere in the text, e.g. the "2. " in
/// "2. Spreads quickly" or "Step2. Spreads quickly".
static ORDINAL_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\s").expect("ordinal marker pattern is valid"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Parse a raw model reply into a verdict.
///
/// The first whitespace-separated token, stripped of trailing `.`/`,` and
/// lower-cased, must be `true` or `false`. For `true`, everything after the
/// first period of the reply becomes the (cleaned) detail, so the whole first
/// sentence is discarded. Any other leading token is an invalid reply.
pub fn parse_reply(raw: &str) -> ClassificationOutcome {
    let text = raw.trim();
    let token = text
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .trim_end_matches(['.', ','])
        .to_lowercase();

    match token.as_str() {
        "true" => {
            let detail = text.split_once('.').map(|(_, rest)| rest).unwrap_or_default();
            ClassificationOutcome::Classified(ClassificationResult::invasive(clean_detail(detail)))
        }
        "false" => ClassificationOutcome::Classified(ClassificationResult::not_invasive()),
        "" => ClassificationOutcome::Invalid("empty reply".into()),
        other => ClassificationOutcome::Invalid(format!("unrecognized leading token '{other}'")),
    }
}

/// Strip markdown and list formatting from model prose.
///
/// Newlines become spaces, `**` bold markers and `<digits>. ` list markers are
/// removed, whitespace runs collapse to one space, and the ends are trimmed.
pub fn clean_detail(text: &str) -> String {
    let text = text.replace('\n', " ").replace("**", "");
    let text = ORDINAL_MARKER.replace_all(&text, "");
    WHITESPACE_RUN.replace_all(&text, " ").trim().to_string()
}
