//! Tagged-JSON extraction from raw model output.
//!
//! The generation prompts demand the structured payload wrapped in
//! `<JSON></JSON>` tags. Models still prepend/append prose and occasionally
//! emit `//` comments despite being told not to, so this module applies two
//! best-effort defenses before parsing:
//!   1. take the first tagged span only, ignoring everything around it;
//!   2. strip `//`-to-end-of-line comments inside the span.
//! Neither step is a guaranteed-correct JSON-superset parser. In particular,
//! the comment strip would also eat a `//` inside a string literal; the prompts
//! forbid comments so any hit is logged as a warning.
//!
//! No schema checks happen here; see the `from_value` constructors in
//! `domain` for the dedicated validation step.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::warn;

use crate::util::trunc_for_log;

static TAG_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?s)<JSON>(.*?)</JSON>").expect("tag regex"));

static LINE_COMMENT_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"//[^\n]*").expect("comment regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
  #[error("no JSON data found between <JSON> tags")]
  NoTagFound,
  #[error("invalid JSON between <JSON> tags: {0}")]
  InvalidJson(String),
}

/// Locate the first `<JSON>...</JSON>` span in `raw`, normalize it, and parse
/// it as JSON. Content outside the tags is ignored.
pub fn extract_tagged_json(raw: &str) -> Result<serde_json::Value, ExtractError> {
  let captured = TAG_RE
    .captures(raw)
    .and_then(|c| c.get(1))
    .ok_or(ExtractError::NoTagFound)?;

  let span = captured.as_str().trim();
  let cleaned = strip_line_comments(span);

  serde_json::from_str(&cleaned).map_err(|e| ExtractError::InvalidJson(e.to_string()))
}

/// Remove every `//`-to-end-of-line span. Content-neutral for valid JSON that
/// contains no `//` inside string literals.
fn strip_line_comments(span: &str) -> String {
  if LINE_COMMENT_RE.is_match(span) {
    warn!(
      target: "quiz",
      span = %trunc_for_log(span, 200),
      "Model emitted // comments despite instructions; stripping them"
    );
  }
  LINE_COMMENT_RE.replace_all(span, "").into_owned()
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn well_formed_block_parses_unchanged() {
    let raw = r#"blah <JSON>{"question":"Q","answers":[{"text":"a","score":4},{"text":"b","score":3},{"text":"c","score":2},{"text":"d","score":1}]}</JSON> blah"#;
    let v = extract_tagged_json(raw).expect("parsed");
    assert_eq!(v["question"], "Q");
    assert_eq!(v["answers"][0], json!({"text": "a", "score": 4}));
    assert_eq!(v["answers"].as_array().map(|a| a.len()), Some(4));
  }

  #[test]
  fn missing_tags_report_no_tag_found() {
    assert_eq!(
      extract_tagged_json("Sorry, I cannot help."),
      Err(ExtractError::NoTagFound)
    );
    // An opening tag alone is not a block.
    assert_eq!(
      extract_tagged_json("<JSON>{\"a\":1}"),
      Err(ExtractError::NoTagFound)
    );
  }

  #[test]
  fn span_may_cross_newlines() {
    let raw = "prose\n<JSON>\n{\n  \"a\": [1, 2]\n}\n</JSON>\nmore prose";
    let v = extract_tagged_json(raw).expect("parsed");
    assert_eq!(v, json!({"a": [1, 2]}));
  }

  #[test]
  fn comment_stripping_is_content_neutral() {
    let with = "<JSON>{\n\"a\": 1, // the a field\n\"b\": 2\n}</JSON>";
    let without = "<JSON>{\n\"a\": 1, \n\"b\": 2\n}</JSON>";
    assert_eq!(
      extract_tagged_json(with).unwrap(),
      extract_tagged_json(without).unwrap()
    );
  }

  #[test]
  fn invalid_json_after_stripping_is_reported() {
    let raw = "<JSON>{not json at all}</JSON>";
    match extract_tagged_json(raw) {
      Err(ExtractError::InvalidJson(detail)) => assert!(!detail.is_empty()),
      other => panic!("expected InvalidJson, got {:?}", other),
    }
  }

  #[test]
  fn first_span_wins() {
    let raw = "<JSON>{\"first\": true}</JSON> <JSON>{\"second\": true}</JSON>";
    let v = extract_tagged_json(raw).expect("parsed");
    assert_eq!(v, json!({"first": true}));
  }
}
