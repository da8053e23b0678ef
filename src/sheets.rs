//! Spreadsheet persistence: record flattening and the append-only sink.
//!
//! One accepted question becomes one row with a fixed column order:
//!   situation, scenario, axis, AI-positions flag, question, 4 answer texts,
//!   semicolon-joined team position pairs, semicolon-joined opponent pairs,
//!   ball pair, main-player pair (each pair serialized as its own JSON array).
//!
//! Appending goes through the Google Sheets values-append endpoint. There is
//! no dedup and no transaction beyond the sink's native append; any HTTP or
//! transport failure surfaces as `AppError::Sheet` and is never reported as
//! success.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, instrument};

use crate::domain::{Position, QuizRecord, Situation};
use crate::errors::{AppError, AppResult};

const POSITION_SEPARATOR: &str = "; ";

/// Number of columns in a flattened row.
pub const ROW_WIDTH: usize = 13;

/// Flatten a record into the fixed column order.
pub fn flatten_record(record: &QuizRecord) -> Vec<String> {
  let sel = &record.selection;
  let mut row = vec![
    sel.situation.to_string(),
    sel.scenario.clone(),
    sel.axis.clone(),
    sel.ai_flag().to_string(),
    record.question.question.clone(),
  ];
  for answer in &record.question.answers {
    row.push(answer.text.clone());
  }
  row.push(join_positions(
    record.scene.team_players.iter().map(|p| p.position),
  ));
  row.push(join_positions(
    record.scene.opponent_players.iter().map(|p| p.position),
  ));
  row.push(position_json(record.scene.ball));
  row.push(position_json(record.scene.main_player));
  row
}

/// The field-by-field view of a persisted row. Difficulty and answer scores
/// are not part of the sheet schema, so a parsed row is narrower than a
/// `QuizRecord`.
#[derive(Debug, PartialEq)]
pub struct SheetRow {
  pub situation: Situation,
  pub scenario: String,
  pub axis: String,
  pub use_ai_positions: bool,
  pub question: String,
  pub answer_texts: [String; 4],
  pub team_positions: Vec<Position>,
  pub opponent_positions: Vec<Position>,
  pub ball: Position,
  pub main_player: Position,
}

/// Re-parse a flattened row. Inverse of `flatten_record` over the persisted
/// fields; used for bank tooling and to pin the round-trip contract.
pub fn parse_row(row: &[String]) -> AppResult<SheetRow> {
  if row.len() != ROW_WIDTH {
    return Err(AppError::Sheet(format!(
      "expected {} columns, got {}",
      ROW_WIDTH,
      row.len()
    )));
  }

  let situation: Situation = row[0].parse().map_err(AppError::Sheet)?;
  let use_ai_positions = match row[3].as_str() {
    "Yes" => true,
    "No" => false,
    other => return Err(AppError::Sheet(format!("bad AI-positions flag: {other}"))),
  };

  Ok(SheetRow {
    situation,
    scenario: row[1].clone(),
    axis: row[2].clone(),
    use_ai_positions,
    question: row[4].clone(),
    answer_texts: [
      row[5].clone(),
      row[6].clone(),
      row[7].clone(),
      row[8].clone(),
    ],
    team_positions: split_positions(&row[9])?,
    opponent_positions: split_positions(&row[10])?,
    ball: parse_position(&row[11])?,
    main_player: parse_position(&row[12])?,
  })
}

fn position_json(p: Position) -> String {
  // Position serialization is infallible (two floats).
  serde_json::to_string(&p).unwrap_or_default()
}

fn join_positions(positions: impl Iterator<Item = Position>) -> String {
  positions
    .map(position_json)
    .collect::<Vec<_>>()
    .join(POSITION_SEPARATOR)
}

fn split_positions(cell: &str) -> AppResult<Vec<Position>> {
  cell
    .split(POSITION_SEPARATOR)
    .map(parse_position)
    .collect()
}

fn parse_position(s: &str) -> AppResult<Position> {
  serde_json::from_str(s.trim())
    .map_err(|e| AppError::Sheet(format!("bad position cell {:?}: {}", s, e)))
}

/// Append-only Google Sheets client. One call = one row, targeting the first
/// sheet of a fixed spreadsheet.
#[derive(Clone)]
pub struct SheetsClient {
  client: reqwest::Client,
  base_url: String,
  spreadsheet_id: String,
  token: String,
}

impl SheetsClient {
  /// Construct the client if SHEETS_SPREADSHEET_ID and SHEETS_ACCESS_TOKEN are
  /// present; otherwise return None and validation is disabled at runtime.
  pub fn from_env() -> Option<Self> {
    let spreadsheet_id = std::env::var("SHEETS_SPREADSHEET_ID").ok()?;
    let token = std::env::var("SHEETS_ACCESS_TOKEN").ok()?;
    let base_url = std::env::var("SHEETS_BASE_URL")
      .unwrap_or_else(|_| "https://sheets.googleapis.com".into());

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(20))
      .build()
      .ok()?;

    Some(Self { client, base_url, spreadsheet_id, token })
  }

  /// Append one row after the existing data on the first sheet.
  #[instrument(level = "info", skip(self, row), fields(columns = row.len()))]
  pub async fn append_row(&self, row: &[String]) -> AppResult<()> {
    let url = format!(
      "{}/v4/spreadsheets/{}/values/A1:append?valueInputOption=RAW&insertDataOption=INSERT_ROWS",
      self.base_url, self.spreadsheet_id
    );
    let body = json!({ "values": [row] });

    let res = self
      .client
      .post(&url)
      .header(USER_AGENT, "matchango-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.token))
      .json(&body)
      .send()
      .await
      .map_err(|e| AppError::Sheet(e.to_string()))?;

    if !res.status().is_success() {
      let status = res.status();
      let text = res.text().await.unwrap_or_default();
      let msg = extract_sheets_error(&text).unwrap_or(text);
      error!(target: "matchango_backend", %status, error = %msg, "Sheets append failed");
      return Err(AppError::Sheet(format!("Sheets HTTP {}: {}", status, msg)));
    }

    info!(target: "quiz", spreadsheet = %self.spreadsheet_id, "Row appended to question bank");
    Ok(())
  }
}

/// Try to extract a clean error message from a Sheets API error body.
fn extract_sheets_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap {
    error: EObj,
  }
  #[derive(Deserialize)]
  struct EObj {
    message: String,
  }
  serde_json::from_str::<EWrap>(body)
    .ok()
    .map(|w| w.error.message)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::default_layout;
  use crate::domain::{Answer, Difficulty, QuizQuestion, Selection};

  fn record() -> QuizRecord {
    QuizRecord {
      selection: Selection {
        situation: Situation::Offense,
        scenario: "Attaque Positionnelle".into(),
        axis: "Créativité".into(),
        use_ai_positions: true,
        difficulty: Difficulty::Complex,
      },
      question: QuizQuestion {
        question: "Que doit faire le joueur ?".into(),
        answers: vec![
          Answer { text: "Passe en profondeur".into(), score: 4 },
          Answer { text: "Tir immédiat".into(), score: 3 },
          Answer { text: "Passe en retrait".into(), score: 2 },
          Answer { text: "Conserver le ballon".into(), score: 1 },
        ],
      },
      scene: default_layout(),
    }
  }

  #[test]
  fn flattened_row_has_fixed_width_and_order() {
    let row = flatten_record(&record());
    assert_eq!(row.len(), ROW_WIDTH);
    assert_eq!(row[0], "Offense");
    assert_eq!(row[3], "Yes");
    assert_eq!(row[4], "Que doit faire le joueur ?");
    assert!(row[9].contains(POSITION_SEPARATOR));
    assert!(row[12].starts_with('['));
  }

  #[test]
  fn row_round_trips_field_by_field() {
    let rec = record();
    let row = flatten_record(&rec);
    let parsed = parse_row(&row).unwrap();

    assert_eq!(parsed.situation, rec.selection.situation);
    assert_eq!(parsed.scenario, rec.selection.scenario);
    assert_eq!(parsed.axis, rec.selection.axis);
    assert_eq!(parsed.use_ai_positions, rec.selection.use_ai_positions);
    assert_eq!(parsed.question, rec.question.question);
    for (got, want) in parsed.answer_texts.iter().zip(&rec.question.answers) {
      assert_eq!(got, &want.text);
    }
    let team: Vec<Position> = rec.scene.team_players.iter().map(|p| p.position).collect();
    assert_eq!(parsed.team_positions, team);
    assert_eq!(parsed.ball, rec.scene.ball);
    assert_eq!(parsed.main_player, rec.scene.main_player);
  }

  #[test]
  fn truncated_rows_are_rejected() {
    let mut row = flatten_record(&record());
    row.pop();
    assert!(matches!(parse_row(&row), Err(AppError::Sheet(_))));
  }

  #[test]
  fn corrupt_position_cells_are_rejected() {
    let mut row = flatten_record(&record());
    row[11] = "oops".into();
    assert!(matches!(parse_row(&row), Err(AppError::Sheet(_))));
  }

  #[test]
  fn sheets_error_body_extraction() {
    let body = r#"{"error": {"code": 403, "message": "The caller does not have permission"}}"#;
    assert_eq!(
      extract_sheets_error(body).as_deref(),
      Some("The caller does not have permission")
    );
  }
}
