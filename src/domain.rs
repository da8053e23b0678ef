//! Domain models: pitch positions, scenes, quiz questions, and the operator's
//! selections. The `from_value` constructors are the dedicated schema
//! validation step between tag extraction and any consumer (renderer, sink):
//! field presence and shape fail hard here, while soft contract drift
//! (out-of-bounds coordinates, a main player that matches no team position)
//! only logs a warning.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{AppError, AppResult};

/// Pitch length in model units (x axis, 0 = left).
pub const PITCH_LENGTH: f64 = 120.0;
/// Pitch width in model units (y axis, 0 = top).
pub const PITCH_WIDTH: f64 = 80.0;
/// Players per side, goalkeeper included. Goalkeeper is conventionally first.
pub const TEAM_SIZE: usize = 5;

/// A point on the pitch. Wire form is a bare `[x, y]` pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Position {
  pub x: f64,
  pub y: f64,
}

impl From<(f64, f64)> for Position {
  fn from((x, y): (f64, f64)) -> Self {
    Self { x, y }
  }
}

impl From<Position> for (f64, f64) {
  fn from(p: Position) -> Self {
    (p.x, p.y)
  }
}

impl Position {
  pub fn new(x: f64, y: f64) -> Self {
    Self { x, y }
  }

  pub fn in_bounds(&self) -> bool {
    (0.0..=PITCH_LENGTH).contains(&self.x) && (0.0..=PITCH_WIDTH).contains(&self.y)
  }
}

/// One player entry. Wire form is `{"position": [x, y]}`, matching both the
/// position-generation prompt and the catalog layouts.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerSpot {
  pub position: Position,
}

impl PlayerSpot {
  pub fn at(x: f64, y: f64) -> Self {
    Self { position: Position::new(x, y) }
  }
}

/// A full scene: both sides, the highlighted main player, and the ball.
/// The main player is matched against team positions by value equality only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneState {
  pub team_players: Vec<PlayerSpot>,
  pub opponent_players: Vec<PlayerSpot>,
  pub main_player: Position,
  pub ball: Position,
}

/// Wire wrapper produced by the position-generation prompt.
#[derive(Debug, Deserialize)]
struct PositionsPayload {
  coordinates: SceneState,
}

impl SceneState {
  /// Parse and validate an extracted positions payload
  /// (`{"coordinates": {...}}`). A missing ball or main player is a schema
  /// error, not a silent default.
  pub fn from_value(value: serde_json::Value) -> AppResult<Self> {
    let payload: PositionsPayload = serde_json::from_value(value)
      .map_err(|e| AppError::Schema(format!("positions payload: {}", e)))?;
    let scene = payload.coordinates;
    scene.validate()?;
    Ok(scene)
  }

  pub fn validate(&self) -> AppResult<()> {
    if self.team_players.len() != TEAM_SIZE {
      return Err(AppError::Schema(format!(
        "expected {} team players, got {}",
        TEAM_SIZE,
        self.team_players.len()
      )));
    }
    if self.opponent_players.len() != TEAM_SIZE {
      return Err(AppError::Schema(format!(
        "expected {} opponent players, got {}",
        TEAM_SIZE,
        self.opponent_players.len()
      )));
    }

    // Soft contract: the prompt states the bounds but nothing downstream
    // depends on them, so drift is only worth a warning.
    for p in self.all_positions() {
      if !p.in_bounds() {
        warn!(target: "quiz", x = p.x, y = p.y, "Position outside the 120x80 pitch");
      }
    }
    if !self.main_player_is_on_team() {
      warn!(
        target: "quiz",
        x = self.main_player.x,
        y = self.main_player.y,
        "Main player matches no team position; highlight will not attach to a marker"
      );
    }
    Ok(())
  }

  pub fn main_player_is_on_team(&self) -> bool {
    self
      .team_players
      .iter()
      .any(|p| p.position == self.main_player)
  }

  fn all_positions(&self) -> impl Iterator<Item = Position> + '_ {
    self
      .team_players
      .iter()
      .chain(self.opponent_players.iter())
      .map(|p| p.position)
      .chain([self.main_player, self.ball])
  }
}

/// One candidate answer with its 1-4 relevance score.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
  pub text: String,
  pub score: u8,
}

/// A generated quiz question (French) with exactly four scored answers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
  pub question: String,
  pub answers: Vec<Answer>,
}

impl QuizQuestion {
  /// Parse and validate an extracted question payload. The generation contract
  /// demands four answers scored with each of 1..=4 exactly once; enforce that
  /// here rather than letting an absent field fail at render/persist time.
  pub fn from_value(value: serde_json::Value) -> AppResult<Self> {
    let q: QuizQuestion = serde_json::from_value(value)
      .map_err(|e| AppError::Schema(format!("question payload: {}", e)))?;
    q.validate()?;
    Ok(q)
  }

  pub fn validate(&self) -> AppResult<()> {
    if self.question.trim().is_empty() {
      return Err(AppError::Schema("empty question text".into()));
    }
    if self.answers.len() != 4 {
      return Err(AppError::Schema(format!(
        "expected 4 answers, got {}",
        self.answers.len()
      )));
    }
    let mut scores: Vec<u8> = self.answers.iter().map(|a| a.score).collect();
    scores.sort_unstable();
    if scores != [1, 2, 3, 4] {
      return Err(AppError::Schema(format!(
        "answer scores must be a permutation of 1-4, got {:?}",
        self.answers.iter().map(|a| a.score).collect::<Vec<_>>()
      )));
    }
    if self.answers.iter().any(|a| a.text.trim().is_empty()) {
      return Err(AppError::Schema("empty answer text".into()));
    }
    Ok(())
  }
}

/// Top-level category of tactical scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Situation {
  Offense,
  Defense,
  Other,
}

impl std::fmt::Display for Situation {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Situation::Offense => write!(f, "Offense"),
      Situation::Defense => write!(f, "Defense"),
      Situation::Other => write!(f, "Other"),
    }
  }
}

impl std::str::FromStr for Situation {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "Offense" => Ok(Situation::Offense),
      "Defense" => Ok(Situation::Defense),
      "Other" => Ok(Situation::Other),
      other => Err(format!("unknown situation: {other}")),
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
  Easy,
  Medium,
  Complex,
  #[serde(rename = "Unusual situations")]
  UnusualSituations,
}

impl Difficulty {
  pub fn label(&self) -> &'static str {
    match self {
      Difficulty::Easy => "Easy",
      Difficulty::Medium => "Medium",
      Difficulty::Complex => "Complex",
      Difficulty::UnusualSituations => "Unusual situations",
    }
  }

  pub const ALL: [Difficulty; 4] = [
    Difficulty::Easy,
    Difficulty::Medium,
    Difficulty::Complex,
    Difficulty::UnusualSituations,
  ];
}

impl std::fmt::Display for Difficulty {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.label())
  }
}

/// The operator's dropdown selections at Generate time. Any string is accepted
/// for scenario/axis at this level; placeholder gating happens in the shell
/// before the pipeline runs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Selection {
  pub situation: Situation,
  pub scenario: String,
  pub axis: String,
  pub use_ai_positions: bool,
  pub difficulty: Difficulty,
}

impl Selection {
  /// Flag column value, kept as Yes/No for sheet compatibility.
  pub fn ai_flag(&self) -> &'static str {
    if self.use_ai_positions {
      "Yes"
    } else {
      "No"
    }
  }
}

/// "Select Scenario" / "Select Axe" style values the UI ships as defaults.
pub fn is_placeholder(value: &str) -> bool {
  let v = value.trim();
  v.is_empty() || v.starts_with("Select")
}

/// Everything persisted for one accepted question.
#[derive(Clone, Debug, Serialize)]
pub struct QuizRecord {
  pub selection: Selection,
  pub question: QuizQuestion,
  pub scene: SceneState,
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn valid_question_value() -> serde_json::Value {
    json!({
      "question": "Que faire ?",
      "answers": [
        {"text": "a", "score": 4},
        {"text": "b", "score": 3},
        {"text": "c", "score": 2},
        {"text": "d", "score": 1}
      ]
    })
  }

  fn valid_scene_value() -> serde_json::Value {
    json!({
      "coordinates": {
        "team_players": [
          {"position": [5.0, 40.0]},
          {"position": [40.0, 30.0]},
          {"position": [60.0, 50.0]},
          {"position": [80.0, 60.0]},
          {"position": [100.0, 40.0]}
        ],
        "opponent_players": [
          {"position": [115.0, 40.0]},
          {"position": [90.0, 20.0]},
          {"position": [85.0, 50.0]},
          {"position": [80.0, 35.0]},
          {"position": [75.0, 45.0]}
        ],
        "main_player": [60.0, 50.0],
        "ball": [58.0, 48.0]
      }
    })
  }

  #[test]
  fn position_wire_form_is_a_pair() {
    let p = Position::new(60.0, 50.0);
    assert_eq!(serde_json::to_value(p).unwrap(), json!([60.0, 50.0]));
    let back: Position = serde_json::from_value(json!([60.0, 50.0])).unwrap();
    assert_eq!(back, p);
  }

  #[test]
  fn valid_question_passes() {
    let q = QuizQuestion::from_value(valid_question_value()).unwrap();
    assert_eq!(q.question, "Que faire ?");
    assert_eq!(q.answers.len(), 4);
  }

  #[test]
  fn wrong_answer_count_is_rejected() {
    let mut v = valid_question_value();
    v["answers"].as_array_mut().unwrap().pop();
    assert!(matches!(
      QuizQuestion::from_value(v),
      Err(AppError::Schema(_))
    ));
  }

  #[test]
  fn duplicate_scores_are_rejected() {
    let mut v = valid_question_value();
    v["answers"][3]["score"] = json!(4);
    assert!(matches!(
      QuizQuestion::from_value(v),
      Err(AppError::Schema(_))
    ));
  }

  #[test]
  fn empty_question_text_is_rejected() {
    let mut v = valid_question_value();
    v["question"] = json!("  ");
    assert!(matches!(
      QuizQuestion::from_value(v),
      Err(AppError::Schema(_))
    ));
  }

  #[test]
  fn valid_scene_passes_and_main_is_on_team() {
    let s = SceneState::from_value(valid_scene_value()).unwrap();
    assert_eq!(s.team_players.len(), TEAM_SIZE);
    assert!(s.main_player_is_on_team());
  }

  #[test]
  fn wrong_team_size_is_rejected() {
    let mut v = valid_scene_value();
    v["coordinates"]["team_players"]
      .as_array_mut()
      .unwrap()
      .pop();
    assert!(matches!(
      SceneState::from_value(v),
      Err(AppError::Schema(_))
    ));
  }

  #[test]
  fn missing_ball_is_an_error_not_a_default() {
    let mut v = valid_scene_value();
    v["coordinates"].as_object_mut().unwrap().remove("ball");
    assert!(matches!(
      SceneState::from_value(v),
      Err(AppError::Schema(_))
    ));
  }

  #[test]
  fn out_of_bounds_positions_only_warn() {
    let mut v = valid_scene_value();
    v["coordinates"]["ball"] = json!([130.0, 90.0]);
    assert!(SceneState::from_value(v).is_ok());
  }

  #[test]
  fn placeholder_detection() {
    assert!(is_placeholder("Select Scenario"));
    assert!(is_placeholder("Select Axe"));
    assert!(is_placeholder("  "));
    assert!(!is_placeholder("Attaque Positionnelle"));
  }

  #[test]
  fn difficulty_labels_round_trip_through_serde() {
    let d: Difficulty = serde_json::from_value(json!("Unusual situations")).unwrap();
    assert_eq!(d, Difficulty::UnusualSituations);
    assert_eq!(serde_json::to_value(d).unwrap(), json!("Unusual situations"));
  }
}
