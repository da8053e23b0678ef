//! Public request/response structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{Difficulty, QuizQuestion, SceneState, Selection, Situation};
use crate::logic::GeneratedQuiz;
use crate::state::Session;

#[derive(Serialize)]
pub struct HealthOut {
  pub ok: bool,
}

/// Dropdown content for one situation.
#[derive(Serialize)]
pub struct SituationOptionsOut {
  pub situation: Situation,
  pub scenarios: Vec<&'static str>,
  pub axes: Vec<&'static str>,
}

#[derive(Serialize)]
pub struct OptionsOut {
  pub situations: Vec<SituationOptionsOut>,
  pub difficulties: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateIn {
  pub situation: Situation,
  pub scenario: String,
  pub axis: String,
  #[serde(rename = "useAiPositions", default)]
  pub use_ai_positions: bool,
  pub difficulty: Difficulty,
}

impl From<GenerateIn> for Selection {
  fn from(body: GenerateIn) -> Self {
    Selection {
      situation: body.situation,
      scenario: body.scenario,
      axis: body.axis,
      use_ai_positions: body.use_ai_positions,
      difficulty: body.difficulty,
    }
  }
}

#[derive(Serialize)]
pub struct GenerateOut {
  #[serde(rename = "quizId")]
  pub quiz_id: String,
  pub question: QuizQuestion,
  pub scene: SceneState,
  #[serde(rename = "styleInstruction")]
  pub style_instruction: String,
}

impl From<GeneratedQuiz> for GenerateOut {
  fn from(g: GeneratedQuiz) -> Self {
    GenerateOut {
      quiz_id: g.quiz_id,
      question: g.question,
      scene: g.scene,
      style_instruction: g.style_instruction,
    }
  }
}

/// Snapshot of the operator's session for the UI.
#[derive(Serialize)]
pub struct SessionOut {
  #[serde(rename = "quizId")]
  pub quiz_id: Option<String>,
  pub selection: Option<Selection>,
  pub question: Option<QuizQuestion>,
  pub scene: Option<SceneState>,
  #[serde(rename = "styleInstruction")]
  pub style_instruction: Option<String>,
  pub history: Vec<String>,
}

impl From<Session> for SessionOut {
  fn from(s: Session) -> Self {
    SessionOut {
      quiz_id: s.quiz_id,
      selection: s.selection,
      question: s.question,
      scene: s.scene,
      style_instruction: s.style_instruction,
      history: s.history,
    }
  }
}

#[derive(Serialize)]
pub struct ValidateOut {
  pub shared: bool,
}

#[derive(Serialize)]
pub struct RejectOut {
  pub cleared: bool,
}
