//! Core action flows shared by the HTTP handlers: Generate, Validate, Reject,
//! and rendering of the current scene.
//!
//! Each flow is one pass through the pipeline — prompt, model call, tagged
//! extraction, schema validation, then renderer or sink. Failures propagate to
//! the shell as `AppError`; nothing here retries and nothing mutates the
//! session unless the whole flow succeeded.

use tracing::{info, instrument, warn};

use crate::catalog;
use crate::domain::{is_placeholder, QuizQuestion, QuizRecord, SceneState, Selection};
use crate::errors::{AppError, AppResult};
use crate::extract::extract_tagged_json;
use crate::openai::OpenAI;
use crate::prompt::{build_position_prompt, build_question_prompt};
use crate::render::render_scene;
use crate::sheets::flatten_record;
use crate::state::AppState;

/// Result of a successful Generate action.
#[derive(Debug, Clone)]
pub struct GeneratedQuiz {
  pub quiz_id: String,
  pub question: QuizQuestion,
  pub scene: SceneState,
  pub style_instruction: String,
}

/// Generate a question (and positions) for the given selections, then store
/// the result as the current session.
#[instrument(level = "info", skip(state, selection), fields(situation = %selection.situation, scenario = %selection.scenario))]
pub async fn generate_quiz(state: &AppState, selection: Selection) -> AppResult<GeneratedQuiz> {
  gate_selection(&selection)?;

  let openai = state
    .openai
    .as_ref()
    .ok_or_else(|| AppError::Connectivity("OpenAI is not configured (OPENAI_API_KEY)".into()))?;

  let style_instruction = state.pick_style_instruction();
  let question = generate_question(openai, state, &selection, &style_instruction).await?;

  let scene = if selection.use_ai_positions {
    generate_positions(openai, state, &question.question).await?
  } else {
    catalog::layout_for(selection.situation, &selection.scenario).unwrap_or_else(|| {
      info!(target: "quiz", scenario = %selection.scenario, "No catalog layout; using the generic default");
      catalog::default_layout()
    })
  };

  let quiz_id = state
    .store_generated(
      selection,
      question.clone(),
      scene.clone(),
      style_instruction.clone(),
    )
    .await;
  info!(target: "quiz", %quiz_id, "Quiz generated");

  Ok(GeneratedQuiz { quiz_id, question, scene, style_instruction })
}

async fn generate_question(
  openai: &OpenAI,
  state: &AppState,
  selection: &Selection,
  style_instruction: &str,
) -> AppResult<QuizQuestion> {
  let prompt = build_question_prompt(&state.prompts, selection, style_instruction);
  let raw = openai.generate(&state.prompts.system, &prompt).await?;
  let value = extract_tagged_json(&raw)?;
  QuizQuestion::from_value(value)
}

async fn generate_positions(
  openai: &OpenAI,
  state: &AppState,
  question_text: &str,
) -> AppResult<SceneState> {
  let prompt = build_position_prompt(&state.prompts, question_text);
  let raw = openai.generate(&state.prompts.system, &prompt).await?;
  let value = extract_tagged_json(&raw)?;
  SceneState::from_value(value)
}

fn gate_selection(selection: &Selection) -> AppResult<()> {
  if is_placeholder(&selection.scenario) {
    return Err(AppError::Selection("please select a valid Scenario".into()));
  }
  if is_placeholder(&selection.axis) {
    return Err(AppError::Selection("please select a valid Axe".into()));
  }
  Ok(())
}

/// Validate the current quiz: flatten it and append it to the question bank,
/// then clear the session. The session is only cleared after a confirmed
/// append.
#[instrument(level = "info", skip(state))]
pub async fn validate_quiz(state: &AppState) -> AppResult<()> {
  let session = state.session_snapshot().await;
  let (Some(selection), Some(question), Some(scene)) =
    (session.selection, session.question, session.scene)
  else {
    return Err(AppError::MissingPrerequisite(
      "no generated question/positions; generate first".into(),
    ));
  };

  let sheets = state.sheets.as_ref().ok_or_else(|| {
    AppError::Connectivity("Sheets sink is not configured (SHEETS_SPREADSHEET_ID / SHEETS_ACCESS_TOKEN)".into())
  })?;

  let record = QuizRecord { selection, question, scene };
  let row = flatten_record(&record);
  sheets.append_row(&row).await?;

  state.clear_session().await;
  info!(target: "quiz", "Question validated and shared");
  Ok(())
}

/// Reject the current quiz: discard it without persisting anything.
#[instrument(level = "info", skip(state))]
pub async fn reject_quiz(state: &AppState) {
  warn!(target: "quiz", "Question rejected");
  state.clear_session().await;
}

/// Render the current session's scene as PNG bytes.
#[instrument(level = "info", skip(state))]
pub async fn render_current(state: &AppState) -> AppResult<Vec<u8>> {
  let session = state.session_snapshot().await;
  let scene = session.scene.ok_or_else(|| {
    AppError::MissingPrerequisite("no generated positions to render; generate first".into())
  })?;
  render_scene(&scene)
}
