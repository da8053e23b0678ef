//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented; failures bubble up as `AppError` and render
//! through its `IntoResponse` impl.

use std::sync::Arc;

use axum::{
  extract::State,
  http::header,
  response::IntoResponse,
  Json,
};
use tracing::{info, instrument};

use crate::catalog;
use crate::domain::{Difficulty, Selection};
use crate::errors::AppResult;
use crate::logic::{generate_quiz, reject_quiz, render_current, validate_quiz};
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { ok: true })
}

/// Dropdown catalog: situations with their scenarios and axes, plus the
/// difficulty ladder.
#[instrument(level = "info")]
pub async fn http_get_options() -> impl IntoResponse {
  let situations = catalog::situations()
    .into_iter()
    .map(|situation| SituationOptionsOut {
      situation,
      scenarios: catalog::scenarios_for(situation),
      axes: catalog::axes_for(situation),
    })
    .collect();
  Json(OptionsOut {
    situations,
    difficulties: Difficulty::ALL.iter().map(|d| d.label()).collect(),
  })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(SessionOut::from(state.session_snapshot().await))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_pitch(
  State(state): State<Arc<AppState>>,
) -> AppResult<impl IntoResponse> {
  let png = render_current(&state).await?;
  Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

#[instrument(level = "info", skip(state, body), fields(situation = %body.situation, scenario = %body.scenario, ai_positions = body.use_ai_positions))]
pub async fn http_post_generate(
  State(state): State<Arc<AppState>>,
  Json(body): Json<GenerateIn>,
) -> AppResult<impl IntoResponse> {
  let generated = generate_quiz(&state, Selection::from(body)).await?;
  info!(target: "quiz", quiz_id = %generated.quiz_id, "HTTP generate served");
  Ok(Json(GenerateOut::from(generated)))
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_validate(
  State(state): State<Arc<AppState>>,
) -> AppResult<impl IntoResponse> {
  validate_quiz(&state).await?;
  Ok(Json(ValidateOut { shared: true }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_reject(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  reject_quiz(&state).await;
  Json(RejectOut { cleared: true })
}
