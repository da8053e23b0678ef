//! Error taxonomy for the quiz pipeline.
//!
//! Pipeline components never recover on their own: they return one of these
//! variants and let the HTTP shell turn it into a user-visible message.
//! Nothing here is fatal to the process; every failure returns the operator
//! to the idle UI state with the session preserved.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use thiserror::Error;

use crate::extract::ExtractError;

#[derive(Debug, Clone, Error)]
pub enum AppError {
  /// A required dropdown was left at its placeholder value. Blocks the
  /// Generate action before any external call is made.
  #[error("Invalid selection: {0}")]
  Selection(String),

  /// Validate/render requested with no generated question or positions.
  #[error("Missing prerequisite: {0}")]
  MissingPrerequisite(String),

  /// Transport or API failure from the generation call. No retry, no backoff;
  /// the caller decides what to do.
  #[error("Generation failed: {0}")]
  Generation(String),

  /// The model response carried no usable tagged JSON payload.
  #[error("Extraction failed: {0}")]
  Extraction(#[from] ExtractError),

  /// The payload parsed as JSON but failed structural validation.
  #[error("Schema validation failed: {0}")]
  Schema(String),

  #[error("Render failed: {0}")]
  Render(String),

  /// Spreadsheet append failed. A partial failure surfaces here and is never
  /// reported as success.
  #[error("Sheet append failed: {0}")]
  Sheet(String),

  /// A required external client (OpenAI, Sheets) is not configured or
  /// unreachable.
  #[error("Connectivity: {0}")]
  Connectivity(String),
}

impl AppError {
  fn error_code(&self) -> &'static str {
    match self {
      AppError::Selection(_) => "SELECTION_ERROR",
      AppError::MissingPrerequisite(_) => "MISSING_PREREQUISITE",
      AppError::Generation(_) => "GENERATION_ERROR",
      AppError::Extraction(_) => "EXTRACTION_FAILURE",
      AppError::Schema(_) => "SCHEMA_ERROR",
      AppError::Render(_) => "RENDER_ERROR",
      AppError::Sheet(_) => "SHEET_ERROR",
      AppError::Connectivity(_) => "CONNECTIVITY_ERROR",
    }
  }

  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Selection(_) => StatusCode::UNPROCESSABLE_ENTITY,
      AppError::MissingPrerequisite(_) => StatusCode::CONFLICT,
      AppError::Generation(_) | AppError::Extraction(_) | AppError::Schema(_) => {
        StatusCode::BAD_GATEWAY
      }
      AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
      AppError::Sheet(_) => StatusCode::BAD_GATEWAY,
      AppError::Connectivity(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
  pub error: String,
  pub code: &'static str,
}

impl IntoResponse for AppError {
  fn into_response(self) -> axum::response::Response {
    let body = ErrorResponse {
      error: self.to_string(),
      code: self.error_code(),
    };
    (self.status_code(), Json(body)).into_response()
  }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn selection_errors_are_client_errors() {
    assert_eq!(
      AppError::Selection("x".into()).status_code(),
      StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
      AppError::MissingPrerequisite("x".into()).status_code(),
      StatusCode::CONFLICT
    );
  }

  #[test]
  fn upstream_failures_map_to_bad_gateway() {
    assert_eq!(
      AppError::Generation("boom".into()).status_code(),
      StatusCode::BAD_GATEWAY
    );
    assert_eq!(
      AppError::Extraction(ExtractError::NoTagFound).status_code(),
      StatusCode::BAD_GATEWAY
    );
  }

  #[test]
  fn messages_carry_detail() {
    let e = AppError::Sheet("HTTP 500".into());
    assert_eq!(e.to_string(), "Sheet append failed: HTTP 500");
    assert_eq!(e.error_code(), "SHEET_ERROR");
  }
}
