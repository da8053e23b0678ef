//! Application state: the operator's single session, prompts, and the
//! optional external clients.
//!
//! The session is the only mutable state in the process and only the shell
//! mutates it, behind one RwLock. Pipeline components receive and return by
//! value. Transitions:
//!
//!   empty -> generated            (Generate succeeds)
//!   generated -> empty            (Validate appends successfully, or Reject)
//!
//! A failed action leaves the session untouched.

use rand::seq::SliceRandom;
use tokio::sync::RwLock;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::{load_quiz_config_from_env, Prompts};
use crate::domain::{QuizQuestion, SceneState, Selection};
use crate::openai::OpenAI;
use crate::sheets::SheetsClient;

/// Everything held between Generate and Validate/Reject.
#[derive(Clone, Debug, Default)]
pub struct Session {
  pub quiz_id: Option<String>,
  pub selection: Option<Selection>,
  pub question: Option<QuizQuestion>,
  pub scene: Option<SceneState>,
  pub style_instruction: Option<String>,
  /// Question texts generated this process, for the operator's reference.
  /// Survives resets.
  pub history: Vec<String>,
}

impl Session {
  pub fn is_generated(&self) -> bool {
    self.question.is_some() && self.scene.is_some() && self.selection.is_some()
  }
}

pub struct AppState {
  pub session: RwLock<Session>,
  pub openai: Option<OpenAI>,
  pub sheets: Option<SheetsClient>,
  pub prompts: Prompts,
}

impl AppState {
  /// Build state from env: load config, init optional OpenAI/Sheets clients.
  #[instrument(level = "info", skip_all)]
  pub fn new() -> Self {
    let prompts = load_quiz_config_from_env()
      .map(|c| c.prompts)
      .unwrap_or_default();

    let openai = OpenAI::from_env();
    if let Some(oa) = &openai {
      info!(target: "matchango_backend", base_url = %oa.base_url, model = %oa.model, "OpenAI enabled.");
    } else {
      info!(target: "matchango_backend", "OpenAI disabled (no OPENAI_API_KEY). Generation unavailable.");
    }

    let sheets = SheetsClient::from_env();
    if sheets.is_some() {
      info!(target: "matchango_backend", "Sheets sink enabled.");
    } else {
      info!(target: "matchango_backend", "Sheets sink disabled (missing SHEETS_SPREADSHEET_ID / SHEETS_ACCESS_TOKEN).");
    }

    Self {
      session: RwLock::new(Session::default()),
      openai,
      sheets,
      prompts,
    }
  }

  /// Fixture-friendly constructor used by tests and local tooling.
  pub fn with_parts(prompts: Prompts, openai: Option<OpenAI>, sheets: Option<SheetsClient>) -> Self {
    Self {
      session: RwLock::new(Session::default()),
      openai,
      sheets,
      prompts,
    }
  }

  /// Pick a style instruction for one Generate call. Re-randomized on every
  /// call rather than fixed per process; the chosen text is stored in the
  /// session so the operator can see what shaped the question.
  pub fn pick_style_instruction(&self) -> String {
    self
      .prompts
      .style_instructions
      .choose(&mut rand::thread_rng())
      .cloned()
      .unwrap_or_default()
  }

  /// Transition: empty/generated -> generated. Returns the new quiz id.
  #[instrument(level = "debug", skip_all)]
  pub async fn store_generated(
    &self,
    selection: Selection,
    question: QuizQuestion,
    scene: SceneState,
    style_instruction: String,
  ) -> String {
    let quiz_id = Uuid::new_v4().to_string();
    let mut session = self.session.write().await;
    session.history.push(question.question.clone());
    session.quiz_id = Some(quiz_id.clone());
    session.selection = Some(selection);
    session.question = Some(question);
    session.scene = Some(scene);
    session.style_instruction = Some(style_instruction);
    quiz_id
  }

  /// Transition: generated -> empty. History is kept.
  #[instrument(level = "debug", skip_all)]
  pub async fn clear_session(&self) {
    let mut session = self.session.write().await;
    session.quiz_id = None;
    session.selection = None;
    session.question = None;
    session.scene = None;
    session.style_instruction = None;
  }

  pub async fn session_snapshot(&self) -> Session {
    self.session.read().await.clone()
  }
}
