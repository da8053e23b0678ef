//! Prompt builders: pure string construction from the configured templates.
//!
//! No validation happens here — any string goes into the template verbatim,
//! including placeholder dropdown values. The shell gates Generate on valid
//! selections before these run.

use crate::config::Prompts;
use crate::domain::Selection;
use crate::util::fill_template;

/// Build the question-generation prompt from the operator's selections plus
/// the per-call style instruction.
pub fn build_question_prompt(prompts: &Prompts, sel: &Selection, style_instruction: &str) -> String {
  fill_template(
    &prompts.question_template,
    &[
      ("situation", &sel.situation.to_string()),
      ("scenario", &sel.scenario),
      ("axis", &sel.axis),
      ("style_instruction", style_instruction),
      ("difficulty", sel.difficulty.label()),
    ],
  )
}

/// Build the position-generation prompt around an already-generated question.
pub fn build_position_prompt(prompts: &Prompts, question_text: &str) -> String {
  fill_template(&prompts.positions_template, &[("question", question_text)])
}
