//! Loading generation configuration (prompt templates + style instructions)
//! from TOML.
//!
//! Defaults reproduce the production prompts; override them in TOML (pointed
//! to by QUIZ_CONFIG_PATH) to tune tone/structure without a rebuild.

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct QuizConfig {
  #[serde(default)]
  pub prompts: Prompts,
}

/// Prompt templates used by the generation pipeline. Placeholders use the
/// `{key}` form consumed by `util::fill_template`; the literal JSON braces in
/// the templates are left untouched by it.
#[derive(Clone, Debug, Deserialize)]
pub struct Prompts {
  /// Generic assistant framing sent as the system message on every call.
  pub system: String,
  /// Question generation. Keys: situation, scenario, axis, style_instruction,
  /// difficulty.
  pub question_template: String,
  /// Position generation. Keys: question.
  pub positions_template: String,
  /// One of these is picked at random for each Generate action and embedded
  /// into the question prompt.
  pub style_instructions: Vec<String>,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      system: "You are a helpful assistant.".into(),

      question_template: r#"You are a highly skilled soccer tactician and quiz author. Your task is to create a high quality
question aimed at assessing a soccer player's skills. The question should cover soccer tactics, rules,
or specific game scenarios. Your question must be followed by four possible answers. Each answer should be
evaluated on a scale from 1 to 4 based on its relevance to the situation, with 1 being the least optimal and 4
being the most optimal.
The question has to assess the player based on the axis of evaluation.
The question doesn't have to explicitely announce the scenario, situation and axis.

Follow these guidelines:

The question and answers must be written in French.
Each answer should be clearly associated with an evaluation score.
Format the final output in a JSON-like structure.
IMPERATIVE: JSON format must be wrapped with <JSON></JSON> tags, contain no extraneous
characters, and be valid JSON.
IMPERATIVE: Never use `//` comments.

Inputs:
- Situation: {situation}.
- Scenario: {scenario}.
- Axis of evaluation: {axis}.
- Question specific instruction: {style_instruction}
- Difficulty of the question: {difficulty}

JSON format:
<JSON>
{
  "question": "",
  "answers": [
    {
      "text": "",
      "score": 4
    },
    {
      "text": "",
      "score": 3
    },
    {
      "text": "",
      "score": 2
    },
    {
      "text": "",
      "score": 1
    }
  ]
}
</JSON>
"#
      .into(),

      positions_template: r#"You are an AI model tasked with generating player positions and coordinates for a
soccer scenario based on a quiz generated by another agent.

Question: {question}

Follow these steps carefully to ensure precision:

Step 1: Understand the context. The quiz question is related to soccer tactics, rules, or scenarios. The aim is to
illustrate the scenario clearly on a soccer pitch using player positions. Consider the information provided in the
question and options and align the positions with the given scenario.

Step 2: Define the pitch dimensions. The soccer pitch dimensions are 120 (coordinates from 0 (left) to 120 (right))
for the x-axis and 80 (from 0 (top) to 80 (bottom)) for the y-axis. This will help in placing the players
appropriately on the field. Make sure the coordinates respect these boundaries and align logically with the scenario.
Calculate the key stadium areas, like the penalty area, corners, attacking and defending positions, half spaces,
goalkeeper position... these will help you be more conscious about the stadium dimensions.

Step 3: Position the main player. Place the main player at a position that reflects their key role in the scenario.
Think about whether this player is attacking or defending, and place them accordingly. Make sure to assign the main
player a unique position.

Step 4: Place the team players (5 players, including the main player and the goalkeeper). Distribute the remaining 4
players from the main player's team around the pitch based on the scenario. These players should be positioned
strategically to reflect typical game dynamics, such as positioning during an attack, defense, or counterattack.

Step 5: Position the opponent players (5 players, including the goalkeeper). Place the defending team's players in
appropriate positions to counter the team with the ball. Ensure that one of the players is clearly positioned as the
goalkeeper, staying close to the goal. The other 4 opponent players should be positioned according to the game flow.

Step 6: Place the ball. The ball should be positioned near the main player, reflecting its role in the scenario.
Ensure that the ball's coordinates are logical in relation to the main player's position.

Format the final output in a JSON-like structure.
IMPERATIVE: JSON format must be wrapped with <JSON></JSON> tags, contain no extraneous
characters, and be valid JSON.
IMPERATIVE: Never use `//` comments.

Output JSON Format:
<JSON>
{
  "coordinates": {
    "team_players": [
      {"position": [x1, y1]},
      {"position": [x2, y2]},
      {"position": [x3, y3]},
      {"position": [x4, y4]},
      {"position": [x5, y5]}
    ],
    "opponent_players": [
      {"position": [x6, y6]},
      {"position": [x7, y7]},
      {"position": [x8, y8]},
      {"position": [x9, y9]},
      {"position": [x10, y10]}
    ],
    "main_player": [x_main, y_main],
    "ball": [ball_x, ball_y]
  }
}
</JSON>
"#
      .into(),

      style_instructions: vec![
        "Focus on the player's decision-making process and how they should prioritize options in this scenario.".into(),
        "Emphasize the tactical implications of the scenario and how it impacts team dynamics.".into(),
        "Highlight the psychological aspects of the player's actions under pressure in this scenario.".into(),
        "Explore the technical skills required for a player to execute optimal actions in this situation.".into(),
        "Consider the game's context (e.g., time left, scoreline) and how it influences the player's choices.".into(),
        "Frame the question to reflect a high-stakes scenario, such as a critical moment in the match.".into(),
        "Incorporate elements of player positioning and spatial awareness in the decision-making process.".into(),
        "Focus on the interaction between teammates and how their positions affect the player's options.".into(),
        "Explore how the opponent's defensive setup creates challenges or opportunities for the player.".into(),
        "Use specific terminology related to the scenario (e.g., 'breaking the lines,' 'high press,' 'compact defense').".into(),
      ],
    }
  }
}

/// Attempt to load `QuizConfig` from QUIZ_CONFIG_PATH. On any parsing/IO
/// error, returns None and the defaults apply.
pub fn load_quiz_config_from_env() -> Option<QuizConfig> {
  let path = std::env::var("QUIZ_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<QuizConfig>(&s) {
      Ok(cfg) => {
        info!(target: "matchango_backend", %path, "Loaded quiz config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "matchango_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "matchango_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_templates_carry_the_tag_contract() {
    let p = Prompts::default();
    for tpl in [&p.question_template, &p.positions_template] {
      assert!(tpl.contains("<JSON>"));
      assert!(tpl.contains("</JSON>"));
      assert!(tpl.contains("Never use `//` comments"));
    }
  }

  #[test]
  fn default_style_bank_is_populated() {
    assert_eq!(Prompts::default().style_instructions.len(), 10);
  }

  #[test]
  fn toml_override_replaces_prompts() {
    let toml_src = r#"
[prompts]
system = "sys"
question_template = "q {situation}"
positions_template = "p {question}"
style_instructions = ["only one"]
"#;
    let cfg: QuizConfig = toml::from_str(toml_src).unwrap();
    assert_eq!(cfg.prompts.system, "sys");
    assert_eq!(cfg.prompts.style_instructions, vec!["only one"]);
  }
}
