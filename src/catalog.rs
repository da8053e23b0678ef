//! Static scenario catalog: dropdown vocabularies (scenarios and evaluation
//! axes per situation) and the default pitch layout for each named scenario.
//! Layouts are the fallback when the operator does not request AI-generated
//! positions. Goalkeepers come first in each list by convention.

use crate::domain::{PlayerSpot, Position, SceneState, Situation, TEAM_SIZE};

const OFFENSIVE_AXES: &[&str] = &[
  "Contrôle de la possession",
  "Créativité",
  "Finition",
  "Capacité de dribble",
  "Précision des passes",
  "Vision de jeu",
  "Adaptabilité tactique",
  "Puissance physique",
  "Vitesse d'exécution",
];

const DEFENSIVE_AXES: &[&str] = &[
  "Engagement défensif",
  "Pressing et Récupération",
  "Anticipation",
  "Adaptabilité tactique",
  "Puissance physique",
  "Vitesse d'exécution",
  "Vision de jeu",
];

const OFFENSIVE_SCENARIOS: &[&str] = &[
  "Attaque Positionnelle",
  "Contre-Attaque Rapide",
  "Débordement sur les Côtés",
  "Jeu en Profondeur",
  "Centre en Retrait",
  "Mouvement de Rupture (Appel sans Ballon)",
];

const DEFENSIVE_SCENARIOS: &[&str] = &[
  "Défense en Bloc Bas",
  "Marquage Individuel",
  "Marquage en Zone",
  "Réaction Rapide après un Tir Contré",
  "Interception des Passes",
  "Défense en Bloc Haut",
];

pub fn situations() -> [Situation; 3] {
  [Situation::Offense, Situation::Defense, Situation::Other]
}

pub fn scenarios_for(situation: Situation) -> Vec<&'static str> {
  match situation {
    Situation::Offense => OFFENSIVE_SCENARIOS.to_vec(),
    Situation::Defense => DEFENSIVE_SCENARIOS.to_vec(),
    Situation::Other => Vec::new(),
  }
}

pub fn axes_for(situation: Situation) -> Vec<&'static str> {
  match situation {
    Situation::Offense => OFFENSIVE_AXES.to_vec(),
    Situation::Defense => DEFENSIVE_AXES.to_vec(),
    Situation::Other => {
      let mut all = OFFENSIVE_AXES.to_vec();
      for a in DEFENSIVE_AXES {
        if !all.contains(a) {
          all.push(a);
        }
      }
      all
    }
  }
}

fn scene(
  team: [(f64, f64); TEAM_SIZE],
  opponents: [(f64, f64); TEAM_SIZE],
  main: (f64, f64),
  ball: (f64, f64),
) -> SceneState {
  SceneState {
    team_players: team.iter().map(|&(x, y)| PlayerSpot::at(x, y)).collect(),
    opponent_players: opponents.iter().map(|&(x, y)| PlayerSpot::at(x, y)).collect(),
    main_player: Position::new(main.0, main.1),
    ball: Position::new(ball.0, ball.1),
  }
}

/// Default layout for a named scenario, or None for unknown names (including
/// everything under `Other`, which has no canned layouts).
pub fn layout_for(situation: Situation, scenario: &str) -> Option<SceneState> {
  match situation {
    Situation::Offense => offensive_layout(scenario),
    Situation::Defense => defensive_layout(scenario),
    Situation::Other => None,
  }
}

fn offensive_layout(scenario: &str) -> Option<SceneState> {
  match scenario {
    "Attaque Positionnelle" => Some(scene(
      [(5.0, 40.0), (40.0, 30.0), (60.0, 50.0), (80.0, 60.0), (100.0, 40.0)],
      [(115.0, 40.0), (90.0, 20.0), (85.0, 50.0), (80.0, 35.0), (75.0, 45.0)],
      (60.0, 50.0),
      (58.0, 48.0),
    )),
    "Contre-Attaque Rapide" => Some(scene(
      [(5.0, 40.0), (30.0, 50.0), (50.0, 40.0), (70.0, 45.0), (90.0, 55.0)],
      [(115.0, 40.0), (100.0, 35.0), (95.0, 50.0), (85.0, 40.0), (80.0, 30.0)],
      (70.0, 45.0),
      (68.0, 43.0),
    )),
    "Mouvement de Rupture (Appel sans Ballon)"
    | "Jeu en Profondeur"
    | "Centre en Retrait"
    | "Débordement sur les Côtés" => Some(scene(
      [(5.0, 40.0), (30.0, 60.0), (50.0, 70.0), (80.0, 65.0), (100.0, 60.0)],
      [(115.0, 40.0), (90.0, 55.0), (85.0, 65.0), (80.0, 50.0), (75.0, 40.0)],
      (80.0, 65.0),
      (78.0, 63.0),
    )),
    _ => None,
  }
}

fn defensive_layout(scenario: &str) -> Option<SceneState> {
  match scenario {
    "Défense en Bloc Bas" => Some(scene(
      [(5.0, 40.0), (20.0, 30.0), (25.0, 50.0), (30.0, 35.0), (40.0, 40.0)],
      [(115.0, 40.0), (90.0, 20.0), (95.0, 50.0), (85.0, 35.0), (75.0, 40.0)],
      (25.0, 50.0),
      (23.0, 48.0),
    )),
    "Marquage Individuel"
    | "Marquage en Zone"
    | "Réaction Rapide après un Tir Contré"
    | "Interception des Passes"
    | "Défense en Bloc Haut" => Some(scene(
      [(5.0, 40.0), (20.0, 40.0), (25.0, 35.0), (30.0, 50.0), (40.0, 45.0)],
      [(115.0, 40.0), (90.0, 30.0), (95.0, 40.0), (85.0, 50.0), (75.0, 60.0)],
      (30.0, 50.0),
      (28.0, 48.0),
    )),
    _ => None,
  }
}

/// Generic fallback used when no scenario layout applies (e.g. `Other`). The
/// ball sits next to the main player; there is no silent (0,0) default.
pub fn default_layout() -> SceneState {
  scene(
    [(5.0, 40.0), (63.0, 55.0), (78.0, 50.0), (97.0, 5.0), (98.0, 76.0)],
    [(115.0, 40.0), (107.0, 20.0), (107.0, 60.0), (99.0, 42.0), (74.0, 50.0)],
    (78.0, 50.0),
    (76.0, 49.0),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn vocabularies_are_placeholder_free() {
    for s in situations() {
      for name in scenarios_for(s).iter().chain(axes_for(s).iter()) {
        assert!(!crate::domain::is_placeholder(name), "placeholder leaked: {name}");
      }
    }
  }

  #[test]
  fn every_named_scenario_has_a_valid_layout() {
    for s in [Situation::Offense, Situation::Defense] {
      for name in scenarios_for(s) {
        let layout = layout_for(s, name).unwrap_or_else(|| panic!("no layout for {name}"));
        layout.validate().expect("layout validates");
        assert!(layout.main_player_is_on_team(), "{name}: main player not on team");
      }
    }
  }

  #[test]
  fn other_situation_unions_the_axes() {
    let axes = axes_for(Situation::Other);
    assert!(axes.contains(&"Finition"));
    assert!(axes.contains(&"Engagement défensif"));
    // shared axes appear once
    assert_eq!(axes.iter().filter(|a| **a == "Vision de jeu").count(), 1);
  }

  #[test]
  fn unknown_scenario_has_no_layout() {
    assert!(layout_for(Situation::Offense, "Inconnu").is_none());
    assert!(layout_for(Situation::Other, "Attaque Positionnelle").is_none());
  }

  #[test]
  fn default_layout_validates() {
    let layout = default_layout();
    layout.validate().expect("valid");
    assert!(layout.main_player_is_on_team());
    assert_ne!((layout.ball.x, layout.ball.y), (0.0, 0.0));
  }
}
