//! Deterministic pitch rendering.
//!
//! Draws a schematic 120x80 pitch as a PNG: team markers (gold edge on the
//! one that value-equals the main player), opponent markers, then the ball
//! last so it is never occluded. No randomness, no text; identical scenes
//! produce identical bytes.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};

use crate::domain::{Position, SceneState, PITCH_LENGTH, PITCH_WIDTH};
use crate::errors::{AppError, AppResult};

/// Pixels per pitch unit.
const SCALE: u32 = 8;
/// Grass margin around the touchlines, in pixels.
const MARGIN: u32 = 20;

const IMG_W: u32 = PITCH_LENGTH as u32 * SCALE + 2 * MARGIN;
const IMG_H: u32 = PITCH_WIDTH as u32 * SCALE + 2 * MARGIN;

const LINE_THICKNESS: i64 = 2;
const MARKER_RADIUS: i64 = 10;
const MARKER_EDGE: i64 = 3;
const BALL_RADIUS: i64 = 8;

const PITCH_GREEN: Rgba<u8> = Rgba([0xaa, 0xbb, 0x97, 0xff]);
const LINE_WHITE: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);
const TEAM_GREEN: Rgba<u8> = Rgba([0x4c, 0xaf, 0x50, 0xff]);
const OPPONENT_ORANGE: Rgba<u8> = Rgba([0xff, 0x57, 0x33, 0xff]);
const EDGE_BLACK: Rgba<u8> = Rgba([0x00, 0x00, 0x00, 0xff]);
const EDGE_GOLD: Rgba<u8> = Rgba([0xff, 0xd7, 0x00, 0xff]);
const BALL_WHITE: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);

/// Render a scene to PNG bytes.
pub fn render_scene(scene: &SceneState) -> AppResult<Vec<u8>> {
  let img = draw_scene(scene);
  let mut buf = Cursor::new(Vec::new());
  image::DynamicImage::ImageRgba8(img)
    .write_to(&mut buf, ImageFormat::Png)
    .map_err(|e| AppError::Render(e.to_string()))?;
  Ok(buf.into_inner())
}

/// Draw the scene onto a fresh canvas. Split out from `render_scene` so tests
/// can assert on pixels without decoding PNG.
pub(crate) fn draw_scene(scene: &SceneState) -> RgbaImage {
  let mut img = RgbaImage::from_pixel(IMG_W, IMG_H, PITCH_GREEN);

  draw_pitch_lines(&mut img);

  for player in &scene.team_players {
    let edge = if player.position == scene.main_player {
      EDGE_GOLD
    } else {
      EDGE_BLACK
    };
    draw_marker(&mut img, player.position, TEAM_GREEN, edge);
  }
  for player in &scene.opponent_players {
    draw_marker(&mut img, player.position, OPPONENT_ORANGE, EDGE_BLACK);
  }

  // Ball goes last so it sits on top of any overlapping marker.
  let (bx, by) = to_px(scene.ball);
  fill_circle(&mut img, bx, by, BALL_RADIUS, BALL_WHITE);

  img
}

fn to_px(p: Position) -> (i64, i64) {
  (
    MARGIN as i64 + (p.x * SCALE as f64).round() as i64,
    MARGIN as i64 + (p.y * SCALE as f64).round() as i64,
  )
}

fn draw_marker(img: &mut RgbaImage, p: Position, fill: Rgba<u8>, edge: Rgba<u8>) {
  let (cx, cy) = to_px(p);
  fill_circle(img, cx, cy, MARKER_RADIUS + MARKER_EDGE, edge);
  fill_circle(img, cx, cy, MARKER_RADIUS, fill);
}

fn fill_circle(img: &mut RgbaImage, cx: i64, cy: i64, r: i64, color: Rgba<u8>) {
  for dy in -r..=r {
    for dx in -r..=r {
      if dx * dx + dy * dy <= r * r {
        put_px(img, cx + dx, cy + dy, color);
      }
    }
  }
}

fn draw_pitch_lines(img: &mut RgbaImage) {
  let left = MARGIN as i64;
  let top = MARGIN as i64;
  let right = MARGIN as i64 + (PITCH_LENGTH as i64) * SCALE as i64;
  let bottom = MARGIN as i64 + (PITCH_WIDTH as i64) * SCALE as i64;
  let mid_x = (left + right) / 2;
  let mid_y = (top + bottom) / 2;

  // Touchlines and goal lines.
  draw_h_line(img, left, right, top);
  draw_h_line(img, left, right, bottom);
  draw_v_line(img, top, bottom, left);
  draw_v_line(img, top, bottom, right);

  // Halfway line and centre circle (10 units radius).
  draw_v_line(img, top, bottom, mid_x);
  draw_ring(img, mid_x, mid_y, 10 * SCALE as i64, LINE_THICKNESS);

  // Penalty areas: 18 units deep, 40 wide, centred on each goal.
  let box_half_w = 20 * SCALE as i64;
  let box_depth = 18 * SCALE as i64;
  for (goal_x, dir) in [(left, 1i64), (right, -1i64)] {
    let inner_x = goal_x + dir * box_depth;
    draw_v_line(img, mid_y - box_half_w, mid_y + box_half_w, inner_x);
    draw_h_line(img, goal_x.min(inner_x), goal_x.max(inner_x), mid_y - box_half_w);
    draw_h_line(img, goal_x.min(inner_x), goal_x.max(inner_x), mid_y + box_half_w);
  }
}

fn draw_h_line(img: &mut RgbaImage, x0: i64, x1: i64, y: i64) {
  for x in x0..=x1 {
    for t in 0..LINE_THICKNESS {
      put_px(img, x, y + t, LINE_WHITE);
    }
  }
}

fn draw_v_line(img: &mut RgbaImage, y0: i64, y1: i64, x: i64) {
  for y in y0..=y1 {
    for t in 0..LINE_THICKNESS {
      put_px(img, x + t, y, LINE_WHITE);
    }
  }
}

fn draw_ring(img: &mut RgbaImage, cx: i64, cy: i64, r: i64, thickness: i64) {
  let inner = r - thickness;
  for dy in -r..=r {
    for dx in -r..=r {
      let d2 = dx * dx + dy * dy;
      if d2 <= r * r && d2 > inner * inner {
        put_px(img, cx + dx, cy + dy, LINE_WHITE);
      }
    }
  }
}

fn put_px(img: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
  if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
    img.put_pixel(x as u32, y as u32, color);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::default_layout;
  use crate::domain::PlayerSpot;

  fn center_of(p: Position) -> (u32, u32) {
    let (x, y) = to_px(p);
    (x as u32, y as u32)
  }

  #[test]
  fn rendering_is_deterministic() {
    let scene = default_layout();
    let a = render_scene(&scene).unwrap();
    let b = render_scene(&scene).unwrap();
    assert_eq!(a, b);
  }

  #[test]
  fn team_and_opponent_markers_have_their_colors() {
    let scene = default_layout();
    let img = draw_scene(&scene);

    let (tx, ty) = center_of(scene.team_players[1].position);
    assert_eq!(*img.get_pixel(tx, ty), TEAM_GREEN);

    let (ox, oy) = center_of(scene.opponent_players[1].position);
    assert_eq!(*img.get_pixel(ox, oy), OPPONENT_ORANGE);
  }

  #[test]
  fn only_the_main_player_gets_the_gold_edge() {
    let scene = default_layout();
    let img = draw_scene(&scene);

    // Edge ring sample point: just outside the fill radius, inside the edge.
    let edge_off = MARKER_RADIUS + MARKER_EDGE - 1;

    let (mx, my) = center_of(scene.main_player);
    assert_eq!(*img.get_pixel((mx as i64 + edge_off) as u32, my), EDGE_GOLD);

    let other = scene.team_players[1].position;
    assert_ne!(other, scene.main_player);
    let (ox, oy) = center_of(other);
    assert_eq!(*img.get_pixel((ox as i64 + edge_off) as u32, oy), EDGE_BLACK);
  }

  #[test]
  fn ball_is_drawn_last_and_never_occluded() {
    let mut scene = default_layout();
    // Park an opponent directly on the ball.
    scene.opponent_players[4] = PlayerSpot::at(scene.ball.x, scene.ball.y);
    let img = draw_scene(&scene);
    let (bx, by) = center_of(scene.ball);
    assert_eq!(*img.get_pixel(bx, by), BALL_WHITE);
  }

  #[test]
  fn off_pitch_positions_do_not_panic() {
    let mut scene = default_layout();
    scene.ball = Position::new(-30.0, 300.0);
    render_scene(&scene).unwrap();
  }
}
