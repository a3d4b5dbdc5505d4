//! Frame composition
//!
//! Builds a backend-neutral draw list in logical coordinates. The canvas
//! backend (web only) scales it to the element's pixel size.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

use glam::Vec2;

use crate::consts::{LOGICAL_HEIGHT, LOGICAL_WIDTH};
use crate::game::GamePhase;
use crate::settings::Settings;
use crate::sim::{GameState, Hazard, Motion, Rgb, stage_label};

pub const BACKGROUND: Rgb = Rgb(0x1e, 0x27, 0x2e);
pub const PLAYER_COLOR: Rgb = Rgb(0xff, 0xff, 0xff);
pub const HUD_COLOR: Rgb = Rgb(0xdf, 0xe6, 0xe9);
const LIFE_TRACK: Rgb = Rgb(0x2d, 0x34, 0x36);
const LIFE_FILL: Rgb = Rgb(0x00, 0xce, 0xc9);
const LIFE_LOW: Rgb = Rgb(0xd6, 0x30, 0x31);

/// Life bar geometry (top-left, logical units)
const LIFE_BAR_ORIGIN: Vec2 = Vec2::new(10.0, 10.0);
const LIFE_BAR_SIZE: Vec2 = Vec2::new(120.0, 8.0);
/// Below this fraction the bar switches to the warning color
const LIFE_LOW_FRACTION: f32 = 0.3;

const HUD_FONT: f32 = 14.0;

/// Horizontal anchor of a text command relative to its position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// Canvas `textAlign` keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// One primitive to paint
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        color: Rgb,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgb,
        alpha: f32,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Rgb,
    },
    /// Open path, oldest point first
    Polyline {
        points: Vec<Vec2>,
        width: f32,
        color: Rgb,
        alpha: f32,
    },
    Rect {
        origin: Vec2,
        size: Vec2,
        color: Rgb,
    },
    Text {
        pos: Vec2,
        text: String,
        size: f32,
        color: Rgb,
        align: TextAlign,
    },
}

/// Compose one frame: background, hazards, player, HUD
pub fn build_frame(state: &GameState, phase: GamePhase, settings: &Settings) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(state.hazards.len() + 8);
    commands.push(DrawCommand::Clear { color: BACKGROUND });

    for hazard in &state.hazards {
        push_hazard(&mut commands, hazard, settings.trails);
    }

    commands.push(DrawCommand::Circle {
        center: state.player.pos,
        radius: state.player.radius,
        color: PLAYER_COLOR,
        alpha: 1.0,
    });

    push_hud(&mut commands, state, phase, settings);
    commands
}

fn push_hazard(commands: &mut Vec<DrawCommand>, hazard: &Hazard, trails: bool) {
    if hazard.kind().is_line() {
        if let Some((head, tail, width)) = hazard.segment() {
            commands.push(DrawCommand::Line {
                from: tail,
                to: head,
                width,
                color: hazard.color,
            });
        }
        return;
    }

    if let Motion::Snake { trail } = &hazard.motion {
        if trails && trail.len() > 1 {
            commands.push(DrawCommand::Polyline {
                points: trail.iter().collect(),
                width: hazard.size,
                color: hazard.color,
                alpha: 0.4,
            });
        }
    }

    let alpha = match hazard.motion {
        Motion::Surface { .. } => 0.6,
        _ => 1.0,
    };
    commands.push(DrawCommand::Circle {
        center: hazard.pos,
        radius: hazard.size,
        color: hazard.color,
        alpha,
    });
}

fn push_hud(commands: &mut Vec<DrawCommand>, state: &GameState, phase: GamePhase, settings: &Settings) {
    let fraction = state.life.fraction();
    commands.push(DrawCommand::Rect {
        origin: LIFE_BAR_ORIGIN,
        size: LIFE_BAR_SIZE,
        color: LIFE_TRACK,
    });
    if fraction > 0.0 {
        commands.push(DrawCommand::Rect {
            origin: LIFE_BAR_ORIGIN,
            size: Vec2::new(LIFE_BAR_SIZE.x * fraction, LIFE_BAR_SIZE.y),
            color: if fraction < LIFE_LOW_FRACTION { LIFE_LOW } else { LIFE_FILL },
        });
    }

    commands.push(DrawCommand::Text {
        pos: Vec2::new(LOGICAL_WIDTH - 10.0, 20.0),
        text: format!("{:.2}s", crate::survival_seconds(state.elapsed_ms)),
        size: HUD_FONT,
        color: HUD_COLOR,
        align: TextAlign::Right,
    });

    if settings.show_stage {
        commands.push(DrawCommand::Text {
            pos: Vec2::new(10.0, LOGICAL_HEIGHT - 10.0),
            text: stage_label(state.elapsed_seconds()),
            size: HUD_FONT,
            color: HUD_COLOR,
            align: TextAlign::Left,
        });
    }

    let banner = match phase {
        GamePhase::Ready => Some("Move to dodge. Press start".to_string()),
        GamePhase::GameOver => Some(format!(
            "Game over: {:.2}s",
            crate::survival_seconds(state.elapsed_ms)
        )),
        GamePhase::Playing => None,
    };
    if let Some(text) = banner {
        commands.push(DrawCommand::Text {
            pos: Vec2::new(LOGICAL_WIDTH / 2.0, LOGICAL_HEIGHT / 2.0 - 30.0),
            text,
            size: HUD_FONT * 1.5,
            color: HUD_COLOR,
            align: TextAlign::Center,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::LINE_WIDTH;
    use crate::sim::{LineShape, Trail};

    fn state_with(hazards: Vec<Hazard>) -> GameState {
        let mut state = GameState::new();
        state.hazards = hazards;
        state
    }

    fn snake(points: usize) -> Hazard {
        let mut trail = Trail::new();
        for i in 0..points {
            trail.push(Vec2::new(i as f32, 0.0));
        }
        Hazard::new(1, Vec2::new(50.0, 50.0), Vec2::X, 5.0, Motion::Snake { trail })
    }

    fn count(commands: &[DrawCommand], pred: impl Fn(&DrawCommand) -> bool) -> usize {
        commands.iter().filter(|c| pred(c)).count()
    }

    #[test]
    fn test_frame_starts_with_clear() {
        let commands = build_frame(&GameState::new(), GamePhase::Playing, &Settings::default());
        assert_eq!(commands[0], DrawCommand::Clear { color: BACKGROUND });
    }

    #[test]
    fn test_player_drawn_after_hazards() {
        let hazard = Hazard::new(1, Vec2::new(10.0, 10.0), Vec2::X, 4.0, Motion::Horizontal);
        let state = state_with(vec![hazard]);
        let commands = build_frame(&state, GamePhase::Playing, &Settings::default());

        let player_at = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Circle { color, .. } if *color == PLAYER_COLOR));
        let hazard_at = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Circle { center, .. } if *center == Vec2::new(10.0, 10.0)));
        assert!(hazard_at < player_at);
    }

    #[test]
    fn test_line_hazard_drawn_as_segment() {
        let line = LineShape {
            length: 60.0,
            line_width: LINE_WIDTH,
        };
        let hazard = Hazard::new(1, Vec2::new(100.0, 50.0), Vec2::new(3.0, 0.0), 3.0, Motion::HLine(line));
        let commands = build_frame(&state_with(vec![hazard]), GamePhase::Playing, &Settings::default());

        assert!(commands.contains(&DrawCommand::Line {
            from: Vec2::new(40.0, 50.0),
            to: Vec2::new(100.0, 50.0),
            width: LINE_WIDTH,
            color: crate::sim::HazardKind::HLine.color(),
        }));
    }

    #[test]
    fn test_snake_trail_respects_setting() {
        let state = state_with(vec![snake(5)]);
        let is_trail = |c: &DrawCommand| matches!(c, DrawCommand::Polyline { points, .. } if points.len() == 5);

        let on = build_frame(&state, GamePhase::Playing, &Settings::default());
        assert_eq!(count(&on, is_trail), 1);

        let settings = Settings {
            trails: false,
            ..Default::default()
        };
        let off = build_frame(&state, GamePhase::Playing, &settings);
        assert_eq!(count(&off, |c| matches!(c, DrawCommand::Polyline { .. })), 0);
    }

    #[test]
    fn test_life_bar_tracks_meter() {
        let mut state = GameState::new();
        state.life.drain(750.0);
        let commands = build_frame(&state, GamePhase::Playing, &Settings::default());

        let fill = commands.iter().find_map(|c| match c {
            DrawCommand::Rect { size, color, .. } if *color == LIFE_LOW => Some(*size),
            _ => None,
        });
        assert_eq!(fill, Some(Vec2::new(30.0, LIFE_BAR_SIZE.y)));
    }

    #[test]
    fn test_hud_shows_time_and_stage() {
        let mut state = GameState::new();
        state.elapsed_ms = 23_456.0;
        let commands = build_frame(&state, GamePhase::Playing, &Settings::default());
        let texts: Vec<&str> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert!(texts.contains(&"23.46s"));
        assert!(texts.contains(&stage_label(23.456).as_str()));

        let hidden = Settings {
            show_stage: false,
            ..Default::default()
        };
        let commands = build_frame(&state, GamePhase::Playing, &hidden);
        assert_eq!(count(&commands, |c| matches!(c, DrawCommand::Text { .. })), 1);
    }

    #[test]
    fn test_hud_text_alignment() {
        let commands = build_frame(&GameState::new(), GamePhase::Playing, &Settings::default());
        let align_of = |prefix: &str| {
            commands.iter().find_map(|c| match c {
                DrawCommand::Text { text, align, .. } if text.starts_with(prefix) => Some(*align),
                _ => None,
            })
        };
        assert_eq!(align_of("0.00s"), Some(TextAlign::Right));
        assert_eq!(align_of("Stage"), Some(TextAlign::Left));
    }

    #[test]
    fn test_game_over_banner() {
        let mut state = GameState::new();
        state.elapsed_ms = 5_000.0;
        let commands = build_frame(&state, GamePhase::GameOver, &Settings::default());
        assert!(commands.iter().any(
            |c| matches!(c, DrawCommand::Text { text, align: TextAlign::Center, .. } if text == "Game over: 5.00s")
        ));
    }
}
