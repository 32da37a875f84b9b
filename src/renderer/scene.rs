//! Scene composition: turn a session snapshot into a draw list

use glam::Vec2;

use super::draw::{DrawCmd, Rgba, TextAlign, rgba};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::background::DecorKind;
use crate::sim::palette::{
    GROUND_COLOR, NEON_COLORS, NEON_CYAN, NEON_GREEN, NEON_PINK, NEON_YELLOW, lighten,
};
use crate::sim::{GamePhase, Obstacle, ObstacleShape, Player, Session};

const GRID_SPACING: f32 = 40.0;
const GROUND_LINE_WIDTH: f32 = 2.0;
/// Ticks each ground line color holds
const GROUND_FLICKER_TICKS: u64 = 4;
const OBSTACLE_HIGHLIGHT: u8 = 50;
const SMALL_FONT: f32 = 18.0;
const HUD_FONT: f32 = 24.0;
const BANNER_FONT: f32 = 36.0;
const TITLE_FONT: f32 = 48.0;

/// Build everything visible for one frame, back to front
pub fn build_frame(session: &Session, settings: &Settings) -> Vec<DrawCmd> {
    let mut cmds = Vec::with_capacity(128);

    cmds.push(DrawCmd::rect(
        0.0,
        0.0,
        SCREEN_WIDTH,
        SCREEN_HEIGHT,
        rgba(session.background.color(), 1.0),
    ));
    if settings.background_effects {
        push_background(&mut cmds, session);
    }
    push_ground(&mut cmds, session);

    for obstacle in &session.obstacles {
        push_obstacle(&mut cmds, obstacle);
    }
    push_player(&mut cmds, &session.player, settings.trails);

    push_hud(&mut cmds, session);
    if session.speed_notice_visible() {
        let mid = SCREEN_WIDTH / 2.0;
        cmds.push(DrawCmd::rect(mid - 90.0, 35.0, 180.0, 55.0, rgba(NEON_PINK, 80.0 / 255.0)));
        cmds.push(
            DrawCmd::text("Speed Up!", mid, 45.0, BANNER_FONT, TextAlign::Center)
                .with_color(rgba(NEON_PINK, 1.0)),
        );
    }
    if session.phase == GamePhase::GameOver {
        push_game_over(&mut cmds, session);
    }
    cmds
}

fn push_background(cmds: &mut Vec<DrawCmd>, session: &Session) {
    let faint = rgba([255, 255, 255], 0.04);
    let mut x = 0.0;
    while x <= SCREEN_WIDTH {
        cmds.push(DrawCmd::Line {
            from: Vec2::new(x, 0.0),
            to: Vec2::new(x, GROUND_Y),
            width: 1.0,
            color: faint,
        });
        x += GRID_SPACING;
    }
    let mut y = 0.0;
    while y < GROUND_Y {
        cmds.push(DrawCmd::Line {
            from: Vec2::new(0.0, y),
            to: Vec2::new(SCREEN_WIDTH, y),
            width: 1.0,
            color: faint,
        });
        y += GRID_SPACING;
    }

    for line in &session.background.lines {
        cmds.push(DrawCmd::Line {
            from: Vec2::new(line.x, line.y),
            to: Vec2::new(line.x + line.length, line.y),
            width: line.thickness,
            color: rgba(line.color, 0.6),
        });
    }

    for shape in &session.background.shapes {
        let color = rgba(shape.color, shape.alpha as f32 / 255.0);
        let half = shape.size / 2.0;
        let center = Vec2::new(shape.x + half, shape.y + half);
        cmds.push(match shape.kind {
            DecorKind::Circle => DrawCmd::Circle {
                center,
                radius: half,
                color,
            },
            DecorKind::Rect => DrawCmd::rect(shape.x, shape.y, shape.size, shape.size, color),
            DecorKind::Triangle => DrawCmd::Polygon {
                points: vec![
                    Vec2::new(center.x, shape.y),
                    Vec2::new(shape.x + shape.size, shape.y + shape.size),
                    Vec2::new(shape.x, shape.y + shape.size),
                ],
                color,
            },
        });
    }
}

fn push_ground(cmds: &mut Vec<DrawCmd>, session: &Session) {
    let depth = SCREEN_HEIGHT - GROUND_Y;
    cmds.push(DrawCmd::rect(0.0, GROUND_Y, SCREEN_WIDTH, depth, rgba(GROUND_COLOR, 1.0)));

    let grid = rgba(lighten(GROUND_COLOR, 30), 1.0);
    let mut x = 0.0;
    while x <= SCREEN_WIDTH {
        cmds.push(DrawCmd::Line {
            from: Vec2::new(x, GROUND_Y),
            to: Vec2::new(x, SCREEN_HEIGHT),
            width: 1.0,
            color: grid,
        });
        x += GRID_SPACING;
    }

    let flicker = (session.elapsed_ticks / GROUND_FLICKER_TICKS) as usize % NEON_COLORS.len();
    cmds.push(DrawCmd::rect(
        0.0,
        GROUND_Y - GROUND_LINE_WIDTH / 2.0,
        SCREEN_WIDTH,
        GROUND_LINE_WIDTH,
        rgba(NEON_COLORS[flicker], 1.0),
    ));
}

fn spike_points(x: f32, y: f32, size: f32, grow: f32) -> Vec<Vec2> {
    vec![
        Vec2::new(x - grow, y + size + grow),
        Vec2::new(x + size / 2.0, y - grow),
        Vec2::new(x + size + grow, y + size + grow),
    ]
}

fn push_obstacle(cmds: &mut Vec<DrawCmd>, obstacle: &Obstacle) {
    let glow = 3.0 + 2.0 * obstacle.pulse.sin();
    let glow_color = rgba(obstacle.color, 0.5);
    let body_color = rgba(lighten(obstacle.color, OBSTACLE_HIGHLIGHT), 1.0);
    let (x, y) = (obstacle.x, obstacle.y);

    match obstacle.shape {
        ObstacleShape::Block { width, height } => {
            cmds.push(DrawCmd::rect(
                x - glow,
                y - glow,
                width + 2.0 * glow,
                height + 2.0 * glow,
                glow_color,
            ));
            cmds.push(DrawCmd::rect(x, y, width, height, body_color));
        }
        ObstacleShape::Spike { size } => {
            cmds.push(DrawCmd::Polygon {
                points: spike_points(x, y, size, glow),
                color: glow_color,
            });
            cmds.push(DrawCmd::Polygon {
                points: spike_points(x, y, size, 0.0),
                color: body_color,
            });
        }
    }
}

/// Corners of a square of side `side` centered on `center`, rotated clockwise on screen
fn rotated_square(center: Vec2, side: f32, degrees: f32) -> Vec<Vec2> {
    let rot = Vec2::from_angle(degrees.to_radians());
    let h = side / 2.0;
    [(-h, -h), (h, -h), (h, h), (-h, h)]
        .into_iter()
        .map(|(x, y)| center + rot.rotate(Vec2::new(x, y)))
        .collect()
}

fn push_player(cmds: &mut Vec<DrawCmd>, player: &Player, trails: bool) {
    let color: Rgba = rgba(player.color, 1.0);

    if trails {
        // Oldest point is invisible, newest stays smaller than the body
        for (i, point) in player.trail.iter().enumerate() {
            let t = i as f32 / TRAIL_CAPACITY as f32;
            let side = (player.size * t * 0.8).floor();
            if side <= 0.0 {
                continue;
            }
            cmds.push(DrawCmd::rect(
                point.x - side / 2.0,
                point.y - side / 2.0,
                side,
                side,
                rgba(player.color, t),
            ));
        }
    }

    let center = player.center();
    let glow_side = player.size + 4.0 + 2.0 * player.pulse.sin();
    cmds.push(DrawCmd::Polygon {
        points: rotated_square(center, glow_side, player.rotation),
        color: rgba(player.color, 0.4),
    });
    cmds.push(DrawCmd::Polygon {
        points: rotated_square(center, player.size, player.rotation),
        color,
    });
}

fn push_hud(cmds: &mut Vec<DrawCmd>, session: &Session) {
    let lines = [
        (format!("Score: {}", session.total_score()), 10.0, HUD_FONT, NEON_CYAN),
        (format!("Time: {}", session.time_score), 45.0, SMALL_FONT, NEON_YELLOW),
        (format!("Speed: {:.1}x", session.speed_multiplier()), 70.0, SMALL_FONT, NEON_GREEN),
    ];
    for (text, y, size, color) in lines {
        cmds.push(DrawCmd::text(text, 10.0, y, size, TextAlign::Left).with_color(rgba(color, 1.0)));
    }
}

fn push_game_over(cmds: &mut Vec<DrawCmd>, session: &Session) {
    let mid = SCREEN_WIDTH / 2.0;
    cmds.push(DrawCmd::rect(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT, [0.0, 0.0, 0.0, 150.0 / 255.0]));
    // Glow plate behind the title
    cmds.push(DrawCmd::rect(mid - 150.0, 95.0, 300.0, 70.0, rgba(NEON_PINK, 100.0 / 255.0)));

    let lines = [
        ("Game Over".to_string(), 105.0, TITLE_FONT, NEON_PINK),
        (format!("Score: {}", session.total_score()), 175.0, BANNER_FONT, NEON_YELLOW),
        (format!("Time: {:.1}s", session.elapsed_secs()), 215.0, HUD_FONT, NEON_GREEN),
        ("Press R to restart".to_string(), 255.0, HUD_FONT, NEON_CYAN),
    ];
    for (text, y, size, color) in lines {
        let line = DrawCmd::text(text, mid, y, size, TextAlign::Center);
        cmds.push(line.with_color(rgba(color, 1.0)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{TickInput, tick};

    fn texts(cmds: &[DrawCmd]) -> Vec<&str> {
        cmds.iter()
            .filter_map(|c| match c {
                DrawCmd::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_running_frame_has_hud_only() {
        let session = Session::new(1);
        let cmds = build_frame(&session, &Settings::default());
        assert!(matches!(cmds[0], DrawCmd::Rect { pos, .. } if pos == Vec2::ZERO));
        assert_eq!(texts(&cmds), ["Score: 0", "Time: 0", "Speed: 1.0x"]);
    }

    #[test]
    fn test_speed_banner_and_game_over_overlay() {
        let mut session = Session::new(1);
        session.elapsed_ticks = SPEED_UP_INTERVAL_TICKS - 1;
        session.obstacles.clear();
        tick(&mut session, &TickInput::default());
        session.phase = GamePhase::GameOver;

        let cmds = build_frame(&session, &Settings::default());
        let texts = texts(&cmds);
        assert!(texts.contains(&"Speed Up!"));
        assert!(texts.contains(&"Game Over"));
        assert!(texts.contains(&"Time: 15.0s"));
        assert!(texts.contains(&"Press R to restart"));
        assert!(texts.contains(&"Speed: 1.1x"));
    }

    #[test]
    fn test_obstacle_body_is_lightened() {
        let mut session = Session::new(1);
        let id = session.next_entity_id();
        session.obstacles.push(Obstacle::new(
            id,
            400.0,
            ObstacleShape::Block { width: 30.0, height: 40.0 },
            [255, 0, 128],
            0.0,
        ));
        let cmds = build_frame(&session, &Settings::default());
        let body = rgba([255, 50, 178], 1.0);
        assert!(cmds.iter().any(|c| matches!(
            c,
            DrawCmd::Rect { pos, size, color }
                if *pos == Vec2::new(400.0, GROUND_Y - 40.0)
                    && *size == Vec2::new(30.0, 40.0)
                    && *color == body
        )));
    }

    #[test]
    fn test_settings_toggle_decorations() {
        let mut session = Session::new(1);
        for _ in 0..5 {
            session.obstacles.clear();
            tick(&mut session, &TickInput { jump: true, beat: None });
        }
        let full = build_frame(&session, &Settings::default());
        let plain = build_frame(
            &session,
            &Settings {
                trails: false,
                background_effects: false,
                ..Default::default()
            },
        );
        let removed = session.player.trail.len()
            + session.background.lines.len()
            + session.background.shapes.len();
        assert!(plain.len() + removed < full.len());
        assert_eq!(texts(&plain), texts(&full));
    }

    #[test]
    fn test_trail_squares_shrink_and_fade() {
        let mut player = Player::new();
        player.jump();
        for _ in 0..TRAIL_CAPACITY {
            player.update();
        }
        let mut cmds = Vec::new();
        push_player(&mut cmds, &player, true);

        let trail: Vec<(Vec2, f32)> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCmd::Rect { size, color, .. } => Some((*size, color[3])),
                _ => None,
            })
            .collect();
        // The oldest point has zero size and is skipped
        assert_eq!(trail.len(), TRAIL_CAPACITY - 1);
        let (newest, alpha) = trail[trail.len() - 1];
        assert_eq!(newest.x, (player.size * 0.9 * 0.8).floor());
        assert!(newest.x < player.size);
        assert!((alpha - 0.9).abs() < 1e-6);
        assert!(trail.windows(2).all(|w| w[0].0.x <= w[1].0.x && w[0].1 < w[1].1));
    }

    #[test]
    fn test_banner_gone_after_game_over_wait() {
        let mut session = Session::new(1);
        session.elapsed_ticks = SPEED_UP_INTERVAL_TICKS - 1;
        session.obstacles.clear();
        tick(&mut session, &TickInput::default());
        session.phase = GamePhase::GameOver;
        for _ in 0..SPEED_NOTICE_TICKS {
            tick(&mut session, &TickInput::default());
        }

        let cmds = build_frame(&session, &Settings::default());
        let texts = texts(&cmds);
        assert!(!texts.contains(&"Speed Up!"));
        assert!(texts.contains(&"Game Over"));
    }

    #[test]
    fn test_rotated_square_keeps_side() {
        let pts = rotated_square(Vec2::new(10.0, 10.0), 4.0, 45.0);
        assert_eq!(pts.len(), 4);
        assert!((pts[0].distance(pts[1]) - 4.0).abs() < 1e-4);
        assert!((pts[0].distance(Vec2::new(10.0, 10.0)) - 8f32.sqrt()).abs() < 1e-4);
    }
}
