//! Hitboxes and overlap tests
//!
//! Collision is deliberately lenient: the player box is inset on every side
//! and spikes only count their central half, so near misses stay misses.

use super::state::{Obstacle, ObstacleShape, Player};
use crate::consts::FORGIVENESS_MARGIN;

/// Axis-aligned rectangle (top-left origin, y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict interval overlap on both axes; touching edges do not collide
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Player box shrunk by the forgiveness margin
pub fn player_hitbox(player: &Player) -> Rect {
    Rect::new(
        player.pos.x + FORGIVENESS_MARGIN,
        player.pos.y + FORGIVENESS_MARGIN,
        player.size - 2.0 * FORGIVENESS_MARGIN,
        player.size - 2.0 * FORGIVENESS_MARGIN,
    )
}

/// Full box for blocks, central half for spikes
pub fn obstacle_hitbox(obstacle: &Obstacle) -> Rect {
    match obstacle.shape {
        ObstacleShape::Block { width, height } => Rect::new(obstacle.x, obstacle.y, width, height),
        ObstacleShape::Spike { size } => {
            let quarter = (size / 4.0).floor();
            let half = (size / 2.0).floor();
            Rect::new(obstacle.x + quarter, obstacle.y + quarter, half, half)
        }
    }
}

/// True when the player's hitbox overlaps the obstacle's hitbox
pub fn check_collision(player: &Player, obstacle: &Obstacle) -> bool {
    player_hitbox(player).intersects(&obstacle_hitbox(obstacle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use glam::Vec2;

    fn block_at(x: f32, width: f32, height: f32) -> Obstacle {
        Obstacle::new(1, x, ObstacleShape::Block { width, height }, [255, 0, 128], 0.0)
    }

    #[test]
    fn test_rect_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(a.intersects(&Rect::new(4.0, 4.0, 1.0, 1.0)));
        // Separated on x only
        assert!(!a.intersects(&Rect::new(20.0, 0.0, 5.0, 5.0)));
        // Separated on y only
        assert!(!a.intersects(&Rect::new(0.0, 20.0, 5.0, 5.0)));
        // Touching edges
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let a = Rect::new(2.0, 3.0, 31.0, 31.0);
        let b = Rect::new(20.0, 30.0, 40.0, 20.0);
        assert_eq!(a.intersects(&b), b.intersects(&a));
    }

    #[test]
    fn test_block_in_lane_collides() {
        let player = Player::new();
        let block = block_at(PLAYER_X + 10.0, 30.0, 40.0);
        assert!(check_collision(&player, &block));
    }

    #[test]
    fn test_margin_forgives_edge_graze() {
        let player = Player::new();
        // Block starts 1px inside the visual player box
        let block = block_at(PLAYER_X + PLAYER_SIZE - 1.0, 30.0, 40.0);
        assert!(!check_collision(&player, &block));
    }

    #[test]
    fn test_spike_uses_central_hitbox() {
        let spike = Obstacle::new(1, 200.0, ObstacleShape::Spike { size: 40.0 }, [0; 3], 0.0);
        let hb = obstacle_hitbox(&spike);
        assert_eq!(hb, Rect::new(210.0, GROUND_Y - 40.0 + 10.0, 20.0, 20.0));

        // Player whose inset box ends just past the spike's left corner but
        // short of its central hitbox
        let mut player = Player::new();
        let x = 200.0 + 5.0 - PLAYER_SIZE + FORGIVENESS_MARGIN;
        player.pos = Vec2::new(x, GROUND_Y - PLAYER_SIZE);
        assert!(!check_collision(&player, &spike));
    }

    #[test]
    fn test_player_containing_tiny_box_collides() {
        let player = Player::new();
        let center = player.center();
        let tiny = Obstacle {
            id: 9,
            shape: ObstacleShape::Block { width: 1.0, height: 1.0 },
            color: [0; 3],
            x: center.x,
            y: center.y,
            pulse: 0.0,
        };
        assert!(check_collision(&player, &tiny));
    }

    #[test]
    fn test_high_jump_clears_block() {
        let mut player = Player::new();
        player.pos.y = GROUND_Y - 200.0;
        let block = block_at(PLAYER_X, 40.0, 60.0);
        assert!(!check_collision(&player, &block));
    }
}
