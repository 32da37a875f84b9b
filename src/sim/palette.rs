//! Neon color theme shared by the simulation and the renderer

use rand::Rng;

/// 8-bit RGB color
pub type Rgb = [u8; 3];

pub const NEON_PINK: Rgb = [255, 0, 128];
pub const NEON_CYAN: Rgb = [0, 255, 255];
pub const NEON_PURPLE: Rgb = [255, 0, 255];
pub const NEON_GREEN: Rgb = [0, 255, 128];
pub const NEON_YELLOW: Rgb = [255, 255, 0];
pub const NEON_BLUE: Rgb = [0, 128, 255];
pub const NEON_ORANGE: Rgb = [255, 128, 0];

pub const NEON_COLORS: [Rgb; 7] = [
    NEON_PINK,
    NEON_CYAN,
    NEON_PURPLE,
    NEON_GREEN,
    NEON_YELLOW,
    NEON_BLUE,
    NEON_ORANGE,
];

pub const OBSTACLE_COLORS: [Rgb; 3] = [NEON_PINK, NEON_GREEN, NEON_YELLOW];

pub const PLAYER_COLOR: Rgb = NEON_CYAN;
pub const BG_COLOR: Rgb = [20, 20, 30];
pub const GROUND_COLOR: Rgb = [40, 40, 60];
pub const TEXT_COLOR: Rgb = [255, 255, 255];

/// Pick a uniformly random color from a palette
pub fn pick<R: Rng + ?Sized>(rng: &mut R, colors: &[Rgb]) -> Rgb {
    colors[rng.random_range(0..colors.len())]
}

/// Brighten each channel by `amount`, saturating at 255
pub fn lighten(color: Rgb, amount: u8) -> Rgb {
    color.map(|c| c.saturating_add(amount))
}
