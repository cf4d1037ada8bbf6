//! Fly Bomber - a tower-bombing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (plane, bomb, towers, scoring)
//! - `renderer`: Canvas abstraction, entity arena and terminal rasterizer
//! - `platform`: Terminal window, key input and tick scheduling
//! - `audio`: Synthesized sound effects (optional backend)
//! - `settings`: JSON configuration

pub mod audio;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Delay between game loop ticks (milliseconds)
    pub const GAME_DELAY_MS: u64 = 20;

    /// Window dimensions
    pub const WIDTH: f32 = 800.0;
    pub const HEIGHT: f32 = 600.0;
    pub const WINDOW_TITLE: &str = "Fly Game";

    /// Play area (window minus a margin)
    pub const GAME_AREA_WIDTH: f32 = WIDTH - 50.0;
    pub const GAME_AREA_HEIGHT: f32 = HEIGHT - 50.0;

    /// Tower field
    pub const NUM_TOWERS: u32 = 20;
    pub const MAX_TOWER_HEIGHT: u32 = 10;

    /// Plane horizontal step per tick
    pub const PLANE_DX: f32 = 12.0;
    /// Bomb vertical step per tick (negative = down)
    pub const BOMB_DY: f32 = -20.0;

    /// Collision half-extents of the moving actors
    pub const PLANE_HALF_HEIGHT: f32 = 10.0;
    pub const BOMB_HALF_SIZE: f32 = 5.0;

    /// Points per destroyed block
    pub const BLOCK_REWARD: u64 = 10;

    /// Score label placement
    pub const SCORE_LABEL_Y: f32 = 250.0;
}

/// Size of one tower cell for the given tower count
#[inline]
pub fn cell_size_for(num_towers: u32) -> f32 {
    consts::GAME_AREA_WIDTH / num_towers as f32
}

/// Horizontal/vertical offset that centers even and odd tower counts
#[inline]
pub fn tower_offset(num_towers: u32, cell_size: f32) -> f32 {
    (num_towers % 2) as f32 * cell_size / 2.0 + cell_size / 2.0
}

/// Left edge of the play area
#[inline]
pub fn left_edge() -> f32 {
    -consts::GAME_AREA_WIDTH / 2.0
}

/// Right edge of the play area
#[inline]
pub fn right_edge() -> f32 {
    consts::GAME_AREA_WIDTH / 2.0
}

/// Floor of the play area (towers stand on it, bombs fall through it)
#[inline]
pub fn floor_y() -> f32 {
    -consts::GAME_AREA_HEIGHT / 2.0
}

/// Where the plane (and the idle bomb) start each level
#[inline]
pub fn plane_start() -> Vec2 {
    Vec2::new(left_edge(), consts::GAME_AREA_HEIGHT / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use consts::*;

    #[test]
    fn test_cell_size_for_default_field() {
        assert!((cell_size_for(NUM_TOWERS) - 37.5).abs() < 1e-4);
    }

    #[test]
    fn test_tower_offset_even_and_odd() {
        // Even count: half a cell
        assert!((tower_offset(20, 37.5) - 18.75).abs() < 1e-4);
        // Odd count: a whole cell
        assert!((tower_offset(3, 30.0) - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_plane_start_is_top_left() {
        let start = plane_start();
        assert_eq!(start, Vec2::new(-375.0, 275.0));
        assert_eq!(floor_y(), -275.0);
    }
}
