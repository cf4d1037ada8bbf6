//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick
//! - Seeded RNG only
//! - Stable iteration order (generation order of towers and blocks)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;
pub mod towers;

pub use collision::{bomb_collides, plane_collides};
pub use state::{
    Block, BlockColor, BlockRef, Bomb, BombState, GameEvent, GameState, Plane, PlaneStatus, Tower,
    total_value,
};
pub use tick::{drop_bomb, tick};
pub use towers::generate_towers;
