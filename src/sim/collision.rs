//! Collision detection between the moving actors and tower blocks
//!
//! Everything here is a center-to-center distance test: an actor touches a
//! block when the distance between their centers is within half a cell plus
//! the actor's own half-size.

use glam::Vec2;

use super::state::{BlockRef, Bomb, Plane, Tower};
use crate::consts::{BOMB_HALF_SIZE, PLANE_HALF_HEIGHT};

/// True if two centers are within `reach` of each other
#[inline]
pub fn within_reach(a: Vec2, b: Vec2, reach: f32) -> bool {
    a.distance(b) <= reach
}

/// First live block (in generation order) within `reach` of `pos`
pub fn first_block_within(pos: Vec2, towers: &[Tower], reach: f32) -> Option<BlockRef> {
    towers.iter().enumerate().find_map(|(tower_idx, tower)| {
        tower
            .blocks
            .iter()
            .position(|block| block.alive && within_reach(pos, block.pos, reach))
            .map(|block_idx| BlockRef {
                tower: tower_idx,
                block: block_idx,
            })
    })
}

/// Block the plane has flown into, if any
pub fn plane_collides(plane: &Plane, towers: &[Tower], cell_size: f32) -> Option<BlockRef> {
    first_block_within(plane.pos, towers, cell_size / 2.0 + PLANE_HALF_HEIGHT)
}

/// Block the bomb has struck, if any. An idle bomb never collides.
pub fn bomb_collides(bomb: &Bomb, towers: &[Tower], cell_size: f32) -> Option<BlockRef> {
    if !bomb.is_falling() {
        return None;
    }
    first_block_within(bomb.pos, towers, cell_size / 2.0 + BOMB_HALF_SIZE)
}
