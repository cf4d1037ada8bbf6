//! Tower field generation

use glam::Vec2;
use rand::Rng;

use super::state::{Block, BlockColor, Tower};
use crate::floor_y;

/// Build `num_towers` evenly spaced towers centered on the play area.
///
/// Each tower gets an independent height in `[1, max_height]` and its
/// blocks are stacked bottom-up from the floor, one `cell_size` apart.
pub fn generate_towers<R: Rng + ?Sized>(
    rng: &mut R,
    num_towers: u32,
    max_height: u32,
    cell_size: f32,
    offset: f32,
) -> Vec<Tower> {
    // Odd counts get the extra slot on the left; the offset re-centers them
    let first_col = -(num_towers.div_ceil(2) as i32);
    let last_col = (num_towers / 2) as i32;

    (first_col..last_col)
        .map(|col| {
            let height = rng.random_range(1..=max_height.max(1));
            let x = col as f32 * cell_size + offset;
            let blocks = (0..height)
                .map(|level| {
                    let y = floor_y() + level as f32 * cell_size + offset;
                    let color = BlockColor::PALETTE[rng.random_range(0..BlockColor::PALETTE.len())];
                    Block::new(Vec2::new(x, y), color)
                })
                .collect();
            Tower { blocks }
        })
        .collect()
}
