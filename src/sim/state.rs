//! Game state and core simulation types
//!
//! Everything that changes during play lives in [`GameState`]. A restart
//! resets it in place; only the high score survives.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::towers::generate_towers;
use crate::consts::*;
use crate::{cell_size_for, left_edge, plane_start, right_edge, tower_offset};

/// Plane status (drives its color)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaneStatus {
    #[default]
    Flying,
    Crashed,
}

/// The player's plane
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub pos: Vec2,
    pub status: PlaneStatus,
}

impl Default for Plane {
    fn default() -> Self {
        Self {
            pos: plane_start(),
            status: PlaneStatus::Flying,
        }
    }
}

impl Plane {
    /// Move one step to the right; past the right edge, wrap to the left
    /// edge one row lower.
    pub fn advance(&mut self, cell_size: f32) {
        if self.pos.x > right_edge() {
            self.pos = Vec2::new(left_edge(), self.pos.y - cell_size);
        } else {
            self.pos.x += PLANE_DX;
        }
    }
}

/// Bomb state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BombState {
    /// Stowed on the plane, a drop may be requested
    #[default]
    Idle,
    /// In flight; further drop requests are ignored
    Falling,
}

/// The single bomb
#[derive(Debug, Clone, PartialEq)]
pub struct Bomb {
    pub pos: Vec2,
    pub state: BombState,
}

impl Default for Bomb {
    fn default() -> Self {
        Self {
            pos: plane_start(),
            state: BombState::Idle,
        }
    }
}

impl Bomb {
    #[inline]
    pub fn is_falling(&self) -> bool {
        self.state == BombState::Falling
    }

    /// Bombs are only drawn while in flight
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.is_falling()
    }

    /// Start falling from `from`. Returns false if already falling.
    pub fn release(&mut self, from: Vec2) -> bool {
        if self.is_falling() {
            return false;
        }
        self.pos = from;
        self.state = BombState::Falling;
        true
    }

    /// Fall one step
    pub fn advance(&mut self) {
        self.pos.y += BOMB_DY;
    }

    /// Back to idle (hit something or left the play area)
    pub fn land(&mut self) {
        self.state = BombState::Idle;
    }
}

/// Block colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockColor {
    Black,
    DarkGreen,
    Brown,
}

impl BlockColor {
    pub const PALETTE: [BlockColor; 3] =
        [BlockColor::Black, BlockColor::DarkGreen, BlockColor::Brown];
}

/// A destructible block within a tower
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub pos: Vec2,
    pub color: BlockColor,
    /// Retired blocks keep their slot but never collide and are not drawn
    pub alive: bool,
}

impl Block {
    pub fn new(pos: Vec2, color: BlockColor) -> Self {
        Self {
            pos,
            color,
            alive: true,
        }
    }

    pub fn retire(&mut self) {
        self.alive = false;
    }
}

/// A column of blocks, bottom to top
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tower {
    pub blocks: Vec<Block>,
}

impl Tower {
    pub fn live_blocks(&self) -> usize {
        self.blocks.iter().filter(|b| b.alive).count()
    }
}

/// Index of a block inside the tower field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockRef {
    pub tower: usize,
    pub block: usize,
}

/// Something that happened during a tick or a drop request.
/// Drained by the owner to drive rendering and audio.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    BombDropped { at: Vec2 },
    BlockDestroyed {
        at: Vec2,
        block: BlockRef,
        score: u64,
    },
    BombLanded,
    PlaneCrashed { at: Vec2 },
    LevelCleared { score: u64 },
    Restarted { new_level: bool },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub plane: Plane,
    pub bomb: Bomb,
    pub towers: Vec<Tower>,
    pub score: u64,
    /// Best score this process has seen; survives every restart
    pub high_score: u64,
    /// Score that clears the current level (grows across levels)
    pub winning_score: u64,
    pub cell_size: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events since the last drain
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh game with the given seed and build the first level
    pub fn new(seed: u64) -> Self {
        let cell_size = cell_size_for(NUM_TOWERS);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            plane: Plane::default(),
            bomb: Bomb::default(),
            towers: Vec::new(),
            score: 0,
            high_score: 0,
            winning_score: 0,
            cell_size,
            time_ticks: 0,
            events: Vec::new(),
        };
        state.restart(false);
        state.events.clear();
        state
    }

    /// Build a state around a fixed tower field (no RNG involved)
    pub fn with_towers(seed: u64, towers: Vec<Tower>) -> Self {
        let mut state = Self::new(seed);
        state.winning_score = total_value(&towers);
        state.towers = towers;
        state
    }

    /// Rebuild the level.
    ///
    /// A crash restart (`new_level == false`) zeroes the score and sets the
    /// threshold to the new towers' value. A level restart keeps the score
    /// and raises the threshold by the new towers' value.
    pub fn restart(&mut self, new_level: bool) {
        self.cell_size = cell_size_for(NUM_TOWERS);
        let offset = tower_offset(NUM_TOWERS, self.cell_size);
        self.towers = generate_towers(
            &mut self.rng,
            NUM_TOWERS,
            MAX_TOWER_HEIGHT,
            self.cell_size,
            offset,
        );

        let level_value = total_value(&self.towers);
        if new_level {
            self.winning_score += level_value;
        } else {
            self.score = 0;
            self.winning_score = level_value;
        }

        self.plane = Plane::default();
        self.bomb = Bomb::default();

        log::info!(
            "Restart (new_level={}): {} blocks, score {}/{}, high {}",
            new_level,
            self.live_block_count(),
            self.score,
            self.winning_score,
            self.high_score
        );
        self.push_event(GameEvent::Restarted { new_level });
    }

    /// Add points for one block and track the high score
    pub fn award_block(&mut self) {
        self.score += BLOCK_REWARD;
        if self.score > self.high_score {
            self.high_score = self.score;
        }
    }

    pub fn has_won_level(&self) -> bool {
        self.score >= self.winning_score
    }

    pub fn live_block_count(&self) -> usize {
        self.towers.iter().map(Tower::live_blocks).sum()
    }

    pub fn block(&self, at: BlockRef) -> Option<&Block> {
        self.towers.get(at.tower)?.blocks.get(at.block)
    }

    pub fn block_mut(&mut self, at: BlockRef) -> Option<&mut Block> {
        self.towers.get_mut(at.tower)?.blocks.get_mut(at.block)
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Points available in a tower field
pub fn total_value(towers: &[Tower]) -> u64 {
    let blocks: usize = towers.iter().map(Tower::live_blocks).sum();
    blocks as u64 * BLOCK_REWARD
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_state_winning_score_matches_blocks() {
        let state = GameState::new(42);
        let blocks: usize = state.towers.iter().map(|t| t.blocks.len()).sum();
        assert_eq!(state.winning_score, blocks as u64 * 10);
        assert_eq!(state.score, 0);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_plane_mid_field_steps_right() {
        let mut plane = Plane {
            pos: Vec2::new(0.0, 100.0),
            status: PlaneStatus::Flying,
        };
        plane.advance(37.5);
        assert_eq!(plane.pos, Vec2::new(PLANE_DX, 100.0));
    }

    #[test]
    fn test_plane_wraps_one_row_lower() {
        let mut plane = Plane {
            pos: Vec2::new(381.0, 275.0),
            status: PlaneStatus::Flying,
        };
        plane.advance(37.5);
        assert_eq!(plane.pos, Vec2::new(-375.0, 237.5));
    }

    #[test]
    fn test_bomb_release_only_when_idle() {
        let mut bomb = Bomb::default();
        assert!(!bomb.is_visible());
        assert!(bomb.release(Vec2::new(10.0, 20.0)));
        assert!(bomb.is_visible());
        assert!(!bomb.release(Vec2::new(99.0, 99.0)));
        assert_eq!(bomb.pos, Vec2::new(10.0, 20.0));
        bomb.land();
        assert_eq!(bomb.state, BombState::Idle);
    }

    #[test]
    fn test_crash_restart_zeroes_score_keeps_high() {
        let mut state = GameState::new(7);
        state.award_block();
        state.award_block();
        assert_eq!(state.high_score, 20);
        state.restart(false);
        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, 20);
        assert_eq!(state.winning_score, total_value(&state.towers));
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Restarted { new_level: false }]
        );
    }

    #[test]
    fn test_level_restart_accumulates_threshold() {
        let mut state = GameState::new(7);
        let before = state.winning_score;
        state.score = before;
        state.restart(true);
        assert_eq!(state.score, before);
        assert_eq!(state.winning_score, before + total_value(&state.towers));
    }

    #[test]
    fn test_block_lookup() {
        let state = GameState::new(3);
        let at = BlockRef { tower: 0, block: 0 };
        assert!(state.block(at).is_some());
        assert!(state.block(BlockRef { tower: 99, block: 0 }).is_none());
    }

    proptest! {
        #[test]
        fn prop_plane_advance(
            x in -380.0f32..400.0,
            y in -275.0f32..=275.0,
            cell_size in 1.0f32..100.0,
        ) {
            let mut plane = Plane { pos: Vec2::new(x, y), status: PlaneStatus::Flying };
            plane.advance(cell_size);
            if x > right_edge() {
                prop_assert_eq!(plane.pos, Vec2::new(left_edge(), y - cell_size));
            } else {
                prop_assert_eq!(plane.pos, Vec2::new(x + PLANE_DX, y));
            }
        }
    }
}
