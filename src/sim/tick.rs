//! Fixed timestep simulation tick
//!
//! Core game loop step: plane, crash check, level check, bomb.

use super::collision::{bomb_collides, plane_collides};
use super::state::{GameEvent, GameState, PlaneStatus};
use crate::floor_y;

/// Request a bomb drop from the plane's current position.
///
/// Returns false (and changes nothing) while a bomb is already falling.
pub fn drop_bomb(state: &mut GameState) -> bool {
    let from = state.plane.pos;
    if !state.bomb.release(from) {
        log::debug!("Drop ignored, bomb already falling");
        return false;
    }
    state.push_event(GameEvent::BombDropped { at: from });
    true
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState) {
    state.time_ticks += 1;

    state.plane.advance(state.cell_size);

    if plane_collides(&state.plane, &state.towers, state.cell_size).is_some() {
        crash(state);
        return;
    }

    if check_level_cleared(state) {
        return;
    }

    if state.bomb.is_falling() {
        advance_bomb(state);
        // A win is handled on the same tick the last block falls
        check_level_cleared(state);
    }
}

/// Move the bomb one step, then resolve a hit or a miss
fn advance_bomb(state: &mut GameState) {
    state.bomb.advance();

    if let Some(hit) = bomb_collides(&state.bomb, &state.towers, state.cell_size) {
        let Some(block) = state.block_mut(hit) else {
            return;
        };
        block.retire();
        let at = block.pos;
        state.award_block();
        state.bomb.land();
        let score = state.score;
        state.push_event(GameEvent::BlockDestroyed {
            at,
            block: hit,
            score,
        });
        state.push_event(GameEvent::BombLanded);
    } else if state.bomb.pos.y < floor_y() {
        state.bomb.land();
        state.push_event(GameEvent::BombLanded);
    }
}

/// Plane flew into a tower: mark it, announce it, start over
fn crash(state: &mut GameState) {
    let at = state.plane.pos;
    state.plane.status = PlaneStatus::Crashed;
    state.bomb.land();
    log::info!(
        "Plane crashed at ({:.1}, {:.1}) with score {} (seed {}, tick {})",
        at.x,
        at.y,
        state.score,
        state.seed,
        state.time_ticks
    );
    state.push_event(GameEvent::PlaneCrashed { at });
    state.restart(false);
}

/// If the threshold is reached, clear the level and build the next one
fn check_level_cleared(state: &mut GameState) -> bool {
    if !state.has_won_level() {
        return false;
    }
    let score = state.score;
    log::info!(
        "Level cleared with score {} (seed {}, tick {})",
        score,
        state.seed,
        state.time_ticks
    );
    state.push_event(GameEvent::LevelCleared { score });
    state.restart(true);
    true
}
