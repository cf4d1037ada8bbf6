//! Mirrors the game state into canvas entities

use glam::Vec2;

use super::{Align, Canvas, EntityId, Font, Label, Shape, Visual, colors};
use crate::consts::{BOMB_HALF_SIZE, PLANE_HALF_HEIGHT, SCORE_LABEL_Y};
use crate::sim::{BlockRef, GameState, PlaneStatus};

/// Entity handles for one level.
///
/// Built right after a restart; the canvas is cleared first so the entity
/// count never grows across levels.
#[derive(Debug)]
pub struct GameView {
    plane: EntityId,
    bomb: EntityId,
    /// Same shape as `GameState::towers`
    blocks: Vec<Vec<EntityId>>,
}

impl GameView {
    /// Clear the canvas and create every entity the level needs
    pub fn build<C: Canvas>(canvas: &mut C, state: &GameState) -> Self {
        canvas.clear_all();

        let cell = state.cell_size;
        let blocks: Vec<Vec<EntityId>> = state
            .towers
            .iter()
            .map(|tower| {
                tower
                    .blocks
                    .iter()
                    .map(|block| {
                        canvas.create_entity(Visual {
                            shape: Shape::Square,
                            color: colors::block(block.color),
                            size: Vec2::splat(cell),
                            pos: block.pos,
                            visible: block.alive,
                        })
                    })
                    .collect()
            })
            .collect();

        let plane = canvas.create_entity(Visual {
            shape: Shape::Triangle,
            color: colors::PLANE,
            size: Vec2::new(PLANE_HALF_HEIGHT * 4.0, PLANE_HALF_HEIGHT * 2.0),
            pos: state.plane.pos,
            visible: true,
        });
        let bomb = canvas.create_entity(Visual {
            shape: Shape::Square,
            color: colors::BOMB,
            size: Vec2::splat(BOMB_HALF_SIZE * 2.0),
            pos: state.bomb.pos,
            visible: state.bomb.is_visible(),
        });

        let view = Self {
            plane,
            bomb,
            blocks,
        };
        view.write_score(canvas, state.score, state.high_score);
        view
    }

    /// Push the current positions and visibility to the canvas
    pub fn sync<C: Canvas>(&self, canvas: &mut C, state: &GameState) {
        canvas.move_entity(self.plane, state.plane.pos);
        let plane_color = match state.plane.status {
            PlaneStatus::Flying => colors::PLANE,
            PlaneStatus::Crashed => colors::PLANE_CRASHED,
        };
        canvas.recolor(self.plane, plane_color);

        canvas.move_entity(self.bomb, state.bomb.pos);
        canvas.set_visible(self.bomb, state.bomb.is_visible());

        for (ids, tower) in self.blocks.iter().zip(&state.towers) {
            for (&id, block) in ids.iter().zip(&tower.blocks) {
                canvas.set_visible(id, block.alive);
            }
        }

        self.write_score(canvas, state.score, state.high_score);
    }

    /// Freeze-frame of a crash: red plane at the impact point, no bomb
    pub fn show_crash<C: Canvas>(&self, canvas: &mut C, at: Vec2) {
        canvas.move_entity(self.plane, at);
        canvas.recolor(self.plane, colors::PLANE_CRASHED);
        canvas.set_visible(self.bomb, false);
    }

    /// Take a destroyed block off the screen ahead of the next sync
    pub fn hide_block<C: Canvas>(&self, canvas: &mut C, at: BlockRef) {
        if let Some(&id) = self.blocks.get(at.tower).and_then(|ids| ids.get(at.block)) {
            canvas.set_visible(id, false);
        }
    }

    pub fn hide_bomb<C: Canvas>(&self, canvas: &mut C) {
        canvas.set_visible(self.bomb, false);
    }

    pub fn write_score<C: Canvas>(&self, canvas: &mut C, score: u64, high_score: u64) {
        canvas.clear_text();
        canvas.draw_text(score_label(score, high_score));
    }

    pub fn entity_count(&self) -> usize {
        2 + self.blocks.iter().map(Vec::len).sum::<usize>()
    }
}

/// The score line at the top of the window
pub fn score_label(score: u64, high_score: u64) -> Label {
    Label {
        text: format!("Score:{:2} High Score:{:2}", score, high_score),
        pos: Vec2::new(0.0, SCORE_LABEL_Y),
        font: Font::default(),
        align: Align::Center,
        color: colors::SCORE_TEXT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Scene;
    use crate::sim::drop_bomb;

    #[test]
    fn test_build_creates_one_entity_per_block_plus_actors() {
        let state = GameState::new(11);
        let mut scene = Scene::new();
        let view = GameView::build(&mut scene, &state);
        assert_eq!(scene.entity_count(), state.live_block_count() + 2);
        assert_eq!(view.entity_count(), scene.entity_count());
        assert_eq!(scene.labels().len(), 1);
    }

    #[test]
    fn test_entity_count_bounded_across_restarts() {
        let mut state = GameState::new(11);
        let mut scene = Scene::new();
        GameView::build(&mut scene, &state);

        for i in 0..50 {
            state.restart(i % 2 == 0);
            let view = GameView::build(&mut scene, &state);
            let blocks: usize = state.towers.iter().map(|t| t.blocks.len()).sum();
            assert_eq!(scene.entity_count(), blocks + 2);
            assert_eq!(view.entity_count(), scene.entity_count());
            assert_eq!(scene.labels().len(), 1);
        }
    }

    #[test]
    fn test_sync_shows_falling_bomb_and_hides_retired_blocks() {
        let mut state = GameState::new(5);
        let mut scene = Scene::new();
        let view = GameView::build(&mut scene, &state);
        assert!(!scene.get(view.bomb).unwrap().visible);

        drop_bomb(&mut state);
        state.towers[0].blocks[0].retire();
        view.sync(&mut scene, &state);

        assert!(scene.get(view.bomb).unwrap().visible);
        assert!(!scene.get(view.blocks[0][0]).unwrap().visible);
    }

    #[test]
    fn test_hide_block_by_ref() {
        let state = GameState::new(5);
        let mut scene = Scene::new();
        let view = GameView::build(&mut scene, &state);
        let visible = scene.visible_entities().count();

        view.hide_block(&mut scene, BlockRef { tower: 0, block: 0 });
        // Out of range refs are ignored
        view.hide_block(&mut scene, BlockRef { tower: 999, block: 0 });

        assert!(!scene.get(view.blocks[0][0]).unwrap().visible);
        assert_eq!(scene.visible_entities().count(), visible - 1);
    }

    #[test]
    fn test_show_crash_turns_plane_red() {
        let state = GameState::new(5);
        let mut scene = Scene::new();
        let view = GameView::build(&mut scene, &state);
        view.show_crash(&mut scene, Vec2::new(10.0, 20.0));

        let plane = scene.get(view.plane).unwrap();
        assert_eq!(plane.color, colors::PLANE_CRASHED);
        assert_eq!(plane.pos, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_score_label_format() {
        let label = score_label(30, 120);
        assert_eq!(label.text, "Score:30 High Score:120");
        assert_eq!(score_label(0, 0).text, "Score: 0 High Score: 0");
    }
}
