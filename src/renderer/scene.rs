//! In-memory entity arena

use generational_arena::Arena;
use glam::Vec2;

use super::{Canvas, Color, EntityId, Label, Visual};

/// Owns every visual entity and label.
///
/// `clear_all` clears the arena, so ids handed out for the previous level
/// resolve to nothing once a level is rebuilt.
#[derive(Debug)]
pub struct Scene {
    entities: Arena<Visual>,
    labels: Vec<Label>,
    frames: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Arena::new(),
            labels: Vec::new(),
            frames: 0,
        }
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn get(&self, id: EntityId) -> Option<&Visual> {
        self.entities.get(id.index)
    }

    /// Entities in slot order. Slots are handed out in creation order after a
    /// clear, so later entities draw on top.
    pub fn entities(&self) -> impl Iterator<Item = &Visual> {
        self.entities.iter().map(|(_, visual)| visual)
    }

    pub fn visible_entities(&self) -> impl Iterator<Item = &Visual> {
        self.entities().filter(|v| v.visible)
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Frames flushed so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Canvas for Scene {
    fn create_entity(&mut self, visual: Visual) -> EntityId {
        EntityId {
            index: self.entities.insert(visual),
        }
    }

    fn move_entity(&mut self, id: EntityId, pos: Vec2) {
        if let Some(visual) = self.entities.get_mut(id.index) {
            visual.pos = pos;
        }
    }

    fn recolor(&mut self, id: EntityId, color: Color) {
        if let Some(visual) = self.entities.get_mut(id.index) {
            visual.color = color;
        }
    }

    fn set_visible(&mut self, id: EntityId, visible: bool) {
        if let Some(visual) = self.entities.get_mut(id.index) {
            visual.visible = visible;
        }
    }

    fn draw_text(&mut self, label: Label) {
        self.labels.push(label);
    }

    fn clear_text(&mut self) {
        self.labels.clear();
    }

    fn flush(&mut self) {
        self.frames += 1;
    }

    fn clear_all(&mut self) {
        self.entities.clear();
        self.labels.clear();
    }
}
