//! Character-grid rasterizer
//!
//! Maps the world (origin at the window center, y up) onto a grid of
//! terminal cells. Later entities overwrite earlier ones, labels go last.

use glam::Vec2;

use super::{Align, Color, Scene, Shape, colors};

/// One terminal cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            glyph: ' ',
            fg: colors::BACKGROUND,
            bg: colors::BACKGROUND,
        }
    }
}

/// A rasterized frame, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub cols: u16,
    pub rows: u16,
    /// World extent the grid covers
    world: Vec2,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(world: Vec2, cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            world,
            cells: vec![Cell::default(); cols as usize * rows as usize],
        }
    }

    pub fn get(&self, col: u16, row: u16) -> Option<&Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get(row as usize * self.cols as usize + col as usize)
    }

    fn set(&mut self, col: i32, row: i32, cell: Cell) {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return;
        }
        let idx = row as usize * self.cols as usize + col as usize;
        self.cells[idx] = cell;
    }

    /// Cells of one row
    pub fn row(&self, row: u16) -> &[Cell] {
        let start = row as usize * self.cols as usize;
        &self.cells[start..start + self.cols as usize]
    }

    /// World position to (col, row)
    fn to_cell(&self, pos: Vec2) -> (i32, i32) {
        let col = ((pos.x + self.world.x / 2.0) / self.world.x * self.cols as f32).floor() as i32;
        let row = ((self.world.y / 2.0 - pos.y) / self.world.y * self.rows as f32).floor() as i32;
        (col, row)
    }
}

/// Draw a scene covering `world` (width, height) into a fresh grid
pub fn rasterize(scene: &Scene, world: Vec2, cols: u16, rows: u16) -> Grid {
    let mut grid = Grid::new(world, cols, rows);

    for visual in scene.visible_entities() {
        let half = visual.size / 2.0;
        let (c0, r0) = grid.to_cell(visual.pos + Vec2::new(-half.x, half.y));
        let (c1, r1) = grid.to_cell(visual.pos + Vec2::new(half.x, -half.y));
        // Anything smaller than a cell still covers the cell of its center
        let (cc, rc) = grid.to_cell(visual.pos);
        let (c0, c1) = (c0.min(cc), (c1 - 1).max(cc));
        let (r0, r1) = (r0.min(rc), (r1 - 1).max(rc));

        let glyph = match visual.shape {
            Shape::Square => '█',
            Shape::Triangle => '▶',
        };
        for row in r0..=r1 {
            for col in c0..=c1 {
                grid.set(
                    col,
                    row,
                    Cell {
                        glyph,
                        fg: visual.color,
                        bg: colors::BACKGROUND,
                    },
                );
            }
        }
    }

    for label in scene.labels() {
        let (col, row) = grid.to_cell(label.pos);
        let len = label.text.chars().count() as i32;
        let start = match label.align {
            Align::Left => col,
            Align::Center => col - len / 2,
            Align::Right => col - len,
        };
        for (i, glyph) in label.text.chars().enumerate() {
            grid.set(
                start + i as i32,
                row,
                Cell {
                    glyph,
                    fg: label.color,
                    bg: colors::BACKGROUND,
                },
            );
        }
    }

    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{HEIGHT, WIDTH};
    use crate::renderer::view::score_label;
    use crate::renderer::{Canvas, Visual};

    fn window() -> Vec2 {
        Vec2::new(WIDTH, HEIGHT)
    }

    fn visual(shape: Shape, size: f32, pos: Vec2) -> Visual {
        Visual {
            shape,
            color: colors::BOMB,
            size: Vec2::splat(size),
            pos,
            visible: true,
        }
    }

    #[test]
    fn test_empty_scene_is_background() {
        let grid = rasterize(&Scene::new(), window(), 8, 6);
        assert!(grid.row(0).iter().all(|c| *c == Cell::default()));
        assert!(grid.get(8, 0).is_none());
    }

    #[test]
    fn test_small_entity_covers_its_center_cell() {
        let mut scene = Scene::new();
        // 800x600 world onto 80x30: cells are 10x20 world units
        scene.create_entity(visual(Shape::Square, 2.0, Vec2::new(5.0, -5.0)));
        let grid = rasterize(&scene, window(), 80, 30);
        assert_eq!(grid.get(40, 15).unwrap().glyph, '█');
        assert_eq!(grid.get(41, 15).unwrap().glyph, ' ');
    }

    #[test]
    fn test_block_spans_several_cells() {
        let mut scene = Scene::new();
        scene.create_entity(visual(Shape::Square, 50.0, Vec2::new(25.0, -25.0)));
        let grid = rasterize(&scene, window(), 80, 30);
        // x 0..50 -> cols 40..45, y 0..-50 -> rows 15..17
        for col in 40..45 {
            for row in 15..17 {
                assert_eq!(grid.get(col, row).unwrap().glyph, '█', "col {col} row {row}");
            }
        }
        assert_eq!(grid.get(45, 15).unwrap().glyph, ' ');
        assert_eq!(grid.get(40, 17).unwrap().glyph, ' ');
    }

    #[test]
    fn test_hidden_entities_are_skipped() {
        let mut scene = Scene::new();
        let id = scene.create_entity(visual(Shape::Triangle, 20.0, Vec2::ZERO));
        scene.set_visible(id, false);
        let grid = rasterize(&scene, window(), 80, 30);
        assert!((0..30).all(|r| grid.row(r).iter().all(|c| c.glyph == ' ')));
    }

    #[test]
    fn test_label_is_centered() {
        let mut scene = Scene::new();
        scene.draw_text(score_label(0, 0));
        let grid = rasterize(&scene, window(), 80, 30);
        let row: String = grid.row(2).iter().map(|c| c.glyph).collect();
        assert_eq!(row.trim(), "Score: 0 High Score: 0");
        assert_eq!(row.find('S'), Some(40 - 11));
    }
}
