//! Terminal window and key input
//!
//! The "window" is the alternate screen in raw mode. Every flush rasterizes
//! the scene and redraws only the cells that changed since the last frame.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::{Color as TermColor, Print, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle};
use crossterm::{cursor, execute, queue};
use glam::Vec2;

use crate::renderer::raster::{Grid, rasterize};
use crate::renderer::{Canvas, Color, EntityId, Label, Scene, Visual};

/// What a key press asks the game to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    DropBomb,
    Quit,
}

/// Wait up to `timeout` for a key press
pub fn poll_key(timeout: Duration) -> io::Result<Option<KeyAction>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    let Event::Key(key) = event::read()? else {
        return Ok(None);
    };
    if key.kind != KeyEventKind::Press {
        return Ok(None);
    }
    let action = match key.code {
        KeyCode::Char(' ') => Some(KeyAction::DropBomb),
        KeyCode::Esc | KeyCode::Char('q') => Some(KeyAction::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyAction::Quit)
        }
        _ => None,
    };
    Ok(action)
}

fn term_color([r, g, b]: Color) -> TermColor {
    TermColor::Rgb { r, g, b }
}

/// A [`Canvas`] that presents its scene in the terminal
pub struct TerminalCanvas {
    scene: Scene,
    out: Stdout,
    world: Vec2,
    last_frame: Option<Grid>,
    /// First I/O error hit while presenting, surfaced by `take_error`
    error: Option<io::Error>,
}

impl TerminalCanvas {
    /// Take over the terminal. It is restored when the canvas is dropped.
    pub fn open(title: &str, width: f32, height: f32) -> io::Result<Self> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, cursor::Hide, SetTitle(title))?;
        log::info!("Terminal window opened ({}x{} world)", width, height);
        Ok(Self {
            scene: Scene::new(),
            out,
            world: Vec2::new(width, height),
            last_frame: None,
            error: None,
        })
    }

    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    fn present(&mut self) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        let grid = rasterize(&self.scene, self.world, cols, rows);

        let previous = self
            .last_frame
            .as_ref()
            .filter(|g| g.cols == cols && g.rows == rows);

        for row in 0..rows {
            for col in 0..cols {
                let Some(cell) = grid.get(col, row) else {
                    continue;
                };
                if previous.and_then(|g| g.get(col, row)) == Some(cell) {
                    continue;
                }
                queue!(
                    self.out,
                    cursor::MoveTo(col, row),
                    SetForegroundColor(term_color(cell.fg)),
                    SetBackgroundColor(term_color(cell.bg)),
                    Print(cell.glyph)
                )?;
            }
        }
        self.out.flush()?;
        self.last_frame = Some(grid);
        Ok(())
    }
}

impl Canvas for TerminalCanvas {
    fn create_entity(&mut self, visual: Visual) -> EntityId {
        self.scene.create_entity(visual)
    }

    fn move_entity(&mut self, id: EntityId, pos: Vec2) {
        self.scene.move_entity(id, pos);
    }

    fn recolor(&mut self, id: EntityId, color: Color) {
        self.scene.recolor(id, color);
    }

    fn set_visible(&mut self, id: EntityId, visible: bool) {
        self.scene.set_visible(id, visible);
    }

    fn draw_text(&mut self, label: Label) {
        self.scene.draw_text(label);
    }

    fn clear_text(&mut self) {
        self.scene.clear_text();
    }

    fn flush(&mut self) {
        self.scene.flush();
        if let Err(e) = self.present() {
            log::error!("Terminal draw failed: {}", e);
            self.error.get_or_insert(e);
        }
    }

    fn clear_all(&mut self) {
        self.scene.clear_all();
    }
}

impl Drop for TerminalCanvas {
    fn drop(&mut self) {
        let _ = execute!(
            self.out,
            crossterm::style::ResetColor,
            cursor::Show,
            LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}
