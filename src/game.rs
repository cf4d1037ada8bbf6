//! Game instance holding all state
//!
//! Owns the simulation, the canvas it draws into and the audio output.
//! The platform layer calls [`Game::on_tick`] whenever the timer fires and
//! [`Game::request_drop`] when the drop key is pressed.

use std::time::Duration;

use crate::audio::AudioManager;
use crate::consts::GAME_DELAY_MS;
use crate::renderer::{Canvas, GameView};
use crate::sim::{self, GameEvent, GameState};

pub struct Game<C: Canvas> {
    state: GameState,
    canvas: C,
    view: GameView,
    audio: AudioManager,
}

impl<C: Canvas> Game<C> {
    pub fn new(seed: u64, mut canvas: C, audio: AudioManager) -> Self {
        let state = GameState::new(seed);
        log::info!("New game (seed {})", seed);
        let view = GameView::build(&mut canvas, &state);
        canvas.flush();
        Self {
            state,
            canvas,
            view,
            audio,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    /// Whether the input side should accept the drop key right now
    pub fn drop_enabled(&self) -> bool {
        !self.state.bomb.is_falling()
    }

    /// Drop a bomb if none is falling. Returns whether it was accepted.
    pub fn request_drop(&mut self) -> bool {
        let accepted = sim::drop_bomb(&mut self.state);
        if accepted {
            self.process_events();
            self.view.sync(&mut self.canvas, &self.state);
        }
        accepted
    }

    /// Run one tick, present it, and return the delay until the next one
    pub fn on_tick(&mut self) -> Duration {
        sim::tick(&mut self.state);
        self.process_events();
        self.view.sync(&mut self.canvas, &self.state);
        self.canvas.flush();
        Duration::from_millis(GAME_DELAY_MS)
    }

    fn process_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::PlaneCrashed { at } => {
                    // Show the wreck before the sound holds the game
                    self.view.show_crash(&mut self.canvas, at);
                    self.canvas.flush();
                }
                GameEvent::LevelCleared { score } => {
                    self.view
                        .write_score(&mut self.canvas, score, self.state.high_score);
                    self.canvas.flush();
                }
                GameEvent::Restarted { .. } => {
                    self.view = GameView::build(&mut self.canvas, &self.state);
                }
                // The state may already hold the next level, so these are
                // applied from the event rather than a sync
                GameEvent::BlockDestroyed { block, .. } => {
                    self.view.hide_block(&mut self.canvas, block);
                }
                GameEvent::BombLanded => self.view.hide_bomb(&mut self.canvas),
                GameEvent::BombDropped { .. } => {}
            }
            self.audio.on_event(&event);
        }
    }
}
