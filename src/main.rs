//! Fly Bomber entry point
//!
//! Opens the terminal window and runs the fixed-delay game loop.
//! Space drops a bomb, Esc or `q` quits.

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

use fly_bomber::audio::AudioManager;
use fly_bomber::consts::{HEIGHT, WIDTH, WINDOW_TITLE};
use fly_bomber::platform::terminal::{KeyAction, poll_key};
use fly_bomber::platform::{TerminalCanvas, Ticker};
use fly_bomber::{Game, Settings};

fn run(settings: &Settings) -> io::Result<()> {
    let canvas = TerminalCanvas::open(WINDOW_TITLE, WIDTH, HEIGHT)?;
    let audio = AudioManager::new(settings);
    let mut game = Game::new(settings.run_seed(), canvas, audio);
    let mut ticker = Ticker::new(Instant::now());

    loop {
        match poll_key(ticker.remaining(Instant::now()))? {
            Some(KeyAction::Quit) => break,
            Some(KeyAction::DropBomb) if game.drop_enabled() => {
                game.request_drop();
            }
            _ => {}
        }

        let now = Instant::now();
        if ticker.is_due(now) {
            let delay = game.on_tick();
            ticker.schedule_once(now, delay);
        }

        if let Some(e) = game.canvas_mut().take_error() {
            return Err(e);
        }
    }

    log::info!("Window closed, high score {}", game.state().high_score);
    Ok(())
}

/// Log file, overridable with `FLY_BOMBER_LOG`
fn log_path() -> PathBuf {
    std::env::var_os("FLY_BOMBER_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("fly-bomber.log"))
}

/// The terminal is the game screen, so log records go to a file
fn init_logging() {
    let mut builder = env_logger::Builder::from_default_env();
    let path = log_path();
    match File::create(&path) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => {
            eprintln!("fly-bomber: cannot open {} ({}), logging disabled", path.display(), e);
            builder = env_logger::Builder::new();
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    if builder.try_init().is_err() {
        eprintln!("fly-bomber: logger already initialized");
    }
}

fn main() {
    init_logging();
    log::info!("Fly Bomber starting...");

    let settings = Settings::load();
    if let Err(e) = run(&settings) {
        log::error!("Fly Bomber stopped: {}", e);
        eprintln!("fly-bomber: {}", e);
        std::process::exit(1);
    }
}
