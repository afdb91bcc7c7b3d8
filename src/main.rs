/// Entry point and turn loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Context;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, Level};

use config::{GameConfig, LogConfig};
use sim::event::GameEvent;
use sim::level::{load_maze, MazeSource};
use sim::step;
use sim::world::Game;
use ui::input::{self, Command};
use ui::renderer::Renderer;

fn main() {
    let config = GameConfig::load();

    if let Err(e) = init_logging(&config.log) {
        eprintln!("Warning: logging disabled: {e:#}");
    }

    let source = MazeSource::from_config(&config);
    let mut rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    // Build the first game before touching the terminal so setup errors print cleanly.
    let mut game = match new_game(&source, &config, &mut rng) {
        Ok(game) => game,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    };

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut game, &mut renderer, &source, &config, &mut rng);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e:#}");
    }

    println!();
    if game.phase.is_over() {
        let label = game.phase.outcome_label().unwrap_or_default();
        println!("{label} after {} turns.", game.turn);
    } else {
        println!("Gave up after {} turns.", game.turn);
    }
}

fn game_loop(
    game: &mut Game,
    renderer: &mut Renderer,
    source: &MazeSource,
    config: &GameConfig,
    rng: &mut ChaCha8Rng,
) -> anyhow::Result<()> {
    let maze_name = source.name();

    loop {
        renderer.render(&game.view(), &maze_name)?;

        match input::next_command()? {
            Command::Quit => break,
            Command::Restart => {
                *game = new_game(source, config, rng)?;
                renderer.invalidate();
                info!("restarted");
            }
            Command::Move(dir) => {
                let events = step::process_turn(game, dir);
                log_events(game.turn, &events);
            }
        }
    }

    info!(turn = game.turn, phase = ?game.phase, "quit");
    Ok(())
}

fn log_events(turn: u64, events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::WallPushed { from, to } => debug!(turn, ?from, ?to, "wall pushed"),
            GameEvent::HeroBumped { facing } => debug!(turn, ?facing, "hero bumped"),
            GameEvent::HeroCaught { id } => info!(turn, troll = id, "caught"),
            GameEvent::ExitReached => info!(turn, "escaped"),
            GameEvent::HeroWalked { .. } | GameEvent::TrollMoved { .. } | GameEvent::TrollStuck { .. } => {}
        }
    }
}

/// Load a fresh copy of the maze and place everyone on it.
fn new_game(source: &MazeSource, config: &GameConfig, rng: &mut ChaCha8Rng) -> anyhow::Result<Game> {
    let grid = load_maze(source).with_context(|| format!("could not load maze '{}'", source.name()))?;
    let game = Game::new(grid, config.trolls, rng)
        .with_context(|| format!("could not place {} trolls", config.trolls))?;
    Ok(game)
}

/// Route tracing output to the configured file. The terminal belongs to the
/// renderer, so without a file nothing is logged.
fn init_logging(log: &LogConfig) -> anyhow::Result<()> {
    let Some(path) = &log.file else { return Ok(()) };

    let level = log.level.parse::<Level>().unwrap_or(Level::INFO);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("could not open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
