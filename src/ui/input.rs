/// Keyboard input → game commands.
///
/// The game is turn-driven: `next_command()` blocks until a key that maps
/// to a command arrives. Unrecognized keys are dropped here, so the core
/// only ever sees one of the four directions.
///
/// Only Press/Repeat events count; Release events (reported by terminals
/// with keyboard enhancement) are ignored so one keystroke is one turn.

use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::position::Direction;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Move(Direction),
    Restart,
    Quit,
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

/// Block until the next recognized key press.
pub fn next_command() -> io::Result<Command> {
    loop {
        if let Event::Key(key) = event::read()? {
            if let Some(cmd) = command_for(key) {
                return Ok(cmd);
            }
        }
    }
}

/// Map a single key event. `None` for releases and unbound keys.
pub fn command_for(key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
    {
        return Some(Command::Quit);
    }

    let code = key.code;
    if KEYS_UP.contains(&code) {
        Some(Command::Move(Direction::Up))
    } else if KEYS_DOWN.contains(&code) {
        Some(Command::Move(Direction::Down))
    } else if KEYS_LEFT.contains(&code) {
        Some(Command::Move(Direction::Left))
    } else if KEYS_RIGHT.contains(&code) {
        Some(Command::Move(Direction::Right))
    } else if KEYS_RESTART.contains(&code) {
        Some(Command::Restart)
    } else if KEYS_QUIT.contains(&code) {
        Some(Command::Quit)
    } else {
        None
    }
}
