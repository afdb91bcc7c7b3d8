/// The turn function: advances the game by one input direction.
///
/// Processing order:
///   1. Ignore input once the game is over
///   2. Hero turns and moves (may push a wall)
///   3. Exit check; trolls don't move on the winning turn
///   4. Every troll pursues, in order, against the hero's new position
///   5. Catch check after each troll; later trolls still move
///
/// The grid is mutated only in step 2. Trolls read it afterwards.

use tracing::{debug, info};

use crate::domain::entity::{HeroMove, TrollStep};
use crate::domain::position::Direction;
use super::event::GameEvent;
use super::world::{Game, Phase};

pub fn process_turn(game: &mut Game, dir: Direction) -> Vec<GameEvent> {
    if game.phase != Phase::Playing { return vec![]; }

    let mut events: Vec<GameEvent> = Vec::new();
    game.turn += 1;

    resolve_hero(game, dir, &mut events);
    if resolve_exit(game, &mut events) { return events; }
    resolve_trolls(game, &mut events);

    debug!(turn = game.turn, ?events, "turn resolved");
    events
}

// ══════════════════════════════════════════════════════════════
// Hero
// ══════════════════════════════════════════════════════════════

fn resolve_hero(game: &mut Game, dir: Direction, events: &mut Vec<GameEvent>) {
    match game.hero.change_direction(dir, &mut game.grid) {
        HeroMove::Walked { to } => events.push(GameEvent::HeroWalked { to }),
        HeroMove::Pushed { to, wall_to } => {
            events.push(GameEvent::WallPushed { from: to, to: wall_to });
            events.push(GameEvent::HeroWalked { to });
        }
        HeroMove::Blocked => events.push(GameEvent::HeroBumped { facing: dir }),
    }
}

fn resolve_exit(game: &mut Game, events: &mut Vec<GameEvent>) -> bool {
    if game.hero.position != game.grid.exit() { return false; }
    game.phase = Phase::Won;
    events.push(GameEvent::ExitReached);
    info!(turn = game.turn, "hero reached the exit");
    true
}

// ══════════════════════════════════════════════════════════════
// Trolls
// ══════════════════════════════════════════════════════════════

fn resolve_trolls(game: &mut Game, events: &mut Vec<GameEvent>) {
    let hero = game.hero.position;

    for troll in game.trolls.iter_mut() {
        match troll.pursue(&game.grid, hero) {
            TrollStep::Moved { from, to } => {
                events.push(GameEvent::TrollMoved { id: troll.id, from, to });
            }
            TrollStep::Stayed => events.push(GameEvent::TrollStuck { id: troll.id }),
        }

        if troll.has_caught(hero) {
            events.push(GameEvent::HeroCaught { id: troll.id });
            if game.phase == Phase::Playing {
                game.phase = Phase::Lost;
                info!(turn = game.turn, troll = troll.id, "hero caught");
            }
        }
    }
}
