/// Game: the root of a running maze.
///
/// Owns the grid, the hero and the trolls. Entities never keep a handle
/// back to the game; `step::process_turn` lends each one the grid for a
/// single call.
///
/// ## Phases
///   `Playing` → `Won`  (hero on the exit)
///   `Playing` → `Lost` (a troll on the hero's cell after its step)
/// Both end states are terminal.

use rand::Rng;
use tracing::info;

use crate::domain::entity::{Hero, Troll};
use crate::domain::grid::{Grid, MazeError};
use crate::domain::position::Position;
use crate::domain::tile::Cell;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    Won,
    Lost,
}

impl Phase {
    pub fn is_over(self) -> bool {
        self != Phase::Playing
    }

    /// Banner text for the end screen.
    pub fn outcome_label(self) -> Option<&'static str> {
        match self {
            Phase::Playing => None,
            Phase::Won => Some("YOU WIN"),
            Phase::Lost => Some("YOU LOSE"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Game {
    pub grid: Grid,
    pub hero: Hero,
    pub trolls: Vec<Troll>,
    pub phase: Phase,
    pub turn: u64,
}

/// Where an entity is and how it is drawn.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct EntityView {
    pub position: Position,
    pub icon: char,
}

/// Everything the renderer needs after a turn.
#[derive(Clone, Debug)]
pub struct GameView<'a> {
    pub cells: &'a [Vec<Cell>],
    pub hero: EntityView,
    pub trolls: Vec<EntityView>,
    pub phase: Phase,
    pub outcome: Option<&'static str>,
    pub turn: u64,
}

// ── Construction ──

impl Game {
    /// Place the hero, then each troll, on distinct random free cells.
    pub fn new<R: Rng + ?Sized>(grid: Grid, troll_count: usize, rng: &mut R) -> Result<Game, MazeError> {
        let needed = troll_count + 1;
        let available = grid.free_cells(&[]);
        if needed > available {
            return Err(MazeError::NotEnoughRoom { needed, available });
        }

        let mut occupied: Vec<Position> = Vec::with_capacity(needed);
        let hero_pos = grid
            .random_walkable_cell(rng, &occupied)
            .ok_or(MazeError::NotEnoughRoom { needed, available })?;
        occupied.push(hero_pos);

        let mut trolls = Vec::with_capacity(troll_count);
        for id in 0..troll_count {
            let pos = grid
                .random_walkable_cell(rng, &occupied)
                .ok_or(MazeError::NotEnoughRoom { needed, available })?;
            occupied.push(pos);
            trolls.push(Troll::new(id, pos));
        }

        info!(
            width = grid.width(),
            height = grid.height(),
            hero = ?hero_pos,
            trolls = troll_count,
            "new game"
        );

        Ok(Game {
            grid,
            hero: Hero::new(hero_pos),
            trolls,
            phase: Phase::Playing,
            turn: 0,
        })
    }

    /// Explicit placement, for scripted setups and tests.
    #[cfg(test)]
    pub fn with_positions(grid: Grid, hero: Position, trolls: &[Position]) -> Game {
        Game {
            grid,
            hero: Hero::new(hero),
            trolls: trolls.iter().enumerate().map(|(id, &p)| Troll::new(id, p)).collect(),
            phase: Phase::Playing,
            turn: 0,
        }
    }
}

// ── Queries ──

impl Game {
    /// Cells currently taken by the hero or any troll.
    #[cfg(test)]
    pub fn occupied(&self) -> Vec<Position> {
        std::iter::once(self.hero.position)
            .chain(self.trolls.iter().map(|t| t.position))
            .collect()
    }

    pub fn view(&self) -> GameView<'_> {
        GameView {
            cells: self.grid.render_rows(),
            hero: EntityView { position: self.hero.position, icon: self.hero.icon() },
            trolls: self
                .trolls
                .iter()
                .map(|t| EntityView { position: t.position, icon: t.icon() })
                .collect(),
            phase: self.phase,
            outcome: self.phase.outcome_label(),
            turn: self.turn,
        }
    }
}
