/// Entities: Hero (faces a direction, pushes walls) and Troll (pursuer).
///
/// Neither entity holds a reference to the game. Each action borrows
/// the grid for the duration of a single call.

use super::ai;
use super::grid::Grid;
use super::position::{Direction, Position};
use super::tile::Cell;

pub const TROLL_ICON: char = 'T';

/// Outcome of a hero action.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HeroMove {
    /// Stepped onto an Empty or Exit cell.
    Walked { to: Position },
    /// Pushed the wall at `to` one cell further, then stepped into its place.
    Pushed { to: Position, wall_to: Position },
    /// Nothing moved; only the facing changed.
    Blocked,
}

#[derive(Clone, Debug)]
pub struct Hero {
    pub position: Position,
    pub direction: Direction,
}

impl Hero {
    pub fn new(position: Position) -> Self {
        Hero { position, direction: Direction::Up }
    }

    pub fn icon(&self) -> char {
        self.direction.icon()
    }

    /// Face `dir`, then try to move one cell that way.
    ///
    /// Facing changes even when the move is blocked.
    /// Movement order: walk onto Empty/Exit, else push a wall, else stay.
    pub fn change_direction(&mut self, dir: Direction, grid: &mut Grid) -> HeroMove {
        self.direction = dir;
        let offset = dir.offset();
        let target = self.position + offset;

        if grid.cell_at(target).map_or(false, Cell::is_enterable) {
            self.position = target;
            HeroMove::Walked { to: target }
        } else if grid.push(target, offset) {
            self.position = target;
            HeroMove::Pushed { to: target, wall_to: target + offset }
        } else {
            HeroMove::Blocked
        }
    }
}

/// Outcome of one troll pursuit step.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TrollStep {
    Moved { from: Position, to: Position },
    /// Hero unreachable, or already on the hero's cell.
    Stayed,
}

#[derive(Clone, Debug)]
pub struct Troll {
    pub id: usize,
    pub position: Position,
}

impl Troll {
    pub fn new(id: usize, position: Position) -> Self {
        Troll { id, position }
    }

    pub fn icon(&self) -> char {
        TROLL_ICON
    }

    /// Advance one cell along the shortest path to `hero`.
    /// Trolls never push walls and ignore each other.
    pub fn pursue(&mut self, grid: &Grid, hero: Position) -> TrollStep {
        let matrix = grid.walkable_matrix();
        match ai::next_step(&matrix, self.position, hero) {
            Some(next) => {
                let from = self.position;
                self.position = next;
                TrollStep::Moved { from, to: next }
            }
            None => TrollStep::Stayed,
        }
    }

    pub fn has_caught(&self, hero: Position) -> bool {
        self.position == hero
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(rows: &[&str]) -> Grid {
        Grid::parse(&rows.join("\n")).unwrap()
    }

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    // ── Hero ──

    #[test]
    fn hero_defaults_to_facing_up() {
        let hero = Hero::new(p(1, 1));
        assert_eq!(hero.direction, Direction::Up);
        assert_eq!(hero.icon(), '^');
    }

    #[test]
    fn hero_walks_onto_empty() {
        let mut g = grid_from(&["#   X"]);
        let mut hero = Hero::new(p(1, 0));
        assert_eq!(hero.change_direction(Direction::Right, &mut g), HeroMove::Walked { to: p(2, 0) });
        assert_eq!(hero.position, p(2, 0));
        assert_eq!(hero.icon(), '>');
    }

    #[test]
    fn hero_walks_onto_exit() {
        let mut g = grid_from(&["# X"]);
        let mut hero = Hero::new(p(1, 0));
        hero.change_direction(Direction::Right, &mut g);
        assert_eq!(hero.position, g.exit());
    }

    #[test]
    fn hero_pushes_wall_into_empty() {
        let mut g = grid_from(&[
            "######",
            "#  # #",
            "#   X#",
            "######",
        ]);
        let mut hero = Hero::new(p(2, 1));
        let mv = hero.change_direction(Direction::Right, &mut g);
        assert_eq!(mv, HeroMove::Pushed { to: p(3, 1), wall_to: p(4, 1) });
        assert_eq!(hero.position, p(3, 1));
        assert_eq!(g.cell_at(p(3, 1)), Some(Cell::Empty));
        assert_eq!(g.cell_at(p(4, 1)), Some(Cell::Wall));
        assert_eq!(g.cell_at(p(2, 1)), Some(Cell::Empty));
    }

    #[test]
    fn hero_cannot_push_two_walls() {
        let mut g = grid_from(&["  ## X"]);
        let before = g.clone();
        let mut hero = Hero::new(p(1, 0));
        assert_eq!(hero.change_direction(Direction::Right, &mut g), HeroMove::Blocked);
        assert_eq!(hero.position, p(1, 0));
        assert_eq!(hero.direction, Direction::Right);
        assert_eq!(g, before);
    }

    #[test]
    fn hero_cannot_push_wall_off_the_edge() {
        let mut g = grid_from(&["X #"]);
        let mut hero = Hero::new(p(1, 0));
        assert_eq!(hero.change_direction(Direction::Right, &mut g), HeroMove::Blocked);
        assert_eq!(hero.position, p(1, 0));
        assert_eq!(g.to_string(), "X #");
    }

    #[test]
    fn hero_blocked_at_map_edge_still_turns() {
        let mut g = grid_from(&[" X"]);
        let mut hero = Hero::new(p(0, 0));
        assert_eq!(hero.change_direction(Direction::Left, &mut g), HeroMove::Blocked);
        assert_eq!(hero.position, p(0, 0));
        assert_eq!(hero.direction, Direction::Left);
        assert_eq!(hero.icon(), '<');
    }

    // ── Troll ──

    #[test]
    fn troll_steps_toward_hero() {
        let g = grid_from(&["#     X"]);
        let mut troll = Troll::new(0, p(1, 0));
        let step = troll.pursue(&g, p(4, 0));
        assert_eq!(step, TrollStep::Moved { from: p(1, 0), to: p(2, 0) });
        assert!(!troll.has_caught(p(4, 0)));
    }

    #[test]
    fn troll_adjacent_catches() {
        let g = grid_from(&["#  X"]);
        let mut troll = Troll::new(0, p(1, 0));
        troll.pursue(&g, p(2, 0));
        assert!(troll.has_caught(p(2, 0)));
    }

    #[test]
    fn troll_walled_off_stays() {
        let g = grid_from(&[
            "#####",
            "# # #",
            "#X# #",
            "#####",
        ]);
        let mut troll = Troll::new(0, p(1, 1));
        assert_eq!(troll.pursue(&g, p(3, 1)), TrollStep::Stayed);
        assert_eq!(troll.position, p(1, 1));
    }

    #[test]
    fn troll_never_paths_through_exit() {
        let g = grid_from(&[" X "]);
        let mut troll = Troll::new(0, p(0, 0));
        assert_eq!(troll.pursue(&g, p(2, 0)), TrollStep::Stayed);
    }
}
