/// The maze: a fixed-size cell matrix with a single exit.
///
/// ## Coordinates
///   `cells[y][x]`, with `Position { x, y }` addressing column/row.
///   Dimensions are fixed at parse time and never change.
///
/// ## Fail-closed queries
///   Any query outside the grid answers "no match" instead of erroring,
///   so an edge move or a push off the map is simply blocked.
///
/// ## Mutation
///   The only runtime mutation is `push()`: a wall slides one cell
///   into Empty space. The exit is never created or destroyed.

use std::fmt;
use std::path::PathBuf;

use rand::Rng;
use thiserror::Error;
use tracing::warn;

use super::position::Position;
use super::tile::Cell;

/// Construction-time maze failures. Gameplay itself never errors.
#[derive(Debug, Error)]
pub enum MazeError {
    #[error("maze has no rows")]
    Empty,
    #[error("maze has no exit ('X')")]
    NoExit,
    #[error("maze row {row} is {found} cells wide, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
    #[error("unknown maze character {ch:?} at row {row}, column {col}")]
    UnknownCell { row: usize, col: usize, ch: char },
    #[error("maze needs {needed} free cells for hero and trolls, only {available} exist")]
    NotEnoughRoom { needed: usize, available: usize },
    #[error("could not read maze file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Vec<Cell>>,
    width: usize,
    height: usize,
    exit: Position,
}

// ── Construction ──

impl Grid {
    /// Parse a maze text block.
    ///
    /// Blank (whitespace-only) lines are dropped; every remaining row must
    /// have the same width. The first `'X'` in row-major order is the exit.
    pub fn parse(text: &str) -> Result<Grid, MazeError> {
        let rows: Vec<&str> = text.lines().filter(|r| !r.trim().is_empty()).collect();
        if rows.is_empty() {
            return Err(MazeError::Empty);
        }

        let width = rows[0].chars().count();
        let mut cells = Vec::with_capacity(rows.len());
        let mut exits: Vec<Position> = Vec::new();

        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(MazeError::RaggedRow { row: y, expected: width, found });
            }
            let mut line = Vec::with_capacity(width);
            for (x, ch) in row.chars().enumerate() {
                let cell = Cell::from_char(ch).ok_or(MazeError::UnknownCell { row: y, col: x, ch })?;
                if cell == Cell::Exit {
                    exits.push(Position::new(x as i32, y as i32));
                }
                line.push(cell);
            }
            cells.push(line);
        }

        let exit = *exits.first().ok_or(MazeError::NoExit)?;
        if exits.len() > 1 {
            warn!(count = exits.len(), ?exit, "maze has several exits; using the first");
        }

        Ok(Grid { height: cells.len(), cells, width, exit })
    }
}

// ── Queries ──

impl Grid {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn exit(&self) -> Position {
        self.exit
    }

    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Cell at `pos`, or `None` off the grid.
    #[inline]
    pub fn cell_at(&self, pos: Position) -> Option<Cell> {
        if self.in_bounds(pos) {
            Some(self.cells[pos.y as usize][pos.x as usize])
        } else {
            None
        }
    }

    /// Does the cell at `pos` match any of `types`? False off the grid.
    pub fn cell_is(&self, pos: Position, types: &[Cell]) -> bool {
        self.cell_at(pos).map_or(false, |c| types.contains(&c))
    }

    /// Empty terrain and nobody standing there.
    pub fn is_empty_for_occupancy(&self, pos: Position, occupied: &[Position]) -> bool {
        self.cell_is(pos, &[Cell::Empty]) && !occupied.contains(&pos)
    }

    /// Number of cells that pass `is_empty_for_occupancy`.
    pub fn free_cells(&self, occupied: &[Position]) -> usize {
        self.positions()
            .filter(|&p| self.is_empty_for_occupancy(p, occupied))
            .count()
    }

    /// Rejection-sample a free cell uniformly over the whole grid.
    /// `None` only when no free cell exists at all.
    pub fn random_walkable_cell<R: Rng + ?Sized>(&self, rng: &mut R, occupied: &[Position]) -> Option<Position> {
        if self.free_cells(occupied) == 0 {
            return None;
        }
        loop {
            let pos = Position::new(
                rng.gen_range(0..self.width as i32),
                rng.gen_range(0..self.height as i32),
            );
            if self.is_empty_for_occupancy(pos, occupied) {
                return Some(pos);
            }
        }
    }

    /// Pathfinding matrix: `0` = walkable (Empty), `1` = blocked.
    /// Built fresh per call because pushes change the maze.
    pub fn walkable_matrix(&self) -> Vec<Vec<u8>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|c| if c.is_walkable() { 0 } else { 1 }).collect())
            .collect()
    }

    /// Read-only view of the current cells, row by row.
    pub fn render_rows(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x as i32, y as i32)))
    }
}

// ── Mutation ──

impl Grid {
    /// Slide the wall at `target` one step along `offset`.
    ///
    /// Succeeds only when `target` is a Wall and the cell beyond it is Empty.
    /// No chaining: a wall backed by another wall, the exit, or the map edge
    /// stays put and nothing changes.
    pub fn push(&mut self, target: Position, offset: Position) -> bool {
        if !self.cell_is(target, &[Cell::Wall]) {
            return false;
        }
        let beyond = target + offset;
        if !self.cell_is(beyond, &[Cell::Empty]) {
            return false;
        }
        self.set(target, Cell::Empty);
        self.set(beyond, Cell::Wall);
        true
    }

    #[inline]
    fn set(&mut self, pos: Position, cell: Cell) {
        if self.in_bounds(pos) {
            self.cells[pos.y as usize][pos.x as usize] = cell;
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.cells.iter().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.glyph())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn grid_from(rows: &[&str]) -> Grid {
        Grid::parse(&rows.join("\n")).unwrap()
    }

    // ── Parsing ──

    #[test]
    fn parse_drops_blank_lines() {
        let g = Grid::parse("\n#####\n#  X#\n\n#####\n   \n").unwrap();
        assert_eq!(g.width(), 5);
        assert_eq!(g.height(), 3);
        assert_eq!(g.exit(), Position::new(3, 1));
    }

    #[test]
    fn parse_drops_all_space_interior_row() {
        let g = Grid::parse("#X\n  \n# ").unwrap();
        assert_eq!(g.height(), 2);
        assert_eq!(g.render_rows()[1], vec![Cell::Wall, Cell::Empty]);
        assert_eq!(g.to_string(), "#X\n# ");
    }

    #[test]
    fn parse_without_exit_fails() {
        let err = Grid::parse("###\n# #\n###").unwrap_err();
        assert!(matches!(err, MazeError::NoExit));
    }

    #[test]
    fn parse_ragged_rows_fail() {
        let err = Grid::parse("####\n#X#\n####").unwrap_err();
        assert!(matches!(err, MazeError::RaggedRow { row: 1, expected: 4, found: 3 }));
    }

    #[test]
    fn parse_unknown_character_fails() {
        let err = Grid::parse("###\n#X$\n###").unwrap_err();
        assert!(matches!(err, MazeError::UnknownCell { row: 1, col: 2, ch: '$' }));
    }

    #[test]
    fn parse_only_blank_lines_fails() {
        assert!(matches!(Grid::parse("\n   \n"), Err(MazeError::Empty)));
    }

    #[test]
    fn duplicate_exit_uses_first_in_row_major_order() {
        let rows = ["#####", "#  X#", "#X  #", "#####"];
        for _ in 0..3 {
            let g = grid_from(&rows);
            assert_eq!(g.exit(), Position::new(3, 1));
        }
    }

    // ── cell_is ──

    #[test]
    fn cell_is_matches_any_listed_type() {
        let g = grid_from(&["# X"]);
        assert!(g.cell_is(Position::new(0, 0), &[Cell::Wall]));
        assert!(g.cell_is(Position::new(1, 0), &[Cell::Empty, Cell::Exit]));
        assert!(g.cell_is(Position::new(2, 0), &[Cell::Empty, Cell::Exit]));
        assert!(!g.cell_is(Position::new(0, 0), &[Cell::Empty, Cell::Exit]));
    }

    #[test]
    fn cell_is_out_of_bounds_is_false() {
        let g = grid_from(&[" X "]);
        let all = [Cell::Empty, Cell::Wall, Cell::Exit];
        assert!(!g.cell_is(Position::new(-1, 0), &all));
        assert!(!g.cell_is(Position::new(3, 0), &all));
        assert!(!g.cell_is(Position::new(0, 1), &all));
        assert!(!g.cell_is(Position::new(0, -1), &all));
    }

    // ── Occupancy / placement ──

    #[test]
    fn occupied_cells_are_not_free() {
        let g = grid_from(&["#  X#"]);
        let taken = [Position::new(1, 0)];
        assert!(!g.is_empty_for_occupancy(Position::new(1, 0), &taken));
        assert!(g.is_empty_for_occupancy(Position::new(2, 0), &taken));
        assert!(!g.is_empty_for_occupancy(Position::new(3, 0), &taken)); // exit
        assert_eq!(g.free_cells(&taken), 1);
    }

    #[test]
    fn random_cell_avoids_walls_exit_and_entities() {
        let g = grid_from(&["#####", "#  X#", "# # #", "#   #", "#####"]);
        let taken = [Position::new(1, 1), Position::new(3, 3)];
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let p = g.random_walkable_cell(&mut rng, &taken).unwrap();
            assert_eq!(g.cell_at(p), Some(Cell::Empty));
            assert!(!taken.contains(&p));
            assert_ne!(p, g.exit());
        }
    }

    #[test]
    fn random_cell_is_reproducible_under_seed() {
        let g = grid_from(&["#######", "#     #", "#  X  #", "#     #", "#######"]);
        let sample = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            (0..10)
                .map(|_| g.random_walkable_cell(&mut rng, &[]).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(sample(99), sample(99));
    }

    #[test]
    fn random_cell_none_when_full() {
        let g = grid_from(&["# X#"]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(g.random_walkable_cell(&mut rng, &[Position::new(1, 0)]), None);
    }

    // ── Push ──

    #[test]
    fn push_slides_wall_into_empty() {
        let mut g = grid_from(&["  #  X"]);
        assert!(g.push(Position::new(2, 0), Position::new(1, 0)));
        assert_eq!(g.to_string(), "   # X");
    }

    #[test]
    fn push_into_wall_fails_without_mutation() {
        let mut g = grid_from(&[" ## X"]);
        let before = g.clone();
        assert!(!g.push(Position::new(1, 0), Position::new(1, 0)));
        assert_eq!(g, before);
    }

    #[test]
    fn push_into_exit_fails() {
        let mut g = grid_from(&[" #X"]);
        assert!(!g.push(Position::new(1, 0), Position::new(1, 0)));
        assert_eq!(g.to_string(), " #X");
    }

    #[test]
    fn push_off_the_edge_fails() {
        let mut g = grid_from(&["X #"]);
        assert!(!g.push(Position::new(2, 0), Position::new(1, 0)));
        assert_eq!(g.to_string(), "X #");
    }

    #[test]
    fn push_non_wall_fails() {
        let mut g = grid_from(&["X  "]);
        assert!(!g.push(Position::new(1, 0), Position::new(1, 0)));
        assert!(!g.push(Position::new(0, 0), Position::new(1, 0)));
    }

    #[test]
    fn push_keeps_exit_fixed() {
        let mut g = grid_from(&[
            "# #",
            "###",
            "# #",
            "#X#",
        ]);
        assert!(g.push(Position::new(1, 1), Position::new(0, 1)));
        assert_eq!(g.cell_at(Position::new(1, 1)), Some(Cell::Empty));
        assert_eq!(g.cell_at(Position::new(1, 2)), Some(Cell::Wall));
        assert_eq!(g.exit(), Position::new(1, 3));
        assert_eq!(g.cell_at(Position::new(1, 3)), Some(Cell::Exit));
        assert!(!g.push(Position::new(1, 2), Position::new(0, 1)));
    }

    // ── Walkable matrix ──

    #[test]
    fn walkable_matrix_blocks_walls_and_exit() {
        let mut g = grid_from(&["# X", "#  "]);
        assert_eq!(g.walkable_matrix(), vec![vec![1, 0, 1], vec![1, 0, 0]]);
        g.push(Position::new(0, 1), Position::new(1, 0));
        assert_eq!(g.walkable_matrix(), vec![vec![1, 0, 1], vec![0, 1, 0]]);
    }

    #[test]
    fn render_rows_reflect_cells() {
        let g = grid_from(&["#X", "# "]);
        let rows = g.render_rows();
        assert_eq!(rows[0], vec![Cell::Wall, Cell::Exit]);
        assert_eq!(rows[1], vec![Cell::Empty, Cell::Empty]);
    }
}
