/// Cell types of the maze.
/// Properties are queried via methods, not stored as flags,
/// so cell semantics are centralized here.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Cell {
    #[default]
    Empty,
    Wall, // Solid, pushable by the hero
    Exit, // Win target, exactly one per maze
}

impl Cell {
    /// Decode a maze character. Unknown characters yield `None`.
    pub fn from_char(ch: char) -> Option<Cell> {
        match ch {
            ' ' => Some(Cell::Empty),
            '#' => Some(Cell::Wall),
            'X' => Some(Cell::Exit),
            _ => None,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Wall => '#',
            Cell::Exit => 'X',
        }
    }

    /// Can a troll path through this cell?
    /// Only Empty counts; the exit is blocked for pursuit.
    pub fn is_walkable(self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Can the hero step onto this cell without pushing?
    pub fn is_enterable(self) -> bool {
        matches!(self, Cell::Empty | Cell::Exit)
    }
}
