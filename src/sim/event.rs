/// Events emitted during a turn.
/// The presentation layer and the log consume these.

use crate::domain::position::{Direction, Position};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    HeroWalked { to: Position },
    WallPushed { from: Position, to: Position },
    HeroBumped { facing: Direction },
    TrollMoved { id: usize, from: Position, to: Position },
    TrollStuck { id: usize },
    HeroCaught { id: usize },
    ExitReached,
}
