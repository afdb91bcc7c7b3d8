/// Troll AI: A* shortest path over the walkable matrix.
///
/// The matrix comes from `Grid::walkable_matrix()` (`0` = walkable).
/// Edges are 4-directional with unit cost; the heuristic is Manhattan
/// distance, which is admissible on this graph, so paths are shortest.
///
/// Determinism: neighbours are expanded in `Direction::ALL` order and heap
/// ties break on (f, h, insertion order). Same maze + same positions always
/// produce the same path.
///
/// The start cell is always expanded, even if it is blocked (a wall may have
/// been pushed onto a troll). The goal must be walkable to be reached.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use super::position::{Direction, Position};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Node {
    f: u32,
    h: u32,
    seq: u32,
    pos: Position,
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.f, self.h, self.seq).cmp(&(other.f, other.h, other.seq))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct Matrix<'a> {
    cells: &'a [Vec<u8>],
    width: usize,
    height: usize,
}

impl<'a> Matrix<'a> {
    fn new(cells: &'a [Vec<u8>]) -> Self {
        let height = cells.len();
        let width = cells.first().map_or(0, |r| r.len());
        Matrix { cells, width, height }
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 { return None; }
        let (x, y) = (pos.x as usize, pos.y as usize);
        if x >= self.width || y >= self.height { return None; }
        Some(y * self.width + x)
    }

    fn walkable(&self, pos: Position) -> bool {
        self.index(pos).map_or(false, |_| self.cells[pos.y as usize][pos.x as usize] == 0)
    }
}

/// Shortest path from `start` to `goal`, both ends included.
///
/// `Some(vec![start])` when already there; `None` when the goal is
/// unreachable or off the matrix.
pub fn find_path(walkable: &[Vec<u8>], start: Position, goal: Position) -> Option<Vec<Position>> {
    let m = Matrix::new(walkable);
    let start_idx = m.index(start)?;
    if start == goal {
        return Some(vec![start]);
    }
    if !m.walkable(goal) {
        return None;
    }

    let size = m.width * m.height;
    let mut g_cost: Vec<u32> = vec![u32::MAX; size];
    let mut came_from: Vec<Option<Position>> = vec![None; size];
    let mut closed = vec![false; size];
    let mut open: BinaryHeap<Reverse<Node>> = BinaryHeap::with_capacity(64);
    let mut seq = 0u32;

    g_cost[start_idx] = 0;
    let h = start.manhattan(goal);
    open.push(Reverse(Node { f: h, h, seq, pos: start }));

    while let Some(Reverse(node)) = open.pop() {
        let Some(idx) = m.index(node.pos) else { continue };
        if closed[idx] { continue; }
        closed[idx] = true;

        if node.pos == goal {
            return Some(reconstruct(&m, &came_from, goal));
        }

        let g = g_cost[idx];
        for dir in Direction::ALL {
            let next = node.pos + dir.offset();
            if !m.walkable(next) { continue; }
            let Some(nidx) = m.index(next) else { continue };
            if closed[nidx] { continue; }
            let ng = g + 1;
            if ng < g_cost[nidx] {
                g_cost[nidx] = ng;
                came_from[nidx] = Some(node.pos);
                seq += 1;
                let h = next.manhattan(goal);
                open.push(Reverse(Node { f: ng + h, h, seq, pos: next }));
            }
        }
    }

    None
}

fn reconstruct(m: &Matrix, came_from: &[Option<Position>], goal: Position) -> Vec<Position> {
    let mut path = vec![goal];
    let mut cur = goal;
    while let Some(prev) = m.index(cur).and_then(|i| came_from[i]) {
        path.push(prev);
        cur = prev;
    }
    path.reverse();
    path
}

/// The cell one step along the shortest path, if there is one.
pub fn next_step(walkable: &[Vec<u8>], start: Position, goal: Position) -> Option<Position> {
    find_path(walkable, start, goal).and_then(|path| path.get(1).copied())
}
