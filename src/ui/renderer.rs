/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Compose the next frame into `front` from a `GameView`
///   2. Compare each cell with `back` (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The renderer reads the game through `GameView` only; it never touches
/// the grid or the entities directly.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::tile::Cell;
use crate::sim::world::{GameView, Phase};

// ── Glyph: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Glyph {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Glyph {
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Glyph = Glyph { ch: ' ', fg: Color::White, bg: Glyph::BASE_BG };

    /// Differs from every real glyph; used to force a full repaint.
    const INVALID: Glyph = Glyph { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color) -> Self {
        Glyph { ch, fg, bg: Glyph::BASE_BG }
    }
}

// ── FrameBuffer: a 2D grid of Glyphs ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Glyph>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Glyph::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Glyph::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Glyph::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, glyph: Glyph) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = glyph;
        }
    }

    fn get(&self, x: usize, y: usize) -> Glyph {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Glyph::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i, y, Glyph::new(ch, fg));
        }
    }
}

// ── Layout ──

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

const WALL_FG: Color = Color::Rgb { r: 120, g: 120, b: 150 };
const EXIT_FG: Color = Color::Yellow;
const HERO_FG: Color = Color::Green;
const TROLL_FG: Color = Color::Red;
const HUD_FG: Color = Color::Cyan;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Glyph::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Glyph::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Force the next frame to repaint every cell (after a restart).
    pub fn invalidate(&mut self) {
        self.back.cells.fill(Glyph::INVALID);
    }

    pub fn render(&mut self, view: &GameView<'_>, maze_name: &str) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Glyph::INVALID);
            queue!(self.writer, SetBackgroundColor(Glyph::BASE_BG), Clear(ClearType::All))?;
        }

        self.front.clear();
        compose(&mut self.front, view, maze_name);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Glyph::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Glyph::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let glyph = self.front.get(x, y);
                if glyph == self.back.get(x, y) {
                    continue;
                }
                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if glyph.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(glyph.fg))?;
                    last_fg = glyph.fg;
                }
                if glyph.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(glyph.bg))?;
                    last_bg = glyph.bg;
                }
                queue!(self.writer, Print(glyph.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }
}

// ── Compose: build frame content ──

fn compose(buf: &mut FrameBuffer, view: &GameView<'_>, maze_name: &str) {
    let status = match view.phase {
        Phase::Playing => "ESCAPE!",
        Phase::Won => "ESCAPED",
        Phase::Lost => "CAUGHT",
    };
    let hud = format!(
        " {}  Turn:{:<5} Trolls:{}  {} ",
        maze_name, view.turn, view.trolls.len(), status,
    );
    buf.put_str(0, HUD_ROW, &hud, HUD_FG);

    for (y, row) in view.cells.iter().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            let fg = match cell {
                Cell::Empty => Color::White,
                Cell::Wall => WALL_FG,
                Cell::Exit => EXIT_FG,
            };
            buf.set(x, MAP_ROW + y, Glyph::new(cell.glyph(), fg));
        }
    }

    for troll in &view.trolls {
        if let Some((x, y)) = map_to_screen(troll.position.x, troll.position.y) {
            buf.set(x, y, Glyph::new(troll.icon, TROLL_FG));
        }
    }
    // Hero last so it stays visible under a troll.
    if let Some((x, y)) = map_to_screen(view.hero.position.x, view.hero.position.y) {
        buf.set(x, y, Glyph::new(view.hero.icon, HERO_FG));
    }

    let help_row = MAP_ROW + view.cells.len() + 1;
    buf.put_str(1, help_row, "Arrows/WASD: move (push walls)  R: restart  Q/Esc: quit", Color::DarkGrey);

    if let Some(label) = view.outcome {
        let map_w = view.cells.first().map_or(0, |r| r.len());
        compose_outcome_box(buf, label, map_w, view.cells.len());
    }
}

fn map_to_screen(x: i32, y: i32) -> Option<(usize, usize)> {
    if x < 0 || y < 0 { return None; }
    Some((x as usize, MAP_ROW + y as usize))
}

/// Bordered banner centered over the maze.
fn compose_outcome_box(buf: &mut FrameBuffer, label: &str, map_w: usize, map_h: usize) {
    let inner_w = label.chars().count() + 6;
    let box_w = inner_w + 2;
    let box_h = 5;
    let left = map_w.saturating_sub(box_w) / 2;
    let top = MAP_ROW + map_h.saturating_sub(box_h) / 2;
    let fg = Color::White;

    for dy in 0..box_h {
        for dx in 0..box_w {
            let ch = match (dy, dx) {
                (0, 0) => '┌',
                (0, x) if x == box_w - 1 => '┐',
                (y, 0) if y == box_h - 1 => '└',
                (y, x) if y == box_h - 1 && x == box_w - 1 => '┘',
                (0, _) => '─',
                (y, _) if y == box_h - 1 => '─',
                (_, 0) => '│',
                (_, x) if x == box_w - 1 => '│',
                _ => ' ',
            };
            buf.set(left + dx, top + dy, Glyph::new(ch, fg));
        }
    }
    buf.put_str(left + 4, top + box_h / 2, label, Color::Yellow);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::Grid;
    use crate::domain::position::Position;
    use crate::sim::world::Game;

    fn row_text(buf: &FrameBuffer, y: usize) -> String {
        (0..buf.width).map(|x| buf.get(x, y).ch).collect()
    }

    fn game() -> Game {
        let grid = Grid::parse("#######\n#     #\n#    X#\n#######").unwrap();
        Game::with_positions(grid, Position::new(1, 1), &[Position::new(4, 1)])
    }

    #[test]
    fn compose_draws_maze_and_entities() {
        let g = game();
        let mut buf = FrameBuffer::new(40, 12);
        compose(&mut buf, &g.view(), "Test");

        assert!(row_text(&buf, HUD_ROW).contains("Turn:0"));
        assert_eq!(&row_text(&buf, MAP_ROW)[..7], "#######");
        assert_eq!(buf.get(1, MAP_ROW + 1).ch, '^');
        assert_eq!(buf.get(1, MAP_ROW + 1).fg, HERO_FG);
        assert_eq!(buf.get(4, MAP_ROW + 1).ch, 'T');
        assert_eq!(buf.get(5, MAP_ROW + 2).ch, 'X');
    }

    #[test]
    fn compose_shows_outcome_banner() {
        let mut g = game();
        g.phase = Phase::Lost;
        let mut buf = FrameBuffer::new(40, 12);
        compose(&mut buf, &g.view(), "Test");
        let text: String = (0..buf.height).map(|y| row_text(&buf, y)).collect();
        assert!(text.contains("YOU LOSE"));
        assert!(text.contains("CAUGHT"));
    }

    #[test]
    fn hero_drawn_over_troll() {
        let grid = Grid::parse("#####\n#  X#\n#####").unwrap();
        let g = Game::with_positions(grid, Position::new(1, 1), &[Position::new(1, 1)]);
        let mut buf = FrameBuffer::new(20, 8);
        compose(&mut buf, &g.view(), "Test");
        assert_eq!(buf.get(1, MAP_ROW + 1).ch, '^');
    }
}
