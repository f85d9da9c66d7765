//! Output collaborators.
//!
//! A renderer only ever sees a finished state: the game loop calls [`render`] once per change.

use crate::protocol::Snapshot;
use blockfall_core::{Block, Playfield, State};
use std::io::{self, Write};

pub trait Renderer {
    /// Replaces the drawn blocks and the preview pane.
    fn draw(&mut self, blocks: &[Block], preview: &[Block]) -> io::Result<()>;

    fn update_stats(&mut self, score: u32, level: u32, high_score: u32) -> io::Result<()>;

    fn set_game_over(&mut self, game_over: bool) -> io::Result<()>;

    /// Called after every update of a frame.
    fn present(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Pushes a whole state through a renderer.
pub fn render<R: Renderer + ?Sized>(renderer: &mut R, state: &State) -> io::Result<()> {
    renderer.draw(state.blocks(), &state.preview_blocks())?;
    renderer.update_stats(state.score(), state.level(), state.high_score())?;
    renderer.set_game_over(state.is_game_over())?;
    renderer.present()
}

/// Draws the field as a grid of letters, one per block kind.
pub struct TextRenderer<W> {
    out: W,
    field: Playfield,
    grid: Vec<char>,
    next: Option<char>,
    stats: (u32, u32, u32),
    game_over: bool,
}

const EMPTY_CELL: char = '.';

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, field: Playfield) -> TextRenderer<W> {
        TextRenderer {
            out,
            field,
            grid: vec![EMPTY_CELL; field.cells()],
            next: None,
            stats: (0, 0, 0),
            game_over: false,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn border(&self) -> String {
        format!("+{}+", "-".repeat(self.field.columns))
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn draw(&mut self, blocks: &[Block], preview: &[Block]) -> io::Result<()> {
        for cell in &mut self.grid {
            *cell = EMPTY_CELL;
        }
        for block in blocks {
            // lifted blocks can sit above the grid
            if let Some((x, y)) = self.field.cell_of(block.pos()) {
                self.grid[y * self.field.columns + x] = block.kind().letter();
            }
        }
        self.next = preview.first().map(|b| b.kind().letter());
        Ok(())
    }

    fn update_stats(&mut self, score: u32, level: u32, high_score: u32) -> io::Result<()> {
        self.stats = (score, level, high_score);
        Ok(())
    }

    fn set_game_over(&mut self, game_over: bool) -> io::Result<()> {
        self.game_over = game_over;
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        let border = self.border();
        writeln!(self.out, "{}", border)?;
        for row in self.grid.chunks(self.field.columns) {
            let row: String = row.iter().collect();
            writeln!(self.out, "|{}|", row)?;
        }
        writeln!(self.out, "{}", border)?;
        let (score, level, high_score) = self.stats;
        writeln!(
            self.out,
            "next: {}  score: {}  level: {}  high score: {}",
            self.next.unwrap_or('-'),
            score,
            level,
            high_score
        )?;
        if self.game_over {
            writeln!(self.out, "GAME OVER (r to restart)")?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }
}

/// Writes one JSON [`Snapshot`] per frame, one per line.
pub struct JsonRenderer<W> {
    out: W,
    frame: Snapshot,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> JsonRenderer<W> {
        JsonRenderer {
            out,
            frame: Snapshot::default(),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn draw(&mut self, blocks: &[Block], preview: &[Block]) -> io::Result<()> {
        self.frame.blocks = blocks.to_vec();
        self.frame.preview = preview.to_vec();
        Ok(())
    }

    fn update_stats(&mut self, score: u32, level: u32, high_score: u32) -> io::Result<()> {
        self.frame.score = score;
        self.frame.level = level;
        self.frame.high_score = high_score;
        Ok(())
    }

    fn set_game_over(&mut self, game_over: bool) -> io::Result<()> {
        self.frame.game_over = game_over;
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, &self.frame)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

#[cfg(test)]
use blockfall_core::{Event, Rules};

#[cfg(test)]
fn playing() -> State {
    // seed 0 starts with a square
    State::new(Rules::default(), 0)
        .reduce(Event::GravityTick)
        .reduce(Event::GravityTick)
}

#[test]
fn text_frame() {
    let state = playing();
    let mut renderer = TextRenderer::new(Vec::new(), state.rules().playfield);
    render(&mut renderer, &state).unwrap();
    let text = String::from_utf8(renderer.into_inner()).unwrap();
    let lines: Vec<_> = text.lines().collect();

    assert_eq!(lines[0], "+----------+");
    assert_eq!(lines[1], "|..........|");
    assert_eq!(lines[2], "|....OO....|");
    assert_eq!(lines[3], "|....OO....|");
    assert_eq!(lines[21], "+----------+");
    assert_eq!(lines[22], "next: O  score: 0  level: 1  high score: 0");
    assert!(!text.contains("GAME OVER"));
}

#[test]
fn text_game_over_banner() {
    let mut renderer = TextRenderer::new(Vec::new(), Playfield::default());
    renderer.set_game_over(true).unwrap();
    renderer.present().unwrap();
    let text = String::from_utf8(renderer.into_inner()).unwrap();
    assert!(text.contains("GAME OVER"));
    assert!(text.contains("next: -"));
}

#[test]
fn json_line_per_frame() {
    let state = playing();
    let mut renderer = JsonRenderer::new(Vec::new());
    render(&mut renderer, &state).unwrap();
    render(&mut renderer, &state.reduce(Event::GravityTick)).unwrap();
    let text = String::from_utf8(renderer.into_inner()).unwrap();
    let frames: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0]["blocks"].as_array().unwrap().len(), 4);
    assert_eq!(frames[0]["preview"].as_array().unwrap().len(), 4);
    assert_eq!(frames[0]["blocks"][0]["kind"], 0);
    assert_eq!(frames[0]["blocks"][0]["pos"]["y"], 20);
    assert_eq!(frames[1]["blocks"][0]["pos"]["y"], 40);
    assert_eq!(frames[1]["level"], 1);
}
