use blockfall_core::{Block, Event, Rules, State};
use wasm_bindgen::prelude::*;
use wasm_bindgen::throw_str;

#[wasm_bindgen]
pub struct Game(State);

/// Creates a game. `rules` is an optional JSON object overriding the default rules.
#[wasm_bindgen(js_name = "createGame")]
pub fn create_game(seed: u32, rules: Option<String>) -> Game {
    let rules = match rules {
        Some(json) => match serde_json::from_str::<Rules>(&json) {
            Ok(rules) => rules,
            Err(err) => throw_str(&format!("invalid rules: {}", err)),
        },
        None => Rules::default(),
    };
    if let Err(err) = rules.validate() {
        throw_str(&format!("invalid rules: {}", err));
    }
    Game(State::new(rules, seed))
}

fn flatten(blocks: &[Block]) -> Box<[i32]> {
    blocks
        .iter()
        .flat_map(|b| vec![b.x(), b.y(), b.kind() as i32])
        .collect()
}

fn to_json(blocks: &[Block]) -> String {
    // blocks only hold numbers and static strings
    serde_json::to_string(blocks).unwrap_or_default()
}

#[wasm_bindgen]
impl Game {
    /// Applies one event, written the way the command line accepts it (`left`, `rotate`,
    /// `tick`...).
    pub fn dispatch(&mut self, event: &str) {
        match event.parse::<Event>() {
            Ok(event) => self.apply(event),
            Err(err) => throw_str(&err.to_string()),
        }
    }

    /// All blocks as JSON.
    pub fn blocks(&self) -> String {
        to_json(self.0.blocks())
    }

    /// The blocks as `[x, y, kind, x, y, kind, ...]`.
    #[wasm_bindgen(js_name = "blockCells")]
    pub fn block_cells(&self) -> Box<[i32]> {
        flatten(self.0.blocks())
    }

    /// The preview pane as JSON.
    pub fn preview(&self) -> String {
        to_json(&self.0.preview_blocks())
    }

    pub fn score(&self) -> u32 {
        self.0.score()
    }

    pub fn level(&self) -> u32 {
        self.0.level()
    }

    #[wasm_bindgen(js_name = "highScore")]
    pub fn high_score(&self) -> u32 {
        self.0.high_score()
    }

    #[wasm_bindgen(js_name = "isGameOver")]
    pub fn is_game_over(&self) -> bool {
        self.0.is_game_over()
    }

    #[wasm_bindgen(js_name = "fieldWidth")]
    pub fn field_width(&self) -> i32 {
        self.0.rules().playfield.width
    }

    #[wasm_bindgen(js_name = "fieldHeight")]
    pub fn field_height(&self) -> i32 {
        self.0.rules().playfield.height
    }
}

impl Game {
    fn apply(&mut self, event: Event) {
        self.0 = self.0.reduce(event);
    }
}

#[test]
fn events_drive_the_game() {
    let mut game = Game(State::new(Rules::default(), 0));
    assert_eq!(game.blocks(), "[]");
    game.dispatch("tick");
    game.dispatch("left");
    assert_eq!(game.block_cells().len(), 12);
    // seed 0 starts with a square: pivot moved one cell left and down
    assert_eq!(&game.block_cells()[..3], &[60, 20, 0]);
    assert_eq!(game.score(), 0);
    assert_eq!(game.level(), 1);
    assert!(!game.is_game_over());
    assert!(game.preview().starts_with('['));
}
