//! The game state and the reducer that advances it.
//!
//! A [`State`] is an immutable snapshot. [`State::reduce`] takes one [`Event`] and returns the
//! next snapshot; it is total and never fails, so the caller can feed it any event at any time.
//!
//! Per event, a state goes through these phases:
//!
//! 1. **Spawning**: with no active piece, the next one is taken from the preview (or the random
//!    sequence) and the bedrock countdown ticks.
//! 2. **Falling**: the active piece moves sideways if it can, then drops one cell.
//! 3. **Locking**: if it cannot drop, it is placed, rows are cleared and the top row is checked
//!    for a game over.
//!
//! The level and the grey floor are brought up to date after every event.

use crate::block::{Block, BlockKind, GroupId};
use crate::catalog;
use crate::collision;
use crate::event::Event;
use crate::hazard;
use crate::level;
use crate::rotation;
use crate::rows::{self, Occupancy};
use crate::rules::Rules;
use crate::sequence::RandomSequence;

/// A complete game snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    rules: Rules,
    blocks: Vec<Block>,
    score: u32,
    level: u32,
    high_score: u32,
    occupancy: Occupancy,
    /// Kind of the piece that spawns next.
    next_shape: Option<BlockKind>,
    /// Spawns left until the next bedrock block.
    bedrock_countdown: u32,
    /// Blocks created so far; the next block id.
    block_count: u32,
    /// Pieces spawned so far; the next group id.
    piece_count: u32,
    bedrock_count: u32,
    grey_count: u32,
    sequence: RandomSequence,
    game_end: bool,
}

/// Returns true for the blocks of the piece under player control.
fn is_active(block: &Block) -> bool {
    !block.is_placed() && block.group().is_some()
}

impl State {
    /// Creates the initial state of a game.
    pub fn new(rules: Rules, seed: u32) -> State {
        State {
            rules,
            blocks: Vec::new(),
            score: 0,
            level: 1,
            high_score: 0,
            occupancy: Occupancy::empty(&rules.playfield),
            next_shape: None,
            bedrock_countdown: rules.bedrock_cadence,
            block_count: 0,
            piece_count: 0,
            bedrock_count: 0,
            grey_count: 0,
            sequence: RandomSequence::new(seed),
            game_end: false,
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// All blocks, placed and falling.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    pub fn next_shape(&self) -> Option<BlockKind> {
        self.next_shape
    }

    /// The next piece laid out for a preview pane.
    pub fn preview_blocks(&self) -> Vec<Block> {
        self.next_shape
            .map(|kind| catalog::preview(kind, &self.rules.playfield))
            .unwrap_or_default()
    }

    pub fn bedrock_countdown(&self) -> u32 {
        self.bedrock_countdown
    }

    pub fn block_count(&self) -> u32 {
        self.block_count
    }

    pub fn piece_count(&self) -> u32 {
        self.piece_count
    }

    pub fn bedrock_count(&self) -> u32 {
        self.bedrock_count
    }

    pub fn grey_count(&self) -> u32 {
        self.grey_count
    }

    pub fn sequence(&self) -> RandomSequence {
        self.sequence
    }

    pub fn is_game_over(&self) -> bool {
        self.game_end
    }

    /// Blocks of the active piece, pivot first.
    pub fn active_blocks(&self) -> Vec<Block> {
        self.blocks
            .iter()
            .filter(|b| is_active(b))
            .cloned()
            .collect()
    }

    /// Group of the active piece, if there is one.
    pub fn active_group(&self) -> Option<GroupId> {
        self.blocks
            .iter()
            .find(|b| is_active(b))
            .and_then(Block::group)
    }

    /// Replaces the random sequence, e.g. to reseed a game.
    pub fn with_sequence(self, sequence: RandomSequence) -> State {
        State { sequence, ..self }
    }

    /// Replaces all blocks. The occupancy matrix is rebuilt to match.
    pub fn with_blocks(self, blocks: Vec<Block>) -> State {
        let occupancy = Occupancy::build(&blocks, &self.rules.playfield);
        State {
            blocks,
            occupancy,
            ..self
        }
    }

    pub fn with_score(self, score: u32) -> State {
        State { score, ..self }
    }

    pub fn with_high_score(self, high_score: u32) -> State {
        State { high_score, ..self }
    }

    fn with_game_end(self, game_end: bool) -> State {
        State { game_end, ..self }
    }

    /// Applies one event.
    pub fn reduce(&self, event: Event) -> State {
        trace!("event {:?}", event);
        match event {
            Event::Restart => return self.restarted(),
            _ if self.game_end && self.rules.halt_on_game_over => return self.clone(),
            Event::RandomTick => return self.clone().with_sequence(self.sequence.advanced()),
            _ => (),
        }

        let state = self.clone();
        let state = if state.active_group().is_none() {
            state.spawn()
        } else {
            match event {
                Event::Rotate => state.rotate_active(),
                Event::Move { direction } => state.step(direction.dx()),
                _ => state.step(0),
            }
        };
        state.update_level()
    }

    /// A fresh game that keeps the best score and the random sequence.
    fn restarted(&self) -> State {
        let high_score = self.high_score.max(self.score);
        debug!("restart (high score {})", high_score);
        State::new(self.rules, 0)
            .with_sequence(self.sequence)
            .with_high_score(high_score)
    }

    fn spawn(self) -> State {
        let drawn = match BlockKind::from_index(self.sequence.index()) {
            Some(kind) => kind,
            None => {
                trace!("sentinel index drawn, nothing spawns");
                return self;
            }
        };
        let kind = self.next_shape.unwrap_or(drawn);
        let piece = match catalog::spawn(kind, &self) {
            Some(piece) => piece,
            None => return self,
        };

        if !collision::fits(&piece, &self.blocks, &self.rules.playfield) {
            debug!("no room to spawn {:?}, game over", kind);
            return self.with_game_end(true);
        }
        trace!("spawned {:?}, next {:?}", kind, drawn);

        let mut blocks = self.blocks.clone();
        blocks.extend(piece.iter().cloned());
        let injection = hazard::count_down(
            self.bedrock_countdown,
            self.rules.bedrock_cadence,
            self.bedrock_count,
            self.sequence.advanced().hash(),
            &blocks,
            &self.rules.playfield,
        );
        let bedrock_count = match injection.bedrock {
            Some(bedrock) => {
                blocks.push(bedrock);
                self.bedrock_count + 1
            }
            None => self.bedrock_count,
        };

        State {
            blocks,
            next_shape: Some(drawn),
            bedrock_countdown: injection.countdown,
            block_count: self.block_count + piece.len() as u32,
            piece_count: self.piece_count + 1,
            bedrock_count,
            ..self
        }
    }

    fn rotate_active(self) -> State {
        let field = self.rules.playfield;
        let rotated = rotation::rotate(&self.active_blocks(), &field);
        if !collision::fits(&rotated, &self.blocks, &field) {
            trace!("rotation blocked");
            return self;
        }
        let mut blocks: Vec<Block> = self
            .blocks
            .iter()
            .filter(|b| !is_active(b))
            .cloned()
            .collect();
        blocks.extend(rotated);
        self.with_blocks(blocks)
    }

    /// Sideways move by `dx` cells (if possible) followed by one gravity step.
    fn step(self, dx: i32) -> State {
        let field = self.rules.playfield;
        let active = self.active_blocks();
        let rest: Vec<Block> = self
            .blocks
            .iter()
            .filter(|b| !is_active(b))
            .cloned()
            .collect();

        let shifted: Vec<Block> = active
            .iter()
            .map(|b| b.translated(dx * field.cell_width(), 0))
            .collect();
        let working = if dx != 0 && collision::horizontal_move_ok(&shifted, &self.blocks, &field) {
            shifted
        } else {
            active
        };

        let dropped: Vec<Block> = working
            .iter()
            .map(|b| b.translated(0, field.cell_height()))
            .collect();
        let state = if collision::vertical_move_ok(&dropped, &self.blocks, &field) {
            let mut blocks = rest;
            blocks.extend(dropped);
            self.with_blocks(blocks)
        } else {
            let mut blocks = rest;
            blocks.extend(working);
            self.with_blocks(blocks).lock_active()
        };
        state.drop_bedrock()
    }

    fn drop_bedrock(self) -> State {
        let (blocks, locked) = hazard::fall(self.blocks.clone(), &self.rules.playfield);
        let state = self.with_blocks(blocks);
        if locked {
            state.check_top_out()
        } else {
            state
        }
    }

    fn lock_active(self) -> State {
        let blocks = self
            .blocks
            .iter()
            .map(|b| if is_active(b) { b.locked() } else { b.clone() })
            .collect();
        let score = self.score.saturating_add(self.rules.drop_block_score);
        debug!("piece locked, score {}", score);
        self.with_blocks(blocks)
            .with_score(score)
            .clear_rows()
            .check_top_out()
    }

    fn clear_rows(self) -> State {
        let field = self.rules.playfield;
        let (blocks, cleared) = rows::clear_full_rows(self.blocks.clone(), &self.occupancy, &field);
        if cleared == 0 {
            return self;
        }

        let bonus = (cleared as u32).saturating_mul(self.rules.clear_row_score);
        let score = self.score.saturating_add(bonus);
        debug!("cleared {} rows, score {}", cleared, score);
        self.with_blocks(blocks).with_score(score)
    }

    /// Ends the game if a placed block reached the top row.
    fn check_top_out(self) -> State {
        if self.blocks.iter().any(|b| b.is_placed() && b.y() <= 0) {
            debug!("top row reached, game over (score {})", self.score);
            self.with_game_end(true)
        } else {
            self
        }
    }

    fn update_level(self) -> State {
        let level = self.rules.level_for(self.score).max(self.level);
        if level != self.level {
            debug!("level {} -> {}", self.level, level);
        }
        if self.grey_count >= level::grey_target(level, &self.rules.playfield) {
            return State { level, ..self };
        }

        let field = self.rules.playfield;
        let floor = level::raise_floor(
            self.blocks.clone(),
            self.grey_count,
            self.block_count,
            level,
            &field,
        );
        let game_end = self.game_end || floor.topped_out;
        if floor.topped_out {
            debug!("floor pushed blocks off the top, game over");
        }
        State {
            level,
            occupancy: Occupancy::build(&floor.blocks, &field),
            blocks: floor.blocks,
            grey_count: floor.grey_count,
            block_count: floor.block_count,
            game_end,
            ..self
        }
    }
}

#[cfg(test)]
use crate::event::Direction;

/// A seed whose first index names `kind`.
#[cfg(test)]
fn seed_for(kind: BlockKind) -> u32 {
    (0..)
        .find(|&seed| RandomSequence::new(seed).index() == kind as usize)
        .unwrap()
}

#[cfg(test)]
fn left() -> Event {
    Event::Move {
        direction: Direction::Left,
    }
}

#[cfg(test)]
fn right() -> Event {
    Event::Move {
        direction: Direction::Right,
    }
}

#[cfg(test)]
fn started(kind: BlockKind) -> State {
    State::new(Rules::default(), seed_for(kind)).reduce(Event::GravityTick)
}

#[test]
fn first_tick_spawns() {
    let state = State::new(Rules::default(), seed_for(BlockKind::T));
    assert!(state.active_blocks().is_empty());
    let state = state.reduce(Event::GravityTick);
    let active = state.active_blocks();
    assert_eq!(active.len(), 4);
    assert!(active.iter().all(|b| b.kind() == BlockKind::T));
    assert_eq!(state.next_shape(), Some(BlockKind::T));
    assert_eq!(state.piece_count(), 1);
    assert_eq!(state.block_count(), 4);
    assert_eq!(state.bedrock_countdown(), 7);
}

#[test]
fn sentinel_index_spawns_nothing() {
    let mut state = State::new(Rules::default(), 0);
    // jump straight to the sentinel hash
    let json = format!("{{\"hash\":{}}}", (1u32 << 31) - 1);
    state.sequence = serde_json::from_str(&json).unwrap();
    assert_eq!(
        state.sequence().index(),
        crate::sequence::SENTINEL_INDEX
    );
    let next = state.reduce(Event::GravityTick);
    assert_eq!(next, state);
}

#[test]
fn preview_feeds_the_next_spawn() {
    let mut state = started(BlockKind::Square);
    // advance the sequence until it names another kind
    while BlockKind::from_index(state.sequence().index())
        .map_or(true, |kind| kind == BlockKind::Square)
    {
        state = state.reduce(Event::RandomTick);
    }
    let drawn = BlockKind::from_index(state.sequence().index()).unwrap();
    // drop the square to the floor
    while state.active_group().is_some() {
        state = state.reduce(Event::SoftDrop);
    }
    let state = state.reduce(Event::GravityTick);
    let active = state.active_blocks();
    assert!(active.iter().all(|b| b.kind() == BlockKind::Square));
    assert_eq!(state.next_shape(), Some(drawn));
}

#[test]
fn random_tick_only_moves_the_sequence() {
    let state = State::new(Rules::default(), 3).reduce(Event::GravityTick);
    let next = state.reduce(Event::RandomTick);
    assert_eq!(next.blocks(), state.blocks());
    assert_eq!(next.sequence(), state.sequence().advanced());
}

#[test]
fn moving_also_drops() {
    use crate::geom::Point2;
    let state = started(BlockKind::T);
    let before: Vec<_> = state.active_blocks().iter().map(Block::pos).collect();
    let state = state.reduce(right());
    let after: Vec<_> = state.active_blocks().iter().map(Block::pos).collect();
    for (a, b) in before.iter().zip(&after) {
        assert_eq!(*b, *a + Point2::new(20, 20));
    }
}

#[test]
fn blocked_move_still_drops() {
    let mut state = started(BlockKind::Straight);
    for _ in 0..10 {
        state = state.reduce(left());
    }
    let xs: Vec<_> = state.active_blocks().iter().map(Block::x).collect();
    assert_eq!(xs.iter().min(), Some(&0));
    assert!(state.active_blocks().iter().all(|b| b.y() == 200));
}

#[test]
fn rotation_does_not_drop() {
    let state = started(BlockKind::T).reduce(Event::GravityTick);
    let rotated = state.reduce(Event::Rotate);
    let pivot = &rotated.active_blocks()[0];
    assert_eq!(pivot.pos(), state.active_blocks()[0].pos());
    assert_ne!(rotated.active_blocks(), state.active_blocks());
}

#[test]
fn blocked_rotation_is_discarded() {
    // a straight piece in the top row cannot turn upward out of the field
    let state = started(BlockKind::Straight);
    let rotated = state.reduce(Event::Rotate);
    assert_eq!(rotated.blocks(), state.blocks());
}

#[test]
fn lock_awards_placement_score() {
    let mut state = started(BlockKind::Square);
    let mut steps = 0;
    while state.active_group().is_some() {
        state = state.reduce(Event::GravityTick);
        steps += 1;
    }
    // rows 0-1 down to rows 18-19, plus the locking step
    assert_eq!(steps, 19);
    assert_eq!(state.score(), 10);
    assert!(state.blocks().iter().all(Block::is_placed));
    assert!(state.occupancy().get(4, 19));
    assert!(state.occupancy().get(5, 18));
    assert!(!state.is_game_over());
}

#[test]
fn halted_game_ignores_input() {
    let state = State::new(Rules::default(), 1).with_game_end(true);
    assert_eq!(state.reduce(Event::GravityTick), state);
    assert_eq!(state.reduce(Event::RandomTick), state);
    let restarted = state.reduce(Event::Restart);
    assert!(!restarted.is_game_over());
}

#[test]
fn running_game_over_keeps_ticking() {
    let rules = Rules {
        halt_on_game_over: false,
        ..Rules::default()
    };
    let state = State::new(rules, seed_for(BlockKind::T)).with_game_end(true);
    let next = state.reduce(Event::GravityTick);
    assert!(next.is_game_over());
    assert_eq!(next.active_blocks().len(), 4);
}

#[test]
fn stacking_to_the_top_ends_the_game() {
    let mut state = State::new(Rules::default(), seed_for(BlockKind::Square));
    for _ in 0..1000 {
        if state.is_game_over() {
            break;
        }
        state = state.reduce(Event::GravityTick);
    }
    assert!(state.is_game_over());
    assert!(state.blocks().iter().any(|b| b.is_placed() && b.y() == 0));
    let frozen = state.reduce(Event::GravityTick);
    assert_eq!(frozen, state);
}

#[test]
fn at_most_one_active_group() {
    let mut state = State::new(Rules::default(), 42);
    let events = [
        Event::GravityTick,
        left(),
        Event::Rotate,
        right(),
        Event::SoftDrop,
        Event::RandomTick,
    ];
    for i in 0..2000 {
        state = state.reduce(events[i % events.len()]);
        let groups: std::collections::HashSet<_> = state
            .blocks()
            .iter()
            .filter(|b| !b.is_placed())
            .filter_map(Block::group)
            .collect();
        assert!(groups.len() <= 1);
        if let Some(group) = state.active_group() {
            let members = state.blocks().iter().filter(|b| b.group() == Some(group));
            assert_eq!(members.count(), 4);
        }
        let field = state.rules().playfield;
        for block in state.blocks() {
            assert!(block.x() >= 0 && block.x() <= field.max_x());
            assert!(block.y() <= field.max_y());
        }
        if state.is_game_over() {
            state = state.reduce(Event::Restart);
        }
    }
}

#[test]
fn bedrock_arrives_on_cadence() {
    let rules = Rules {
        bedrock_cadence: 2,
        ..Rules::default()
    };
    let mut state = State::new(rules, seed_for(BlockKind::Straight));
    while state.piece_count() < 2 {
        state = state.reduce(Event::SoftDrop);
    }
    assert_eq!(state.bedrock_count(), 1);
    let bedrock: Vec<_> = state
        .blocks()
        .iter()
        .filter(|b| b.kind() == BlockKind::Bedrock)
        .cloned()
        .collect();
    assert_eq!(bedrock.len(), 1);
    let id = bedrock[0].id();
    assert!(id < 0);
    assert_eq!(bedrock[0].group(), None);
    assert_eq!(state.bedrock_countdown(), 2);

    let find = |state: &State| -> Block {
        state
            .blocks()
            .iter()
            .find(|b| b.id() == id)
            .cloned()
            .unwrap()
    };

    // sideways input never moves bedrock
    let x = bedrock[0].x();
    for _ in 0..5 {
        state = state.reduce(left());
        assert_eq!(find(&state).x(), x);
    }

    // and rotating the piece leaves it where it is
    let before = find(&state);
    assert!(!before.is_placed());
    let rotated = state.reduce(Event::Rotate);
    assert_ne!(rotated.active_blocks(), state.active_blocks());
    assert_eq!(find(&rotated).pos(), before.pos());
    assert!(rotated.active_blocks().iter().all(|b| b.id() != id));
}

#[test]
fn score_raises_level_and_floor() {
    let state = State::new(Rules::default(), 5).with_score(2000);
    let state = state.reduce(Event::GravityTick);
    assert_eq!(state.level(), 3);
    assert_eq!(state.grey_count(), 20);
    let greys: Vec<_> = state
        .blocks()
        .iter()
        .filter(|b| b.kind() == BlockKind::Grey)
        .collect();
    assert_eq!(greys.len(), 20);
    assert!(greys.iter().all(|b| b.y() >= 360));
}

#[test]
fn huge_placement_score_saturates() {
    let rules = Rules {
        drop_block_score: u32::max_value(),
        ..Rules::default()
    };
    assert_eq!(rules.validate(), Ok(()));
    let mut state = State::new(rules, seed_for(BlockKind::Square));
    for _ in 0..500 {
        state = state.reduce(Event::SoftDrop);
        if state.is_game_over() {
            break;
        }
    }
    assert_eq!(state.score(), u32::max_value());
    assert_eq!(state.level(), rules.max_level);
}

#[test]
fn unbounded_levels_fill_the_field() {
    let rules = Rules {
        drop_block_score: 1_000_000_000,
        level_up_score: 1,
        max_level: u32::max_value(),
        ..Rules::default()
    };
    assert_eq!(rules.validate(), Ok(()));
    let mut state = State::new(rules, seed_for(BlockKind::Square));
    for _ in 0..100 {
        state = state.reduce(Event::SoftDrop);
        if state.is_game_over() {
            break;
        }
    }
    assert!(state.is_game_over());
    assert_eq!(state.grey_count(), 200);
}
