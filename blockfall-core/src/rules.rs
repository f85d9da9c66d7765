//! Game rules: every tunable constant of a run.

use crate::geom::Playfield;
use serde::{Deserialize, Serialize};

/// The rules a [`State`](crate::state::State) is played under.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub playfield: Playfield,
    /// Number of piece spawns between two bedrock blocks.
    pub bedrock_cadence: u32,
    /// Score awarded per cleared row.
    pub clear_row_score: u32,
    /// Score awarded each time a piece locks.
    pub drop_block_score: u32,
    /// Score needed per level.
    pub level_up_score: u32,
    pub max_level: u32,
    /// If set, a finished game ignores every event except a restart.
    pub halt_on_game_over: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            playfield: Playfield::default(),
            bedrock_cadence: 8,
            clear_row_score: 100,
            drop_block_score: 10,
            level_up_score: 1000,
            max_level: 10,
            halt_on_game_over: true,
        }
    }
}

/// Reasons a set of rules cannot be played.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RulesError {
    #[display("playfield needs at least 5 columns and 2 rows, got {columns}x{rows}")]
    GridTooSmall { columns: usize, rows: usize },
    #[display("playfield of {width}x{height} pixels does not divide into {columns}x{rows} cells")]
    UnevenCells {
        width: i32,
        height: i32,
        columns: usize,
        rows: usize,
    },
    #[display("{name} must be greater than zero")]
    Zero { name: &'static str },
}

impl Rules {
    /// Checks that the rules describe a playable field.
    pub fn validate(&self) -> Result<(), RulesError> {
        let field = &self.playfield;
        if field.columns < 5 || field.rows < 2 {
            return Err(RulesError::GridTooSmall {
                columns: field.columns,
                rows: field.rows,
            });
        }
        if field.width <= 0
            || field.height <= 0
            || field.width % field.columns as i32 != 0
            || field.height % field.rows as i32 != 0
        {
            return Err(RulesError::UnevenCells {
                width: field.width,
                height: field.height,
                columns: field.columns,
                rows: field.rows,
            });
        }
        for (name, value) in &[
            ("bedrock_cadence", self.bedrock_cadence),
            ("level_up_score", self.level_up_score),
            ("max_level", self.max_level),
        ] {
            if *value == 0 {
                return Err(RulesError::Zero { name: *name });
            }
        }
        Ok(())
    }

    /// Level for a given score.
    pub fn level_for(&self, score: u32) -> u32 {
        (score / self.level_up_score)
            .saturating_add(1)
            .min(self.max_level)
    }
}

#[test]
fn default_rules_are_valid() {
    assert_eq!(Rules::default().validate(), Ok(()));
}

#[test]
fn invalid_rules() {
    let mut rules = Rules::default();
    rules.playfield.width = 205;
    assert!(matches!(
        rules.validate(),
        Err(RulesError::UnevenCells { .. })
    ));

    let mut rules = Rules::default();
    rules.playfield.columns = 2;
    assert!(matches!(
        rules.validate(),
        Err(RulesError::GridTooSmall { .. })
    ));

    let rules = Rules {
        bedrock_cadence: 0,
        ..Rules::default()
    };
    assert_eq!(
        rules.validate(),
        Err(RulesError::Zero {
            name: "bedrock_cadence"
        })
    );
    assert_eq!(
        rules.validate().unwrap_err().to_string(),
        "bedrock_cadence must be greater than zero"
    );
}

#[test]
fn levels() {
    let rules = Rules::default();
    assert_eq!(rules.level_for(0), 1);
    assert_eq!(rules.level_for(999), 1);
    assert_eq!(rules.level_for(1000), 2);
    assert_eq!(rules.level_for(1_000_000), 10);
}

#[test]
fn level_at_maximum_score() {
    let rules = Rules {
        level_up_score: 1,
        max_level: u32::max_value(),
        ..Rules::default()
    };
    assert_eq!(rules.level_for(u32::max_value()), u32::max_value());
}
