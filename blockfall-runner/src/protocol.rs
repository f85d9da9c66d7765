use blockfall_core::Block;
use serde::Serialize;

/// Everything a front end needs to draw one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub blocks: Vec<Block>,
    pub preview: Vec<Block>,
    pub score: u32,
    pub level: u32,
    pub high_score: u32,
    pub game_over: bool,
}

#[test]
fn snapshot_field_names() {
    let snapshot = Snapshot {
        level: 1,
        ..Snapshot::default()
    };
    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["blocks"], serde_json::json!([]));
    assert_eq!(json["preview"], serde_json::json!([]));
    assert_eq!(json["score"], 0);
    assert_eq!(json["level"], 1);
    assert_eq!(json["high_score"], 0);
    assert_eq!(json["game_over"], false);
}
