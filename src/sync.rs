//! 对局同步
//!
//! 联机模式下每走一步推送整盘快照，收到的快照直接覆盖本地状态（后写者胜）。
//! 远端数据可能是稀疏的（缺行、缺格、以对象代替数组），读入时补齐为
//! 标准尺寸，无法识别的格子按空处理。

use crate::board::Board;
use crate::omok::board::OmokBoard;
use crate::types::{Color, Piece, Position};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// 快照推送通道
pub trait SnapshotChannel<S> {
    fn publish(&mut self, snapshot: &S);
}

/// 内存通道：克隆出的句柄共享同一份推送记录
#[derive(Debug)]
pub struct MemoryChannel<S> {
    published: Rc<RefCell<Vec<S>>>,
}

impl<S> Default for MemoryChannel<S> {
    fn default() -> Self {
        MemoryChannel {
            published: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<S> Clone for MemoryChannel<S> {
    fn clone(&self) -> Self {
        MemoryChannel {
            published: Rc::clone(&self.published),
        }
    }
}

impl<S: Clone> MemoryChannel<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<S> {
        self.published.borrow().clone()
    }

    pub fn latest(&self) -> Option<S> {
        self.published.borrow().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.published.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.published.borrow().is_empty()
    }
}

impl<S: Clone> SnapshotChannel<S> for MemoryChannel<S> {
    fn publish(&mut self, snapshot: &S) {
        self.published.borrow_mut().push(snapshot.clone());
    }
}

/// 快照中的坐标，兼容 `{row, col}` 与 `{r, c}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSquare {
    #[serde(alias = "r")]
    pub row: i8,
    #[serde(alias = "c")]
    pub col: i8,
}

impl From<Position> for SnapshotSquare {
    fn from(pos: Position) -> Self {
        SnapshotSquare {
            row: pos.row,
            col: pos.col,
        }
    }
}

impl From<SnapshotSquare> for Position {
    fn from(sq: SnapshotSquare) -> Self {
        Position::new(sq.row, sq.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMove {
    pub from: SnapshotSquare,
    pub to: SnapshotSquare,
}

/// 字段值类型不符时退回默认值，单个坏字段不影响整份快照
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            log::warn!("snapshot field ignored: {}", e);
            Ok(T::default())
        }
    }
}

/// 国际象棋快照
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChessSnapshot {
    /// 8x8，每格为 null 或 FEN 棋子字母
    pub board: Value,
    /// "w" / "b"
    #[serde(deserialize_with = "lenient")]
    pub turn: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub last_move: Option<SnapshotMove>,
    #[serde(deserialize_with = "lenient")]
    pub game_over: bool,
    #[serde(deserialize_with = "lenient")]
    pub captured_white: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub captured_black: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub timestamp: u64,
}

/// 五子棋快照
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OmokSnapshot {
    /// 15x15，每格为 null、"b" 或 "w"
    pub board: Value,
    #[serde(deserialize_with = "lenient")]
    pub turn: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub game_over: bool,
    #[serde(deserialize_with = "lenient")]
    pub winner: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub last_move: Option<SnapshotSquare>,
    #[serde(deserialize_with = "lenient")]
    pub timestamp: u64,
}

impl ChessSnapshot {
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("Snapshot encode error: {}", e))
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Invalid chess snapshot: {}", e))
    }
}

impl OmokSnapshot {
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("Snapshot encode error: {}", e))
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Invalid omok snapshot: {}", e))
    }
}

/// 当前毫秒时间戳
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// 快照中的行棋方，缺失或无法识别时取 `default`
pub fn parse_turn(turn: Option<&str>, default: Color) -> Color {
    turn.and_then(Color::from_name).unwrap_or(default)
}

/// 数组按下标取，对象按字符串下标取
fn element(value: &Value, index: usize) -> Option<&Value> {
    match value {
        Value::Array(items) => items.get(index),
        Value::Object(map) => map.get(&index.to_string()),
        _ => None,
    }
}

fn has_shape(value: &Value, len: usize) -> bool {
    matches!(value, Value::Array(items) if items.len() == len)
}

/// 把任意 JSON 还原为 N x N 网格，返回 (网格, 是否需要修正)
fn normalize_grid<T: Copy, const N: usize>(
    raw: &Value,
    parse: impl Fn(&str) -> Option<T>,
) -> ([[Option<T>; N]; N], bool) {
    let mut grid = [[None; N]; N];
    let mut repaired = !has_shape(raw, N);

    for (r, row) in grid.iter_mut().enumerate() {
        let raw_row = match element(raw, r) {
            Some(v) => v,
            None => {
                repaired = true;
                continue;
            }
        };
        if !has_shape(raw_row, N) {
            repaired = true;
        }
        for (c, cell) in row.iter_mut().enumerate() {
            match element(raw_row, c) {
                None | Some(Value::Null) => {}
                Some(Value::String(s)) => match parse(s) {
                    Some(v) => *cell = Some(v),
                    None => repaired = true,
                },
                Some(_) => repaired = true,
            }
        }
    }
    (grid, repaired)
}

fn grid_to_value<T, const N: usize>(grid: &[[Option<T>; N]; N], fmt: impl Fn(&T) -> String) -> Value {
    Value::Array(
        grid.iter()
            .map(|row| {
                Value::Array(
                    row.iter()
                        .map(|cell| match cell {
                            Some(v) => Value::String(fmt(v)),
                            None => Value::Null,
                        })
                        .collect(),
                )
            })
            .collect(),
    )
}

fn parse_piece(s: &str) -> Option<Piece> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Piece::from_fen_char(ch),
        _ => None,
    }
}

pub fn chess_board_to_value(board: &Board) -> Value {
    grid_to_value(board.squares(), |p| p.to_fen_char().to_string())
}

/// 还原 8x8 国际象棋棋盘
pub fn normalize_chess_board(raw: &Value) -> Board {
    let (squares, repaired) = normalize_grid::<Piece, 8>(raw, parse_piece);
    if repaired {
        log::warn!("chess snapshot board was malformed, normalized to 8x8");
    }
    Board::from_squares(squares)
}

pub fn omok_board_to_value(board: &OmokBoard) -> Value {
    grid_to_value(board.cells(), |c| c.to_char().to_string())
}

/// 还原 15x15 五子棋棋盘
pub fn normalize_omok_board(raw: &Value) -> OmokBoard {
    let (cells, repaired) = normalize_grid::<Color, 15>(raw, Color::from_name);
    if repaired {
        log::warn!("omok snapshot board was malformed, normalized to 15x15");
    }
    OmokBoard::from_cells(cells)
}

/// 解析被吃棋子列表，忽略无法识别的项
pub fn parse_captured(items: &[String]) -> Vec<Piece> {
    items.iter().filter_map(|s| parse_piece(s)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceType;
    use serde_json::json;

    #[test]
    fn test_chess_board_value_round_trip() {
        let board = Board::initial();
        let value = chess_board_to_value(&board);
        assert_eq!(value[0][4], json!("k"));
        assert_eq!(value[7][3], json!("Q"));
        assert_eq!(value[4][4], Value::Null);
        assert_eq!(normalize_chess_board(&value), board);
    }

    #[test]
    fn test_normalize_sparse_chess_board() {
        // 缺行、短行、对象形式的行、无法识别的格子
        let raw = json!([
            [null, null, null, null, "k"],
            {"3": "p"},
            [],
            [null, 42, "zz"]
        ]);
        let board = normalize_chess_board(&raw);
        assert_eq!(
            board.get_piece(Position::new(0, 4)),
            Some(Piece::new(PieceType::King, Color::Black))
        );
        assert_eq!(
            board.get_piece(Position::new(1, 3)),
            Some(Piece::new(PieceType::Pawn, Color::Black))
        );
        assert_eq!(board.get_all_pieces(None).len(), 2);
    }

    #[test]
    fn test_normalize_non_array_board_is_empty() {
        assert_eq!(normalize_chess_board(&json!("garbage")), Board::empty());
        assert_eq!(normalize_omok_board(&Value::Null), OmokBoard::new());
    }

    #[test]
    fn test_normalize_omok_board() {
        let raw = json!([[null, "b"], [], [null, null, "w", "x"]]);
        let board = normalize_omok_board(&raw);
        assert_eq!(board.get(Position::new(0, 1)), Some(Color::Black));
        assert_eq!(board.get(Position::new(2, 2)), Some(Color::White));
        assert_eq!(board.stone_count(), 2);
    }

    #[test]
    fn test_snapshot_json_accepts_missing_fields_and_aliases() {
        let snap = OmokSnapshot::from_json(r#"{"turn": "w", "lastMove": {"r": 3, "c": 4}}"#)
            .unwrap();
        assert_eq!(snap.turn.as_deref(), Some("w"));
        assert!(!snap.game_over);
        assert_eq!(
            snap.last_move.map(Position::from),
            Some(Position::new(3, 4))
        );
        assert!(ChessSnapshot::from_json("not json").is_err());
    }

    #[test]
    fn test_malformed_fields_fall_back_to_defaults() {
        let chess = ChessSnapshot::from_json(
            r#"{"board": [], "turn": 1, "lastMove": "garbage", "gameOver": null,
                "capturedWhite": "P", "timestamp": -5}"#,
        )
        .unwrap();
        assert_eq!(chess.turn, None);
        assert_eq!(chess.last_move, None);
        assert!(!chess.game_over);
        assert!(chess.captured_white.is_empty());
        assert_eq!(chess.timestamp, 0);

        let omok = OmokSnapshot::from_json(
            r#"{"board": [], "turn": "w", "gameOver": "yes", "winner": ["b"],
                "lastMove": {"row": "x"}}"#,
        )
        .unwrap();
        assert_eq!(omok.turn.as_deref(), Some("w"));
        assert!(!omok.game_over);
        assert_eq!(omok.winner, None);
        assert_eq!(omok.last_move, None);

        // 合法字段照常读取
        let ok =
            OmokSnapshot::from_json(r#"{"gameOver": true, "lastMove": {"r": 3, "c": 4}}"#)
                .unwrap();
        assert!(ok.game_over);
        assert_eq!(ok.last_move, Some(SnapshotSquare { row: 3, col: 4 }));
    }

    #[test]
    fn test_chess_snapshot_field_names() {
        let snap = ChessSnapshot {
            board: chess_board_to_value(&Board::initial()),
            turn: Some("b".to_string()),
            game_over: true,
            captured_white: vec!["P".to_string()],
            ..Default::default()
        };
        let json = snap.to_json().unwrap();
        assert!(json.contains("\"gameOver\":true"));
        assert!(json.contains("\"capturedWhite\":[\"P\"]"));
        assert_eq!(ChessSnapshot::from_json(&json).unwrap(), snap);
    }

    #[test]
    fn test_parse_turn_and_captured() {
        assert_eq!(parse_turn(Some("b"), Color::White), Color::Black);
        assert_eq!(parse_turn(Some("?"), Color::White), Color::White);
        assert_eq!(parse_turn(None, Color::Black), Color::Black);
        let captured = parse_captured(&["q".to_string(), "bad".to_string()]);
        assert_eq!(captured, vec![Piece::new(PieceType::Queen, Color::Black)]);
    }

    #[test]
    fn test_memory_channel_shares_history() {
        let channel: MemoryChannel<u32> = MemoryChannel::new();
        let mut handle = channel.clone();
        handle.publish(&1);
        handle.publish(&2);
        assert_eq!(channel.len(), 2);
        assert_eq!(channel.latest(), Some(2));
        assert_eq!(channel.published(), vec![1, 2]);
    }
}
