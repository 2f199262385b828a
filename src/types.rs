//! 核心类型定义
//!
//! 国际象棋与五子棋共用的颜色、坐标，以及国际象棋的棋子、走法与局面状态

use serde::{Deserialize, Serialize};
use std::fmt;

/// 棋子/棋石颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// 获取对方颜色
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// 从单字符解析（'w' / 'b'）
    pub fn from_char(c: char) -> Option<Color> {
        match c.to_ascii_lowercase() {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    /// 从名称解析，接受 "w"、"white"、"b"、"black"
    pub fn from_name(s: &str) -> Option<Color> {
        match s.trim().to_lowercase().as_str() {
            "w" | "white" => Some(Color::White),
            "b" | "black" => Some(Color::Black),
            _ => None,
        }
    }

    /// 转换为单字符
    pub fn to_char(&self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    /// 从 FEN 字符解析（大小写均可）
    pub fn from_fen_char(c: char) -> Option<PieceType> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'r' => Some(PieceType::Rook),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }

    /// 转换为 FEN 字符（小写）
    pub fn to_fen_char(&self) -> char {
        match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        }
    }

    /// 子力价值
    pub fn value(&self) -> i32 {
        match self {
            PieceType::Pawn => 100,
            PieceType::Knight => 320,
            PieceType::Bishop => 330,
            PieceType::Rook => 500,
            PieceType::Queen => 900,
            PieceType::King => 20000,
        }
    }

    /// 表索引：兵、马、象、车、后、王
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            PieceType::Pawn => 0,
            PieceType::Knight => 1,
            PieceType::Bishop => 2,
            PieceType::Rook => 3,
            PieceType::Queen => 4,
            PieceType::King => 5,
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceType::Pawn => "Pawn",
            PieceType::Knight => "Knight",
            PieceType::Bishop => "Bishop",
            PieceType::Rook => "Rook",
            PieceType::Queen => "Queen",
            PieceType::King => "King",
        };
        write!(f, "{}", name)
    }
}

/// 棋子：类型 + 颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceType,
    pub color: Color,
}

impl Piece {
    pub fn new(kind: PieceType, color: Color) -> Self {
        Piece { kind, color }
    }

    /// 从 FEN 字符解析：大写为白方，小写为黑方
    pub fn from_fen_char(c: char) -> Option<Piece> {
        let kind = PieceType::from_fen_char(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece { kind, color })
    }

    pub fn to_fen_char(&self) -> char {
        let ch = self.kind.to_fen_char();
        match self.color {
            Color::White => ch.to_ascii_uppercase(),
            Color::Black => ch,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen_char())
    }
}

/// 棋盘位置 (row, col)
///
/// 国际象棋：row 0 是黑方底线（第 8 横排），row 7 是白方底线（第 1 横排）
/// 五子棋：15x15，(7, 7) 为天元
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub fn new(row: i8, col: i8) -> Self {
        Position { row, col }
    }

    /// 检查位置是否在 size x size 的棋盘内
    #[inline]
    pub fn within(&self, size: i8) -> bool {
        (0..size).contains(&self.row) && (0..size).contains(&self.col)
    }

    /// 位置加偏移量（饱和加法，越界后由 `within` 判定）
    #[inline]
    pub fn offset(&self, row_delta: i8, col_delta: i8) -> Position {
        Position {
            row: self.row.saturating_add(row_delta),
            col: self.col.saturating_add(col_delta),
        }
    }

    /// 从国际象棋坐标解析（如 "e2"）
    pub fn from_algebraic(s: &str) -> Option<Position> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let col = match bytes[0] {
            b'a'..=b'h' => (bytes[0] - b'a') as i8,
            _ => return None,
        };
        let row = match bytes[1] {
            b'1'..=b'8' => 8 - (bytes[1] - b'0') as i8,
            _ => return None,
        };
        Some(Position { row, col })
    }

    /// 转换为国际象棋坐标（如 "e2"）
    pub fn to_algebraic(&self) -> String {
        let file = (b'a' + self.col as u8) as char;
        format!("{}{}", file, 8 - self.row)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// 国际象棋走法
///
/// 不区分吃子、升变：落点内容在执行时推断
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChessMove {
    pub from: Position,
    pub to: Position,
}

impl ChessMove {
    pub fn new(from: Position, to: Position) -> Self {
        ChessMove { from, to }
    }

    /// 从坐标走法字符串解析（如 "e2e4"）
    pub fn from_uci_str(s: &str) -> Option<ChessMove> {
        let s = s.trim();
        if s.len() != 4 || !s.is_ascii() {
            return None;
        }
        let from = Position::from_algebraic(&s[0..2])?;
        let to = Position::from_algebraic(&s[2..4])?;
        Some(ChessMove { from, to })
    }

    pub fn to_uci_str(&self) -> String {
        format!("{}{}", self.from.to_algebraic(), self.to.to_algebraic())
    }
}

impl fmt::Display for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci_str())
    }
}

/// 国际象棋局面状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Playing,
    Check,
    Checkmate,
    Stalemate,
}

impl GameStatus {
    /// 是否终局
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameStatus::Checkmate | GameStatus::Stalemate)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Playing => "playing",
            GameStatus::Check => "check",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
        }
    }
}

/// 对局模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// 人机对战
    Ai,
    /// 双人对战（联机同步）
    Pvp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_from_algebraic() {
        assert_eq!(Position::from_algebraic("a8"), Some(Position::new(0, 0)));
        assert_eq!(Position::from_algebraic("e1"), Some(Position::new(7, 4)));
        assert_eq!(Position::from_algebraic("h1"), Some(Position::new(7, 7)));
        assert_eq!(Position::from_algebraic("i1"), None);
        assert_eq!(Position::from_algebraic("a9"), None);
    }

    #[test]
    fn test_offset_saturates_at_extremes() {
        let far = Position::new(127, -128).offset(1, -1);
        assert_eq!(far, Position::new(127, -128));
        assert!(!far.within(8));
        assert_eq!(Position::new(3, 4).offset(-1, 2), Position::new(2, 6));
    }

    #[test]
    fn test_position_to_algebraic() {
        assert_eq!(Position::new(0, 0).to_algebraic(), "a8");
        assert_eq!(Position::new(6, 4).to_algebraic(), "e2");
    }

    #[test]
    fn test_move_from_uci_str() {
        let mv = ChessMove::from_uci_str("e2e4").unwrap();
        assert_eq!(mv.from, Position::new(6, 4));
        assert_eq!(mv.to, Position::new(4, 4));
        assert_eq!(mv.to_string(), "e2e4");

        assert!(ChessMove::from_uci_str("e2e").is_none());
        assert!(ChessMove::from_uci_str("z2e4").is_none());
    }

    #[test]
    fn test_piece_case_encodes_color() {
        let white_queen = Piece::from_fen_char('Q').unwrap();
        assert_eq!(white_queen, Piece::new(PieceType::Queen, Color::White));
        let black_knight = Piece::from_fen_char('n').unwrap();
        assert_eq!(black_knight, Piece::new(PieceType::Knight, Color::Black));
        assert!(Piece::from_fen_char('x').is_none());
    }

    #[test]
    fn test_color_from_name() {
        assert_eq!(Color::from_name("White"), Some(Color::White));
        assert_eq!(Color::from_name("b"), Some(Color::Black));
        assert_eq!(Color::from_name("red"), None);
    }
}
