//! FEN 解析与生成
//!
//! 只使用标准 FEN 的前两段：棋子布局 + 行棋方，例如
//! `rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w`。
//! 其余字段（易位权、过路兵、回合数）可以存在，但会被忽略。

use crate::board::Board;
use crate::types::{ChessMove, Color, Piece};

/// 初始局面
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w";

/// FEN 解析结果
#[derive(Debug, Clone)]
pub struct FenState {
    pub board: Board,
    pub turn: Color,
}

/// 解析 FEN 字符串，行棋方缺省为白方
pub fn parse_fen(fen: &str) -> Result<FenState, String> {
    let mut parts = fen.split_whitespace();
    let placement = parts.next().ok_or_else(|| "Empty FEN".to_string())?;

    let turn = match parts.next() {
        None => Color::White,
        Some(s) => {
            let mut chars = s.chars();
            match (chars.next().and_then(Color::from_char), chars.next()) {
                (Some(c), None) => c,
                _ => return Err(format!("Invalid turn: {}", s)),
            }
        }
    };

    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != 8 {
        return Err(format!("Expected 8 rows, got {}", rows.len()));
    }

    let mut squares = [[None; 8]; 8];
    for (row, row_str) in rows.iter().enumerate() {
        let mut col = 0usize;
        for ch in row_str.chars() {
            if let Some(d) = ch.to_digit(10) {
                if !(1..=8).contains(&d) {
                    return Err(format!("Invalid empty count: {}", ch));
                }
                col += d as usize;
            } else {
                let piece =
                    Piece::from_fen_char(ch).ok_or_else(|| format!("Invalid piece char: {}", ch))?;
                if col >= 8 {
                    return Err(format!("Row {} has more than 8 columns", row));
                }
                squares[row][col] = Some(piece);
                col += 1;
            }
        }
        if col != 8 {
            return Err(format!("Row {} has {} columns, expected 8", row, col));
        }
    }

    Ok(FenState {
        board: Board::from_squares(squares),
        turn,
    })
}

/// 从棋盘生成 FEN 字符串
pub fn board_to_fen(board: &Board, turn: Color) -> String {
    let mut rows = Vec::with_capacity(8);

    for row in board.squares() {
        let mut row_str = String::new();
        let mut empty_count = 0;

        for square in row {
            match square {
                Some(piece) => {
                    if empty_count > 0 {
                        row_str.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    row_str.push(piece.to_fen_char());
                }
                None => empty_count += 1,
            }
        }

        if empty_count > 0 {
            row_str.push_str(&empty_count.to_string());
        }
        rows.push(row_str);
    }

    format!("{} {}", rows.join("/"), turn.to_char())
}

/// 在 FEN 上执行合法走法，返回新的 FEN
pub fn apply_move_to_fen(fen: &str, move_str: &str) -> Result<String, String> {
    let state = parse_fen(fen)?;
    let mv = ChessMove::from_uci_str(move_str)
        .ok_or_else(|| format!("Invalid move string: {}", move_str))?;

    if !state.board.get_legal_moves(state.turn).contains(&mv) {
        return Err(format!("Illegal move: {}", move_str));
    }

    let mut board = state.board;
    board.apply_move(&mv);
    Ok(board_to_fen(&board, state.turn.opposite()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PieceType, Position};

    #[test]
    fn test_parse_start_fen() {
        let state = parse_fen(START_FEN).unwrap();
        assert_eq!(state.turn, Color::White);
        assert_eq!(state.board, Board::initial());
    }

    #[test]
    fn test_fen_roundtrip() {
        let fen = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w";
        let state = parse_fen(fen).unwrap();
        assert_eq!(board_to_fen(&state.board, state.turn), fen);
    }

    #[test]
    fn test_parse_ignores_trailing_fields() {
        let state = parse_fen("8/8/8/8/8/8/8/4K2k b KQkq - 0 1").unwrap();
        assert_eq!(state.turn, Color::Black);
        assert_eq!(
            state.board.get_piece(Position::new(7, 4)),
            Some(Piece::new(PieceType::King, Color::White))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_fen("").is_err());
        assert!(parse_fen("8/8/8/8/8/8/8 w").is_err());
        assert!(parse_fen("8/8/8/8/8/8/8/7 w").is_err());
        assert!(parse_fen("8/8/8/8/8/8/8/4X3 w").is_err());
        assert!(parse_fen("8/8/8/8/8/8/8/8 x").is_err());
    }

    #[test]
    fn test_apply_move() {
        let new_fen = apply_move_to_fen(START_FEN, "e2e4").unwrap();
        assert_eq!(
            new_fen,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b"
        );
        assert!(apply_move_to_fen(START_FEN, "e2e5").is_err());
        assert!(apply_move_to_fen(START_FEN, "e7e5").is_err());
    }
}
