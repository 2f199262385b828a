//! 中心加权评估：子力价值 + 中心控制 + 兵的推进

use super::Evaluator;
use crate::board::Board;
use crate::types::{Color, PieceType};

const CENTER_WEIGHT: i32 = 10;
const PAWN_ADVANCE_WEIGHT: i32 = 5;

/// 所在环：中心 4 格为 0，最外圈为 3
#[inline]
fn ring(row: i8, col: i8) -> i32 {
    let dr = (2 * row as i32 - 7).abs() / 2;
    let dc = (2 * col as i32 - 7).abs() / 2;
    dr.max(dc)
}

/// 中心加权评估
#[derive(Debug, Clone, Copy, Default)]
pub struct CenterWeightedEval;

impl Evaluator for CenterWeightedEval {
    fn evaluate(&self, board: &Board, perspective: Color) -> i32 {
        let mut score = 0;
        for (pos, piece) in board.get_all_pieces(None) {
            let mut value = piece.kind.value();
            match piece.kind {
                PieceType::King => {}
                PieceType::Pawn => {
                    let progress = match piece.color {
                        Color::White => 6 - pos.row as i32,
                        Color::Black => pos.row as i32 - 1,
                    };
                    value += progress * PAWN_ADVANCE_WEIGHT;
                    value += (3 - ring(pos.row, pos.col)) * CENTER_WEIGHT;
                }
                _ => value += (3 - ring(pos.row, pos.col)) * CENTER_WEIGHT,
            }
            if piece.color == perspective {
                score += value;
            } else {
                score -= value;
            }
        }
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::parse_fen;

    #[test]
    fn test_ring() {
        assert_eq!(ring(3, 3), 0);
        assert_eq!(ring(4, 4), 0);
        assert_eq!(ring(2, 5), 1);
        assert_eq!(ring(0, 7), 3);
    }

    #[test]
    fn test_centralized_knight_scores_higher() {
        let edge = parse_fen("k7/8/8/8/8/8/8/N6K w").unwrap();
        let center = parse_fen("k7/8/8/8/3N4/8/8/7K w").unwrap();
        assert!(
            CenterWeightedEval.evaluate(&center.board, Color::White)
                > CenterWeightedEval.evaluate(&edge.board, Color::White)
        );
    }

    #[test]
    fn test_initial_position_is_balanced() {
        let board = Board::initial();
        assert_eq!(CenterWeightedEval.evaluate(&board, Color::White), 0);
    }
}
