//! 五子棋评估
//!
//! 棋型分表同时用于候选点排序与整盘评估。

use super::board::{OmokBoard, DIRECTIONS, OMOK_SIZE};
use crate::types::{Color, Position};

/// 五连
pub const FIVE_SCORE: i32 = 100_000;

/// 棋型分：连线长度 + 开放端数
pub fn pattern_score(count: u8, open_ends: u8) -> i32 {
    match (count, open_ends) {
        (c, _) if c >= 5 => FIVE_SCORE,
        (4, 2) => 50_000,
        (4, 1) => 5_000,
        (3, 2) => 3_000,
        (3, 1) => 500,
        (2, 2) => 200,
        (2, 1) => 50,
        (1, 2) => 10,
        _ => 0,
    }
}

/// 已有棋子在四个方向上的棋型分之和
pub fn evaluate_stone(board: &OmokBoard, pos: Position, color: Color) -> i32 {
    DIRECTIONS
        .iter()
        .map(|&dir| {
            let run = board.count_line(pos, dir, color);
            pattern_score(run.count, run.open_ends())
        })
        .sum()
}

/// 整盘评估：`perspective` 一方棋子得分减去对方棋子得分
pub fn evaluate_board(board: &OmokBoard, perspective: Color) -> i32 {
    board
        .stones()
        .into_iter()
        .map(|(pos, color)| {
            let score = evaluate_stone(board, pos, color);
            if color == perspective {
                score
            } else {
                -score
            }
        })
        .sum()
}

/// 离天元越近分越高，天元为 14
#[inline]
pub fn center_bonus(pos: Position) -> i32 {
    let mid = (OMOK_SIZE / 2) as i32;
    (mid - (pos.row as i32 - mid).abs()) + (mid - (pos.col as i32 - mid).abs())
}

/// 空格 `pos` 对 `color` 的落点价值
///
/// 每个方向向两侧各看至多 4 格，遇到空格记一个开放端并停止，
/// 遇到对方棋子或边界直接停止。结果加上中心加成。
pub fn evaluate_position(board: &OmokBoard, pos: Position, color: Color) -> i32 {
    let mut score = 0;
    for &(dr, dc) in DIRECTIONS.iter() {
        let mut count = 1u8;
        let mut open_ends = 0u8;
        for sign in [1i8, -1] {
            for step in 1..5i8 {
                let cell = pos.offset(dr * step * sign, dc * step * sign);
                if !cell.within(OMOK_SIZE) {
                    break;
                }
                match board.get(cell) {
                    Some(c) if c == color => count += 1,
                    None => {
                        open_ends += 1;
                        break;
                    }
                    Some(_) => break,
                }
            }
        }
        score += pattern_score(count, open_ends);
    }
    score + center_bonus(pos)
}

/// 攻守综合分：己方价值 + 对方价值 × `defense_weight`
#[inline]
pub fn heuristic_score(board: &OmokBoard, pos: Position, color: Color, defense_weight: f64) -> f64 {
    evaluate_position(board, pos, color) as f64
        + evaluate_position(board, pos, color.opposite()) as f64 * defense_weight
}

/// 候选点：已有棋子周围两格（切比雪夫距离）内的空格
///
/// 按棋子的行优先顺序展开、去重；棋盘为空时只有天元。
pub fn candidate_moves(board: &OmokBoard) -> Vec<Position> {
    let stones = board.stones();
    if stones.is_empty() {
        return vec![OmokBoard::center()];
    }

    let mut seen = [[false; 15]; 15];
    let mut candidates = Vec::new();
    for (stone, _) in stones {
        for dr in -2..=2 {
            for dc in -2..=2 {
                let pos = stone.offset(dr, dc);
                if !board.is_empty_at(pos) {
                    continue;
                }
                let mark = &mut seen[pos.row as usize][pos.col as usize];
                if *mark {
                    continue;
                }
                *mark = true;
                candidates.push(pos);
            }
        }
    }
    candidates
}

/// 候选点按综合分降序排列（稳定排序），保留前 `limit` 个
pub fn ranked_candidates(
    board: &OmokBoard,
    color: Color,
    defense_weight: f64,
    limit: usize,
) -> Vec<(Position, f64)> {
    let mut scored: Vec<(Position, f64)> = candidate_moves(board)
        .into_iter()
        .map(|pos| (pos, heuristic_score(board, pos, color, defense_weight)))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(limit);
    scored
}
