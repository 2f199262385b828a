//! Alpha-Beta 搜索
//!
//! AI 一方为极大层。每个分支在独立的棋盘副本上走子。

use super::{Evaluator, ScoredMove, NODE_COUNT};
use crate::board::Board;
use crate::types::Color;
use std::sync::atomic::Ordering;

/// 将杀分数
pub const MATE_SCORE: i32 = 99_999;

/// 将杀分数按剩余深度修正，越快的杀越好
const MATE_HORIZON: i32 = 4;

/// Minimax + Alpha-Beta 剪枝
///
/// `maximizing` 为 true 时轮到 `ai_color` 走。深度为 0 时返回
/// `ai_color` 视角的静态评估；无合法走法时返回将杀分或 0（逼和）。
pub fn alpha_beta(
    board: &Board,
    depth: u32,
    mut alpha: i32,
    mut beta: i32,
    maximizing: bool,
    ai_color: Color,
    evaluator: &dyn Evaluator,
) -> i32 {
    NODE_COUNT.fetch_add(1, Ordering::Relaxed);

    if depth == 0 {
        return evaluator.evaluate(board, ai_color);
    }

    let side = if maximizing {
        ai_color
    } else {
        ai_color.opposite()
    };
    let moves = board.get_legal_moves(side);

    if moves.is_empty() {
        if board.is_in_check(side) {
            let adjust = MATE_HORIZON - depth as i32;
            return if maximizing {
                -MATE_SCORE + adjust
            } else {
                MATE_SCORE - adjust
            };
        }
        return 0;
    }

    if maximizing {
        let mut best = i32::MIN;
        for mv in &moves {
            let mut next = *board;
            next.apply_move(mv);
            best = best.max(alpha_beta(
                &next,
                depth - 1,
                alpha,
                beta,
                false,
                ai_color,
                evaluator,
            ));
            alpha = alpha.max(best);
            if beta <= alpha {
                break;
            }
        }
        best
    } else {
        let mut best = i32::MAX;
        for mv in &moves {
            let mut next = *board;
            next.apply_move(mv);
            best = best.min(alpha_beta(
                &next,
                depth - 1,
                alpha,
                beta,
                true,
                ai_color,
                evaluator,
            ));
            beta = beta.min(best);
            if beta <= alpha {
                break;
            }
        }
        best
    }
}

/// 对根节点的每个合法走法打分（保持生成顺序）
///
/// 每个根走法使用完整窗口独立搜索 `depth` 层。
pub fn search_root(
    board: &Board,
    color: Color,
    depth: u32,
    evaluator: &dyn Evaluator,
) -> Vec<ScoredMove> {
    board
        .get_legal_moves(color)
        .into_iter()
        .map(|mv| {
            let mut next = *board;
            next.apply_move(&mv);
            let score = alpha_beta(&next, depth, i32::MIN, i32::MAX, false, color, evaluator);
            ScoredMove { mv, score }
        })
        .collect()
}

/// 取最高分走法，同分时先出现者优先
pub fn pick_best(scored: &[ScoredMove]) -> Option<ScoredMove> {
    let mut best: Option<ScoredMove> = None;
    for sm in scored {
        if best.map_or(true, |b| sm.score > b.score) {
            best = Some(*sm);
        }
    }
    best
}
