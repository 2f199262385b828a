//! 五子棋规则：胜负判定与黑方禁手
//!
//! - 黑方恰好五连获胜，长连不算
//! - 白方五连及以上获胜
//! - 黑方禁手：长连（六连及以上）或双活三

use super::board::{OmokBoard, DIRECTIONS};
use crate::types::{Color, Position};

/// 落子后的局面结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OmokOutcome {
    Ongoing,
    Win(Color),
    /// 棋盘下满且无人获胜
    Draw,
}

impl OmokOutcome {
    pub fn is_over(&self) -> bool {
        !matches!(self, OmokOutcome::Ongoing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OmokOutcome::Ongoing => "playing",
            OmokOutcome::Win(Color::Black) => "black_wins",
            OmokOutcome::Win(Color::White) => "white_wins",
            OmokOutcome::Draw => "draw",
        }
    }
}

/// 连线长度是否构成 `color` 的胜利
#[inline]
pub fn is_winning_run(count: u8, color: Color) -> bool {
    match color {
        Color::Black => count == 5,
        Color::White => count >= 5,
    }
}

/// `pos` 处的 `color` 棋子是否连成五
pub fn check_win(board: &OmokBoard, pos: Position, color: Color) -> bool {
    DIRECTIONS
        .iter()
        .any(|&dir| is_winning_run(board.count_line(pos, dir, color).count, color))
}

/// 某方向上是否为活三：恰好三连且两端均为盘内空格
pub fn is_open_three(board: &OmokBoard, pos: Position, dir: (i8, i8), color: Color) -> bool {
    let run = board.count_line(pos, dir, color);
    run.count == 3 && run.is_open()
}

fn is_overline(board: &OmokBoard, pos: Position, color: Color) -> bool {
    DIRECTIONS
        .iter()
        .any(|&dir| board.count_line(pos, dir, color).count > 5)
}

fn is_double_three(board: &OmokBoard, pos: Position, color: Color) -> bool {
    DIRECTIONS
        .iter()
        .filter(|&&dir| is_open_three(board, pos, dir, color))
        .count()
        >= 2
}

/// 在空格 `pos` 落 `color` 是否为禁手（只限制黑方）
///
/// 已有棋子或越界的格子不算禁手，由调用方另行拒绝。
pub fn is_forbidden(board: &mut OmokBoard, pos: Position, color: Color) -> bool {
    if color != Color::Black || !board.is_empty_at(pos) {
        return false;
    }
    board.trial(pos, color, |b| {
        is_overline(b, pos, color) || is_double_three(b, pos, color)
    })
}

/// 在 `pos` 落下 `color` 之后的结果
pub fn outcome_after(board: &OmokBoard, pos: Position, color: Color) -> OmokOutcome {
    if check_win(board, pos, color) {
        OmokOutcome::Win(color)
    } else if board.is_full() {
        OmokOutcome::Draw
    } else {
        OmokOutcome::Ongoing
    }
}
