//! 五子棋 AI
//!
//! 选点优先级：
//! 1. 低等级（≤2）有 30% 概率随机落子
//! 2. 己方成四（必胜）/ 堵对方成四
//! 3. 等级 ≥3：己方活三 / 堵对方活三
//! 4. 等级 ≥9：候选点上的 Alpha-Beta 搜索
//! 5. 其余：按攻守综合分排序，在前 N 个中随机
//!
//! `ShallowHeuristic` 只执行 1、2、5 步。

use super::board::{OmokBoard, DIRECTIONS};
use super::eval::{evaluate_board, ranked_candidates, FIVE_SCORE};
use super::rules::check_win;
use crate::ai::NODE_COUNT;
use crate::types::{Color, Position};
use rand::prelude::*;
use std::sync::atomic::Ordering;

pub const OMOK_MIN_LEVEL: u8 = 1;
pub const OMOK_MAX_LEVEL: u8 = 12;

const RANDOM_CHANCE: f64 = 0.3;
const RANDOM_MAX_LEVEL: u8 = 2;
const OPEN_THREE_MIN_LEVEL: u8 = 3;
const SEARCH_MIN_LEVEL: u8 = 9;
const DEEP_SEARCH_MIN_LEVEL: u8 = 11;

const ROOT_WIDTH: usize = 15;
const NODE_WIDTH: usize = 10;
const ROOT_DEFENSE: f64 = 0.9;
const NODE_DEFENSE: f64 = 0.8;
const HEURISTIC_DEFENSE: f64 = 0.95;

/// 五子棋 AI 策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OmokStrategy {
    /// 完整策略：成四、活三、搜索、启发式
    #[default]
    DeepForcedMove,
    /// 只看成四与启发式排序
    ShallowHeuristic,
}

impl OmokStrategy {
    pub fn from_name(name: &str) -> Result<Self, String> {
        match name.to_lowercase().as_str() {
            "deep" | "deep_forced_move" | "deepforcedmove" => Ok(OmokStrategy::DeepForcedMove),
            "shallow" | "shallow_heuristic" | "shallowheuristic" => {
                Ok(OmokStrategy::ShallowHeuristic)
            }
            _ => Err(format!(
                "Unknown omok strategy: {}. Available: deep, shallow",
                name
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OmokStrategy::DeepForcedMove => "deep",
            OmokStrategy::ShallowHeuristic => "shallow",
        }
    }
}

/// 五子棋 AI 配置
#[derive(Debug, Clone)]
pub struct OmokAIConfig {
    /// 等级 1..=12
    pub level: u8,
    pub strategy: OmokStrategy,
    pub seed: Option<u64>,
}

impl Default for OmokAIConfig {
    fn default() -> Self {
        OmokAIConfig {
            level: 1,
            strategy: OmokStrategy::DeepForcedMove,
            seed: None,
        }
    }
}

/// 启发式阶段的候选数：等级越高越窄
#[inline]
pub fn top_n(level: u8) -> usize {
    13usize.saturating_sub(level as usize).max(1)
}

/// 搜索深度（含根节点一层）
#[inline]
pub fn search_depth(level: u8) -> u32 {
    if level >= DEEP_SEARCH_MIN_LEVEL {
        4
    } else {
        2
    }
}

/// 按行优先扫描空格，找到第一个使 `color` 连到 `target` 子的点
///
/// `need_open` 为 true 时还要求某个方向上长度不少于 `target` 的连线两端都空。
pub fn find_forced_move(
    board: &mut OmokBoard,
    color: Color,
    target: u8,
    need_open: bool,
) -> Option<Position> {
    for pos in board.empty_cells() {
        let hit = board.trial(pos, color, |b| {
            if b.max_run(pos, color) < target {
                return false;
            }
            !need_open
                || DIRECTIONS.iter().any(|&dir| {
                    let run = b.count_line(pos, dir, color);
                    run.count >= target && run.is_open()
                })
        });
        if hit {
            return Some(pos);
        }
    }
    None
}

/// 根节点搜索：预排序取前 15 个候选，能直接获胜的立即返回
pub fn minimax_root(board: &mut OmokBoard, color: Color, depth: u32) -> Option<Position> {
    let top = ranked_candidates(board, color, ROOT_DEFENSE, ROOT_WIDTH);
    let mut best_move = top.first().map(|(pos, _)| *pos)?;
    let mut best_score = i32::MIN;

    for (pos, _) in top {
        let (won, score) = board.trial(pos, color, |b| {
            if check_win(b, pos, color) {
                (true, FIVE_SCORE)
            } else {
                (
                    false,
                    minimax(b, depth.saturating_sub(1), i32::MIN, i32::MAX, false, color),
                )
            }
        });
        if won {
            return Some(pos);
        }
        if score > best_score {
            best_score = score;
            best_move = pos;
        }
    }
    log::debug!("omok search best {} (score {})", best_move, best_score);
    Some(best_move)
}

/// 候选点上的 Minimax + Alpha-Beta，`ai_color` 为极大方
pub fn minimax(
    board: &mut OmokBoard,
    depth: u32,
    mut alpha: i32,
    mut beta: i32,
    maximizing: bool,
    ai_color: Color,
) -> i32 {
    NODE_COUNT.fetch_add(1, Ordering::Relaxed);

    if depth == 0 {
        return evaluate_board(board, ai_color);
    }

    let side = if maximizing {
        ai_color
    } else {
        ai_color.opposite()
    };
    let top = ranked_candidates(board, side, NODE_DEFENSE, NODE_WIDTH);
    if top.is_empty() {
        return 0;
    }

    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    for (pos, _) in top {
        let outcome = board.trial(pos, side, |b| {
            if check_win(b, pos, side) {
                None
            } else {
                Some(minimax(b, depth - 1, alpha, beta, !maximizing, ai_color))
            }
        });
        let score = match outcome {
            None => return if maximizing { FIVE_SCORE } else { -FIVE_SCORE },
            Some(s) => s,
        };
        if maximizing {
            best = best.max(score);
            alpha = alpha.max(best);
        } else {
            best = best.min(score);
            beta = beta.min(best);
        }
        if beta <= alpha {
            break;
        }
    }
    best
}

/// 五子棋 AI
pub struct OmokAI {
    level: u8,
    strategy: OmokStrategy,
    rng: StdRng,
}

impl OmokAI {
    pub fn new(config: &OmokAIConfig) -> Self {
        let rng = match config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        OmokAI {
            level: config.level.clamp(OMOK_MIN_LEVEL, OMOK_MAX_LEVEL),
            strategy: config.strategy,
            rng,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn set_level(&mut self, level: u8) {
        self.level = level.clamp(OMOK_MIN_LEVEL, OMOK_MAX_LEVEL);
    }

    pub fn strategy(&self) -> OmokStrategy {
        self.strategy
    }

    fn random_move(&mut self, board: &OmokBoard) -> Option<Position> {
        board.empty_cells().choose(&mut self.rng).copied()
    }

    /// 为 `color` 选点；棋盘已满时返回 None
    ///
    /// 搜索期间会临时改动棋盘，返回前全部恢复。
    pub fn select_move(&mut self, board: &mut OmokBoard, color: Color) -> Option<Position> {
        if board.is_full() {
            return None;
        }
        let opponent = color.opposite();
        let deep = self.strategy == OmokStrategy::DeepForcedMove;

        if self.level <= RANDOM_MAX_LEVEL && self.rng.gen::<f64>() < RANDOM_CHANCE {
            let pos = self.random_move(board);
            log::debug!("omok level {} random move {:?}", self.level, pos);
            return pos;
        }

        if let Some(pos) = find_forced_move(board, color, 4, false) {
            log::debug!("omok forced attack {}", pos);
            return Some(pos);
        }
        if let Some(pos) = find_forced_move(board, opponent, 4, false) {
            log::debug!("omok forced block {}", pos);
            return Some(pos);
        }

        if deep && self.level >= OPEN_THREE_MIN_LEVEL {
            if let Some(pos) = find_forced_move(board, color, 3, true) {
                log::debug!("omok open three {}", pos);
                return Some(pos);
            }
            if let Some(pos) = find_forced_move(board, opponent, 3, true) {
                log::debug!("omok block open three {}", pos);
                return Some(pos);
            }
        }

        if deep && self.level >= SEARCH_MIN_LEVEL {
            return minimax_root(board, color, search_depth(self.level));
        }

        let ranked = ranked_candidates(board, color, HEURISTIC_DEFENSE, usize::MAX);
        if ranked.is_empty() {
            return self.random_move(board);
        }
        let top = top_n(self.level).min(ranked.len());
        let (pos, score) = ranked[self.rng.gen_range(0..top)];
        log::debug!(
            "omok level {} heuristic pick {} (score {:.1}, top {})",
            self.level,
            pos,
            score,
            top
        );
        Some(pos)
    }
}
