//! 国际象棋 AI 模块
//!
//! 两套评估配置：
//! - `Classic`：子力 + 棋子位置表，三个等级分别是 1 层贪心、2 层 / 3 层 Alpha-Beta
//! - `CenterWeighted`：子力 + 中心控制，等级阈值更宽松
//!
//! 每个等级由 `LevelPolicy` 描述：先按概率随机走一步，否则执行贪心或搜索。

mod alphabeta;
mod center;
mod classic;

pub use alphabeta::{alpha_beta, pick_best, search_root, MATE_SCORE};
pub use center::CenterWeightedEval;
pub use classic::ClassicEval;

use crate::board::Board;
use crate::types::{ChessMove, Color};
use rand::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// 全局节点计数器
pub static NODE_COUNT: AtomicU64 = AtomicU64::new(0);

/// 重置节点计数器
pub fn reset_node_count() {
    NODE_COUNT.store(0, AtomicOrdering::Relaxed);
}

/// 获取当前节点计数
pub fn get_node_count() -> u64 {
    NODE_COUNT.load(AtomicOrdering::Relaxed)
}

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 3;

/// 静态评估接口：分数为正表示对 `perspective` 一方有利
pub trait Evaluator {
    fn evaluate(&self, board: &Board, perspective: Color) -> i32;
}

/// 评估配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvalStrategy {
    #[default]
    Classic,
    CenterWeighted,
}

/// 等级对应的选步方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePolicy {
    /// 按 1 层静态评估排序，在前 N 个中均匀随机
    GreedyTop(usize),
    /// 根节点走完后再搜索 depth 层，取最高分（同分取先出现者）
    Search(u32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelPolicy {
    /// 完全随机走子的概率
    pub random_chance: f64,
    pub policy: MovePolicy,
}

impl EvalStrategy {
    pub fn from_name(name: &str) -> Result<Self, String> {
        match name.to_lowercase().as_str() {
            "classic" | "classic_eval" => Ok(EvalStrategy::Classic),
            "center" | "center_weighted" | "centerweighted" => Ok(EvalStrategy::CenterWeighted),
            _ => Err(format!(
                "Unknown eval strategy: {}. Available: classic, center",
                name
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EvalStrategy::Classic => "classic",
            EvalStrategy::CenterWeighted => "center",
        }
    }

    pub fn evaluator(&self) -> Box<dyn Evaluator> {
        match self {
            EvalStrategy::Classic => Box::new(ClassicEval),
            EvalStrategy::CenterWeighted => Box::new(CenterWeightedEval),
        }
    }

    /// 等级策略表（等级超出范围时截断到 1..=3）
    pub fn level_policy(&self, level: u8) -> LevelPolicy {
        let level = level.clamp(MIN_LEVEL, MAX_LEVEL);
        match (self, level) {
            (EvalStrategy::Classic, 1) => LevelPolicy {
                random_chance: 0.5,
                policy: MovePolicy::GreedyTop(5),
            },
            (EvalStrategy::Classic, 2) => LevelPolicy {
                random_chance: 0.15,
                policy: MovePolicy::Search(2),
            },
            (EvalStrategy::Classic, _) => LevelPolicy {
                random_chance: 0.0,
                policy: MovePolicy::Search(3),
            },
            (EvalStrategy::CenterWeighted, 1) => LevelPolicy {
                random_chance: 0.3,
                policy: MovePolicy::GreedyTop(3),
            },
            (EvalStrategy::CenterWeighted, 2) => LevelPolicy {
                random_chance: 0.1,
                policy: MovePolicy::Search(1),
            },
            (EvalStrategy::CenterWeighted, _) => LevelPolicy {
                random_chance: 0.0,
                policy: MovePolicy::Search(2),
            },
        }
    }
}

/// AI 配置
#[derive(Debug, Clone)]
pub struct AIConfig {
    /// 等级 1..=3
    pub level: u8,
    pub eval: EvalStrategy,
    /// 随机种子
    pub seed: Option<u64>,
}

impl Default for AIConfig {
    fn default() -> Self {
        AIConfig {
            level: 1,
            eval: EvalStrategy::Classic,
            seed: None,
        }
    }
}

/// 走法评分
#[derive(Debug, Clone, Copy)]
pub struct ScoredMove {
    pub mv: ChessMove,
    pub score: i32,
}

/// AI 策略接口
pub trait AIStrategy {
    /// 为 `color` 选择一步走法，无合法走法时返回 None
    fn select_move(&mut self, board: &Board, color: Color) -> Option<ChessMove>;
}

/// 按分数降序排序（稳定排序，同分保持生成顺序）
pub(crate) fn sort_scored(scored: &mut [ScoredMove]) {
    scored.sort_by(|a, b| b.score.cmp(&a.score));
}

/// 每步走完后的 1 层静态评估，按分数降序
pub fn score_one_ply(
    board: &Board,
    color: Color,
    moves: &[ChessMove],
    evaluator: &dyn Evaluator,
) -> Vec<ScoredMove> {
    let mut scored: Vec<ScoredMove> = moves
        .iter()
        .map(|mv| {
            let mut after = *board;
            after.apply_move(mv);
            ScoredMove {
                mv: *mv,
                score: evaluator.evaluate(&after, color),
            }
        })
        .collect();
    sort_scored(&mut scored);
    scored
}

/// 国际象棋 AI
pub struct ChessAI {
    level: u8,
    eval: EvalStrategy,
    evaluator: Box<dyn Evaluator>,
    rng: StdRng,
}

impl ChessAI {
    pub fn new(config: &AIConfig) -> Self {
        let rng = match config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        ChessAI {
            level: config.level.clamp(MIN_LEVEL, MAX_LEVEL),
            eval: config.eval,
            evaluator: config.eval.evaluator(),
            rng,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn set_level(&mut self, level: u8) {
        self.level = level.clamp(MIN_LEVEL, MAX_LEVEL);
    }

    pub fn eval_strategy(&self) -> EvalStrategy {
        self.eval
    }

    pub fn evaluator(&self) -> &dyn Evaluator {
        self.evaluator.as_ref()
    }

    /// 当前等级下的候选评分（调试与 CLI 输出用，不含随机分支）
    pub fn rank_moves(&self, board: &Board, color: Color) -> Vec<ScoredMove> {
        let moves = board.get_legal_moves(color);
        match self.eval.level_policy(self.level).policy {
            MovePolicy::GreedyTop(_) => score_one_ply(board, color, &moves, self.evaluator()),
            MovePolicy::Search(depth) => {
                let mut scored = search_root(board, color, depth, self.evaluator());
                sort_scored(&mut scored);
                scored
            }
        }
    }

    /// 按给定等级策略选步：先掷随机分支，再执行贪心前 N 或搜索
    pub fn select_with_policy(
        &mut self,
        board: &Board,
        color: Color,
        policy: LevelPolicy,
    ) -> Option<ChessMove> {
        let moves = board.get_legal_moves(color);
        if moves.is_empty() {
            return None;
        }

        if policy.random_chance > 0.0 && self.rng.gen::<f64>() < policy.random_chance {
            let mv = moves.choose(&mut self.rng).copied();
            log::debug!("level {} random move {:?}", self.level, mv);
            return mv;
        }

        match policy.policy {
            MovePolicy::GreedyTop(n) => {
                let scored = score_one_ply(board, color, &moves, self.evaluator());
                let top = n.clamp(1, scored.len());
                let pick = scored[self.rng.gen_range(0..top)];
                log::debug!(
                    "level {} greedy pick {} (score {})",
                    self.level,
                    pick.mv,
                    pick.score
                );
                Some(pick.mv)
            }
            MovePolicy::Search(depth) => {
                let scored = search_root(board, color, depth, self.evaluator());
                let best = pick_best(&scored)?;
                log::debug!(
                    "level {} search depth {} best {} (score {}, nodes {})",
                    self.level,
                    depth,
                    best.mv,
                    best.score,
                    get_node_count()
                );
                Some(best.mv)
            }
        }
    }
}

impl AIStrategy for ChessAI {
    fn select_move(&mut self, board: &Board, color: Color) -> Option<ChessMove> {
        let policy = self.eval.level_policy(self.level);
        self.select_with_policy(board, color, policy)
    }
}
