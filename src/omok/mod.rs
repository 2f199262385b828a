//! 五子棋（连珠简化规则）
//!
//! 15x15 棋盘，黑方先行。黑方恰好五连获胜且受禁手限制，白方五连及以上获胜。

pub mod ai;
pub mod board;
pub mod eval;
pub mod rules;
pub mod session;

pub use ai::{OmokAI, OmokAIConfig, OmokStrategy, OMOK_MAX_LEVEL, OMOK_MIN_LEVEL};
pub use board::{LineRun, OmokBoard, DIRECTIONS, OMOK_SIZE};
pub use eval::{evaluate_board, evaluate_position, pattern_score};
pub use rules::{check_win, is_forbidden, outcome_after, OmokOutcome};
pub use session::{OmokSession, PlaceOutcome};
