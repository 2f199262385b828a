//! Chess & Omok AI Engine
//!
//! 国际象棋与五子棋的规则引擎和 AI，附带对局会话与联机快照

pub mod ai;
pub mod board;
pub mod fen;
pub mod omok;
pub mod session;
pub mod sync;
pub mod test_positions;
pub mod types;

pub use ai::{
    get_node_count, reset_node_count, AIConfig, AIStrategy, CenterWeightedEval, ChessAI,
    ClassicEval, EvalStrategy, Evaluator, ScoredMove,
};
pub use board::{get_legal_moves_from_fen, Board};
pub use fen::{apply_move_to_fen, board_to_fen, parse_fen, FenState};
pub use omok::{OmokAI, OmokAIConfig, OmokBoard, OmokSession, OmokStrategy};
pub use session::{ChessSession, ClickOutcome, MoveRecord};
pub use sync::{ChessSnapshot, MemoryChannel, OmokSnapshot, SnapshotChannel};
pub use types::{ChessMove, Color, GameMode, GameStatus, Piece, PieceType, Position};
