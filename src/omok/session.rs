//! 五子棋对局：黑方先行，人机模式下人类执黑、AI 执白

use super::ai::{OmokAI, OmokAIConfig};
use super::board::OmokBoard;
use super::rules::{is_forbidden, outcome_after, OmokOutcome};
use crate::sync::{
    normalize_omok_board, now_millis, omok_board_to_value, parse_turn, OmokSnapshot,
    SnapshotChannel,
};
use crate::types::{Color, GameMode, Position};

/// 落子结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOutcome {
    /// 当前不接受输入、格子被占或越界
    Rejected,
    /// 黑方禁手
    Forbidden,
    Placed,
    Won(Color),
    Draw,
}

pub struct OmokSession {
    board: OmokBoard,
    turn: Color,
    mode: GameMode,
    ai_color: Color,
    outcome: OmokOutcome,
    last_move: Option<Position>,
    ai_thinking: bool,
    ai: OmokAI,
    channel: Option<Box<dyn SnapshotChannel<OmokSnapshot>>>,
}

impl OmokSession {
    pub fn new(mode: GameMode, config: &OmokAIConfig) -> Self {
        OmokSession {
            board: OmokBoard::new(),
            turn: Color::Black,
            mode,
            ai_color: Color::White,
            outcome: OmokOutcome::Ongoing,
            last_move: None,
            ai_thinking: false,
            ai: OmokAI::new(config),
            channel: None,
        }
    }

    /// 从指定局面开始
    pub fn from_position(board: OmokBoard, turn: Color, mode: GameMode, config: &OmokAIConfig) -> Self {
        let mut session = OmokSession::new(mode, config);
        session.board = board;
        session.turn = turn;
        session
    }

    pub fn attach_channel(&mut self, channel: Box<dyn SnapshotChannel<OmokSnapshot>>) {
        self.channel = Some(channel);
    }

    /// 清空棋盘重新开局（联机模式推送空盘）
    pub fn restart(&mut self) {
        self.board = OmokBoard::new();
        self.turn = Color::Black;
        self.outcome = OmokOutcome::Ongoing;
        self.last_move = None;
        self.ai_thinking = false;
        self.publish();
    }

    pub fn board(&self) -> &OmokBoard {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn level(&self) -> u8 {
        self.ai.level()
    }

    pub fn set_level(&mut self, level: u8) {
        self.ai.set_level(level);
    }

    pub fn outcome(&self) -> OmokOutcome {
        self.outcome
    }

    pub fn winner(&self) -> Option<Color> {
        match self.outcome {
            OmokOutcome::Win(color) => Some(color),
            _ => None,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome.is_over()
    }

    pub fn last_move(&self) -> Option<Position> {
        self.last_move
    }

    pub fn is_ai_thinking(&self) -> bool {
        self.ai_thinking
    }

    /// 人类点击落子
    pub fn handle_click(&mut self, pos: Position) -> PlaceOutcome {
        if self.is_game_over() || self.ai_thinking || !self.board.is_empty_at(pos) {
            return PlaceOutcome::Rejected;
        }
        if self.mode == GameMode::Ai && self.turn == self.ai_color {
            return PlaceOutcome::Rejected;
        }
        if is_forbidden(&mut self.board, pos, self.turn) {
            log::debug!("forbidden move at {}", pos);
            return PlaceOutcome::Forbidden;
        }
        self.make_move(pos)
    }

    /// 当前行棋方在 `pos` 落子（不检查禁手）
    ///
    /// 获胜时行棋方保持为胜者，否则交换。
    pub fn make_move(&mut self, pos: Position) -> PlaceOutcome {
        if self.is_game_over() || !self.board.place(pos, self.turn) {
            return PlaceOutcome::Rejected;
        }
        self.last_move = Some(pos);
        self.outcome = outcome_after(&self.board, pos, self.turn);

        let result = match self.outcome {
            OmokOutcome::Win(color) => {
                log::info!("omok game over: {} wins at {}", color, pos);
                PlaceOutcome::Won(color)
            }
            OmokOutcome::Draw => {
                log::info!("omok game over: board full, draw");
                PlaceOutcome::Draw
            }
            OmokOutcome::Ongoing => {
                self.turn = self.turn.opposite();
                PlaceOutcome::Placed
            }
        };
        self.publish();
        result
    }

    pub fn is_ai_turn(&self) -> bool {
        self.mode == GameMode::Ai && !self.is_game_over() && self.turn == self.ai_color
    }

    pub fn begin_ai_turn(&mut self) -> bool {
        if !self.is_ai_turn() || self.ai_thinking {
            return false;
        }
        self.ai_thinking = true;
        true
    }

    /// 计算并执行 AI 落子，返回落点与结果
    pub fn complete_ai_turn(&mut self) -> Option<(Position, PlaceOutcome)> {
        if !self.ai_thinking {
            return None;
        }
        let chosen = self.ai.select_move(&mut self.board, self.turn);
        self.ai_thinking = false;
        let pos = chosen?;
        Some((pos, self.make_move(pos)))
    }

    pub fn play_ai_turn(&mut self) -> Option<(Position, PlaceOutcome)> {
        if !self.begin_ai_turn() {
            return None;
        }
        self.complete_ai_turn()
    }

    pub fn snapshot(&self) -> OmokSnapshot {
        OmokSnapshot {
            board: omok_board_to_value(&self.board),
            turn: Some(self.turn.to_char().to_string()),
            game_over: self.is_game_over(),
            winner: self.winner().map(|c| c.to_char().to_string()),
            last_move: self.last_move.map(Into::into),
            timestamp: now_millis(),
        }
    }

    fn publish(&mut self) {
        if self.mode != GameMode::Pvp {
            return;
        }
        let snapshot = self.snapshot();
        if let Some(channel) = self.channel.as_mut() {
            channel.publish(&snapshot);
        }
    }

    /// 应用远端快照：棋盘或行棋方不同时整体替换
    pub fn apply_snapshot(&mut self, snapshot: &OmokSnapshot) -> bool {
        let board = normalize_omok_board(&snapshot.board);
        let turn = parse_turn(snapshot.turn.as_deref(), Color::Black);
        if board == self.board && turn == self.turn {
            return false;
        }

        let winner = snapshot.winner.as_deref().and_then(Color::from_name);
        self.outcome = match (snapshot.game_over, winner) {
            (false, _) => OmokOutcome::Ongoing,
            (true, Some(color)) => OmokOutcome::Win(color),
            (true, None) => OmokOutcome::Draw,
        };
        self.board = board;
        self.turn = turn;
        self.last_move = snapshot.last_move.map(Into::into);
        self.ai_thinking = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::omok::ai::OmokStrategy;
    use crate::sync::MemoryChannel;
    use crate::test_positions::*;

    fn config(level: u8) -> OmokAIConfig {
        OmokAIConfig {
            level,
            strategy: OmokStrategy::DeepForcedMove,
            seed: Some(7),
        }
    }

    fn at(text: &str, mode: GameMode) -> OmokSession {
        OmokSession::from_position(OmokBoard::parse(text).unwrap(), Color::Black, mode, &config(9))
    }

    #[test]
    fn test_click_alternates_turns() {
        let mut session = OmokSession::new(GameMode::Pvp, &config(1));
        assert_eq!(session.handle_click(Position::new(7, 7)), PlaceOutcome::Placed);
        assert_eq!(session.turn(), Color::White);
        assert_eq!(session.handle_click(Position::new(7, 7)), PlaceOutcome::Rejected);
        assert_eq!(session.handle_click(Position::new(7, 8)), PlaceOutcome::Placed);
        assert_eq!(session.turn(), Color::Black);
        assert_eq!(session.last_move(), Some(Position::new(7, 8)));
    }

    #[test]
    fn test_forbidden_click_is_rejected() {
        let mut session = at(OMOK_DOUBLE_THREE, GameMode::Pvp);
        let before = *session.board();
        assert_eq!(
            session.handle_click(Position::new(7, 7)),
            PlaceOutcome::Forbidden
        );
        assert_eq!(*session.board(), before);
        assert_eq!(session.turn(), Color::Black);
    }

    #[test]
    fn test_black_win_ends_game() {
        let mut session = at(OMOK_OPEN_FOUR, GameMode::Pvp);
        assert_eq!(
            session.handle_click(Position::new(7, 9)),
            PlaceOutcome::Won(Color::Black)
        );
        assert!(session.is_game_over());
        assert_eq!(session.winner(), Some(Color::Black));
        assert_eq!(session.turn(), Color::Black);
        assert_eq!(session.handle_click(Position::new(0, 0)), PlaceOutcome::Rejected);
    }

    #[test]
    fn test_ai_blocks_after_human_move() {
        let mut session = at("///////.....bbb", GameMode::Ai);
        assert_eq!(session.handle_click(Position::new(7, 8)), PlaceOutcome::Placed);
        // AI 回合拒绝人类落子
        assert_eq!(session.handle_click(Position::new(0, 0)), PlaceOutcome::Rejected);

        let (pos, outcome) = session.play_ai_turn().unwrap();
        assert_eq!(outcome, PlaceOutcome::Placed);
        assert_eq!(pos, Position::new(7, 4));
        assert_eq!(session.turn(), Color::Black);
        assert!(!session.is_ai_thinking());
    }

    #[test]
    fn test_full_board_is_draw() {
        let mut board = OmokBoard::new();
        let last = Position::new(14, 14);
        for pos in board.empty_cells() {
            if pos != last {
                let color = if (pos.row + pos.col / 2) % 2 == 0 {
                    Color::Black
                } else {
                    Color::White
                };
                board.set(pos, Some(color));
            }
        }
        // (14,14) 按同一规律应为白子
        let mut session = OmokSession::from_position(board, Color::White, GameMode::Pvp, &config(1));
        assert_eq!(session.make_move(last), PlaceOutcome::Draw);
        assert!(session.is_game_over());
        assert_eq!(session.winner(), None);
        assert_eq!(session.outcome(), OmokOutcome::Draw);
    }

    #[test]
    fn test_pvp_publish_and_apply() {
        let channel = MemoryChannel::new();
        let mut a = OmokSession::new(GameMode::Pvp, &config(1));
        a.attach_channel(Box::new(channel.clone()));
        a.handle_click(Position::new(7, 7));
        assert_eq!(channel.len(), 1);

        let mut b = OmokSession::new(GameMode::Pvp, &config(1));
        let snapshot = channel.latest().unwrap();
        assert!(b.apply_snapshot(&snapshot));
        assert_eq!(b.board(), a.board());
        assert_eq!(b.turn(), Color::White);
        assert_eq!(b.last_move(), Some(Position::new(7, 7)));
        assert!(!b.apply_snapshot(&snapshot));

        a.restart();
        assert_eq!(channel.len(), 2);
        assert!(b.apply_snapshot(&channel.latest().unwrap()));
        assert_eq!(b.board().stone_count(), 0);
    }

    #[test]
    fn test_snapshot_winner_round_trip() {
        let mut session = at(OMOK_OPEN_FOUR, GameMode::Pvp);
        session.handle_click(Position::new(7, 4));
        let snapshot = session.snapshot();
        assert_eq!(snapshot.winner.as_deref(), Some("b"));

        let mut other = OmokSession::new(GameMode::Pvp, &config(1));
        assert!(other.apply_snapshot(&snapshot));
        assert_eq!(other.outcome(), OmokOutcome::Win(Color::Black));
    }
}
