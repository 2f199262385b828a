//! 国际象棋对局
//!
//! 一个 `ChessSession` 独占自己的棋盘，负责选子、走子记录、被吃棋子、
//! 悔棋、AI 回合与联机快照。非法操作一律忽略，状态不变。

use crate::ai::{AIConfig, AIStrategy, ChessAI, EvalStrategy};
use crate::board::Board;
use crate::sync::{
    chess_board_to_value, normalize_chess_board, now_millis, parse_captured, parse_turn,
    ChessSnapshot, SnapshotChannel, SnapshotMove,
};
use crate::types::{ChessMove, Color, GameMode, GameStatus, Piece, Position};

/// 走子记录，悔棋时据此还原
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub from: Position,
    pub to: Position,
    /// 升变前的棋子
    pub piece_moved: Piece,
    pub piece_captured: Option<Piece>,
    pub promoted: bool,
}

/// 点击棋盘的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// 当前不接受输入或点击无效
    Ignored,
    /// 选中己方棋子
    Selected(Position),
    /// 取消选择
    Deselected,
    /// 走了一步
    Moved(ChessMove),
}

pub struct ChessSession {
    board: Board,
    turn: Color,
    mode: GameMode,
    ai_color: Color,
    /// 联机模式下本机执子颜色，None 表示双方都可操作
    local_color: Option<Color>,
    selection: Option<Position>,
    legal_destinations: Vec<Position>,
    last_move: Option<ChessMove>,
    /// 被吃掉的白子
    captured_white: Vec<Piece>,
    /// 被吃掉的黑子
    captured_black: Vec<Piece>,
    move_history: Vec<MoveRecord>,
    status: GameStatus,
    game_over: bool,
    ai_thinking: bool,
    ai: ChessAI,
    channel: Option<Box<dyn SnapshotChannel<ChessSnapshot>>>,
}

impl ChessSession {
    /// 新对局：人类执白先行，AI 执黑
    pub fn new(mode: GameMode, config: &AIConfig) -> Self {
        ChessSession {
            board: Board::initial(),
            turn: Color::White,
            mode,
            ai_color: Color::Black,
            local_color: None,
            selection: None,
            legal_destinations: Vec::new(),
            last_move: None,
            captured_white: Vec::new(),
            captured_black: Vec::new(),
            move_history: Vec::new(),
            status: GameStatus::Playing,
            game_over: false,
            ai_thinking: false,
            ai: ChessAI::new(config),
            channel: None,
        }
    }

    /// 按当前模式与等级重新开局
    pub fn new_game(&mut self) {
        self.board = Board::initial();
        self.turn = Color::White;
        self.clear_selection();
        self.last_move = None;
        self.captured_white.clear();
        self.captured_black.clear();
        self.move_history.clear();
        self.status = GameStatus::Playing;
        self.game_over = false;
        self.ai_thinking = false;
        self.publish();
    }

    /// 从指定局面开始（用于测试与命令行）
    pub fn from_position(board: Board, turn: Color, mode: GameMode, config: &AIConfig) -> Self {
        let mut session = ChessSession::new(mode, config);
        session.board = board;
        session.turn = turn;
        session.refresh_status();
        session
    }

    pub fn attach_channel(&mut self, channel: Box<dyn SnapshotChannel<ChessSnapshot>>) {
        self.channel = Some(channel);
    }

    pub fn set_local_color(&mut self, color: Option<Color>) {
        self.local_color = color;
    }

    pub fn set_ai_level(&mut self, level: u8) {
        self.ai.set_level(level);
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn ai_level(&self) -> u8 {
        self.ai.level()
    }

    pub fn eval_strategy(&self) -> EvalStrategy {
        self.ai.eval_strategy()
    }

    pub fn selection(&self) -> Option<Position> {
        self.selection
    }

    pub fn legal_destinations(&self) -> &[Position] {
        &self.legal_destinations
    }

    pub fn last_move(&self) -> Option<ChessMove> {
        self.last_move
    }

    pub fn captured(&self, color: Color) -> &[Piece] {
        match color {
            Color::White => &self.captured_white,
            Color::Black => &self.captured_black,
        }
    }

    pub fn move_history(&self) -> &[MoveRecord] {
        &self.move_history
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_ai_thinking(&self) -> bool {
        self.ai_thinking
    }

    /// 当前是否接受人类输入
    fn accepts_input(&self) -> bool {
        if self.game_over || self.ai_thinking {
            return false;
        }
        match self.mode {
            GameMode::Ai => self.turn != self.ai_color,
            GameMode::Pvp => self.local_color.map_or(true, |c| c == self.turn),
        }
    }

    fn clear_selection(&mut self) {
        self.selection = None;
        self.legal_destinations.clear();
    }

    fn select_piece(&mut self, pos: Position) -> ClickOutcome {
        self.selection = Some(pos);
        self.legal_destinations = self.board.legal_destinations(pos);
        ClickOutcome::Selected(pos)
    }

    fn is_own_piece(&self, pos: Position) -> bool {
        self.board
            .get_piece(pos)
            .map_or(false, |p| p.color == self.turn)
    }

    /// 点击某格
    ///
    /// 未选子时点己方棋子为选中；已选子时点合法目标为走子，
    /// 点另一个己方棋子为改选，其他位置取消选择。
    pub fn select(&mut self, pos: Position) -> ClickOutcome {
        if !self.accepts_input() {
            return ClickOutcome::Ignored;
        }

        if let Some(from) = self.selection {
            if self.legal_destinations.contains(&pos) {
                let mv = ChessMove::new(from, pos);
                self.clear_selection();
                return if self.make_move(mv) {
                    ClickOutcome::Moved(mv)
                } else {
                    ClickOutcome::Ignored
                };
            }
            if self.is_own_piece(pos) {
                return self.select_piece(pos);
            }
            self.clear_selection();
            return ClickOutcome::Deselected;
        }

        if self.is_own_piece(pos) {
            return self.select_piece(pos);
        }
        ClickOutcome::Ignored
    }

    /// 当前行棋方走一步
    ///
    /// 走法必须合法且对局未结束，否则返回 false。
    pub fn make_move(&mut self, mv: ChessMove) -> bool {
        if self.game_over || !self.board.get_legal_moves(self.turn).contains(&mv) {
            return false;
        }
        let applied = match self.board.apply_move(&mv) {
            Some(a) => a,
            None => return false,
        };

        if let Some(captured) = applied.captured {
            match captured.color {
                Color::White => self.captured_white.push(captured),
                Color::Black => self.captured_black.push(captured),
            }
        }
        self.move_history.push(MoveRecord {
            from: mv.from,
            to: mv.to,
            piece_moved: applied.moved,
            piece_captured: applied.captured,
            promoted: applied.promoted,
        });
        self.last_move = Some(mv);
        self.turn = self.turn.opposite();
        self.clear_selection();
        self.refresh_status();
        self.publish();
        true
    }

    fn refresh_status(&mut self) {
        self.status = self.board.game_status(self.turn);
        if self.status.is_terminal() {
            self.game_over = true;
            log::info!(
                "chess game over: {} ({} to move)",
                self.status.as_str(),
                self.turn
            );
        }
    }

    fn undo_single(&mut self) -> bool {
        let record = match self.move_history.pop() {
            Some(r) => r,
            None => return false,
        };

        self.board.set_piece(record.from, Some(record.piece_moved));
        self.board.set_piece(record.to, record.piece_captured);

        if let Some(captured) = record.piece_captured {
            let list = match captured.color {
                Color::White => &mut self.captured_white,
                Color::Black => &mut self.captured_black,
            };
            if let Some(idx) = list.iter().rposition(|p| *p == captured) {
                list.remove(idx);
            }
        }

        self.turn = self.turn.opposite();
        self.last_move = self
            .move_history
            .last()
            .map(|r| ChessMove::new(r.from, r.to));
        true
    }

    /// 悔棋：人机模式同时撤销 AI 与人类的各一步
    ///
    /// 对局结束或 AI 思考中时拒绝。
    pub fn undo(&mut self) -> bool {
        if self.game_over || self.ai_thinking {
            return false;
        }
        let undone = match self.mode {
            GameMode::Ai => {
                let first = self.undo_single();
                let second = self.undo_single();
                first || second
            }
            GameMode::Pvp => self.undo_single(),
        };
        if undone {
            self.clear_selection();
            self.status = self.board.game_status(self.turn);
        }
        undone
    }

    /// 是否轮到 AI
    pub fn is_ai_turn(&self) -> bool {
        self.mode == GameMode::Ai && !self.game_over && self.turn == self.ai_color
    }

    /// 进入 AI 思考状态，期间拒绝人类输入
    pub fn begin_ai_turn(&mut self) -> bool {
        if !self.is_ai_turn() || self.ai_thinking {
            return false;
        }
        self.ai_thinking = true;
        true
    }

    /// 计算并执行 AI 走法，结束思考状态
    pub fn complete_ai_turn(&mut self) -> Option<ChessMove> {
        if !self.ai_thinking {
            return None;
        }
        let chosen = self.ai.select_move(&self.board, self.turn);
        self.ai_thinking = false;
        let mv = chosen?;
        if self.make_move(mv) {
            log::debug!("ai played {}", mv);
            Some(mv)
        } else {
            None
        }
    }

    /// AI 走一步（不在 AI 回合时返回 None）
    pub fn play_ai_turn(&mut self) -> Option<ChessMove> {
        if !self.begin_ai_turn() {
            return None;
        }
        self.complete_ai_turn()
    }

    /// 当前状态快照
    pub fn snapshot(&self) -> ChessSnapshot {
        ChessSnapshot {
            board: chess_board_to_value(&self.board),
            turn: Some(self.turn.to_char().to_string()),
            last_move: self.last_move.map(|mv| SnapshotMove {
                from: mv.from.into(),
                to: mv.to.into(),
            }),
            game_over: self.game_over,
            captured_white: self.captured_white.iter().map(|p| p.to_string()).collect(),
            captured_black: self.captured_black.iter().map(|p| p.to_string()).collect(),
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

    /// 应用远端快照：棋盘或行棋方不同时整体替换本地状态
    ///
    /// 走子历史无法从快照重建，替换后清空。
    pub fn apply_snapshot(&mut self, snapshot: &ChessSnapshot) -> bool {
        let board = normalize_chess_board(&snapshot.board);
        let turn = parse_turn(snapshot.turn.as_deref(), Color::White);
        if board == self.board && turn == self.turn {
            return false;
        }

        self.board = board;
        self.turn = turn;
        self.last_move = snapshot
            .last_move
            .map(|m| ChessMove::new(m.from.into(), m.to.into()));
        self.captured_white = parse_captured(&snapshot.captured_white);
        self.captured_black = parse_captured(&snapshot.captured_black);
        self.move_history.clear();
        self.clear_selection();
        self.ai_thinking = false;
        self.status = self.board.game_status(self.turn);
        self.game_over = snapshot.game_over;
        true
    }
}
