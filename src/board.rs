//! 国际象棋棋盘
//!
//! 8x8 数组存储棋子。走法生成分两层：
//! - `generate_moves`：伪合法走法（不考虑己方王是否被将）
//! - `get_legal_moves`：在棋盘副本上试走，过滤掉让己方王受攻击的走法
//!
//! 不实现王车易位与吃过路兵；兵到达底线一律升变为后。

use crate::fen::parse_fen;
use crate::types::{ChessMove, Color, GameStatus, Piece, PieceType, Position};

pub const BOARD_SIZE: i8 = 8;

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const DIAGONAL_DIRS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

const ORTHOGONAL_DIRS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// 后与王的八个方向
const ALL_DIRS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// 兵的前进方向：白方向 row 0，黑方向 row 7
#[inline]
pub fn pawn_direction(color: Color) -> i8 {
    match color {
        Color::White => -1,
        Color::Black => 1,
    }
}

/// 兵的初始横排（可走两步）
#[inline]
fn pawn_start_row(color: Color) -> i8 {
    match color {
        Color::White => 6,
        Color::Black => 1,
    }
}

/// 升变横排
#[inline]
pub fn promotion_row(color: Color) -> i8 {
    match color {
        Color::White => 0,
        Color::Black => 7,
    }
}

/// 执行走法的结果，供对局历史记录与悔棋使用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedMove {
    /// 走动的棋子（升变前）
    pub moved: Piece,
    pub captured: Option<Piece>,
    pub promoted: bool,
}

/// 国际象棋棋盘
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

impl Board {
    /// 空棋盘
    pub fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// 初始局面
    pub fn initial() -> Self {
        let mut squares = [[None; 8]; 8];
        for (col, kind) in BACK_RANK.iter().enumerate() {
            squares[0][col] = Some(Piece::new(*kind, Color::Black));
            squares[1][col] = Some(Piece::new(PieceType::Pawn, Color::Black));
            squares[6][col] = Some(Piece::new(PieceType::Pawn, Color::White));
            squares[7][col] = Some(Piece::new(*kind, Color::White));
        }
        Board { squares }
    }

    pub fn from_squares(squares: [[Option<Piece>; 8]; 8]) -> Self {
        Board { squares }
    }

    /// 从 FEN 字符串创建棋盘（忽略行棋方）
    pub fn from_fen(fen: &str) -> Result<Board, String> {
        Ok(parse_fen(fen)?.board)
    }

    pub fn squares(&self) -> &[[Option<Piece>; 8]; 8] {
        &self.squares
    }

    /// 获取某位置的棋子，越界返回 None
    #[inline]
    pub fn get_piece(&self, pos: Position) -> Option<Piece> {
        if !pos.within(BOARD_SIZE) {
            return None;
        }
        self.squares[pos.row as usize][pos.col as usize]
    }

    /// 设置某位置的棋子，越界时忽略
    #[inline]
    pub fn set_piece(&mut self, pos: Position, piece: Option<Piece>) {
        if pos.within(BOARD_SIZE) {
            self.squares[pos.row as usize][pos.col as usize] = piece;
        }
    }

    /// 获取所有棋子（按行优先顺序）
    pub fn get_all_pieces(&self, color: Option<Color>) -> Vec<(Position, Piece)> {
        let mut pieces = Vec::with_capacity(32);
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let pos = Position::new(row, col);
                if let Some(piece) = self.get_piece(pos) {
                    if color.map_or(true, |c| piece.color == c) {
                        pieces.push((pos, piece));
                    }
                }
            }
        }
        pieces
    }

    /// 找到王的位置
    pub fn find_king(&self, color: Color) -> Option<Position> {
        let king = Piece::new(PieceType::King, color);
        self.get_all_pieces(Some(color))
            .into_iter()
            .find(|(_, p)| *p == king)
            .map(|(pos, _)| pos)
    }

    #[inline]
    fn can_move_to(&self, color: Color, pos: Position) -> bool {
        if !pos.within(BOARD_SIZE) {
            return false;
        }
        match self.get_piece(pos) {
            None => true,
            Some(target) => target.color != color,
        }
    }

    /// 生成某方的所有伪合法走法
    ///
    /// 顺序固定：按行优先遍历棋子，每个棋子按固定方向顺序展开
    pub fn generate_moves(&self, color: Color) -> Vec<ChessMove> {
        let mut moves = Vec::with_capacity(48);
        for (from, piece) in self.get_all_pieces(Some(color)) {
            for to in self.get_potential_moves(from, piece) {
                moves.push(ChessMove::new(from, to));
            }
        }
        moves
    }

    /// 获取单个棋子的所有伪合法目标位置
    pub fn get_potential_moves(&self, from: Position, piece: Piece) -> Vec<Position> {
        match piece.kind {
            PieceType::Pawn => self.get_pawn_moves(from, piece.color),
            PieceType::Knight => self.get_step_moves(from, piece.color, &KNIGHT_JUMPS),
            PieceType::Bishop => self.get_slide_moves(from, piece.color, &DIAGONAL_DIRS),
            PieceType::Rook => self.get_slide_moves(from, piece.color, &ORTHOGONAL_DIRS),
            PieceType::Queen => self.get_slide_moves(from, piece.color, &ALL_DIRS),
            PieceType::King => self.get_step_moves(from, piece.color, &ALL_DIRS),
        }
    }

    fn get_pawn_moves(&self, from: Position, color: Color) -> Vec<Position> {
        let mut moves = Vec::with_capacity(4);
        let dir = pawn_direction(color);

        // 前进一步，起始横排可再走一步
        let one = from.offset(dir, 0);
        if one.within(BOARD_SIZE) && self.get_piece(one).is_none() {
            moves.push(one);
            let two = from.offset(2 * dir, 0);
            if from.row == pawn_start_row(color) && self.get_piece(two).is_none() {
                moves.push(two);
            }
        }

        // 斜向吃子，只能落在敌方棋子上
        for dc in [-1, 1] {
            let target = from.offset(dir, dc);
            if let Some(p) = self.get_piece(target) {
                if p.color != color {
                    moves.push(target);
                }
            }
        }

        moves
    }

    fn get_step_moves(&self, from: Position, color: Color, offsets: &[(i8, i8)]) -> Vec<Position> {
        offsets
            .iter()
            .map(|&(dr, dc)| from.offset(dr, dc))
            .filter(|&pos| self.can_move_to(color, pos))
            .collect()
    }

    fn get_slide_moves(&self, from: Position, color: Color, dirs: &[(i8, i8)]) -> Vec<Position> {
        let mut moves = Vec::with_capacity(14);
        for &(dr, dc) in dirs {
            let mut pos = from.offset(dr, dc);
            while pos.within(BOARD_SIZE) {
                match self.get_piece(pos) {
                    None => moves.push(pos),
                    Some(target) => {
                        if target.color != color {
                            moves.push(pos);
                        }
                        break;
                    }
                }
                pos = pos.offset(dr, dc);
            }
        }
        moves
    }

    /// 执行走法（兵到底线自动升变为后）
    ///
    /// 起点没有棋子时不做任何改变，返回 None
    pub fn apply_move(&mut self, mv: &ChessMove) -> Option<AppliedMove> {
        if !mv.to.within(BOARD_SIZE) {
            return None;
        }
        let moved = self.get_piece(mv.from)?;
        let captured = self.get_piece(mv.to);

        let promoted = moved.kind == PieceType::Pawn && mv.to.row == promotion_row(moved.color);
        let placed = if promoted {
            Piece::new(PieceType::Queen, moved.color)
        } else {
            moved
        };

        self.set_piece(mv.from, None);
        self.set_piece(mv.to, Some(placed));

        Some(AppliedMove {
            moved,
            captured,
            promoted,
        })
    }

    /// 检测某位置是否被某方攻击
    ///
    /// 对于被非攻击方棋子占据的格子（如王所在格），结果与
    /// “攻击方存在落在该格的伪合法走法”一致。
    pub fn is_position_attacked(&self, target: Position, attacker: Color) -> bool {
        // 直线：车/后
        for (dr, dc) in ORTHOGONAL_DIRS {
            if let Some(p) = self.first_piece_along(target, dr, dc) {
                if p.color == attacker && matches!(p.kind, PieceType::Rook | PieceType::Queen) {
                    return true;
                }
            }
        }

        // 斜线：象/后
        for (dr, dc) in DIAGONAL_DIRS {
            if let Some(p) = self.first_piece_along(target, dr, dc) {
                if p.color == attacker && matches!(p.kind, PieceType::Bishop | PieceType::Queen) {
                    return true;
                }
            }
        }

        let knight = Piece::new(PieceType::Knight, attacker);
        if KNIGHT_JUMPS
            .iter()
            .any(|&(dr, dc)| self.get_piece(target.offset(dr, dc)) == Some(knight))
        {
            return true;
        }

        let king = Piece::new(PieceType::King, attacker);
        if ALL_DIRS
            .iter()
            .any(|&(dr, dc)| self.get_piece(target.offset(dr, dc)) == Some(king))
        {
            return true;
        }

        // 兵从反方向斜着攻击
        let pawn = Piece::new(PieceType::Pawn, attacker);
        let back = -pawn_direction(attacker);
        [-1, 1]
            .iter()
            .any(|&dc| self.get_piece(target.offset(back, dc)) == Some(pawn))
    }

    fn first_piece_along(&self, from: Position, dr: i8, dc: i8) -> Option<Piece> {
        let mut pos = from.offset(dr, dc);
        while pos.within(BOARD_SIZE) {
            if let Some(p) = self.get_piece(pos) {
                return Some(p);
            }
            pos = pos.offset(dr, dc);
        }
        None
    }

    /// 检查是否被将军（没有王时视为未被将军）
    pub fn is_in_check(&self, color: Color) -> bool {
        match self.find_king(color) {
            Some(king_pos) => self.is_position_attacked(king_pos, color.opposite()),
            None => false,
        }
    }

    /// 获取所有合法走法
    pub fn get_legal_moves(&self, color: Color) -> Vec<ChessMove> {
        self.generate_moves(color)
            .into_iter()
            .filter(|mv| {
                let mut trial = *self;
                trial.apply_move(mv);
                !trial.is_in_check(color)
            })
            .collect()
    }

    /// 某个棋子的合法目标位置（用于选子高亮）
    pub fn legal_destinations(&self, from: Position) -> Vec<Position> {
        let piece = match self.get_piece(from) {
            Some(p) => p,
            None => return Vec::new(),
        };
        self.get_legal_moves(piece.color)
            .into_iter()
            .filter(|mv| mv.from == from)
            .map(|mv| mv.to)
            .collect()
    }

    /// 获取所有合法走法（字符串格式）
    pub fn get_legal_moves_str(&self, color: Color) -> Vec<String> {
        self.get_legal_moves(color)
            .iter()
            .map(|m| m.to_uci_str())
            .collect()
    }

    /// 判断某方行棋时的局面状态
    pub fn game_status(&self, color: Color) -> GameStatus {
        let has_moves = !self.get_legal_moves(color).is_empty();
        let in_check = self.is_in_check(color);
        match (has_moves, in_check) {
            (false, true) => GameStatus::Checkmate,
            (false, false) => GameStatus::Stalemate,
            (true, true) => GameStatus::Check,
            (true, false) => GameStatus::Playing,
        }
    }
}

/// 从 FEN 获取行棋方的所有合法走法
pub fn get_legal_moves_from_fen(fen: &str) -> Result<Vec<String>, String> {
    let state = parse_fen(fen)?;
    Ok(state.board.get_legal_moves_str(state.turn))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_positions::*;

    fn board_and_turn(fen: &str) -> (Board, Color) {
        let state = parse_fen(fen).unwrap();
        (state.board, state.turn)
    }

    #[test]
    fn test_initial_board() {
        let board = Board::initial();
        assert_eq!(board.get_all_pieces(Some(Color::White)).len(), 16);
        assert_eq!(board.get_all_pieces(Some(Color::Black)).len(), 16);
        assert_eq!(board.find_king(Color::White), Position::from_algebraic("e1"));
        assert_eq!(board, Board::from_fen(START).unwrap());
    }

    #[test]
    fn test_attack_query_far_off_board() {
        let board = Board::initial();
        assert!(!board.is_position_attacked(Position::new(127, 127), Color::White));
        assert!(!board.is_position_attacked(Position::new(-128, 0), Color::Black));
    }

    #[test]
    fn test_legal_moves_initial() {
        let board = Board::initial();
        assert_eq!(board.get_legal_moves(Color::White).len(), 20);
        assert_eq!(board.get_legal_moves(Color::Black).len(), 20);
        assert_eq!(board.game_status(Color::White), GameStatus::Playing);
    }

    #[test]
    fn test_pawn_double_push_needs_clear_path() {
        // e3 上有黑马，e2 兵既不能走一步也不能走两步
        let (board, _) = board_and_turn("4k3/8/8/8/8/4n3/4P3/4K3 w");
        let e2 = Position::from_algebraic("e2").unwrap();
        assert!(board.legal_destinations(e2).is_empty());

        // e4 被挡住时仍可走一步
        let (board, _) = board_and_turn("4k3/8/8/8/4n3/8/4P3/4K3 w");
        let dests = board.legal_destinations(e2);
        assert_eq!(dests, vec![Position::from_algebraic("e3").unwrap()]);
    }

    #[test]
    fn test_pawn_captures_only_enemy_diagonally() {
        let (board, _) = board_and_turn("4k3/8/8/8/8/3p1N2/4P3/4K3 w");
        let e2 = Position::from_algebraic("e2").unwrap();
        let dests = board.legal_destinations(e2);
        assert!(dests.contains(&Position::from_algebraic("d3").unwrap()));
        assert!(!dests.contains(&Position::from_algebraic("f3").unwrap()));
    }

    #[test]
    fn test_slider_stops_at_blockers() {
        let (board, _) = board_and_turn("4k3/8/8/8/R2p2N1/8/8/4K3 w");
        let a4 = Position::from_algebraic("a4").unwrap();
        let dests = board.legal_destinations(a4);
        // 可吃 d4，不能越过
        assert!(dests.contains(&Position::from_algebraic("d4").unwrap()));
        assert!(!dests.contains(&Position::from_algebraic("e4").unwrap()));
        // 纵向 a1..a8 共 7 格 + 横向 b4, c4, d4
        assert_eq!(dests.len(), 10);
    }

    #[test]
    fn test_check_detection() {
        let (board, turn) = board_and_turn(ROOK_CHECK);
        assert!(board.is_in_check(turn));
        assert!(!board.is_in_check(turn.opposite()));
        assert_eq!(board.game_status(turn), GameStatus::Check);
    }

    #[test]
    fn test_checkmate_detection() {
        let (board, turn) = board_and_turn(FOOLS_MATE);
        assert_eq!(turn, Color::White);
        assert!(board.get_legal_moves(turn).is_empty());
        assert_eq!(board.game_status(turn), GameStatus::Checkmate);
    }

    #[test]
    fn test_stalemate_detection() {
        let (board, turn) = board_and_turn(STALEMATE);
        assert!(!board.is_in_check(turn));
        assert_eq!(board.game_status(turn), GameStatus::Stalemate);
    }

    #[test]
    fn test_pinned_piece_stays_on_line() {
        let (board, turn) = board_and_turn(PINNED_ROOK);
        let e7 = Position::from_algebraic("e7").unwrap();
        let dests = board.legal_destinations(e7);
        assert!(!dests.is_empty());
        assert!(dests.iter().all(|p| p.col == 4));
        assert!(board
            .get_legal_moves(turn)
            .iter()
            .filter(|m| m.from == e7)
            .all(|m| m.to.col == 4));
    }

    #[test]
    fn test_promotion_always_queen() {
        for (fen, mv) in [(WHITE_PROMOTION, "a7a8"), (BLACK_PROMOTION, "h2h1")] {
            let (mut board, turn) = board_and_turn(fen);
            let mv = ChessMove::from_uci_str(mv).unwrap();
            assert!(board.get_legal_moves(turn).contains(&mv));
            let applied = board.apply_move(&mv).unwrap();
            assert!(applied.promoted);
            assert_eq!(applied.moved.kind, PieceType::Pawn);
            assert_eq!(board.get_piece(mv.to), Some(Piece::new(PieceType::Queen, turn)));
        }
    }

    #[test]
    fn test_apply_move_from_empty_square_is_noop() {
        let mut board = Board::initial();
        let before = board;
        let mv = ChessMove::from_uci_str("e4e5").unwrap();
        assert!(board.apply_move(&mv).is_none());
        assert_eq!(board, before);
    }

    #[test]
    fn test_legal_moves_never_expose_king() {
        for fen in ALL_CHESS {
            let (board, _) = board_and_turn(fen);
            for color in [Color::White, Color::Black] {
                for mv in board.get_legal_moves(color) {
                    let mut after = board;
                    after.apply_move(&mv);
                    assert!(!after.is_in_check(color), "{} {} exposes king", fen, mv);
                }
            }
        }
    }

    #[test]
    fn test_attack_test_matches_pseudo_moves() {
        for fen in ALL_CHESS {
            let (board, _) = board_and_turn(fen);
            for color in [Color::White, Color::Black] {
                if let Some(king) = board.find_king(color) {
                    let by_moves = board
                        .generate_moves(color.opposite())
                        .iter()
                        .any(|m| m.to == king);
                    assert_eq!(board.is_in_check(color), by_moves, "{}", fen);
                }
            }
        }
    }

    #[test]
    fn test_terminal_status_matches_definition() {
        for fen in ALL_CHESS {
            let (board, turn) = board_and_turn(fen);
            let status = board.game_status(turn);
            let no_moves = board.get_legal_moves(turn).is_empty();
            let in_check = board.is_in_check(turn);
            assert_eq!(status == GameStatus::Checkmate, no_moves && in_check);
            assert_eq!(status == GameStatus::Stalemate, no_moves && !in_check);
        }
    }

    #[test]
    fn test_legal_moves_deterministic() {
        let (board, turn) = board_and_turn(ITALIAN);
        assert_eq!(board.get_legal_moves(turn), board.get_legal_moves(turn));
    }

    #[test]
    fn test_legal_moves_from_fen() {
        let moves = get_legal_moves_from_fen(START).unwrap();
        assert_eq!(moves.len(), 20);
        assert!(moves.contains(&"e2e4".to_string()));
        assert!(moves.contains(&"g1f3".to_string()));
    }
}
