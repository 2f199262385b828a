//! 五子棋棋盘
//!
//! 15x15，每格为空或黑/白一子。对局中格子只会由空变为有子。

use crate::types::{Color, Position};

pub const OMOK_SIZE: i8 = 15;

/// 四个连线方向：横、竖、主对角线、副对角线
pub const DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// 经过某点的一条连续同色棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRun {
    /// 连续棋子数（含该点）
    pub count: u8,
    /// 正方向连线之外的一格在盘内且为空
    pub front_open: bool,
    /// 反方向连线之外的一格在盘内且为空
    pub back_open: bool,
}

impl LineRun {
    #[inline]
    pub fn open_ends(&self) -> u8 {
        self.front_open as u8 + self.back_open as u8
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.front_open && self.back_open
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OmokBoard {
    cells: [[Option<Color>; 15]; 15],
}

impl Default for OmokBoard {
    fn default() -> Self {
        OmokBoard::new()
    }
}

impl OmokBoard {
    pub fn new() -> Self {
        OmokBoard {
            cells: [[None; 15]; 15],
        }
    }

    pub fn from_cells(cells: [[Option<Color>; 15]; 15]) -> Self {
        OmokBoard { cells }
    }

    pub fn cells(&self) -> &[[Option<Color>; 15]; 15] {
        &self.cells
    }

    /// 天元
    pub fn center() -> Position {
        Position::new(OMOK_SIZE / 2, OMOK_SIZE / 2)
    }

    #[inline]
    pub fn get(&self, pos: Position) -> Option<Color> {
        if !pos.within(OMOK_SIZE) {
            return None;
        }
        self.cells[pos.row as usize][pos.col as usize]
    }

    #[inline]
    pub fn set(&mut self, pos: Position, stone: Option<Color>) {
        if pos.within(OMOK_SIZE) {
            self.cells[pos.row as usize][pos.col as usize] = stone;
        }
    }

    /// 盘内且为空
    #[inline]
    pub fn is_empty_at(&self, pos: Position) -> bool {
        pos.within(OMOK_SIZE) && self.cells[pos.row as usize][pos.col as usize].is_none()
    }

    /// 落子，格子被占或越界时返回 false
    pub fn place(&mut self, pos: Position, color: Color) -> bool {
        if !self.is_empty_at(pos) {
            return false;
        }
        self.set(pos, Some(color));
        true
    }

    /// 试落一子：执行 `f` 后恢复该格原来的内容
    pub fn trial<R>(&mut self, pos: Position, color: Color, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.get(pos);
        self.set(pos, Some(color));
        let result = f(self);
        self.set(pos, saved);
        result
    }

    /// 按行优先顺序的所有棋子
    pub fn stones(&self) -> Vec<(Position, Color)> {
        let mut stones = Vec::new();
        for row in 0..OMOK_SIZE {
            for col in 0..OMOK_SIZE {
                let pos = Position::new(row, col);
                if let Some(color) = self.get(pos) {
                    stones.push((pos, color));
                }
            }
        }
        stones
    }

    /// 按行优先顺序的所有空格
    pub fn empty_cells(&self) -> Vec<Position> {
        let mut cells = Vec::new();
        for row in 0..OMOK_SIZE {
            for col in 0..OMOK_SIZE {
                let pos = Position::new(row, col);
                if self.get(pos).is_none() {
                    cells.push(pos);
                }
            }
        }
        cells
    }

    pub fn stone_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    pub fn has_stones(&self) -> bool {
        self.cells.iter().flatten().any(|c| c.is_some())
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|c| c.is_some())
    }

    /// 统计经过 `pos` 的 `color` 连线（`pos` 本身按 `color` 计）
    pub fn count_line(&self, pos: Position, (dr, dc): (i8, i8), color: Color) -> LineRun {
        let mut count = 1u8;

        let mut next = pos.offset(dr, dc);
        while self.get(next) == Some(color) {
            count += 1;
            next = next.offset(dr, dc);
        }
        let front_open = self.is_empty_at(next);

        let mut prev = pos.offset(-dr, -dc);
        while self.get(prev) == Some(color) {
            count += 1;
            prev = prev.offset(-dr, -dc);
        }
        let back_open = self.is_empty_at(prev);

        LineRun {
            count,
            front_open,
            back_open,
        }
    }

    /// 经过 `pos` 的四个方向中最长的连线长度
    pub fn max_run(&self, pos: Position, color: Color) -> u8 {
        DIRECTIONS
            .iter()
            .map(|&dir| self.count_line(pos, dir, color).count)
            .max()
            .unwrap_or(1)
    }

    /// 解析文本布局：'/' 分隔行，'.' 空，'b' 黑，'w' 白；短行与缺行补空
    pub fn parse(text: &str) -> Result<OmokBoard, String> {
        let mut board = OmokBoard::new();
        let text = text.trim();
        if text.is_empty() {
            return Ok(board);
        }

        let rows: Vec<&str> = text.split('/').collect();
        if rows.len() > OMOK_SIZE as usize {
            return Err(format!(
                "Too many rows: {} (max {})",
                rows.len(),
                OMOK_SIZE
            ));
        }

        for (row, line) in rows.iter().enumerate() {
            if line.chars().count() > OMOK_SIZE as usize {
                return Err(format!("Row {} is longer than {} cells", row, OMOK_SIZE));
            }
            for (col, ch) in line.chars().enumerate() {
                let stone = match ch {
                    '.' => None,
                    'b' | 'B' => Some(Color::Black),
                    'w' | 'W' => Some(Color::White),
                    _ => return Err(format!("Invalid cell '{}' at ({}, {})", ch, row, col)),
                };
                board.set(Position::new(row as i8, col as i8), stone);
            }
        }
        Ok(board)
    }

    /// 输出完整文本布局（15 行，每行 15 格）
    pub fn to_text(&self) -> String {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        None => '.',
                        Some(Color::Black) => 'b',
                        Some(Color::White) => 'w',
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_positions::*;

    #[test]
    fn test_parse_pads_missing_cells() {
        let board = OmokBoard::parse(OMOK_OPEN_FOUR).unwrap();
        assert_eq!(board.stone_count(), 4);
        for col in 5..=8 {
            assert_eq!(board.get(Position::new(7, col)), Some(Color::Black));
        }
        assert!(board.is_empty_at(Position::new(7, 4)));
        assert!(board.is_empty_at(Position::new(14, 14)));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(OmokBoard::parse("x").is_err());
        assert!(OmokBoard::parse("................").is_err());
        assert!(OmokBoard::parse(&"/".repeat(15)).is_err());
    }

    #[test]
    fn test_text_round_trip() {
        let board = OmokBoard::parse(OMOK_MIDGAME).unwrap();
        assert_eq!(OmokBoard::parse(&board.to_text()).unwrap(), board);
    }

    #[test]
    fn test_count_line_open_ends() {
        let board = OmokBoard::parse(OMOK_OPEN_FOUR).unwrap();
        let run = board.count_line(Position::new(7, 5), (0, 1), Color::Black);
        assert_eq!(run.count, 4);
        assert!(run.is_open());

        // 边界不算开放
        let mut edge = OmokBoard::new();
        edge.place(Position::new(0, 0), Color::White);
        edge.place(Position::new(0, 1), Color::White);
        let run = edge.count_line(Position::new(0, 0), (0, 1), Color::White);
        assert_eq!(run.count, 2);
        assert_eq!(run.open_ends(), 1);
    }

    #[test]
    fn test_trial_restores_cell() {
        let mut board = OmokBoard::parse(OMOK_OPEN_FOUR).unwrap();
        let before = board;
        let pos = Position::new(7, 4);
        let run = board.trial(pos, Color::Black, |b| b.max_run(pos, Color::Black));
        assert_eq!(run, 5);
        assert_eq!(board, before);
    }

    #[test]
    fn test_place_rejects_occupied() {
        let mut board = OmokBoard::new();
        let pos = OmokBoard::center();
        assert!(board.place(pos, Color::Black));
        assert!(!board.place(pos, Color::White));
        assert!(!board.place(Position::new(15, 0), Color::White));
        assert_eq!(board.get(pos), Some(Color::Black));
    }

    #[test]
    fn test_full_board() {
        let mut board = OmokBoard::new();
        assert!(!board.has_stones());
        for (i, pos) in board.empty_cells().into_iter().enumerate() {
            let color = if i % 2 == 0 { Color::Black } else { Color::White };
            board.set(pos, Some(color));
        }
        assert!(board.is_full());
        assert!(board.empty_cells().is_empty());
    }
}
