//! 测试局面
//!
//! 国际象棋用 FEN（布局 + 行棋方），五子棋用行文本（'/' 分隔行，
//! '.' 空，'b' 黑，'w' 白，短行与缺行补空）。

// =============================================================================
// 国际象棋
// =============================================================================

/// 初始局面
pub const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w";

/// 意大利开局
pub const ITALIAN: &str = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w";

/// 愚人将杀：白方被将死
pub const FOOLS_MATE: &str = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w";

/// 黑方无子可动且未被将军
pub const STALEMATE: &str = "7k/5Q2/6K1/8/8/8/8/8 b";

/// 白车将军黑王
pub const ROOK_CHECK: &str = "4k3/8/8/8/8/8/8/4R1K1 b";

/// 黑车被白车牵制在 e 线
pub const PINNED_ROOK: &str = "4k3/4r3/8/8/8/8/8/4R1K1 b";

/// 白兵 a7 即将升变
pub const WHITE_PROMOTION: &str = "8/P6k/8/8/8/8/8/K7 w";

/// 黑兵 h2 即将升变
pub const BLACK_PROMOTION: &str = "k7/8/8/8/8/8/7p/K7 b";

/// 黑车可白吃白后（无保护）
pub const HANGING_QUEEN: &str = "k7/8/8/8/8/8/r2Q4/7K b";

/// 白后可白吃黑车（无保护）
pub const HANGING_ROOK: &str = "k7/8/8/3r4/8/8/3Q4/7K w";

/// 中局
pub const MIDGAME: &str = "r2q1rk1/ppp2ppp/2np1n2/2b1p1B1/2B1P1b1/2NP1N2/PPP2PPP/R2Q1RK1 w";

/// 全部国际象棋测试局面
pub const ALL_CHESS: [&str; 11] = [
    START,
    ITALIAN,
    FOOLS_MATE,
    STALEMATE,
    ROOK_CHECK,
    PINNED_ROOK,
    WHITE_PROMOTION,
    BLACK_PROMOTION,
    HANGING_QUEEN,
    HANGING_ROOK,
    MIDGAME,
];

// =============================================================================
// 五子棋
// =============================================================================

/// 黑方第 7 行 (7,5)-(7,8) 活四
pub const OMOK_OPEN_FOUR: &str = "///////.....bbbb";

/// 白方第 3 行 (3,2)-(3,5) 四连，黑方散子
pub const OMOK_WHITE_FOUR: &str = "///..wwww////.b...b.b//.b";

/// 黑方 (7,6)-(7,7) 活二，白方远处一子
pub const OMOK_OPEN_TWO: &str = "w///////......bb";

/// 黑方在 (7,7) 落子会形成横竖两个活三
pub const OMOK_DOUBLE_THREE: &str = "/////.......b/.......b/.....bb";

/// 同上，但竖线上端被白子堵住
pub const OMOK_ONE_OPEN_THREE: &str = "////.......w/.......b/.......b/.....bb";

/// 黑方 (7,2)-(7,4) 与 (7,6)-(7,7)，(7,5) 落子成六连
pub const OMOK_OVERLINE: &str = "///////..bbb.bb";

/// 中盘
pub const OMOK_MIDGAME: &str = "/////.......b/.....wb/......bw/.....wbbw/......w.b";
