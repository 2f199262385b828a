//! Chess & Omok AI CLI
//!
//! 命令行界面，用于测试规则引擎与 AI
//!
//! 支持两种模式：
//! 1. 单次命令模式：每次执行一个命令
//! 2. Server 模式：长驻进程，通过 stdin/stdout 逐行交换 JSON

use boardgame_ai::ai::{
    get_node_count, reset_node_count, AIConfig, AIStrategy, ChessAI, EvalStrategy, Evaluator,
};
use boardgame_ai::omok::{check_win, is_forbidden, OmokAI, OmokAIConfig, OmokBoard, OmokStrategy};
use boardgame_ai::{get_legal_moves_from_fen, parse_fen, Color, Position};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "boardgame-ai")]
#[command(about = "Chess and Omok AI Engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 获取合法走法
    Moves {
        /// FEN 字符串（布局 + 行棋方）
        #[arg(long)]
        fen: String,
    },

    /// 局面状态（playing / check / checkmate / stalemate）
    Status {
        #[arg(long)]
        fen: String,
    },

    /// 选择最佳走法
    Best {
        #[arg(long)]
        fen: String,

        /// AI 等级 1-3
        #[arg(long, default_value = "3")]
        level: u8,

        /// 评估配置 (classic, center)
        #[arg(long, default_value = "classic")]
        eval: String,

        /// 随机种子
        #[arg(long)]
        seed: Option<u64>,

        /// 输出排名前 n 的候选
        #[arg(long, default_value = "1")]
        n: usize,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 评估局面分数（行棋方视角）
    Score {
        #[arg(long)]
        fen: String,

        #[arg(long, default_value = "classic")]
        eval: String,

        #[arg(long)]
        json: bool,
    },

    /// 五子棋 AI 选点
    OmokBest {
        /// 棋盘文本：'/' 分隔行，'.' 空，'b' 黑，'w' 白
        #[arg(long, default_value = "")]
        board: String,

        /// 执子颜色 (b, w)
        #[arg(long, default_value = "w")]
        color: String,

        /// AI 等级 1-12
        #[arg(long, default_value = "9")]
        level: u8,

        /// 策略 (deep, shallow)
        #[arg(long, default_value = "deep")]
        strategy: String,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        json: bool,
    },

    /// 五子棋落点检查：禁手与是否获胜
    OmokCheck {
        #[arg(long, default_value = "")]
        board: String,

        #[arg(long)]
        row: i8,

        #[arg(long)]
        col: i8,

        #[arg(long, default_value = "b")]
        color: String,

        #[arg(long)]
        json: bool,
    },

    /// 启动 server 模式（stdin/stdout 通信）
    Server,
}

#[derive(Serialize, Deserialize)]
struct MoveResult {
    #[serde(rename = "move")]
    mv: String,
    score: i32,
}

// Server 模式的请求和响应结构
#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct ServerRequest {
    cmd: String,
    fen: String,
    board: String,
    level: Option<u8>,
    eval: Option<String>,
    strategy: Option<String>,
    seed: Option<u64>,
    n: Option<usize>,
    row: Option<i8>,
    col: Option<i8>,
    color: Option<String>,
}

#[derive(Serialize, Deserialize, Default)]
struct ServerResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    moves: Option<Vec<MoveResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    legal_moves: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    eval: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    row: Option<i8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    col: Option<i8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    forbidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    win: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nodes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    elapsed_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServerResponse {
    fn error(msg: &str) -> Self {
        Self {
            ok: false,
            error: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> String {
    let encoded = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    encoded.unwrap_or_else(|e| format!("{{\"ok\":false,\"error\":\"encode error: {}\"}}", e))
}

fn parse_color(name: &str) -> Result<Color, String> {
    Color::from_name(name).ok_or_else(|| format!("Unknown color: {}", name))
}

fn exit_with(err: String) -> ! {
    eprintln!("Error: {}", err);
    std::process::exit(1);
}

// =============================================================================
// 命令实现（单次命令与 server 共用）
// =============================================================================

fn do_status(fen: &str) -> Result<ServerResponse, String> {
    let state = parse_fen(fen)?;
    Ok(ServerResponse {
        ok: true,
        status: Some(state.board.game_status(state.turn).as_str().to_string()),
        color: Some(state.turn.to_string()),
        ..Default::default()
    })
}

fn do_best(
    fen: &str,
    level: u8,
    eval: &str,
    seed: Option<u64>,
    n: usize,
) -> Result<ServerResponse, String> {
    let state = parse_fen(fen)?;
    let config = AIConfig {
        level,
        eval: EvalStrategy::from_name(eval)?,
        seed,
    };
    let mut ai = ChessAI::new(&config);

    reset_node_count();
    let start = Instant::now();
    let chosen = ai
        .select_move(&state.board, state.turn)
        .ok_or_else(|| "No legal moves".to_string())?;
    let elapsed = start.elapsed().as_secs_f64();
    let nodes = get_node_count();

    let ranked = ai.rank_moves(&state.board, state.turn);
    let chosen_score = ranked
        .iter()
        .find(|s| s.mv == chosen)
        .map_or(0, |s| s.score);

    let mut moves = vec![MoveResult {
        mv: chosen.to_uci_str(),
        score: chosen_score,
    }];
    moves.extend(
        ranked
            .into_iter()
            .filter(|s| s.mv != chosen)
            .take(n.saturating_sub(1))
            .map(|s| MoveResult {
                mv: s.mv.to_uci_str(),
                score: s.score,
            }),
    );

    Ok(ServerResponse {
        ok: true,
        moves: Some(moves),
        strategy: Some(ai.eval_strategy().name().to_string()),
        nodes: Some(nodes),
        elapsed_ms: Some(elapsed * 1000.0),
        ..Default::default()
    })
}

fn do_score(fen: &str, eval: &str) -> Result<ServerResponse, String> {
    let state = parse_fen(fen)?;
    let evaluator = EvalStrategy::from_name(eval)?.evaluator();
    Ok(ServerResponse {
        ok: true,
        eval: Some(evaluator.evaluate(&state.board, state.turn)),
        color: Some(state.turn.to_string()),
        ..Default::default()
    })
}

fn do_omok_best(
    board: &str,
    color: &str,
    level: u8,
    strategy: &str,
    seed: Option<u64>,
) -> Result<ServerResponse, String> {
    let mut board = OmokBoard::parse(board)?;
    let color = parse_color(color)?;
    let config = OmokAIConfig {
        level,
        strategy: OmokStrategy::from_name(strategy)?,
        seed,
    };

    reset_node_count();
    let start = Instant::now();
    let mut ai = OmokAI::new(&config);
    let pos = ai
        .select_move(&mut board, color)
        .ok_or_else(|| "Board is full".to_string())?;
    let elapsed = start.elapsed().as_secs_f64();

    Ok(ServerResponse {
        ok: true,
        row: Some(pos.row),
        col: Some(pos.col),
        color: Some(color.to_string()),
        strategy: Some(ai.strategy().name().to_string()),
        nodes: Some(get_node_count()),
        elapsed_ms: Some(elapsed * 1000.0),
        ..Default::default()
    })
}

fn do_omok_check(board: &str, row: i8, col: i8, color: &str) -> Result<ServerResponse, String> {
    let mut board = OmokBoard::parse(board)?;
    let color = parse_color(color)?;
    let pos = Position::new(row, col);
    if !board.is_empty_at(pos) {
        return Err(format!("Cell {} is occupied or off the board", pos));
    }

    let forbidden = is_forbidden(&mut board, pos, color);
    let win = !forbidden && board.trial(pos, color, |b| check_win(b, pos, color));
    Ok(ServerResponse {
        ok: true,
        row: Some(row),
        col: Some(col),
        color: Some(color.to_string()),
        forbidden: Some(forbidden),
        win: Some(win),
        ..Default::default()
    })
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Moves { fen } => match get_legal_moves_from_fen(&fen) {
            Ok(moves) => {
                println!("Legal moves ({}):", moves.len());
                for mv in &moves {
                    println!("  {}", mv);
                }
            }
            Err(e) => exit_with(e),
        },

        Commands::Status { fen } => match do_status(&fen) {
            Ok(resp) => println!(
                "{} to move: {}",
                resp.color.unwrap_or_default(),
                resp.status.unwrap_or_default()
            ),
            Err(e) => exit_with(e),
        },

        Commands::Best {
            fen,
            level,
            eval,
            seed,
            n,
            json,
        } => match do_best(&fen, level, &eval, seed, n) {
            Ok(resp) if json => println!("{}", to_json(&resp, true)),
            Ok(resp) => {
                println!(
                    "Best moves (level={}, eval={}):",
                    level,
                    resp.strategy.unwrap_or_default()
                );
                for m in resp.moves.unwrap_or_default() {
                    println!("  {} (score: {})", m.mv, m.score);
                }
                println!(
                    "\nStats: nodes={}, time={:.3}ms",
                    resp.nodes.unwrap_or(0),
                    resp.elapsed_ms.unwrap_or(0.0)
                );
            }
            Err(e) => exit_with(e),
        },

        Commands::Score { fen, eval, json } => match do_score(&fen, &eval) {
            Ok(resp) if json => println!("{}", to_json(&resp, false)),
            Ok(resp) => println!(
                "局面评估 ({} 视角): {}",
                resp.color.unwrap_or_default(),
                resp.eval.unwrap_or(0)
            ),
            Err(e) => exit_with(e),
        },

        Commands::OmokBest {
            board,
            color,
            level,
            strategy,
            seed,
            json,
        } => match do_omok_best(&board, &color, level, &strategy, seed) {
            Ok(resp) if json => println!("{}", to_json(&resp, false)),
            Ok(resp) => println!(
                "Best point (level={}, strategy={}): ({}, {})",
                level,
                resp.strategy.unwrap_or_default(),
                resp.row.unwrap_or(-1),
                resp.col.unwrap_or(-1)
            ),
            Err(e) => exit_with(e),
        },

        Commands::OmokCheck {
            board,
            row,
            col,
            color,
            json,
        } => match do_omok_check(&board, row, col, &color) {
            Ok(resp) if json => println!("{}", to_json(&resp, false)),
            Ok(resp) => println!(
                "({}, {}) forbidden={} win={}",
                row,
                col,
                resp.forbidden.unwrap_or(false),
                resp.win.unwrap_or(false)
            ),
            Err(e) => exit_with(e),
        },

        Commands::Server => {
            run_server();
        }
    }
}

/// Server 模式主循环
/// 从 stdin 读取 JSON 请求，返回 JSON 响应到 stdout
fn run_server() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        // 空行跳过
        if line.trim().is_empty() {
            continue;
        }

        let request: ServerRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                let response = ServerResponse::error(&format!("Invalid JSON: {}", e));
                println!("{}", to_json(&response, false));
                let _ = stdout.flush();
                continue;
            }
        };

        if request.cmd == "quit" {
            break;
        }

        let response = handle_request(&request).unwrap_or_else(|e| ServerResponse::error(&e));
        println!("{}", to_json(&response, false));
        let _ = stdout.flush();
    }
}

fn handle_request(request: &ServerRequest) -> Result<ServerResponse, String> {
    let eval = request.eval.as_deref().unwrap_or("classic");
    match request.cmd.as_str() {
        "moves" => {
            let moves = get_legal_moves_from_fen(&request.fen)?;
            Ok(ServerResponse {
                ok: true,
                legal_moves: Some(moves),
                ..Default::default()
            })
        }
        "status" => do_status(&request.fen),
        "best" => do_best(
            &request.fen,
            request.level.unwrap_or(3),
            eval,
            request.seed,
            request.n.unwrap_or(5),
        ),
        "score" => do_score(&request.fen, eval),
        "omok_best" => do_omok_best(
            &request.board,
            request.color.as_deref().unwrap_or("w"),
            request.level.unwrap_or(9),
            request.strategy.as_deref().unwrap_or("deep"),
            request.seed,
        ),
        "omok_check" => {
            let row = request.row.ok_or_else(|| "Missing row".to_string())?;
            let col = request.col.ok_or_else(|| "Missing col".to_string())?;
            do_omok_check(
                &request.board,
                row,
                col,
                request.color.as_deref().unwrap_or("b"),
            )
        }
        _ => Err(format!("Unknown command: {}", request.cmd)),
    }
}
