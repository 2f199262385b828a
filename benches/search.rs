use boardgame_ai::ai::{search_root, ClassicEval};
use boardgame_ai::omok::ai::minimax_root;
use boardgame_ai::test_positions::{ITALIAN, OMOK_MIDGAME};
use boardgame_ai::{parse_fen, Color, OmokBoard};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn chess_search(c: &mut Criterion) {
    let state = parse_fen(ITALIAN).unwrap();
    c.bench_function("chess legal moves", |b| {
        b.iter(|| black_box(state.board.get_legal_moves(state.turn)))
    });
    c.bench_function("chess search depth 2", |b| {
        b.iter(|| black_box(search_root(&state.board, state.turn, 2, &ClassicEval)))
    });
}

fn omok_search(c: &mut Criterion) {
    let board = OmokBoard::parse(OMOK_MIDGAME).unwrap();
    c.bench_function("omok minimax depth 2", |b| {
        b.iter(|| {
            let mut scratch = board;
            black_box(minimax_root(&mut scratch, Color::White, 2))
        })
    });
}

criterion_group!(benches, chess_search, omok_search);
criterion_main!(benches);
