//! Chess Engine Benchmarks
//!
//! Performance benchmarks for move generation and game queries using Criterion.

use chess_engine::move_gen::{generate_pseudo_legal_moves, legal_moves};
use chess_engine::{Board, Color, Game, choose_move, format_fen, parse_fen};
use criterion::{Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::hint::black_box;

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn bench_parse_fen(c: &mut Criterion) {
    c.bench_function("parse_fen_kiwipete", |b| {
        b.iter(|| black_box(parse_fen(black_box(KIWIPETE))))
    });
}

fn bench_format_fen(c: &mut Criterion) {
    let board = parse_fen(KIWIPETE).unwrap();
    c.bench_function("format_fen_kiwipete", |b| {
        b.iter(|| black_box(format_fen(&board)))
    });
}

fn bench_move_generation_starting(c: &mut Criterion) {
    let board = Board::default();

    c.bench_function("pseudo_legal_starting_position", |b| {
        b.iter(|| black_box(generate_pseudo_legal_moves(&board, Color::White)))
    });
    c.bench_function("legal_starting_position", |b| {
        b.iter(|| black_box(legal_moves(&board, Color::White)))
    });
}

fn bench_move_generation_kiwipete(c: &mut Criterion) {
    let board = parse_fen(KIWIPETE).unwrap();

    c.bench_function("legal_kiwipete", |b| {
        b.iter(|| black_box(legal_moves(&board, Color::White)))
    });
}

fn bench_status(c: &mut Criterion) {
    let game = Game::from_fen(KIWIPETE).unwrap();

    c.bench_function("status_kiwipete", |b| b.iter(|| black_box(game.status())));
}

fn bench_random_game(c: &mut Criterion) {
    c.bench_function("random_game_40_plies", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(1);
            let mut game = Game::new();
            for _ in 0..40 {
                let legal = game.legal_moves();
                let Some(mv) = choose_move(game.board(), &legal, &mut rng) else {
                    break;
                };
                let _ = game.apply_move(mv);
            }
            black_box(game.ply())
        })
    });
}

criterion_group!(
    benches,
    bench_parse_fen,
    bench_format_fen,
    bench_move_generation_starting,
    bench_move_generation_kiwipete,
    bench_status,
    bench_random_game,
);
criterion_main!(benches);
