//! Resolver benchmarks for skirmish_core.
//!
//! Run with: `cargo bench -p skirmish_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use skirmish_core::prelude::*;

fn preset_players() -> (Player, Player) {
    let catalog = UnitCatalog::default();
    let a = compositions::mixed(&catalog, 1).map(|board| Player::new("p1", "Alice", board));
    let b = compositions::balanced(&catalog, 2).map(|board| Player::new("p2", "Bob", board));
    (a.unwrap(), b.unwrap())
}

fn full_board(prefix: &str, hp: u32, attack: u32) -> Player {
    let board = BoardPosition::ALL
        .into_iter()
        .enumerate()
        .fold(Board::new(), |board, (i, position)| {
            let unit = Unit::with_hp(format!("{prefix}-{i}"), hp, hp, attack).unwrap();
            board.place_unit(unit, position).unwrap()
        });
    Player::new(prefix, prefix, board)
}

/// Runs resolver benchmarks for the skirmish_core crate.
pub fn resolve_benchmark(c: &mut Criterion) {
    let warrior = Unit::with_hp("warrior", 3, 3, 2).unwrap();
    let knight = Unit::with_hp("knight", 4, 4, 1).unwrap();
    c.bench_function("duel_warrior_knight", |b| {
        b.iter(|| evaluate_duel(black_box(&warrior), black_box(&knight)));
    });

    let (mixed, balanced) = preset_players();
    c.bench_function("mixed_vs_balanced", |b| {
        b.iter(|| evaluate(black_box(&mixed), black_box(&balanced)));
    });

    // Long battle: five 500 hp units a side hitting for 1.
    let a = full_board("a", 500, 1);
    let z = full_board("z", 500, 1);
    c.bench_function("full_boards_long", |b| {
        b.iter(|| evaluate(black_box(&a), black_box(&z)));
    });

    let targets = full_board("t", 5, 1).board;
    c.bench_function("valid_targets", |b| {
        b.iter(|| skirmish_core::targeting::valid_targets(black_box(&targets)));
    });
}

criterion_group!(benches, resolve_benchmark);
criterion_main!(benches);
