// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Performance benchmarks for PROG
//!
//! Run with: cargo bench
//!
//! These benchmarks measure:
//! - Full generation throughput
//! - Analyzer throughput on dense note records
//! - Rhythm algorithm cost

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use prog::analyze::{analyze, NoteRecord, TimedNote};
use prog::engine::{make_chords, ChordRequest, HumanBool, SlotTokens};
use prog::pattern::RhythmAlgo;
use prog::rng::Dice;

fn bench_make_chords(c: &mut Criterion) {
    let mut group = c.benchmark_group("make_chords");

    for voicing in ["none", "drop_2", "descend"] {
        group.bench_with_input(BenchmarkId::new("voicing", voicing), voicing, |b, v| {
            let request = ChordRequest {
                chords: SlotTokens::Text("1 R R R R R R R".to_string()),
                pattern: "x-x-x-x-".to_string(),
                subdiv: "8n".to_string(),
                voicing: v.to_string(),
                random_assist: HumanBool::Index(0),
                bass_note: 1,
                splitter: 1,
                ..Default::default()
            };
            b.iter(|| {
                let mut dice = Dice::from_seed(42);
                black_box(make_chords(black_box(&request), &mut dice).unwrap())
            })
        });
    }
    group.finish();
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");

    for size in [16usize, 64, 256].iter() {
        group.bench_with_input(BenchmarkId::new("notes", size), size, |b, &size| {
            let notes: Vec<TimedNote> = (0..size)
                .map(|i| TimedNote {
                    pitch: 48 + (i % 24) as i32,
                    start_time: i as f64 * 0.23,
                    duration: 0.4,
                    velocity: 100.0,
                })
                .collect();
            let record = NoteRecord {
                total_duration: size as f64 * 0.25,
                notes,
            };
            b.iter(|| black_box(analyze(black_box(&record))))
        });
    }
    group.finish();
}

fn bench_rhythm_algos(c: &mut Criterion) {
    let mut group = c.benchmark_group("rhythm");

    for algo in [RhythmAlgo::LongWild, RhythmAlgo::Flip, RhythmAlgo::Reverse] {
        group.bench_with_input(BenchmarkId::new("algo", algo.name()), &algo, |b, algo| {
            b.iter(|| {
                let mut dice = Dice::from_seed(7);
                black_box(algo.apply(black_box("x-x_x--_x___x-x-"), &mut dice))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_make_chords, bench_analyze, bench_rhythm_algos);
criterion_main!(benches);
