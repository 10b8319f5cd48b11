// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for entity extraction and workout assembly over a
// synthetic multi-week training report.

use chrono::Utc;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use trainwerk_extract::{assemble_workouts, normalize, scan_entities};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Twelve weeks of three sessions each, plus a metrics block per week.
fn synthetic_report() -> String {
    let mut report = String::from("Rapport d'entraînement\n");
    for week in 0..12u32 {
        let day = 1 + week * 2;
        report.push_str(&format!("{day:02}/03/2024 musculation\n"));
        report.push_str("Développé couché - 4 séries 8 reps 60kg\n");
        report.push_str("Squat 5x5 100kg repos 2 min\n");
        report.push_str("durée: 1h10\ncalories: 480\n");
        report.push_str(&format!("{:02}/03/2024 course\n", day + 1));
        report.push_str("temps: 42:30\n520 kcal\n");
        report.push_str("yoga\nRemarque: récupération\ndurée 30\n");
        report.push_str(&format!("IMC: 23.{week}\nPoids: 7{week}.5 kg\nFC repos: 5{week} bpm\n"));
    }
    report
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_scan_entities(c: &mut Criterion) {
    let report = synthetic_report();
    let timestamp = Utc::now();

    c.bench_function("scan_entities (12 weeks)", |b| {
        b.iter(|| black_box(scan_entities(black_box(&report), timestamp)));
    });
}

fn bench_assemble_and_normalize(c: &mut Criterion) {
    let report = synthetic_report();
    let entities = scan_entities(&report, Utc::now());

    c.bench_function("assemble + normalize (12 weeks)", |b| {
        b.iter(|| {
            let workouts = assemble_workouts(black_box(&report));
            black_box(normalize(
                workouts,
                entities.metrics.clone(),
                entities.dates.clone(),
            ))
        });
    });
}

criterion_group!(benches, bench_scan_entities, bench_assemble_and_normalize);
criterion_main!(benches);
