// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Performance benchmarks for scale-trainer
//!
//! Run with: cargo bench
//!
//! These benchmarks measure:
//! - Catalog lookup and enharmonic re-spelling
//! - Octave assignment
//! - Playback plan construction and voice rendering
//! - Daily scale selection

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use scale_trainer::audio::{VoiceBank, VoiceSpec};
use scale_trainer::music::{
    all_scales, assign_octaves, enharmonic_equivalent, find, resolve, ScaleForm, ScaleType,
};
use scale_trainer::playback::{PlaybackMode, PlaybackPlan, Tempo};
use scale_trainer::practice::{select_daily_scales, Confidence, PracticeHistory};

/// Benchmark catalog lookups by canonical and alternative name
fn bench_catalog_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog");

    group.bench_function("find_last", |b| {
        b.iter(|| black_box(find(black_box("Bb Melodic Minor"))))
    });

    group.bench_function("resolve_alt_name", |b| {
        b.iter(|| black_box(resolve(black_box("D# Melodic Minor"))))
    });

    group.finish();
}

/// Benchmark building every enharmonic spelling
fn bench_enharmonic(c: &mut Criterion) {
    let alts: Vec<&str> = all_scales().iter().filter_map(|s| s.alt_name()).collect();

    c.bench_function("enharmonic_all_alt_names", |b| {
        b.iter(|| {
            for alt in &alts {
                black_box(enharmonic_equivalent(alt));
            }
        })
    });
}

/// Benchmark octave assignment across the catalog
fn bench_octaves(c: &mut Criterion) {
    let forms: Vec<_> = all_scales()
        .iter()
        .map(|s| s.with_octave_root(ScaleForm::Ascending))
        .collect();

    c.bench_function("assign_octaves_catalog", |b| {
        b.iter(|| {
            for notes in &forms {
                black_box(assign_octaves(black_box(notes), 4));
            }
        })
    });
}

/// Benchmark plan construction for each mode
fn bench_plan_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_build");
    let scale = resolve("A# Melodic Minor").expect("alt name in catalog");

    for mode in [PlaybackMode::Ascending, PlaybackMode::Descending, PlaybackMode::UpAndDown] {
        group.bench_with_input(BenchmarkId::new("mode", mode), &mode, |b, &mode| {
            b.iter(|| black_box(PlaybackPlan::build(&scale, mode, Tempo::Medium, 4)))
        });
    }

    group.finish();
}

/// Benchmark rendering an audio buffer with a full scale of voices sounding
fn bench_voice_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("voice_render");
    let plan = PlaybackPlan::build(
        find("C Major").expect("catalog scale"),
        PlaybackMode::UpAndDown,
        Tempo::Fast,
        4,
    );

    for buffer_size in [64usize, 256, 512, 1024].iter() {
        group.bench_with_input(
            BenchmarkId::new("frames", buffer_size),
            buffer_size,
            |b, &buffer_size| {
                let mut bank = VoiceBank::new(44_100);
                for note in plan.notes() {
                    bank.schedule(VoiceSpec {
                        frequency: note.frequency,
                        start: 0.0,
                        duration: 60.0,
                        generation: 1,
                    });
                }
                let mut buffer = vec![0.0f32; buffer_size * 2];
                b.iter(|| {
                    bank.render(&mut buffer, 2);
                    black_box(buffer[0])
                })
            },
        );
    }

    group.finish();
}

/// Benchmark daily selection with an empty and a full history
fn bench_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("daily_selection");
    let now = Utc.with_ymd_and_hms(2026, 10, 1, 8, 0, 0).unwrap();

    let empty = PracticeHistory::new();
    let mut full = PracticeHistory::new();
    for (i, scale) in all_scales().iter().enumerate() {
        let confidence = Confidence::try_from((i % 3) as u8 + 1).expect("level in range");
        full.record(scale.name(), confidence, now - Duration::days(i as i64));
    }

    for (label, history) in [("empty", &empty), ("full", &full)] {
        group.bench_with_input(BenchmarkId::new("history", label), history, |b, history| {
            let mut rng = StdRng::seed_from_u64(1);
            b.iter(|| black_box(select_daily_scales(history, &ScaleType::ALL, 2, now, &mut rng)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_catalog_lookup,
    bench_enharmonic,
    bench_octaves,
    bench_plan_build,
    bench_voice_render,
    bench_selection,
);

criterion_main!(benches);
