// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use criterion::{BenchmarkId, Criterion, Throughput};
use ripple_core::{EvaluationContext, NotifyMode, ReactiveConfig, Subject};
use ripple_test_utils::{ReactionLog, RecordingConsumer};
use std::hint::black_box;

pub fn bench_broadcast(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadcast");

    // Subscriber counts to test fan-out
    let subscriber_counts = [1usize, 8, 64, 256];
    let modes = [
        ("batched", NotifyMode::Batched),
        ("synchronous", NotifyMode::Synchronous),
    ];

    for &(label, mode) in &modes {
        let context = EvaluationContext::with_config(ReactiveConfig::new().with_mode(mode));
        for &subs in &subscriber_counts {
            let log = ReactionLog::new();
            let subject = Subject::new();
            // reverse creation order so the synchronous sort has work to do
            let consumers: Vec<_> = (0..subs).map(|_| RecordingConsumer::new(&log)).collect();
            for consumer in consumers.iter().rev() {
                subject.add_subscriber(consumer.handle());
            }

            group.throughput(Throughput::Elements(subs as u64));
            let id = BenchmarkId::new(label, format!("subs_{subs}"));
            group.bench_with_input(id, &subs, |bencher, _| {
                bencher.iter(|| {
                    black_box(subject.broadcast_in(&context)).unwrap();
                    log.clear();
                });
            });
        }
    }

    group.finish();
}

pub fn bench_register(c: &mut Criterion) {
    let mut group = c.benchmark_group("register_if_evaluating");
    let log = ReactionLog::new();
    let consumer = RecordingConsumer::new(&log);
    let context = EvaluationContext::new();

    group.bench_function("idle", |bencher| {
        let subject = Subject::new();
        bencher.iter(|| subject.register_if_evaluating_in(black_box(&context)));
    });

    group.bench_function("tracking", |bencher| {
        bencher.iter(|| {
            let subject = Subject::new();
            context.evaluate(consumer.handle(), || subject.register_if_evaluating_in(&context));
            black_box(subject.subscriber_count())
        });
    });

    group.finish();
}
