// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// SPDX-License-Identifier: Apache-2.0

use crate::broadcast_bench::{bench_broadcast, bench_register};
use criterion::{criterion_group, criterion_main};

mod broadcast_bench;

criterion_group!(benches, bench_broadcast, bench_register);
criterion_main!(benches);
