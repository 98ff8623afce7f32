// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Panorama-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Panorama and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::str::FromStr;
use std::time::Duration;

use criterion::Criterion;

use pprof::criterion::{Output, PProfProfiler};

fn env_clamped<T>(name: &str, default: T, min: T, max: T) -> T
where
    T: FromStr + PartialOrd + Copy,
{
    let value = std::env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<T>().ok())
        .unwrap_or(default);
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Criterion preconfigured with a flamegraph profiler. Tunable via `PANORAMA_PROFILE_FREQ`,
/// `PANORAMA_BENCH_SAMPLE_SIZE`, `PANORAMA_BENCH_WARMUP_SECS` and
/// `PANORAMA_BENCH_MEASUREMENT_SECS`.
pub fn criterion() -> Criterion {
    let frequency = env_clamped("PANORAMA_PROFILE_FREQ", 100i32, 1, 1000);
    let sample_size = env_clamped("PANORAMA_BENCH_SAMPLE_SIZE", 50usize, 10, 200);
    let warmup_secs = env_clamped("PANORAMA_BENCH_WARMUP_SECS", 2u64, 1, 60);
    let measurement_secs = env_clamped("PANORAMA_BENCH_MEASUREMENT_SECS", 4u64, 1, 120);

    Criterion::default()
        .sample_size(sample_size)
        .warm_up_time(Duration::from_secs(warmup_secs))
        .measurement_time(Duration::from_secs(measurement_secs))
        .with_profiler(PProfProfiler::new(frequency, Output::Flamegraph(None)))
}
