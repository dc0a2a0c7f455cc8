//! CPU and memory micro-benchmark.
//!
//! The workload is fixed in iteration count; only its wall-clock duration
//! varies between devices.

use std::hint::black_box;
use std::time::{Duration, Instant};

/// Iterations of the numeric loop.
pub const NUMERIC_ITERATIONS: u32 = 100_000;
/// Elements in the array phase.
pub const ARRAY_SIZE: usize = 10_000;

/// Run the workload and return its duration.
pub fn run_workload() -> Duration {
    let start = Instant::now();

    let mut acc = 0.0f64;
    for i in 0..NUMERIC_ITERATIONS {
        let x = f64::from(i);
        acc += x.sin() * x.cos() + x.sqrt();
    }
    black_box(acc);

    // Reverse order so the sort has work to do.
    let mut values: Vec<u64> = (0..ARRAY_SIZE as u64)
        .map(|i| (ARRAY_SIZE as u64 - i).wrapping_mul(2_654_435_761) % 100_000)
        .collect();
    values.sort_unstable();
    let mapped: Vec<u64> = values
        .iter()
        .filter(|v| *v % 2 == 0)
        .map(|v| v * 2)
        .collect();
    black_box(mapped);

    start.elapsed()
}

/// Map a workload duration to a 0-100 score.
pub fn score_duration(elapsed: Duration) -> u8 {
    let ms = elapsed.as_secs_f64() * 1000.0;
    let score = if ms < 50.0 {
        100.0 - (ms / 50.0) * 10.0
    } else if ms < 150.0 {
        90.0 - ((ms - 50.0) / 100.0) * 40.0
    } else {
        (50.0 - (ms - 150.0) / 10.0).max(0.0)
    };
    score.round().clamp(0.0, 100.0) as u8
}

/// Run the benchmark and score it.
pub fn run_benchmark() -> u8 {
    let elapsed = run_workload();
    let score = score_duration(elapsed);
    tracing::debug!("Benchmark finished in {:?}, score {}", elapsed, score);
    score
}
