//! Speed Test Utilities
//!
//! Timing helpers for latency-sensitive tests. The engine is invoked once
//! per tick, so its operations are expected to stay well below a
//! millisecond; these helpers make that an assertable property.
//!
//! # Usage
//!
//! ```rust
//! use leveraged_mm::common::speedtest::SpeedTest;
//!
//! let result = SpeedTest::time("sum", || (0..1000).sum::<u64>());
//! assert_eq!(result.result, 499500);
//!
//! let stats = SpeedTest::benchmark("sqrt", 100, || {
//!     std::hint::black_box(2.0f64.sqrt());
//! });
//! println!("{}", stats);
//! ```

use std::fmt;
use std::time::{Duration, Instant};

/// Result of a single timed run
#[derive(Debug, Clone)]
pub struct SpeedTestResult<T> {
    /// The name/label of the test
    pub name: String,
    /// How long the operation took
    pub duration: Duration,
    /// The result of the operation
    pub result: T,
}

impl<T> SpeedTestResult<T> {
    /// Get duration in microseconds
    pub fn micros(&self) -> u128 {
        self.duration.as_micros()
    }

    /// Check if the operation completed within the given duration
    pub fn is_faster_than(&self, max_duration: Duration) -> bool {
        self.duration < max_duration
    }
}

impl<T> fmt::Display for SpeedTestResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[SpeedTest] {} completed in {:?} ({} µs)",
            self.name,
            self.duration,
            self.micros()
        )
    }
}

/// Statistics from running a benchmark multiple times
#[derive(Debug, Clone)]
pub struct BenchmarkStats {
    pub name: String,
    pub iterations: usize,
    pub average: Duration,
    pub min: Duration,
    pub max: Duration,
    pub median: Duration,
    pub p95: Duration,
}

impl fmt::Display for BenchmarkStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[Benchmark] {}", self.name)?;
        writeln!(f, "  Iterations: {}", self.iterations)?;
        writeln!(f, "  Average:    {:?}", self.average)?;
        writeln!(f, "  Min:        {:?}", self.min)?;
        writeln!(f, "  Max:        {:?}", self.max)?;
        writeln!(f, "  Median:     {:?}", self.median)?;
        writeln!(f, "  P95:        {:?}", self.p95)
    }
}

/// Static helpers for timing and benchmarking closures
pub struct SpeedTest;

impl SpeedTest {
    /// Time a synchronous operation
    pub fn time<T, F>(name: &str, f: F) -> SpeedTestResult<T>
    where
        F: FnOnce() -> T,
    {
        let started_at = Instant::now();
        let result = f();

        SpeedTestResult {
            name: name.to_string(),
            duration: started_at.elapsed(),
            result,
        }
    }

    /// Run `f` `iterations` times after one warmup call
    pub fn benchmark<F>(name: &str, iterations: usize, mut f: F) -> BenchmarkStats
    where
        F: FnMut(),
    {
        assert!(iterations > 0, "Iterations must be greater than 0");

        f();

        let mut durations: Vec<Duration> = (0..iterations)
            .map(|_| {
                let start = Instant::now();
                f();
                start.elapsed()
            })
            .collect();
        durations.sort();

        let total: Duration = durations.iter().sum();
        let p95_index = ((iterations as f64 * 0.95) as usize).min(iterations - 1);

        BenchmarkStats {
            name: name.to_string(),
            iterations,
            average: total / iterations as u32,
            min: durations[0],
            max: durations[iterations - 1],
            median: durations[iterations / 2],
            p95: durations[p95_index],
        }
    }

    /// Run a benchmark and assert the average time is within threshold
    ///
    /// # Panics
    /// Panics if the average exceeds `max_average`
    pub fn assert_benchmark_average<F>(
        name: &str,
        iterations: usize,
        max_average: Duration,
        f: F,
    ) -> BenchmarkStats
    where
        F: FnMut(),
    {
        let stats = Self::benchmark(name, iterations, f);
        assert!(
            stats.average < max_average,
            "[SpeedTest FAILED] {} average {:?} exceeded threshold {:?}\n{}",
            name,
            stats.average,
            max_average,
            stats
        );
        stats
    }
}
