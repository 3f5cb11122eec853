//! Monotonic root finder
//!
//! Inverts a monotonic scalar function by bounded bisection from a reference
//! point. The two entry points differ in which side of the reference point
//! they search:
//!
//! ```text
//! search_down:  [0 ............ x0]          plain bisection
//! search_up:           [x0 ... 2x0 ... 4x0 ...)  doubling, then bisection in 1/x
//! ```
//!
//! Bisecting in `1/x` on the upward side keeps the midpoint well scaled when
//! the bracket spans several orders of magnitude.

use tracing::trace;

use crate::common::errors::{EngineError, Result};

/// Default relative tolerance on the returned abscissa
pub const DEFAULT_EPSILON: f64 = 1e-5;

/// Default cap on doubling and bisection steps
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Outcome of a single search
#[derive(Debug, Clone, Copy, PartialEq)]
struct Outcome {
    root: f64,
    iterations: usize,
    converged: bool,
}

impl Outcome {
    fn exact(root: f64, iterations: usize) -> Self {
        Self {
            root,
            iterations,
            converged: true,
        }
    }
}

fn same_sign(a: f64, b: f64) -> bool {
    (a > 0.0) == (b > 0.0)
}

/// Bounded bisection solver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootFinder {
    epsilon: f64,
    max_iterations: usize,
}

impl Default for RootFinder {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl RootFinder {
    pub fn new(epsilon: f64, max_iterations: usize) -> Self {
        Self {
            epsilon,
            max_iterations,
        }
    }

    /// Find the root of `f` in `[0, x0]`.
    ///
    /// Returns `x0` when `f(x0)` is already zero or not finite. When the
    /// iteration cap is hit, the last midpoint is returned.
    pub fn search_down<F>(&self, x0: f64, f: F) -> f64
    where
        F: Fn(f64) -> f64,
    {
        self.best_effort("search_down", x0, self.bisect_down(x0, f))
    }

    /// Find the root of `f` in `[x0, +inf)`.
    ///
    /// Returns `x0` when `f(x0)` is already zero or not finite, and
    /// `f64::INFINITY` when doubling overflows without a sign change.
    pub fn search_up<F>(&self, x0: f64, f: F) -> f64
    where
        F: Fn(f64) -> f64,
    {
        self.best_effort("search_up", x0, self.bisect_up(x0, f))
    }

    /// Like [`search_down`](Self::search_down) but fails with
    /// [`EngineError::RootNotFound`] instead of returning a best effort.
    pub fn try_search_down<F>(&self, x0: f64, f: F) -> Result<f64>
    where
        F: Fn(f64) -> f64,
    {
        Self::strict(self.bisect_down(x0, f))
    }

    /// Like [`search_up`](Self::search_up) but fails with
    /// [`EngineError::RootNotFound`] instead of returning a best effort.
    pub fn try_search_up<F>(&self, x0: f64, f: F) -> Result<f64>
    where
        F: Fn(f64) -> f64,
    {
        Self::strict(self.bisect_up(x0, f))
    }

    fn best_effort(&self, direction: &str, x0: f64, outcome: Outcome) -> f64 {
        if !outcome.converged {
            trace!(
                direction,
                x0,
                best = outcome.root,
                iterations = outcome.iterations,
                "root finder stopped without converging"
            );
        }
        outcome.root
    }

    fn strict(outcome: Outcome) -> Result<f64> {
        if outcome.converged {
            Ok(outcome.root)
        } else {
            Err(EngineError::RootNotFound {
                best: outcome.root,
                iterations: outcome.iterations,
            })
        }
    }

    fn bisect_down<F>(&self, x0: f64, f: F) -> Outcome
    where
        F: Fn(f64) -> f64,
    {
        let f0 = f(x0);
        if x0 <= 0.0 || f0 == 0.0 || !f0.is_finite() {
            return Outcome::exact(x0, 0);
        }

        let mut lo = 0.0;
        let mut hi = x0;
        let mut mid = (lo + hi) / 2.0;

        for iteration in 1..=self.max_iterations {
            mid = (lo + hi) / 2.0;
            let fm = f(mid);
            if fm == 0.0 {
                return Outcome::exact(mid, iteration);
            }
            // root lies on the side whose sign differs from f(x0)
            if same_sign(fm, f0) {
                hi = mid;
            } else {
                lo = mid;
            }
            if hi - lo <= self.epsilon * mid {
                return Outcome::exact((lo + hi) / 2.0, iteration);
            }
        }

        Outcome {
            root: mid,
            iterations: self.max_iterations,
            converged: false,
        }
    }

    fn bisect_up<F>(&self, x0: f64, f: F) -> Outcome
    where
        F: Fn(f64) -> f64,
    {
        let f0 = f(x0);
        if x0 <= 0.0 || f0 == 0.0 || !f0.is_finite() {
            return Outcome::exact(x0, 0);
        }

        let mut lo = x0;
        let mut hi = x0 * 2.0;
        let mut iteration = 0;

        loop {
            iteration += 1;
            if !hi.is_finite() || iteration > self.max_iterations {
                return Outcome {
                    root: f64::INFINITY,
                    iterations: iteration,
                    converged: false,
                };
            }
            let fh = f(hi);
            if fh == 0.0 {
                return Outcome::exact(hi, iteration);
            }
            if !same_sign(fh, f0) {
                break;
            }
            lo = hi;
            hi *= 2.0;
        }

        // bisect on y = 1/x, y_lo corresponds to hi and y_hi to lo
        let mut y_lo = 1.0 / hi;
        let mut y_hi = 1.0 / lo;
        let mut x = (lo + hi) / 2.0;

        for step in 1..=self.max_iterations {
            let y_mid = (y_lo + y_hi) / 2.0;
            x = 1.0 / y_mid;
            let fx = f(x);
            if fx == 0.0 {
                return Outcome::exact(x, iteration + step);
            }
            if same_sign(fx, f0) {
                y_hi = y_mid;
            } else {
                y_lo = y_mid;
            }
            let (x_lo, x_hi) = (1.0 / y_hi, 1.0 / y_lo);
            if x_hi - x_lo <= self.epsilon * x {
                return Outcome::exact(2.0 / (y_lo + y_hi), iteration + step);
            }
        }

        Outcome {
            root: x,
            iterations: iteration + self.max_iterations,
            converged: false,
        }
    }
}

/// [`RootFinder::search_down`] with default tolerance and iteration cap
pub fn search_down<F>(x0: f64, f: F) -> f64
where
    F: Fn(f64) -> f64,
{
    RootFinder::default().search_down(x0, f)
}

/// [`RootFinder::search_up`] with default tolerance and iteration cap
pub fn search_up<F>(x0: f64, f: F) -> f64
where
    F: Fn(f64) -> f64,
{
    RootFinder::default().search_up(x0, f)
}
