//! Conjugate-prior updating engine for Beta-Binomial and Gamma-Poisson models.
//!
//! Pick a prior family and shape, supply observed data, and get prior and
//! posterior density curves, summary statistics and tail probabilities.
//! Every operation is a pure, synchronous function of its inputs.
//!
//! # Quick Start
//!
//! ```
//! use bayes_conjugate::prelude::*;
//!
//! // Prior Beta(2, 2), then 7 successes and 3 failures
//! let prior = ShapeParameters::new(2.0, 2.0).expect("valid prior");
//! let result = update(
//!     DistributionFamily::Beta,
//!     prior,
//!     ObservedData::binomial(7, 3),
//!     ProbabilityQuery::greater(0.5),
//! )
//! .expect("valid inputs");
//!
//! assert_eq!(result.posterior_shape.as_tuple(), (9.0, 5.0));
//! assert_eq!(result.posterior_stats.mode, Mode::Numeric(8.0 / 12.0));
//! let p = result.posterior_tail.value().expect("computed");
//! assert!(p > 0.8);
//! ```
//!
//! # Modules
//!
//! - [`special`]: log-gamma and log-beta functions
//! - [`distribution`]: Beta/Gamma densities and discretized curves
//! - [`stats`]: closed-form mode, mean, variance, standard deviation
//! - [`tail`]: one-sided tail probabilities by numerical integration
//! - [`conjugate`]: posterior update and the combined result
//! - [`format`]: value formatting for belief tables
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) on updates, dropped curve points and unavailable tail probabilities | off |

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::warn!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_warn {
    ($($arg:tt)*) => { tracing::warn!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_warn {
    ($($arg:tt)*) => {};
}

pub mod conjugate;
pub mod distribution;
pub mod error;
pub mod format;
pub mod prelude;
pub mod special;
pub mod stats;
pub mod tail;

pub use conjugate::{update, PosteriorEngine, PosteriorResult};
pub use error::{EngineError, Result};
