//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use bayes_conjugate::prelude::*;
//! ```

pub use crate::conjugate::{
    posterior_shape, update, EngineConfig, ObservedData, PosteriorEngine, PosteriorResult,
    TailEstimate,
};
pub use crate::distribution::{
    curve, curve_with, density, Curve, CurveConfig, CurvePoint, DistributionFamily,
    ShapeParameters,
};
pub use crate::error::EngineError;
pub use crate::stats::{stats, Mode, Statistics};
pub use crate::tail::{
    cdf, tail_probability, tail_probability_with, IntegrationConfig, ProbabilityQuery,
    TailDirection,
};
