//! Closed-form summary statistics of Beta and Gamma distributions.
//!
//! No iteration and no special functions: mean, variance and mode are exact
//! up to floating-point rounding. Moments that overflow are reported as
//! computation errors instead of being returned as NaN or infinity.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::distribution::{DistributionFamily, ShapeParameters};
use crate::error::{EngineError, Result};
use crate::format::format_value;

/// Mode of a distribution, which is not always a single number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Unique mode at this value.
    Numeric(f64),
    /// U-shaped Beta (α < 1, β < 1): density peaks at both 0 and 1.
    Bimodal,
    /// No unique mode (flat or monotone-to-a-singularity density).
    Undefined,
}

impl Mode {
    /// The numeric mode, if there is one.
    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Mode::Numeric(v) => Some(v),
            Mode::Bimodal | Mode::Undefined => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Numeric(v) => f.write_str(&format_value(*v)),
            Mode::Bimodal => f.write_str("Bimodal at 0 and 1"),
            Mode::Undefined => f.write_str("Not defined"),
        }
    }
}

/// Summary of one distribution instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Mode (possibly non-numeric)
    pub mode: Mode,
    /// Mean
    pub mean: f64,
    /// Variance
    pub variance: f64,
    /// Standard deviation
    pub std_dev: f64,
}

/// Mode, mean, variance and standard deviation of `family(α, β)`.
///
/// # Errors
///
/// Returns a computation error when a moment is not representable, e.g. the
/// Gamma variance `α/β²` for a vanishing rate.
///
/// # Example
///
/// ```
/// use bayes_conjugate::distribution::{DistributionFamily, ShapeParameters};
/// use bayes_conjugate::stats::{stats, Mode};
///
/// let shape = ShapeParameters::new(3.0, 3.0).expect("valid shape");
/// let s = stats(DistributionFamily::Beta, shape).expect("finite moments");
/// assert_eq!(s.mode, Mode::Numeric(0.5));
/// assert_eq!(s.mean, 0.5);
/// ```
pub fn stats(family: DistributionFamily, shape: ShapeParameters) -> Result<Statistics> {
    let (alpha, beta) = shape.as_tuple();
    let (mode, mean, variance) = match family {
        DistributionFamily::Beta => {
            let sum = alpha + beta;
            ensure_finite("shape sum", sum)?;
            let mean = alpha / sum;
            // αβ / ((α+β)²(α+β+1)) without forming the squared sum
            (beta_mode(alpha, beta), mean, mean * (1.0 - mean) / (sum + 1.0))
        }
        DistributionFamily::Gamma => {
            let mode = if alpha > 1.0 {
                Mode::Numeric((alpha - 1.0) / beta)
            } else {
                Mode::Undefined
            };
            (mode, alpha / beta, alpha / (beta * beta))
        }
    };

    if let Mode::Numeric(value) = mode {
        ensure_finite("mode", value)?;
    }
    ensure_finite("mean", mean)?;
    ensure_finite("variance", variance)?;

    Ok(Statistics {
        mode,
        mean,
        variance,
        std_dev: variance.sqrt(),
    })
}

fn ensure_finite(moment: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EngineError::non_finite(&format!("{moment} of summary statistics"), value))
    }
}

fn beta_mode(alpha: f64, beta: f64) -> Mode {
    if alpha > 1.0 && beta > 1.0 {
        Mode::Numeric((alpha - 1.0) / (alpha + beta - 2.0))
    } else if alpha < 1.0 && beta < 1.0 {
        Mode::Bimodal
    } else if alpha <= 1.0 && beta > 1.0 {
        Mode::Numeric(0.0)
    } else if alpha > 1.0 && beta <= 1.0 {
        Mode::Numeric(1.0)
    } else if alpha == 1.0 && beta == 1.0 {
        // Uniform
        Mode::Undefined
    } else if alpha == 1.0 {
        // β < 1: density increases towards 1
        Mode::Numeric(1.0)
    } else {
        // α < 1, β = 1: density decreases from 0
        Mode::Numeric(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(alpha: f64, beta: f64) -> ShapeParameters {
        ShapeParameters::new(alpha, beta).expect("valid shape")
    }

    fn beta_stats(s: ShapeParameters) -> Statistics {
        stats(DistributionFamily::Beta, s).expect("finite moments")
    }

    fn gamma_stats(s: ShapeParameters) -> Statistics {
        stats(DistributionFamily::Gamma, s).expect("finite moments")
    }

    #[test]
    fn test_beta_moments_exact() {
        let s = beta_stats(shape(2.0, 6.0));
        assert_eq!(s.mean, 2.0 / 8.0);
        assert_eq!(s.variance, 12.0 / (64.0 * 9.0));
        assert_eq!(s.std_dev, (12.0_f64 / 576.0).sqrt());
    }

    #[test]
    fn test_beta_mode_interior() {
        assert_eq!(beta_stats(shape(3.0, 3.0)).mode, Mode::Numeric(0.5));
        // (3 − 1) / (3 + 5 − 2)
        assert_eq!(beta_stats(shape(3.0, 5.0)).mode, Mode::Numeric(2.0 / 6.0));
        let Mode::Numeric(m) = beta_stats(shape(9.0, 5.0)).mode else {
            panic!("interior mode expected");
        };
        assert!((m - 8.0 / 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_beta_mode_boundaries() {
        assert_eq!(beta_stats(shape(1.0, 3.0)).mode, Mode::Numeric(0.0));
        assert_eq!(beta_stats(shape(0.5, 2.0)).mode, Mode::Numeric(0.0));
        assert_eq!(beta_stats(shape(4.0, 1.0)).mode, Mode::Numeric(1.0));
        assert_eq!(beta_stats(shape(4.0, 0.7)).mode, Mode::Numeric(1.0));
    }

    #[test]
    fn test_beta_mode_bimodal() {
        assert_eq!(beta_stats(shape(0.3, 0.4)).mode, Mode::Bimodal);
        assert_eq!(beta_stats(ShapeParameters::jeffreys()).mode, Mode::Bimodal);
    }

    #[test]
    fn test_beta_mode_edge_regimes() {
        assert_eq!(beta_stats(ShapeParameters::uniform()).mode, Mode::Undefined);
        assert_eq!(beta_stats(shape(1.0, 0.5)).mode, Mode::Numeric(1.0));
        assert_eq!(beta_stats(shape(0.5, 1.0)).mode, Mode::Numeric(0.0));
    }

    #[test]
    fn test_gamma_moments_exact() {
        let s = gamma_stats(shape(12.0, 5.0));
        assert_eq!(s.mean, 12.0 / 5.0);
        assert_eq!(s.variance, 12.0 / 25.0);
        assert_eq!(s.std_dev, (12.0_f64 / 25.0).sqrt());
        assert_eq!(s.mode, Mode::Numeric(11.0 / 5.0));
    }

    #[test]
    fn test_gamma_mode_undefined() {
        assert_eq!(gamma_stats(shape(0.5, 1.0)).mode, Mode::Undefined);
        assert_eq!(gamma_stats(shape(1.0, 2.0)).mode, Mode::Undefined);
    }

    #[test]
    fn test_beta_variance_with_huge_shapes() {
        let s = beta_stats(shape(1e200, 1e200));
        assert_eq!(s.mean, 0.5);
        // 0.25 / (2e200 + 1)
        assert!((s.variance / 1.25e-201 - 1.0).abs() < 1e-12, "{}", s.variance);
        assert!(s.std_dev.is_finite() && s.std_dev > 0.0);
    }

    #[test]
    fn test_overflowing_gamma_moments_are_computation_errors() {
        // Variance 1 / (1e-200)² overflows
        let err = stats(DistributionFamily::Gamma, shape(1.0, 1e-200)).expect_err("overflow");
        assert!(err.is_computation());
        assert!(err.to_string().contains("variance"));

        // Mean and mode 1e300 / 1e-100 overflow as well
        let err = stats(DistributionFamily::Gamma, shape(1e300, 1e-100)).expect_err("overflow");
        assert!(err.is_computation());
    }

    #[test]
    fn test_overflowing_beta_shape_sum_is_computation_error() {
        let err = stats(DistributionFamily::Beta, shape(f64::MAX, f64::MAX)).expect_err("overflow");
        assert!(err.is_computation());
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(Mode::Bimodal.to_string(), "Bimodal at 0 and 1");
        assert_eq!(Mode::Undefined.to_string(), "Not defined");
        assert_eq!(Mode::Numeric(0.5).to_string(), "0.500000000000");
    }

    #[test]
    fn test_mode_value() {
        assert_eq!(Mode::Numeric(2.0).value(), Some(2.0));
        assert_eq!(Mode::Bimodal.value(), None);
        assert_eq!(Mode::Undefined.value(), None);
    }

    #[test]
    fn test_mode_serializes_tagged() {
        let json = serde_json::to_string(&Mode::Bimodal).expect("serialize");
        assert_eq!(json, r#""bimodal""#);
        let json = serde_json::to_string(&Mode::Numeric(0.25)).expect("serialize");
        assert_eq!(json, r#"{"numeric":0.25}"#);
    }
}
