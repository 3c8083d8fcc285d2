//! Beta and Gamma density evaluation.
//!
//! Densities are computed in log-space and exponentiated once, so large
//! shape parameters never overflow the normalizing constant.
//!
//! # Example
//!
//! ```
//! use bayes_conjugate::distribution::{density, DistributionFamily, ShapeParameters};
//!
//! let shape = ShapeParameters::new(2.0, 2.0).expect("valid shape");
//!
//! // Beta(2, 2) has density 6x(1-x), so 1.5 at the centre
//! let d = density(DistributionFamily::Beta, shape, 0.5).expect("finite density");
//! assert!((d - 1.5).abs() < 1e-4);
//!
//! // Outside the support the density is zero
//! assert_eq!(density(DistributionFamily::Beta, shape, 1.0).expect("zero"), 0.0);
//! ```

pub mod curve;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, EngineError, Result};
use crate::special::{ln_beta, ln_gamma};

pub use curve::{curve, curve_with, Curve, CurveConfig, CurvePoint};

/// Distribution family of a conjugate prior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionFamily {
    /// Beta(α, β) over a success probability in (0, 1), updated by Binomial data.
    #[default]
    Beta,
    /// Gamma(α, β) over a positive rate (β is the rate), updated by Poisson data.
    Gamma,
}

impl DistributionFamily {
    /// Prior shown before the user picks parameters: Beta(2, 2) or Gamma(2, 1).
    #[must_use]
    pub fn default_prior(self) -> ShapeParameters {
        match self {
            DistributionFamily::Beta => ShapeParameters {
                alpha: 2.0,
                beta: 2.0,
            },
            DistributionFamily::Gamma => ShapeParameters {
                alpha: 2.0,
                beta: 1.0,
            },
        }
    }

    /// Lowercase family name, as accepted by [`FromStr`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DistributionFamily::Beta => "beta",
            DistributionFamily::Gamma => "gamma",
        }
    }
}

impl fmt::Display for DistributionFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistributionFamily {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beta" => Ok(DistributionFamily::Beta),
            "gamma" => Ok(DistributionFamily::Gamma),
            _ => Err(EngineError::Domain {
                param: "family".to_string(),
                value: s.to_string(),
                constraint: "one of \"beta\", \"gamma\"".to_string(),
            }),
        }
    }
}

/// Shape parameters (α, β) of a Beta or Gamma distribution.
///
/// For Beta both are concentrations; for Gamma α is the shape and β the
/// rate. Both are finite and strictly positive once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawShape")]
pub struct ShapeParameters {
    alpha: f64,
    beta: f64,
}

/// Unvalidated wire form of [`ShapeParameters`].
#[derive(Deserialize)]
struct RawShape {
    alpha: f64,
    beta: f64,
}

impl TryFrom<RawShape> for ShapeParameters {
    type Error = EngineError;

    fn try_from(raw: RawShape) -> Result<Self> {
        Self::new(raw.alpha, raw.beta)
    }
}

impl ShapeParameters {
    /// Creates shape parameters after checking α > 0 and β > 0.
    ///
    /// # Errors
    ///
    /// Returns a domain error if either value is non-positive or non-finite.
    ///
    /// # Example
    ///
    /// ```
    /// use bayes_conjugate::distribution::ShapeParameters;
    ///
    /// let shape = ShapeParameters::new(3.0, 5.0).expect("valid shape");
    /// assert_eq!(shape.alpha(), 3.0);
    /// assert!(ShapeParameters::new(0.0, 1.0).is_err());
    /// ```
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        ensure_positive("alpha", alpha)?;
        ensure_positive("beta", beta)?;
        Ok(Self { alpha, beta })
    }

    /// Beta(1, 1): every success probability equally likely.
    #[must_use]
    pub fn uniform() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
        }
    }

    /// Jeffreys prior Beta(0.5, 0.5), the arcsine distribution.
    #[must_use]
    pub fn jeffreys() -> Self {
        Self {
            alpha: 0.5,
            beta: 0.5,
        }
    }

    /// Weakly informative Gamma(0.001, 0.001) for rates.
    #[must_use]
    pub fn noninformative() -> Self {
        Self {
            alpha: 0.001,
            beta: 0.001,
        }
    }

    /// Returns α.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Returns β.
    #[must_use]
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Returns `(α, β)`.
    #[must_use]
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.alpha, self.beta)
    }

    /// Parameters with α and β exchanged, i.e. the law of `1 − X` for Beta.
    #[must_use]
    pub(crate) fn swapped(self) -> Self {
        Self {
            alpha: self.beta,
            beta: self.alpha,
        }
    }
}

impl fmt::Display for ShapeParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(α = {}, β = {})", self.alpha, self.beta)
    }
}

/// Log of the normalizing constant: `−ln B(α, β)` or `α ln β − ln Γ(α)`.
pub(crate) fn ln_normalizer(family: DistributionFamily, shape: ShapeParameters) -> Result<f64> {
    let ShapeParameters { alpha, beta } = shape;
    match family {
        DistributionFamily::Beta => Ok(-ln_beta(alpha, beta)?),
        DistributionFamily::Gamma => Ok(alpha * beta.ln() - ln_gamma(alpha)?),
    }
}

/// Log of the factor left after removing `C · x^(α−1)` from the density.
///
/// `(β−1) ln(1−x)` for Beta, `−βx` for Gamma. Both vanish at `x = 0`.
pub(crate) fn ln_kernel(family: DistributionFamily, shape: ShapeParameters, x: f64) -> f64 {
    match family {
        DistributionFamily::Beta => {
            if x == 0.0 {
                0.0
            } else {
                (shape.beta - 1.0) * (1.0 - x).ln()
            }
        }
        DistributionFamily::Gamma => -shape.beta * x,
    }
}

/// Whether `x` lies in the open support of the family.
pub(crate) fn in_support(family: DistributionFamily, x: f64) -> bool {
    match family {
        DistributionFamily::Beta => x > 0.0 && x < 1.0,
        DistributionFamily::Gamma => x > 0.0,
    }
}

/// `ln C + (α−1) ln x + ln kernel(x)` for `x` inside the support, given `ln C`.
pub(crate) fn ln_pdf_unchecked(
    family: DistributionFamily,
    shape: ShapeParameters,
    ln_c: f64,
    x: f64,
) -> f64 {
    ln_c + (shape.alpha - 1.0) * x.ln() + ln_kernel(family, shape, x)
}

/// Log-density at `x`; `−∞` outside the open support.
///
/// # Errors
///
/// Returns a domain error when `x` is NaN.
pub fn ln_pdf(family: DistributionFamily, shape: ShapeParameters, x: f64) -> Result<f64> {
    if x.is_nan() {
        return Err(EngineError::domain("x", x, "not NaN"));
    }
    if !in_support(family, x) {
        return Ok(f64::NEG_INFINITY);
    }
    let ln_c = ln_normalizer(family, shape)?;
    Ok(ln_pdf_unchecked(family, shape, ln_c, x))
}

/// Density at `x`, zero outside the open support (boundaries included).
///
/// # Errors
///
/// Returns a domain error when `x` is NaN, and a computation error when the
/// exponentiated value is not finite (e.g. `x` so close to a singular
/// boundary that the density overflows).
pub fn density(family: DistributionFamily, shape: ShapeParameters, x: f64) -> Result<f64> {
    let value = ln_pdf(family, shape, x)?.exp();
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::non_finite("density", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(alpha: f64, beta: f64) -> ShapeParameters {
        ShapeParameters::new(alpha, beta).expect("valid shape")
    }

    #[test]
    fn test_shape_rejects_invalid() {
        for (a, b) in [
            (0.0, 1.0),
            (1.0, 0.0),
            (-1.0, 2.0),
            (f64::NAN, 1.0),
            (1.0, f64::INFINITY),
        ] {
            let err = ShapeParameters::new(a, b).expect_err("invalid shape");
            assert!(err.is_domain());
        }
    }

    #[test]
    fn test_presets() {
        assert_eq!(ShapeParameters::uniform().as_tuple(), (1.0, 1.0));
        assert_eq!(ShapeParameters::jeffreys().as_tuple(), (0.5, 0.5));
        assert_eq!(ShapeParameters::noninformative().as_tuple(), (0.001, 0.001));
        assert_eq!(DistributionFamily::Beta.default_prior().as_tuple(), (2.0, 2.0));
        assert_eq!(DistributionFamily::Gamma.default_prior().as_tuple(), (2.0, 1.0));
    }

    #[test]
    fn test_family_parse_and_display() {
        let beta: DistributionFamily = "beta".parse().expect("beta");
        let gamma: DistributionFamily = " Gamma ".parse().expect("gamma");
        assert_eq!(beta, DistributionFamily::Beta);
        assert_eq!(gamma, DistributionFamily::Gamma);
        assert!("normal".parse::<DistributionFamily>().is_err());
        assert_eq!(DistributionFamily::Gamma.to_string(), "gamma");
    }

    #[test]
    fn test_beta_density_closed_form() {
        // Beta(2, 3): 12 x (1-x)^2
        let s = shape(2.0, 3.0);
        for &x in &[0.1, 0.3, 0.5, 0.8] {
            let expected = 12.0 * x * (1.0 - x) * (1.0 - x);
            let d = density(DistributionFamily::Beta, s, x).expect("finite");
            assert!((d - expected).abs() < 1e-3 * expected.max(1.0), "x={x}: {d} vs {expected}");
        }
    }

    #[test]
    fn test_beta_uniform_density_is_one() {
        let d = density(DistributionFamily::Beta, ShapeParameters::uniform(), 0.37)
            .expect("finite");
        assert!((d - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_beta_density_zero_outside_support() {
        let s = shape(0.5, 0.5);
        for &x in &[-0.5, 0.0, 1.0, 1.5] {
            assert_eq!(density(DistributionFamily::Beta, s, x).expect("zero"), 0.0);
        }
    }

    #[test]
    fn test_gamma_density_closed_form() {
        // Gamma(2, 1): x e^{-x}
        let s = shape(2.0, 1.0);
        for &x in &[0.5f64, 1.0, 2.0, 5.0] {
            let expected = x * (-x).exp();
            let d = density(DistributionFamily::Gamma, s, x).expect("finite");
            assert!((d - expected).abs() < 1e-4, "x={x}: {d} vs {expected}");
        }
    }

    #[test]
    fn test_gamma_exponential_special_case() {
        // Gamma(1, 3) is Exponential(3)
        let s = shape(1.0, 3.0);
        let d = density(DistributionFamily::Gamma, s, 0.2).expect("finite");
        let expected = 3.0 * (-0.6_f64).exp();
        assert!((d - expected).abs() < 1e-4);
    }

    #[test]
    fn test_gamma_density_zero_for_non_positive() {
        let s = shape(3.0, 2.0);
        assert_eq!(density(DistributionFamily::Gamma, s, 0.0).expect("zero"), 0.0);
        assert_eq!(density(DistributionFamily::Gamma, s, -4.0).expect("zero"), 0.0);
    }

    #[test]
    fn test_large_shapes_do_not_overflow() {
        let s = shape(5000.0, 5000.0);
        let d = density(DistributionFamily::Beta, s, 0.5).expect("finite");
        // Peak of a near-normal with sd ≈ 0.005: about 1/(sd √(2π)) ≈ 79.8
        assert!(d > 70.0 && d < 90.0, "peak density {d}");

        let g = shape(2000.0, 10.0);
        let d = density(DistributionFamily::Gamma, g, 200.0).expect("finite");
        assert!(d.is_finite() && d > 0.0);
    }

    #[test]
    fn test_overflowing_density_is_computation_error() {
        // Smallest subnormal: x^(α−1) exceeds f64::MAX for α near 0
        let tiny = f64::from_bits(1);
        let err = density(DistributionFamily::Beta, shape(0.001, 1.0), tiny).expect_err("overflow");
        assert!(err.is_computation());
    }

    #[test]
    fn test_nan_point_is_domain_error() {
        let err = density(DistributionFamily::Gamma, shape(2.0, 1.0), f64::NAN).expect_err("NaN x");
        assert!(err.is_domain());
    }

    #[test]
    fn test_ln_pdf_matches_density() {
        let s = shape(4.0, 2.5);
        let ln = ln_pdf(DistributionFamily::Beta, s, 0.6).expect("finite");
        let d = density(DistributionFamily::Beta, s, 0.6).expect("finite");
        assert!((ln.exp() - d).abs() < 1e-12);
        assert_eq!(
            ln_pdf(DistributionFamily::Beta, s, 1.0).expect("outside"),
            f64::NEG_INFINITY
        );
    }

    #[test]
    fn test_shape_deserialize_validates() {
        let ok: ShapeParameters =
            serde_json::from_str(r#"{"alpha":2.0,"beta":3.0}"#).expect("valid");
        assert_eq!(ok.as_tuple(), (2.0, 3.0));
        assert!(serde_json::from_str::<ShapeParameters>(r#"{"alpha":-2.0,"beta":3.0}"#).is_err());
    }
}
