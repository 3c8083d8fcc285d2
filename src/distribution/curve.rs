//! Discretized density curves for plotting.
//!
//! Point spacing is a display concern; only the density values at the
//! sampled points are meaningful. Non-finite densities are dropped.

use serde::{Deserialize, Serialize};

use super::{ln_normalizer, ln_pdf_unchecked, DistributionFamily, ShapeParameters};
use crate::error::{ensure_positive, EngineError, Result};

/// One sampled point of a density curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Location in the support
    pub x: f64,
    /// Density at `x`
    pub density: f64,
}

/// Density samples in ascending `x`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Curve {
    points: Vec<CurvePoint>,
}

impl Curve {
    /// Sampled points, ascending in `x`.
    #[must_use]
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    /// Number of retained points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when no point survived evaluation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterator over the points.
    pub fn iter(&self) -> std::slice::Iter<'_, CurvePoint> {
        self.points.iter()
    }

    /// The `x` coordinates.
    #[must_use]
    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    /// The density values.
    #[must_use]
    pub fn densities(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.density).collect()
    }

    /// Trapezoidal area under the sampled points.
    ///
    /// Close to 1 when the sampled domain covers the bulk of the mass.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| 0.5 * (w[0].density + w[1].density) * (w[1].x - w[0].x))
            .sum()
    }
}

impl<'a> IntoIterator for &'a Curve {
    type Item = &'a CurvePoint;
    type IntoIter = std::slice::Iter<'a, CurvePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl IntoIterator for Curve {
    type Item = CurvePoint;
    type IntoIter = std::vec::IntoIter<CurvePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

/// How curves are discretized.
///
/// # Example
///
/// ```
/// use bayes_conjugate::distribution::CurveConfig;
///
/// let config = CurveConfig::default().with_points(500).with_gamma_range_multiplier(8.0);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.points, 500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    /// Requested number of samples
    pub points: usize,
    /// Beta curves cover `[beta_margin, 1 − beta_margin]`
    pub beta_margin: f64,
    /// Gamma curves end at `gamma_range_multiplier × mean`
    pub gamma_range_multiplier: f64,
    /// Gamma curves start at `max(step, gamma_min_x)`
    pub gamma_min_x: f64,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            points: 300,
            beta_margin: 0.0033,
            gamma_range_multiplier: 5.0,
            gamma_min_x: 0.0,
        }
    }
}

impl CurveConfig {
    /// Sets the number of samples.
    #[must_use]
    pub fn with_points(mut self, points: usize) -> Self {
        self.points = points;
        self
    }

    /// Sets the Beta boundary margin.
    #[must_use]
    pub fn with_beta_margin(mut self, margin: f64) -> Self {
        self.beta_margin = margin;
        self
    }

    /// Sets the Gamma range multiplier.
    #[must_use]
    pub fn with_gamma_range_multiplier(mut self, multiplier: f64) -> Self {
        self.gamma_range_multiplier = multiplier;
        self
    }

    /// Sets the smallest `x` of Gamma curves.
    #[must_use]
    pub fn with_gamma_min_x(mut self, min_x: f64) -> Self {
        self.gamma_min_x = min_x;
        self
    }

    /// Checks every field against its constraint.
    ///
    /// # Errors
    ///
    /// Returns a domain error naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.points == 0 {
            return Err(EngineError::Domain {
                param: "points".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }
        if !(self.beta_margin > 0.0 && self.beta_margin < 0.5) {
            return Err(EngineError::domain(
                "beta_margin",
                self.beta_margin,
                "in (0, 0.5)",
            ));
        }
        ensure_positive("gamma_range_multiplier", self.gamma_range_multiplier)?;
        if !(self.gamma_min_x.is_finite() && self.gamma_min_x >= 0.0) {
            return Err(EngineError::domain(
                "gamma_min_x",
                self.gamma_min_x,
                "finite and >= 0",
            ));
        }
        Ok(())
    }

    /// Sample locations for a family, ascending.
    fn grid(&self, family: DistributionFamily, shape: ShapeParameters) -> Vec<f64> {
        match family {
            DistributionFamily::Beta => {
                let margin = self.beta_margin;
                if self.points == 1 {
                    return vec![0.5];
                }
                let step = (1.0 - 2.0 * margin) / (self.points - 1) as f64;
                (0..self.points).map(|i| margin + i as f64 * step).collect()
            }
            DistributionFamily::Gamma => {
                let max_x = shape.alpha() / shape.beta() * self.gamma_range_multiplier;
                let step = max_x / self.points as f64;
                let start = step.max(self.gamma_min_x);
                if !(step > 0.0 && step.is_finite()) || start > max_x {
                    return Vec::new();
                }
                // Small slack keeps `max_x` itself on the grid despite rounding.
                let count = ((max_x - start) / step + 1e-9).floor() as usize + 1;
                (0..count).map(|i| start + i as f64 * step).collect()
            }
        }
    }
}

/// Density curve with `point_count` samples and default spacing.
///
/// # Errors
///
/// Returns a domain error when `point_count` is zero.
///
/// # Example
///
/// ```
/// use bayes_conjugate::distribution::{curve, DistributionFamily, ShapeParameters};
///
/// let shape = ShapeParameters::new(2.0, 1.0).expect("valid shape");
/// let c = curve(DistributionFamily::Gamma, shape, 200).expect("valid point count");
/// assert_eq!(c.len(), 200);
/// assert!((c.area() - 1.0).abs() < 0.02);
/// ```
pub fn curve(
    family: DistributionFamily,
    shape: ShapeParameters,
    point_count: usize,
) -> Result<Curve> {
    curve_with(family, shape, &CurveConfig::default().with_points(point_count))
}

/// Density curve discretized according to `config`.
///
/// # Errors
///
/// Returns a domain error when `config` is invalid.
pub fn curve_with(
    family: DistributionFamily,
    shape: ShapeParameters,
    config: &CurveConfig,
) -> Result<Curve> {
    config.validate()?;
    let ln_c = ln_normalizer(family, shape)?;
    let grid = config.grid(family, shape);
    let requested = grid.len();

    let points: Vec<CurvePoint> = grid
        .into_iter()
        .filter_map(|x| {
            let density = ln_pdf_unchecked(family, shape, ln_c, x).exp();
            (density.is_finite() && density >= 0.0).then_some(CurvePoint { x, density })
        })
        .collect();

    if points.len() < requested {
        trace_debug!(
            %family,
            dropped = requested - points.len(),
            "dropped non-finite curve points"
        );
    }

    Ok(Curve { points })
}
