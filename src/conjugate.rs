//! Conjugate posterior updates.
//!
//! Beta-Binomial and Gamma-Poisson are both additive in their sufficient
//! statistics, so the update itself is exact:
//!
//! - Beta(α, β) + (successes, failures) → Beta(α + successes, β + failures)
//! - Gamma(α, β) + (sum, count) → Gamma(α + sum, β + count)
//!
//! [`update`] then evaluates curve, statistics and tail probability for both
//! the prior and the posterior. Nothing is cached between calls.
//!
//! # Example
//!
//! ```
//! use bayes_conjugate::prelude::*;
//!
//! let prior = ShapeParameters::new(2.0, 2.0).expect("valid prior");
//! let observed = ObservedData::binomial(7, 3);
//! let result = update(DistributionFamily::Beta, prior, observed, ProbabilityQuery::default())
//!     .expect("valid inputs");
//!
//! assert_eq!(result.posterior_shape.as_tuple(), (9.0, 5.0));
//! assert!((result.posterior_stats.mean - 9.0 / 14.0).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

use crate::distribution::{curve_with, Curve, CurveConfig, DistributionFamily, ShapeParameters};
use crate::error::{ensure_non_negative, EngineError, Result};
use crate::stats::{stats, Statistics};
use crate::tail::{tail_probability_with, IntegrationConfig, ProbabilityQuery};

/// Observed sufficient statistics, read according to the family.
///
/// - Beta-Binomial: `(successes, failures)`
/// - Gamma-Poisson: `(sum of observations, number of observations)`
///
/// Both components are finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawObserved")]
pub struct ObservedData {
    /// Successes, or the sum of the observations
    #[serde(rename = "successes_or_sum")]
    first: f64,
    /// Failures, or the number of observations
    #[serde(rename = "failures_or_count")]
    second: f64,
}

#[derive(Deserialize)]
struct RawObserved {
    successes_or_sum: f64,
    failures_or_count: f64,
}

impl TryFrom<RawObserved> for ObservedData {
    type Error = EngineError;

    fn try_from(raw: RawObserved) -> Result<Self> {
        Self::new(raw.successes_or_sum, raw.failures_or_count)
    }
}

impl ObservedData {
    /// Creates observations from the raw pair.
    ///
    /// # Errors
    ///
    /// Returns a domain error if either component is negative or non-finite.
    pub fn new(first: f64, second: f64) -> Result<Self> {
        ensure_non_negative("observed.first", first)?;
        ensure_non_negative("observed.second", second)?;
        Ok(Self { first, second })
    }

    /// No observations: the posterior equals the prior.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Beta-Binomial counts.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn binomial(successes: u64, failures: u64) -> Self {
        Self {
            first: successes as f64,
            second: failures as f64,
        }
    }

    /// Beta-Binomial counts from `successes` out of `trials`.
    ///
    /// # Errors
    ///
    /// Returns a domain error if `successes > trials`.
    ///
    /// # Example
    ///
    /// ```
    /// use bayes_conjugate::conjugate::ObservedData;
    ///
    /// let data = ObservedData::from_trials(7, 10).expect("7 <= 10");
    /// assert_eq!(data.failures(), 3.0);
    /// assert!(ObservedData::from_trials(11, 10).is_err());
    /// ```
    pub fn from_trials(successes: u64, trials: u64) -> Result<Self> {
        if successes > trials {
            return Err(EngineError::Domain {
                param: "successes".to_string(),
                value: successes.to_string(),
                constraint: format!("<= trials ({trials})"),
            });
        }
        Ok(Self::binomial(successes, trials - successes))
    }

    /// Gamma-Poisson sufficient statistics.
    ///
    /// # Errors
    ///
    /// Returns a domain error if `sum` is negative or non-finite.
    #[allow(clippy::cast_precision_loss)]
    pub fn poisson(sum: f64, count: u64) -> Result<Self> {
        Self::new(sum, count as f64)
    }

    /// Gamma-Poisson sufficient statistics of a sample of event counts.
    ///
    /// # Example
    ///
    /// ```
    /// use bayes_conjugate::conjugate::ObservedData;
    ///
    /// let data = ObservedData::from_counts(&[3, 5, 4, 6, 2]);
    /// assert_eq!(data.sum(), 20.0);
    /// assert_eq!(data.count(), 5.0);
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_counts(counts: &[u64]) -> Self {
        Self {
            first: counts.iter().map(|&c| c as f64).sum(),
            second: counts.len() as f64,
        }
    }

    /// Successes (Beta-Binomial reading).
    #[must_use]
    pub fn successes(&self) -> f64 {
        self.first
    }

    /// Failures (Beta-Binomial reading).
    #[must_use]
    pub fn failures(&self) -> f64 {
        self.second
    }

    /// Sum of observations (Gamma-Poisson reading).
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.first
    }

    /// Number of observations (Gamma-Poisson reading).
    #[must_use]
    pub fn count(&self) -> f64 {
        self.second
    }

    /// True when nothing has been observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first == 0.0 && self.second == 0.0
    }
}

/// Posterior shape parameters after observing `observed`.
///
/// # Errors
///
/// Returns a domain error if the sums overflow to infinity.
pub fn posterior_shape(
    family: DistributionFamily,
    prior: ShapeParameters,
    observed: ObservedData,
) -> Result<ShapeParameters> {
    let (alpha, beta) = prior.as_tuple();
    match family {
        DistributionFamily::Beta => {
            ShapeParameters::new(alpha + observed.successes(), beta + observed.failures())
        }
        DistributionFamily::Gamma => {
            ShapeParameters::new(alpha + observed.sum(), beta + observed.count())
        }
    }
}

/// A tail probability, or why it could not be computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TailEstimate {
    /// Probability in `[0, 1]`.
    Computed(f64),
    /// Numerical failure on valid input; never a stand-in number.
    Unavailable {
        /// Error message
        reason: String,
    },
}

impl TailEstimate {
    /// Keeps domain errors as errors and turns computation errors into
    /// [`TailEstimate::Unavailable`].
    ///
    /// # Errors
    ///
    /// Returns the error unchanged when it is a domain error.
    pub fn from_result(result: Result<f64>) -> Result<Self> {
        match result {
            Ok(p) => Ok(TailEstimate::Computed(p)),
            Err(err) if err.is_computation() => Ok(TailEstimate::Unavailable {
                reason: err.to_string(),
            }),
            Err(err) => Err(err),
        }
    }

    /// The probability, if it was computed.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        match self {
            TailEstimate::Computed(p) => Some(*p),
            TailEstimate::Unavailable { .. } => None,
        }
    }

    /// True when a probability is available.
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, TailEstimate::Computed(_))
    }
}

/// Everything one update produces for the prior and the posterior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosteriorResult {
    /// Distribution family
    pub family: DistributionFamily,
    /// Observations applied
    pub observed: ObservedData,
    /// Tail query evaluated
    pub query: ProbabilityQuery,
    /// Prior (α, β)
    pub prior_shape: ShapeParameters,
    /// Posterior (α, β)
    pub posterior_shape: ShapeParameters,
    /// Prior summary statistics
    pub prior_stats: Statistics,
    /// Posterior summary statistics
    pub posterior_stats: Statistics,
    /// Prior tail probability
    pub prior_tail: TailEstimate,
    /// Posterior tail probability
    pub posterior_tail: TailEstimate,
    /// Prior density curve
    pub prior_curve: Curve,
    /// Posterior density curve
    pub posterior_curve: Curve,
}

impl PosteriorResult {
    /// True when observations moved the posterior away from the prior.
    #[must_use]
    pub fn has_updates(&self) -> bool {
        !self.observed.is_empty()
    }
}

/// Curve and integrator settings used by [`PosteriorEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Curve discretization
    pub curve: CurveConfig,
    /// Tail integrator
    pub integration: IntegrationConfig,
}

impl EngineConfig {
    /// Sets the curve discretization.
    #[must_use]
    pub fn with_curve(mut self, curve: CurveConfig) -> Self {
        self.curve = curve;
        self
    }

    /// Sets the tail integrator.
    #[must_use]
    pub fn with_integration(mut self, integration: IntegrationConfig) -> Self {
        self.integration = integration;
        self
    }

    /// Validates both parts.
    ///
    /// # Errors
    ///
    /// Returns the first domain error found.
    pub fn validate(&self) -> Result<()> {
        self.curve.validate()?;
        self.integration.validate()
    }
}

/// Stateless evaluator holding an [`EngineConfig`].
///
/// # Example
///
/// ```
/// use bayes_conjugate::prelude::*;
///
/// let config = EngineConfig::default().with_curve(CurveConfig::default().with_points(50));
/// let engine = PosteriorEngine::new(config);
///
/// let prior = ShapeParameters::new(2.0, 1.0).expect("valid prior");
/// let observed = ObservedData::poisson(10.0, 4).expect("valid data");
/// let result = engine
///     .update(DistributionFamily::Gamma, prior, observed, ProbabilityQuery::greater(2.0))
///     .expect("valid inputs");
///
/// assert_eq!(result.posterior_shape.as_tuple(), (12.0, 5.0));
/// assert_eq!(result.posterior_curve.len(), 50);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PosteriorEngine {
    config: EngineConfig,
}

impl PosteriorEngine {
    /// Creates an engine with the given configuration.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Applies `observed` to `prior` and evaluates both distributions.
    ///
    /// # Errors
    ///
    /// Returns a domain error for an invalid configuration, query or
    /// posterior, and a computation error when the summary statistics of
    /// either distribution overflow. Tail computation failures are reported
    /// in the result as [`TailEstimate::Unavailable`].
    pub fn update(
        &self,
        family: DistributionFamily,
        prior: ShapeParameters,
        observed: ObservedData,
        query: ProbabilityQuery,
    ) -> Result<PosteriorResult> {
        self.config.validate()?;
        query.validate()?;
        let posterior = posterior_shape(family, prior, observed)?;
        trace_debug!(%family, %prior, %posterior, "posterior updated");

        let (prior_stats, prior_tail, prior_curve) = self.describe(family, prior, query)?;
        let (posterior_stats, posterior_tail, posterior_curve) =
            self.describe(family, posterior, query)?;

        Ok(PosteriorResult {
            family,
            observed,
            query,
            prior_shape: prior,
            posterior_shape: posterior,
            prior_stats,
            posterior_stats,
            prior_tail,
            posterior_tail,
            prior_curve,
            posterior_curve,
        })
    }

    fn describe(
        &self,
        family: DistributionFamily,
        shape: ShapeParameters,
        query: ProbabilityQuery,
    ) -> Result<(Statistics, TailEstimate, Curve)> {
        let curve = curve_with(family, shape, &self.config.curve)?;
        let summary = stats(family, shape)?;
        let tail = TailEstimate::from_result(tail_probability_with(
            family,
            shape,
            query,
            &self.config.integration,
        ))?;
        if !tail.is_available() {
            trace_warn!(%family, %shape, ?tail, "tail probability unavailable");
        }
        Ok((summary, tail, curve))
    }
}

/// [`PosteriorEngine::update`] with the default configuration.
///
/// # Errors
///
/// As [`PosteriorEngine::update`].
pub fn update(
    family: DistributionFamily,
    prior: ShapeParameters,
    observed: ObservedData,
    query: ProbabilityQuery,
) -> Result<PosteriorResult> {
    PosteriorEngine::default().update(family, prior, observed, query)
}

#[cfg(test)]
#[path = "conjugate_tests.rs"]
mod tests;
