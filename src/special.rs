//! Special functions used by the Beta and Gamma densities.
//!
//! `ln_gamma` keeps the Stirling series in its accurate range (argument at
//! least 1.5) by reflecting small arguments and shifting the rest one step
//! with the recurrence Γ(z) = Γ(z+1)/z.

use std::f64::consts::PI;

use crate::error::{EngineError, Result};

/// Arguments below this use the reflection formula.
const REFLECTION_THRESHOLD: f64 = 0.5;

/// Arguments below this (and not reflected) use the recurrence.
const RECURRENCE_THRESHOLD: f64 = 1.5;

/// Natural logarithm of the Gamma function, `ln |Γ(z)|`.
///
/// Three branches:
/// - `z < 0.5`: reflection `ln π − ln |sin(πz)| − ln Γ(1−z)`
/// - `z < 1.5`: recurrence `ln Γ(z+1) − ln z`
/// - otherwise: Stirling's series up to the `1/(1260 z⁵)` term
///
/// Recursion is at most two hops deep: reflection lands on `1 − z > 0.5`,
/// and the recurrence lands on `z + 1 ≥ 1.5`.
///
/// # Errors
///
/// Returns a domain error for NaN, infinities, and non-positive integers
/// (the poles of Γ).
///
/// # Example
///
/// ```
/// use bayes_conjugate::special::ln_gamma;
///
/// // Γ(5) = 4! = 24
/// let value = ln_gamma(5.0).expect("5 is in the domain");
/// assert!((value - 24.0_f64.ln()).abs() < 1e-6);
///
/// assert!(ln_gamma(0.0).is_err());
/// assert!(ln_gamma(-3.0).is_err());
/// ```
pub fn ln_gamma(z: f64) -> Result<f64> {
    if !z.is_finite() {
        return Err(EngineError::domain("z", z, "finite"));
    }
    if z <= 0.0 && z == z.floor() {
        return Err(EngineError::domain("z", z, "not a non-positive integer"));
    }

    if z < REFLECTION_THRESHOLD {
        let sin = (PI * z).sin().abs();
        // Rounding of π·z can leave sin at exactly 0 for huge negative z.
        if sin == 0.0 {
            return Err(EngineError::domain("z", z, "not a non-positive integer"));
        }
        return Ok(PI.ln() - sin.ln() - ln_gamma(1.0 - z)?);
    }

    if z < RECURRENCE_THRESHOLD {
        return Ok(ln_gamma(z + 1.0)? - z.ln());
    }

    Ok(stirling(z))
}

/// Stirling's asymptotic series for `ln Γ(z)`, accurate for `z >= 1.5`.
fn stirling(z: f64) -> f64 {
    let ln_z = z.ln();
    let z2 = z * z;
    let z3 = z2 * z;
    let z5 = z3 * z2;

    let mut result = z * ln_z - z - 0.5 * ln_z + 0.5 * (2.0 * PI).ln();
    result += 1.0 / (12.0 * z);
    result -= 1.0 / (360.0 * z3);
    result += 1.0 / (1260.0 * z5);
    result
}

/// Logarithm of the Beta function, `ln B(a, b) = ln Γ(a) + ln Γ(b) − ln Γ(a+b)`.
///
/// # Errors
///
/// Propagates domain errors from [`ln_gamma`].
pub fn ln_beta(a: f64, b: f64) -> Result<f64> {
    Ok(ln_gamma(a)? + ln_gamma(b)? - ln_gamma(a + b)?)
}

#[cfg(test)]
#[path = "special_tests.rs"]
mod tests;
