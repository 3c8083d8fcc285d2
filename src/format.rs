//! Number formatting for belief tables and probability read-outs.

/// Magnitudes below this (other than zero) switch to exponential notation.
const EXPONENTIAL_BELOW: f64 = 1e-7;

/// Formats a statistic the way the belief table shows it.
///
/// Tiny non-zero magnitudes use exponential notation with 10 fractional
/// digits; everything else uses fixed notation with 12.
///
/// # Example
///
/// ```
/// use bayes_conjugate::format::format_value;
///
/// assert_eq!(format_value(0.5), "0.500000000000");
/// assert_eq!(format_value(1.5e-9), "1.5000000000e-9");
/// assert_eq!(format_value(0.0), "0.000000000000");
/// ```
#[must_use]
pub fn format_value(value: f64) -> String {
    if value != 0.0 && value.abs() < EXPONENTIAL_BELOW {
        format!("{value:.10e}")
    } else {
        format!("{value:.12}")
    }
}
