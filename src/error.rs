//! Error types for the conjugate engine.
//!
//! Two failure classes exist: bad input ([`EngineError::Domain`]) and a
//! numerical edge case reached from valid input ([`EngineError::Computation`]).

use std::fmt;

/// Main error type for engine operations.
///
/// # Examples
///
/// ```
/// use bayes_conjugate::error::EngineError;
///
/// let err = EngineError::Domain {
///     param: "alpha".to_string(),
///     value: "-1".to_string(),
///     constraint: "> 0".to_string(),
/// };
/// assert!(err.to_string().contains("alpha"));
/// assert!(err.is_domain());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// An input violates a precondition.
    Domain {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// An intermediate value became NaN or infinite despite valid inputs.
    Computation {
        /// Operation that produced the value
        operation: String,
        /// What went wrong
        detail: String,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Domain {
                param,
                value,
                constraint,
            } => write!(f, "Domain error: {param} = {value}, expected {constraint}"),
            EngineError::Computation { operation, detail } => {
                write!(f, "Computation error in {operation}: {detail}")
            }
        }
    }
}

impl std::error::Error for EngineError {}

impl EngineError {
    /// Create a domain error for a numeric parameter.
    #[must_use]
    pub fn domain(param: &str, value: f64, constraint: &str) -> Self {
        Self::Domain {
            param: param.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
        }
    }

    /// Create a computation error for a non-finite intermediate.
    #[must_use]
    pub fn non_finite(operation: &str, value: f64) -> Self {
        Self::Computation {
            operation: operation.to_string(),
            detail: format!("non-finite intermediate value {value}"),
        }
    }

    /// True for input precondition violations.
    #[must_use]
    pub fn is_domain(&self) -> bool {
        matches!(self, Self::Domain { .. })
    }

    /// True for numerical failures on valid input.
    #[must_use]
    pub fn is_computation(&self) -> bool {
        matches!(self, Self::Computation { .. })
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Rejects NaN, infinities and values `<= 0`.
pub(crate) fn ensure_positive(param: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EngineError::domain(param, value, "finite and > 0"))
    }
}

/// Rejects NaN, infinities and negative values.
pub(crate) fn ensure_non_negative(param: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::domain(param, value, "finite and >= 0"))
    }
}
