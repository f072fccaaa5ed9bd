//! Error types for the roster engine.
//!
//! The calculation core is fail-soft: bad time data resolves to zero or empty
//! results. The variants here cover the narrow set of inputs that cannot be
//! recovered from, plus the boundary parsing performed on typed records.

use thiserror::Error;

/// The main error type for the roster engine.
///
/// # Example
///
/// ```
/// use roster_engine::error::EngineError;
///
/// let error = EngineError::EmptyWorkRecords {
///     staff_id: "staff_001".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "No work records supplied for staff 'staff_001'"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A payroll line was requested for a staff member with no work records.
    #[error("No work records supplied for staff '{staff_id}'")]
    EmptyWorkRecords {
        /// The staff member the payroll line was requested for.
        staff_id: String,
    },

    /// A wall-clock value was not a valid `HH:MM` string.
    #[error("Invalid time '{value}': expected HH:MM")]
    InvalidTime {
        /// The rejected input.
        value: String,
    },

    /// An assignment tag was not `idle`, `break` or `station:<id>`.
    #[error("Invalid assignment '{value}': expected idle, break or station:<id>")]
    InvalidAssignment {
        /// The rejected input.
        value: String,
    },

    /// A staff schedule broke a structural invariant.
    #[error("Invalid schedule for staff '{staff_id}': {message}")]
    InvalidSchedule {
        /// The staff member whose schedule was rejected.
        staff_id: String,
        /// A description of what made the schedule invalid.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
