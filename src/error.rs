//! Error types for the column-moisture crate.
use thiserror::Error;

/// Error type for the crate.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum AnalysisError {
    /// An unknown method, phase, or component name was handed to a formula.
    #[error("Unsupported option '{option}' for formula {formula}.")]
    UnsupportedFormula {
        /// The formula that rejected the option.
        formula: &'static str,
        /// The option that was not recognized.
        option: String,
    },
    /// The declared units of an input field do not match what a formula requires.
    #[error("Unit mismatch for {field}: expected '{expected}', found '{found}'.")]
    UnitMismatch {
        /// Name of the offending field.
        field: &'static str,
        /// The units the formula requires.
        expected: &'static str,
        /// The units that were declared, if any.
        found: String,
    },
    /// Vertical integration of a profile could not be completed.
    #[error("Integration failed: {0}.")]
    IntegrationFailure(#[from] IntegrationFault),
    /// Array lengths in a profile are incompatible for cloud classification.
    #[error("Profile lengths incompatible for cloud layers.")]
    ClassificationDegraded,
    /// Bad or invalid input.
    #[error("Invalid input.")]
    InvalidInput,
}

/// The reason a vertical integration failed.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum IntegrationFault {
    /// Fewer than two valid samples remained after filtering and cutoffs.
    #[error("fewer than two valid samples")]
    TooFewSamples,
    /// The vertical coordinate was not monotonic.
    #[error("vertical coordinate is not monotonic")]
    NonMonotonic,
    /// A denominator vanished or the result was not finite.
    #[error("degenerate or non-finite integral")]
    DegenerateDenominator,
}

/// Shorthand for results.
pub type Result<T> = std::result::Result<T, AnalysisError>;
