// ============================================================================
// Simulation Time Errors
// Error types for resolution configuration, arithmetic and conversion
// ============================================================================

use crate::interfaces::ParamKind;
use std::fmt;

/// Which conversion or operation ran out of the representable tick range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverflowSource {
    /// Addition, subtraction, multiplication or division of values
    Arithmetic,
    /// Conversion from a real number of seconds
    RealSeconds,
    /// Conversion from a whole number of seconds
    WholeSeconds,
    /// Rescaling an integer count between unit exponents
    UnitRescale,
}

/// Errors raised by the resolution registry and `SimTime` operations.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeError {
    /// Requested scale exponent is outside -18..=0
    ResolutionOutOfRange { exponent: i32 },
    /// Resolution already fixed to a different exponent
    ResolutionConflict { current: i32, requested: i32 },
    /// Nonzero value constructed before the resolution was fixed
    UninitializedResolution { value: String },
    /// Value cannot be represented exactly at the current resolution
    PrecisionLoss {
        value: i64,
        unit_exponent: i32,
        scale_exponent: i32,
    },
    /// Result falls outside the representable tick range
    Overflow {
        source: OverflowSource,
        detail: String,
        range: String,
        scale_exponent: Option<i32>,
    },
    /// The most negative raw value has no positive counterpart
    NegationOverflow { value: String },
    /// Integer division of a value by zero
    DivisionByZero,
    /// Parameter does not hold a numeric value
    TypeMismatch { param: String, kind: ParamKind },
    /// Text could not be turned into a resolution or a value
    Parse { input: String, reason: String },
    /// Stopwatch wall-clock budget exhausted
    RealTimeLimitExceeded { limit_secs: f64 },
    /// Stopwatch CPU-time budget exhausted
    CpuTimeLimitExceeded { limit_secs: f64 },
}

impl TimeError {
    /// True for every overflow variant regardless of its source.
    pub fn is_overflow(&self) -> bool {
        matches!(self, TimeError::Overflow { .. })
    }

    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        TimeError::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for TimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeError::ResolutionOutOfRange { exponent } => write!(
                f,
                "simulation time scale exponent {} is out of accepted range -18..0",
                exponent
            ),
            TimeError::ResolutionConflict { current, requested } => write!(
                f,
                "simulation time resolution cannot be changed once it has been set up \
                 (currently {}, requested {})",
                current, requested
            ),
            TimeError::UninitializedResolution { value } => write!(
                f,
                "attempting to initialize a simulation time with a nonzero value ({}) before \
                 the scale exponent has been set; use zero or a plain f64 for early initialization",
                value
            ),
            TimeError::PrecisionLoss {
                value,
                unit_exponent,
                scale_exponent,
            } => write!(
                f,
                "{}*10^{}s cannot be represented precisely using the current scale exponent {}; \
                 configure a finer resolution or convert through f64",
                value, unit_exponent, scale_exponent
            ),
            TimeError::Overflow {
                source,
                detail,
                range,
                scale_exponent,
            } => {
                let what = match source {
                    OverflowSource::Arithmetic => "simulation time overflow",
                    OverflowSource::RealSeconds => "cannot convert seconds to simulation time",
                    OverflowSource::WholeSeconds => {
                        "cannot convert whole seconds to simulation time"
                    },
                    OverflowSource::UnitRescale => "simulation time unit overflow",
                };
                write!(f, "{} {}: result is out of range {}", what, detail, range)?;
                if let Some(exp) = scale_exponent {
                    write!(f, ", allowed by scale exponent {}", exp)?;
                }
                Ok(())
            },
            TimeError::NegationOverflow { value } => write!(
                f,
                "cannot negate simulation time {}: it is internally represented with i64::MIN \
                 that has no positive equivalent (try decreasing precision)",
                value
            ),
            TimeError::DivisionByZero => write!(f, "simulation time division by zero"),
            TimeError::TypeMismatch { param, kind } => write!(
                f,
                "cannot convert non-numeric parameter '{}' ({}) to simulation time",
                param, kind
            ),
            TimeError::Parse { input, reason } => {
                write!(f, "cannot parse \"{}\": {}", input, reason)
            },
            TimeError::RealTimeLimitExceeded { limit_secs } => {
                write!(f, "real time limit of {}s reached", limit_secs)
            },
            TimeError::CpuTimeLimitExceeded { limit_secs } => {
                write!(f, "CPU time limit of {}s reached", limit_secs)
            },
        }
    }
}

impl std::error::Error for TimeError {}

/// Result type alias for simulation time operations
pub type TimeResult<T> = Result<T, TimeError>;
