use thiserror::Error;

/// Error surfaced at the binary boundary: an exit code plus a printable message.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Typed failures of ingestion and index arithmetic.
///
/// Library functions return these; the CLI converts them into [`AppError`]
/// with an exit code through the `From` impl below.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndexError {
    #[error("{source_name} unavailable: {reason}")]
    DataSourceUnavailable { source_name: String, reason: String },

    #[error("{source_name} returned an unreadable payload: {reason}")]
    MalformedPayload { source_name: String, reason: String },

    #[error("series is empty")]
    EmptySeries,

    #[error("base year {year} has no usable (non-zero, finite) value")]
    InvalidBaseYear { year: i32 },

    #[error("year {year} is outside the covered range {earliest}..={latest}")]
    YearOutOfRange { year: i32, earliest: i32, latest: i32 },

    #[error("no PPP factor for {country} in {year}")]
    MissingPppFactor { country: String, year: i32 },

    #[error("no year has PPP factors for both {from_country} and {to_country}")]
    NoCommonPppYear { from_country: String, to_country: String },

    #[error("home-price and income series share no year")]
    IncompleteYearPair,

    #[error("rate {rate} for {year} cannot be compounded")]
    InvalidRate { year: i32, rate: f64 },

    #[error("amount {0} must be finite and non-negative")]
    InvalidAmount(f64),
}

impl IndexError {
    pub fn unavailable(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataSourceUnavailable {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    pub fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedPayload {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Exit code used when this error terminates the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            IndexError::DataSourceUnavailable { .. } | IndexError::MalformedPayload { .. } => 4,
            IndexError::YearOutOfRange { .. } | IndexError::InvalidAmount(_) => 2,
            IndexError::EmptySeries
            | IndexError::InvalidBaseYear { .. }
            | IndexError::MissingPppFactor { .. }
            | IndexError::NoCommonPppYear { .. }
            | IndexError::IncompleteYearPair
            | IndexError::InvalidRate { .. } => 3,
        }
    }
}

impl From<IndexError> for AppError {
    fn from(err: IndexError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}
