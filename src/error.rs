use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::Country;

/// Exit code for malformed arguments or configuration.
pub const EXIT_USAGE: u8 = 2;
/// Exit code when the requested data does not exist.
pub const EXIT_NO_DATA: u8 = 3;
/// Exit code for internal faults and collaborator (network/disk) failures.
pub const EXIT_INTERNAL: u8 = 4;

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

/// Errors raised while building curves and answering queries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// A request parameter is malformed or outside its domain.
    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// No observations exist for the requested key.
    #[error("No data for {country}{}", format_on(.date))]
    NoData {
        country: Country,
        date: Option<NaiveDate>,
    },

    /// The date exists but carries too few distinct maturities to span a curve.
    #[error(
        "Insufficient data for {country} on {}: {distinct} distinct maturity, need at least 2",
        .date.format("%d %b %Y")
    )]
    InsufficientData {
        country: Country,
        date: NaiveDate,
        distinct: usize,
    },

    /// An interpolant was handed knots that violate its construction contract.
    #[error("Interpolation contract violated: {0}")]
    Interpolation(String),
}

fn format_on(date: &Option<NaiveDate>) -> String {
    match date {
        Some(d) => format!(" on {}", d.format("%d %b %Y")),
        None => String::new(),
    }
}

impl CurveError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        CurveError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Whether the error is a not-found condition (as opposed to bad input or a fault).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CurveError::NoData { .. } | CurveError::InsufficientData { .. }
        )
    }

    /// Whether the error signals a broken internal invariant rather than a caller problem.
    pub fn is_internal(&self) -> bool {
        matches!(self, CurveError::Interpolation(_))
    }

    /// Message safe to hand to an external caller.
    ///
    /// Internal faults are reported generically; their detail only goes to the log.
    pub fn public_message(&self) -> String {
        if self.is_internal() {
            "Internal error while building the yield curve.".to_string()
        } else {
            self.to_string()
        }
    }
}

impl From<CurveError> for AppError {
    fn from(err: CurveError) -> Self {
        let code = match &err {
            CurveError::Validation { .. } => EXIT_USAGE,
            CurveError::NoData { .. } | CurveError::InsufficientData { .. } => EXIT_NO_DATA,
            CurveError::Interpolation(_) => EXIT_INTERNAL,
        };
        AppError::new(code, err.public_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_data_message_names_country_and_date() {
        let err = CurveError::NoData {
            country: Country::Us,
            date: NaiveDate::from_ymd_opt(2024, 6, 3),
        };
        assert_eq!(err.to_string(), "No data for US on 03 Jun 2024");
        assert!(err.is_not_found());

        let err = CurveError::NoData {
            country: Country::Uk,
            date: None,
        };
        assert_eq!(err.to_string(), "No data for UK");
    }

    #[test]
    fn internal_errors_are_not_leaked() {
        let err = CurveError::Interpolation("knots not sorted at index 3".to_string());
        assert!(err.is_internal());
        assert!(!err.public_message().contains("index 3"));

        let app: AppError = err.into();
        assert_eq!(app.exit_code(), EXIT_INTERNAL);
        assert!(!app.to_string().contains("index 3"));
    }

    #[test]
    fn exit_codes_follow_error_kind() {
        let app: AppError = CurveError::validation("maturity", "must be a number").into();
        assert_eq!(app.exit_code(), EXIT_USAGE);
        assert_eq!(app.to_string(), "Invalid maturity: must be a number");

        let app: AppError = CurveError::InsufficientData {
            country: Country::Uk,
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            distinct: 1,
        }
        .into();
        assert_eq!(app.exit_code(), EXIT_NO_DATA);
    }
}
