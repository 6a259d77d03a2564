use std::error::Error as StdError;
use std::fmt;

///
/// ErrorCode
///
/// Stable classification of decoding failures. Compare with
/// [`Error::code`]; the display label is part of the error message, not a
/// parsing surface.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorCode {
    /// A driver error with no more specific classification.
    Unknown,
    /// Expected exactly one row, got zero.
    NoRows,
    /// Expected exactly one row, got more than one.
    MultipleRows,
    /// The destination is not a supported shape, or a scanner was reused
    /// with a differently typed destination.
    InvalidDest,
    /// Bad argument to an auxiliary builder.
    InvalidInput,
    /// The driver returned a column with no matching destination field.
    NoColDest,
    /// Two destination fields resolve to the same column alias.
    RedundantCol,
    /// A column was null but the destination field cannot represent null.
    Null,
    /// The driver or a field's own decode routine rejected the raw cell.
    Scan,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unknown => "unknown",
            Self::NoRows => "no_rows",
            Self::MultipleRows => "multiple_rows",
            Self::InvalidDest => "invalid_dest",
            Self::InvalidInput => "invalid_input",
            Self::NoColDest => "no_col_dest",
            Self::RedundantCol => "redundant_col",
            Self::Null => "null",
            Self::Scan => "scan",
        };
        write!(f, "{label}")
    }
}

///
/// Error
///
/// The library's single error type: a code, the phase the orchestrator was
/// in (`while …` in the rendered message), and an optional underlying
/// cause. Immutable once built; match on [`Error::code`] or walk
/// [`StdError::source`].
///

#[derive(Debug)]
pub struct Error {
    code: ErrorCode,
    phase: Option<&'static str>,
    cause: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    #[must_use]
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            phase: None,
            cause: None,
        }
    }

    /// Wrap an opaque driver error, classified [`ErrorCode::Unknown`].
    pub fn unknown(cause: impl StdError + Send + Sync + 'static) -> Self {
        Self::new(ErrorCode::Unknown).because(cause)
    }

    /// Attach the phase phrase identifying the orchestrator stage.
    #[must_use]
    pub fn during(mut self, phase: &'static str) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Attach an underlying cause.
    #[must_use]
    pub fn because(mut self, cause: impl StdError + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Attach a plain-text cause.
    #[must_use]
    pub fn with_message(self, message: impl Into<String>) -> Self {
        self.because(Message(message.into()))
    }

    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    #[must_use]
    pub const fn phase(&self) -> Option<&'static str> {
        self.phase
    }

    /// True when this error or anything in its source chain matches the
    /// given code.
    #[must_use]
    pub fn is(&self, code: ErrorCode) -> bool {
        if self.code == code {
            return true;
        }
        let mut source = self.source();
        while let Some(err) = source {
            if let Some(err) = err.downcast_ref::<Self>() {
                if err.code == code {
                    return true;
                }
            }
            source = err.source();
        }
        false
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sql error")?;
        if self.code != ErrorCode::Unknown {
            write!(f, " {}", self.code)?;
        }
        if let Some(phase) = self.phase {
            write!(f, " while {phase}")?;
        }
        if let Some(cause) = &self.cause {
            write!(f, ": {cause}")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

///
/// Message
/// Plain-text cause for errors built from a formatted string.
///

#[derive(Debug)]
struct Message(String);

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for Message {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_code_phase_and_cause() {
        let err = Error::new(ErrorCode::NoRows)
            .during("preparing row")
            .with_message("query returned nothing");

        assert_eq!(
            err.to_string(),
            "sql error no_rows while preparing row: query returned nothing"
        );
    }

    #[test]
    fn display_omits_unknown_code() {
        let err = Error::new(ErrorCode::Unknown).during("querying rows");
        assert_eq!(err.to_string(), "sql error while querying rows");
    }

    #[test]
    fn is_matches_code_through_source_chain() {
        let inner = Error::new(ErrorCode::Null).during("decoding into struct");
        let outer = Error::new(ErrorCode::Scan).because(inner);

        assert!(outer.is(ErrorCode::Scan));
        assert!(outer.is(ErrorCode::Null));
        assert!(!outer.is(ErrorCode::NoRows));
    }
}
