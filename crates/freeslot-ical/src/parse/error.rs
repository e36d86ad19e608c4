use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    MissingBegin,
    MissingEnd,
    MismatchedComponent,
    InvalidContentLine,
    InvalidDate,
    InvalidDateTime,
    UnknownTimezone,
    UnclosedQuote,
}

impl ParseErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingBegin => "missing BEGIN",
            Self::MissingEnd => "missing END",
            Self::MismatchedComponent => "mismatched component",
            Self::InvalidContentLine => "invalid content line",
            Self::InvalidDate => "invalid date",
            Self::InvalidDateTime => "invalid date-time",
            Self::UnknownTimezone => "unknown timezone",
            Self::UnclosedQuote => "unclosed quote",
        }
    }
}

/// Parse error tagged with the 1-based source line it occurred on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: usize,
    pub context: Option<String>,
}

impl ParseError {
    #[must_use]
    pub const fn new(kind: ParseErrorKind, line: usize) -> Self {
        Self {
            kind,
            line,
            context: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at line {}", self.kind.as_str(), self.line)?;
        if let Some(context) = &self.context {
            write!(f, ": {context}")?;
        }
        Ok(())
    }
}

pub type ParseResult<T> = std::result::Result<T, ParseError>;
