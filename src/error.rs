pub type AppResult<T> = Result<T, AppError>;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },
    #[error("failed to load {which} dictionary data")]
    Dictionary {
        which: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("text error at line {line}: {message}")]
    Text { line: usize, message: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl From<std::io::Error> for AppError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            context: "I/O operation failed".to_string(),
        }
    }
}

impl AppError {
    pub fn io_with_context(source: std::io::Error, context: impl Into<String>) -> Self {
        Self::Io {
            source,
            context: context.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn dictionary(which: &'static str, source: serde_json::Error) -> Self {
        Self::Dictionary { which, source }
    }

    pub fn text(line: usize, message: impl Into<String>) -> Self {
        Self::Text {
            line,
            message: message.into(),
        }
    }

    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn text_error_reports_line_number() {
        let err = AppError::text(12, "chapter has no lines");
        assert!(matches!(err, AppError::Text { line: 12, .. }));
        assert_eq!(
            err.to_string(),
            "text error at line 12: chapter has no lines"
        );
    }

    #[test]
    fn dictionary_error_wraps_json_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").expect_err("should fail");
        let err = AppError::dictionary("unihan", source);
        assert_eq!(err.to_string(), "failed to load unihan dictionary data");
        assert!(std::error::Error::source(&err).is_some());
    }
}
