use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlBinderError {
    /// The underlying command failed; carries the innermost cause's message.
    #[error("{0}")]
    QueryExecutionError(String),

    #[error("Duplicate key in result map: {0}")]
    DuplicateKeyError(String),

    #[error("Result column count error: {0}")]
    ColumnCountError(String),

    #[error("Type coercion error: {0}")]
    CoercionError(String),

    #[error("Unknown property: {0}")]
    PropertyNotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),
}

impl SqlBinderError {
    /// Wrap a backend failure, keeping only the message of the innermost cause.
    #[must_use]
    pub fn execution(err: &(dyn std::error::Error + 'static)) -> Self {
        SqlBinderError::QueryExecutionError(root_cause_message(err))
    }
}

/// Walk `source()` to the end of the chain and render that error.
#[must_use]
pub fn root_cause_message(err: &(dyn std::error::Error + 'static)) -> String {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("outer failure")]
    struct Outer(#[source] Middle);

    #[derive(Debug, Error)]
    #[error("middle failure")]
    struct Middle(#[source] std::io::Error);

    #[test]
    fn unwraps_to_innermost_message() {
        let err = Outer(Middle(std::io::Error::other("disk on fire")));
        let wrapped = SqlBinderError::execution(&err);
        assert!(matches!(wrapped, SqlBinderError::QueryExecutionError(_)));
        assert_eq!(wrapped.to_string(), "disk on fire");
    }

    #[test]
    fn error_without_source_keeps_its_own_message() {
        let err = std::io::Error::other("plain");
        assert_eq!(root_cause_message(&err), "plain");
    }
}
