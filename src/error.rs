use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, ExplorerError>;

/// Explorer error types.
#[derive(Debug, Error)]
pub enum ExplorerError {
    /// I/O errors from manifest or state file access.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A site entry's path cannot be inserted into the trie.
    #[error("malformed path {path:?}: segment {segment:?} is already a file")]
    MalformedPath { path: String, segment: String },

    /// Invalid component or pipeline configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Collapse-state backend read/write failure.
    #[error("state storage error: {0}")]
    Storage(String),

    /// The site manifest could not be parsed.
    #[error("manifest error: {0}")]
    Manifest(String),

    /// Terminal initialization or rendering errors.
    #[error("terminal error: {0}")]
    Terminal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ExplorerError = io_err.into();
        assert!(matches!(err, ExplorerError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn malformed_path_display() {
        let err = ExplorerError::MalformedPath {
            path: "a/x.md/deep.md".into(),
            segment: "x.md".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("a/x.md/deep.md"));
        assert!(msg.contains("x.md"));
    }

    #[test]
    fn configuration_error_display() {
        let err = ExplorerError::Configuration("unknown transform operation `shuffle`".into());
        assert_eq!(
            err.to_string(),
            "configuration error: unknown transform operation `shuffle`"
        );
    }
}
