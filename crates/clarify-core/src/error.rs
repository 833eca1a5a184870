use std::path::PathBuf;

/// Errors that can occur across the Clarify harness.
///
/// Each variant wraps a specific error domain. Library crates use this type
/// directly; the binary crate converts to `miette` diagnostics at the boundary.
///
/// # Examples
///
/// ```
/// use clarify_core::ClarifyError;
///
/// let err = ClarifyError::Config("missing API key".into());
/// assert!(err.to_string().contains("missing API key"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ClarifyError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// An input table does not match any accepted layout. Fatal: the run
    /// aborts before any records are processed.
    #[error("table format error: {0}")]
    Format(String),

    /// Malformed cell or row content inside an otherwise recognized table.
    #[error("parse error: {0}")]
    Parse(String),

    /// LLM API or response error.
    #[error("LLM error: {0}")]
    Llm(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ClarifyError = io_err.into();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn format_error_displays_message() {
        let err = ClarifyError::Format("columns: foo, bar".into());
        assert_eq!(err.to_string(), "table format error: columns: foo, bar");
    }

    #[test]
    fn file_not_found_shows_path() {
        let err = ClarifyError::FileNotFound(PathBuf::from("/tmp/answers.tsv"));
        assert!(err.to_string().contains("/tmp/answers.tsv"));
    }
}
