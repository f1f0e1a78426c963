use std::path::PathBuf;

/// Errors that can occur across the orgpulse platform.
///
/// Each variant wraps a specific error domain. Library crates use this type
/// directly; the binary crate converts to `miette` diagnostics at the boundary.
///
/// # Examples
///
/// ```
/// use orgpulse_core::PulseError;
///
/// let err = PulseError::Config("no organization selected".into());
/// assert!(err.to_string().contains("no organization selected"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum PulseError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed or inconsistent record collection.
    #[error("record data error: {0}")]
    Data(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required record file was not found.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: PulseError = io_err.into();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn config_error_displays_message() {
        let err = PulseError::Config("bad value".into());
        assert_eq!(err.to_string(), "configuration error: bad value");
    }

    #[test]
    fn file_not_found_shows_path() {
        let err = PulseError::FileNotFound(PathBuf::from("/tmp/commits.json"));
        assert!(err.to_string().contains("/tmp/commits.json"));
    }

    #[test]
    fn data_error_displays_message() {
        let err = PulseError::Data("duplicate repository acme/tools".into());
        assert!(err.to_string().contains("acme/tools"));
    }
}
