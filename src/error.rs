use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenizerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Vocabulary load error: {0}")]
    VocabLoad(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Truncation error: {0}")]
    Truncation(String),

    #[error("JSON error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = TokenizerError::VocabLoad("empty vocabulary".to_string());
        assert_eq!(err.to_string(), "Vocabulary load error: empty vocabulary");
        let err = TokenizerError::Truncation("too short".to_string());
        assert_eq!(err.to_string(), "Truncation error: too short");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: TokenizerError = io.into();
        assert!(matches!(err, TokenizerError::Io(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: TokenizerError = json.into();
        assert!(err.to_string().starts_with("JSON error"));
    }
}
