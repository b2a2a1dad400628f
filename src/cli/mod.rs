//! Shared CLI utilities for the strata-wordpiece binary.

use std::io::Read;
use std::path::Path;

use crate::error::TokenizerError;
use crate::tokenizer::TokenizerConfig;

/// Initialize tracing/logging to stderr.
///
/// If `disable` is true, no output is produced.
/// Otherwise respects `RUST_LOG` env var, defaulting to WARN.
pub fn init_logging(disable: bool) {
    use tracing_subscriber::EnvFilter;

    if disable {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Read input text from one of: prompt string, file path, or stdin.
pub fn read_input(
    prompt: Option<&str>,
    file: Option<&Path>,
    use_stdin: bool,
) -> Result<String, TokenizerError> {
    if let Some(text) = prompt {
        return Ok(text.to_string());
    }

    if let Some(path) = file {
        return std::fs::read_to_string(path).map_err(|e| {
            TokenizerError::InvalidInput(format!("failed to read file '{}': {}", path.display(), e))
        });
    }

    if use_stdin {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }

    Err(TokenizerError::InvalidInput(
        "no input provided. Use --prompt, --file, or --stdin".to_string(),
    ))
}

/// Load a tokenizer config from a JSON file, or the defaults when absent.
pub fn load_config(path: Option<&Path>) -> Result<TokenizerConfig, TokenizerError> {
    match path {
        Some(path) => TokenizerConfig::from_json_file(path),
        None => Ok(TokenizerConfig::default()),
    }
}
