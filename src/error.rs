//! Crate-level error types.

use std::fmt;

use crate::shader::ShaderError;

/// Errors produced by the tessera crate outside the GPU protocol itself.
#[derive(Debug)]
pub enum TesseraError {
    /// Shader program construction, compile, or link failure.
    Shader(ShaderError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Malformed program manifest.
    Manifest(String),
}

impl fmt::Display for TesseraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shader(e) => write!(f, "shader error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Manifest(msg) => write!(f, "manifest error: {msg}"),
        }
    }
}

impl std::error::Error for TesseraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Shader(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ShaderError> for TesseraError {
    fn from(e: ShaderError) -> Self {
        Self::Shader(e)
    }
}

impl From<std::io::Error> for TesseraError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
