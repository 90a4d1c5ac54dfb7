use std::fmt;

use super::value::UniformKind;

/// Errors raised by the shader program core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    /// A construction call was missing a required field.
    InvalidArgument(String),
    /// A stage failed to compile.
    CompileError {
        /// Display identity of the failing stage.
        stage: String,
        /// Compiler diagnostics (`<not provided>` when the driver gave none).
        log: String,
    },
    /// The program failed to link.
    LinkError {
        /// Display identity of the failing program.
        program: String,
        /// Linker diagnostics (`<not provided>` when the driver gave none).
        log: String,
    },
    /// The language tag is unknown, or not allowed under the current profile.
    UnsupportedLanguage(String),
    /// The uniform value kind has no GPU upload mapping.
    UnsupportedType(UniformKind),
    /// The executor could not allocate a native object.
    ResourceCreationFailure(&'static str),
    /// Source replacement was attempted on an already uploaded stage.
    IllegalRecompile(String),
    /// A uniform was assigned a value of a different kind than it holds.
    TypeMismatch {
        /// Uniform name.
        name: String,
        /// Kind the uniform already holds.
        expected: UniformKind,
        /// Kind of the rejected value.
        found: UniformKind,
    },
}

impl ShaderError {
    pub(crate) fn log_or_placeholder(log: Option<&str>) -> String {
        log.unwrap_or("<not provided>").to_owned()
    }
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::CompileError { stage, log } => {
                write!(f, "compile error in: {stage}\n{log}")
            }
            Self::LinkError { program, log } => {
                write!(f, "failed to link {program}\n{log}")
            }
            Self::UnsupportedLanguage(msg) => {
                write!(f, "unsupported shader language: {msg}")
            }
            Self::UnsupportedType(kind) => {
                write!(f, "unsupported uniform type: {kind:?}")
            }
            Self::ResourceCreationFailure(what) => {
                write!(f, "invalid id received when trying to create {what}")
            }
            Self::IllegalRecompile(msg) => {
                write!(f, "illegal recompile: {msg}")
            }
            Self::TypeMismatch {
                name,
                expected,
                found,
            } => write!(
                f,
                "uniform {name} holds {expected:?}, cannot assign {found:?}"
            ),
        }
    }
}

impl std::error::Error for ShaderError {}
