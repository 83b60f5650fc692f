//! Error type shared by the registry, the sampler cache and the GL backend.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::shader::ShaderStage;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Which pipeline table a handle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    /// Vertex + fragment pipeline.
    Graphics,
    /// Single compute stage.
    Compute,
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Graphics => f.write_str("graphics"),
            Self::Compute => f.write_str("compute"),
        }
    }
}

/// Errors surfaced to the immediate caller. Nothing is retried.
#[derive(Error, Debug)]
pub enum Error {
    /// A shader stage failed to compile or the program failed to link.
    ///
    /// `log` is the driver's info log, verbatim.
    #[error("failed to compile pipeline `{name}`: {log}")]
    Compilation {
        /// Debug name of the pipeline being compiled.
        name: String,
        /// Driver diagnostic output.
        log: String,
    },

    /// The handle is unknown or its pipeline was already destroyed.
    #[error("{kind} pipeline handle {handle:#x} is not live")]
    NotFound {
        /// Table the lookup was made against.
        kind: PipelineKind,
        /// Raw 64-bit handle value.
        handle: u64,
    },

    /// A shader was passed in a slot meant for another stage.
    #[error("expected a {expected} shader, got a {found} shader")]
    StageMismatch {
        /// Stage the slot requires.
        expected: ShaderStage,
        /// Stage of the shader that was supplied.
        found: ShaderStage,
    },

    /// Generic driver failure (object creation, out of memory, ...).
    #[error("driver error: {0}")]
    Driver(String),

    /// Reading shader source from disk failed.
    #[error("failed to read shader source `{}`: {source}", .path.display())]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

// glow reports object creation failures as plain strings.
impl From<String> for Error {
    fn from(message: String) -> Self {
        Self::Driver(message)
    }
}
