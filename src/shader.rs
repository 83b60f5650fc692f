//! Shader stage sources.
//!
//! A [`Shader`] is just a stage tag plus GLSL text. Nothing is sent to the
//! driver until a pipeline using it is compiled, so a syntax error surfaces
//! as [`Error::Compilation`] from the registry.

use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

/// Programmable stage a shader is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex stage.
    Vertex,
    /// Fragment stage.
    Fragment,
    /// Compute stage.
    Compute,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
            Self::Compute => f.write_str("compute"),
        }
    }
}

/// Full-screen triangle vertex shader.
///
/// Emits a single oversized triangle covering the viewport from
/// `gl_VertexID` alone, so it needs no vertex input state. `v_uv` spans
/// `[0, 1]` across the visible area.
pub const FULLSCREEN_TRIANGLE_VERTEX_SRC: &str = r"#version 460 core

layout(location = 0) out vec2 v_uv;

void main() {
    vec2 pos = vec2(gl_VertexID == 0, gl_VertexID == 2);
    v_uv = pos * 2.0;
    gl_Position = vec4(pos * 4.0 - 1.0, 0.0, 1.0);
}
";

/// GLSL source for one pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shader {
    stage: ShaderStage,
    source: String,
}

impl Shader {
    /// Wrap GLSL source for `stage`.
    pub fn new(stage: ShaderStage, source: impl Into<String>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }

    /// Read GLSL source for `stage` from a file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read.
    pub fn from_file(stage: ShaderStage, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(stage, source))
    }

    /// The built-in [full-screen triangle](FULLSCREEN_TRIANGLE_VERTEX_SRC)
    /// vertex shader.
    pub fn fullscreen_triangle() -> Self {
        Self::new(ShaderStage::Vertex, FULLSCREEN_TRIANGLE_VERTEX_SRC)
    }

    /// Stage this shader targets.
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// GLSL source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Fail with [`Error::StageMismatch`] unless this shader targets `expected`.
    pub(crate) fn expect_stage(&self, expected: ShaderStage) -> Result<()> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(Error::StageMismatch {
                expected,
                found: self.stage,
            })
        }
    }
}
