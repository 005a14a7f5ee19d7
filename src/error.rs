//! Error type shared by the hero effects.

use std::fmt;

use thiserror::Error;

/// Which half of the shader pair failed to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EffectsError {
    /// The canvas refused to hand out the requested context.
    #[error("{0} rendering context unavailable")]
    ContextUnavailable(&'static str),

    #[error("failed to compile {stage} shader: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("failed to link shader program: {0}")]
    ProgramLink(String),

    /// A GL object or uniform could not be created or located.
    #[error("missing GPU resource: {0}")]
    Resource(&'static str),

    #[error("invalid effects config: {0}")]
    Config(String),

    /// A browser call threw; the payload is the stringified exception.
    #[error("host call failed: {0}")]
    Host(String),
}

impl From<serde_json::Error> for EffectsError {
    fn from(err: serde_json::Error) -> Self {
        EffectsError::Config(err.to_string())
    }
}

pub type Result<T, E = EffectsError> = std::result::Result<T, E>;
