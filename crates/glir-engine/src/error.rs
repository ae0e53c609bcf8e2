//! Error taxonomy shared by the interpreter, the decoder and the retained layer.

use thiserror::Error;

use crate::backend::ShaderStage;
use crate::glir::ResourceKind;

/// Errors produced while decoding payloads or executing GLIR commands.
///
/// Every error aborts only the command that produced it; the resource table
/// stays valid. `ShaderCompileFailed` and `ProgramLinkFailed` are never
/// returned from `execute`; they are logged and collected as diagnostics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GlirError {
    #[error("unknown GLIR operation '{0}'")]
    UnknownOperation(String),

    #[error("unknown resource '{0}'")]
    UnknownResource(String),

    #[error("resource '{id}' is a {found}, expected {expected}")]
    WrongResourceKind {
        id: String,
        expected: &'static str,
        found: ResourceKind,
    },

    #[error("unknown element type '{0}'")]
    UnknownElementType(String),

    #[error("unknown GL type '{0}'")]
    UnknownGlType(String),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("malformed '{op}' command: {reason}")]
    MalformedCommand { op: &'static str, reason: String },

    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompileFailed { stage: ShaderStage, log: String },

    #[error("program failed to link: {0}")]
    ProgramLinkFailed(String),

    #[error("backend call failed: {0}")]
    BackendCallFailed(String),
}

impl GlirError {
    pub(crate) fn malformed(op: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedCommand {
            op,
            reason: reason.into(),
        }
    }

    /// Whether this error is a non-fatal diagnostic (compile/link) rather than
    /// a command failure.
    pub fn is_diagnostic(&self) -> bool {
        matches!(
            self,
            Self::ShaderCompileFailed { .. } | Self::ProgramLinkFailed(_)
        )
    }
}

pub type Result<T, E = GlirError> = std::result::Result<T, E>;
