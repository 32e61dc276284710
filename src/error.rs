use std::path::PathBuf;

use thiserror::Error;

use crate::core::StepIndex;

pub type ScrollyResult<T> = Result<T, ScrollyError>;

#[derive(Debug, Error)]
pub enum ScrollyError {
    #[error("no chart artifact mapped for step {step}")]
    MissingArtifactMapping { step: StepIndex },

    #[error("malformed step index attribute: `{raw}`")]
    MalformedStepIndex { raw: String },

    #[error("retrieval of `{artifact}` failed with status {status}")]
    TransportFailure { status: u16, artifact: String },

    #[error("artifact `{artifact}` is not a valid chart document: {reason}")]
    DecodeFailure { artifact: String, reason: String },

    #[error("render surface rejected chart document: {reason}")]
    RenderFailure { reason: String },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("i/o error on `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fieldless classification of an activation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    MissingArtifactMapping,
    TransportFailure,
    DecodeFailure,
    RenderFailure,
    Other,
}

impl ScrollyError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::MissingArtifactMapping { .. } | Self::MalformedStepIndex { .. } => {
                FailureKind::MissingArtifactMapping
            }
            Self::TransportFailure { .. } | Self::Io { .. } => FailureKind::TransportFailure,
            Self::DecodeFailure { .. } => FailureKind::DecodeFailure,
            Self::RenderFailure { .. } => FailureKind::RenderFailure,
            Self::InvalidConfig(_) | Self::InvalidData(_) => FailureKind::Other,
        }
    }
}
