use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::trace;

use crate::error::{ScrollyError, ScrollyResult};

/// Raw result of retrieving one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ArtifactResponse {
    #[must_use]
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Retrieval capability the synchronizer is built on.
///
/// A non-success status is reported through the response, not as an error.
/// Errors are reserved for failures that produce no response at all.
#[async_trait(?Send)]
pub trait ArtifactFetcher {
    async fn fetch(&self, artifact: &str) -> ScrollyResult<ArtifactResponse>;
}

/// Same-origin static file retrieval rooted at a directory.
#[derive(Debug, Clone)]
pub struct StaticFileFetcher {
    root: PathBuf,
}

impl StaticFileFetcher {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps an identifier to a path under the root, or `None` when it would escape it.
    fn resolve(&self, artifact: &str) -> Option<PathBuf> {
        let relative = Path::new(artifact.trim_start_matches("./"));
        relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
            .then(|| self.root.join(relative))
    }
}

#[async_trait(?Send)]
impl ArtifactFetcher for StaticFileFetcher {
    async fn fetch(&self, artifact: &str) -> ScrollyResult<ArtifactResponse> {
        let Some(path) = self.resolve(artifact) else {
            return Ok(ArtifactResponse::status(403));
        };
        match tokio::fs::read(&path).await {
            Ok(body) => {
                trace!(artifact, bytes = body.len(), "static artifact read");
                Ok(ArtifactResponse::ok(body))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(ArtifactResponse::status(404)),
            Err(err) if err.kind() == ErrorKind::PermissionDenied => {
                Ok(ArtifactResponse::status(403))
            }
            Err(source) => Err(ScrollyError::Io { path, source }),
        }
    }
}
