mod null_renderer;
mod primitives;
mod surface;

pub use null_renderer::NullRenderer;
pub use primitives::Color;
pub use surface::{ChartSurface, RenderedChart};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ScrollyResult;

/// Fixed display configuration passed with every render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Whether the surface shows its interactive export/action menu.
    #[serde(default)]
    pub actions: bool,
    /// Inset around the chart, in pixels.
    #[serde(default = "default_padding_px")]
    pub padding: u32,
}

fn default_padding_px() -> u32 {
    10
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            actions: false,
            padding: default_padding_px(),
        }
    }
}

impl RenderOptions {
    #[must_use]
    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_actions(mut self, actions: bool) -> Self {
        self.actions = actions;
        self
    }
}

/// Contract implemented by any chart rendering surface.
///
/// The document is handed over whole and undecoded beyond JSON; the surface
/// owns its interpretation. Rendering may suspend.
#[async_trait(?Send)]
pub trait ChartRenderer {
    async fn render(&self, document: &serde_json::Value, options: &RenderOptions)
    -> ScrollyResult<()>;
}
