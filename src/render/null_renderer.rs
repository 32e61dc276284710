use std::cell::Cell;

use async_trait::async_trait;

use crate::error::ScrollyResult;
use crate::render::{ChartRenderer, RenderOptions};

/// Renderer that accepts every document and only counts calls.
///
/// Used by benches and hosts running the synchronizer headless.
#[derive(Debug, Default)]
pub struct NullRenderer {
    render_count: Cell<usize>,
}

impl NullRenderer {
    #[must_use]
    pub fn render_count(&self) -> usize {
        self.render_count.get()
    }
}

#[async_trait(?Send)]
impl ChartRenderer for NullRenderer {
    async fn render(
        &self,
        _document: &serde_json::Value,
        _options: &RenderOptions,
    ) -> ScrollyResult<()> {
        self.render_count.set(self.render_count.get() + 1);
        Ok(())
    }
}
