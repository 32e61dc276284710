use std::cell::RefCell;

use async_trait::async_trait;
use tracing::debug;

use crate::core::ChartSpec;
use crate::error::ScrollyResult;
use crate::render::{ChartRenderer, RenderOptions};

/// What the surface currently displays.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    pub spec: ChartSpec,
    pub options: RenderOptions,
}

/// In-memory render target that validates documents against the chart model.
///
/// A rejected document leaves the previous chart in place.
#[derive(Debug, Default)]
pub struct ChartSurface {
    current: RefCell<Option<RenderedChart>>,
    history: RefCell<Vec<Option<String>>>,
}

impl ChartSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> Option<RenderedChart> {
        self.current.borrow().clone()
    }

    #[must_use]
    pub fn current_title(&self) -> Option<String> {
        self.current
            .borrow()
            .as_ref()
            .and_then(|chart| chart.spec.title.clone())
    }

    /// Titles of every accepted render, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<Option<String>> {
        self.history.borrow().clone()
    }

    #[must_use]
    pub fn render_count(&self) -> usize {
        self.history.borrow().len()
    }
}

#[async_trait(?Send)]
impl ChartRenderer for ChartSurface {
    async fn render(
        &self,
        document: &serde_json::Value,
        options: &RenderOptions,
    ) -> ScrollyResult<()> {
        let spec = ChartSpec::from_value(document)?;
        spec.validate()?;
        debug!(
            title = spec.title.as_deref().unwrap_or_default(),
            layers = spec.layer.len(),
            "surface accepted chart"
        );
        self.history.borrow_mut().push(spec.title.clone());
        *self.current.borrow_mut() = Some(RenderedChart {
            spec,
            options: *options,
        });
        Ok(())
    }
}
