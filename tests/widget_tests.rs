use std::cell::RefCell;

use async_trait::async_trait;
use scrolly_chart::api::{
    ActivationOutcome, ArtifactFetcher, ArtifactResponse, ScrollyWidget, WidgetConfig,
};
use scrolly_chart::core::StepIndex;
use scrolly_chart::error::ScrollyResult;
use scrolly_chart::interaction::{StepRegion, TriggerPolicy, ViewportWindow};
use scrolly_chart::render::ChartSurface;
use serde_json::json;
use tokio::task::{JoinHandle, LocalSet};

/// Serves a one-layer chart titled after the requested artifact.
#[derive(Default)]
struct EchoFetcher {
    calls: RefCell<Vec<String>>,
}

impl EchoFetcher {
    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

#[async_trait(?Send)]
impl ArtifactFetcher for EchoFetcher {
    async fn fetch(&self, artifact: &str) -> ScrollyResult<ArtifactResponse> {
        self.calls.borrow_mut().push(artifact.to_owned());
        let document = json!({
            "$schema": "https://vega.github.io/schema/vega-lite/v5.json",
            "title": artifact,
            "layer": [{
                "data": {"values": [{"date": "2020-01-01", "value": 1.0}]},
                "mark": {"type": "point"},
                "encoding": {
                    "x": {"field": "date", "type": "temporal"},
                    "y": {"field": "value", "type": "quantitative"}
                }
            }]
        });
        Ok(ArtifactResponse::ok(
            serde_json::to_vec(&document).expect("document json"),
        ))
    }
}

fn stacked_regions(attributes: &[&str], height: f64) -> Vec<StepRegion> {
    attributes
        .iter()
        .enumerate()
        .map(|(position, attribute)| StepRegion::new(*attribute, position as f64 * height, height))
        .collect()
}

fn widget(
    trigger: TriggerPolicy,
    attributes: &[&str],
) -> ScrollyWidget<EchoFetcher, ChartSurface> {
    let config = WidgetConfig::new(["step0.json", "step1.json", "step2.json"]).with_trigger(trigger);
    ScrollyWidget::new(
        &config,
        stacked_regions(attributes, 600.0),
        EchoFetcher::default(),
        ChartSurface::new(),
    )
    .expect("widget")
}

async fn join_all(handles: Vec<JoinHandle<ActivationOutcome>>) -> Vec<ActivationOutcome> {
    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        outcomes.push(handle.await.expect("activation task"));
    }
    outcomes
}

#[tokio::test]
async fn setup_renders_step_zero_before_any_scroll() {
    LocalSet::new()
        .run_until(async {
            let widget = widget(TriggerPolicy::majority_visible(), &["0", "1", "2"]);

            let outcome = widget.setup().await.expect("setup task");

            assert_eq!(outcome, ActivationOutcome::Rendered);
            let sync = widget.synchronizer();
            assert_eq!(sync.current_step(), Some(StepIndex::new(0)));
            assert_eq!(sync.fetcher().calls(), vec!["step0.json".to_owned()]);
            assert_eq!(sync.renderer().render_count(), 1);
        })
        .await;
}

#[tokio::test]
async fn first_observation_of_active_region_is_suppressed_after_setup() {
    LocalSet::new()
        .run_until(async {
            let mut widget = widget(TriggerPolicy::majority_visible(), &["0", "1", "2"]);
            widget.setup().await.expect("setup task");

            let outcomes = join_all(widget.on_scroll(ViewportWindow::new(0.0, 800.0))).await;

            assert_eq!(outcomes, vec![ActivationOutcome::Unchanged]);
            assert_eq!(widget.synchronizer().fetcher().calls().len(), 1);
        })
        .await;
}

#[tokio::test]
async fn fast_scroll_forwards_every_qualifying_region_in_order() {
    LocalSet::new()
        .run_until(async {
            let mut widget = widget(TriggerPolicy::majority_visible(), &["0", "1", "2"]);
            widget.setup().await.expect("setup task");
            join_all(widget.on_scroll(ViewportWindow::new(0.0, 800.0))).await;

            // Window [700, 1500]: region 1 is 5/6 visible, region 2 exactly half.
            let outcomes = join_all(widget.on_scroll(ViewportWindow::new(700.0, 800.0))).await;

            assert_eq!(
                outcomes,
                vec![ActivationOutcome::Rendered, ActivationOutcome::Rendered]
            );
            let sync = widget.synchronizer();
            assert_eq!(sync.current_step(), Some(StepIndex::new(2)));
            assert_eq!(
                sync.fetcher().calls(),
                vec![
                    "step0.json".to_owned(),
                    "step1.json".to_owned(),
                    "step2.json".to_owned()
                ]
            );
            assert_eq!(sync.renderer().current_title().as_deref(), Some("step2.json"));
        })
        .await;
}

#[tokio::test]
async fn malformed_attribute_is_ignored() {
    LocalSet::new()
        .run_until(async {
            let mut widget = widget(TriggerPolicy::majority_visible(), &["0", "one", "2"]);
            widget.setup().await.expect("setup task");
            join_all(widget.on_scroll(ViewportWindow::new(0.0, 800.0))).await;

            // Only region 1 qualifies here, and its attribute does not parse.
            let handles = widget.on_scroll(ViewportWindow::new(600.0, 600.0));

            assert!(handles.is_empty());
            let sync = widget.synchronizer();
            assert_eq!(sync.current_step(), Some(StepIndex::new(0)));
            assert_eq!(sync.fetcher().calls().len(), 1);
        })
        .await;
}

#[tokio::test]
async fn center_band_activates_the_region_under_the_band() {
    LocalSet::new()
        .run_until(async {
            let mut widget = widget(TriggerPolicy::center_band(), &["0", "1", "2"]);
            widget.setup().await.expect("setup task");

            // Band sits at [1300, 1308]: inside region 2 only.
            let outcomes = join_all(widget.on_scroll(ViewportWindow::new(900.0, 800.0))).await;

            assert_eq!(outcomes, vec![ActivationOutcome::Rendered]);
            assert_eq!(
                widget.synchronizer().current_step(),
                Some(StepIndex::new(2))
            );
        })
        .await;
}

#[tokio::test]
async fn dispatched_tasks_run_without_being_awaited() {
    LocalSet::new()
        .run_until(async {
            let mut widget = widget(TriggerPolicy::majority_visible(), &["0", "1", "2"]);
            drop(widget.setup());
            drop(widget.on_scroll(ViewportWindow::new(600.0, 600.0)));

            for _ in 0..8 {
                tokio::task::yield_now().await;
            }

            let sync = widget.synchronizer();
            assert_eq!(sync.current_step(), Some(StepIndex::new(1)));
            assert_eq!(sync.renderer().render_count(), 2);
        })
        .await;
}
