use std::fs;

use scrolly_chart::api::{
    ActivationOutcome, ArtifactFetcher, ChartSynchronizer, StaticFileFetcher, WidgetConfig,
};
use scrolly_chart::core::{
    ChartSpec, Encoding, FieldDef, FieldType, Layer, Mark, Row, StepIndex,
};
use scrolly_chart::error::FailureKind;
use scrolly_chart::render::ChartSurface;

fn write_chart(dir: &std::path::Path, name: &str, title: &str) {
    let mut row = Row::new();
    row.insert("date".to_owned(), "2021-06-01".into());
    row.insert("value".to_owned(), 5.9.into());
    let spec = ChartSpec::new(title).with_layer(Layer::new(
        vec![row],
        Mark::line(2.0),
        Encoding {
            x: Some(FieldDef::new("date", FieldType::Temporal)),
            y: Some(FieldDef::new("value", FieldType::Quantitative)),
            ..Encoding::default()
        },
    ));
    fs::write(dir.join(name), spec.to_json_pretty().expect("spec json")).expect("write chart");
}

#[tokio::test]
async fn existing_file_is_served_with_ok_status() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("a.json"), b"{}").expect("write");
    let fetcher = StaticFileFetcher::new(dir.path());

    let response = fetcher.fetch("a.json").await.expect("fetch");
    assert_eq!(response.status, 200);
    assert_eq!(response.body, b"{}".to_vec());

    let dotted = fetcher.fetch("./a.json").await.expect("fetch");
    assert!(dotted.is_success());
}

#[tokio::test]
async fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let fetcher = StaticFileFetcher::new(dir.path());

    let response = fetcher.fetch("missing.json").await.expect("fetch");
    assert_eq!(response.status, 404);
    assert!(!response.is_success());
}

#[tokio::test]
async fn identifiers_escaping_the_root_are_forbidden() {
    let dir = tempfile::tempdir().expect("tempdir");
    let fetcher = StaticFileFetcher::new(dir.path().join("charts"));

    for artifact in ["../secret.json", "charts/../../x.json", "/etc/passwd"] {
        let response = fetcher.fetch(artifact).await.expect("fetch");
        assert_eq!(response.status, 403, "{artifact}");
    }
}

#[tokio::test]
async fn synchronizer_renders_charts_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_chart(dir.path(), "step0.json", "Unemployment");
    write_chart(dir.path(), "step1.json", "Inflation");
    let config = WidgetConfig::new(["step0.json", "step1.json", "step2.json"]);
    let sync = ChartSynchronizer::from_config(
        StaticFileFetcher::new(dir.path()),
        ChartSurface::new(),
        &config,
    )
    .expect("synchronizer");

    assert_eq!(sync.activate(StepIndex::new(0)).await, ActivationOutcome::Rendered);
    assert_eq!(sync.activate(StepIndex::new(1)).await, ActivationOutcome::Rendered);
    assert_eq!(
        sync.activate(StepIndex::new(2)).await,
        ActivationOutcome::Failed(FailureKind::TransportFailure)
    );
    assert_eq!(
        sync.renderer().current_title().as_deref(),
        Some("Inflation")
    );
}
