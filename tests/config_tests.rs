use scrolly_chart::ScrollyError;
use scrolly_chart::api::{CompletionOrdering, WidgetConfig};
use scrolly_chart::core::StepIndex;
use scrolly_chart::interaction::TriggerPolicy;
use scrolly_chart::render::RenderOptions;

#[test]
fn minimal_json_takes_defaults() {
    let config = WidgetConfig::from_json_str(r#"{"steps": ["A.json", "B.json"]}"#)
        .expect("config");

    assert_eq!(config.trigger, TriggerPolicy::majority_visible());
    assert_eq!(config.render_options, RenderOptions::default());
    assert!(!config.render_options.actions);
    assert_eq!(config.render_options.padding, 10);
    assert_eq!(config.completion_ordering, CompletionOrdering::Unordered);

    let table = config.step_table();
    assert_eq!(table.len(), 2);
    assert_eq!(table.resolve(StepIndex::new(1)).expect("step 1"), "B.json");
}

#[test]
fn full_json_overrides_every_field() {
    let config = WidgetConfig::from_json_str(
        r#"{
            "steps": ["charts/one.json"],
            "trigger": {"kind": "crossing_band", "top_inset_ratio": 0.5, "bottom_inset_ratio": 0.49},
            "render_options": {"actions": true, "padding": 4},
            "completion_ordering": "strict"
        }"#,
    )
    .expect("config");

    assert_eq!(config.trigger, TriggerPolicy::center_band());
    assert_eq!(
        config.render_options,
        RenderOptions::default().with_actions(true).with_padding(4)
    );
    assert_eq!(config.completion_ordering, CompletionOrdering::Strict);
}

#[test]
fn pretty_json_round_trips() {
    let config = WidgetConfig::new(["a.json", "b.json"])
        .with_trigger(TriggerPolicy::center_band())
        .with_completion_ordering(CompletionOrdering::Strict);
    let json = config.to_json_pretty().expect("json");
    assert_eq!(WidgetConfig::from_json_str(&json).expect("parse"), config);
}

#[test]
fn invalid_configs_are_rejected() {
    for input in [
        r#"{"steps": ["a.json", " "]}"#,
        r#"{"steps": ["a.json"], "trigger": {"kind": "area_ratio", "threshold": 2.0}}"#,
        r#"{"steps": ["a.json"], "completion_ordering": "sometimes"}"#,
        r#"{"trigger": {"kind": "area_ratio", "threshold": 0.5}}"#,
    ] {
        let err = WidgetConfig::from_json_str(input).expect_err(input);
        assert!(matches!(err, ScrollyError::InvalidConfig(_)), "{input}");
    }
}
