//! Typed model of the layered chart document shipped as a step artifact.
//!
//! The synchronizer never looks inside these documents. This model is what the
//! offline producer writes and what the in-memory surface validates against.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ScrollyError, ScrollyResult};

pub const VEGA_LITE_SCHEMA_V5: &str = "https://vega.github.io/schema/vega-lite/v5.json";
pub const CONTAINER_SIZE: &str = "container";

/// One inline data row: field name to scalar value.
pub type Row = IndexMap<String, FieldValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    #[serde(rename = "$schema")]
    pub schema: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default = "container_size")]
    pub width: String,
    #[serde(default = "container_size")]
    pub height: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    pub layer: Vec<Layer>,
}

fn container_size() -> String {
    CONTAINER_SIZE.to_owned()
}

impl ChartSpec {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            schema: VEGA_LITE_SCHEMA_V5.to_owned(),
            title: Some(title.into()),
            width: container_size(),
            height: container_size(),
            background: None,
            layer: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }

    #[must_use]
    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layer.push(layer);
        self
    }

    /// Structural checks a rendering surface performs before drawing.
    pub fn validate(&self) -> ScrollyResult<()> {
        if !self.schema.starts_with("https://vega.github.io/schema/vega-lite/") {
            return Err(ScrollyError::RenderFailure {
                reason: format!("unsupported schema `{}`", self.schema),
            });
        }
        if self.layer.is_empty() {
            return Err(ScrollyError::RenderFailure {
                reason: "chart has no layers".to_owned(),
            });
        }
        for (position, layer) in self.layer.iter().enumerate() {
            layer.validate().map_err(|err| ScrollyError::RenderFailure {
                reason: format!("layer {position}: {err}"),
            })?;
        }
        Ok(())
    }

    /// Decodes a document previously handed over as an opaque JSON value.
    pub fn from_value(value: &serde_json::Value) -> ScrollyResult<Self> {
        Self::deserialize(value).map_err(|e| ScrollyError::RenderFailure {
            reason: format!("schema violation: {e}"),
        })
    }

    pub fn to_json_pretty(&self) -> ScrollyResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ScrollyError::InvalidData(format!("failed to serialize chart spec: {e}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub data: InlineData,
    pub mark: Mark,
    pub encoding: Encoding,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transform: Vec<Transform>,
}

impl Layer {
    #[must_use]
    pub fn new(values: Vec<Row>, mark: Mark, encoding: Encoding) -> Self {
        Self {
            data: InlineData { values },
            mark,
            encoding,
            transform: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_filter(mut self, expression: impl Into<String>) -> Self {
        self.transform.push(Transform {
            filter: expression.into(),
        });
        self
    }

    fn validate(&self) -> Result<(), String> {
        let channels = self.encoding.field_defs();
        if channels.is_empty() {
            return Err("encoding maps no channels".to_owned());
        }
        for def in channels {
            if def.field.is_empty() {
                return Err("encoding references an empty field name".to_owned());
            }
        }
        if self.mark.kind == MarkKind::Text && self.encoding.text.is_none() {
            return Err("text mark requires a text channel".to_owned());
        }
        if self.transform.iter().any(|t| t.filter.trim().is_empty()) {
            return Err("filter expression is empty".to_owned());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineData {
    pub values: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub filter: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkKind {
    Line,
    Point,
    Text,
}

/// Mark type plus the mark-specific styling the producer emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mark {
    #[serde(rename = "type")]
    pub kind: MarkKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
}

impl Mark {
    #[must_use]
    pub fn new(kind: MarkKind) -> Self {
        Self {
            kind,
            stroke_width: None,
            size: None,
            filled: None,
            align: None,
            dx: None,
            dy: None,
            font_size: None,
            font_weight: None,
        }
    }

    #[must_use]
    pub fn line(stroke_width: f64) -> Self {
        Self {
            stroke_width: Some(stroke_width),
            ..Self::new(MarkKind::Line)
        }
    }

    #[must_use]
    pub fn point(size: f64) -> Self {
        Self {
            size: Some(size),
            filled: Some(true),
            ..Self::new(MarkKind::Point)
        }
    }

    #[must_use]
    pub fn text(dx: f64, font_size: f64) -> Self {
        Self {
            align: Some("left".to_owned()),
            dx: Some(dx),
            font_size: Some(font_size),
            font_weight: Some("bold".to_owned()),
            ..Self::new(MarkKind::Text)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Encoding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<FieldDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<FieldDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<FieldDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tooltip: Vec<FieldDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<FieldDef>,
}

impl Encoding {
    #[must_use]
    pub fn field_defs(&self) -> Vec<&FieldDef> {
        self.x
            .iter()
            .chain(self.y.iter())
            .chain(self.color.iter())
            .chain(self.tooltip.iter())
            .chain(self.text.iter())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Temporal,
    Quantitative,
    Nominal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub field: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Scale>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<Axis>,
    /// `Some(None)` serializes as `"legend": null`, which hides the legend.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "nullable_legend"
    )]
    pub legend: Option<Option<serde_json::Value>>,
}

impl FieldDef {
    #[must_use]
    pub fn new(field: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            field: field.into(),
            field_type,
            title: None,
            format: None,
            scale: None,
            axis: None,
            legend: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: Scale) -> Self {
        self.scale = Some(scale);
        self
    }

    #[must_use]
    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = Some(axis);
        self
    }

    #[must_use]
    pub fn without_legend(mut self) -> Self {
        self.legend = Some(None);
        self
    }
}

mod nullable_legend {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Option<serde_json::Value>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Option<serde_json::Value>>, D::Error> {
        Option::<serde_json::Value>::deserialize(deserializer).map(Some)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scale {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<Vec<FieldValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zero: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_angle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::{ChartSpec, Encoding, FieldDef, FieldType, Layer, Mark, MarkKind, Row};
    use serde_json::json;

    fn line_layer() -> Layer {
        let mut row = Row::new();
        row.insert("date".to_owned(), "2020-01-01".into());
        row.insert("value".to_owned(), 3.5.into());
        Layer::new(
            vec![row],
            Mark::line(2.0),
            Encoding {
                x: Some(FieldDef::new("date", FieldType::Temporal)),
                y: Some(FieldDef::new("value", FieldType::Quantitative)),
                ..Encoding::default()
            },
        )
    }

    #[test]
    fn serializes_schema_and_container_sizing() {
        let spec = ChartSpec::new("Unemployment").with_layer(line_layer());
        let value = serde_json::to_value(&spec).expect("serialize");
        assert_eq!(value["$schema"], json!(super::VEGA_LITE_SCHEMA_V5));
        assert_eq!(value["width"], json!("container"));
        assert_eq!(value["height"], json!("container"));
        assert_eq!(value["layer"][0]["mark"]["type"], json!("line"));
        assert_eq!(value["layer"][0]["mark"]["strokeWidth"], json!(2.0));
        assert_eq!(value["layer"][0]["data"]["values"][0]["value"], json!(3.5));
        assert!(value["layer"][0].get("transform").is_none());
    }

    #[test]
    fn hidden_legend_serializes_as_null() {
        let def = FieldDef::new("series", FieldType::Nominal).without_legend();
        let value = serde_json::to_value(&def).expect("serialize");
        assert!(value.get("legend").expect("legend key").is_null());
        let plain = serde_json::to_value(FieldDef::new("series", FieldType::Nominal))
            .expect("serialize");
        assert!(plain.get("legend").is_none());
    }

    #[test]
    fn text_layer_without_text_channel_is_rejected() {
        let mut layer = line_layer();
        layer.mark = Mark::new(MarkKind::Text);
        let spec = ChartSpec::new("t").with_layer(layer);
        assert!(spec.validate().is_err());
    }

    #[test]
    fn empty_chart_is_rejected() {
        assert!(ChartSpec::new("empty").validate().is_err());
    }
}
