use chrono::NaiveDate;

use crate::core::{
    Axis, ChartSpec, Encoding, FieldDef, FieldType, FieldValue, Layer, Mark, Row, Scale,
};
use crate::error::{ScrollyError, ScrollyResult};

use super::transform::{DATE_FIELD, SERIES_FIELD, VALUE_FIELD};
use super::{Observation, SeriesPalette, latest_per_series, value_extent};

const Y_DOMAIN_PADDING_RATIO: f64 = 0.05;

/// Assembles the three-layer step chart: series lines, highlighted points,
/// and a label at each series' latest value.
#[derive(Debug, Clone)]
pub struct StepChartBuilder {
    title: String,
    background: Option<String>,
    y_title: Option<String>,
    value_format: String,
    date_axis_format: String,
    highlight_dates: Vec<NaiveDate>,
    label_series: bool,
}

impl StepChartBuilder {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            background: None,
            y_title: None,
            value_format: ".1f".to_owned(),
            date_axis_format: "%Y".to_owned(),
            highlight_dates: Vec::new(),
            label_series: true,
        }
    }

    #[must_use]
    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }

    #[must_use]
    pub fn with_y_title(mut self, y_title: impl Into<String>) -> Self {
        self.y_title = Some(y_title.into());
        self
    }

    #[must_use]
    pub fn with_value_format(mut self, format: impl Into<String>) -> Self {
        self.value_format = format.into();
        self
    }

    #[must_use]
    pub fn with_date_axis_format(mut self, format: impl Into<String>) -> Self {
        self.date_axis_format = format.into();
        self
    }

    #[must_use]
    pub fn with_highlight_dates(mut self, dates: Vec<NaiveDate>) -> Self {
        self.highlight_dates = dates;
        self
    }

    #[must_use]
    pub fn with_series_labels(mut self, enabled: bool) -> Self {
        self.label_series = enabled;
        self
    }

    pub fn build(
        &self,
        observations: &[Observation],
        palette: &SeriesPalette,
    ) -> ScrollyResult<ChartSpec> {
        let (min, max) = value_extent(observations).ok_or_else(|| {
            ScrollyError::InvalidData(format!("chart `{}` has no observations", self.title))
        })?;
        let rows: Vec<Row> = observations.iter().map(Observation::to_row).collect();

        let mut spec = ChartSpec::new(self.title.clone()).with_layer(Layer::new(
            rows.clone(),
            Mark::line(2.0),
            self.base_encoding(min, max, palette),
        ));
        if let Some(background) = &self.background {
            spec = spec.with_background(background.clone());
        }

        if !self.highlight_dates.is_empty() {
            spec = spec.with_layer(
                Layer::new(
                    rows.clone(),
                    Mark::point(60.0),
                    self.base_encoding(min, max, palette),
                )
                .with_filter(highlight_filter(&self.highlight_dates)),
            );
        }

        if self.label_series {
            let latest = latest_per_series(observations);
            let mut encoding = self.base_encoding(min, max, palette);
            encoding.tooltip.clear();
            encoding.text = Some(FieldDef::new(SERIES_FIELD, FieldType::Nominal));
            spec = spec.with_layer(
                Layer::new(rows, Mark::text(6.0, 12.0), encoding)
                    .with_filter(latest_filter(&latest)),
            );
        }

        Ok(spec)
    }

    fn base_encoding(&self, min: f64, max: f64, palette: &SeriesPalette) -> Encoding {
        let (lo, hi) = padded_domain(min, max);
        let y_axis = Axis {
            format: Some(self.value_format.clone()),
            title: self.y_title.clone(),
            ..Axis::default()
        };

        Encoding {
            x: Some(
                FieldDef::new(DATE_FIELD, FieldType::Temporal)
                    .with_title("")
                    .with_axis(Axis {
                        format: Some(self.date_axis_format.clone()),
                        grid: Some(false),
                        ..Axis::default()
                    }),
            ),
            y: Some(
                FieldDef::new(VALUE_FIELD, FieldType::Quantitative)
                    .with_scale(Scale {
                        domain: Some(vec![FieldValue::Number(lo), FieldValue::Number(hi)]),
                        range: None,
                        zero: Some(false),
                    })
                    .with_axis(y_axis),
            ),
            color: Some(
                FieldDef::new(SERIES_FIELD, FieldType::Nominal)
                    .with_scale(palette.scale())
                    .without_legend(),
            ),
            tooltip: vec![
                FieldDef::new(DATE_FIELD, FieldType::Temporal)
                    .with_title("Date")
                    .with_format("%b %Y"),
                FieldDef::new(SERIES_FIELD, FieldType::Nominal).with_title("Series"),
                FieldDef::new(VALUE_FIELD, FieldType::Quantitative)
                    .with_title("Value")
                    .with_format(self.value_format.clone()),
            ],
            text: None,
        }
    }
}

/// Pads the value extent so lines do not touch the plot edges.
#[must_use]
pub fn padded_domain(min: f64, max: f64) -> (f64, f64) {
    let span = max - min;
    if span <= 0.0 {
        return (min - 1.0, max + 1.0);
    }
    let pad = span * Y_DOMAIN_PADDING_RATIO;
    (min - pad, max + pad)
}

fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn date_test(date: NaiveDate) -> String {
    format!(
        "time(datum.{DATE_FIELD}) == time({})",
        quote(&date.format("%Y-%m-%d").to_string())
    )
}

fn highlight_filter(dates: &[NaiveDate]) -> String {
    dates
        .iter()
        .map(|date| date_test(*date))
        .collect::<Vec<_>>()
        .join(" || ")
}

fn latest_filter(latest: &[&Observation]) -> String {
    latest
        .iter()
        .map(|o| {
            format!(
                "(datum.{SERIES_FIELD} == {} && {})",
                quote(&o.series),
                date_test(o.date)
            )
        })
        .collect::<Vec<_>>()
        .join(" || ")
}
