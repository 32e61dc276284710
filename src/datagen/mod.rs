//! Offline producer of step chart artifacts from indicator CSV exports.
//!
//! Pipeline: parse CSV, pivot wide series columns to long observations,
//! filter by date, round, assign series colors, build the layered chart,
//! write one JSON document per step.

mod builder;
mod csv;
mod manifest;
mod palette;
mod transform;

pub use builder::{StepChartBuilder, padded_domain};
pub use csv::{CsvTable, parse_rows};
pub use manifest::{GeneratedArtifact, GeneratorManifest, StepChartDefinition, write_artifacts};
pub use palette::SeriesPalette;
pub use transform::{
    DATE_FIELD, Observation, SERIES_FIELD, VALUE_FIELD, filter_date_range, latest_per_series,
    parse_date, pivot_longer, round_values, value_extent,
};
