use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::WidgetConfig;
use crate::core::ChartSpec;
use crate::error::{ScrollyError, ScrollyResult};
use crate::interaction::TriggerPolicy;
use crate::render::Color;

use super::{
    CsvTable, SeriesPalette, StepChartBuilder, filter_date_range, parse_date, pivot_longer,
    round_values,
};

/// Producer configuration: one source table, one chart per step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorManifest {
    /// CSV source, relative to the manifest file.
    pub source: PathBuf,
    #[serde(default = "default_date_column")]
    pub date_column: String,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default = "default_round_dp")]
    pub round_dp: u32,
    /// Fixed colors for named series; others take the default cycle.
    #[serde(default)]
    pub colors: IndexMap<String, Color>,
    #[serde(default)]
    pub trigger: TriggerPolicy,
    pub steps: Vec<StepChartDefinition>,
}

fn default_date_column() -> String {
    "DATE".to_owned()
}

fn default_round_dp() -> u32 {
    2
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepChartDefinition {
    /// Artifact identifier, also the file name under the output directory.
    pub output: String,
    pub title: String,
    pub series: Vec<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub highlight_dates: Vec<String>,
    #[serde(default)]
    pub y_title: Option<String>,
    #[serde(default)]
    pub value_format: Option<String>,
    #[serde(default = "default_true")]
    pub label_series: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedArtifact {
    pub artifact: String,
    pub spec: ChartSpec,
}

impl GeneratorManifest {
    pub fn from_json_str(input: &str) -> ScrollyResult<Self> {
        let manifest: Self = serde_json::from_str(input).map_err(|e| {
            ScrollyError::InvalidConfig(format!("failed to parse generator manifest: {e}"))
        })?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn validate(&self) -> ScrollyResult<()> {
        if self.steps.is_empty() {
            return Err(ScrollyError::InvalidConfig(
                "manifest defines no steps".to_owned(),
            ));
        }
        self.trigger.validate()?;
        let mut outputs = HashSet::new();
        for (position, step) in self.steps.iter().enumerate() {
            let path = Path::new(&step.output);
            if step.output.trim().is_empty()
                || path.is_absolute()
                || path.components().count() != 1
            {
                return Err(ScrollyError::InvalidConfig(format!(
                    "step {position} output `{}` must be a plain file name",
                    step.output
                )));
            }
            if !outputs.insert(step.output.as_str()) {
                return Err(ScrollyError::InvalidConfig(format!(
                    "step {position} reuses output `{}`",
                    step.output
                )));
            }
            if step.series.is_empty() {
                return Err(ScrollyError::InvalidConfig(format!(
                    "step {position} lists no series"
                )));
            }
        }
        Ok(())
    }

    /// Palette over every series in the manifest, so a series keeps its
    /// color from step to step.
    #[must_use]
    pub fn palette(&self) -> SeriesPalette {
        SeriesPalette::new(
            self.steps
                .iter()
                .flat_map(|step| step.series.iter().map(String::as_str)),
            &self.colors,
        )
    }

    /// Widget config whose step table follows the manifest's step order.
    #[must_use]
    pub fn widget_config(&self) -> WidgetConfig {
        WidgetConfig::new(self.steps.iter().map(|step| step.output.clone()))
            .with_trigger(self.trigger)
    }

    pub fn generate(&self, table: &CsvTable) -> ScrollyResult<Vec<GeneratedArtifact>> {
        let palette = self.palette();

        #[cfg(feature = "parallel-generation")]
        let artifacts = {
            use rayon::prelude::*;
            self.steps
                .par_iter()
                .map(|step| self.generate_step(step, table, &palette))
                .collect::<ScrollyResult<Vec<_>>>()?
        };

        #[cfg(not(feature = "parallel-generation"))]
        let artifacts = self
            .steps
            .iter()
            .map(|step| self.generate_step(step, table, &palette))
            .collect::<ScrollyResult<Vec<_>>>()?;

        Ok(artifacts)
    }

    fn generate_step(
        &self,
        step: &StepChartDefinition,
        table: &CsvTable,
        palette: &SeriesPalette,
    ) -> ScrollyResult<GeneratedArtifact> {
        let start = step.start.as_deref().map(parse_date).transpose()?;
        let end = step.end.as_deref().map(parse_date).transpose()?;
        let highlight_dates = step
            .highlight_dates
            .iter()
            .map(|raw| parse_date(raw))
            .collect::<ScrollyResult<Vec<_>>>()?;

        let observations = pivot_longer(table, &self.date_column, &step.series)?;
        let mut observations = filter_date_range(observations, start, end);
        round_values(&mut observations, self.round_dp)?;

        let mut builder = StepChartBuilder::new(step.title.clone())
            .with_highlight_dates(highlight_dates)
            .with_series_labels(step.label_series);
        if let Some(background) = &self.background {
            builder = builder.with_background(background.clone());
        }
        if let Some(y_title) = &step.y_title {
            builder = builder.with_y_title(y_title.clone());
        }
        if let Some(format) = &step.value_format {
            builder = builder.with_value_format(format.clone());
        }

        let spec = builder.build(&observations, palette)?;
        info!(
            artifact = step.output.as_str(),
            rows = observations.len(),
            layers = spec.layer.len(),
            "built step chart"
        );
        Ok(GeneratedArtifact {
            artifact: step.output.clone(),
            spec,
        })
    }
}

/// Writes each artifact as pretty JSON under `dir`, creating it if needed.
pub fn write_artifacts(dir: &Path, artifacts: &[GeneratedArtifact]) -> ScrollyResult<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|source| ScrollyError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = dir.join(&artifact.artifact);
        let json = artifact.spec.to_json_pretty()?;
        fs::write(&path, json).map_err(|source| ScrollyError::Io {
            path: path.clone(),
            source,
        })?;
        written.push(path);
    }
    Ok(written)
}
