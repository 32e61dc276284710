use std::collections::BTreeMap;

use chrono::NaiveDate;
use ordered_float::OrderedFloat;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::core::{FieldValue, Row};
use crate::error::{ScrollyError, ScrollyResult};

use super::CsvTable;

pub const DATE_FIELD: &str = "date";
pub const SERIES_FIELD: &str = "series";
pub const VALUE_FIELD: &str = "value";

/// Cell markers that mean "no observation" in indicator exports.
const MISSING_MARKERS: [&str; 3] = ["", ".", "NA"];

/// One indicator value on one date, in long format.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub series: String,
    pub value: f64,
}

impl Observation {
    #[must_use]
    pub fn to_row(&self) -> Row {
        let mut row = Row::new();
        row.insert(
            DATE_FIELD.to_owned(),
            FieldValue::Text(self.date.format("%Y-%m-%d").to_string()),
        );
        row.insert(SERIES_FIELD.to_owned(), FieldValue::Text(self.series.clone()));
        row.insert(VALUE_FIELD.to_owned(), FieldValue::Number(self.value));
        row
    }
}

pub fn parse_date(raw: &str) -> ScrollyResult<NaiveDate> {
    let raw = raw.trim();
    ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .ok_or_else(|| ScrollyError::InvalidData(format!("unrecognized date `{raw}`")))
}

/// Turns one column per series into one observation per (date, series).
///
/// Output is ordered by date, then by the order of `series_columns`.
pub fn pivot_longer(
    table: &CsvTable,
    date_column: &str,
    series_columns: &[String],
) -> ScrollyResult<Vec<Observation>> {
    let date_at = table.column(date_column)?;
    let series_at = series_columns
        .iter()
        .map(|name| table.column(name).map(|at| (name, at)))
        .collect::<ScrollyResult<Vec<_>>>()?;

    let mut by_date: BTreeMap<NaiveDate, Vec<Observation>> = BTreeMap::new();
    let mut skipped = 0_usize;
    for row in table.rows() {
        let date = parse_date(&row[date_at])?;
        for &(series, at) in &series_at {
            let cell = row[at].trim();
            if MISSING_MARKERS.contains(&cell) {
                skipped += 1;
                continue;
            }
            let value = cell.parse::<f64>().ok().filter(|v| v.is_finite()).ok_or_else(|| {
                ScrollyError::InvalidData(format!("`{series}` on {date}: `{cell}` is not a number"))
            })?;
            by_date.entry(date).or_default().push(Observation {
                date,
                series: series.clone(),
                value,
            });
        }
    }

    let observations: Vec<Observation> = by_date.into_values().flatten().collect();
    debug!(
        observations = observations.len(),
        skipped, "pivoted indicator table"
    );
    Ok(observations)
}

/// Keeps observations dated within `start..=end`; open bounds are unbounded.
#[must_use]
pub fn filter_date_range(
    observations: Vec<Observation>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<Observation> {
    observations
        .into_iter()
        .filter(|o| start.is_none_or(|s| o.date >= s) && end.is_none_or(|e| o.date <= e))
        .collect()
}

/// Rounds values half away from zero to `decimal_places`.
pub fn round_values(observations: &mut [Observation], decimal_places: u32) -> ScrollyResult<()> {
    for observation in observations {
        let decimal = Decimal::from_f64(observation.value).ok_or_else(|| {
            ScrollyError::InvalidData(format!(
                "`{}` value {} cannot be represented as a decimal",
                observation.series, observation.value
            ))
        })?;
        observation.value = decimal
            .round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
            .to_f64()
            .ok_or_else(|| {
                ScrollyError::InvalidData(format!("`{}` rounding overflowed", observation.series))
            })?;
    }
    Ok(())
}

/// Latest observation of each series, in first-seen series order.
#[must_use]
pub fn latest_per_series(observations: &[Observation]) -> Vec<&Observation> {
    let mut latest: Vec<&Observation> = Vec::new();
    for observation in observations {
        match latest.iter_mut().find(|o| o.series == observation.series) {
            Some(slot) if observation.date >= slot.date => *slot = observation,
            Some(_) => {}
            None => latest.push(observation),
        }
    }
    latest
}

/// Min and max value, or `None` for an empty slice.
#[must_use]
pub fn value_extent(observations: &[Observation]) -> Option<(f64, f64)> {
    let min = observations.iter().map(|o| OrderedFloat(o.value)).min()?;
    let max = observations.iter().map(|o| OrderedFloat(o.value)).max()?;
    Some((min.into_inner(), max.into_inner()))
}

#[cfg(test)]
mod tests {
    use super::{
        filter_date_range, latest_per_series, parse_date, pivot_longer, round_values,
        value_extent,
    };
    use crate::datagen::CsvTable;
    use approx::assert_relative_eq;

    fn table() -> CsvTable {
        CsvTable::from_text(
            "DATE,UNRATE,CPI\n2020-02-01,3.5,.\n2020-01-01,3.6,258.682\n2020-03-01,4.4,258.115\n",
        )
        .expect("table")
    }

    fn series() -> Vec<String> {
        vec!["UNRATE".to_owned(), "CPI".to_owned()]
    }

    #[test]
    fn pivot_orders_by_date_and_skips_missing_cells() {
        let observations = pivot_longer(&table(), "DATE", &series()).expect("pivot");
        assert_eq!(observations.len(), 5);
        assert_eq!(observations[0].series, "UNRATE");
        assert_eq!(observations[0].date, parse_date("2020-01-01").expect("date"));
        assert_eq!(observations[1].series, "CPI");
        assert_eq!(observations[2].date, parse_date("2020-02-01").expect("date"));
        assert_eq!(observations[3].date, parse_date("2020-03-01").expect("date"));
    }

    #[test]
    fn non_numeric_cell_is_invalid_data() {
        let table = CsvTable::from_text("DATE,UNRATE\n2020-01-01,high\n").expect("table");
        assert!(pivot_longer(&table, "DATE", &["UNRATE".to_owned()]).is_err());
    }

    #[test]
    fn accepts_us_style_dates() {
        assert_eq!(
            parse_date("03/01/2020").expect("us date"),
            parse_date("2020-03-01").expect("iso date")
        );
        assert!(parse_date("March 2020").is_err());
    }

    #[test]
    fn date_range_is_inclusive() {
        let observations = pivot_longer(&table(), "DATE", &series()).expect("pivot");
        let kept = filter_date_range(
            observations,
            Some(parse_date("2020-02-01").expect("start")),
            Some(parse_date("2020-03-01").expect("end")),
        );
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        let mut observations = pivot_longer(&table(), "DATE", &series()).expect("pivot");
        round_values(&mut observations, 1).expect("round");
        assert_relative_eq!(observations[1].value, 258.7);
        assert_relative_eq!(observations[4].value, 258.1);
    }

    #[test]
    fn latest_and_extent() {
        let observations = pivot_longer(&table(), "DATE", &series()).expect("pivot");
        let latest = latest_per_series(&observations);
        assert_eq!(latest.len(), 2);
        assert_relative_eq!(latest[0].value, 4.4);
        assert_relative_eq!(latest[1].value, 258.115);
        let (min, max) = value_extent(&observations).expect("extent");
        assert_relative_eq!(min, 3.5);
        assert_relative_eq!(max, 258.682);
        assert!(value_extent(&[]).is_none());
    }
}
