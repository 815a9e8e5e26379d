use std::collections::HashSet;

use ml_core::Observation;

use crate::{
    error::{PipelineError, Result},
    load::RawTable,
};

/// Prices must lie strictly inside this interval to be kept.
pub const PRICE_BOUNDS: (f64, f64) = (0.0, 1000.0);

/// What cleaning did to a single column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnFill {
    pub name: &'static str,
    pub median: f64,
    pub filled: usize,
}

/// Row counts at each cleaning step.
#[derive(Debug, Clone, PartialEq)]
pub struct CleaningReport {
    pub input_rows: usize,
    pub fills: Vec<ColumnFill>,
    pub duplicates_removed: usize,
    pub out_of_range_removed: usize,
    pub output_rows: usize,
}

/// Median of a non-empty slice; the mean of the two middle values for an
/// even count.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    })
}

/// Fills missing cells, drops exact duplicates and out-of-range prices.
///
/// Rows are never checked against the serving ranges here; any numeric
/// predictor value is accepted for training.
///
/// # Errors
/// - `PipelineError::NotEnoughRows` if the table is empty.
/// - `PipelineError::EmptyColumn` if a column has no numeric value at all.
pub fn clean(table: RawTable) -> Result<(Vec<Observation>, CleaningReport)> {
    let input_rows = table.rows();
    let RawTable { columns, extras } = table;
    if input_rows == 0 {
        return Err(PipelineError::NotEnoughRows {
            got: 0,
            needed: 2,
        });
    }

    let mut fills = Vec::with_capacity(columns.len());
    let mut dense: Vec<Vec<f64>> = Vec::with_capacity(columns.len());
    for column in columns {
        let present: Vec<f64> = column.values.iter().flatten().copied().collect();
        let fill = median(&present).ok_or(PipelineError::EmptyColumn(column.name))?;
        let filled = column.values.len() - present.len();
        log::info!(
            "{}: {filled} missing value(s) filled with median {fill:.2}",
            column.name
        );

        dense.push(column.values.iter().map(|v| v.unwrap_or(fill)).collect());
        fills.push(ColumnFill {
            name: column.name,
            median: fill,
            filled,
        });
    }

    let observations: Vec<Observation> = (0..input_rows)
        .map(|i| Observation::new(dense[0][i], dense[1][i], dense[2][i], dense[3][i]))
        .collect();

    let (observations, duplicates_removed) = drop_duplicates(observations, &extras);
    log::info!("duplicates removed: {duplicates_removed}");

    let (observations, out_of_range_removed) = filter_prices(observations);
    log::info!("rows removed for price outside {PRICE_BOUNDS:?}: {out_of_range_removed}");

    let report = CleaningReport {
        input_rows,
        fills,
        duplicates_removed,
        out_of_range_removed,
        output_rows: observations.len(),
    };
    Ok((observations, report))
}

/// Keeps the first occurrence of every exact duplicate row.
///
/// Two rows are duplicates only if their observations and their `extras`
/// tags (the remaining input columns) are both equal. Missing tags compare
/// as empty.
pub fn drop_duplicates(
    observations: Vec<Observation>,
    extras: &[String],
) -> (Vec<Observation>, usize) {
    let before = observations.len();
    let mut seen = HashSet::with_capacity(before);
    let kept: Vec<_> = observations
        .into_iter()
        .enumerate()
        .filter(|(i, o)| {
            let tag = extras.get(*i).map_or("", String::as_str);
            seen.insert((o.key(), tag))
        })
        .map(|(_, o)| o)
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}

pub fn filter_prices(observations: Vec<Observation>) -> (Vec<Observation>, usize) {
    let before = observations.len();
    let (lo, hi) = PRICE_BOUNDS;
    let kept: Vec<_> = observations
        .into_iter()
        .filter(|o| o.price > lo && o.price < hi)
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}
