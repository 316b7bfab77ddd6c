use std::collections::HashMap;

use crate::data::{cell_key, coerce_cell, Row, Table};
use crate::ir::{Category, ChartData, SeriesPoint, VALUE_KEY};
use crate::resolve::{AggregationMode, Selection};
use crate::VisualizerOptions;

/// Main entry point: turn the current table and selection into chart data.
///
/// Never fails. Missing columns, empty tables and unparseable cells all
/// degrade to empty or zero output.
pub fn recompute(table: &Table, selection: &Selection, options: &VisualizerOptions) -> ChartData {
    aggregate(&table.rows, selection, options)
}

/// Fold rows into series points and legend categories.
pub fn aggregate(rows: &[Row], selection: &Selection, options: &VisualizerOptions) -> ChartData {
    let title = selection.title();
    if rows.is_empty() || !selection.is_complete() {
        return ChartData::empty(title, selection.kind);
    }

    let (points, categories) = match (selection.mode(), selection.active_secondary()) {
        (AggregationMode::Grouped, Some(secondary)) => {
            aggregate_grouped(rows, selection, secondary, options)
        }
        (AggregationMode::Categorical | AggregationMode::Trend, _)
        | (AggregationMode::Grouped, None) => aggregate_summed(rows, selection, options),
    };

    ChartData {
        title,
        kind: selection.kind,
        points,
        categories,
    }
}

/// Pivot rows on the secondary column.
///
/// Unlike the ungrouped path, values are not summed: when several rows share
/// a (primary, secondary) pair the last row's value is kept.
fn aggregate_grouped(
    rows: &[Row],
    selection: &Selection,
    secondary: &str,
    options: &VisualizerOptions,
) -> (Vec<SeriesPoint>, Vec<Category>) {
    // 1. Distinct secondary values, first-seen order
    let mut series_keys: Vec<String> = Vec::new();
    let mut series_index: HashMap<String, usize> = HashMap::new();
    for row in rows {
        let key = cell_key(row.get(secondary));
        if !series_index.contains_key(&key) {
            series_index.insert(key.clone(), series_keys.len());
            series_keys.push(key);
        }
    }

    let categories: Vec<Category> = options
        .palette
        .assign_colors(&series_keys)
        .map(|(key, color)| Category {
            key: key.to_string(),
            name: key.to_string(),
            color: color.to_string(),
        })
        .collect();

    // 2. One point per primary value, every series starting at 0
    let mut points: Vec<SeriesPoint> = Vec::new();
    let mut point_index: HashMap<String, usize> = HashMap::new();
    for row in rows {
        let name = cell_key(row.get(&selection.primary_column));
        let idx = *point_index.entry(name.clone()).or_insert_with(|| {
            points.push(SeriesPoint {
                name,
                values: series_keys.iter().map(|k| (k.clone(), 0.0)).collect(),
            });
            points.len() - 1
        });

        // 3. Last write wins
        let series = series_index[&cell_key(row.get(secondary))];
        points[idx].values[series].1 = coerce_cell(row.get(&selection.value_column));
    }

    // 4. Hard cap on groups; the number of series is left as is
    let limit = options.series_limit;
    if points.len() > limit {
        log::debug!("grouped chart truncated from {} to {} points", points.len(), limit);
        points.truncate(limit);
    }

    (points, categories)
}

/// Sum the value column per primary value, largest first.
fn aggregate_summed(
    rows: &[Row],
    selection: &Selection,
    options: &VisualizerOptions,
) -> (Vec<SeriesPoint>, Vec<Category>) {
    let mut points: Vec<SeriesPoint> = Vec::new();
    let mut point_index: HashMap<String, usize> = HashMap::new();
    for row in rows {
        let name = cell_key(row.get(&selection.primary_column));
        let value = coerce_cell(row.get(&selection.value_column));
        match point_index.get(&name) {
            Some(&idx) => points[idx].values[0].1 += value,
            None => {
                point_index.insert(name.clone(), points.len());
                points.push(SeriesPoint::single(name, value));
            }
        }
    }

    // Infinity and -Infinity in one group sum to NaN, which counts as 0
    for point in &mut points {
        if point.values[0].1.is_nan() {
            point.values[0].1 = 0.0;
        }
    }

    // Stable sort keeps first-seen order for ties
    points.sort_by(|a, b| b.value().total_cmp(&a.value()));

    let limit = options.limit_for(selection.kind);
    if points.len() > limit {
        log::debug!(
            "{:?} chart truncated from {} to {} points",
            selection.kind,
            points.len(),
            limit
        );
        points.truncate(limit);
    }

    let categories = vec![Category {
        key: VALUE_KEY.to_string(),
        name: selection.value_column.clone(),
        color: options.palette.color_for(0).to_string(),
    }];

    (points, categories)
}
