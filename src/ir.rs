use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::ChartKind;

// =============================================================================
// Aggregation output
// =============================================================================

/// One renderable point: a category label plus its numeric series values.
///
/// Ungrouped charts carry a single `value` field. Grouped charts carry one
/// field per distinct secondary value, in legend order.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub name: String,
    pub values: Vec<(String, f64)>,
}

impl SeriesPoint {
    pub fn single(name: String, value: f64) -> Self {
        Self {
            name,
            values: vec![(VALUE_KEY.to_string(), value)],
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    /// The `value` field, 0 for grouped points.
    pub fn value(&self) -> f64 {
        self.get(VALUE_KEY).unwrap_or(0.0)
    }
}

/// Field name of the single series in ungrouped output.
pub const VALUE_KEY: &str = "value";

impl Serialize for SeriesPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry("name", &self.name)?;
        for (key, value) in &self.values {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Legend entry for one numeric series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub key: String,
    pub name: String,
    pub color: String,
}

/// Everything a chart widget needs to draw the current selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub title: String,
    pub kind: ChartKind,
    pub points: Vec<SeriesPoint>,
    pub categories: Vec<Category>,
}

impl ChartData {
    pub fn empty(title: String, kind: ChartKind) -> Self {
        Self {
            title,
            kind,
            points: Vec::new(),
            categories: Vec::new(),
        }
    }

    /// True when there is nothing to draw; widgets show a placeholder instead.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl Default for ChartData {
    fn default() -> Self {
        Self::empty(String::new(), ChartKind::default())
    }
}
