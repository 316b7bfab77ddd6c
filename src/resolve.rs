use crate::data::{is_numeric_cell, Table};
use crate::ChartKind;

/// How rows are folded into points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationMode {
    /// Sum per category (bar, pie).
    Categorical,
    /// One field per secondary value (bar with a group-by column).
    Grouped,
    /// Sum per category, drawn as an area.
    Trend,
}

/// The user's current mapping of table columns onto the chart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub primary_column: String,
    pub value_column: String,
    pub secondary_column: Option<String>,
    pub kind: ChartKind,
}

impl Selection {
    /// Default mapping for a freshly loaded table. The chart kind is carried over.
    pub fn infer(table: &Table, kind: ChartKind) -> Self {
        Self {
            primary_column: table.columns.first().cloned().unwrap_or_default(),
            value_column: infer_value_column(table),
            secondary_column: None,
            kind,
        }
    }

    /// Group-by column, if one is set and the chart kind can use it.
    pub fn active_secondary(&self) -> Option<&str> {
        match (self.kind, self.secondary_column.as_deref()) {
            (ChartKind::Bar, Some(col)) if !col.is_empty() => Some(col),
            _ => None,
        }
    }

    pub fn mode(&self) -> AggregationMode {
        match self.kind {
            _ if self.active_secondary().is_some() => AggregationMode::Grouped,
            ChartKind::Bar | ChartKind::Pie => AggregationMode::Categorical,
            ChartKind::Area => AggregationMode::Trend,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.primary_column.is_empty() && !self.value_column.is_empty()
    }

    pub fn title(&self) -> String {
        format!("{} by {}", self.value_column, self.primary_column)
    }

    /// Columns offered in the group-by picker: everything except the two
    /// columns already mapped.
    pub fn secondary_candidates<'a>(&self, table: &'a Table) -> Vec<&'a str> {
        table
            .columns
            .iter()
            .map(String::as_str)
            .filter(|col| *col != self.primary_column && *col != self.value_column)
            .collect()
    }
}

/// First column whose first-row cell reads as a finite number, preferring
/// columns after the first; falls back to the second column.
fn infer_value_column(table: &Table) -> String {
    let first_row = table.rows.first();
    let numeric = |col: &&String| is_numeric_cell(first_row.and_then(|row| row.get(col.as_str())));

    table
        .columns
        .iter()
        .skip(1)
        .find(numeric)
        .or_else(|| table.columns.first().filter(numeric))
        .or_else(|| table.columns.get(1))
        .cloned()
        .unwrap_or_default()
}
