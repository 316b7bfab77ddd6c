// Interactive state: the loaded table, the field selection, and the chart
// data derived from them.

use std::time::{Duration, Instant};

use crate::data::Table;
use crate::ir::ChartData;
use crate::reader::SourceError;
use crate::resolve::Selection;
use crate::transform;
use crate::{ChartKind, VisualizerOptions};

/// Handle for one in-flight upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer upload already replaced the table; this one was dropped.
    Stale,
}

/// Cosmetic "recomputing" indicator. Tied to the recompute that armed it.
#[derive(Debug, Clone, Copy)]
struct BusyTimer {
    generation: u64,
    until: Instant,
}

#[derive(Debug)]
pub struct Visualizer {
    options: VisualizerOptions,
    table: Option<Table>,
    selection: Selection,
    output: ChartData,
    generation: u64,
    busy: Option<BusyTimer>,
    next_ticket: u64,
    applied_ticket: Option<LoadTicket>,
    last_error: Option<String>,
}

impl Visualizer {
    pub fn new(options: VisualizerOptions) -> Self {
        Self {
            options,
            table: None,
            selection: Selection::default(),
            output: ChartData::default(),
            generation: 0,
            busy: None,
            next_ticket: 0,
            applied_ticket: None,
            last_error: None,
        }
    }

    pub fn options(&self) -> &VisualizerOptions {
        &self.options
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Chart data from the latest recompute.
    pub fn output(&self) -> &ChartData {
        &self.output
    }

    /// Message from the most recent failed upload, cleared by the next good one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Number of recomputes so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // -------------------------------------------------------------------------
    // Table replacement
    // -------------------------------------------------------------------------

    /// Start an upload. The current table stays in use until it completes.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.next_ticket += 1;
        LoadTicket(self.next_ticket)
    }

    /// Swap in a decoded table, unless a newer upload got there first.
    pub fn complete_load(&mut self, ticket: LoadTicket, table: Table, now: Instant) -> LoadOutcome {
        if self.applied_ticket.is_some_and(|applied| applied > ticket) {
            log::debug!("discarding stale upload '{}'", table.source_label);
            return LoadOutcome::Stale;
        }

        log::debug!(
            "loaded '{}': {} columns, {} rows",
            table.source_label,
            table.columns.len(),
            table.rows.len()
        );
        self.applied_ticket = Some(ticket);
        self.last_error = None;
        self.selection = Selection::infer(&table, self.selection.kind);
        self.table = Some(table);
        self.recompute(now);
        LoadOutcome::Applied
    }

    /// Record a failed decode. The previous table and selection are kept.
    pub fn fail_load(&mut self, ticket: LoadTicket, error: &SourceError) -> LoadOutcome {
        if self.applied_ticket.is_some_and(|applied| applied > ticket) {
            return LoadOutcome::Stale;
        }
        log::warn!("upload failed: {}", error);
        self.last_error = Some(error.to_string());
        LoadOutcome::Applied
    }

    /// Replace the table in one step.
    pub fn load_table(&mut self, table: Table, now: Instant) {
        let ticket = self.begin_load();
        self.complete_load(ticket, table, now);
    }

    // -------------------------------------------------------------------------
    // Field selection
    // -------------------------------------------------------------------------

    pub fn set_primary_column(&mut self, column: impl Into<String>, now: Instant) {
        self.selection.primary_column = column.into();
        self.recompute(now);
    }

    pub fn set_value_column(&mut self, column: impl Into<String>, now: Instant) {
        self.selection.value_column = column.into();
        self.recompute(now);
    }

    /// `None` (or an empty name) clears the group-by column.
    pub fn set_secondary_column(&mut self, column: Option<String>, now: Instant) {
        self.selection.secondary_column = column.filter(|c| !c.is_empty());
        self.recompute(now);
    }

    pub fn set_chart_kind(&mut self, kind: ChartKind, now: Instant) {
        self.selection.kind = kind;
        self.recompute(now);
    }

    /// Recompute with the current inputs.
    pub fn refresh(&mut self, now: Instant) {
        self.recompute(now);
    }

    fn recompute(&mut self, now: Instant) {
        self.generation += 1;
        self.output = match &self.table {
            Some(table) => transform::recompute(table, &self.selection, &self.options),
            None => ChartData::empty(self.selection.title(), self.selection.kind),
        };
        self.busy = Some(BusyTimer {
            generation: self.generation,
            until: now + Duration::from_millis(self.options.busy_delay_ms),
        });
    }

    // -------------------------------------------------------------------------
    // Busy indicator
    // -------------------------------------------------------------------------

    pub fn is_busy(&self, now: Instant) -> bool {
        self.busy
            .is_some_and(|t| t.generation == self.generation && now < t.until)
    }

    /// Clear an expired busy indicator. Returns whether it is still up.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.is_busy(now) {
            self.busy = None;
        }
        self.busy.is_some()
    }

    /// Drop the busy indicator immediately. Output is left untouched.
    pub fn cancel_busy(&mut self) {
        self.busy = None;
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new(VisualizerOptions::default())
    }
}
