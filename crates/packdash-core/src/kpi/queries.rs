//! SQL text for the three views.
//!
//! View names come from validated config; every runtime value is either a
//! formatted date or passes through [`quote_literal`].

use crate::config::ViewsConfig;
use crate::kpi::rows::ShiftKey;
use crate::kpi::types::Selector;

#[derive(Debug, Clone)]
pub struct Queries {
    shift_totals: String,
    shift_series: String,
    active_runs: String,
}

impl Queries {
    pub fn new(views: &ViewsConfig) -> Self {
        Self {
            shift_totals: views.shift_totals().to_string(),
            shift_series: views.shift_series().to_string(),
            active_runs: views.active_runs().to_string(),
        }
    }

    /// Summary row for the selector: the active shift, or the latest shift
    /// on the given date.
    pub fn shift_summary(&self, selector: &Selector) -> String {
        match selector {
            Selector::Current => format!(
                "SELECT *\nFROM {}\nWHERE IS_CURRENT_SHIFT = 1\nLIMIT 1",
                self.shift_totals
            ),
            Selector::Date(date) => format!(
                "SELECT *\nFROM {}\nWHERE DATE_SHIFT_KEY LIKE '{}%'\nORDER BY DATE_SHIFT_KEY DESC\nLIMIT 1",
                self.shift_totals,
                date.format("%Y-%m-%d")
            ),
        }
    }

    /// Ten-minute buckets for one shift, ascending.
    pub fn shift_series(&self, key: &ShiftKey) -> String {
        format!(
            "SELECT\n    BUCKET_START,\n    SUM(BINS_PER_HOUR) AS BINS_PER_HOUR,\n    AVG(BIN_HOUR_TARGET) AS BIN_HOUR_TARGET,\n    SUM(EST_PACKS_PER_MAN_HOUR) AS EST_PACKS_PER_MAN_HOUR,\n    AVG(PACKS_MANHOUR_TARGET) AS PACKS_MANHOUR_TARGET,\n    SUM(MINUTES_ELAPSED) AS MINUTES_ELAPSED\nFROM {}\nWHERE DATE_SHIFT_KEY = {}\nAND MINUTES_ELAPSED > 0\nGROUP BY BUCKET_START\nORDER BY BUCKET_START",
            self.shift_series,
            quote_literal(key.as_str())
        )
    }

    /// Runs packed during one shift, with run-level measures and targets.
    pub fn active_runs(&self, key: &ShiftKey) -> String {
        format!(
            "SELECT DISTINCT\n    p.RUN_KEY,\n    p.GROWER_NUMBER,\n    p.VARIETY_LIST,\n    p.SHIFT,\n    p.BINS_PER_HOUR,\n    p.BIN_HOUR_TARGET,\n    p.BPH_TARGET_COLOR,\n    p.EST_PACKS_PER_MAN_HOUR,\n    p.PACKS_MANHOUR_TARGET,\n    p.PACKS_TARGET_COLOR\nFROM {} p\nWHERE p.DATE_D = {}\nAND p.SHIFT = {}\nORDER BY p.RUN_KEY",
            self.active_runs,
            quote_literal(&key.date_part()),
            quote_literal(key.shift_part())
        )
    }
}

/// Single-quoted SQL string literal with embedded quotes doubled.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
