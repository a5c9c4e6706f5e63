//! Typed rows extracted from the three views.

use chrono::{DateTime, NaiveDateTime};

use crate::warehouse::{RowRef, Table};

/// Warehouse shift key, `YYYY-MM-DD-<shift>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShiftKey(String);

impl ShiftKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `YYYY-MM-DD` part (first three dash-separated segments).
    pub fn date_part(&self) -> String {
        self.0.split('-').take(3).collect::<Vec<_>>().join("-")
    }

    /// The shift segment after the date, or empty when absent.
    pub fn shift_part(&self) -> &str {
        self.0.split('-').nth(3).unwrap_or("")
    }
}

/// Shift-level KPIs with targets.
///
/// The view also carries upstream status colors; cards are always rated by
/// [`classify`](crate::kpi::status::classify), so they are not read.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShiftSummaryRow {
    pub date_shift_key: Option<ShiftKey>,
    pub day_label: Option<String>,
    pub shift: Option<String>,
    pub bins_per_hour: Option<f64>,
    pub bins_per_hour_target: Option<f64>,
    pub packs_per_man_hour: Option<f64>,
    pub packs_per_man_hour_target: Option<f64>,
    pub total_bins: Option<f64>,
    pub total_bins_target: Option<f64>,
    pub packs_per_bin: Option<f64>,
}

impl ShiftSummaryRow {
    pub fn from_row(row: RowRef<'_>) -> Self {
        Self {
            date_shift_key: row.text("DATE_SHIFT_KEY").map(ShiftKey::new),
            day_label: owned(row.text("DAY_LABEL")),
            shift: owned(row.text("SHIFT")),
            bins_per_hour: row.number("BINS_PER_HOUR"),
            bins_per_hour_target: row.number("BIN_HOUR_TARGET_WEIGHTED"),
            packs_per_man_hour: row.number("STAMPER_PPMH"),
            packs_per_man_hour_target: row.number("PACKS_MANHOUR_TARGET_WEIGHTED"),
            total_bins: row.number("TOTAL_BINS"),
            total_bins_target: row.number("BINS_TARGET_FULL_SHIFT"),
            packs_per_bin: row.number("PACKS_PER_BIN"),
        }
    }

    /// First row of a summary result, if any.
    pub fn from_table(table: &Table) -> Option<Self> {
        table.first().map(Self::from_row)
    }
}

/// One ten-minute bucket of a shift.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesPoint {
    pub bucket_start: String,
    pub bucket_time: Option<NaiveDateTime>,
    pub bins_per_hour: Option<f64>,
    pub bins_per_hour_target: Option<f64>,
    pub packs_per_man_hour: Option<f64>,
    pub packs_per_man_hour_target: Option<f64>,
    pub minutes_elapsed: Option<f64>,
}

impl TimeSeriesPoint {
    pub fn from_row(row: RowRef<'_>) -> Self {
        let bucket_start = row.text("BUCKET_START").unwrap_or_default().to_string();
        Self {
            bucket_time: parse_bucket_start(&bucket_start),
            bucket_start,
            bins_per_hour: row.number("BINS_PER_HOUR"),
            bins_per_hour_target: row.number("BIN_HOUR_TARGET"),
            packs_per_man_hour: row.number("EST_PACKS_PER_MAN_HOUR"),
            packs_per_man_hour_target: row.number("PACKS_MANHOUR_TARGET"),
            minutes_elapsed: row.number("MINUTES_ELAPSED"),
        }
    }

    /// All buckets, ascending by start time. Unparseable starts sort last
    /// in row order.
    pub fn from_table(table: &Table) -> Vec<Self> {
        let mut points: Vec<Self> = table.rows().map(Self::from_row).collect();
        points.sort_by_key(|p| (p.bucket_time.is_none(), p.bucket_time));
        points
    }

    /// Short axis label, `HH:MM` when the start parsed.
    pub fn label(&self) -> String {
        self.bucket_time
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_else(|| self.bucket_start.clone())
    }
}

/// One packing run active in a shift.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunRecord {
    pub run_key: Option<String>,
    pub grower: Option<String>,
    pub variety: Option<String>,
    pub shift: Option<String>,
    pub bins_per_hour: Option<f64>,
    pub bins_per_hour_target: Option<f64>,
    pub bins_per_hour_color: Option<String>,
    pub packs_per_man_hour: Option<f64>,
    pub packs_per_man_hour_target: Option<f64>,
    pub packs_per_man_hour_color: Option<String>,
}

impl RunRecord {
    pub fn from_row(row: RowRef<'_>) -> Self {
        Self {
            run_key: owned(row.text("RUN_KEY")),
            grower: owned(row.text("GROWER_NUMBER")),
            variety: owned(row.text("VARIETY_LIST")),
            shift: owned(row.text("SHIFT")),
            bins_per_hour: row.number("BINS_PER_HOUR"),
            bins_per_hour_target: row.number("BIN_HOUR_TARGET"),
            bins_per_hour_color: owned(row.text("BPH_TARGET_COLOR")),
            packs_per_man_hour: row.number("EST_PACKS_PER_MAN_HOUR"),
            packs_per_man_hour_target: row.number("PACKS_MANHOUR_TARGET"),
            packs_per_man_hour_color: owned(row.text("PACKS_TARGET_COLOR")),
        }
    }

    pub fn from_table(table: &Table) -> Vec<Self> {
        table.rows().map(Self::from_row).collect()
    }
}

fn owned(text: Option<&str>) -> Option<String> {
    text.map(str::to_string)
}

/// Parse a bucket start as returned by the SQL API.
///
/// Timestamps arrive either as text (`2026-10-16 06:10:00.000`) or as epoch
/// seconds with a fractional part (`1792130400.000000000`).
pub fn parse_bucket_start(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }

    let (secs, frac) = raw.split_once('.').unwrap_or((raw, ""));
    let secs: i64 = secs.parse().ok()?;
    let nanos: u32 = if frac.is_empty() {
        0
    } else {
        let digits: String = frac.chars().take(9).collect();
        format!("{digits:0<9}").parse().ok()?
    };
    DateTime::from_timestamp(secs, nanos).map(|t| t.naive_utc())
}
