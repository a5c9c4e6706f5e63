//! Selector and payload types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;

use crate::errors::ConfigError;
use crate::kpi::status::StatusTier;

/// Which shift a view is showing. Used as the cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "date", rename_all = "snake_case")]
pub enum Selector {
    /// The shift currently flagged active by the warehouse
    Current,
    /// The latest shift on the given date
    Date(NaiveDate),
}

impl Selector {
    /// Lowercase label for placeholder text: `today` or the date.
    pub fn label(&self) -> String {
        match self {
            Selector::Current => "today".to_string(),
            Selector::Date(date) => date.format("%Y-%m-%d").to_string(),
        }
    }

    /// Capitalized label for headers: `Today` or the date.
    pub fn title(&self) -> String {
        match self {
            Selector::Current => "Today".to_string(),
            Selector::Date(_) => self.label(),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Current => write!(f, "current"),
            Selector::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl FromStr for Selector {
    type Err = ConfigError;

    /// Accepts `today`/`current` (any case) or a `YYYY-MM-DD` date.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("today") || trimmed.eq_ignore_ascii_case("current") {
            return Ok(Selector::Current);
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(Selector::Date)
            .map_err(|_| ConfigError::InvalidSelector {
                value: s.to_string(),
            })
    }
}

/// How the summary fetch went for this payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PayloadState {
    Ready,
    /// The warehouse answered with no shift for the selector
    NoData,
    /// The summary query failed; nothing is known about the selector
    Unavailable { reason: String },
}

/// One KPI card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub title: String,
    pub value: Option<f64>,
    pub target: Option<f64>,
    pub delta_pct: f64,
    pub tier: StatusTier,
    pub color: String,
    pub value_text: String,
    pub goal_text: String,
}

/// One bar of a time-bucketed chart with its target line value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub bucket_start: String,
    pub label: String,
    pub value: Option<f64>,
    pub target: Option<f64>,
    pub tier: StatusTier,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub points: Vec<ChartPoint>,
}

impl ChartSpec {
    pub fn empty(title: &str) -> Self {
        Self {
            title: title.to_string(),
            points: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One run table row with resolved cell colors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRow {
    pub run_key: String,
    pub grower: String,
    pub variety: String,
    pub shift: String,
    pub bins_per_hour: Option<f64>,
    pub bins_per_hour_target: Option<f64>,
    pub bins_per_hour_color: String,
    pub packs_per_man_hour: Option<f64>,
    pub packs_per_man_hour_target: Option<f64>,
    pub packs_per_man_hour_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunTable {
    Rows { rows: Vec<RunRow> },
    Absent { message: String },
}

/// Render-ready bundle for one selector.
///
/// Built in one pass from one fetch of each view and never mutated
/// afterwards; the cache replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload {
    pub selector: Selector,
    pub state: PayloadState,
    pub header: String,
    /// Shown in place of the cards when there are none
    pub placeholder: Option<String>,
    pub cards: Vec<Card>,
    pub packs_chart: ChartSpec,
    pub bins_chart: ChartSpec,
    pub runs: RunTable,
    pub built_at: DateTime<Local>,
}

impl Payload {
    pub fn is_ready(&self) -> bool {
        self.state == PayloadState::Ready
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self.state, PayloadState::Unavailable { .. })
    }

    pub fn last_updated(&self) -> String {
        format!("Last updated: {}", self.built_at.format("%I:%M:%S %p"))
    }
}
