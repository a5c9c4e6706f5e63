//! Payload construction for one selector.

use std::time::Instant;

use chrono::Local;
use tracing::{info, warn};

use crate::config::ViewsConfig;
use crate::kpi::format::{goal_text, value_text};
use crate::kpi::queries::Queries;
use crate::kpi::rows::{RunRecord, ShiftKey, ShiftSummaryRow, TimeSeriesPoint};
use crate::kpi::status::{Palette, classify, delta_pct, resolve_color};
use crate::kpi::types::{Card, ChartPoint, ChartSpec, Payload, PayloadState, RunRow, RunTable, Selector};
use crate::warehouse::{QueryExecutor, QueryOutcome};

pub const PACKS_CHART_TITLE: &str = "Packs Per Man Hour";
pub const BINS_CHART_TITLE: &str = "Bins Per Hour";
pub const NO_ACTIVE_RUNS: &str = "No active runs";
pub const RUNS_UNAVAILABLE: &str = "Run data unavailable";

/// Builds payloads from the three views.
///
/// The summary row decides everything downstream: without one, the series
/// and run queries are not issued.
pub struct PayloadBuilder {
    executor: QueryExecutor,
    queries: Queries,
}

impl PayloadBuilder {
    pub fn new(executor: QueryExecutor, views: &ViewsConfig) -> Self {
        Self {
            executor,
            queries: Queries::new(views),
        }
    }

    pub async fn build(&self, selector: Selector) -> Payload {
        let started = Instant::now();
        info!(event = "core.payload.build_started", selector = %selector);

        let summary_sql = self.queries.shift_summary(&selector);
        let summary = match self.executor.run(&summary_sql).await {
            QueryOutcome::Rows(table) => ShiftSummaryRow::from_table(&table),
            QueryOutcome::Empty => None,
            QueryOutcome::Failed(reason) => {
                warn!(
                    event = "core.payload.summary_unavailable",
                    selector = %selector,
                    reason = %reason
                );
                return empty_payload(selector, PayloadState::Unavailable { reason });
            }
        };

        let Some(summary) = summary else {
            info!(event = "core.payload.no_data", selector = %selector);
            return empty_payload(selector, PayloadState::NoData);
        };

        let (series, runs) = match &summary.date_shift_key {
            Some(key) => (self.fetch_series(key).await, self.fetch_runs(key).await),
            None => {
                warn!(
                    event = "core.payload.shift_key_missing",
                    selector = %selector,
                    "Summary row has no DATE_SHIFT_KEY, skipping series and runs"
                );
                (Vec::new(), RunTable::Absent {
                    message: NO_ACTIVE_RUNS.to_string(),
                })
            }
        };

        let payload = Payload {
            selector,
            state: PayloadState::Ready,
            header: format!(
                "{} — Shift {}",
                summary.day_label.as_deref().unwrap_or_default(),
                summary.shift.as_deref().unwrap_or_default()
            ),
            placeholder: None,
            cards: summary_cards(&summary),
            packs_chart: chart(PACKS_CHART_TITLE, &series, |p| {
                (p.packs_per_man_hour, p.packs_per_man_hour_target)
            }),
            bins_chart: chart(BINS_CHART_TITLE, &series, |p| {
                (p.bins_per_hour, p.bins_per_hour_target)
            }),
            runs,
            built_at: Local::now(),
        };

        let run_count = match &payload.runs {
            RunTable::Rows { rows } => rows.len(),
            RunTable::Absent { .. } => 0,
        };
        info!(
            event = "core.payload.build_completed",
            selector = %selector,
            buckets = series.len(),
            runs = run_count,
            elapsed_ms = started.elapsed().as_millis() as u64
        );
        payload
    }

    async fn fetch_series(&self, key: &ShiftKey) -> Vec<TimeSeriesPoint> {
        match self.executor.run(&self.queries.shift_series(key)).await {
            QueryOutcome::Rows(table) => TimeSeriesPoint::from_table(&table),
            QueryOutcome::Empty | QueryOutcome::Failed(_) => Vec::new(),
        }
    }

    async fn fetch_runs(&self, key: &ShiftKey) -> RunTable {
        match self.executor.run(&self.queries.active_runs(key)).await {
            QueryOutcome::Rows(table) => RunTable::Rows {
                rows: RunRecord::from_table(&table).iter().map(run_row).collect(),
            },
            QueryOutcome::Empty => RunTable::Absent {
                message: NO_ACTIVE_RUNS.to_string(),
            },
            QueryOutcome::Failed(_) => RunTable::Absent {
                message: RUNS_UNAVAILABLE.to_string(),
            },
        }
    }
}

fn empty_payload(selector: Selector, state: PayloadState) -> Payload {
    let placeholder = match &state {
        PayloadState::Unavailable { .. } => {
            format!("Data source unavailable for {}", selector.label())
        }
        _ => format!("No shift data for {}", selector.label()),
    };

    Payload {
        selector,
        state,
        header: format!("No data — {}", selector.title()),
        placeholder: Some(placeholder),
        cards: Vec::new(),
        packs_chart: ChartSpec::empty(PACKS_CHART_TITLE),
        bins_chart: ChartSpec::empty(BINS_CHART_TITLE),
        runs: RunTable::Absent {
            message: NO_ACTIVE_RUNS.to_string(),
        },
        built_at: Local::now(),
    }
}

fn card(title: &str, value: Option<f64>, target: Option<f64>) -> Card {
    let delta = delta_pct(value, target);
    let tier = classify(value, target);
    Card {
        title: title.to_string(),
        value,
        target,
        delta_pct: delta,
        tier,
        color: tier.color(Palette::Saturated).to_string(),
        value_text: value_text(value),
        goal_text: goal_text(value, target, delta),
    }
}

fn summary_cards(summary: &ShiftSummaryRow) -> Vec<Card> {
    vec![
        card(
            "Bins Per Hour",
            summary.bins_per_hour,
            summary.bins_per_hour_target,
        ),
        card(
            "Packs Per Man Hour",
            summary.packs_per_man_hour,
            summary.packs_per_man_hour_target,
        ),
        card("Total Bins", summary.total_bins, summary.total_bins_target),
        card("Packs Per Bin", summary.packs_per_bin, None),
    ]
}

fn chart<F>(title: &str, series: &[TimeSeriesPoint], metric: F) -> ChartSpec
where
    F: Fn(&TimeSeriesPoint) -> (Option<f64>, Option<f64>),
{
    let points = series
        .iter()
        .map(|point| {
            let (value, target) = metric(point);
            let tier = classify(value, target);
            ChartPoint {
                bucket_start: point.bucket_start.clone(),
                label: point.label(),
                value,
                target,
                tier,
                color: tier.color(Palette::Saturated).to_string(),
            }
        })
        .collect();

    ChartSpec {
        title: title.to_string(),
        points,
    }
}

fn run_row(run: &RunRecord) -> RunRow {
    RunRow {
        run_key: run.run_key.clone().unwrap_or_default(),
        grower: run.grower.clone().unwrap_or_default(),
        variety: run.variety.clone().unwrap_or_default(),
        shift: run.shift.clone().unwrap_or_default(),
        bins_per_hour: run.bins_per_hour,
        bins_per_hour_target: run.bins_per_hour_target,
        bins_per_hour_color: resolve_color(
            run.bins_per_hour_color.as_deref(),
            run.bins_per_hour,
            run.bins_per_hour_target,
            Palette::Pastel,
        ),
        packs_per_man_hour: run.packs_per_man_hour,
        packs_per_man_hour_target: run.packs_per_man_hour_target,
        packs_per_man_hour_color: resolve_color(
            run.packs_per_man_hour_color.as_deref(),
            run.packs_per_man_hour,
            run.packs_per_man_hour_target,
            Palette::Pastel,
        ),
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::kpi::status::StatusTier;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_full_payload_cards() {
        let connector = connector(full());
        let payload = builder(&connector).build(Selector::Current).await;

        assert!(payload.is_ready());
        assert_eq!(payload.header, "Fri Oct 16 — Shift A");
        assert_eq!(payload.placeholder, None);
        assert_eq!(payload.cards.len(), 4);

        let bph = &payload.cards[0];
        assert_eq!(bph.title, "Bins Per Hour");
        assert_eq!(bph.delta_pct, 20.0);
        assert_eq!(bph.tier, StatusTier::Good);
        assert_eq!(bph.color, "#4CAF50");
        assert_eq!(bph.value_text, "120.0");
        assert_eq!(bph.goal_text, "Goal: 100.0 (+20.0%)");

        let ppmh = &payload.cards[1];
        assert_eq!(ppmh.delta_pct, -12.0);
        assert_eq!(ppmh.tier, StatusTier::Bad);

        let bins = &payload.cards[2];
        assert_eq!(bins.delta_pct, -5.0);
        assert_eq!(bins.tier, StatusTier::Warn);

        let ppb = &payload.cards[3];
        assert_eq!(ppb.tier, StatusTier::Neutral);
        assert_eq!(ppb.delta_pct, 0.0);
        assert_eq!(ppb.goal_text, "\u{a0}");
    }

    #[tokio::test]
    async fn test_cards_ignore_upstream_summary_colors() {
        let connector = connector(Canned {
            summary: Some(table(
                &[
                    "DATE_SHIFT_KEY",
                    "DAY_LABEL",
                    "SHIFT",
                    "BINS_PER_HOUR",
                    "BIN_HOUR_TARGET_WEIGHTED",
                    "BPH_TARGET_COLOR",
                ],
                &[&["2026-10-16-A", "Fri Oct 16", "A", "80", "100", "#00FF00"]],
            )),
            ..full()
        });
        let payload = builder(&connector).build(Selector::Current).await;

        let bph = &payload.cards[0];
        assert_eq!(bph.tier, StatusTier::Bad);
        assert_eq!(bph.color, "#F44336");
    }

    #[tokio::test]
    async fn test_full_payload_charts_sorted_and_colored() {
        let connector = connector(full());
        let payload = builder(&connector).build(Selector::Current).await;

        let labels: Vec<_> = payload.bins_chart.points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["06:00", "06:10"]);

        // 41 vs 40 good, 38 vs 40 warn (-5%)
        let bins_tiers: Vec<_> = payload.bins_chart.points.iter().map(|p| p.tier).collect();
        assert_eq!(bins_tiers, vec![StatusTier::Good, StatusTier::Warn]);

        // 3 vs 4 bad (-25%), 4.1 vs 4 good
        let packs_tiers: Vec<_> = payload.packs_chart.points.iter().map(|p| p.tier).collect();
        assert_eq!(packs_tiers, vec![StatusTier::Bad, StatusTier::Good]);
        assert_eq!(payload.packs_chart.points[0].color, "#F44336");
    }

    #[tokio::test]
    async fn test_run_colors_prefer_valid_upstream() {
        let connector = connector(full());
        let payload = builder(&connector).build(Selector::Current).await;

        let RunTable::Rows { rows } = &payload.runs else {
            panic!("expected run rows, got {:?}", payload.runs);
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].bins_per_hour_color, "#00FF00");
        // Invalid upstream code falls back to pastel tier (4.2 vs 4 good)
        assert_eq!(rows[0].packs_per_man_hour_color, "#C8E6C9");
        // Missing upstream: 30 vs 40 is bad
        assert_eq!(rows[1].bins_per_hour_color, "#FFCDD2");
        // No value: neutral
        assert_eq!(rows[1].packs_per_man_hour_color, "#E0E0E0");
    }

    #[tokio::test]
    async fn test_runs_query_uses_resolved_shift() {
        let connector = connector(full());
        builder(&connector).build(Selector::Current).await;

        let executed = connector.executed();
        assert_eq!(executed.len(), 3);
        assert!(executed[1].contains("DATE_SHIFT_KEY = '2026-10-16-A'"));
        assert!(executed[2].contains("p.DATE_D = '2026-10-16'"));
        assert!(executed[2].contains("p.SHIFT = 'A'"));
    }

    #[tokio::test]
    async fn test_no_summary_skips_downstream_queries() {
        let connector = connector(Canned {
            summary: None,
            ..full()
        });
        let date = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
        let payload = builder(&connector).build(Selector::Date(date)).await;

        assert_eq!(payload.state, PayloadState::NoData);
        assert_eq!(payload.header, "No data — 2025-07-04");
        assert_eq!(
            payload.placeholder.as_deref(),
            Some("No shift data for 2025-07-04")
        );
        assert!(payload.cards.is_empty());
        assert!(payload.packs_chart.is_empty());
        assert!(payload.bins_chart.is_empty());
        assert_eq!(
            payload.runs,
            RunTable::Absent {
                message: "No active runs".to_string()
            }
        );
        assert_eq!(connector.executed().len(), 1);
    }

    #[tokio::test]
    async fn test_summary_failure_is_unavailable_not_no_data() {
        let connector = connector(Canned {
            fail_summary: true,
            ..full()
        });
        let payload = builder(&connector).build(Selector::Current).await;

        assert!(payload.is_unavailable());
        assert_eq!(payload.header, "No data — Today");
        assert_eq!(
            payload.placeholder.as_deref(),
            Some("Data source unavailable for today")
        );
        assert_eq!(connector.executed().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_runs_marker() {
        let connector = connector(Canned {
            runs: None,
            ..full()
        });
        let payload = builder(&connector).build(Selector::Current).await;
        assert_eq!(
            payload.runs,
            RunTable::Absent {
                message: NO_ACTIVE_RUNS.to_string()
            }
        );
        assert!(payload.is_ready());
    }

    #[tokio::test]
    async fn test_build_is_idempotent_apart_from_timestamp() {
        let connector = connector(full());
        let builder = builder(&connector);

        let first = builder.build(Selector::Current).await;
        let mut second = builder.build(Selector::Current).await;
        second.built_at = first.built_at;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_summary_without_shift_key() {
        let connector = connector(Canned {
            summary: Some(table(&["DAY_LABEL", "SHIFT"], &[&["Fri Oct 16", "A"]])),
            ..full()
        });
        let payload = builder(&connector).build(Selector::Current).await;

        assert!(payload.is_ready());
        assert_eq!(payload.cards.len(), 4);
        assert!(payload.bins_chart.is_empty());
        assert_eq!(connector.executed().len(), 1);
    }
}
