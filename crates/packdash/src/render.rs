//! Terminal rendering of a payload.

use std::io::IsTerminal;

use packdash_core::kpi::format::value_text;
use packdash_core::{Card, ChartSpec, Payload, RunTable};

use crate::table::{RunTableFormatter, truncate};

const BAR_WIDTH: usize = 40;
const CARD_TITLE_WIDTH: usize = 20;

/// Color output only on an interactive terminal without `NO_COLOR`.
pub fn use_color() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

pub fn clear_screen() {
    print!("\x1b[2J\x1b[H");
}

pub fn print_payload(payload: &Payload, color: bool) {
    println!("{}", format_payload(payload, color));
}

pub fn format_payload(payload: &Payload, color: bool) -> String {
    let mut out = vec![payload.header.clone(), payload.last_updated(), String::new()];

    if let Some(placeholder) = &payload.placeholder {
        out.push(placeholder.clone());
        out.push(String::new());
    }

    out.extend(payload.cards.iter().map(|card| format_card(card, color)));
    if !payload.cards.is_empty() {
        out.push(String::new());
    }

    for chart in [&payload.packs_chart, &payload.bins_chart] {
        out.push(format_chart(chart, color));
        out.push(String::new());
    }

    match &payload.runs {
        RunTable::Rows { rows } => {
            out.push("Active Runs".to_string());
            out.push(RunTableFormatter::new(rows).format_table(rows, color));
        }
        RunTable::Absent { message } => out.push(message.clone()),
    }

    out.join("\n")
}

fn format_card(card: &Card, color: bool) -> String {
    let value = paint(&format!("{:>10}", card.value_text), &card.color, color);
    format!(
        "{} {}  {}",
        truncate(&card.title, CARD_TITLE_WIDTH),
        value,
        card.goal_text.trim()
    )
}

fn format_chart(chart: &ChartSpec, color: bool) -> String {
    let mut lines = vec![chart.title.clone()];
    if chart.is_empty() {
        lines.push("  (no data)".to_string());
        return lines.join("\n");
    }

    let scale = chart
        .points
        .iter()
        .flat_map(|p| [p.value, p.target])
        .flatten()
        .fold(0.0_f64, f64::max);

    for point in &chart.points {
        let bar_len = match point.value {
            Some(v) if scale > 0.0 && v > 0.0 => ((v / scale) * BAR_WIDTH as f64).round() as usize,
            _ => 0,
        };
        let bar = paint(&"█".repeat(bar_len), &point.color, color);
        let padding = " ".repeat(BAR_WIDTH - bar_len.min(BAR_WIDTH));
        lines.push(format!(
            "  {:>5} │{}{} {:>8}  goal {}",
            point.label,
            bar,
            padding,
            value_text(point.value),
            value_text(point.target)
        ));
    }
    lines.join("\n")
}

/// Wrap `text` in a 24-bit foreground color escape when enabled and `hex`
/// is a valid color.
pub fn paint(text: &str, hex: &str, enabled: bool) -> String {
    match hex_to_rgb(hex) {
        Some((r, g, b)) if enabled => format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m"),
        _ => text.to_string(),
    }
}

fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim().strip_prefix('#')?;
    if !digits.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match digits.len() {
        6 => Some((
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        3 => {
            let mut chars = digits.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            Some((chars.next()??, chars.next()??, chars.next()??))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, NaiveDate, TimeZone};
    use packdash_core::{ChartPoint, PayloadState, RunRow, Selector, StatusTier};

    fn no_data_payload() -> Payload {
        Payload {
            selector: Selector::Date(NaiveDate::from_ymd_opt(2025, 7, 4).unwrap()),
            state: PayloadState::NoData,
            header: "No data — 2025-07-04".to_string(),
            placeholder: Some("No shift data for 2025-07-04".to_string()),
            cards: Vec::new(),
            packs_chart: ChartSpec::empty("Packs Per Man Hour"),
            bins_chart: ChartSpec::empty("Bins Per Hour"),
            runs: RunTable::Absent {
                message: "No active runs".to_string(),
            },
            built_at: Local
                .with_ymd_and_hms(2025, 7, 4, 14, 5, 9)
                .single()
                .unwrap(),
        }
    }

    #[test]
    fn test_no_data_rendering() {
        let text = format_payload(&no_data_payload(), false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "No data — 2025-07-04");
        assert_eq!(lines[1], "Last updated: 02:05:09 PM");
        assert!(text.contains("No shift data for 2025-07-04"));
        assert!(text.contains("(no data)"));
        assert!(text.ends_with("No active runs"));
    }

    #[test]
    fn test_ready_rendering() {
        let mut payload = no_data_payload();
        payload.state = PayloadState::Ready;
        payload.header = "Fri Jul 4 — Shift A".to_string();
        payload.placeholder = None;
        payload.cards = vec![Card {
            title: "Bins Per Hour".to_string(),
            value: Some(120.0),
            target: Some(100.0),
            delta_pct: 20.0,
            tier: StatusTier::Good,
            color: "#4CAF50".to_string(),
            value_text: "120.0".to_string(),
            goal_text: "Goal: 100.0 (+20.0%)".to_string(),
        }];
        payload.bins_chart.points = vec![ChartPoint {
            bucket_start: "2025-07-04 06:00:00.000".to_string(),
            label: "06:00".to_string(),
            value: Some(41.0),
            target: Some(40.0),
            tier: StatusTier::Good,
            color: "#4CAF50".to_string(),
        }];
        payload.runs = RunTable::Rows {
            rows: vec![RunRow {
                run_key: "R-101".to_string(),
                grower: "1207".to_string(),
                variety: "GALA".to_string(),
                shift: "A".to_string(),
                bins_per_hour: Some(38.0),
                bins_per_hour_target: Some(40.0),
                bins_per_hour_color: "#FFF9C4".to_string(),
                packs_per_man_hour: Some(4.2),
                packs_per_man_hour_target: Some(4.0),
                packs_per_man_hour_color: "#C8E6C9".to_string(),
            }],
        };

        let text = format_payload(&payload, false);
        assert!(text.contains("Bins Per Hour             120.0  Goal: 100.0 (+20.0%)"));
        assert!(text.contains("06:00 │"));
        assert!(text.contains("Active Runs"));
        assert!(text.contains("R-101"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_paint() {
        assert_eq!(paint("x", "#4CAF50", true), "\x1b[38;2;76;175;80mx\x1b[0m");
        assert_eq!(paint("x", "#fff", true), "\x1b[38;2;255;255;255mx\x1b[0m");
        assert_eq!(paint("x", "#4CAF50", false), "x");
        assert_eq!(paint("x", "green", true), "x");
    }
}
