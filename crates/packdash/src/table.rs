use packdash_core::RunRow;
use packdash_core::kpi::format::value_text;

use crate::render::paint;

pub struct RunTableFormatter {
    run_width: usize,
    grower_width: usize,
    variety_width: usize,
    shift_width: usize,
    measure_width: usize,
}

impl RunTableFormatter {
    pub fn new(rows: &[RunRow]) -> Self {
        let run_width = rows
            .iter()
            .map(|r| r.run_key.chars().count())
            .max()
            .unwrap_or(8)
            .clamp(3, 24); // Between "Run" header min and a key that still fits a TV row

        let variety_width = rows
            .iter()
            .map(|r| r.variety.chars().count())
            .max()
            .unwrap_or(12)
            .clamp(7, 30);

        Self {
            run_width,
            grower_width: 8,
            variety_width,
            shift_width: 5,
            measure_width: 9,
        }
    }

    pub fn format_table(&self, rows: &[RunRow], color: bool) -> String {
        let mut lines = vec![self.top_border(), self.header_row(), self.separator()];
        lines.extend(rows.iter().map(|row| self.format_row(row, color)));
        lines.push(self.bottom_border());
        lines.join("\n")
    }

    fn format_row(&self, row: &RunRow, color: bool) -> String {
        // Pad before painting so escape codes do not count toward the width
        let bph = paint(
            &truncate(&value_text(row.bins_per_hour), self.measure_width),
            &row.bins_per_hour_color,
            color,
        );
        let ppmh = paint(
            &truncate(&value_text(row.packs_per_man_hour), self.measure_width),
            &row.packs_per_man_hour_color,
            color,
        );

        format!(
            "│ {} │ {} │ {} │ {} │ {} │ {} │ {} │ {} │",
            truncate(&row.run_key, self.run_width),
            truncate(&row.grower, self.grower_width),
            truncate(&row.variety, self.variety_width),
            truncate(&row.shift, self.shift_width),
            bph,
            truncate(&value_text(row.bins_per_hour_target), self.measure_width),
            ppmh,
            truncate(&value_text(row.packs_per_man_hour_target), self.measure_width),
        )
    }

    fn widths(&self) -> [usize; 8] {
        [
            self.run_width,
            self.grower_width,
            self.variety_width,
            self.shift_width,
            self.measure_width,
            self.measure_width,
            self.measure_width,
            self.measure_width,
        ]
    }

    fn header_row(&self) -> String {
        let titles = [
            "Run",
            "Grower",
            "Variety",
            "Shift",
            "Bins/Hr",
            "Goal",
            "Packs/MH",
            "Goal",
        ];
        let cells: Vec<String> = titles
            .iter()
            .zip(self.widths())
            .map(|(title, width)| truncate(title, width))
            .collect();
        format!("│ {} │", cells.join(" │ "))
    }

    fn border(&self, left: &str, middle: &str, right: &str) -> String {
        let segments: Vec<String> = self.widths().iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{left}{}{right}", segments.join(middle))
    }

    fn top_border(&self) -> String {
        self.border("┌", "┬", "┐")
    }

    fn separator(&self) -> String {
        self.border("├", "┼", "┤")
    }

    fn bottom_border(&self) -> String {
        self.border("└", "┴", "┘")
    }
}

/// Truncate a string to a maximum display width, adding "..." if truncated.
///
/// Uses character count (not byte count) to safely handle UTF-8 strings.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}
