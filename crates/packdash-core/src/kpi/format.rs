//! Text formatting for card values.

/// Placeholder for a missing value.
pub const MISSING_VALUE: &str = "—";

/// Goal line used when a card has no target, keeps card heights equal.
pub const BLANK_GOAL: &str = "\u{a0}";

/// Format with one decimal and thousands separators: `12345.67` → `12,345.7`.
pub fn format_number(value: f64) -> String {
    let fixed = format!("{:.1}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "0"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.0" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

pub fn value_text(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING_VALUE.to_string(), format_number)
}

/// `Goal: 100.0 (+20.0%)` when there is a positive goal and a value.
pub fn goal_text(value: Option<f64>, goal: Option<f64>, delta_pct: f64) -> String {
    match (value, goal) {
        (Some(_), Some(goal)) if goal > 0.0 => {
            let sign = if delta_pct >= 0.0 { "+" } else { "" };
            format!("Goal: {} ({sign}{delta_pct:.1}%)", format_number(goal))
        }
        _ => BLANK_GOAL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0.0");
        assert_eq!(format_number(41.26), "41.3");
        assert_eq!(format_number(999.96), "1,000.0");
        assert_eq!(format_number(1234567.0), "1,234,567.0");
        assert_eq!(format_number(-1234.5), "-1,234.5");
        assert_eq!(format_number(-0.01), "0.0");
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(Some(120.0)), "120.0");
        assert_eq!(value_text(None), "—");
    }

    #[test]
    fn test_goal_text() {
        assert_eq!(goal_text(Some(120.0), Some(100.0), 20.0), "Goal: 100.0 (+20.0%)");
        assert_eq!(goal_text(Some(88.0), Some(100.0), -12.0), "Goal: 100.0 (-12.0%)");
        assert_eq!(goal_text(Some(5.0), Some(0.0), 0.0), BLANK_GOAL);
        assert_eq!(goal_text(None, Some(100.0), 0.0), BLANK_GOAL);
    }
}
