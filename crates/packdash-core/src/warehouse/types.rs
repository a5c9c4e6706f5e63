//! In-memory result table.

/// Materialized query result: column names plus rows of nullable text cells.
///
/// The SQL API returns every value as text, so cells stay as strings and
/// are parsed on access.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<Option<String>>>) {
        (self.columns, self.rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Case-insensitive column lookup.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }

    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> {
        self.rows.iter().map(move |cells| RowRef {
            table: self,
            cells,
        })
    }

    pub fn first(&self) -> Option<RowRef<'_>> {
        self.rows().next()
    }
}

/// Borrowed view of one row with by-name accessors.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    table: &'a Table,
    cells: &'a [Option<String>],
}

impl<'a> RowRef<'a> {
    /// Raw text of a cell. Missing columns, nulls and blank strings are `None`.
    pub fn text(&self, column: &str) -> Option<&'a str> {
        let index = self.table.column_index(column)?;
        self.cells
            .get(index)?
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Numeric cell value. Unparseable and non-finite values are `None`.
    pub fn number(&self, column: &str) -> Option<f64> {
        self.text(column)?
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::new(
            vec!["DATE_SHIFT_KEY".to_string(), "BINS_PER_HOUR".to_string()],
            vec![
                vec![Some("2026-10-16-A".to_string()), Some("41.25".to_string())],
                vec![Some("2026-10-16-B".to_string()), None],
                vec![Some("  ".to_string()), Some("NaN".to_string())],
            ],
        )
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = table();
        let row = table.first().unwrap();
        assert_eq!(row.text("date_shift_key"), Some("2026-10-16-A"));
        assert_eq!(row.number("Bins_Per_Hour"), Some(41.25));
    }

    #[test]
    fn test_nulls_blanks_and_nan_are_absent() {
        let table = table();
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[1].number("BINS_PER_HOUR"), None);
        assert_eq!(rows[2].text("DATE_SHIFT_KEY"), None);
        assert_eq!(rows[2].number("BINS_PER_HOUR"), None);
    }

    #[test]
    fn test_unknown_column_is_absent() {
        let table = table();
        assert_eq!(table.first().unwrap().text("SHIFT"), None);
    }

    #[test]
    fn test_empty_table() {
        let table = Table::empty();
        assert!(table.is_empty());
        assert!(table.first().is_none());
    }
}
