use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single scalar cell as handed over by a table decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

/// One row of a table. Rows are sparse: any column may be absent.
pub type Row = HashMap<String, Cell>;

#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    pub source_label: String,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Row>, source_label: impl Into<String>) -> Self {
        Self {
            columns,
            rows,
            source_label: source_label.into(),
        }
    }

    /// Build a table from positional records, the way CSV readers hand them out.
    ///
    /// Records shorter than the header leave the trailing columns absent.
    /// With duplicate header names the rightmost field wins.
    pub fn from_records(
        columns: Vec<String>,
        records: Vec<Vec<String>>,
        source_label: impl Into<String>,
    ) -> Self {
        let rows: Vec<Row> = records
            .into_iter()
            .map(|record| {
                columns
                    .iter()
                    .zip(record)
                    .map(|(col, field)| (col.clone(), Cell::Text(field)))
                    .collect()
            })
            .collect();
        Self::new(columns, rows, source_label)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.rows.is_empty()
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Number(n as f64)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

/// Grouping key for a cell. Absent cells still form their own group.
pub fn cell_key(cell: Option<&Cell>) -> String {
    match cell {
        None => "undefined".to_string(),
        Some(Cell::Null) => "null".to_string(),
        Some(Cell::Bool(b)) => b.to_string(),
        Some(Cell::Number(n)) => format_number(*n),
        Some(Cell::Text(s)) => s.clone(),
    }
}

/// Numeric reading of a cell, `None` when it is not a number at all.
pub fn parse_cell(cell: Option<&Cell>) -> Option<f64> {
    match cell? {
        Cell::Null => Some(0.0),
        Cell::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Cell::Number(n) if n.is_nan() => None,
        Cell::Number(n) => Some(*n),
        Cell::Text(s) => parse_number(s),
    }
}

/// Value a cell contributes to an aggregate. Anything unparseable counts as 0.
pub fn coerce_cell(cell: Option<&Cell>) -> f64 {
    match parse_cell(cell) {
        // -0 collapses to 0 as well
        Some(v) if v != 0.0 => v,
        _ => 0.0,
    }
}

/// Whether a cell reads as a finite number. Used to pick a default value column.
pub fn is_numeric_cell(cell: Option<&Cell>) -> bool {
    parse_cell(cell).is_some_and(f64::is_finite)
}

/// Parse text with the lenient numeric grammar spreadsheets and browsers share:
/// surrounding whitespace is ignored, empty text is zero, radix prefixes and
/// `Infinity` are accepted.
pub fn parse_number(text: &str) -> Option<f64> {
    let s = text.trim();
    if s.is_empty() {
        return Some(0.0);
    }

    match s {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    let radix = match s.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return parse_radix(&s[2..], radix);
    }

    // f64::from_str also takes "inf" and "nan", which are not numbers here
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return None;
    }
    s.parse::<f64>().ok()
}

fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    let mut value = 0.0_f64;
    for c in digits.chars() {
        value = value * radix as f64 + c.to_digit(radix)? as f64;
    }
    Some(value)
}

/// Render a number the way a browser would print it.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        return n.to_string();
    }

    // Exponent form: 1e21 -> "1e+21", 1.5e-7 -> "1.5e-7"
    let formatted = format!("{:e}", n);
    match formatted.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
        _ => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_key() {
        assert_eq!(cell_key(Some(&Cell::from("East"))), "East");
        assert_eq!(cell_key(Some(&Cell::Number(10.0))), "10");
        assert_eq!(cell_key(Some(&Cell::Number(2.5))), "2.5");
        assert_eq!(cell_key(Some(&Cell::Number(-0.0))), "0");
        assert_eq!(cell_key(Some(&Cell::Bool(true))), "true");
        assert_eq!(cell_key(Some(&Cell::Null)), "null");
        assert_eq!(cell_key(None), "undefined");
    }

    #[test]
    fn test_format_number_exponents() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(123456.0), "123456");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("10"), Some(10.0));
        assert_eq!(parse_number("  -3.5 "), Some(-3.5));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number(""), Some(0.0));
        assert_eq!(parse_number("0x1A"), Some(26.0));
        assert_eq!(parse_number("0b101"), Some(5.0));
        assert_eq!(parse_number("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("1,234"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("."), None);
        assert_eq!(parse_number("0x"), None);
        assert_eq!(parse_number("12px"), None);
    }

    #[test]
    fn test_coerce_cell() {
        assert_eq!(coerce_cell(Some(&Cell::from("abc"))), 0.0);
        assert_eq!(coerce_cell(Some(&Cell::from("7"))), 7.0);
        assert_eq!(coerce_cell(Some(&Cell::Bool(true))), 1.0);
        assert_eq!(coerce_cell(Some(&Cell::Null)), 0.0);
        assert_eq!(coerce_cell(Some(&Cell::Number(f64::NAN))), 0.0);
        assert_eq!(coerce_cell(None), 0.0);
        assert!(coerce_cell(Some(&Cell::from("-0"))).is_sign_positive());
    }

    #[test]
    fn test_is_numeric_cell() {
        assert!(is_numeric_cell(Some(&Cell::from("42"))));
        assert!(is_numeric_cell(Some(&Cell::from(""))));
        assert!(is_numeric_cell(Some(&Cell::Null)));
        assert!(!is_numeric_cell(Some(&Cell::from("Infinity"))));
        assert!(!is_numeric_cell(Some(&Cell::from("north"))));
        assert!(!is_numeric_cell(None));
    }

    #[test]
    fn test_from_records_sparse_and_duplicates() {
        let table = Table::from_records(
            vec!["a".to_string(), "b".to_string(), "a".to_string()],
            vec![
                vec!["1".to_string(), "2".to_string(), "3".to_string()],
                vec!["4".to_string()],
            ],
            "inline",
        );
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].get("a"), Some(&Cell::from("3")));
        assert_eq!(table.rows[1].get("a"), Some(&Cell::from("4")));
        assert_eq!(table.rows[1].get("b"), None);
        assert_eq!(table.columns.len(), 3);
    }
}
