//! Decimal-comma normalization for numeric cells.
//!
//! The export writes `123,45`. A cell containing a comma is read with `.`
//! as thousands separator and `,` as decimal point; a cell without a comma
//! is parsed as-is, so `123.45` and `123` also work.

/// Parse a numeric cell into a finite `f64`.
///
/// Returns `None` for blank cells, non-numeric text, and `NaN`/infinity.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let cell = raw.trim().trim_matches('"').trim();
    if cell.is_empty() {
        return None;
    }
    let value = if cell.contains(',') {
        let canonical: String = cell
            .chars()
            .filter(|c| *c != '.')
            .map(|c| if c == ',' { '.' } else { c })
            .collect();
        canonical.parse::<f64>().ok()?
    } else {
        cell.parse::<f64>().ok()?
    };
    value.is_finite().then_some(value)
}

/// Parse a numeric cell into a whole number, rounding half away from zero.
pub fn parse_whole(raw: &str) -> Option<i64> {
    let value = parse_decimal(raw)?.round();
    if value.abs() >= i64::MAX as f64 {
        return None;
    }
    Some(value as i64)
}
