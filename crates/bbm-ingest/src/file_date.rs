//! # File Name Conventions
//!
//! Export files are named `Breitbandmessung_<date>…csv`. The desktop app
//! writes `Breitbandmessung_DD_MM_YYYY_HH_MM_SS.csv`; renamed copies in the
//! wild also use ISO or compact dates, so several date forms are accepted.
//!
//! The file date is advisory. Row timestamps are authoritative, and a file
//! whose name carries no recognizable date simply skips the mismatch check.

use chrono::NaiveDate;

/// Prefix shared by all measurement export files.
pub const MEASUREMENT_FILE_PREFIX: &str = "Breitbandmessung_";

/// Date layouts tried against the start of the name stem, with the number
/// of leading bytes each consumes.
const FILE_DATE_FORMATS: &[(&str, usize)] = &[
    ("%d_%m_%Y", 10),
    ("%Y-%m-%d", 10),
    ("%d.%m.%Y", 10),
    ("%Y_%m_%d", 10),
    ("%Y%m%d", 8),
];

/// Whether `file_name` looks like a measurement export
/// (`Breitbandmessung_*.csv`, extension case-insensitive).
pub fn is_measurement_file_name(file_name: &str) -> bool {
    file_name.starts_with(MEASUREMENT_FILE_PREFIX)
        && file_name
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("csv"))
}

/// Derive the capture date from a measurement file name.
///
/// Returns `None` when the name lacks the prefix or no known date layout
/// matches directly after it.
pub fn file_date_from_name(file_name: &str) -> Option<NaiveDate> {
    let stem = file_name.strip_prefix(MEASUREMENT_FILE_PREFIX)?;
    FILE_DATE_FORMATS.iter().find_map(|(format, width)| {
        let head = stem.get(..*width)?;
        NaiveDate::parse_from_str(head, format).ok()
    })
}

/// Whether two dates are more than one calendar day apart.
pub fn differs_by_more_than_a_day(file_date: NaiveDate, measured: NaiveDate) -> bool {
    (measured - file_date).num_days().abs() > 1
}
