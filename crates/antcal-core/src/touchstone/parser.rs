//! Two-port measurement file parser
//!
//! Implements parsing of the fixed nine-column magnitude-angle layout that
//! two-port VNA exports produce: frequency followed by magnitude/angle
//! pairs for S11, S21, S12 and S22, with magnitudes in dB and angles in
//! degrees.

use std::path::Path;
use thiserror::Error;

use ndarray::Array1;

use crate::constants::S2P_FIELDS_PER_ROW;
use crate::frequency::{FrequencyUnit, heuristic_unit, normalize_to_mhz};

/// Touchstone parsing errors
#[derive(Error, Debug)]
pub enum TouchstoneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// One parsed two-port measurement, a column per file field.
///
/// Rows keep file order, which is assumed frequency-ascending. Values keep
/// the file's semantics untouched: magnitudes stay in dB and angles in
/// degrees. The table is immutable once constructed; later processing
/// reads it without modifying it.
#[derive(Debug, Clone)]
pub struct MeasurementTable {
    /// Frequency column as written in the file
    freq_raw: Array1<f64>,
    /// Frequency re-expressed in MHz via the mean heuristic
    freq_mhz: Array1<f64>,
    s11_db: Array1<f64>,
    s11_deg: Array1<f64>,
    s21_db: Array1<f64>,
    s21_deg: Array1<f64>,
    s12_db: Array1<f64>,
    s12_deg: Array1<f64>,
    s22_db: Array1<f64>,
    s22_deg: Array1<f64>,
    /// Unit declared on the option line, when one was recognized
    declared_unit: Option<FrequencyUnit>,
    /// Comments from the file
    comments: Vec<String>,
}

impl MeasurementTable {
    /// Read and parse a measurement file.
    ///
    /// Returns `Ok(None)` when the file holds no data rows at all, which
    /// callers treat as "measurement not yet supplied" rather than as a
    /// failure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Option<Self>, TouchstoneError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Parse raw file bytes.
    ///
    /// Invalid UTF-8 byte sequences are dropped rather than failing the
    /// parse or being substituted with replacement characters, so stray
    /// instrument bytes in headers never corrupt adjacent numeric fields.
    pub fn from_bytes(bytes: &[u8]) -> Result<Option<Self>, TouchstoneError> {
        let mut content = String::with_capacity(bytes.len());
        for chunk in bytes.utf8_chunks() {
            content.push_str(chunk.valid());
        }
        Self::from_str(&content)
    }

    /// Parse from string content.
    ///
    /// Blank lines and comment lines (prefixed by `!`) are skipped, the
    /// option line (prefixed by `#`) is consulted only for its declared
    /// unit, and every remaining line must split into exactly nine numeric
    /// fields. A single malformed line fails the whole file.
    pub fn from_str(content: &str) -> Result<Option<Self>, TouchstoneError> {
        let mut declared_unit = None;
        let mut comments = Vec::new();
        let mut columns: [Vec<f64>; S2P_FIELDS_PER_ROW] = Default::default();

        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();

            if trimmed.is_empty() {
                continue;
            }

            if let Some(rest) = trimmed.strip_prefix('!') {
                comments.push(rest.trim().to_string());
                continue;
            }

            if let Some(rest) = trimmed.strip_prefix('#') {
                declared_unit = declared_unit.or_else(|| parse_option_line(rest));
                continue;
            }

            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            if fields.len() != S2P_FIELDS_PER_ROW {
                return Err(TouchstoneError::Parse {
                    line: idx + 1,
                    message: format!(
                        "expected {} fields, found {}",
                        S2P_FIELDS_PER_ROW,
                        fields.len()
                    ),
                });
            }

            for (col, field) in fields.iter().enumerate() {
                let value: f64 = field.parse().map_err(|_| TouchstoneError::Parse {
                    line: idx + 1,
                    message: format!("invalid numeric field {field:?}"),
                })?;
                columns[col].push(value);
            }
        }

        if columns[0].is_empty() {
            return Ok(None);
        }

        Ok(Some(Self::from_columns(columns, declared_unit, comments)))
    }

    /// Build a table directly from nine-field rows, each laid out exactly
    /// as a data line in a file: frequency plus the four magnitude/angle
    /// pairs. Returns `None` for an empty row set, mirroring the parser's
    /// treatment of files without data rows.
    pub fn from_rows(rows: &[[f64; S2P_FIELDS_PER_ROW]]) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }
        let mut columns: [Vec<f64>; S2P_FIELDS_PER_ROW] = Default::default();
        for row in rows {
            for (col, &value) in row.iter().enumerate() {
                columns[col].push(value);
            }
        }
        Some(Self::from_columns(columns, None, Vec::new()))
    }

    fn from_columns(
        columns: [Vec<f64>; S2P_FIELDS_PER_ROW],
        declared_unit: Option<FrequencyUnit>,
        comments: Vec<String>,
    ) -> Self {
        let [freq, s11m, s11a, s21m, s21a, s12m, s12a, s22m, s22a] = columns;

        let freq_raw = Array1::from_vec(freq);
        let freq_mhz = normalize_to_mhz(&freq_raw);

        let detected = heuristic_unit(freq_raw.mean().unwrap_or(0.0));
        if let Some(declared) = declared_unit {
            if declared != detected {
                tracing::warn!(
                    "declared unit {} disagrees with detected unit {}; keeping the detected one",
                    declared.label(),
                    detected.label()
                );
            }
        }

        Self {
            freq_raw,
            freq_mhz,
            s11_db: Array1::from_vec(s11m),
            s11_deg: Array1::from_vec(s11a),
            s21_db: Array1::from_vec(s21m),
            s21_deg: Array1::from_vec(s21a),
            s12_db: Array1::from_vec(s12m),
            s12_deg: Array1::from_vec(s12a),
            s22_db: Array1::from_vec(s22m),
            s22_deg: Array1::from_vec(s22a),
            declared_unit,
            comments,
        }
    }

    /// Number of data rows
    #[inline]
    pub fn len(&self) -> usize {
        self.freq_raw.len()
    }

    /// True when the table holds no rows. Tables built by the parser are
    /// never empty; files without data rows parse to an absent table.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.freq_raw.is_empty()
    }

    /// Frequency column as written in the file
    #[inline]
    pub fn freq_raw(&self) -> &Array1<f64> {
        &self.freq_raw
    }

    /// Frequency column in MHz
    #[inline]
    pub fn freq_mhz(&self) -> &Array1<f64> {
        &self.freq_mhz
    }

    /// S11 magnitude column (dB)
    #[inline]
    pub fn s11_db(&self) -> &Array1<f64> {
        &self.s11_db
    }

    /// S11 angle column (degrees)
    #[inline]
    pub fn s11_deg(&self) -> &Array1<f64> {
        &self.s11_deg
    }

    /// S21 magnitude column (dB)
    #[inline]
    pub fn s21_db(&self) -> &Array1<f64> {
        &self.s21_db
    }

    /// S21 angle column (degrees)
    #[inline]
    pub fn s21_deg(&self) -> &Array1<f64> {
        &self.s21_deg
    }

    /// S12 magnitude column (dB)
    #[inline]
    pub fn s12_db(&self) -> &Array1<f64> {
        &self.s12_db
    }

    /// S12 angle column (degrees)
    #[inline]
    pub fn s12_deg(&self) -> &Array1<f64> {
        &self.s12_deg
    }

    /// S22 magnitude column (dB)
    #[inline]
    pub fn s22_db(&self) -> &Array1<f64> {
        &self.s22_db
    }

    /// S22 angle column (degrees)
    #[inline]
    pub fn s22_deg(&self) -> &Array1<f64> {
        &self.s22_deg
    }

    /// Unit declared on the option line, if one was recognized
    #[inline]
    pub fn declared_unit(&self) -> Option<FrequencyUnit> {
        self.declared_unit
    }

    /// Unit the mean heuristic detected for the frequency column
    pub fn detected_unit(&self) -> FrequencyUnit {
        heuristic_unit(self.freq_raw.mean().unwrap_or(0.0))
    }

    /// Comments collected from the file
    #[inline]
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// First and last frequency in MHz
    pub fn freq_span_mhz(&self) -> (f64, f64) {
        let first = self.freq_mhz.first().copied().unwrap_or(0.0);
        let last = self.freq_mhz.last().copied().unwrap_or(0.0);
        (first, last)
    }
}

/// Extract the declared frequency unit from the body of an option line
/// (the text after `#`). Other option tokens such as the parameter type,
/// the data format and the reference impedance are accepted and ignored.
fn parse_option_line(rest: &str) -> Option<FrequencyUnit> {
    rest.split_whitespace().find_map(FrequencyUnit::from_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_option_line() {
        assert_eq!(parse_option_line(" Hz S DB R 50"), Some(FrequencyUnit::Hz));
        assert_eq!(parse_option_line(" MHz S MA R 75"), Some(FrequencyUnit::MHz));
        assert_eq!(parse_option_line(" S DB R 50"), None);
    }

    #[test]
    fn test_from_str_skips_comments_and_blanks() {
        let content = "! exported by VNA\n\n# MHz S DB R 50\n\
                       100.0 -10.0 5.0 -30.0 45.0 -30.5 44.0 -11.0 6.0\n";
        let table = MeasurementTable::from_str(content).unwrap().unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.comments(), ["exported by VNA"]);
        assert_eq!(table.declared_unit(), Some(FrequencyUnit::MHz));
        assert_eq!(table.freq_mhz()[0], 100.0);
        assert_eq!(table.s21_db()[0], -30.0);
    }

    #[test]
    fn test_from_str_empty_content_is_absent() {
        assert!(MeasurementTable::from_str("").unwrap().is_none());
        assert!(MeasurementTable::from_str("\n\n").unwrap().is_none());
        assert!(
            MeasurementTable::from_str("! only a comment\n# MHz S DB R 50\n")
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_from_str_rejects_short_row() {
        let err = MeasurementTable::from_str("1.0 2.0 3.0\n").unwrap_err();
        match err {
            TouchstoneError::Parse { line, message } => {
                assert_eq!(line, 1);
                assert!(message.contains("expected 9 fields, found 3"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_str_rejects_long_row() {
        let content = "1 2 3 4 5 6 7 8 9\n1 2 3 4 5 6 7 8 9 10\n";
        let err = MeasurementTable::from_str(content).unwrap_err();
        match err {
            TouchstoneError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_str_rejects_non_numeric_field() {
        let err = MeasurementTable::from_str("1 2 3 4 x 6 7 8 9\n").unwrap_err();
        match err {
            TouchstoneError::Parse { line, message } => {
                assert_eq!(line, 1);
                assert!(message.contains("\"x\""));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_bytes_drops_invalid_sequences() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"! exported\xFF by VNA\n");
        bytes.extend_from_slice(b"# MHz S DB R 50\n");
        bytes.extend_from_slice(b"100.0 -10.0 5.0 -30.0 45.0 -30.5 44.0 -11.0 6.0\n");
        let table = MeasurementTable::from_bytes(&bytes).unwrap().unwrap();
        assert_eq!(table.comments(), ["exported by VNA"]);
        assert_eq!(table.s21_db()[0], -30.0);
    }

    #[test]
    fn test_from_rows_empty_is_none() {
        assert!(MeasurementTable::from_rows(&[]).is_none());
    }

    #[test]
    fn test_from_rows_keeps_columns() {
        let table = MeasurementTable::from_rows(&[
            [1.0, -10.0, 1.0, -30.0, 2.0, -30.5, 3.0, -11.0, 4.0],
            [2.0, -10.5, 5.0, -31.0, 6.0, -31.5, 7.0, -11.5, 8.0],
        ])
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.freq_mhz()[1], 2.0);
        assert_eq!(table.s11_db()[1], -10.5);
        assert_eq!(table.s12_db()[0], -30.5);
        assert_eq!(table.s22_deg()[1], 8.0);
    }

    #[test]
    fn test_only_first_recognized_option_line_wins() {
        let content = "# GHz S DB R 50\n# MHz S DB R 50\n\
                       100.0 -10.0 5.0 -30.0 45.0 -30.5 44.0 -11.0 6.0\n";
        let table = MeasurementTable::from_str(content).unwrap().unwrap();
        assert_eq!(table.declared_unit(), Some(FrequencyUnit::GHz));
    }
}
