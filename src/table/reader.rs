//! CSV ingestion for price tables.

use super::{Record, RowPolicy, Table, TableSchema};
use crate::error::{FramerError, Result};
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Reads a delimited text file into a [`Table`].
///
/// Rows are parsed in file order. Only the columns named by the
/// [`TableSchema`] are kept; anything before or after them is ignored.
#[derive(Debug, Clone, Default)]
pub struct TableReader {
    schema: TableSchema,
    policy: RowPolicy,
}

impl TableReader {
    pub fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            policy: RowPolicy::default(),
        }
    }

    /// Set the malformed-row policy.
    pub fn with_policy(mut self, policy: RowPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn policy(&self) -> RowPolicy {
        self.policy
    }

    /// Read and parse the whole file at `path`.
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<Table> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| FramerError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let table = self.read_from(file)?;
        info!(
            path = %path.display(),
            rows = table.len(),
            skipped = table.skipped_rows(),
            "loaded price table"
        );
        Ok(table)
    }

    /// Read and parse every row from `reader`.
    ///
    /// Blank lines between rows count as empty rows and go through the row
    /// policy. Blank lines after the last row are ignored.
    pub fn read_from<R: Read>(&self, mut reader: R) -> Result<Table> {
        self.schema.validate().map_err(FramerError::InvalidConfig)?;

        let mut input = Vec::new();
        reader.read_to_end(&mut input)?;
        let lines = content_lines(&input);

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(self.schema.has_headers)
            .flexible(true)
            .trim(csv::Trim::All)
            .delimiter(self.schema.delimiter as u8)
            .from_reader(input.as_slice());

        let header_rows = usize::from(self.schema.has_headers);
        let mut prev_line = if self.schema.has_headers {
            lines.first().copied().unwrap_or(0)
        } else {
            0
        };

        let mut records = Vec::new();
        let mut skipped_rows = 0usize;

        for (index, result) in csv_reader.records().enumerate() {
            let row = result?;
            let line = lines
                .get(index + header_rows)
                .copied()
                .unwrap_or_else(|| row.position().map_or(0, |pos| pos.line()));

            // The csv reader drops blank lines; treat each one as an empty row
            for blank in prev_line + 1..line {
                let err = FramerError::ShortRow {
                    line: blank,
                    expected: self.schema.required_fields(),
                    found: 0,
                };
                self.reject(err, &mut skipped_rows)?;
            }
            prev_line = line;

            match self.parse_row(&row, line) {
                Ok(record) => records.push(record),
                Err(err) => self.reject(err, &mut skipped_rows)?,
            }
        }

        debug!(
            rows = records.len(),
            skipped_rows,
            field_count = self.schema.field_count,
            "parsed table rows"
        );

        Ok(Table::from_parts(
            records,
            self.schema.field_count,
            skipped_rows,
        ))
    }

    /// Apply the row policy to a malformed row: skip it or propagate the error.
    fn reject(&self, err: FramerError, skipped_rows: &mut usize) -> Result<()> {
        if self.policy == RowPolicy::SkipAndWarn && err.is_row_error() {
            warn!(error = %err, "skipping malformed row");
            *skipped_rows += 1;
            Ok(())
        } else {
            Err(err)
        }
    }

    fn parse_row(&self, row: &StringRecord, line: u64) -> Result<Record> {
        let required = self.schema.required_fields();
        if row.len() < required {
            return Err(FramerError::ShortRow {
                line,
                expected: required,
                found: row.len(),
            });
        }

        let mut fields = Vec::with_capacity(self.schema.field_count);
        for column in self.schema.columns() {
            // Bounds checked above
            let raw = &row[column];
            let value = raw.parse::<f64>().map_err(|_| FramerError::NonNumeric {
                line,
                column,
                value: raw.to_string(),
            })?;
            fields.push(value);
        }

        Ok(Record::new(fields))
    }
}

/// 1-based numbers of the non-empty physical lines in `input`.
///
/// Each non-empty line holds exactly one record (no quoted line breaks), so
/// the k-th record read by the csv reader sits on the k-th entry.
fn content_lines(input: &[u8]) -> Vec<u64> {
    input
        .split(|&b| b == b'\n')
        .enumerate()
        .filter(|&(_, line)| !line.strip_suffix(b"\r").unwrap_or(line).is_empty())
        .map(|(index, _)| index as u64 + 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
2015-01-02,09:30,100.0,101.5,99.5,101.0,12000
2015-01-02,09:31,101.0,102.0,100.5,101.8,8000
2015-01-02,09:32,101.8,102.2,101.1,101.2,9500
";

    #[test]
    fn test_reads_selected_columns() {
        let table = TableReader::default().read_from(SAMPLE.as_bytes()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.field_count(), 5);
        assert_eq!(
            table.get(0).unwrap().fields(),
            &[100.0, 101.5, 99.5, 101.0, 12000.0]
        );
        assert_eq!(table.get(2).unwrap().value(3), Some(101.2));
    }

    #[test]
    fn test_extra_trailing_columns_are_ignored() {
        let input = "a,b,1,2,3,4,5,extra,more\n";
        let table = TableReader::default().read_from(input.as_bytes()).unwrap();
        assert_eq!(table.get(0).unwrap().fields(), &[1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_whitespace_around_fields_is_trimmed() {
        let input = "a,b, 1.5 ,2,3,4,5\n";
        let table = TableReader::default().read_from(input.as_bytes()).unwrap();
        assert_eq!(table.get(0).unwrap().value(0), Some(1.5));
    }

    #[test]
    fn test_strict_short_row_reports_line() {
        let input = "a,b,1,2,3,4,5\na,b,1,2\n";
        let err = TableReader::default()
            .read_from(input.as_bytes())
            .unwrap_err();

        match err {
            FramerError::ShortRow {
                line,
                expected,
                found,
            } => {
                assert_eq!(line, 2);
                assert_eq!(expected, 7);
                assert_eq!(found, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_strict_non_numeric_reports_column() {
        let input = "a,b,1,2,oops,4,5\n";
        let err = TableReader::default()
            .read_from(input.as_bytes())
            .unwrap_err();

        match err {
            FramerError::NonNumeric {
                line,
                column,
                value,
            } => {
                assert_eq!(line, 1);
                assert_eq!(column, 4);
                assert_eq!(value, "oops");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_skip_policy_drops_bad_rows() {
        let input = "a,b,1,2,3,4,5\na,b,1,2\na,b,x,2,3,4,5\na,b,6,7,8,9,10\n";
        let table = TableReader::default()
            .with_policy(RowPolicy::SkipAndWarn)
            .read_from(input.as_bytes())
            .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.skipped_rows(), 2);
        assert_eq!(table.get(1).unwrap().value(0), Some(6.0));
    }

    #[test]
    fn test_strict_blank_line_is_short_row() {
        let input = "d,t,1,2,3,4,5\n\nd,t,6,7,8,9,10\n";
        let err = TableReader::default()
            .read_from(input.as_bytes())
            .unwrap_err();

        match err {
            FramerError::ShortRow {
                line,
                expected,
                found,
            } => {
                assert_eq!(line, 2);
                assert_eq!(expected, 7);
                assert_eq!(found, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_skip_policy_counts_blank_lines() {
        let input = "d,t,1,2,3,4,5\n\n\nd,t,6,7,8,9,10\n";
        let table = TableReader::default()
            .with_policy(RowPolicy::SkipAndWarn)
            .read_from(input.as_bytes())
            .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.skipped_rows(), 2);
        assert_eq!(table.get(1).unwrap().value(0), Some(6.0));
    }

    #[test]
    fn test_trailing_blank_lines_are_ignored() {
        let input = "d,t,1,2,3,4,5\nd,t,6,7,8,9,10\n\n\n";
        let table = TableReader::default().read_from(input.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.skipped_rows(), 0);
    }

    #[test]
    fn test_blank_line_numbers_follow_the_file() {
        let input = "a,b,1,2,3,4,5\r\n\r\na,b,x,2,3,4,5\r\n";
        let err = TableReader::default()
            .read_from(input.as_bytes())
            .unwrap_err();
        assert!(matches!(err, FramerError::ShortRow { line: 2, found: 0, .. }));

        let lines = content_lines(input.as_bytes());
        assert_eq!(lines, vec![1, 3]);
    }

    #[test]
    fn test_header_line_is_skipped_when_configured() {
        let input = "date,time,open,high,low,close,volume\nd,t,1,2,3,4,5\n";
        let schema = TableSchema {
            has_headers: true,
            ..TableSchema::default()
        };
        let table = TableReader::new(schema).read_from(input.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_custom_delimiter_and_range() {
        let input = "1;2;3\n4;5;6\n";
        let schema = TableSchema {
            first_field: 1,
            field_count: 2,
            delimiter: ';',
            has_headers: false,
        };
        let table = TableReader::new(schema).read_from(input.as_bytes()).unwrap();
        assert_eq!(table.field_count(), 2);
        assert_eq!(table.get(1).unwrap().fields(), &[5.0, 6.0]);
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let err = TableReader::default()
            .read_path("definitely/not/here.csv")
            .unwrap_err();
        assert!(matches!(err, FramerError::Open { .. }));
    }

    #[test]
    fn test_empty_input_gives_empty_table() {
        let table = TableReader::default().read_from("".as_bytes()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.field_count(), 5);
    }
}
