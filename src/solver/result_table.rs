use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::solver::SolverError;

/// A column of the result table.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub enum ResultColumn {
    /// The column at the given zero-based index.
    Index(usize),
    /// The last column of the row.
    Last,
}

/// The layout of the result file written by the solver.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ResultTableLayout {
    /// The number of lines to skip at the top of the file.
    pub header_rows: usize,
    /// The column containing the rotor efficiency.
    pub efficiency_column: ResultColumn,
    /// The column containing the thrust.
    pub thrust_column: ResultColumn,
}

impl Default for ResultTableLayout {
    /// Three header lines, the efficiency in the last column and the thrust in the eleventh.
    fn default() -> Self {
        Self {
            header_rows: 3,
            efficiency_column: ResultColumn::Last,
            thrust_column: ResultColumn::Index(10),
        }
    }
}

/// The numeric table of a solver result file. The table has one row for each analysed operating
/// point and all rows have the same number of finite values.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    /// The name of the file the table was read from. This is used in error messages.
    source: String,
    /// The table rows.
    rows: Vec<Vec<f64>>,
}

impl ResultTable {
    /// Read the table from a result file. This returns [`SolverError::MissingOutput`] if the file
    /// does not exist and [`SolverError::MalformedOutput`] if its content does not match the
    /// layout or the number of rows differs from `expected_rows`.
    ///
    /// # Arguments
    ///
    /// * `file`: The path to the result file.
    /// * `layout`: The file layout.
    /// * `expected_rows`: The number of expected rows (one for each operating point).
    ///
    /// returns: `Result<ResultTable, SolverError>`
    pub fn from_file(
        file: &Path,
        layout: &ResultTableLayout,
        expected_rows: usize,
    ) -> Result<Self, SolverError> {
        let source = file.display().to_string();
        let text = fs::read_to_string(file).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SolverError::MissingOutput(source.clone()),
            ErrorKind::InvalidData => SolverError::MalformedOutput(source.clone(), e.to_string()),
            _ => SolverError::Io(e.to_string()),
        })?;
        Self::parse(&text, &source, layout, expected_rows)
    }

    /// Parse the table from the text of a result file. Blank lines and lines starting with `#`
    /// after the header are ignored.
    ///
    /// # Arguments
    ///
    /// * `text`: The file content.
    /// * `source`: The name of the file.
    /// * `layout`: The file layout.
    /// * `expected_rows`: The number of expected rows.
    ///
    /// returns: `Result<ResultTable, SolverError>`
    pub fn parse(
        text: &str,
        source: &str,
        layout: &ResultTableLayout,
        expected_rows: usize,
    ) -> Result<Self, SolverError> {
        let malformed = |message: String| SolverError::MalformedOutput(source.to_string(), message);

        let mut rows: Vec<Vec<f64>> = Vec::new();
        for (line_number, line) in text.lines().enumerate().skip(layout.header_rows) {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let row = line
                .split_whitespace()
                .map(|v| {
                    v.parse::<f64>().map_err(|_| {
                        malformed(format!("cannot parse '{v}' on line {}", line_number + 1))
                    })
                })
                .collect::<Result<Vec<f64>, SolverError>>()?;
            if row.iter().any(|v| !v.is_finite()) {
                return Err(malformed(format!(
                    "line {} contains a non-finite value",
                    line_number + 1
                )));
            }
            if let Some(first) = rows.first() {
                if first.len() != row.len() {
                    return Err(malformed(format!(
                        "line {} has {} columns instead of {}",
                        line_number + 1,
                        row.len(),
                        first.len()
                    )));
                }
            }
            rows.push(row);
        }

        if rows.len() != expected_rows {
            return Err(malformed(format!(
                "found {} rows, but {expected_rows} were expected",
                rows.len()
            )));
        }

        Ok(Self {
            source: source.to_string(),
            rows,
        })
    }

    /// The table rows.
    ///
    /// returns: `&[Vec<f64>]`
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Get a value from the table. This returns [`SolverError::MalformedOutput`] if the row or
    /// the column do not exist.
    ///
    /// # Arguments
    ///
    /// * `row`: The row index.
    /// * `column`: The column.
    ///
    /// returns: `Result<f64, SolverError>`
    pub fn value(&self, row: usize, column: ResultColumn) -> Result<f64, SolverError> {
        let values = self.rows.get(row).ok_or_else(|| {
            SolverError::MalformedOutput(self.source.clone(), format!("row {row} does not exist"))
        })?;
        let value = match column {
            ResultColumn::Index(c) => values.get(c),
            ResultColumn::Last => values.last(),
        };
        value.copied().ok_or_else(|| {
            SolverError::MalformedOutput(
                self.source.clone(),
                format!("column {column:?} does not exist in row {row}"),
            )
        })
    }
}

#[cfg(test)]
mod test {
    use std::fs;

    use crate::solver::{ResultColumn, ResultTable, ResultTableLayout, SolverError};

    const RESULT: &str = "\
 Header line 1
 Header line 2
  J   Ma   Adv  ...
 1 2 3 4 5 6 7 8 9 10 0.85 12 0.61
 1 2 3 4 5 6 7 8 9 10 3.2 12 0.55
";

    #[test]
    /// Read the efficiency and thrust of two operating points.
    fn test_parse() {
        let layout = ResultTableLayout::default();
        let table = ResultTable::parse(RESULT, "res", &layout, 2).unwrap();
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.value(0, layout.efficiency_column).unwrap(), 0.61);
        assert_eq!(table.value(0, layout.thrust_column).unwrap(), 0.85);
        assert_eq!(table.value(1, layout.thrust_column).unwrap(), 3.2);
        assert!(matches!(
            table.value(2, ResultColumn::Last),
            Err(SolverError::MalformedOutput(_, _))
        ));
        assert!(table.value(0, ResultColumn::Index(13)).is_err());
    }

    #[test]
    /// A different number of rows is a malformed output.
    fn test_parse_wrong_row_count() {
        let layout = ResultTableLayout::default();
        assert!(matches!(
            ResultTable::parse(RESULT, "res", &layout, 1),
            Err(SolverError::MalformedOutput(_, _))
        ));
        assert!(ResultTable::parse("a\nb\nc\n", "res", &layout, 1).is_err());
    }

    #[test]
    /// Non-numeric, non-finite and ragged rows are malformed outputs.
    fn test_parse_malformed() {
        let layout = ResultTableLayout::default();
        let text = "h\nh\nh\n1 2 ****\n";
        assert!(ResultTable::parse(text, "res", &layout, 1).is_err());
        let text = "h\nh\nh\n1 2 NaN\n";
        assert!(ResultTable::parse(text, "res", &layout, 1).is_err());
        let text = "h\nh\nh\n1 2 3\n1 2\n";
        assert!(ResultTable::parse(text, "res", &layout, 2).is_err());
    }

    #[test]
    /// Read the table from a file.
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("res");
        let layout = ResultTableLayout::default();
        assert!(matches!(
            ResultTable::from_file(&file, &layout, 2),
            Err(SolverError::MissingOutput(_))
        ));

        fs::write(&file, RESULT).unwrap();
        let table = ResultTable::from_file(&file, &layout, 2).unwrap();
        assert_eq!(table.value(1, ResultColumn::Last).unwrap(), 0.55);
    }
}
