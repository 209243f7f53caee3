//! Readers for the static election tables.
//!
//! Both tables are read once at startup into an [`ElectionData`] value that is
//! shared read-only for the lifetime of the process.

use calamine::{open_workbook, Reader, Xlsx};
use log::{debug, info};
use snafu::{prelude::*, Snafu};

use election_report::{CandidateStatus, ElectionRecord, MpProfile};

#[derive(Debug, Snafu)]
pub enum DataError {
    #[snafu(display("Error opening workbook {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Workbook {path} has no data"))]
    EmptyExcel { path: String },
    #[snafu(display("Workbook {path} is missing the {column} column"))]
    MissingColumn { path: String, column: String },
    #[snafu(display("Unreadable cell in {path}: row {row}, column {column}"))]
    BadCell {
        path: String,
        row: usize,
        column: String,
    },
    #[snafu(display("Error opening CSV file {path}"))]
    OpeningCsv { source: csv::Error, path: String },
    #[snafu(display("Bad CSV line in {path}"))]
    CsvLineParse { source: csv::Error, path: String },
    #[snafu(display("CSV file {path} is missing the {column} column"))]
    MissingCsvColumn { path: String, column: String },
}

type DataResult<T> = Result<T, DataError>;

// Header names as they appear in the upstream workbook. "Satus" is how the
// source data spells it.
const COL_CONSTITUENCY: &str = "ConstituencyName";
const COL_CANDIDATE: &str = "CandidateDisplayName";
const COL_SHARE: &str = "ShareValue";
const COL_TURNOUT: &str = "Turnout";
const COL_ELECTORATE: &str = "Electorate";
const COL_STATUS: &str = "CandidateSatusPreElection";
const COL_PARTY: &str = "CandidateParty";
const COL_COLOUR: &str = "Colour";

const CSV_NAME: &str = "Name";
const CSV_URI: &str = "URI";

/// The static tables backing every request.
#[derive(Debug, Clone)]
pub struct ElectionData {
    pub records: Vec<ElectionRecord>,
    pub profiles: Vec<MpProfile>,
}

impl ElectionData {
    pub fn load(results_path: &str, profiles_path: &str) -> DataResult<ElectionData> {
        let records = read_results_workbook(results_path)?;
        let profiles = read_profiles_csv(profiles_path)?;
        info!(
            "loaded {} result rows and {} representative profiles",
            records.len(),
            profiles.len()
        );
        Ok(ElectionData { records, profiles })
    }
}

fn column_index(header: &[calamine::DataType], name: &str, path: &str) -> DataResult<usize> {
    header
        .iter()
        .position(|c| matches!(c, calamine::DataType::String(s) if s.trim() == name))
        .context(MissingColumnSnafu { path, column: name })
}

fn cell_str(
    cell: &calamine::DataType,
    path: &str,
    row: usize,
    column: &str,
) -> DataResult<String> {
    match cell {
        calamine::DataType::String(s) => Ok(s.trim().to_string()),
        calamine::DataType::Empty => Ok(String::new()),
        _ => None.context(BadCellSnafu { path, row, column }),
    }
}

fn cell_f64(cell: &calamine::DataType, path: &str, row: usize, column: &str) -> DataResult<f64> {
    match cell {
        calamine::DataType::Float(f) => Ok(*f),
        calamine::DataType::Int(i) => Ok(*i as f64),
        calamine::DataType::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .context(BadCellSnafu { path, row, column }),
        _ => None.context(BadCellSnafu { path, row, column }),
    }
}

fn cell_u64(cell: &calamine::DataType, path: &str, row: usize, column: &str) -> DataResult<u64> {
    match cell {
        calamine::DataType::Float(f) if *f >= 0.0 => Ok(*f as u64),
        calamine::DataType::Int(i) if *i >= 0 => Ok(*i as u64),
        calamine::DataType::String(s) => s
            .trim()
            .parse::<u64>()
            .ok()
            .context(BadCellSnafu { path, row, column }),
        _ => None.context(BadCellSnafu { path, row, column }),
    }
}

fn read_results_workbook(path: &str) -> DataResult<Vec<ElectionRecord>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = workbook
        .worksheet_range_at(0)
        .context(EmptyExcelSnafu { path })?
        .context(OpeningExcelSnafu { path })?;

    let mut iter = wrange.rows();
    let header = iter.next().context(EmptyExcelSnafu { path })?;
    debug!("header: {:?}", header);

    let con_idx = column_index(header, COL_CONSTITUENCY, path)?;
    let cand_idx = column_index(header, COL_CANDIDATE, path)?;
    let share_idx = column_index(header, COL_SHARE, path)?;
    let turnout_idx = column_index(header, COL_TURNOUT, path)?;
    let electorate_idx = column_index(header, COL_ELECTORATE, path)?;
    let status_idx = column_index(header, COL_STATUS, path)?;
    let party_idx = column_index(header, COL_PARTY, path)?;
    let colour_idx = column_index(header, COL_COLOUR, path)?;

    let mut res: Vec<ElectionRecord> = Vec::new();
    for (i, row) in iter.enumerate() {
        // 1-based, counting the header row.
        let rowno = i + 2;
        if row.iter().all(|c| matches!(c, calamine::DataType::Empty)) {
            // Trailing padding rows in the workbook.
            continue;
        }
        let status_label = cell_str(&row[status_idx], path, rowno, COL_STATUS)?;
        res.push(ElectionRecord {
            constituency: cell_str(&row[con_idx], path, rowno, COL_CONSTITUENCY)?,
            candidate: cell_str(&row[cand_idx], path, rowno, COL_CANDIDATE)?,
            share: cell_f64(&row[share_idx], path, rowno, COL_SHARE)?,
            turnout: cell_u64(&row[turnout_idx], path, rowno, COL_TURNOUT)?,
            electorate: cell_u64(&row[electorate_idx], path, rowno, COL_ELECTORATE)?,
            status: CandidateStatus::from_label(&status_label),
            party: cell_str(&row[party_idx], path, rowno, COL_PARTY)?,
            colour: cell_str(&row[colour_idx], path, rowno, COL_COLOUR)?,
        });
    }
    Ok(res)
}

fn read_profiles_csv(path: &str) -> DataResult<Vec<MpProfile>> {
    let mut reader = csv::Reader::from_path(path).context(OpeningCsvSnafu { path })?;
    let headers = reader.headers().context(CsvLineParseSnafu { path })?.clone();
    let name_idx = headers
        .iter()
        .position(|h| h.trim() == CSV_NAME)
        .context(MissingCsvColumnSnafu {
            path,
            column: CSV_NAME,
        })?;
    let uri_idx = headers
        .iter()
        .position(|h| h.trim() == CSV_URI)
        .context(MissingCsvColumnSnafu {
            path,
            column: CSV_URI,
        })?;

    let mut res: Vec<MpProfile> = Vec::new();
    for line_r in reader.records() {
        let line = line_r.context(CsvLineParseSnafu { path })?;
        let name = line.get(name_idx).unwrap_or("").trim().to_string();
        let url = line.get(uri_idx).unwrap_or("").trim().to_string();
        if name.is_empty() {
            continue;
        }
        res.push(MpProfile { name, url });
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn profiles_csv_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Name,Party,URI").unwrap();
        writeln!(file, "Alice Smith,Red,https://example.org/alice").unwrap();
        writeln!(file, "Bob Jones,Blue,https://example.org/bob").unwrap();
        writeln!(file, ",,").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let profiles = read_profiles_csv(&path).unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].name, "Alice Smith");
        assert_eq!(profiles[1].url, "https://example.org/bob");
    }

    #[test]
    fn profiles_csv_missing_uri_column() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Name,Party").unwrap();
        writeln!(file, "Alice Smith,Red").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let err = read_profiles_csv(&path).unwrap_err();
        assert!(matches!(err, DataError::MissingCsvColumn { .. }));
    }

    #[test]
    fn numeric_cells_accept_floats_ints_and_strings() {
        let p = "wb.xlsx";
        assert_eq!(
            cell_f64(&calamine::DataType::Float(0.42), p, 2, COL_SHARE).unwrap(),
            0.42
        );
        assert_eq!(
            cell_f64(&calamine::DataType::String("0.42".to_string()), p, 2, COL_SHARE).unwrap(),
            0.42
        );
        assert_eq!(
            cell_u64(&calamine::DataType::Int(45_000), p, 2, COL_TURNOUT).unwrap(),
            45_000
        );
        assert_eq!(
            cell_u64(&calamine::DataType::Float(45_000.0), p, 2, COL_TURNOUT).unwrap(),
            45_000
        );
        assert!(matches!(
            cell_u64(&calamine::DataType::Empty, p, 2, COL_TURNOUT),
            Err(DataError::BadCell { row: 2, .. })
        ));
    }

    #[test]
    fn header_lookup_reports_the_missing_column() {
        let header = vec![
            calamine::DataType::String(COL_CONSTITUENCY.to_string()),
            calamine::DataType::String(COL_CANDIDATE.to_string()),
        ];
        assert_eq!(column_index(&header, COL_CANDIDATE, "wb.xlsx").unwrap(), 1);
        let err = column_index(&header, COL_SHARE, "wb.xlsx").unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { column, .. } if column == COL_SHARE));
    }

    #[test]
    fn status_labels_map_to_the_two_statuses() {
        assert_eq!(
            CandidateStatus::from_label("Title Holder"),
            CandidateStatus::TitleHolder
        );
        assert_eq!(
            CandidateStatus::from_label("Challenger"),
            CandidateStatus::Challenger
        );
        assert_eq!(CandidateStatus::from_label(""), CandidateStatus::Challenger);
    }
}
