// CSV import of code lists, CSV export of match results

use std::fs::File;
use std::io::Write;
use std::path::Path;

use codefinder_match::ResultTable;

use crate::error::IoError;

const DELIMITER_CANDIDATES: [u8; 4] = [b'\t', b';', b',', b'|'];
const SNIFF_LINES: usize = 10;

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load the primary list: first column of each row, trimmed.
///
/// Every row with at least one field yields a code, even when that code is
/// blank, so the result has one entry per row. Empty lines carry no fields
/// and are skipped. The list is comma-separated unless `delimiter` says
/// otherwise; codes may contain `;` or `|`, so it is never sniffed.
pub fn load_query_codes(path: &Path, delimiter: Option<u8>) -> Result<Vec<String>, IoError> {
    let content = read_file_as_utf8(path)?;
    let codes = parse_query_codes(&content, delimiter.unwrap_or(b','))
        .map_err(|e| IoError::parse(path, e))?;
    log::info!("first list loaded with {} codes from {}", codes.len(), path.display());
    Ok(codes)
}

/// Load the reference list: every row with at least one non-empty field,
/// fields kept verbatim. Field 0 is the reference code.
/// `delimiter = None` sniffs it from the content.
pub fn load_reference_rows(path: &Path, delimiter: Option<u8>) -> Result<Vec<Vec<String>>, IoError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(&content));
    let rows = parse_reference_rows(&content, delimiter).map_err(|e| IoError::parse(path, e))?;
    log::info!("second list loaded with {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

pub fn parse_query_codes(content: &str, delimiter: u8) -> Result<Vec<String>, csv::Error> {
    let mut codes = Vec::new();
    for record in reader(content, delimiter).records() {
        let record = record?;
        if let Some(code) = record.get(0) {
            codes.push(code.trim().to_string());
        }
    }
    Ok(codes)
}

pub fn parse_reference_rows(content: &str, delimiter: u8) -> Result<Vec<Vec<String>>, csv::Error> {
    let mut rows = Vec::new();
    for record in reader(content, delimiter).records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

fn reader(content: &str, delimiter: u8) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(strip_bom(content).as_bytes())
}

fn strip_bom(content: &str) -> &str {
    content.trim_start_matches('\u{feff}')
}

/// Guess the reference list's delimiter from its first non-blank lines.
///
/// A candidate scores the number of sampled lines that split into as many
/// fields as the first line, times that field count. A candidate that
/// leaves the first line whole never scores. Comma when nothing scores.
pub fn sniff_delimiter(content: &str) -> u8 {
    let sample: Vec<&str> = strip_bom(content)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();

    DELIMITER_CANDIDATES
        .iter()
        .filter_map(|&delim| {
            let widths: Vec<usize> = sample.iter().map(|line| field_count(line, delim)).collect();
            let first = *widths.first()?;
            if first <= 1 {
                return None;
            }
            let agreeing = widths.iter().filter(|&&w| w == first).count();
            Some((delim, agreeing * first))
        })
        .fold((b',', 0), |best, candidate| if candidate.1 > best.1 { candidate } else { best })
        .0
}

fn field_count(line: &str, delimiter: u8) -> usize {
    reader(line, delimiter)
        .records()
        .next()
        .and_then(Result::ok)
        .map_or(1, |record| record.len())
}

/// Read a list file as text. Content that is not valid UTF-8 is decoded as
/// Windows-1252, the usual encoding of spreadsheet CSV exports.
pub fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let bytes = std::fs::read(path).map_err(|e| IoError::read(path, e))?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            log::debug!("{} is not UTF-8, decoding as Windows-1252", path.display());
            let (text, _, _) = encoding_rs::WINDOWS_1252.decode(e.as_bytes());
            Ok(text.into_owned())
        }
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Write the result table as comma-separated rows, no header.
///
/// A file held open by another program surfaces as
/// [`IoError::PermissionDenied`] so the caller can ask the user to close it.
pub fn write_result_csv(path: &Path, table: &ResultTable) -> Result<(), IoError> {
    let file = File::create(path).map_err(|e| IoError::write(path, e))?;
    write_result(file, table).map_err(|e| match e {
        IoError::Write { message, .. } => IoError::Write {
            path: path.to_path_buf(),
            message,
        },
        other => other,
    })?;
    log::info!("wrote {} row(s) to {}", table.len(), path.display());
    Ok(())
}

/// Write the result table to any writer (stdout, buffer).
pub fn write_result<W: Write>(out: W, table: &ResultTable) -> Result<(), IoError> {
    // Mirror width policy can produce rows of different lengths
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(out);

    for record in table.records() {
        writer.write_record(record).map_err(IoError::from_csv_write)?;
    }

    writer
        .flush()
        .map_err(|e| IoError::from_csv_write(csv::Error::from(e)))?;
    Ok(())
}
