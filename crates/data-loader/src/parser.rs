//! Parser for the catalog CSV file.
//!
//! The file is comma-separated with a header row. Only two columns matter,
//! `Title` and `Genre`; they are located by name so column order and any
//! extra columns are irrelevant.
//!
//! Quoting follows RFC 4180: a field may be wrapped in double quotes, in
//! which case it can contain commas, newlines and `""` (an escaped quote).

use crate::error::{CatalogLoadError, Result};
use crate::types::MovieRecord;
use rayon::prelude::*;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

pub const TITLE_COLUMN: &str = "Title";
pub const GENRE_COLUMN: &str = "Genre";

/// Read the whole catalog file into a string.
///
/// Invalid UTF-8 is replaced rather than rejected; a mangled character in a
/// title is not worth refusing to start over.
pub fn read_catalog_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CatalogLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => CatalogLoadError::IoError(e),
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Parse catalog CSV content into movie records
pub fn parse_catalog(content: &str) -> Result<Vec<MovieRecord>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let rows = split_records(content)?;

    let mut rows = rows.into_iter();
    let (header_line, header) = rows.next().ok_or(CatalogLoadError::MissingColumn {
        column: TITLE_COLUMN,
    })?;
    let header = split_fields(&header, header_line)?;

    let title_idx = find_column(&header, TITLE_COLUMN)?;
    let genre_idx = find_column(&header, GENRE_COLUMN)?;

    // Rows are independent once they've been split, so field parsing
    // fans out across threads
    let rows: Vec<(usize, String)> = rows.collect();
    rows.par_iter()
        .map(|(line, text)| parse_row(text, *line, title_idx, genre_idx))
        .collect()
}

fn find_column(header: &[String], name: &'static str) -> Result<usize> {
    header
        .iter()
        .position(|h| h.trim() == name)
        .ok_or(CatalogLoadError::MissingColumn { column: name })
}

fn parse_row(text: &str, line: usize, title_idx: usize, genre_idx: usize) -> Result<MovieRecord> {
    let fields = split_fields(text, line)?;

    let needed = title_idx.max(genre_idx) + 1;
    if fields.len() < needed {
        return Err(CatalogLoadError::ParseError {
            line,
            reason: format!("expected at least {} fields, found {}", needed, fields.len()),
        });
    }

    let record = MovieRecord::new(&fields[title_idx], &fields[genre_idx]);
    if record.title.is_empty() {
        return Err(CatalogLoadError::ParseError {
            line,
            reason: "Missing title".to_string(),
        });
    }
    if record.genre.is_empty() {
        return Err(CatalogLoadError::ParseError {
            line,
            reason: "Missing genre".to_string(),
        });
    }

    Ok(record)
}

/// Split content into logical CSV records, tagged with their starting line.
///
/// A newline inside a quoted field does not end the record. Quotes follow
/// the same rules as `split_fields`: only a quote at the start of a field
/// opens a quoted section, so a stray `"` inside a bare title is literal.
/// Blank records are dropped.
fn split_records(content: &str) -> Result<Vec<(usize, String)>> {
    let mut records = Vec::new();
    let mut current = String::new();
    let mut chars = content.chars().peekable();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut line_no = 1;
    let mut record_start = 1;

    while let Some(ch) = chars.next() {
        if ch == '\n' {
            if in_quotes {
                current.push(ch);
            } else {
                push_record(&mut records, &mut current, record_start);
                record_start = line_no + 1;
                at_field_start = true;
            }
            line_no += 1;
            continue;
        }

        current.push(ch);
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    current.extend(chars.next());
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }

        match ch {
            '"' if at_field_start => {
                in_quotes = true;
                at_field_start = false;
            }
            ',' => at_field_start = true,
            _ => at_field_start = false,
        }
    }

    if in_quotes {
        return Err(CatalogLoadError::ParseError {
            line: record_start,
            reason: "Unterminated quoted field".to_string(),
        });
    }
    push_record(&mut records, &mut current, record_start);

    Ok(records)
}

fn push_record(records: &mut Vec<(usize, String)>, current: &mut String, line: usize) {
    let record = std::mem::take(current);
    let record = record.strip_suffix('\r').unwrap_or(&record);
    if !record.trim().is_empty() {
        records.push((line, record.to_string()));
    }
}

/// Split one CSV record into its fields, undoing quoting
fn split_fields(record: &str, line: usize) -> Result<Vec<String>> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = record.chars().peekable();
    let mut in_quotes = false;
    let mut at_field_start = true;

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(ch),
            }
            continue;
        }

        match ch {
            '"' if at_field_start => {
                in_quotes = true;
                at_field_start = false;
            }
            ',' => {
                fields.push(std::mem::take(&mut field));
                at_field_start = true;
            }
            _ => {
                field.push(ch);
                at_field_start = false;
            }
        }
    }

    if in_quotes {
        return Err(CatalogLoadError::ParseError {
            line,
            reason: "Unterminated quoted field".to_string(),
        });
    }
    fields.push(field);

    Ok(fields)
}
