use std::mem::take;

use crate::error::{ScrollyError, ScrollyResult};

/// Splits CSV text into rows of fields.
///
/// Handles quoted fields, doubled-quote escapes and CRLF line endings. Blank
/// lines are dropped. An unterminated quote runs to the end of input.
#[must_use]
pub fn parse_rows(text: &str, separator: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            c if c == separator && !in_quotes => row.push(take(&mut field)),
            '\r' | '\n' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(take(&mut field));
                push_row(&mut rows, take(&mut row));
            }
            _ => field.push(ch),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        push_row(&mut rows, row);
    }
    rows
}

fn push_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
    if !(row.len() == 1 && row[0].is_empty()) {
        rows.push(row);
    }
}

/// Header row plus data rows of equal width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn from_text(text: &str) -> ScrollyResult<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut rows = parse_rows(text, ',').into_iter();
        let headers: Vec<String> = rows
            .next()
            .ok_or_else(|| ScrollyError::InvalidData("csv input has no header row".to_owned()))?
            .into_iter()
            .map(|h| h.trim().to_owned())
            .collect();

        let rows: Vec<Vec<String>> = rows.collect();
        if let Some((line, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(ScrollyError::InvalidData(format!(
                "csv data row {} has {} fields, header has {}",
                line + 1,
                row.len(),
                headers.len()
            )));
        }
        Ok(Self { headers, rows })
    }

    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn column(&self, name: &str) -> ScrollyResult<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ScrollyError::InvalidData(format!("csv has no column `{name}`")))
    }
}
