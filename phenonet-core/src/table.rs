//! Minimal RFC 4180 CSV reader.
//!
//! Tables are small (thousands of rows), so the whole input is read into
//! memory and split into a header plus string rows. Quoted fields may contain
//! commas, doubled quotes and line breaks. A leading UTF-8 BOM is ignored.

use std::collections::HashMap;
use std::path::Path;

use crate::error::LoadError;

/// A parsed CSV table with header lookup.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), i))
            .collect();
        Self {
            headers,
            index,
            rows,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, LoadError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut records = parse_records(text)?.into_iter();
        let Some(headers) = records.next() else {
            return Ok(Self::default());
        };
        let headers: Vec<String> = headers.into_iter().map(|h| h.trim().to_string()).collect();
        let width = headers.len();
        let rows = records
            .filter(|r| !(r.len() == 1 && r[0].is_empty()))
            .map(|mut r| {
                r.resize(width, String::new());
                r
            })
            .collect();
        Ok(Self::new(headers, rows))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn require(&self, name: &str) -> Result<usize, LoadError> {
        self.column(name)
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
    }

    /// Append another table's rows, matching columns by header name.
    /// Columns missing from `other` are filled with empty cells.
    pub fn extend(&mut self, other: &Table) {
        if self.headers.is_empty() {
            *self = other.clone();
            return;
        }
        let mapping: Vec<Option<usize>> = self.headers.iter().map(|h| other.column(h)).collect();
        for row in &other.rows {
            let mapped = mapping
                .iter()
                .map(|col| col.and_then(|c| row.get(c)).cloned().unwrap_or_default())
                .collect();
            self.rows.push(mapped);
        }
    }
}

fn parse_records(text: &str) -> Result<Vec<Vec<String>>, LoadError> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut quote_line = 0;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => {
                in_quotes = true;
                quote_line = line;
            }
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
                line += 1;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(LoadError::Syntax {
            line: quote_line,
            message: "unterminated quoted field".to_string(),
        });
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_rows() {
        let table = Table::parse("a,b,c\n1,2,3\n4,5,6\n").unwrap();
        assert_eq!(table.headers(), ["a", "b", "c"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1][2], "6");
        assert_eq!(table.column("b"), Some(1));
    }

    #[test]
    fn handles_quotes_crlf_and_bom() {
        let text = "\u{feff}id,label\r\n1,\"Diabetes, type 2\"\r\n2,\"say \"\"hi\"\"\"\r\n";
        let table = Table::parse(text).unwrap();
        assert_eq!(table.headers(), ["id", "label"]);
        assert_eq!(table.rows()[0][1], "Diabetes, type 2");
        assert_eq!(table.rows()[1][1], "say \"hi\"");
    }

    #[test]
    fn multiline_quoted_field() {
        let table = Table::parse("id,note\n1,\"line one\nline two\"\n").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0][1], "line one\nline two");
    }

    #[test]
    fn short_rows_are_padded_and_blank_lines_skipped() {
        let table = Table::parse("a,b,c\n1\n\n4,5,6").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0], ["1", "", ""]);
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        let err = Table::parse("a,b\n1,\"open\n").unwrap_err();
        assert!(matches!(err, LoadError::Syntax { line: 2, .. }));
    }

    #[test]
    fn missing_column_reported() {
        let table = Table::parse("a\n1\n").unwrap();
        let err = table.require("rsid").unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(ref c) if c == "rsid"));
    }

    #[test]
    fn extend_matches_by_header() {
        let mut first = Table::parse("a,b\n1,2\n").unwrap();
        let second = Table::parse("b,a\n3,4\n").unwrap();
        first.extend(&second);
        assert_eq!(first.rows()[1], ["4", "3"]);
    }

    #[test]
    fn empty_input_is_empty_table() {
        let table = Table::parse("").unwrap();
        assert!(table.is_empty());
        assert!(table.headers().is_empty());
    }
}
