//! Flat delimited table files.
//!
//! All on-disk state (credential file, token cache, device snapshots) shares
//! one format: comma-delimited rows, one per line, optional header row.
//! Fields containing the delimiter, a quote, or a newline are double-quoted
//! (a quoted field may span lines); embedded quotes are doubled.

use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Serialize rows to `path`, comma-joined, one row per line.
pub fn write_rows(rows: &[Vec<String>], path: &Path) -> Result<()> {
    let mut out = String::new();
    for row in rows {
        let line: Vec<String> = row.iter().map(|f| quote_field(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    fs::write(path, out).with_context(|| format!("Failed to write table file {:?}", path))?;
    tracing::debug!("Wrote {} rows to {:?}", rows.len(), path);
    Ok(())
}

/// Parse a table file back into raw string rows.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read table file {:?}", path))?;
    parse_rows(&content).with_context(|| format!("Malformed table file {:?}", path))
}

/// Parse a table file, consuming the first row as column names and keying the
/// remaining rows by them positionally.
pub fn read_records(path: &Path) -> Result<Vec<HashMap<String, String>>> {
    let rows = read_rows(path)?;
    let mut iter = rows.into_iter();
    let header = match iter.next() {
        Some(h) => h,
        None => return Ok(Vec::new()),
    };

    let mut records = Vec::new();
    for row in iter {
        let mut record = HashMap::new();
        for (column, field) in header.iter().zip(row.into_iter()) {
            record.insert(column.clone(), field);
        }
        records.push(record);
    }
    Ok(records)
}

fn quote_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Parse the whole file content; a quoted field may span lines, so rows
/// are delimited by unquoted newlines only.
fn parse_rows(content: &str) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    // Whether the field being built opened with a quote (an empty quoted
    // field is still a field)
    let mut quoted = false;
    let mut line = 1usize;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                // Doubled quote is an escaped quote, otherwise the field ends
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.is_empty() && !quoted => {
                in_quotes = true;
                quoted = true;
            }
            '"' => bail!("unexpected quote inside unquoted field at line {}", line),
            ',' if !in_quotes => {
                row.push(std::mem::take(&mut current));
                quoted = false;
            }
            '\r' if !in_quotes && chars.peek() == Some(&'\n') => {}
            '\n' if !in_quotes => {
                line += 1;
                // Blank lines between rows carry no fields
                if !row.is_empty() || !current.is_empty() || quoted {
                    row.push(std::mem::take(&mut current));
                    rows.push(std::mem::take(&mut row));
                }
                quoted = false;
            }
            c => {
                if c == '\n' {
                    line += 1;
                }
                current.push(c);
            }
        }
    }
    if in_quotes {
        bail!("unterminated quoted field at line {}", line);
    }
    if !row.is_empty() || !current.is_empty() || quoted {
        row.push(current);
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("devwatch-table-{}-{}", std::process::id(), name))
    }

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_round_trip() {
        let rows = vec![
            row(&["hostname", "id", "upTime"]),
            row(&["sw-01", "a1", "0day,5 hrs"]),
            row(&["sw-02", "b2", "133 days, 14:32:45.300"]),
        ];
        let path = temp_path("round-trip.csv");
        write_rows(&rows, &path).unwrap();
        let back = read_rows(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn test_read_records_keyed_by_header() {
        let rows = vec![
            row(&["name", "value", "date"]),
            row(&["token", "abc123", "202608271200"]),
        ];
        let path = temp_path("records.csv");
        write_rows(&rows, &path).unwrap();
        let records = read_records(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name"], "token");
        assert_eq!(records[0]["value"], "abc123");
        assert_eq!(records[0]["date"], "202608271200");
    }

    #[test]
    fn test_read_records_empty_file() {
        let path = temp_path("empty.csv");
        std::fs::write(&path, "").unwrap();
        let records = read_records(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_round_trip_with_embedded_newline() {
        let rows = vec![row(&["sw-01", "bldg-1\nfloor-2", "ACCESS"])];
        let path = temp_path("newline.csv");
        write_rows(&rows, &path).unwrap();
        let back = read_rows(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn test_quoted_field_with_embedded_quote() {
        assert_eq!(
            parse_rows("a,\"b \"\"x\"\" c\",d\n").unwrap(),
            vec![row(&["a", "b \"x\" c", "d"])]
        );
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        assert_eq!(
            parse_rows("a,b\n\nc,d\n").unwrap(),
            vec![row(&["a", "b"]), row(&["c", "d"])]
        );
    }

    #[test]
    fn test_unterminated_quote_is_an_error() {
        assert!(parse_rows("a,\"b").is_err());
    }
}
