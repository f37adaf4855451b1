//! Minimal tabular reader for catalog sources (CSV or JSON rows).

use std::collections::BTreeSet;

use serde_json::Value;

use super::CatalogError;

/// Header plus rows of optional cells. A `None` cell means the row had no
/// value for that column at all (only possible for JSON sources).
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Index of the column named `name` (case-insensitive).
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
    }

    /// Parse CSV text with a header row. Quoted fields may contain commas,
    /// newlines and doubled quotes. Blank lines are skipped.
    pub fn from_csv_str(raw: &str) -> Result<Self, CatalogError> {
        let mut records = split_records(raw)?.into_iter();
        let headers: Vec<String> = records
            .next()
            .ok_or_else(|| CatalogError::malformed("source has no header row"))?
            .into_iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (row_no, record) in records.enumerate() {
            if record.len() != headers.len() {
                return Err(CatalogError::malformed(format!(
                    "row {row_no}: expected {} fields, found {}",
                    headers.len(),
                    record.len()
                )));
            }
            rows.push(record.into_iter().map(Some).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Parse a JSON array of row objects. `null` cells read as empty strings;
    /// numbers and booleans are stringified.
    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| CatalogError::malformed(format!("invalid JSON: {e}")))?;
        let Value::Array(entries) = value else {
            return Err(CatalogError::malformed("JSON source must be an array of rows"));
        };

        let mut objects = Vec::with_capacity(entries.len());
        for (row_no, entry) in entries.into_iter().enumerate() {
            match entry {
                Value::Object(map) => objects.push(map),
                _ => {
                    return Err(CatalogError::malformed(format!(
                        "row {row_no}: expected a JSON object"
                    )))
                }
            }
        }

        let headers: Vec<String> = objects
            .iter()
            .flat_map(|obj| obj.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let rows = objects
            .iter()
            .map(|obj| {
                headers
                    .iter()
                    .map(|h| obj.get(h).map(cell_text))
                    .collect()
            })
            .collect();

        Ok(Self { headers, rows })
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn split_records(raw: &str) -> Result<Vec<Vec<String>>, CatalogError> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1usize;
    let mut quote_line = 0usize;
    let mut chars = raw.chars().peekable();

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
            '"' => {
                in_quotes = true;
                quote_line = line;
            }
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                line += 1;
                record.push(std::mem::take(&mut field));
                let blank = record.len() == 1 && record[0].is_empty();
                if blank {
                    record.clear();
                } else {
                    records.push(std::mem::take(&mut record));
                }
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(CatalogError::malformed(format!(
            "unterminated quoted field starting on line {quote_line}"
        )));
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
    fn csv_handles_quotes_and_embedded_separators() {
        let raw = "title,v0\r\n\"Mug, blue\",\"12 \"\"oz\"\"\nceramic\"\n\nPlate,Flat\n";
        let table = Table::from_csv_str(raw).unwrap();
        assert_eq!(table.headers, vec!["title", "v0"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][0].as_deref(), Some("Mug, blue"));
        assert_eq!(table.rows[0][1].as_deref(), Some("12 \"oz\"\nceramic"));
        assert_eq!(table.rows[1][1].as_deref(), Some("Flat"));
    }

    #[test]
    fn csv_without_trailing_newline_keeps_last_row() {
        let table = Table::from_csv_str("a,b\n1,2").unwrap();
        assert_eq!(table.rows, vec![vec![Some("1".into()), Some("2".into())]]);
    }

    #[test]
    fn csv_rejects_ragged_rows_and_open_quotes() {
        assert!(matches!(
            Table::from_csv_str("a,b\n1,2,3\n"),
            Err(CatalogError::MalformedSource(_))
        ));
        assert!(matches!(
            Table::from_csv_str("a,b\n\"1,2\n"),
            Err(CatalogError::MalformedSource(_))
        ));
        assert!(matches!(
            Table::from_csv_str(""),
            Err(CatalogError::MalformedSource(_))
        ));
    }

    #[test]
    fn json_rows_mark_missing_keys_as_none() {
        let table = Table::from_json_str(r#"[{"a": "x", "b": 3}, {"a": null}]"#).unwrap();
        let b = table.column("b").unwrap();
        let a = table.column("A").unwrap();
        assert_eq!(table.rows[0][b].as_deref(), Some("3"));
        assert_eq!(table.rows[1][a].as_deref(), Some(""));
        assert_eq!(table.rows[1][b], None);
    }
}
