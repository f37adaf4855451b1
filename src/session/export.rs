//! Export record format and file naming.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

use super::types::Judgment;

pub const EXPORT_HEADER: &str = "title_idx,winner,loser";

/// Result of a successful export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReceipt {
    pub filename: String,
    /// Number of judgments in the uploaded file.
    pub judgments: usize,
    /// Where the sink put the file (path or URL).
    pub location: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportFormatError {
    #[error("missing header row")]
    MissingHeader,
    #[error("unexpected header: {0}")]
    BadHeader(String),
    #[error("line {line}: {message}")]
    BadRow { line: usize, message: String },
}

/// Serialize judgments as CSV: header row, one row per judgment, in order.
pub fn encode_judgments(judgments: &[Judgment]) -> String {
    let mut out = String::with_capacity(EXPORT_HEADER.len() + 1 + judgments.len() * 8);
    out.push_str(EXPORT_HEADER);
    out.push('\n');
    for j in judgments {
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{},{},{}", j.item_id, j.winner, j.loser);
    }
    out
}

/// Parse an exported CSV back into judgments.
pub fn parse_judgments(raw: &str) -> Result<Vec<Judgment>, ExportFormatError> {
    let mut lines = raw.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());
    let (_, header) = lines.next().ok_or(ExportFormatError::MissingHeader)?;
    if header.trim() != EXPORT_HEADER {
        return Err(ExportFormatError::BadHeader(header.to_string()));
    }

    lines
        .map(|(idx, line)| {
            let line_no = idx + 1;
            let bad = |message: String| ExportFormatError::BadRow {
                line: line_no,
                message,
            };
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            let [item, winner, loser] = fields.as_slice() else {
                return Err(bad(format!("expected 3 fields, found {}", fields.len())));
            };
            let parse = |name: &str, v: &str| {
                v.parse::<usize>()
                    .map_err(|e| bad(format!("invalid {name} '{v}': {e}")))
            };
            let judgment = Judgment {
                item_id: parse("title_idx", *item)?,
                winner: parse("winner", *winner)?,
                loser: parse("loser", *loser)?,
            };
            if judgment.winner == judgment.loser {
                return Err(bad("winner and loser are the same slot".to_string()));
            }
            Ok(judgment)
        })
        .collect()
}

/// `YYYY-MM-DD_HH-MM-SS_NNNN.csv` with a random four-digit suffix.
pub fn export_filename(now: DateTime<Utc>, rng: &mut impl Rng) -> String {
    let suffix: u16 = rng.gen_range(1000..=9999);
    format!("{}_{suffix}.csv", now.format("%Y-%m-%d_%H-%M-%S"))
}
