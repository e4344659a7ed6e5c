use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use thiserror::Error;

use crate::model::ExpandedRow;

/// Column order of the CSV intermediate file.
pub const CSV_HEADER: [&str; 10] = [
    "prefix",
    "vrf",
    "tenant",
    "site",
    "vlan_group",
    "vlan",
    "status",
    "role",
    "is_pool",
    "description",
];

/// Errors from reading or writing the CSV intermediate file.
#[derive(Debug, Error)]
pub enum DataFileError {
    #[error("expected a CSV inventory at {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to write data file {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("{path}:{line}: {detail}")]
    Malformed {
        path: String,
        line: usize,
        detail: String,
    },
}

/// Write rows in the unix CSV dialect: every field quoted, quotes
/// doubled, `\n` terminators. `append` skips the header so follow-up
/// batches land in the same file.
pub fn write_rows(path: &Path, rows: &[ExpandedRow], append: bool) -> Result<(), DataFileError> {
    let rendered = render_rows(rows, !append);
    let mut file = OpenOptions::new()
        .create(true)
        .append(append)
        .write(true)
        .truncate(!append)
        .open(path)
        .map_err(|source| write_err(path, source))?;
    file.write_all(rendered.as_bytes())
        .map_err(|source| write_err(path, source))?;
    Ok(())
}

/// Render rows as CSV text.
pub fn render_rows(rows: &[ExpandedRow], with_header: bool) -> String {
    let mut out = String::new();
    if with_header {
        out.push_str(&render_record(CSV_HEADER.iter()));
    }
    for row in rows {
        let vlan = row.vlan.to_string();
        let prefix = row.prefix.to_string();
        let fields = [
            prefix.as_str(),
            row.vrf.as_str(),
            row.tenant.as_str(),
            row.site.as_str(),
            row.vlan_group.as_str(),
            vlan.as_str(),
            row.status.as_str(),
            row.role.as_str(),
            row.is_pool.as_str(),
            row.description.as_str(),
        ];
        out.push_str(&render_record(fields.iter()));
    }
    out
}

/// Read the whole CSV intermediate file back into rows.
pub fn read_rows(path: &Path) -> Result<Vec<ExpandedRow>, DataFileError> {
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| DataFileError::Read {
        path: display.clone(),
        source,
    })?;
    parse_rows(&raw, &display)
}

/// Parse CSV text; `path` is only used in error messages.
pub fn parse_rows(raw: &str, path: &str) -> Result<Vec<ExpandedRow>, DataFileError> {
    let mut lines = raw.lines().enumerate();
    let (_, header_line) = lines
        .next()
        .ok_or_else(|| malformed(path, 1, "empty file"))?;
    let header = split_record(header_line, path, 1)?;

    let mut columns = [0usize; 10];
    for (slot, name) in columns.iter_mut().zip(CSV_HEADER.iter()) {
        *slot = header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| malformed(path, 1, &format!("missing column '{name}'")))?;
    }

    let mut rows = Vec::new();
    for (index, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = index + 1;
        let fields = split_record(line, path, line_no)?;
        let field = |slot: usize| -> Result<&str, DataFileError> {
            fields
                .get(columns[slot])
                .map(String::as_str)
                .ok_or_else(|| malformed(path, line_no, "record has too few fields"))
        };

        let prefix = field(0)?
            .parse()
            .map_err(|e| malformed(path, line_no, &format!("bad prefix: {e}")))?;
        let vlan = field(5)?
            .parse()
            .map_err(|_| malformed(path, line_no, &format!("bad vlan '{}'", fields[columns[5]])))?;

        rows.push(ExpandedRow {
            prefix,
            vrf: field(1)?.to_string(),
            tenant: field(2)?.to_string(),
            site: field(3)?.to_string(),
            vlan_group: field(4)?.to_string(),
            vlan,
            status: field(6)?.to_string(),
            role: field(7)?.to_string(),
            is_pool: field(8)?.to_string(),
            description: field(9)?.to_string(),
        });
    }
    Ok(rows)
}

fn render_record<'a>(fields: impl Iterator<Item = &'a &'a str>) -> String {
    let quoted: Vec<String> = fields
        .map(|field| format!("\"{}\"", field.replace('"', "\"\"")))
        .collect();
    let mut line = quoted.join(",");
    line.push('\n');
    line
}

/// Split one CSV record, accepting both quoted and bare fields.
fn split_record(line: &str, path: &str, line_no: usize) -> Result<Vec<String>, DataFileError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        current.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => current.push(c),
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => {
                    fields.push(std::mem::take(&mut current));
                }
                _ => current.push(c),
            }
        }
    }
    if in_quotes {
        return Err(malformed(path, line_no, "unterminated quoted field"));
    }
    fields.push(current);
    Ok(fields)
}

fn write_err(path: &Path, source: std::io::Error) -> DataFileError {
    DataFileError::Write {
        path: path.display().to_string(),
        source,
    }
}

fn malformed(path: &str, line: usize, detail: &str) -> DataFileError {
    DataFileError::Malformed {
        path: path.to_string(),
        line,
        detail: detail.to_string(),
    }
}
