//! Bulk loader for the comma-separated catalog format.
//!
//! One record per line: `title,author,genre_1,...,genre_k,borrow_count`.
//! The last field that parses as an integer is the borrow count (negative
//! values clamp to 0; a line with no integer field gets 0) and every field
//! between the author and that integer is a genre. Leading spaces are
//! stripped from each field. Bad lines are skipped and loading continues.

use crate::catalog::Catalog;
use crate::record::NewRecord;
use stacks_common::CatalogError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Outcome of loading a whole file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

/// Parse one line of the bulk-load format.
pub fn parse_line(line: &str) -> Result<NewRecord, CatalogError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let fields: Vec<&str> = line.split(',').map(|f| f.trim_start_matches(' ')).collect();

    let title = fields.first().copied().unwrap_or_default();
    let author = fields.get(1).copied().unwrap_or_default();
    if title.is_empty() || author.is_empty() {
        return Err(CatalogError::MalformedInput(format!(
            "line lacks title or author: {:?}",
            line
        )));
    }

    let rest = &fields[2..];
    let count_at = rest.iter().rposition(|f| f.trim().parse::<i64>().is_ok());
    let (genre_fields, borrow_count) = match count_at {
        Some(pos) => {
            let count = rest[pos].trim().parse::<i64>().unwrap_or(0).max(0) as u64;
            (&rest[..pos], count)
        }
        None => (rest, 0),
    };

    Ok(NewRecord {
        title: title.to_string(),
        author: author.to_string(),
        genres: genre_fields.iter().map(|g| g.to_string()).collect(),
        borrow_count,
    })
}

/// Load every line from `reader` into `catalog`.
///
/// Malformed lines and records rejected by the catalog's limits are counted
/// as skipped; only read failures abort the load.
pub fn load_reader<R: BufRead>(catalog: &mut Catalog, reader: R) -> Result<LoadReport, CatalogError> {
    let mut report = LoadReport::default();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let outcome = parse_line(&line).and_then(|new| catalog.add(new));
        match outcome {
            Ok(_) => report.loaded += 1,
            Err(e) => {
                tracing::warn!("skipping line {}: {}", line_num + 1, e);
                report.skipped += 1;
            }
        }
    }

    tracing::info!(
        "bulk load complete: {} loaded, {} skipped",
        report.loaded,
        report.skipped
    );
    Ok(report)
}

/// Load a bulk-load file from disk.
pub fn load_file(catalog: &mut Catalog, path: &Path) -> Result<LoadReport, CatalogError> {
    let file = File::open(path)?;
    load_reader(catalog, BufReader::new(file))
}
