//! Candidate-row production from plain delimited annotation files.
//!
//! For each query chromosome the catalog supplies candidate files; every file
//! is sniffed, its columns resolved (caller override first), then read either
//! through a positional index or by a full linear scan. Surviving rows become
//! [`CandidateHit`]s keyed by `(chrom_norm, pos)` for the matcher.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::catalog::SourceCatalog;
use crate::core::chrom::normalize_chrom;
use crate::core::columns::ColumnMap;
use crate::core::types::Delimiter;
use crate::core::variant::VariantSet;
use crate::parsing::sniff::{resolve_columns, sniff_file};
use crate::parsing::{open_text, ParseError};
use crate::scan::index::{ensure_indexed, fetch_region_cli, has_index, Capabilities, IndexedSource};

/// One raw source row that survived position filtering, with everything
/// needed to interpret and reproduce it.
#[derive(Debug, Clone)]
pub struct CandidateHit {
    pub fields: Vec<String>,
    pub file: PathBuf,
    pub delimiter: Delimiter,
    pub columns: ColumnMap,
}

/// Candidate rows grouped by `(chrom_norm, pos)`.
pub type HitMap = HashMap<(String, u64), Vec<CandidateHit>>;

/// Caller knobs for the plain-file scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Build a compressed index for unindexed files when the external tools
    /// allow it.
    pub make_index: bool,
    /// Explicit column mapping; replaces inference wholesale.
    pub columns_override: Option<ColumnMap>,
    /// Where compressed indexed copies are cached.
    pub index_cache: PathBuf,
}

/// Scan every candidate file for every query chromosome.
pub fn collect_hits(
    catalog: &SourceCatalog,
    set: &VariantSet,
    options: &ScanOptions,
    caps: &Capabilities,
) -> Result<HitMap, ParseError> {
    let mut hits = HitMap::new();

    for chrom in set.chromosomes() {
        let files = catalog.files_for(chrom);
        if files.is_empty() {
            continue;
        }
        let Some(positions) = set.positions_on(chrom) else {
            continue;
        };

        for file in files {
            let sniffed = sniff_file(file)?;
            let columns = options
                .columns_override
                .clone()
                .unwrap_or_else(|| resolve_columns(&sniffed));
            let delimiter = sniffed.delimiter;

            let Some(pos_col) = columns.pos else {
                debug!(file = %file.display(), "no position column resolved, skipping file");
                continue;
            };

            let mut file_path = file.to_path_buf();
            if options.make_index {
                if let Some(indexed) = ensure_indexed(
                    file,
                    columns.chrom.unwrap_or(0),
                    pos_col,
                    &options.index_cache,
                    caps,
                ) {
                    file_path = indexed;
                }
            }

            if has_index(&file_path) {
                scan_indexed(
                    &file_path, chrom, positions, delimiter, &columns, caps, &mut hits,
                );
            } else {
                scan_linear(file, chrom, positions, delimiter, &columns, &mut hits)?;
            }
        }
    }

    debug!(positions = hits.len(), "plain-file scan complete");
    Ok(hits)
}

/// Range-fetch each query position through the index. An indexed file is
/// never additionally linear-scanned, even when individual fetches fail.
fn scan_indexed(
    path: &Path,
    chrom: &str,
    positions: &std::collections::BTreeSet<u64>,
    delimiter: Delimiter,
    columns: &ColumnMap,
    caps: &Capabilities,
    hits: &mut HitMap,
) {
    let mut reader = match IndexedSource::open(path) {
        Ok(reader) => Some(reader),
        Err(e) => {
            debug!(file = %path.display(), error = %e, "library index reader unavailable");
            None
        }
    };

    for &pos in positions {
        let lines = match reader.as_mut() {
            Some(src) => match src.fetch(chrom, pos) {
                Ok(lines) => lines,
                Err(e) => {
                    warn!(file = %path.display(), pos, error = %e, "index fetch failed");
                    cli_fallback(path, chrom, pos, caps)
                }
            },
            None => cli_fallback(path, chrom, pos, caps),
        };

        for line in lines {
            let fields = delimiter.split(&line);
            let Some(row_pos) = field_pos(&fields, columns) else {
                continue;
            };
            if row_pos != pos {
                continue;
            }
            if !row_matches_chrom(&fields, columns, chrom) {
                continue;
            }
            push_hit(hits, chrom, pos, fields, path, delimiter, columns);
        }
    }
}

fn cli_fallback(path: &Path, chrom: &str, pos: u64, caps: &Capabilities) -> Vec<String> {
    if caps.tabix {
        fetch_region_cli(path, chrom, pos)
    } else {
        Vec::new()
    }
}

/// Full scan: chromosome equality first (assumed when the column is
/// unresolved), then position membership. Malformed rows skipped silently.
fn scan_linear(
    path: &Path,
    chrom: &str,
    positions: &std::collections::BTreeSet<u64>,
    delimiter: Delimiter,
    columns: &ColumnMap,
    hits: &mut HitMap,
) -> Result<(), ParseError> {
    use std::io::BufRead;

    let reader = open_text(path)?;
    for line in reader.lines() {
        let line = line?;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields = delimiter.split(&line);
        if !row_matches_chrom(&fields, columns, chrom) {
            continue;
        }
        let Some(row_pos) = field_pos(&fields, columns) else {
            continue;
        };
        if !positions.contains(&row_pos) {
            continue;
        }
        push_hit(hits, chrom, row_pos, fields, path, delimiter, columns);
    }
    Ok(())
}

fn field_pos(fields: &[String], columns: &ColumnMap) -> Option<u64> {
    let pos_col = columns.pos?;
    fields.get(pos_col)?.parse().ok()
}

fn row_matches_chrom(fields: &[String], columns: &ColumnMap, chrom: &str) -> bool {
    match columns.chrom {
        // No chromosome column: the row belongs to the file's declared
        // chromosome.
        None => true,
        Some(col) => fields
            .get(col)
            .is_some_and(|v| normalize_chrom(v) == chrom),
    }
}

fn push_hit(
    hits: &mut HitMap,
    chrom: &str,
    pos: u64,
    fields: Vec<String>,
    file: &Path,
    delimiter: Delimiter,
    columns: &ColumnMap,
) {
    hits.entry((chrom.to_string(), pos)).or_default().push(CandidateHit {
        fields,
        file: file.to_path_buf(),
        delimiter,
        columns: columns.clone(),
    });
}
