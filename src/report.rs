//! Report writer: one delimited row per variant, or per retained hit.
//!
//! The schema is fixed (`CHROM,POS,ID,REF,ALT,matched_rows,match_note,
//! hit_file,raw_hit`); only the output delimiter is caller-selected. Fields
//! that contain the output delimiter (a tab-joined `raw_hit` in a TSV
//! report, say) are quoted by the writer and round-trip through any CSV
//! reader.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::core::variant::VariantSet;
use crate::matching::MatchResult;

/// Output flavor of the report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Tsv,
    Csv,
}

impl ReportFormat {
    fn delimiter(self) -> u8 {
        match self {
            ReportFormat::Tsv => b'\t',
            ReportFormat::Csv => b',',
        }
    }
}

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    #[serde(rename = "CHROM")]
    chrom: &'a str,
    #[serde(rename = "POS")]
    pos: u64,
    #[serde(rename = "ID")]
    id: &'a str,
    #[serde(rename = "REF")]
    ref_allele: &'a str,
    #[serde(rename = "ALT")]
    alt_allele: &'a str,
    matched_rows: usize,
    match_note: &'a str,
    hit_file: &'a str,
    raw_hit: &'a str,
}

/// Serialize the match results, in query order, to `path`.
pub fn write_report(
    path: &Path,
    format: ReportFormat,
    set: &VariantSet,
    results: &[MatchResult],
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(format.delimiter())
        .from_path(path)
        .with_context(|| format!("failed to create report: {}", path.display()))?;

    let mut rows = 0usize;
    for result in results {
        let v = &set.variants()[result.variant];
        let note = result.note();

        if result.retained.is_empty() {
            writer.serialize(ReportRow {
                chrom: &v.chrom,
                pos: v.pos,
                id: &v.id,
                ref_allele: &v.ref_allele,
                alt_allele: &v.alt_allele,
                matched_rows: result.matched_rows,
                match_note: &note,
                hit_file: "",
                raw_hit: "",
            })?;
            rows += 1;
        } else {
            for hit in &result.retained {
                writer.serialize(ReportRow {
                    chrom: &v.chrom,
                    pos: v.pos,
                    id: &v.id,
                    ref_allele: &v.ref_allele,
                    alt_allele: &v.alt_allele,
                    matched_rows: result.matched_rows,
                    match_note: &note,
                    hit_file: &hit.file,
                    raw_hit: &hit.raw,
                })?;
                rows += 1;
            }
        }
    }

    writer.flush()?;
    info!(rows, path = %path.display(), "wrote match report");
    Ok(())
}
