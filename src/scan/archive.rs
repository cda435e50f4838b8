//! Streaming scanner for tar-packaged per-chromosome VCF bundles.
//!
//! Members are read straight out of the compressed tar, never extracted to
//! disk. Rows are allele-filtered here (REF equality plus ALT membership in
//! the row's comma-separated ALT list), so the matcher only has to count and
//! classify. Hits are keyed by the variant's ordinal in the query sequence;
//! one bundle may legitimately yield several member-level hits for the same
//! variant.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::debug;

use crate::catalog::SourceCatalog;
use crate::core::chrom::normalize_chrom;
use crate::core::variant::VariantSet;
use crate::parsing::ParseError;

/// One allele-level hit from an archive member.
#[derive(Debug, Clone)]
pub struct ArchiveHit {
    /// The raw source row.
    pub line: String,
    /// Archive basename.
    pub archive: String,
    /// Member basename within the archive.
    pub member: String,
}

/// Hits keyed by variant ordinal.
pub type ArchiveHits = HashMap<usize, Vec<ArchiveHit>>;

/// Scan every archive covering every query chromosome.
pub fn scan_archives(catalog: &SourceCatalog, set: &VariantSet) -> Result<ArchiveHits, ParseError> {
    let mut hits = ArchiveHits::new();

    for chrom in set.chromosomes() {
        let archives = catalog.archives_for(chrom);
        if archives.is_empty() {
            continue;
        }

        // pos -> ordinals of the query variants at that position.
        let mut by_pos: HashMap<u64, Vec<usize>> = HashMap::new();
        for &i in set.indices_on(chrom) {
            by_pos.entry(set.variants()[i].pos).or_default().push(i);
        }

        for archive in archives {
            scan_one_archive(archive, chrom, &by_pos, set, &mut hits)?;
        }
    }

    debug!(variants_hit = hits.len(), "archive scan complete");
    Ok(hits)
}

fn scan_one_archive(
    path: &Path,
    chrom: &str,
    by_pos: &HashMap<u64, Vec<usize>>,
    set: &VariantSet,
    hits: &mut ArchiveHits,
) -> Result<(), ParseError> {
    let archive_name = basename(path);
    let mut archive = Archive::new(GzDecoder::new(File::open(path)?));

    for entry in archive.entries()? {
        let mut entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let member_path = entry.path()?.into_owned();
        let member_name = member_path.to_string_lossy().into_owned();
        let member = basename(&member_path);

        if member_name.ends_with(".vcf.gz") {
            let reader = BufReader::new(GzDecoder::new(&mut entry));
            scan_member(reader, chrom, by_pos, set, &archive_name, &member, hits)?;
        } else if member_name.ends_with(".vcf") {
            let reader = BufReader::new(&mut entry);
            scan_member(reader, chrom, by_pos, set, &archive_name, &member, hits)?;
        }
    }

    Ok(())
}

/// Read one member line by line. Bytes that are not valid UTF-8 are replaced
/// rather than failing the member.
fn scan_member<R: BufRead>(
    mut reader: R,
    chrom: &str,
    by_pos: &HashMap<u64, Vec<usize>>,
    set: &VariantSet,
    archive: &str,
    member: &str,
    hits: &mut ArchiveHits,
) -> Result<(), ParseError> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches('\n');
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 5 {
            continue;
        }
        let Ok(pos) = fields[1].parse::<u64>() else {
            continue;
        };
        let Some(ordinals) = by_pos.get(&pos) else {
            continue;
        };
        if normalize_chrom(fields[0]) != chrom {
            continue;
        }

        let row_ref = fields[3];
        let row_alts: Vec<&str> = fields[4].split(',').collect();
        for &ordinal in ordinals {
            let v = &set.variants()[ordinal];
            if row_ref == v.ref_allele && row_alts.contains(&v.alt_allele.as_str()) {
                hits.entry(ordinal).or_default().push(ArchiveHit {
                    line: line.to_string(),
                    archive: archive.to_string(),
                    member: member.to_string(),
                });
            }
        }
    }
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
