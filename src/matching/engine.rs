use std::path::Path;

use crate::catalog::SourceCatalog;
use crate::core::types::MatchTier;
use crate::core::variant::VariantSet;
use crate::scan::archive::ArchiveHits;
use crate::scan::plain::{CandidateHit, HitMap};

/// One source row kept for the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetainedHit {
    /// Basename of the contributing source (archive path:
    /// `archive:member`).
    pub file: String,
    /// The source row reconstructed with its native delimiter.
    pub raw: String,
}

/// Final classification of one query variant.
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// Ordinal of the variant in the query sequence.
    pub variant: usize,
    /// Row count at the position-match stage (0 when nothing matched).
    pub matched_rows: usize,
    pub tier: MatchTier,
    /// Alternatives were discarded; the tier label gains `:multi`.
    pub multi: bool,
    /// Zero or more rows to emit; empty means a single empty-handed row.
    pub retained: Vec<RetainedHit>,
}

impl MatchResult {
    fn empty(variant: usize, tier: MatchTier) -> Self {
        Self {
            variant,
            matched_rows: 0,
            tier,
            multi: false,
            retained: Vec::new(),
        }
    }

    pub fn note(&self) -> String {
        self.tier.note(self.multi)
    }
}

/// Classify every variant against the plain-file candidate rows.
///
/// Stages narrow strictly: alleles only filter the positional rows, the
/// identifier only filters the allele survivors, and a stage that matches
/// nothing leaves the previous stage's rows (and tier) in place.
pub fn match_plain(set: &VariantSet, hits: &HitMap, keep_multi: bool) -> Vec<MatchResult> {
    set.variants()
        .iter()
        .enumerate()
        .map(|(ordinal, v)| {
            let key = (v.chrom_norm.clone(), v.pos);
            let Some(candidates) = hits.get(&key).filter(|c| !c.is_empty()) else {
                return MatchResult::empty(ordinal, MatchTier::NoMatch);
            };

            let matched_rows = candidates.len();
            let mut tier = MatchTier::PosMatch;
            let mut working: Vec<&CandidateHit> = candidates.iter().collect();

            let by_alleles: Vec<&CandidateHit> = working
                .iter()
                .copied()
                .filter(|hit| alleles_match(hit, &v.ref_allele, &v.alt_allele))
                .collect();
            if !by_alleles.is_empty() {
                working = by_alleles;
                tier = MatchTier::RefAltMatch;
            }

            if v.has_id() {
                let by_id: Vec<&CandidateHit> = working
                    .iter()
                    .copied()
                    .filter(|hit| id_matches(hit, &v.id))
                    .collect();
                if !by_id.is_empty() {
                    working = by_id;
                    tier = MatchTier::IdMatch;
                }
            }

            let (multi, selected) = if keep_multi {
                (false, working)
            } else {
                (matched_rows > 1, working[..1].to_vec())
            };

            MatchResult {
                variant: ordinal,
                matched_rows,
                tier,
                multi,
                retained: selected.into_iter().map(retain).collect(),
            }
        })
        .collect()
}

fn alleles_match(hit: &CandidateHit, ref_allele: &str, alt_allele: &str) -> bool {
    let (Some(ref_col), Some(alt_col)) = (hit.columns.ref_allele, hit.columns.alt_allele) else {
        return false;
    };
    let (Some(row_ref), Some(row_alt)) = (hit.fields.get(ref_col), hit.fields.get(alt_col)) else {
        return false;
    };
    row_ref.eq_ignore_ascii_case(ref_allele) && row_alt.eq_ignore_ascii_case(alt_allele)
}

fn id_matches(hit: &CandidateHit, id: &str) -> bool {
    hit.columns
        .id
        .and_then(|col| hit.fields.get(col))
        .is_some_and(|row_id| row_id == id)
}

fn retain(hit: &CandidateHit) -> RetainedHit {
    RetainedHit {
        file: basename(&hit.file),
        raw: hit.fields.join(hit.delimiter.joiner()),
    }
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Classify every variant against the archive hits.
///
/// Archive rows were allele-filtered during scanning, so the tiers collapse:
/// no coverage at all, coverage without a hit, or a hit (suffixed `:multi`
/// when several member rows tied). With `keep_multi` the tied rows fold into
/// one `"; "`-joined report row.
pub fn match_archives(
    set: &VariantSet,
    hits: &ArchiveHits,
    catalog: &SourceCatalog,
    keep_multi: bool,
) -> Vec<MatchResult> {
    set.variants()
        .iter()
        .enumerate()
        .map(|(ordinal, v)| {
            if !catalog.archive_covers(&v.chrom_norm) {
                return MatchResult::empty(ordinal, MatchTier::NotAvailableInZip);
            }
            let Some(rows) = hits.get(&ordinal).filter(|r| !r.is_empty()) else {
                return MatchResult::empty(ordinal, MatchTier::NoMatch);
            };

            let matched_rows = rows.len();
            let multi = matched_rows > 1;
            let retained = if keep_multi {
                let raw: Vec<&str> = rows.iter().map(|h| h.line.as_str()).collect();
                let files: Vec<String> = rows
                    .iter()
                    .map(|h| format!("{}:{}", h.archive, h.member))
                    .collect();
                vec![RetainedHit {
                    file: files.join("; "),
                    raw: raw.join("; "),
                }]
            } else {
                vec![RetainedHit {
                    file: format!("{}:{}", rows[0].archive, rows[0].member),
                    raw: rows[0].line.clone(),
                }]
            };

            MatchResult {
                variant: ordinal,
                matched_rows,
                tier: MatchTier::Hit,
                multi,
                retained,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::columns::ColumnMap;
    use crate::core::types::Delimiter;
    use crate::core::variant::Variant;
    use crate::scan::archive::ArchiveHit;
    use std::path::PathBuf;

    fn five_col_map() -> ColumnMap {
        ColumnMap {
            chrom: Some(0),
            pos: Some(1),
            id: Some(2),
            ref_allele: Some(3),
            alt_allele: Some(4),
            score: None,
        }
    }

    fn hit(fields: &[&str], columns: ColumnMap) -> CandidateHit {
        CandidateHit {
            fields: fields.iter().map(|s| s.to_string()).collect(),
            file: PathBuf::from("data/chr1_scores.tsv"),
            delimiter: Delimiter::Tab,
            columns,
        }
    }

    fn one_variant() -> VariantSet {
        VariantSet::new(vec![Variant::new("chr1", 100, "rs1", "A", "G")])
    }

    fn hits_at(set: &VariantSet, rows: Vec<CandidateHit>) -> HitMap {
        let v = &set.variants()[0];
        let mut map = HitMap::new();
        map.insert((v.chrom_norm.clone(), v.pos), rows);
        map
    }

    #[test]
    fn test_no_candidates_is_no_match() {
        let set = one_variant();
        let results = match_plain(&set, &HitMap::new(), false);
        assert_eq!(results[0].tier, MatchTier::NoMatch);
        assert_eq!(results[0].matched_rows, 0);
        assert!(results[0].retained.is_empty());
    }

    #[test]
    fn test_full_escalation_to_id_match() {
        let set = one_variant();
        let hits = hits_at(&set, vec![hit(&["chr1", "100", "rs1", "A", "G"], five_col_map())]);
        let results = match_plain(&set, &hits, false);

        let r = &results[0];
        assert_eq!(r.tier, MatchTier::IdMatch);
        assert_eq!(r.matched_rows, 1);
        assert!(!r.multi);
        assert_eq!(r.retained[0].raw, "chr1\t100\trs1\tA\tG");
        assert_eq!(r.retained[0].file, "chr1_scores.tsv");
    }

    #[test]
    fn test_failed_narrowing_keeps_pos_match() {
        // Wrong ALT and wrong ID: both stages filter to empty, so the
        // positional row stands.
        let set = one_variant();
        let hits = hits_at(&set, vec![hit(&["chr1", "100", "rs2", "A", "T"], five_col_map())]);
        let results = match_plain(&set, &hits, false);

        let r = &results[0];
        assert_eq!(r.tier, MatchTier::PosMatch);
        assert_eq!(r.matched_rows, 1);
        assert_eq!(r.retained[0].raw, "chr1\t100\trs2\tA\tT");
    }

    #[test]
    fn test_alleles_compare_case_insensitively() {
        let set = one_variant();
        let hits = hits_at(&set, vec![hit(&["chr1", "100", ".", "a", "g"], five_col_map())]);
        let results = match_plain(&set, &hits, false);
        assert_eq!(results[0].tier, MatchTier::RefAltMatch);
    }

    #[test]
    fn test_rows_without_allele_columns_cannot_reach_allele_tier() {
        let columns = ColumnMap {
            chrom: Some(0),
            pos: Some(1),
            ..ColumnMap::default()
        };
        let set = one_variant();
        let hits = hits_at(&set, vec![hit(&["chr1", "100", "rs1", "A", "G"], columns)]);
        let results = match_plain(&set, &hits, false);
        assert_eq!(results[0].tier, MatchTier::PosMatch);
    }

    #[test]
    fn test_multi_suffix_reflects_positional_count() {
        // Two positional rows, one allele survivor: the survivor is kept but
        // the discarded alternative is signalled.
        let set = one_variant();
        let hits = hits_at(
            &set,
            vec![
                hit(&["chr1", "100", "rs9", "A", "T"], five_col_map()),
                hit(&["chr1", "100", "rs1", "A", "G"], five_col_map()),
            ],
        );
        let results = match_plain(&set, &hits, false);

        let r = &results[0];
        assert_eq!(r.tier, MatchTier::IdMatch);
        assert_eq!(r.matched_rows, 2);
        assert!(r.multi);
        assert_eq!(r.note(), "id_match:multi");
        assert_eq!(r.retained.len(), 1);
        assert_eq!(r.retained[0].raw, "chr1\t100\trs1\tA\tG");
    }

    #[test]
    fn test_keep_multi_retains_every_survivor() {
        let set = one_variant();
        let hits = hits_at(
            &set,
            vec![
                hit(&["chr1", "100", "rs1", "A", "G"], five_col_map()),
                hit(&["chr1", "100", "rs1", "A", "G"], five_col_map()),
            ],
        );
        let results = match_plain(&set, &hits, true);

        let r = &results[0];
        assert_eq!(r.retained.len(), 2);
        assert!(!r.multi);
        assert_eq!(r.matched_rows, 2);
        assert_eq!(r.note(), "id_match");
    }

    #[test]
    fn test_tier_monotonicity() {
        // Narrower stages never retain more rows than the positional stage.
        let set = one_variant();
        let rows = vec![
            hit(&["chr1", "100", "rs1", "A", "G"], five_col_map()),
            hit(&["chr1", "100", "rs2", "A", "G"], five_col_map()),
            hit(&["chr1", "100", "rs3", "C", "T"], five_col_map()),
        ];
        let hits = hits_at(&set, rows);
        let results = match_plain(&set, &hits, true);

        let r = &results[0];
        assert_eq!(r.matched_rows, 3);
        assert!(r.retained.len() <= r.matched_rows);
        // id narrowed allele survivors {rs1, rs2} down to rs1.
        assert_eq!(r.tier, MatchTier::IdMatch);
        assert_eq!(r.retained.len(), 1);
    }

    #[test]
    fn test_placeholder_id_skips_id_stage() {
        let set = VariantSet::new(vec![Variant::new("chr1", 100, ".", "A", "G")]);
        let hits = hits_at(&set, vec![hit(&["chr1", "100", "rs1", "A", "G"], five_col_map())]);
        let results = match_plain(&set, &hits, false);
        assert_eq!(results[0].tier, MatchTier::RefAltMatch);
    }

    fn catalog_with_chr1_archive() -> (tempfile::TempDir, SourceCatalog) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("FSResult_chr1.vcf.tar.gz"), "").unwrap();
        let catalog = SourceCatalog::discover(dir.path()).unwrap();
        (dir, catalog)
    }

    fn archive_hit(line: &str, member: &str) -> ArchiveHit {
        ArchiveHit {
            line: line.to_string(),
            archive: "FSResult_chr1.vcf.tar.gz".to_string(),
            member: member.to_string(),
        }
    }

    #[test]
    fn test_archive_uncovered_chromosome() {
        let (_dir, catalog) = catalog_with_chr1_archive();
        let set = VariantSet::new(vec![Variant::new("chr2", 55, "rs5", "G", "A")]);
        let results = match_archives(&set, &ArchiveHits::new(), &catalog, false);
        assert_eq!(results[0].tier, MatchTier::NotAvailableInZip);
        assert_eq!(results[0].matched_rows, 0);
    }

    #[test]
    fn test_archive_covered_without_hit() {
        let (_dir, catalog) = catalog_with_chr1_archive();
        let set = one_variant();
        let results = match_archives(&set, &ArchiveHits::new(), &catalog, false);
        assert_eq!(results[0].tier, MatchTier::NoMatch);
    }

    #[test]
    fn test_archive_multi_hit_default_keeps_first() {
        let (_dir, catalog) = catalog_with_chr1_archive();
        let set = one_variant();
        let mut hits = ArchiveHits::new();
        hits.insert(
            0,
            vec![
                archive_hit("chr1\t100\trs1\tA\tG", "chr1_a.vcf"),
                archive_hit("chr1\t100\trs1\tA\tG,T", "chr1_b.vcf"),
            ],
        );
        let results = match_archives(&set, &hits, &catalog, false);

        let r = &results[0];
        assert_eq!(r.note(), "hit:multi");
        assert_eq!(r.matched_rows, 2);
        assert_eq!(r.retained.len(), 1);
        assert_eq!(r.retained[0].file, "FSResult_chr1.vcf.tar.gz:chr1_a.vcf");
    }

    #[test]
    fn test_archive_multi_hit_keep_multi_folds_into_one_row() {
        let (_dir, catalog) = catalog_with_chr1_archive();
        let set = one_variant();
        let mut hits = ArchiveHits::new();
        hits.insert(
            0,
            vec![
                archive_hit("chr1\t100\trs1\tA\tG", "chr1_a.vcf"),
                archive_hit("chr1\t100\trs1\tA\tG,T", "chr1_b.vcf"),
            ],
        );
        let results = match_archives(&set, &hits, &catalog, true);

        let r = &results[0];
        assert_eq!(r.note(), "hit:multi");
        assert_eq!(r.retained.len(), 1);
        assert_eq!(r.retained[0].raw, "chr1\t100\trs1\tA\tG; chr1\t100\trs1\tA\tG,T");
        assert!(r.retained[0].file.contains("chr1_a.vcf; "));
    }
}
