use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Plain-table extensions accepted by discovery, before optional `.gz`.
const TABLE_EXTENSIONS: &[&str] = &[
    ".tsv", ".csv", ".txt", ".tsv.gz", ".csv.gz", ".txt.gz", ".bgz", ".bgzip",
];

/// Upstream bundle marker: the per-chromosome VCF tars in the bulk download
/// are named like `FSResult_chr7.vcf.tar.gz`.
const ARCHIVE_SUFFIX: &str = ".vcf.tar.gz";
const ARCHIVE_MARKER: &str = "FSResult";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to scan data directory {path}: {source}")]
    Walk {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Everything discovery found under the data root, indexed by chromosome.
#[derive(Debug, Default)]
pub struct SourceCatalog {
    files: Vec<PathBuf>,
    archives: Vec<PathBuf>,

    /// chrom_norm -> indices into `files`/`archives` for dedicated sources.
    files_by_chrom: HashMap<String, Vec<usize>>,
    archives_by_chrom: HashMap<String, Vec<usize>>,

    /// Sources whose filename carries no chromosome token.
    global_files: Vec<usize>,
    global_archives: Vec<usize>,
}

impl SourceCatalog {
    /// Walk the data root recursively and classify every candidate.
    ///
    /// A missing root is treated as an empty one; whether that is fatal is
    /// the caller's `allow-empty` decision. Directory entries are visited in
    /// sorted order so that downstream "first retained hit" selection does
    /// not depend on filesystem order.
    pub fn discover(root: &Path) -> Result<Self, CatalogError> {
        let mut catalog = SourceCatalog::default();
        if !root.is_dir() {
            warn!(root = %root.display(), "data directory does not exist");
            return Ok(catalog);
        }
        let mut paths = Vec::new();
        walk(root, &mut paths)?;
        paths.sort();

        for path in paths {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if is_archive_candidate(name) {
                let idx = catalog.archives.len();
                catalog.archives.push(path.clone());
                match chrom_from_filename(name) {
                    Some(chrom) => catalog.archives_by_chrom.entry(chrom).or_default().push(idx),
                    None => catalog.global_archives.push(idx),
                }
            } else if is_table_candidate(name) {
                let idx = catalog.files.len();
                catalog.files.push(path.clone());
                match chrom_from_filename(name) {
                    Some(chrom) => catalog.files_by_chrom.entry(chrom).or_default().push(idx),
                    None => catalog.global_files.push(idx),
                }
            }
        }

        info!(
            root = %root.display(),
            files = catalog.files.len(),
            archives = catalog.archives.len(),
            "discovered annotation sources"
        );
        debug!(
            dedicated_files = catalog.files_by_chrom.len(),
            global_files = catalog.global_files.len(),
            dedicated_archives = catalog.archives_by_chrom.len(),
            global_archives = catalog.global_archives.len(),
            "source classification"
        );

        Ok(catalog)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.archives.is_empty()
    }

    pub fn has_archives(&self) -> bool {
        !self.archives.is_empty()
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn archives(&self) -> &[PathBuf] {
        &self.archives
    }

    /// Plain-file candidates for a chromosome: its dedicated files when any
    /// exist, otherwise the global files. The two sets are never merged.
    pub fn files_for(&self, chrom_norm: &str) -> Vec<&Path> {
        match self.files_by_chrom.get(chrom_norm) {
            Some(indices) if !indices.is_empty() => {
                indices.iter().map(|&i| self.files[i].as_path()).collect()
            }
            _ => self.global_files.iter().map(|&i| self.files[i].as_path()).collect(),
        }
    }

    /// Archive candidates for a chromosome: dedicated and global archives
    /// are merged and both scanned.
    pub fn archives_for(&self, chrom_norm: &str) -> Vec<&Path> {
        let mut out: Vec<&Path> = self
            .archives_by_chrom
            .get(chrom_norm)
            .map(|indices| indices.iter().map(|&i| self.archives[i].as_path()).collect())
            .unwrap_or_default();
        out.extend(self.global_archives.iter().map(|&i| self.archives[i].as_path()));
        out
    }

    /// Whether any archive at all covers the chromosome (dedicated or
    /// global); without coverage the archive path reports
    /// `not_available_in_zip` rather than `no_match`.
    pub fn archive_covers(&self, chrom_norm: &str) -> bool {
        !self.global_archives.is_empty()
            || self
                .archives_by_chrom
                .get(chrom_norm)
                .is_some_and(|v| !v.is_empty())
    }

    /// Chromosome scope of a discovered source, for the inspection listing.
    pub fn scope_of(&self, path: &Path) -> Option<String> {
        path.file_name()
            .and_then(|n| n.to_str())
            .and_then(chrom_from_filename)
    }
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), CatalogError> {
    let entries = std::fs::read_dir(dir).map_err(|source| CatalogError::Walk {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| CatalogError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            walk(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

fn is_table_candidate(name: &str) -> bool {
    if name.ends_with(".tbi") || name.ends_with(".csi") {
        return false;
    }
    let lower = name.to_lowercase();
    TABLE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

fn is_archive_candidate(name: &str) -> bool {
    name.ends_with(ARCHIVE_SUFFIX) && name.contains(ARCHIVE_MARKER)
}

/// Extract an embedded chromosome token (`chr`-prefixed or bare; `1`-`22`,
/// `X`, `Y`, `M`/`MT`) from a filename, normalized to the canonical label.
/// Tokens must be delimited by non-alphanumerics or the string edges, so
/// `data_v2.tsv` stays global while `scores_chr2.tsv` is dedicated.
pub fn chrom_from_filename(name: &str) -> Option<String> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(?:^|[^a-z0-9])(chr)?(1[0-9]|2[0-2]|[1-9]|x|y|m|mt)(?:[^a-z0-9]|$)")
            .expect("chromosome token pattern")
    });

    let token = re.captures(name)?.get(2)?.as_str();
    if token.eq_ignore_ascii_case("mt") || token.eq_ignore_ascii_case("m") {
        Some("chrM".to_string())
    } else if token.eq_ignore_ascii_case("x") || token.eq_ignore_ascii_case("y") {
        Some(format!("chr{}", token.to_uppercase()))
    } else {
        let n: u8 = token.parse().ok()?;
        Some(format!("chr{n}"))
    }
}
