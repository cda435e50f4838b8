//! Index management for plain annotation tables.
//!
//! Lookups over large coordinate-sorted tables go much faster through a
//! positional index. This module never builds one itself: it defers to the
//! external `bgzip` and `tabix` tools when they are present, and reads the
//! resulting index either through the noodles bgzf/tabix stack or, failing
//! that, through the `tabix` binary. Every degradation is logged, never
//! fatal; callers fall back to a linear scan.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use bstr::BString;
use noodles::bgzf::{self as bgzf, VirtualPosition};
use noodles::core::{Position, Region};
use noodles::csi::{self as csi, BinningIndex};
use noodles::tabix;
use tracing::{debug, info, warn};

/// Availability of the external compression/indexing tools, probed once per
/// run. Per-file code consults this record instead of re-probing.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    pub bgzip: bool,
    pub tabix: bool,
}

impl Capabilities {
    pub fn probe() -> Self {
        let caps = Self {
            bgzip: tool_available("bgzip"),
            tabix: tool_available("tabix"),
        };
        info!(
            bgzip = caps.bgzip,
            tabix = caps.tabix,
            "probed external indexing tools"
        );
        caps
    }

    /// Both tools are needed to materialize a new index.
    pub fn can_build_index(&self) -> bool {
        self.bgzip && self.tabix
    }
}

fn tool_available(tool: &str) -> bool {
    Command::new(tool)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// True when a `.tbi` or `.csi` sidecar sits next to the source.
pub fn has_index(path: &Path) -> bool {
    sidecar(path, "tbi").exists() || sidecar(path, "csi").exists()
}

fn sidecar(path: &Path, ext: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".{ext}"));
    PathBuf::from(name)
}

/// Name of the compressed copy kept in the index cache directory: the source
/// basename with one trailing compression extension replaced by `.bgz`.
fn cache_basename(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = if name.ends_with(".gz") || name.ends_with(".bgz") || name.ends_with(".bgzip") {
        name.rsplit_once('.').map_or(name.clone(), |(s, _)| s.to_string())
    } else {
        name
    };
    format!("{stem}.bgz")
}

/// Produce (or reuse) a block-compressed, tabix-indexed copy of `path` in
/// `cache_dir`, using 0-based chromosome/position columns resolved for the
/// file. Returns `None` whenever any external step is unavailable or fails;
/// callers then scan the original file linearly.
pub fn ensure_indexed(
    path: &Path,
    chrom_col: usize,
    pos_col: usize,
    cache_dir: &Path,
    caps: &Capabilities,
) -> Option<PathBuf> {
    if !caps.can_build_index() {
        debug!(path = %path.display(), "bgzip/tabix unavailable, skipping index construction");
        return None;
    }
    if let Err(e) = std::fs::create_dir_all(cache_dir) {
        warn!(dir = %cache_dir.display(), error = %e, "cannot create index cache directory");
        return None;
    }

    let out_path = cache_dir.join(cache_basename(path));

    if !out_path.exists() {
        let out_file = match File::create(&out_path) {
            Ok(f) => f,
            Err(e) => {
                warn!(path = %out_path.display(), error = %e, "cannot create compressed copy");
                return None;
            }
        };
        let status = Command::new("bgzip")
            .arg("-c")
            .arg(path)
            .stdout(Stdio::from(out_file))
            .status();
        match status {
            Ok(status) if status.success() => {}
            _ => {
                warn!(path = %path.display(), "bgzip failed, falling back to linear scan");
                let _ = std::fs::remove_file(&out_path);
                return None;
            }
        }
    }

    if !has_index(&out_path) {
        // tabix speaks 1-based column numbers.
        let status = Command::new("tabix")
            .arg("-s")
            .arg((chrom_col + 1).to_string())
            .arg("-b")
            .arg((pos_col + 1).to_string())
            .arg("-e")
            .arg((pos_col + 1).to_string())
            .arg(&out_path)
            .status();
        match status {
            Ok(status) if status.success() => {}
            _ => {
                warn!(path = %out_path.display(), "tabix indexing failed, falling back to linear scan");
                return None;
            }
        }
    }

    debug!(path = %out_path.display(), "using compressed indexed copy");
    Some(out_path)
}

/// A bgzip-compressed source opened through its `.tbi` sidecar for random
/// access. Range reads return whole lines from the overlapping compressed
/// chunks; callers re-validate coordinates per line.
pub struct IndexedSource {
    decoder: bgzf::Reader<File>,
    index: csi::binning_index::Index<Vec<VirtualPosition>>,
    contigs: Vec<String>,
}

impl IndexedSource {
    pub fn open(src: &Path) -> Result<Self> {
        let index_src = sidecar(src, "tbi");
        let index = tabix::read(&index_src)
            .with_context(|| format!("couldn't open index: {}", index_src.display()))?;

        let header = index.header().context("missing tabix header")?;
        let contigs = header
            .reference_sequence_names()
            .into_iter()
            .map(|bs| String::from_utf8_lossy(bs).into_owned())
            .collect();

        let decoder = bgzf::reader::Builder.build_from_path(src)?;

        Ok(Self {
            decoder,
            index,
            contigs,
        })
    }

    /// Lines overlapping `chrom:pos-pos`, `#` lines skipped. A chromosome
    /// unknown to the index yields no lines.
    pub fn fetch(&mut self, chrom: &str, pos: u64) -> Result<Vec<String>> {
        let Some(contig_id) = self.contigs.iter().position(|c| c == chrom) else {
            return Ok(Vec::new());
        };
        let begin = Position::new(pos as usize).context("invalid position")?;
        let region = Region::new(BString::from(chrom), begin..=begin);
        let chunks = self.index.query(contig_id, region.interval())?;
        let query = csi::io::Query::new(&mut self.decoder, chunks);

        let mut lines = Vec::new();
        for line in BufReader::new(query).lines() {
            let line = line?;
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            lines.push(line);
        }
        Ok(lines)
    }
}

/// Range fetch through the external `tabix` binary. Any failure yields an
/// empty result; the caller has already committed to the indexed path.
pub fn fetch_region_cli(path: &Path, chrom: &str, pos: u64) -> Vec<String> {
    let region = format!("{chrom}:{pos}-{pos}");
    match Command::new("tabix").arg("-h").arg(path).arg(&region).output() {
        Ok(output) if output.status.success() => String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_string)
            .collect(),
        _ => {
            debug!(path = %path.display(), region, "tabix fetch returned nothing");
            Vec::new()
        }
    }
}
