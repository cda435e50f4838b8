use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Args;
use tracing::warn;

use crate::catalog::SourceCatalog;
use crate::core::columns::ColumnMap;
use crate::matching::{match_archives, match_plain};
use crate::parsing::variants::read_variants;
use crate::report::{write_report, ReportFormat};
use crate::scan::archive::scan_archives;
use crate::scan::index::Capabilities;
use crate::scan::plain::{collect_hits, ScanOptions};

#[derive(Args)]
pub struct LookupArgs {
    /// Query variant list: tab-delimited CHROM POS ID REF ALT columns,
    /// '#' comment lines ignored, optionally gzip-compressed
    #[arg(long, required = true)]
    pub vcf: PathBuf,

    /// Directory holding the unpacked bulk download
    #[arg(long = "figshare-dir", required = true)]
    pub figshare_dir: PathBuf,

    /// Output path (default: <vcf>.logo_figshare.tsv)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value = "tsv")]
    pub format: ReportFormat,

    /// Bgzip-compress and tabix-index unindexed tables before querying
    /// (writes to <figshare-dir>/indexed; needs bgzip and tabix on PATH)
    #[arg(long)]
    pub make_index: bool,

    /// Explicit column mapping replacing inference, e.g.
    /// chrom=1,pos=2,id=3,ref=4,alt=5,score=6-56 (or score=*)
    #[arg(long)]
    pub cols: Option<String>,

    /// Emit every tied row instead of only the first
    #[arg(long)]
    pub keep_multi: bool,

    /// Proceed with an all-no_match report when the data directory is empty
    #[arg(long)]
    pub allow_empty: bool,
}

/// Execute the lookup pipeline.
///
/// # Errors
///
/// Returns an error when the query list is empty, when the data directory
/// holds no sources and `--allow-empty` was not given, or on I/O failure.
pub fn run(args: LookupArgs, verbose: bool) -> anyhow::Result<()> {
    let out_path = args
        .out
        .clone()
        .unwrap_or_else(|| default_out_path(&args.vcf));

    let columns_override = args
        .cols
        .as_deref()
        .map(ColumnMap::parse_override)
        .transpose()
        .context("invalid --cols mapping")?;

    let set = read_variants(&args.vcf)
        .with_context(|| format!("failed to read variants from {}", args.vcf.display()))?;
    if set.is_empty() {
        bail!("no variants found in {}", args.vcf.display());
    }
    if verbose {
        eprintln!(
            "Parsed {} variants across {} chromosomes",
            set.len(),
            set.chromosomes().len()
        );
    }

    let catalog = SourceCatalog::discover(&args.figshare_dir)?;
    if catalog.is_empty() {
        if !args.allow_empty {
            bail!(
                "no annotation files found under {} (pass --allow-empty to emit an all-no_match report)",
                args.figshare_dir.display()
            );
        }
        warn!(
            dir = %args.figshare_dir.display(),
            "no annotation sources found, proceeding with empty lookups"
        );
    }
    if verbose {
        eprintln!(
            "Discovered {} plain files and {} archives",
            catalog.files().len(),
            catalog.archives().len()
        );
    }

    // Archives take precedence: when the bulk download ships per-chromosome
    // VCF bundles, plain tables are not consulted at all.
    let results = if catalog.has_archives() {
        let hits = scan_archives(&catalog, &set)?;
        match_archives(&set, &hits, &catalog, args.keep_multi)
    } else {
        let caps = Capabilities::probe();
        let options = ScanOptions {
            make_index: args.make_index,
            columns_override,
            index_cache: args.figshare_dir.join("indexed"),
        };
        let hits = collect_hits(&catalog, &set, &options, &caps)?;
        match_plain(&set, &hits, args.keep_multi)
    };

    write_report(&out_path, args.format, &set, &results)?;
    println!("{}", out_path.display());

    Ok(())
}

fn default_out_path(vcf: &Path) -> PathBuf {
    let mut name = vcf.as_os_str().to_os_string();
    name.push(".logo_figshare.tsv");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_out_path_appends_suffix() {
        assert_eq!(
            default_out_path(Path::new("data/cohort.vcf")),
            Path::new("data/cohort.vcf.logo_figshare.tsv")
        );
        assert_eq!(
            default_out_path(Path::new("cohort.vcf.gz")),
            Path::new("cohort.vcf.gz.logo_figshare.tsv")
        );
    }
}
