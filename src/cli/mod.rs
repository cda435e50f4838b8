//! Command-line interface for anno-match.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **lookup**: Resolve a query variant list against the annotation tables
//!   under a data directory and write the per-variant match report
//! - **catalog**: List the annotation sources discovery would use, with
//!   their chromosome scope and sniffed format
//!
//! ## Usage
//!
//! ```text
//! # Look up variants against an unpacked bulk download
//! anno-match lookup --vcf cohort.vcf --figshare-dir data/figshare
//!
//! # CSV report at an explicit path, keeping all tied rows
//! anno-match lookup --vcf cohort.vcf --figshare-dir data/figshare \
//!     --out report.csv --format csv --keep-multi
//!
//! # Build bgzip+tabix indexes on the way through (external tools required)
//! anno-match lookup --vcf cohort.vcf --figshare-dir data/figshare --make-index
//!
//! # See what discovery makes of the data directory
//! anno-match catalog --figshare-dir data/figshare
//! ```

use clap::{Parser, Subcommand};

pub mod catalog;
pub mod lookup;

#[derive(Parser)]
#[command(name = "anno-match")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Match query variants against bulk-download annotation tables")]
#[command(
    long_about = "anno-match resolves a variant list (CHROM POS ID REF ALT) against precomputed annotation tables unpacked from a bulk download.\n\nThe tables carry no schema contract: files may be tab- or comma-delimited, with or without headers, bgzip-compressed, tabix-indexed, or bundled in per-chromosome tar archives. anno-match sniffs each source, optionally builds positional indexes through external tools, and reports the most specific match tier (position / alleles / identifier) it can establish for every variant."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve variants against the annotation sources and write the report
    Lookup(lookup::LookupArgs),

    /// List discovered annotation sources and their inferred formats
    Catalog(catalog::CatalogArgs),
}
