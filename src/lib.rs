//! # anno-match
//!
//! A library for resolving genomic variants against heterogeneously
//! formatted precomputed annotation tables.
//!
//! Bulk annotation downloads arrive with no schema contract: tab- or
//! comma-delimited tables, with or without headers, with or without `chr`
//! prefixes, bgzip-compressed or plain, tabix-indexed or not, sometimes
//! bundled inside per-chromosome tar archives. `anno-match` takes a query
//! variant list (CHROM POS ID REF ALT) and produces a best-effort per-variant
//! match report across whatever it finds under the data directory.
//!
//! ## Features
//!
//! - **Chromosome normalization**: one canonical join key across UCSC/NCBI
//!   naming and mitochondrial spellings
//! - **Format sniffing**: delimiter, header, and column-role inference per
//!   file, with an explicit override grammar
//! - **Opportunistic indexing**: builds bgzip+tabix indexes through external
//!   tools when available, degrades to linear scans when not
//! - **Archive streaming**: reads VCF members straight out of tar bundles
//!   without extraction
//! - **Tiered matching**: position, then alleles, then identifier, with
//!   explicit handling of tied rows
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use anno_match::catalog::SourceCatalog;
//! use anno_match::matching::match_plain;
//! use anno_match::parsing::variants::read_variants;
//! use anno_match::scan::index::Capabilities;
//! use anno_match::scan::plain::{collect_hits, ScanOptions};
//!
//! let set = read_variants(Path::new("cohort.vcf")).unwrap();
//! let catalog = SourceCatalog::discover(Path::new("data/figshare")).unwrap();
//!
//! let options = ScanOptions {
//!     make_index: false,
//!     columns_override: None,
//!     index_cache: Path::new("data/figshare/indexed").to_path_buf(),
//! };
//! let caps = Capabilities::probe();
//! let hits = collect_hits(&catalog, &set, &options, &caps).unwrap();
//!
//! for result in match_plain(&set, &hits, false) {
//!     println!("{}: {}", set.variants()[result.variant].id, result.note());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: variant records, chromosome normalization, column roles
//! - [`catalog`]: annotation-source discovery and classification
//! - [`parsing`]: query-list reading and format sniffing
//! - [`scan`]: indexed, linear, and archive candidate-row production
//! - [`matching`]: the tiered matcher
//! - [`report`]: the fixed-schema report writer
//! - [`cli`]: command-line interface implementation

pub mod catalog;
pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod report;
pub mod scan;

// Re-export commonly used types for convenience
pub use catalog::SourceCatalog;
pub use core::chrom::normalize_chrom;
pub use core::columns::ColumnMap;
pub use core::types::{Delimiter, MatchTier};
pub use core::variant::{Variant, VariantSet};
pub use matching::{MatchResult, RetainedHit};
