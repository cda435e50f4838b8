//! Annotation-source discovery and per-chromosome classification.
//!
//! The bulk download unpacks into an arbitrary directory tree mixing plain
//! delimited tables (possibly bgzip-compressed, possibly with `.tbi`/`.csi`
//! sidecars) and tar-packaged per-chromosome VCF bundles. [`SourceCatalog`]
//! walks that tree once and classifies every candidate by the chromosome
//! token embedded in its filename; sources without a token are "global" and
//! serve as fallback candidates for any chromosome.

pub mod store;

pub use store::{chrom_from_filename, SourceCatalog};
