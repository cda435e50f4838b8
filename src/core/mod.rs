//! Core data types shared by every pipeline stage.
//!
//! - [`chrom`]: chromosome-label normalization, the join key for everything
//! - [`variant::Variant`] / [`variant::VariantSet`]: the query records and
//!   the chromosome/position groupings derived from them
//! - [`columns::ColumnMap`]: resolved column roles for one source file
//! - [`types::Delimiter`] / [`types::MatchTier`]: field separators and match
//!   classification labels
//!
//! ## Chromosome naming
//!
//! Annotation tables mix UCSC (`chr1`, `chrM`) and NCBI (`1`, `MT`) naming.
//! All joins happen on the normalized form produced by
//! [`chrom::normalize_chrom`]; original labels are preserved for the report.

pub mod chrom;
pub mod columns;
pub mod types;
pub mod variant;
