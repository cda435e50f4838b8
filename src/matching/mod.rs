//! The tiered matcher.
//!
//! Candidate rows arrive position-filtered from the scanners; this module
//! reduces them to one classified result per query variant:
//!
//! 1. **Position**: every row sharing `(chrom_norm, pos)`
//! 2. **Alleles**: the subset whose REF/ALT columns match case-insensitively
//! 3. **Identifier**: the further subset whose ID matches verbatim
//!
//! Each stage only narrows when it produces a non-empty subset, so the final
//! tier label is the most specific stage that held. The archive path skips
//! the staging because its rows were already allele-filtered while scanning.

pub mod engine;

pub use engine::{match_archives, match_plain, MatchResult, RetainedHit};
