//! Reader for the query variant list.
//!
//! The input is the first five columns of a VCF body (CHROM POS ID REF ALT),
//! tab-delimited, with `#` header/comment lines ignored. Anything beyond the
//! fifth column is ignored. Malformed lines are dropped silently; callers
//! that need strict validation must pre-validate.

use std::io::BufRead;
use std::path::Path;

use tracing::debug;

use crate::core::variant::{Variant, VariantSet};
use crate::parsing::{open_text, ParseError};

/// Read the query list into an ordered [`VariantSet`].
pub fn read_variants(path: &Path) -> Result<VariantSet, ParseError> {
    let reader = open_text(path)?;
    let mut variants = Vec::new();
    let mut dropped = 0usize;

    for line in reader.lines() {
        let line = line?;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 5 {
            dropped += 1;
            continue;
        }
        let Ok(pos) = fields[1].parse::<u64>() else {
            dropped += 1;
            continue;
        };
        variants.push(Variant::new(fields[0], pos, fields[2], fields[3], fields[4]));
    }

    if dropped > 0 {
        debug!(dropped, path = %path.display(), "dropped malformed variant lines");
    }
    debug!(count = variants.len(), path = %path.display(), "read query variants");

    Ok(VariantSet::new(variants))
}
