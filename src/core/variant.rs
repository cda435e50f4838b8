use std::collections::{BTreeSet, HashMap};

use crate::core::chrom::normalize_chrom;

/// A single query variant as read from the input list.
///
/// `chrom` is the label as given; `chrom_norm` is the canonical join key used
/// to select candidate files and rows. Multiple variants may share a position
/// (multi-allelic sites) and are matched independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub chrom: String,
    pub chrom_norm: String,
    pub pos: u64,
    pub id: String,
    pub ref_allele: String,
    pub alt_allele: String,
}

impl Variant {
    pub fn new(
        chrom: impl Into<String>,
        pos: u64,
        id: impl Into<String>,
        ref_allele: impl Into<String>,
        alt_allele: impl Into<String>,
    ) -> Self {
        let chrom = chrom.into();
        let chrom_norm = normalize_chrom(&chrom);
        Self {
            chrom,
            chrom_norm,
            pos,
            id: id.into(),
            ref_allele: ref_allele.into(),
            alt_allele: alt_allele.into(),
        }
    }

    /// True when the identifier carries no information (`""` or the VCF
    /// placeholder `.`), which disables the id-match stage.
    pub fn has_id(&self) -> bool {
        !self.id.is_empty() && self.id != "."
    }
}

/// The ordered query set plus the groupings used to prune scans.
#[derive(Debug, Default)]
pub struct VariantSet {
    variants: Vec<Variant>,
    /// Normalized chromosomes in first-seen order.
    chrom_order: Vec<String>,
    /// chrom_norm -> indices into `variants`.
    by_chrom: HashMap<String, Vec<usize>>,
    /// chrom_norm -> set of query positions.
    positions: HashMap<String, BTreeSet<u64>>,
}

impl VariantSet {
    pub fn new(variants: Vec<Variant>) -> Self {
        let mut chrom_order = Vec::new();
        let mut by_chrom: HashMap<String, Vec<usize>> = HashMap::new();
        let mut positions: HashMap<String, BTreeSet<u64>> = HashMap::new();

        for (i, v) in variants.iter().enumerate() {
            if !by_chrom.contains_key(&v.chrom_norm) {
                chrom_order.push(v.chrom_norm.clone());
            }
            by_chrom.entry(v.chrom_norm.clone()).or_default().push(i);
            positions.entry(v.chrom_norm.clone()).or_default().insert(v.pos);
        }

        Self {
            variants,
            chrom_order,
            by_chrom,
            positions,
        }
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Normalized chromosomes in the order they first appear in the input.
    pub fn chromosomes(&self) -> &[String] {
        &self.chrom_order
    }

    /// Indices of the variants on a normalized chromosome.
    pub fn indices_on(&self, chrom_norm: &str) -> &[usize] {
        self.by_chrom.get(chrom_norm).map_or(&[], Vec::as_slice)
    }

    /// Query positions on a normalized chromosome, sorted.
    pub fn positions_on(&self, chrom_norm: &str) -> Option<&BTreeSet<u64>> {
        self.positions.get(chrom_norm)
    }
}
