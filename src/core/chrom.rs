/// Canonicalize a chromosome label to the `chr`-prefixed form.
///
/// The label is trimmed, any case-insensitive `chr` prefix is replaced with a
/// literal `chr`, and mitochondrial spellings (`M`/`MT` in any case) collapse
/// to `chrM`. Everything else is kept verbatim after the prefix, so `chr01`
/// and `chr1` remain distinct labels.
pub fn normalize_chrom(chrom: &str) -> String {
    let trimmed = chrom.trim();
    let bytes = trimmed.as_bytes();
    let rest = if bytes.len() >= 3 && bytes[..3].eq_ignore_ascii_case(b"chr") {
        &trimmed[3..]
    } else {
        trimmed
    };

    if rest.eq_ignore_ascii_case("m") || rest.eq_ignore_ascii_case("mt") {
        return "chrM".to_string();
    }

    format!("chr{rest}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_prefix() {
        assert_eq!(normalize_chrom("1"), "chr1");
        assert_eq!(normalize_chrom("chr1"), "chr1");
        assert_eq!(normalize_chrom("CHR2"), "chr2");
        assert_eq!(normalize_chrom(" 17 "), "chr17");
    }

    #[test]
    fn test_normalize_mitochondrial() {
        for label in ["M", "m", "MT", "mt", "Mt", "mT", "chrM", "chrMT", "chrmt", "CHRM"] {
            assert_eq!(normalize_chrom(label), "chrM", "label {label:?}");
        }
    }

    #[test]
    fn test_normalize_idempotent() {
        for label in ["1", "chr1", "X", "x", "MT", "chr01", "scaffold_12"] {
            let once = normalize_chrom(label);
            assert_eq!(normalize_chrom(&once), once);
        }
    }

    #[test]
    fn test_normalize_keeps_leading_zeros() {
        // Known limitation: no numeric canonicalization.
        assert_eq!(normalize_chrom("chr01"), "chr01");
        assert_ne!(normalize_chrom("chr01"), normalize_chrom("chr1"));
    }

    #[test]
    fn test_normalize_preserves_case_of_remainder() {
        assert_eq!(normalize_chrom("x"), "chrx");
        assert_eq!(normalize_chrom("X"), "chrX");
    }
}
