/// Field separator of a delimited source file.
///
/// `Whitespace` means the sniffer found neither a tab nor a comma on the
/// first data line; such files are split on runs of whitespace and their rows
/// are reconstructed with tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Tab,
    Comma,
    Whitespace,
}

impl Delimiter {
    /// Split one source line into fields.
    ///
    /// A line that does not contain the explicit delimiter character falls
    /// back to whitespace splitting, matching how mixed files behave when a
    /// tab-delimited table carries the odd space-separated row.
    pub fn split(self, line: &str) -> Vec<String> {
        let explicit = match self {
            Delimiter::Tab => Some('\t'),
            Delimiter::Comma => Some(','),
            Delimiter::Whitespace => None,
        };

        match explicit {
            Some(c) if line.contains(c) => line.split(c).map(str::to_string).collect(),
            _ => line.split_whitespace().map(str::to_string).collect(),
        }
    }

    /// Separator used when reconstructing a raw row for the report.
    pub fn joiner(self) -> &'static str {
        match self {
            Delimiter::Comma => ",",
            Delimiter::Tab | Delimiter::Whitespace => "\t",
        }
    }
}

/// Specificity level at which a variant was matched.
///
/// The first four tiers belong to the plain-file path; the last two to the
/// archive path, where rows are already allele-filtered during scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    NoMatch,
    PosMatch,
    RefAltMatch,
    IdMatch,
    NotAvailableInZip,
    Hit,
}

impl MatchTier {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchTier::NoMatch => "no_match",
            MatchTier::PosMatch => "pos_match",
            MatchTier::RefAltMatch => "ref_alt_match",
            MatchTier::IdMatch => "id_match",
            MatchTier::NotAvailableInZip => "not_available_in_zip",
            MatchTier::Hit => "hit",
        }
    }

    /// Wire label for the `match_note` column, with the `:multi` marker for
    /// discarded alternatives.
    pub fn note(self, multi: bool) -> String {
        if multi {
            format!("{}:multi", self.as_str())
        } else {
            self.as_str().to_string()
        }
    }
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_explicit_delimiter() {
        assert_eq!(Delimiter::Tab.split("a\tb\tc"), vec!["a", "b", "c"]);
        assert_eq!(Delimiter::Comma.split("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_falls_back_to_whitespace() {
        assert_eq!(Delimiter::Tab.split("a b  c"), vec!["a", "b", "c"]);
        assert_eq!(Delimiter::Whitespace.split("a b\tc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_joiner() {
        assert_eq!(Delimiter::Tab.joiner(), "\t");
        assert_eq!(Delimiter::Whitespace.joiner(), "\t");
        assert_eq!(Delimiter::Comma.joiner(), ",");
    }

    #[test]
    fn test_tier_notes() {
        assert_eq!(MatchTier::PosMatch.note(false), "pos_match");
        assert_eq!(MatchTier::IdMatch.note(true), "id_match:multi");
        assert_eq!(MatchTier::Hit.note(true), "hit:multi");
    }
}
