//! Format sniffer and column resolver for unknown annotation tables.
//!
//! The bulk downloads carry no schema contract: files may be tab- or
//! comma-delimited, with or without a header, with or without a chromosome
//! column. The sniffer reads up to the first data line to settle delimiter
//! and header, and the resolver maps logical roles onto concrete field
//! positions by header-name lookup or positional defaults.

use std::path::Path;

use tracing::debug;

use crate::core::columns::ColumnMap;
use crate::core::types::Delimiter;
use crate::parsing::{open_text, ParseError};

/// Field names that mark a line as a header rather than data.
const HEADER_VOCABULARY: &[&str] = &[
    "chrom",
    "chr",
    "chromosome",
    "pos",
    "position",
    "start",
    "end",
    "ref",
    "alt",
    "id",
    "rsid",
    "score",
];

const CHROM_NAMES: &[&str] = &["chrom", "chr", "chromosome"];
const POS_NAMES: &[&str] = &["pos", "position", "start"];
const REF_NAMES: &[&str] = &["ref"];
const ALT_NAMES: &[&str] = &["alt"];
const ID_NAMES: &[&str] = &["id", "rsid", "rs"];

/// What the sniffer learned about one source file.
#[derive(Debug, Clone)]
pub struct SniffedFormat {
    pub delimiter: Delimiter,
    /// Header fields, when the first non-comment line matched the header
    /// vocabulary.
    pub header: Option<Vec<String>>,
    /// The first data line's fields, used for positional defaults.
    pub sample: Option<Vec<String>>,
}

/// Inspect a file: skip blanks and `#` comments, infer the delimiter from the
/// first remaining line, consume at most one header line, and keep the first
/// data line as a sample.
pub fn sniff_file(path: &Path) -> Result<SniffedFormat, ParseError> {
    use std::io::BufRead;

    let reader = open_text(path)?;
    let mut delimiter = None;
    let mut header = None;
    let mut sample = None;

    for line in reader.lines() {
        let line = line?;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let delim = *delimiter.get_or_insert_with(|| detect_delimiter(&line));
        let fields = delim.split(&line);

        if header.is_none() && is_header(&fields) {
            header = Some(fields);
            continue;
        }

        sample = Some(fields);
        break;
    }

    let delimiter = delimiter.unwrap_or(Delimiter::Tab);
    debug!(
        path = %path.display(),
        ?delimiter,
        has_header = header.is_some(),
        "sniffed source format"
    );

    Ok(SniffedFormat {
        delimiter,
        header,
        sample,
    })
}

fn detect_delimiter(line: &str) -> Delimiter {
    if line.contains('\t') {
        Delimiter::Tab
    } else if line.contains(',') {
        Delimiter::Comma
    } else {
        Delimiter::Whitespace
    }
}

fn is_header(fields: &[String]) -> bool {
    fields
        .iter()
        .any(|f| HEADER_VOCABULARY.contains(&f.to_lowercase().as_str()))
}

/// Map logical roles onto field positions.
///
/// With a header, each role is found by name among its synonyms. Without one,
/// columns 0,1 are chrom,pos, and a sampled data line of five or more fields
/// additionally yields id,ref,alt at 2,3,4.
pub fn resolve_columns(format: &SniffedFormat) -> ColumnMap {
    let mut map = ColumnMap::default();

    if let Some(header) = &format.header {
        let lower: Vec<String> = header.iter().map(|h| h.to_lowercase()).collect();
        let find = |names: &[&str]| {
            names
                .iter()
                .find_map(|n| lower.iter().position(|h| h == n))
        };
        map.chrom = find(CHROM_NAMES);
        map.pos = find(POS_NAMES);
        map.ref_allele = find(REF_NAMES);
        map.alt_allele = find(ALT_NAMES);
        map.id = find(ID_NAMES);
    } else {
        map.chrom = Some(0);
        map.pos = Some(1);
        if format.sample.as_ref().is_some_and(|s| s.len() >= 5) {
            map.id = Some(2);
            map.ref_allele = Some(3);
            map.alt_allele = Some(4);
        }
    }

    map
}
