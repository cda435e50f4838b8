use thiserror::Error;
use tracing::warn;

/// Where score values live in a source row, when the caller declares them.
///
/// Scores are carried through from the override grammar but are not consulted
/// by matching; they describe the trailing annotation block of the wide
/// precomputed tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreColumns {
    /// A single zero-based column.
    Single(usize),
    /// An inclusive zero-based range.
    Range(usize, usize),
    /// Every column after the named roles.
    Remaining,
}

/// Resolved zero-based field positions for the logical column roles of one
/// source file. Any role may be absent; absent roles exclude a row from the
/// stages that need them rather than failing the scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub chrom: Option<usize>,
    pub pos: Option<usize>,
    pub id: Option<usize>,
    pub ref_allele: Option<usize>,
    pub alt_allele: Option<usize>,
    pub score: Option<ScoreColumns>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ColumnSpecError {
    #[error("invalid column number '{0}': expected a 1-based integer")]
    InvalidNumber(String),
    #[error("column numbers are 1-based; '{0}' is out of range")]
    ZeroIndex(String),
}

impl ColumnMap {
    /// Parse a caller-supplied override such as
    /// `chrom=1,pos=2,id=3,ref=4,alt=5,score=6-56` or `score=*`.
    ///
    /// Column numbers are 1-based in the grammar and stored 0-based. The
    /// resulting map replaces any inferred roles wholesale. Entries without
    /// `=` and unrecognized role names are ignored; a range given for a
    /// non-score role leaves that role unresolved, since only the score block
    /// may span columns.
    pub fn parse_override(spec: &str) -> Result<Self, ColumnSpecError> {
        let mut map = ColumnMap::default();

        for part in spec.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            if key == "score" {
                map.score = Some(parse_score(value)?);
                continue;
            }

            let index = match value.split_once('-') {
                // Ranges are only meaningful for the score block.
                Some(_) => None,
                None => Some(parse_index(value)?),
            };

            match key {
                "chrom" => map.chrom = index,
                "pos" => map.pos = index,
                "id" => map.id = index,
                "ref" => map.ref_allele = index,
                "alt" => map.alt_allele = index,
                other => warn!(role = other, "ignoring unknown column role in --cols"),
            }
        }

        Ok(map)
    }
}

fn parse_index(value: &str) -> Result<usize, ColumnSpecError> {
    let n: usize = value
        .parse()
        .map_err(|_| ColumnSpecError::InvalidNumber(value.to_string()))?;
    n.checked_sub(1)
        .ok_or_else(|| ColumnSpecError::ZeroIndex(value.to_string()))
}

fn parse_score(value: &str) -> Result<ScoreColumns, ColumnSpecError> {
    if value == "*" {
        return Ok(ScoreColumns::Remaining);
    }
    if let Some((a, b)) = value.split_once('-') {
        return Ok(ScoreColumns::Range(parse_index(a.trim())?, parse_index(b.trim())?));
    }
    Ok(ScoreColumns::Single(parse_index(value)?))
}
