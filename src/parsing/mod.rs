//! Input readers and the format sniffer.
//!
//! This module provides:
//!
//! - **Query variant lists**: 5+-column tab-delimited records, optionally
//!   gzip-compressed ([`variants::read_variants`])
//! - **Format sniffing**: delimiter, header, and column-role inference for
//!   unknown annotation tables ([`sniff::sniff_file`])
//!
//! Both readers go through [`open_text`], which transparently decompresses
//! `.gz`/`.bgz`/`.bgzip` sources. Bgzip files are valid multi-member gzip
//! streams, so [`flate2::read::MultiGzDecoder`] covers them as well.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use thiserror::Error;

pub mod sniff;
pub mod variants;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// True when the filename signals gzip/bgzip compression.
pub fn is_compressed(path: &Path) -> bool {
    let name = path.to_string_lossy().to_lowercase();
    name.ends_with(".gz") || name.ends_with(".bgz") || name.ends_with(".bgzip")
}

/// Open a possibly-compressed text file for buffered line reading.
pub fn open_text(path: &Path) -> Result<Box<dyn BufRead>, ParseError> {
    let file = File::open(path)?;
    if is_compressed(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}
