//! Candidate-row production: indexed and linear reads over plain tables
//! ([`plain`]), external index construction and range fetches ([`index`]),
//! and streaming reads of tar-packaged VCF bundles ([`archive`]).

pub mod archive;
pub mod index;
pub mod plain;
