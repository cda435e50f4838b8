use std::path::PathBuf;

use clap::Args;

use crate::catalog::SourceCatalog;
use crate::core::columns::ColumnMap;
use crate::core::types::Delimiter;
use crate::parsing::sniff::{resolve_columns, sniff_file};
use crate::scan::index::has_index;

#[derive(Args)]
pub struct CatalogArgs {
    /// Directory holding the unpacked bulk download
    #[arg(long = "figshare-dir", required = true)]
    pub figshare_dir: PathBuf,
}

/// List every discovered source with its chromosome scope and, for plain
/// files, the sniffed format. Read-only: archives are listed but their
/// members are never opened.
pub fn run(args: CatalogArgs, verbose: bool) -> anyhow::Result<()> {
    let catalog = SourceCatalog::discover(&args.figshare_dir)?;
    if catalog.is_empty() {
        println!("No annotation sources under {}", args.figshare_dir.display());
        return Ok(());
    }

    println!("kind\tpath\tscope\tdelimiter\tindexed\tcolumns");
    for file in catalog.files() {
        let scope = catalog
            .scope_of(file)
            .unwrap_or_else(|| "global".to_string());
        let sniffed = sniff_file(file)?;
        let columns = resolve_columns(&sniffed);
        println!(
            "file\t{}\t{}\t{}\t{}\t{}",
            file.display(),
            scope,
            delimiter_label(sniffed.delimiter),
            if has_index(file) { "yes" } else { "no" },
            describe_columns(&columns),
        );
        if verbose {
            if let Some(header) = &sniffed.header {
                eprintln!("  header: {}", header.join(", "));
            }
        }
    }
    for archive in catalog.archives() {
        let scope = catalog
            .scope_of(archive)
            .unwrap_or_else(|| "global".to_string());
        println!("archive\t{}\t{}\t-\t-\t-", archive.display(), scope);
    }

    Ok(())
}

fn delimiter_label(delimiter: Delimiter) -> &'static str {
    match delimiter {
        Delimiter::Tab => "tab",
        Delimiter::Comma => "comma",
        Delimiter::Whitespace => "whitespace",
    }
}

/// Render resolved roles with 1-based column numbers, matching the --cols
/// grammar of the lookup command.
fn describe_columns(columns: &ColumnMap) -> String {
    let mut parts = Vec::new();
    for (role, index) in [
        ("chrom", columns.chrom),
        ("pos", columns.pos),
        ("id", columns.id),
        ("ref", columns.ref_allele),
        ("alt", columns.alt_allele),
    ] {
        if let Some(i) = index {
            parts.push(format!("{role}={}", i + 1));
        }
    }
    if parts.is_empty() {
        "unresolved".to_string()
    } else {
        parts.join(",")
    }
}
