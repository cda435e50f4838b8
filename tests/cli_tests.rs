//! End-to-end tests driving the anno-match binary over tempdir fixtures.

use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use flate2::write::GzEncoder;
use flate2::Compression;
use predicates::prelude::*;

fn anno_match() -> Command {
    Command::cargo_bin("anno-match").expect("binary builds")
}

/// Write the query list and return its path.
fn write_query(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("query.vcf");
    fs::write(&path, content).unwrap();
    path
}

fn report_path(vcf: &Path) -> PathBuf {
    let mut name = vcf.as_os_str().to_os_string();
    name.push(".logo_figshare.tsv");
    PathBuf::from(name)
}

#[test]
fn lookup_reports_id_match() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("figshare");
    fs::create_dir(&data).unwrap();
    fs::write(
        data.join("chr1.tsv"),
        "chrom\tpos\tid\tref\talt\nchr1\t100\trs1\tA\tG\n",
    )
    .unwrap();
    let vcf = write_query(dir.path(), "chr1\t100\trs1\tA\tG\n");

    anno_match()
        .arg("lookup")
        .arg("--vcf")
        .arg(&vcf)
        .arg("--figshare-dir")
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("logo_figshare.tsv"));

    let report = fs::read_to_string(report_path(&vcf)).unwrap();
    let mut lines = report.lines();
    assert_eq!(
        lines.next().unwrap(),
        "CHROM\tPOS\tID\tREF\tALT\tmatched_rows\tmatch_note\thit_file\traw_hit"
    );
    let row = lines.next().unwrap();
    assert!(row.contains("\t1\tid_match\tchr1.tsv\t"), "row was: {row}");
    assert!(row.contains("\"chr1\t100\trs1\tA\tG\""), "row was: {row}");
}

#[test]
fn lookup_stays_at_pos_match_when_alleles_and_id_differ() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("figshare");
    fs::create_dir(&data).unwrap();
    fs::write(
        data.join("chr1.tsv"),
        "chrom\tpos\tid\tref\talt\nchr1\t100\trs2\tA\tT\n",
    )
    .unwrap();
    let vcf = write_query(dir.path(), "chr1\t100\trs1\tA\tG\n");

    anno_match()
        .arg("lookup")
        .arg("--vcf")
        .arg(&vcf)
        .arg("--figshare-dir")
        .arg(&data)
        .assert()
        .success();

    let report = fs::read_to_string(report_path(&vcf)).unwrap();
    let row = report.lines().nth(1).unwrap();
    assert!(row.contains("\t1\tpos_match\t"), "row was: {row}");
    assert!(row.contains("rs2"), "row was: {row}");
}

#[test]
fn lookup_fails_on_empty_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("figshare");
    fs::create_dir(&data).unwrap();
    let vcf = write_query(dir.path(), "chr1\t100\trs1\tA\tG\n");

    anno_match()
        .arg("lookup")
        .arg("--vcf")
        .arg(&vcf)
        .arg("--figshare-dir")
        .arg(&data)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no annotation files"));
}

#[test]
fn lookup_allow_empty_emits_no_match_rows() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("figshare");
    fs::create_dir(&data).unwrap();
    let vcf = write_query(dir.path(), "chr1\t100\trs1\tA\tG\n");

    anno_match()
        .arg("lookup")
        .arg("--vcf")
        .arg(&vcf)
        .arg("--figshare-dir")
        .arg(&data)
        .arg("--allow-empty")
        .assert()
        .success();

    let report = fs::read_to_string(report_path(&vcf)).unwrap();
    assert_eq!(
        report.lines().nth(1).unwrap(),
        "chr1\t100\trs1\tA\tG\t0\tno_match\t\t"
    );
}

#[test]
fn lookup_fails_on_empty_query() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("figshare");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("chr1.tsv"), "chr1\t100\trs1\tA\tG\n").unwrap();
    let vcf = write_query(dir.path(), "# header only\n");

    anno_match()
        .arg("lookup")
        .arg("--vcf")
        .arg(&vcf)
        .arg("--figshare-dir")
        .arg(&data)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no variants"));
}

#[test]
fn lookup_keep_multi_expands_tied_rows() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("figshare");
    fs::create_dir(&data).unwrap();
    fs::write(
        data.join("chr1.tsv"),
        "chrom\tpos\tid\tref\talt\nchr1\t100\trs1\tA\tG\nchr1\t100\trs1\tA\tG\n",
    )
    .unwrap();
    let query = "chr1\t100\trs1\tA\tG\n";

    // Default: one row, tier suffixed :multi.
    let vcf = write_query(dir.path(), query);
    anno_match()
        .arg("lookup")
        .arg("--vcf")
        .arg(&vcf)
        .arg("--figshare-dir")
        .arg(&data)
        .assert()
        .success();
    let report = fs::read_to_string(report_path(&vcf)).unwrap();
    assert_eq!(report.lines().count(), 2);
    assert!(report.lines().nth(1).unwrap().contains("\t2\tid_match:multi\t"));

    // keep-multi: both rows, same matched_rows, no suffix.
    let out = dir.path().join("multi.tsv");
    anno_match()
        .arg("lookup")
        .arg("--vcf")
        .arg(&vcf)
        .arg("--figshare-dir")
        .arg(&data)
        .arg("--keep-multi")
        .arg("--out")
        .arg(&out)
        .assert()
        .success();
    let report = fs::read_to_string(&out).unwrap();
    let rows: Vec<&str> = report.lines().skip(1).collect();
    assert_eq!(rows.len(), 2);
    for row in rows {
        assert!(row.contains("\t2\tid_match\t"), "row was: {row}");
    }
}

#[test]
fn lookup_csv_format_and_cols_override() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("figshare");
    fs::create_dir(&data).unwrap();
    // Headerless file with position in the third column.
    fs::write(data.join("chr1_table.txt"), "x\tchr1\t100\trs1\tA\tG\n").unwrap();
    let vcf = write_query(dir.path(), "chr1\t100\trs1\tA\tG\n");
    let out = dir.path().join("report.csv");

    anno_match()
        .arg("lookup")
        .arg("--vcf")
        .arg(&vcf)
        .arg("--figshare-dir")
        .arg(&data)
        .arg("--cols")
        .arg("chrom=2,pos=3,id=4,ref=5,alt=6")
        .arg("--format")
        .arg("csv")
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    let report = fs::read_to_string(&out).unwrap();
    assert!(report.starts_with("CHROM,POS,ID,REF,ALT,"));
    assert!(report.contains("chr1,100,rs1,A,G,1,id_match,chr1_table.txt,"));
}

fn build_archive(path: &Path, members: &[(&str, &[u8])]) {
    let file = File::create(path).unwrap();
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    for (name, data) in members {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, *data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
}

#[test]
fn lookup_archive_path_hits_and_coverage() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("figshare");
    fs::create_dir(&data).unwrap();

    let mut gz_member = Vec::new();
    {
        let mut encoder = GzEncoder::new(&mut gz_member, Compression::default());
        encoder
            .write_all(b"##fileformat=VCFv4.2\nchr1\t100\trs1\tA\tG,T\n")
            .unwrap();
        encoder.finish().unwrap();
    }
    build_archive(
        &data.join("FSResult_chr1.vcf.tar.gz"),
        &[("bundle/chr1.vcf.gz", &gz_member[..])],
    );

    // A plain table also present: archives take precedence and it is ignored.
    fs::write(data.join("chr2.tsv"), "chrom\tpos\tid\tref\talt\nchr2\t55\trs5\tG\tA\n").unwrap();

    let vcf = write_query(
        dir.path(),
        "chr1\t100\trs1\tA\tG\nchr1\t100\trs1\tA\tC\nchr2\t55\trs5\tG\tA\n",
    );

    anno_match()
        .arg("lookup")
        .arg("--vcf")
        .arg(&vcf)
        .arg("--figshare-dir")
        .arg(&data)
        .assert()
        .success();

    let report = fs::read_to_string(report_path(&vcf)).unwrap();
    let rows: Vec<&str> = report.lines().skip(1).collect();
    assert_eq!(rows.len(), 3);

    // ALT G is in the row's comma-separated ALT list.
    assert!(rows[0].contains("\t1\thit\t"), "row was: {}", rows[0]);
    assert!(
        rows[0].contains("FSResult_chr1.vcf.tar.gz:chr1.vcf.gz"),
        "row was: {}",
        rows[0]
    );
    // ALT C is not.
    assert!(rows[1].contains("\t0\tno_match\t"), "row was: {}", rows[1]);
    // chr2 has no archive coverage; the plain table is not consulted.
    assert!(
        rows[2].contains("\t0\tnot_available_in_zip\t"),
        "row was: {}",
        rows[2]
    );
}

#[test]
fn catalog_lists_sources_with_scope() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("figshare");
    fs::create_dir(&data).unwrap();
    fs::write(
        data.join("chr1_scores.tsv"),
        "chrom\tpos\tid\tref\talt\nchr1\t100\trs1\tA\tG\n",
    )
    .unwrap();
    fs::write(data.join("background.csv"), "chr1,100,rs1,A,G\n").unwrap();
    build_archive(&data.join("FSResult_chr2.vcf.tar.gz"), &[]);

    anno_match()
        .arg("catalog")
        .arg("--figshare-dir")
        .arg(&data)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("chr1_scores.tsv\tchr1\ttab")
                .and(predicate::str::contains("background.csv\tglobal\tcomma"))
                .and(predicate::str::contains("chrom=1,pos=2,id=3,ref=4,alt=5"))
                .and(predicate::str::contains("FSResult_chr2.vcf.tar.gz\tchr2")),
        );
}
