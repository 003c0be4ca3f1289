//! Integration tests for the CLI application
//!
//! These tests verify that the CLI commands work correctly with real data files.

use std::io::Write;
use std::process::{Command, Output};
use tempfile::{NamedTempFile, TempDir};
use wordkernel::report::Scores;
use wordkernel::ScoreReport;

/// Helper to create test data files
struct TestDataFiles {
    pub support_file: NamedTempFile,
    pub test_file: NamedTempFile,
    pub dna_file: NamedTempFile,
}

impl TestDataFiles {
    fn new() -> std::io::Result<Self> {
        // Support sequences: label is the weight
        let mut support_file = NamedTempFile::new()?;
        writeln!(support_file, "# weight words")?;
        writeln!(support_file, "1.0 1 1 2 3")?;
        writeln!(support_file, "-0.5 1 2 2 3")?;
        support_file.flush()?;

        let mut test_file = NamedTempFile::new()?;
        writeln!(test_file, "0 1 2 2 3")?;
        writeln!(test_file, "0 9")?;
        test_file.flush()?;

        let mut dna_file = NamedTempFile::new()?;
        writeln!(dna_file, "1 ACGTACGT")?;
        writeln!(dna_file, "-1 TTTTGGGG")?;
        dna_file.flush()?;

        Ok(TestDataFiles {
            support_file,
            test_file,
            dna_file,
        })
    }
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wordkernel"))
        .args(args)
        .output()
        .expect("Failed to run CLI")
}

fn path(file: &NamedTempFile) -> &str {
    file.path().to_str().unwrap()
}

#[test]
fn test_cli_matrix_to_stdout() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");

    let output = run(&[
        "matrix",
        "--lhs",
        path(&test_data.support_file),
        "--rhs",
        path(&test_data.test_file),
        "--normalization",
        "none",
    ]);

    assert!(
        output.status.success(),
        "Matrix command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["5.000000 0.000000", "6.000000 0.000000"]);
}

#[test]
fn test_cli_symmetric_matrix_report() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let report_path = temp_dir.path().join("matrix.json");

    let output = run(&[
        "matrix",
        "--lhs",
        path(&test_data.support_file),
        "--output",
        report_path.to_str().unwrap(),
    ]);

    assert!(
        output.status.success(),
        "Matrix command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(report_path.exists(), "Report file was not created");

    let report = ScoreReport::load_from_file(&report_path).expect("Report should load");
    match report.scores {
        Scores::Matrix { rows } => {
            assert_eq!(rows.len(), 2);
            assert!((rows[0][0] - 1.0).abs() < 1e-12);
            assert!((rows[1][1] - 1.0).abs() < 1e-12);
            assert!((rows[0][1] - 5.0 / 6.0).abs() < 1e-12);
        }
        other => panic!("expected matrix report, got {other:?}"),
    }
}

#[test]
fn test_cli_predict() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");

    let output = run(&[
        "predict",
        "--support",
        path(&test_data.support_file),
        "--data",
        path(&test_data.test_file),
        "--normalization",
        "none",
        "--bias",
        "-1.5",
        "--check",
    ]);

    assert!(
        output.status.success(),
        "Predict command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("# Max deviation from pairwise scoring"));
    // 1.0 * 5 - 0.5 * 6 - 1.5 = 0.5 and 0 - 1.5
    assert!(stdout.contains("0 1 0.500000"));
    assert!(stdout.contains("1 -1 -1.500000"));
}

#[test]
fn test_cli_predict_report_and_info() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let report_path = temp_dir.path().join("decision.json");

    let output = run(&[
        "predict",
        "--support",
        path(&test_data.dna_file),
        "--data",
        path(&test_data.dna_file),
        "--format",
        "dna",
        "--order",
        "3",
        "--sign",
        "--output",
        report_path.to_str().unwrap(),
    ]);

    assert!(
        output.status.success(),
        "Predict command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let output = run(&["info", report_path.to_str().unwrap()]);
    assert!(
        output.status.success(),
        "Info command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Word Kernel Report"));
    assert!(stdout.contains("Sign Mode: true"));
    assert!(stdout.contains("Positive: 1"));
    assert!(stdout.contains("Negative: 1"));
}

#[test]
fn test_cli_invalid_inputs() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");

    let missing = run(&["matrix", "--lhs", "does/not/exist.txt"]);
    assert!(!missing.status.success());

    let bad_mode = run(&[
        "matrix",
        "--lhs",
        path(&test_data.support_file),
        "--normalization",
        "cosine",
    ]);
    assert!(!bad_mode.status.success());

    let bad_order = run(&[
        "matrix",
        "--lhs",
        path(&test_data.dna_file),
        "--format",
        "dna",
        "--order",
        "12",
    ]);
    assert!(!bad_order.status.success());
}

#[test]
fn test_cli_help() {
    let output = run(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("matrix"));
    assert!(stdout.contains("predict"));
    assert!(stdout.contains("info"));
}
