use assert_cmd::Command;
use predicates::prelude::*;
use std::f64::consts::PI;
use std::path::Path;

const SACPZ: &str = "\
* synthetic broadband velocity sensor
ZEROS 2
POLES 5
-0.037 0.037
-0.037 -0.037
-251.3 0.0
-131.0 467.3
-131.0 -467.3
CONSTANT 6.0e17
";

fn ms2psd() -> Command {
    Command::cargo_bin("ms2psd").unwrap()
}

/// 1024-sample SLIST trace at 20 Hz holding a 2.5 Hz sine
fn write_inputs(dir: &Path) {
    let samples: Vec<String> = (0..1024)
        .map(|i| format!("{:.6}", 1000.0 * (2.0 * PI * 2.5 * i as f64 / 20.0).sin()))
        .collect();
    let mut slist = String::from(
        "TIMESERIES XX_SYN__BHZ_D, 1024 samples, 20 sps, 2020-01-01T00:00:00.000000, SLIST, FLOAT, Counts\n",
    );
    for chunk in samples.chunks(6) {
        slist.push_str(&chunk.join("  "));
        slist.push('\n');
    }
    std::fs::write(dir.join("trace.txt"), slist).unwrap();
    std::fs::write(dir.join("SAC_PZs"), SACPZ).unwrap();
}

fn run_in(dir: &Path) -> Command {
    let mut cmd = ms2psd();
    cmd.current_dir(dir);
    cmd
}

const STANDARD_ARGS: [&str; 8] = ["0.5", "1.0", "6.0", "8.0", "1", "trace.txt", "SAC_PZs", "corrected.txt"];

// =============================================================================
// GENERAL
// =============================================================================

#[test]
fn test_no_args_shows_usage() {
    ms2psd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_version_flag() {
    ms2psd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ms2psd"));
}

#[test]
fn test_help_flag() {
    ms2psd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("instrument response"))
        .stdout(predicate::str::contains("--psd-out"));
}

#[test]
fn test_seven_arguments_fail_with_usage() {
    ms2psd()
        .args(&STANDARD_ARGS[..7])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_extra_argument_fails() {
    ms2psd()
        .args(STANDARD_ARGS)
        .arg("surplus")
        .assert()
        .failure()
        .code(2);
}

// =============================================================================
// INPUT VALIDATION
// =============================================================================

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("SAC_PZs"), SACPZ).unwrap();
    run_in(dir.path())
        .args(STANDARD_ARGS)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_missing_response_file() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    std::fs::remove_file(dir.path().join("SAC_PZs")).unwrap();
    run_in(dir.path())
        .args(STANDARD_ARGS)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Response file not found"));
}

#[test]
fn test_unknown_output_type() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    run_in(dir.path())
        .args(["0.5", "1.0", "6.0", "8.0", "7", "trace.txt", "SAC_PZs", "corrected.txt"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Unknown output type 7"));
    assert!(!dir.path().join("corrected.txt").exists());
}

#[test]
fn test_unordered_corners() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    run_in(dir.path())
        .args(["0.5", "9.0", "6.0", "8.0", "1", "trace.txt", "SAC_PZs", "corrected.txt"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("f1 <= f2 <= f3 <= f4"));
}

#[test]
fn test_output_directory_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    run_in(dir.path())
        .args(["0.5", "1.0", "6.0", "8.0", "1", "trace.txt", "SAC_PZs", "nowhere/corrected.txt"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("directory does not exist"));
    assert!(!dir.path().join("psd_out.txt").exists());
}

#[test]
fn test_diagnostics_path_must_not_be_a_file() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    std::fs::write(dir.path().join("diag"), "occupied").unwrap();
    run_in(dir.path())
        .args(STANDARD_ARGS)
        .args(["--diagnostics", "diag"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Diagnostics path is not a directory"));
    assert!(!dir.path().join("corrected.txt").exists());
    assert!(!dir.path().join("psd_out.txt").exists());
}

#[test]
fn test_binary_input_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    std::fs::write(dir.path().join("trace.txt"), [0x00u8, 0xff, 0xfe, 0x80, 0x01]).unwrap();
    run_in(dir.path())
        .args(STANDARD_ARGS)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("mseed2ascii"));
}

#[test]
fn test_bare_column_needs_sample_rate() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    std::fs::write(dir.path().join("trace.txt"), "1.0\n2.0\n3.0\n4.0\n").unwrap();
    run_in(dir.path())
        .args(STANDARD_ARGS)
        .assert()
        .failure()
        .stderr(predicate::str::contains("sample rate"));

    run_in(dir.path())
        .args(STANDARD_ARGS)
        .args(["--sample-rate", "20", "--quiet"])
        .assert()
        .success();
}

// =============================================================================
// END-TO-END RUNS
// =============================================================================

#[test]
fn test_run_writes_waveform_and_psd() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    run_in(dir.path())
        .args(STANDARD_ARGS)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("PSD written to psd_out.txt"));

    let waveform = std::fs::read_to_string(dir.path().join("corrected.txt")).unwrap();
    let header = waveform.lines().next().unwrap();
    assert!(header.starts_with("TIMESERIES XX_SYN__BHZ_D, 1024 samples, 20 sps"));
    assert!(header.ends_with("SLIST, FLOAT, M/S"));

    let psd = std::fs::read_to_string(dir.path().join("psd_out.txt")).unwrap();
    let rows: Vec<Vec<f64>> = psd
        .lines()
        .map(|l| l.split_whitespace().map(|t| t.parse().unwrap()).collect())
        .collect();
    assert_eq!(rows.len(), 513);
    assert!(rows.iter().all(|r| r.len() == 2 && r[1].is_finite()));
    let peak = rows
        .iter()
        .skip(1)
        .max_by(|a, b| a[1].partial_cmp(&b[1]).unwrap())
        .unwrap();
    assert_eq!(peak[0], 2.5);
}

#[test]
fn test_json_summary() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    let output = run_in(dir.path())
        .args(STANDARD_ARGS)
        .args(["--json", "--quiet", "--psd-out", "spectra.txt", "--psd-source", "raw"])
        .assert()
        .success();

    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["psd_out"], "psd_out.txt");
    assert_eq!(parsed["psd_copy"], "spectra.txt");
    assert_eq!(parsed["summary"]["trace_id"], "XX_SYN__BHZ_D");
    assert_eq!(parsed["summary"]["n_samples"], 1024);
    assert_eq!(parsed["summary"]["config"]["output_type"], "velocity");
    assert_eq!(parsed["summary"]["config"]["psd_source"], "raw");
    assert_eq!(parsed["summary"]["psd_peak_frequency"], 2.5);
    assert!(parsed.get("diagnostics").is_none());

    // The well-known table is written on every run; the copy is identical
    let table = std::fs::read_to_string(dir.path().join("psd_out.txt")).unwrap();
    let copy = std::fs::read_to_string(dir.path().join("spectra.txt")).unwrap();
    assert_eq!(table, copy);
}

#[test]
fn test_diagnostics_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    let output = run_in(dir.path())
        .args(STANDARD_ARGS)
        .args(["--diagnostics", "diag", "--json", "--quiet"])
        .assert()
        .success();

    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["diagnostics"].as_array().unwrap().len(), 9);

    for name in ["raw", "detrended", "tapered", "spectrum", "response", "mask", "corrected"] {
        let path = dir.path().join("diag").join(format!("{}.txt", name));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains(&format!("# name: {}", name)));
    }
}

#[test]
fn test_verbose_logging_goes_to_stderr() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    run_in(dir.path())
        .args(STANDARD_ARGS)
        .args(["-v", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Loaded response"));
}
