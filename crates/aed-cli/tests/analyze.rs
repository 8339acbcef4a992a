use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::{error::Error, fs, path::PathBuf};
use tempfile::tempdir;

const SCENARIO_A: &str = "** Starting AED Software **

Is signal clean? YES
Baseline? 1
Average amplitude? 1
BPM? 30
Organized? YES (0)
Shock patient? NO, DO NOT SHOCK

** Done **
";

fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .expect("crates dir")
        .parent()
        .expect("workspace root")
        .to_path_buf()
}

fn sample_path(relative: &str) -> String {
    workspace_root()
        .join("test_data")
        .join(relative)
        .to_string_lossy()
        .to_string()
}

fn analyze(args: &[&str]) -> Result<String, Box<dyn Error>> {
    let mut cmd = cargo_bin_cmd!("aed");
    cmd.arg("analyze").args(args);
    let output = cmd.assert().success().get_output().stdout.clone();
    Ok(String::from_utf8(output)?)
}

#[test]
fn slow_regular_rhythm_report() -> Result<(), Box<dyn Error>> {
    let out = analyze(&["--input", &sample_path("scenario_a.dat")])?;
    assert_eq!(out, SCENARIO_A);
    Ok(())
}

#[test]
fn truncated_record_is_dropped_in_lenient_mode() -> Result<(), Box<dyn Error>> {
    let out = analyze(&["--input", &sample_path("truncated.dat")])?;
    assert_eq!(out, SCENARIO_A);
    Ok(())
}

#[test]
fn truncated_record_fails_in_strict_mode() {
    let mut cmd = cargo_bin_cmd!("aed");
    cmd.args([
        "analyze",
        "--strict",
        "--input",
        &sample_path("truncated.dat"),
    ]);
    let output = cmd.assert().failure().get_output().stderr.clone();
    let stderr = String::from_utf8_lossy(&output);
    assert!(stderr.contains("line 11"), "stderr: {}", stderr);
}

#[test]
fn missing_peaks_are_reported_as_undefined() -> Result<(), Box<dyn Error>> {
    let out = analyze(&["--input", &sample_path("no_peaks.dat")])?;
    assert!(out.contains("Average amplitude? undefined\n"));
    assert!(out.contains("BPM? undefined\n"));
    assert!(out.contains("Organized? UNKNOWN (undefined)\n"));
    assert!(out.contains("Shock patient? NO, DO NOT SHOCK\n"));
    Ok(())
}

#[test]
fn legacy_sentinels_print_zeros() -> Result<(), Box<dyn Error>> {
    let out = analyze(&[
        "--legacy-sentinels",
        "--input",
        &sample_path("no_peaks.dat"),
    ])?;
    assert!(out.contains("Average amplitude? 0\nBPM? 0\nOrganized? YES (0)\n"));
    assert!(out.contains("Shock patient? NO, DO NOT SHOCK\n"));
    Ok(())
}

#[test]
fn unclean_signal_stops_early() -> Result<(), Box<dyn Error>> {
    let temp = tempdir()?;
    let png = temp.path().join("ecg.png");
    let out = analyze(&[
        "--input",
        &sample_path("flatline.dat"),
        "--plot",
        png.to_str().expect("utf8 path"),
    ])?;
    assert_eq!(
        out,
        "** Starting AED Software **\n\nIs signal clean? NO, DO NOT SHOCK\n\n** Done **\n"
    );
    assert!(!png.exists(), "chart must not be drawn for unclean traces");
    Ok(())
}

#[test]
fn fast_regular_rhythm_is_shocked() -> Result<(), Box<dyn Error>> {
    let out = analyze(&["--input", &sample_path("fast_regular.dat")])?;
    assert!(out.contains("BPM? 200\n"), "{}", out);
    assert!(out.contains("Shock patient? YES, SHOCK!\n"));
    Ok(())
}

#[test]
fn json_report() -> Result<(), Box<dyn Error>> {
    let out = analyze(&[
        "--format",
        "json",
        "--input",
        &sample_path("fast_regular.dat"),
    ])?;
    let value: Value = serde_json::from_str(&out)?;
    assert_eq!(value["clean"], true);
    assert_eq!(value["decision"]["verdict"], "Shock");
    assert_eq!(value["peak_count"], 20);
    assert!(value["estimates"]["bpm"].as_f64().expect("bpm") > 199.0);
    Ok(())
}

#[test]
fn config_file_overrides_thresholds() -> Result<(), Box<dyn Error>> {
    let temp = tempdir()?;
    let config = temp.path().join("aed.toml");
    fs::write(&config, "[decision]\nmin_bpm_slow = 250.0\n")?;
    let out = analyze(&[
        "--config",
        config.to_str().expect("utf8 path"),
        "--input",
        &sample_path("fast_regular.dat"),
    ])?;
    assert!(out.contains("Shock patient? NO, DO NOT SHOCK\n"));
    Ok(())
}

#[test]
fn plot_failure_does_not_change_report() -> Result<(), Box<dyn Error>> {
    let temp = tempdir()?;
    let png = temp.path().join("missing-dir").join("ecg.png");
    let out = analyze(&[
        "--input",
        &sample_path("scenario_a.dat"),
        "--plot",
        png.to_str().expect("utf8 path"),
    ])?;
    assert_eq!(out, SCENARIO_A);
    Ok(())
}

#[test]
fn missing_input_is_an_error() {
    let temp = tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("aed");
    cmd.current_dir(temp.path()).arg("analyze");
    let output = cmd.assert().failure().get_output().stderr.clone();
    let stderr = String::from_utf8_lossy(&output);
    assert!(
        stderr.contains("input file not found: ecg.dat"),
        "stderr: {}",
        stderr
    );
}

#[test]
fn sqi_command_reports_gate() -> Result<(), Box<dyn Error>> {
    let mut cmd = cargo_bin_cmd!("aed");
    cmd.args(["sqi", "--input", &sample_path("flatline.dat")]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let value: Value = serde_json::from_slice(&out)?;
    assert_eq!(value["clean"], false);
    assert_eq!(value["quality"]["sample_count"], 20);
    assert_eq!(value["quality"]["dynamic_range"], 0.0);
    Ok(())
}

#[test]
fn print_config_is_loadable() -> Result<(), Box<dyn Error>> {
    let mut cmd = cargo_bin_cmd!("aed");
    cmd.arg("print-config");
    let out = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(out)?;
    assert!(text.contains("[decision]"));
    assert!(text.contains("[quality]"));

    let temp = tempdir()?;
    let config = temp.path().join("aed.toml");
    fs::write(&config, &text)?;
    let report = analyze(&[
        "--config",
        config.to_str().expect("utf8 path"),
        "--input",
        &sample_path("scenario_a.dat"),
    ])?;
    assert_eq!(report, SCENARIO_A);
    Ok(())
}
