//! Integration tests for the cbfkit CLI
//!
//! The command functions are driven directly against temporary files; a few
//! tests run the built binary to check exit codes.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use cbfkit_cli::{check_command, convert_command, info_command, load_settings, OutputFormat};
use cbfkit_core::{read_file, Compression, EncodeOptions, Settings};
use flate2::write::GzEncoder;
use tempfile::TempDir;

const PROBLEM: &str = "\
# small mixed-integer SOCP
VER
2

OBJSENSE
MIN

VAR
3 2
F 1
Q 2

INT
1
0

CON
1 1
L+ 1

OBJACOORD
1
0 1

ACOORD
3
0 0 1
0 1 -1
0 2 0.5

BCOORD
1
0 -2
";

fn write_input(dir: &TempDir, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).unwrap();
    path
}

fn check_output(path: &Path, format: OutputFormat) -> (bool, String) {
    let mut out = Vec::new();
    let ok = check_command(path, format, &Settings::default(), &mut out).unwrap();
    (ok, String::from_utf8(out).unwrap())
}

#[test]
fn test_check_valid_file() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "ok.cbf", PROBLEM);

    let (ok, text) = check_output(&input, OutputFormat::Text);
    assert!(ok);
    assert!(text.contains("No issues found"));
}

#[test]
fn test_check_reports_line_and_code() {
    let dir = TempDir::new().unwrap();
    let bad = PROBLEM.replace("0 2 0.5", "0 3 0.5");
    let input = write_input(&dir, "bad.cbf", &bad);

    let (ok, text) = check_output(&input, OutputFormat::Text);
    assert!(!ok);
    let first = text.lines().next().unwrap();
    assert!(first.ends_with(
        "bad.cbf:29: error[E0007]: ACOORD: variable index 3 out of range (expected 0 <= index < 3)"
    ));
    assert!(text.contains("Found 1 error(s)"));
}

#[test]
fn test_check_json_output() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "bad.cbf", "VER\n9\n");

    let (ok, text) = check_output(&input, OutputFormat::Json);
    assert!(!ok);

    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    let diags = json.as_array().unwrap();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0]["code"], "E0005");
    assert_eq!(diags[0]["line"], 2);
    assert_eq!(diags[0]["severity"], "error");
}

#[test]
fn test_check_json_clean_is_empty_array() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "ok.cbf", PROBLEM);

    let (ok, text) = check_output(&input, OutputFormat::Json);
    assert!(ok);
    assert_eq!(text.trim(), "[]");
}

#[test]
fn test_check_missing_file_is_a_diagnostic() {
    let dir = TempDir::new().unwrap();
    let (ok, text) = check_output(&dir.path().join("absent.cbf"), OutputFormat::Text);
    assert!(!ok);
    assert!(text.contains("error[E0001]"));
}

#[test]
fn test_convert_canonicalizes() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.cbf", PROBLEM);
    let output = dir.path().join("out.cbf");

    convert_command(&input, &output, &Settings::default(), &EncodeOptions::default()).unwrap();

    let text = fs::read_to_string(&output).unwrap();
    assert!(!text.contains('#'));
    assert!(text.starts_with("VER\n2\n\nOBJSENSE\nMIN\n\nVAR\n3 2\nF 1\nQ 2\n\n"));
    assert_eq!(read_file(&output).unwrap(), read_file(&input).unwrap());
}

#[test]
fn test_convert_to_gzip_and_back() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.cbf", PROBLEM);
    let packed = dir.path().join("packed.cbf.gz");
    let unpacked = dir.path().join("unpacked.cbf");

    let settings = Settings::default();
    convert_command(&input, &packed, &settings, &EncodeOptions::default()).unwrap();
    assert_eq!(&fs::read(&packed).unwrap()[..2], &[0x1f_u8, 0x8b]);

    convert_command(&packed, &unpacked, &settings, &EncodeOptions::default()).unwrap();
    assert!(fs::read_to_string(&unpacked).unwrap().starts_with("VER"));
    assert_eq!(read_file(&unpacked).unwrap(), read_file(&input).unwrap());
}

#[test]
fn test_convert_never_compress() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.cbf", PROBLEM);
    let output = dir.path().join("out.cbf.gz");
    let options = EncodeOptions {
        compression: Compression::Never,
        ..EncodeOptions::default()
    };

    convert_command(&input, &output, &Settings::default(), &options).unwrap();
    assert!(fs::read_to_string(&output).unwrap().starts_with("VER"));
}

#[test]
fn test_convert_fails_on_bad_input() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "bad.cbf", "OBJSENSE\nMIN\n");
    let output = dir.path().join("out.cbf");

    let err = convert_command(&input, &output, &Settings::default(), &EncodeOptions::default())
        .unwrap_err();
    assert!(format!("{:#}", err).contains("line 1"));
    assert!(!output.exists());
}

#[test]
fn test_info_text() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.cbf", PROBLEM);

    let mut out = Vec::new();
    info_command(&input, OutputFormat::Text, &Settings::default(), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("version:          2"));
    assert!(text.contains("objective:        MIN"));
    assert!(text.contains("variables:        3 in 2 block(s)"));
    assert!(text.contains("cones:            F Q L+"));
}

#[test]
fn test_info_json() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.cbf", PROBLEM);

    let mut out = Vec::new();
    info_command(&input, OutputFormat::Json, &Settings::default(), &mut out).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

    assert_eq!(json["variables"], 3);
    assert_eq!(json["integers"], 1);
    assert_eq!(json["con_lin_nnz"], 3);
    assert_eq!(json["sense"], "MIN");
}

#[test]
fn test_settings_limit_version() {
    let dir = TempDir::new().unwrap();
    let config = write_input(&dir, "cbfkit.toml", "[reader]\nmax_version = 1\n");
    let input = write_input(&dir, "in.cbf", PROBLEM);

    let settings = load_settings(Some(config.as_path())).unwrap();
    let mut out = Vec::new();
    let ok = check_command(&input, OutputFormat::Text, &settings, &mut out).unwrap();

    assert!(!ok);
    assert!(String::from_utf8(out).unwrap().contains("error[E0005]"));
}

#[test]
fn test_bad_settings_file() {
    let dir = TempDir::new().unwrap();
    let config = write_input(&dir, "cbfkit.toml", "[writer]\ncompression = 3\n");
    assert!(load_settings(Some(config.as_path())).is_err());
}

#[test]
fn test_binary_exit_codes() {
    let dir = TempDir::new().unwrap();
    let good = write_input(&dir, "good.cbf", PROBLEM);
    let bad = write_input(&dir, "bad.cbf", "VER\n1\n");

    let status = Command::new(env!("CARGO_BIN_EXE_cbfkit"))
        .arg("check")
        .arg(&good)
        .status()
        .unwrap();
    assert!(status.success());

    let output = Command::new(env!("CARGO_BIN_EXE_cbfkit"))
        .arg("check")
        .arg(&bad)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("error[E0008]"));
}

#[test]
fn test_binary_convert_to_stdout() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.cbf", PROBLEM);

    let output = Command::new(env!("CARGO_BIN_EXE_cbfkit"))
        .args(["convert", "-o", "-"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("VER\n2\n\n"));
}

fn run_with_stdin(args: &[&str], input: &[u8]) -> std::process::Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_cbfkit"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(input).unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn test_binary_check_stdin() {
    let output = run_with_stdin(&["check", "-"], PROBLEM.as_bytes());
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No issues found"));
}

#[test]
fn test_binary_gzip_stdin() {
    let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(PROBLEM.as_bytes()).unwrap();
    let packed = encoder.finish().unwrap();

    let output = run_with_stdin(&["check", "-"], &packed);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No issues found"));

    let output = run_with_stdin(&["info", "-", "--format", "json"], &packed);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["variables"], 3);
}
