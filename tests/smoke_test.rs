/// Smoke tests to verify the binary runs without panicking
use std::path::PathBuf;
use std::process::{Command, Output};

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

fn treegen(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_treegen"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute treegen")
}

fn temp_png(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("treegen-smoke-{}-{name}.png", std::process::id()))
}

#[test]
fn binary_shows_help() {
    let output = treegen(&["--help"]);

    assert!(
        output.status.success(),
        "Binary failed to run --help: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("treegen"), "Help output should mention treegen");
    assert!(stdout.contains("render"));
    assert!(stdout.contains("serve"));
}

#[test]
fn render_help_lists_tree_flags() {
    let output = treegen(&["render", "--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in ["--branch_chance_mu", "--min_angle", "--size_x", "--seed", "--output"] {
        assert!(stdout.contains(flag), "missing {flag} in render help");
    }
}

#[test]
fn binary_shows_version() {
    let output = treegen(&["--version"]);

    assert!(
        output.status.success(),
        "Binary failed to run --version: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn invalid_subcommand_fails_gracefully() {
    let output = treegen(&["nonexistent-command"]);

    // Should fail with error, not panic
    assert!(
        !output.status.success(),
        "Invalid subcommand should return error status"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !stderr.contains("panicked at"),
        "Invalid subcommand should not cause panic"
    );
}

#[test]
fn render_writes_png_file() {
    let path = temp_png("file");
    let output = treegen(&[
        "render",
        "--size_x", "120",
        "--size_y", "80",
        "--starting_length", "30",
        "--seed", "3",
        "--output", path.to_str().unwrap(),
    ]);
    assert!(
        output.status.success(),
        "render failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let bytes = std::fs::read(&path).expect("png written");
    assert!(bytes.starts_with(PNG_SIGNATURE));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn render_to_stdout_is_deterministic_per_seed() {
    let args = [
        "render", "--size_x", "100", "--size_y", "100", "--seed", "42", "--output", "-",
    ];
    let first = treegen(&args);
    let second = treegen(&args);

    assert!(first.status.success());
    assert!(first.stdout.starts_with(PNG_SIGNATURE));
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn runaway_branching_needs_unchecked() {
    let output = treegen(&["render", "--branch_chance_mu", "6", "--output", "-"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("branch_chance_mu"), "stderr: {stderr}");

    let output = treegen(&[
        "render",
        "--branch_chance_mu", "6",
        "--starting_length", "40",
        "--size_x", "64",
        "--size_y", "64",
        "--seed", "1",
        "--unchecked",
        "--output", "-",
    ]);
    assert!(
        output.status.success(),
        "unchecked render failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn invalid_parameters_fail_without_panic() {
    let output = treegen(&["render", "--min_angle", "300", "--max_angle", "200", "--output", "-"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("panicked at"));
    assert!(stderr.contains("min_angle"), "stderr: {stderr}");
}

#[test]
fn negative_angles_are_accepted() {
    let output = treegen(&[
        "render",
        "--min_angle", "-90",
        "--max_angle", "90",
        "--starting_angle", "0",
        "--size_x", "64",
        "--size_y", "64",
        "--seed", "5",
        "--output", "-",
    ]);
    assert!(
        output.status.success(),
        "negative angles rejected: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}
