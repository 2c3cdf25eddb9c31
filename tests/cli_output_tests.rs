use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn cli() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_config-search"));
    cmd.env("NO_COLOR", "1")
        .env_remove("CONFIG_SEARCH_CONFIG")
        .env_remove("CONFIG_SEARCH_LOG");
    cmd
}

#[test]
fn cli_help_lists_commands() {
    let output = cli().arg("--help").output().expect("run config-search");
    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf8 stderr");
    assert!(stderr.contains("config-search run"));
    assert!(stderr.contains("config-search render"));
    assert!(stderr.contains("config-search models"));
}

#[test]
fn cli_parse_error_includes_usage_in_stderr() {
    let output = cli()
        .arg("run")
        .arg("--output")
        .output()
        .expect("run config-search");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).expect("utf8 stderr");
    assert!(stderr.contains("[error] Invalid command arguments"));
    assert!(stderr.contains("--output requires a value"));
    assert!(stderr.contains("USAGE:"));
    assert!(!stderr.contains('\u{1b}'));
}

#[test]
fn cli_render_reads_stdin_and_prints_markup() {
    let root = temp_workspace("cli-render");
    let mut child = cli()
        .current_dir(&root)
        .arg("render")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn config-search");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"Search Parameters:\n\x1b[0;31mbad & worse\x1b[0m\n")
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    assert!(stdout.starts_with("<pre style=\"margin: 0; font-family: monospace; white-space: pre;\">"));
    assert!(stdout.contains("<span style=\"color: #0000BB;\">Search Parameters:</span>"));
    assert!(stdout.contains("<span style=\"color: #FF0000;\">bad &amp; worse</span>"));
    assert!(!stdout.contains('\u{1b}'));
    assert!(stdout.trim_end().ends_with("</pre>"));
}

#[cfg(unix)]
#[test]
fn cli_run_prints_markup_and_writes_output_file() {
    let root = temp_workspace("cli-run");
    let script = write_script(
        &root,
        "configSearchTool.sh",
        "echo 'Search Results:'\necho \"args: $*\"\necho '--------------------------------------------------'\necho 'Files with match: 3'\n",
    );
    let out_file = root.join("result.html");

    let output = cli()
        .current_dir(&root)
        .arg("run")
        .arg("--output")
        .arg(&out_file)
        .arg(&script)
        .arg("-m")
        .arg("a01q")
        .output()
        .expect("run config-search");

    assert!(
        output.status.success(),
        "stdout={}\nstderr={}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    assert!(stdout.contains("args: -m a01q"));
    assert!(stdout.contains("<hr style=\"border: none; border-top: 1px dashed #666; margin: 5px 0;\">"));
    assert!(stdout.contains("Files with match: <span style=\"color: #BBBB00;\">3</span>"));
    let written = fs::read_to_string(&out_file).expect("output file");
    assert_eq!(written, stdout.trim_end_matches('\n'));
}

#[cfg(unix)]
#[test]
fn cli_run_uses_config_program_and_mirrors_exit_status() {
    let root = temp_workspace("cli-config");
    write_script(&root, "search.sh", "echo 'Summary:'\nexit 5\n");
    fs::write(
        root.join("config-search.toml"),
        "[search]\nprogram = \"./search.sh\"\n\n[theme]\nheader = \"teal\"\n",
    )
    .expect("write config");

    let output = cli()
        .current_dir(&root)
        .arg("run")
        .output()
        .expect("run config-search");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    assert!(stdout.contains("<span style=\"color: teal;\">Summary:</span>"));
}

#[test]
fn cli_run_launch_failure_exits_127() {
    let root = temp_workspace("cli-launch");
    let output = cli()
        .current_dir(&root)
        .arg("run")
        .arg(root.join("missing.sh"))
        .output()
        .expect("run config-search");

    assert_eq!(output.status.code(), Some(127));
    let stderr = String::from_utf8(output.stderr).expect("utf8 stderr");
    assert!(stderr.contains("Search failed to start"));
    assert!(stderr.contains("missing.sh"));
}

#[cfg(unix)]
#[test]
fn cli_run_timeout_cancels_and_exits_130() {
    let root = temp_workspace("cli-timeout");
    let script = write_script(&root, "slow.sh", "echo started\nexec sleep 30\n");

    let output = cli()
        .current_dir(&root)
        .arg("run")
        .arg("--timeout")
        .arg("0.3")
        .arg(&script)
        .output()
        .expect("run config-search");

    assert_eq!(output.status.code(), Some(130));
    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    assert!(stdout.contains("started"));
    let stderr = String::from_utf8(output.stderr).expect("utf8 stderr");
    assert!(stderr.contains("warn: search timed out after 0.3s; cancelling"));
    assert!(!stderr.contains('\u{1b}'));
}

#[test]
fn cli_models_resolves_code_from_overlay_file() {
    let root = temp_workspace("cli-models");
    fs::write(
        root.join("model_database.json"),
        r#"{"qq1": "Quiet Phone"}"#,
    )
    .expect("write models");

    let output = cli()
        .current_dir(&root)
        .arg("models")
        .arg("--file")
        .arg("model_database.json")
        .arg("qq1")
        .output()
        .expect("run config-search");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    assert_eq!(stdout.trim_end(), "Quiet Phone (qq1)");
}

#[cfg(unix)]
fn write_script(root: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = root.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}")).expect("write script");
    let mut perms = fs::metadata(&path).expect("metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod");
    path
}

fn temp_workspace(name: &str) -> PathBuf {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    let root = std::env::temp_dir().join(format!("config-search-{name}-{ts}"));
    fs::create_dir_all(&root).expect("mkdir");
    root
}
