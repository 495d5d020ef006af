//! CLI integration tests using assert_cmd to exercise the actual binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::{NamedTempFile, TempDir};

/// Binary with the project dir pinned to an empty temp dir, so no stray
/// `.cchooks/guard.yml` leaks in from the host.
fn cchooks(project: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cchooks").unwrap();
    cmd.env("CLAUDE_PROJECT_DIR", project.path())
        .env_remove("CCHOOKS_LOG")
        .env("CCHOOKS_STDIN_TIMEOUT_MS", "5000");
    cmd
}

fn bash_event(command: &str) -> String {
    json!({
        "hook_event_name": "PreToolUse",
        "session_id": "s1",
        "tool_name": "Bash",
        "tool_input": {"command": command}
    })
    .to_string()
}

fn stdout_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).unwrap()
}

// ---------------------------------------------------------------------------
// guard
// ---------------------------------------------------------------------------

#[test]
fn guard_blocks_dangerous_command() {
    let tmp = TempDir::new().unwrap();
    let out = cchooks(&tmp)
        .arg("guard")
        .write_stdin(bash_event("sudo rm -rf /var/log"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v = stdout_json(&out);
    assert_eq!(v["decision"], "block");
    assert_eq!(v["reason"], "Dangerous command pattern detected: sudo rm");
}

#[test]
fn guard_approves_safe_command() {
    let tmp = TempDir::new().unwrap();
    cchooks(&tmp)
        .arg("guard")
        .write_stdin(bash_event("cargo test"))
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""decision": "approve""#));
}

#[test]
fn guard_reads_project_policy() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join(".cchooks")).unwrap();
    std::fs::write(
        tmp.path().join(".cchooks/guard.yml"),
        "blocked_commands: [\"git push --force\"]\n",
    )
    .unwrap();

    cchooks(&tmp)
        .arg("guard")
        .write_stdin(bash_event("git push --force origin main"))
        .assert()
        .success()
        .stdout(predicate::str::contains("git push --force"));

    // The project list replaces the defaults.
    cchooks(&tmp)
        .arg("guard")
        .write_stdin(bash_event("sudo rm x"))
        .assert()
        .success()
        .stdout(predicate::str::contains("approve"));
}

#[test]
fn guard_explicit_config_flag() {
    let tmp = TempDir::new().unwrap();
    let policy = tmp.path().join("custom.yml");
    std::fs::write(&policy, "blocked_mcp_servers: [shell]\n").unwrap();

    cchooks(&tmp)
        .args(["guard", "--config"])
        .arg(&policy)
        .write_stdin(
            json!({
                "hook_event_name": "PreToolUse",
                "session_id": "s1",
                "tool_name": "mcp__shell__exec",
                "tool_input": {}
            })
            .to_string(),
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("MCP server 'shell' is not allowed"));
}

#[test]
fn guard_bad_config_fails() {
    let tmp = TempDir::new().unwrap();
    let policy = tmp.path().join("broken.yml");
    std::fs::write(&policy, "protected_paths: [\"[unclosed\"]\n").unwrap();

    cchooks(&tmp)
        .args(["guard", "--config"])
        .arg(&policy)
        .write_stdin(bash_event("ls"))
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("cchooks: "));
}

#[test]
fn guard_protected_path() {
    let tmp = TempDir::new().unwrap();
    cchooks(&tmp)
        .arg("guard")
        .write_stdin(
            json!({
                "hook_event_name": "PreToolUse",
                "session_id": "s1",
                "tool_name": "Write",
                "tool_input": {"file_path": "/etc/passwd", "content": ""}
            })
            .to_string(),
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("Cannot modify protected path: /etc/passwd"));
}

// ---------------------------------------------------------------------------
// Error policy through the real process
// ---------------------------------------------------------------------------

#[test]
fn missing_event_name_exits_2() {
    let tmp = TempDir::new().unwrap();
    cchooks(&tmp)
        .arg("guard")
        .write_stdin(r#"{"session_id":"s1"}"#)
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("missing or invalid hook_event_name field"));
}

#[test]
fn unknown_event_exits_2() {
    let tmp = TempDir::new().unwrap();
    cchooks(&tmp)
        .arg("stop-once")
        .write_stdin(r#"{"hook_event_name":"PreCompact"}"#)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown event type: PreCompact"));
}

#[test]
fn empty_stdin_exits_2() {
    let tmp = TempDir::new().unwrap();
    cchooks(&tmp)
        .arg("guard")
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to decode stdin"));
}

#[test]
fn unhandled_event_is_silent_success() {
    let tmp = TempDir::new().unwrap();
    cchooks(&tmp)
        .arg("guard")
        .write_stdin(r#"{"hook_event_name":"Notification","session_id":"s1","message":"idle"}"#)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

// ---------------------------------------------------------------------------
// stop-once / transcript
// ---------------------------------------------------------------------------

#[test]
fn stop_once_blocks_first_attempt() {
    let tmp = TempDir::new().unwrap();
    cchooks(&tmp)
        .args(["stop-once", "--reason", "run the tests first"])
        .write_stdin(r#"{"hook_event_name":"Stop","session_id":"s1","stop_hook_active":false}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""reason": "run the tests first""#));
}

#[test]
fn stop_once_allows_second_attempt() {
    let tmp = TempDir::new().unwrap();
    cchooks(&tmp)
        .arg("stop-once")
        .write_stdin(r#"{"hook_event_name":"Stop","session_id":"s1","stop_hook_active":true}"#)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn stop_with_malformed_payload_exits_0() {
    let tmp = TempDir::new().unwrap();
    cchooks(&tmp)
        .arg("stop-once")
        .write_stdin(r#"{"hook_event_name":"Stop","stop_hook_active":"maybe"}"#)
        .assert()
        .success()
        .stderr(predicate::str::contains("failed to parse StopEvent"));
}

#[test]
fn transcript_summary_on_first_stop() {
    let tmp = TempDir::new().unwrap();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r#"{{"type":"user","message":{{"role":"user","content":"hello"}}}}"#).unwrap();
    writeln!(
        file,
        r#"{{"type":"assistant","message":{{"role":"assistant","content":[{{"type":"tool_use","id":"t","name":"Bash","input":{{}}}}]}}}}"#
    )
    .unwrap();
    file.flush().unwrap();

    let payload = json!({
        "hook_event_name": "Stop",
        "session_id": "s1",
        "stop_hook_active": false,
        "transcript_path": file.path()
    });
    cchooks(&tmp)
        .arg("transcript")
        .write_stdin(payload.to_string())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "1 user messages, 1 assistant messages, 1 tool uses",
        ));
}

// ---------------------------------------------------------------------------
// debug
// ---------------------------------------------------------------------------

#[test]
fn debug_logs_to_stderr_only() {
    let tmp = TempDir::new().unwrap();
    cchooks(&tmp)
        .arg("debug")
        .env("CCHOOKS_LOG", "info")
        .write_stdin(r#"{"hook_event_name":"Notification","session_id":"s1","message":"idle"}"#)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("raw payload"));
}

#[test]
fn debug_error_callback_keeps_default_policy() {
    let tmp = TempDir::new().unwrap();
    cchooks(&tmp)
        .arg("debug")
        .write_stdin("garbage")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to decode stdin"));
}
