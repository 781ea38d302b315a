//! CLI integration tests

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn notify_cli_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_notify-cli"));
    cmd.env_remove("TELEGRAM_BOT_TOKEN")
        .env_remove("TELEGRAM_CHAT_ID")
        .env_remove("RUST_LOG")
        .env("NOTIFY_CLI_CONFIG", "/nonexistent/notify-cli/config.toml");
    cmd
}

/// Write a config file and point the command at it
fn with_config(cmd: &mut Command, dir: &TempDir, content: &str) {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content).expect("write config");
    cmd.env("NOTIFY_CLI_CONFIG", Path::new(&path));
}

#[test]
fn help_output() {
    notify_cli_bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("local"))
        .stdout(predicate::str::contains("telegram"))
        .stdout(predicate::str::contains("--verbose"));
}

#[test]
fn version_output() {
    notify_cli_bin()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(concat!(
            "notify-cli version ",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn missing_subcommand_is_usage_error() {
    notify_cli_bin()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("subcommand"));
}

#[test]
fn local_help_lists_options() {
    notify_cli_bin()
        .args(["local", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--title"))
        .stdout(predicate::str::contains("--body"))
        .stdout(predicate::str::contains("--topic"))
        .stdout(predicate::str::contains("--image-url"))
        .stdout(predicate::str::contains("--bot-token").not());
}

#[test]
fn telegram_help_hides_credential_values() {
    notify_cli_bin()
        .env("TELEGRAM_BOT_TOKEN", "999:super-secret")
        .args(["telegram", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--bot-token"))
        .stdout(predicate::str::contains("--chat-id"))
        .stdout(predicate::str::contains("super-secret").not());
}

#[test]
fn local_requires_title_and_body() {
    notify_cli_bin()
        .args(["local", "--body", "only body"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--title"));
}

#[test]
fn telegram_requires_credentials() {
    notify_cli_bin()
        .args(["telegram", "-t", "T", "-b", "B"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--bot-token"));
}

#[cfg(all(unix, not(target_os = "macos")))]
#[test]
fn local_send_with_stub_notifier() {
    let dir = TempDir::new().unwrap();
    let mut cmd = notify_cli_bin();
    with_config(&mut cmd, &dir, "[local]\nbinary = \"true\"\n");

    cmd.args(["local", "-t", "Build", "-b", "passed", "-p", "ci"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NOTIFICATION DETAILS"))
        .stdout(predicate::str::contains(" Topic            : ci"))
        .stderr(predicate::str::contains("sent via local"));
}

#[cfg(all(unix, not(target_os = "macos")))]
#[test]
fn failed_delivery_still_exits_zero() {
    let dir = TempDir::new().unwrap();
    let mut cmd = notify_cli_bin();
    with_config(&mut cmd, &dir, "[local]\nbinary = \"false\"\n");

    cmd.args(["local", "-t", "Build", "-b", "failed"])
        .assert()
        .success()
        .stderr(predicate::str::contains("exited abnormally with status 1"));
}

#[test]
fn missing_notifier_binary_is_reported() {
    let dir = TempDir::new().unwrap();
    let mut cmd = notify_cli_bin();
    with_config(
        &mut cmd,
        &dir,
        "[local]\nbinary = \"notify-cli-no-such-notifier\"\n",
    );

    cmd.args(["local", "-t", "T", "-b", "B"])
        .assert()
        .success()
        .stderr(
            predicate::str::contains("Failed to start notify-cli-no-such-notifier")
                .or(predicate::str::contains("unavailable on this platform")),
        );
}

#[test]
fn empty_credentials_are_reported_without_echo() {
    notify_cli_bin()
        .args(["telegram", "-t", "T", "-b", "B", "-k", "", "-c", ""])
        .assert()
        .success()
        .stdout(predicate::str::contains(" Bot Token        : <not set>"))
        .stderr(predicate::str::contains("Missing credentials"));
}

#[test]
fn broken_config_warns_and_continues() {
    let dir = TempDir::new().unwrap();
    let mut cmd = notify_cli_bin();
    with_config(&mut cmd, &dir, "[telegram\n");

    cmd.args(["telegram", "-t", "T", "-b", "B", "-k", "", "-c", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Failed to parse config file"))
        .stderr(predicate::str::contains("ignoring config file"));
}

#[test]
fn help_and_version_skip_the_config_file() {
    let dir = TempDir::new().unwrap();
    for flag in ["--help", "--version"] {
        let mut cmd = notify_cli_bin();
        with_config(&mut cmd, &dir, "[telegram\n");

        cmd.arg(flag)
            .assert()
            .success()
            .stderr(predicate::str::contains("config file").not());
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn telegram_send_against_stub_server() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot42:tok/sendMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut cmd = notify_cli_bin();
    with_config(
        &mut cmd,
        &dir,
        &format!("[telegram]\napi_base_url = \"{}\"\n", server.uri()),
    );

    // Blocking run; the stub server keeps serving on another worker
    cmd.env("TELEGRAM_BOT_TOKEN", "42:tok")
        .args(["telegram", "-t", "Deploy", "-b", "done", "-c", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains(" Bot Token        : <provided>"))
        .stdout(predicate::str::contains("42:tok").not())
        .stderr(predicate::str::contains("sent via telegram"));
}
