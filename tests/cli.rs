use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Run the binary in an empty directory with no credentials and an unreachable API
fn harvest(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("harvest").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("YOUTUBE_API_KEY")
        .env("YOUTUBE_API_BASE_URL", "http://127.0.0.1:9/youtube/v3/")
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn test_missing_api_key_fails_before_network() {
    let dir = TempDir::new().unwrap();

    harvest(&dir)
        .args(["--handle", "@KamFIT24", "--start", "2025-04-01", "--end", "2025-07-01", "-q"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YOUTUBE_API_KEY environment variable not set"))
        .stderr(predicate::str::contains("Request to").not());

    assert!(!dir.path().join("output").exists());
}

#[test]
fn test_api_key_from_dotenv_file_is_picked_up() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".env"), "YOUTUBE_API_KEY=from-dotenv\n").unwrap();

    // With a key present the run gets past configuration and fails on the dead endpoint
    harvest(&dir)
        .args(["--handle", "@KamFIT24", "--start", "2025-04-01", "--end", "2025-07-01", "-q"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YOUTUBE_API_KEY").not())
        .stderr(predicate::str::contains("Could not resolve channel handle"));
}

#[test]
fn test_inverted_range_is_rejected() {
    let dir = TempDir::new().unwrap();

    harvest(&dir)
        .env("YOUTUBE_API_KEY", "k")
        .args(["--handle", "@KamFIT24", "--start", "2025-07-01", "--end", "2025-04-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is after end date"));
}

#[test]
fn test_malformed_date_is_usage_error() {
    let dir = TempDir::new().unwrap();

    harvest(&dir)
        .args(["--handle", "@KamFIT24", "--start", "April", "--end", "2025-07-01"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("expected YYYY-MM-DD"));
}

#[test]
fn test_help_lists_flags() {
    let dir = TempDir::new().unwrap();

    harvest(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--handle"))
        .stdout(predicate::str::contains("--start"))
        .stdout(predicate::str::contains("--end"));
}
