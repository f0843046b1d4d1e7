use std::io::Write;
use std::process::Command;

fn winmover() -> Command {
    Command::new(env!("CARGO_BIN_EXE_winmover"))
}

#[test]
fn help_exits_successfully() {
    // Arrange
    let mut cmd = winmover();
    cmd.arg("--help");

    // Act
    let output = cmd.output().expect("failed to execute winmover");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("virtual desktops"));
}

#[test]
fn version_exits_successfully() {
    // Arrange
    let mut cmd = winmover();
    cmd.arg("--version");

    // Act
    let output = cmd.output().expect("failed to execute winmover");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("winmover"));
}

#[test]
fn help_hides_run_file() {
    // Arrange
    let mut cmd = winmover();
    cmd.arg("--help");

    // Act
    let output = cmd.output().expect("failed to execute winmover");

    // Assert
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("run"));
    assert!(!stdout.contains("run-file"));
}

#[test]
fn move_requires_screen() {
    // Arrange
    let mut cmd = winmover();
    cmd.args(["move", "--process", "notepad"]);

    // Act
    let output = cmd.output().expect("failed to execute winmover");

    // Assert
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--screen"));
}

#[test]
fn title_filter_requires_process() {
    // Arrange
    let mut cmd = winmover();
    cmd.args(["desktop", "--name", "work", "--title", "Inbox"]);

    // Act
    let output = cmd.output().expect("failed to execute winmover");

    // Assert
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--process"));
}

#[test]
fn move_rejects_conflicting_resize_modes() {
    // Arrange
    let mut cmd = winmover();
    cmd.args(["move", "--screen", "A|B|C", "--maximize", "--minimize"]);

    // Act
    let output = cmd.output().expect("failed to execute winmover");

    // Assert
    assert!(!output.status.success());
}

#[test]
fn invoke_rejects_malformed_settings() {
    // Arrange
    let mut cmd = winmover();
    cmd.args(["invoke", "--settings-json", "{not json"]);

    // Act
    let output = cmd.output().expect("failed to execute winmover");

    // Assert
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid settings"));
}

#[test]
fn run_file_fails_on_malformed_bundle() {
    // Arrange
    let mut bundle = tempfile::NamedTempFile::new().expect("create temp file");
    writeln!(bundle, "screen = [unterminated").expect("write bundle");
    let mut cmd = winmover();
    cmd.arg("run-file").arg(bundle.path());

    // Act
    let output = cmd.output().expect("failed to execute winmover");

    // Assert
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
}
