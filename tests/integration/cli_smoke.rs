use std::{
    fs,
    path::Path,
    process::{Command, Output},
};

use tempfile::tempdir;

use crate::common::{mock_dotnet, write_profile, zip_entries, BINARY_PATH};

fn run_binary(args: &[&str], cwd: &Path) -> Output {
    Command::new(BINARY_PATH)
        .args(args)
        .current_dir(cwd)
        .env_remove("BATCH_PUBLISH_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("binary should start")
}

fn write_mock_settings(dir: &Path) -> String {
    let path = dir.join("settings.toml");
    let body = format!(
        "[dotnet]\npath = \"{}\"\n\n[package]\ndebug_extensions = [\"pdb\"]\n",
        mock_dotnet().display()
    );
    fs::write(&path, body).expect("settings file");
    path.display().to_string()
}

#[test]
fn version_flag_prints_name_and_version() {
    let cwd = tempdir().expect("cwd");
    let output = run_binary(&["--version"], cwd.path());

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        format!(
            "Batch Publish and Package .Net Projects v{}",
            env!("CARGO_PKG_VERSION")
        )
    );
}

#[test]
fn empty_project_reports_no_profiles_and_succeeds() {
    let project = tempdir().expect("project dir");
    let settings_dir = tempdir().expect("settings dir");
    let settings = write_mock_settings(settings_dir.path());
    let project_arg = project.path().display().to_string();

    let output = run_binary(
        &["-p", &project_arg, "-o", &project_arg, "--config", &settings],
        project.path(),
    );

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("No publish profiles found in"),
        "stderr: {stderr}"
    );
    assert!(stderr.contains(&project_arg), "stderr: {stderr}");
}

#[test]
fn package_run_writes_archive_next_to_cwd() {
    let project = tempdir().expect("project dir");
    let settings_dir = tempdir().expect("settings dir");
    let settings = write_mock_settings(settings_dir.path());
    write_profile(project.path(), "app", "linux-x64");
    write_profile(project.path(), "app", "win-fail");

    let output = run_binary(&["-c", "--config", &settings], project.path());

    assert!(
        output.status.success(),
        "per-profile failures keep a zero exit status"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Processing 2 profiles."), "stdout: {stdout}");
    assert!(stdout.contains("Publishing linux-x64"), "stdout: {stdout}");
    assert!(stdout.contains("Done!"), "stdout: {stdout}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Failed to publish win-fail"),
        "stderr: {stderr}"
    );
    assert_eq!(
        zip_entries(&project.path().join("linux-x64.zip")),
        vec!["app.dll"]
    );
}

#[test]
fn project_settings_file_is_picked_up() {
    let project = tempdir().expect("project dir");
    let output_dir = tempdir().expect("output dir");
    let settings = write_mock_settings(project.path());
    fs::rename(&settings, project.path().join("batch-publish.toml")).expect("rename settings");
    write_profile(project.path(), "app", "osx-x64");
    let project_arg = project.path().display().to_string();
    let output_arg = output_dir.path().display().to_string();

    let output = run_binary(&["-p", &project_arg, "-o", &output_arg], output_dir.path());

    assert!(output.status.success());
    assert!(output_dir.path().join("osx-x64").join("app.dll").is_file());
}

#[test]
fn missing_settings_file_fails_startup() {
    let project = tempdir().expect("project dir");
    let missing = project.path().join("absent.toml").display().to_string();

    let output = run_binary(&["--config", &missing], project.path());

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not exist"), "stderr: {stderr}");
}
