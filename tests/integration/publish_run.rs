use std::{
    fs,
    time::{Duration, Instant},
};

use batch_publish::publish::{run_publish, FailureStage};
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;

use crate::common::{context, invocations, mock_settings, write_profile, zip_entries};

#[tokio::test]
async fn packaging_zips_top_level_files_without_debug_symbols() {
    let project = tempdir().expect("project dir");
    let output = tempdir().expect("output dir");
    write_profile(project.path(), "app", "linux-x64");
    let mut ctx = context(project.path(), output.path());
    ctx.package = true;

    let summary = run_publish(&ctx, &mock_settings(), CancellationToken::new())
        .await
        .expect("run completes");

    assert_eq!(summary.profiles_found, 1);
    assert!(summary.failed.is_empty(), "failures: {:?}", summary.failed);
    let archive = output.path().join("linux-x64.zip");
    assert_eq!(zip_entries(&archive), vec!["app.dll"]);

    let outcome = summary.succeeded[0]
        .archive
        .as_ref()
        .expect("archive outcome recorded");
    assert_eq!(outcome.archive_path, archive);
    assert_eq!(outcome.entries, 1);
    assert_eq!(outcome.sha256.len(), 64);
    assert!(
        !output.path().join("tmp").exists(),
        "staging directory must be removed"
    );
}

#[tokio::test]
async fn two_profiles_package_into_two_archives() {
    let project = tempdir().expect("project dir");
    let output = tempdir().expect("output dir");
    write_profile(project.path(), "ProjA", "linux-x64");
    write_profile(project.path(), "ProjA", "win-x64");
    let mut ctx = context(project.path(), output.path());
    ctx.package = true;

    let summary = run_publish(&ctx, &mock_settings(), CancellationToken::new())
        .await
        .expect("run completes");

    assert_eq!(summary.succeeded.len(), 2);
    let mut produced: Vec<String> = fs::read_dir(output.path())
        .expect("output dir")
        .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().to_string())
        .collect();
    produced.sort();
    assert_eq!(produced, vec!["linux-x64.zip", "win-x64.zip"]);
}

#[tokio::test]
async fn debug_flag_keeps_symbol_files() {
    let project = tempdir().expect("project dir");
    let output = tempdir().expect("output dir");
    write_profile(project.path(), "app", "win-x64");
    let mut ctx = context(project.path(), output.path());
    ctx.package = true;
    ctx.include_debug = true;

    run_publish(&ctx, &mock_settings(), CancellationToken::new())
        .await
        .expect("run completes");

    assert_eq!(
        zip_entries(&output.path().join("win-x64.zip")),
        vec!["app.dll", "app.pdb"]
    );
}

#[tokio::test]
async fn without_packaging_output_stays_in_profile_directory() {
    let project = tempdir().expect("project dir");
    let output = tempdir().expect("output dir");
    write_profile(project.path(), "app", "osx-arm64");
    let ctx = context(project.path(), output.path());

    let summary = run_publish(&ctx, &mock_settings(), CancellationToken::new())
        .await
        .expect("run completes");

    assert_eq!(summary.succeeded.len(), 1);
    assert!(summary.succeeded[0].archive.is_none());
    let build_dir = output.path().join("osx-arm64");
    assert!(build_dir.join("app.dll").is_file());
    assert!(build_dir.join("runtimes").join("native.so").is_file());
    assert!(!output.path().join("osx-arm64.zip").exists());
}

#[tokio::test]
async fn failed_profile_does_not_stop_the_run() {
    let project = tempdir().expect("project dir");
    let output = tempdir().expect("output dir");
    write_profile(project.path(), "app", "a-fail");
    write_profile(project.path(), "app", "b-linux");
    let mut ctx = context(project.path(), output.path());
    ctx.package = true;

    let summary = run_publish(&ctx, &mock_settings(), CancellationToken::new())
        .await
        .expect("run completes");

    assert!(!summary.cancelled);
    assert_eq!(invocations(project.path()), vec!["a-fail", "b-linux"]);
    assert_eq!(summary.failed.len(), 1);
    let failure = &summary.failed[0];
    assert_eq!(failure.name, "a-fail");
    assert_eq!(failure.stage, FailureStage::Publish);
    assert_eq!(failure.exit_code, Some(3));
    assert!(!output.path().join("a-fail.zip").exists());
    assert!(output.path().join("b-linux.zip").is_file());
}

#[tokio::test]
async fn missing_build_output_is_an_archive_failure() {
    let project = tempdir().expect("project dir");
    let output = tempdir().expect("output dir");
    write_profile(project.path(), "app", "noout");
    let mut ctx = context(project.path(), output.path());
    ctx.package = true;

    let summary = run_publish(&ctx, &mock_settings(), CancellationToken::new())
        .await
        .expect("run completes");

    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].stage, FailureStage::Archive);
    assert!(!output.path().join("noout.zip").exists());
}

#[tokio::test]
async fn rerun_replaces_existing_archive() {
    let project = tempdir().expect("project dir");
    let output = tempdir().expect("output dir");
    write_profile(project.path(), "app", "linux-arm64");
    let archive = output.path().join("linux-arm64.zip");
    fs::write(&archive, b"stale archive").expect("stale archive");
    let mut ctx = context(project.path(), output.path());
    ctx.package = true;

    for _ in 0..2 {
        let summary = run_publish(&ctx, &mock_settings(), CancellationToken::new())
            .await
            .expect("run completes");
        assert_eq!(summary.succeeded.len(), 1);
        assert_eq!(zip_entries(&archive), vec!["app.dll"]);
    }
}

#[tokio::test]
async fn no_profiles_is_not_an_error() {
    let project = tempdir().expect("project dir");
    let output = tempdir().expect("output dir");
    let nested_output = output.path().join("publish");
    let ctx = context(project.path(), &nested_output);

    let summary = run_publish(&ctx, &mock_settings(), CancellationToken::new())
        .await
        .expect("run completes");

    assert_eq!(summary.profiles_found, 0);
    assert!(summary.succeeded.is_empty() && summary.failed.is_empty());
    assert!(nested_output.is_dir(), "output directory is still created");
    assert_eq!(
        fs::read_dir(&nested_output)
            .expect("output dir readable")
            .count(),
        0,
        "nothing is written under the output directory"
    );
    assert!(invocations(project.path()).is_empty());
}

#[tokio::test]
async fn log_file_captures_build_output() {
    let project = tempdir().expect("project dir");
    let output = tempdir().expect("output dir");
    write_profile(project.path(), "app", "linux-x64");
    write_profile(project.path(), "app", "z-fail");
    let mut ctx = context(project.path(), output.path());
    ctx.log = true;

    run_publish(&ctx, &mock_settings(), CancellationToken::new())
        .await
        .expect("run completes");

    let log = fs::read_to_string(output.path().join("linux-x64.log")).expect("log exists");
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.first().copied(), Some("Publishing linux-x64"));
    assert!(lines
        .last()
        .is_some_and(|line| line.starts_with("Published linux-x64 to ")));

    let failed_log = fs::read_to_string(output.path().join("z-fail.log")).expect("log exists");
    assert!(failed_log.contains("simulated build failure for z-fail"));
}

#[tokio::test]
async fn unwritable_log_does_not_fail_a_successful_build() {
    let project = tempdir().expect("project dir");
    let output = tempdir().expect("output dir");
    write_profile(project.path(), "app", "linux-x64");
    fs::create_dir(output.path().join("linux-x64.log")).expect("directory in place of log");
    let mut ctx = context(project.path(), output.path());
    ctx.package = true;
    ctx.log = true;

    let summary = run_publish(&ctx, &mock_settings(), CancellationToken::new())
        .await
        .expect("run completes");

    assert!(summary.failed.is_empty(), "failures: {:?}", summary.failed);
    assert_eq!(summary.succeeded.len(), 1);
    assert_eq!(
        zip_entries(&output.path().join("linux-x64.zip")),
        vec!["app.dll"]
    );
}

#[tokio::test]
async fn embedded_profiles_are_generated_then_removed() {
    let project = tempdir().expect("project dir");
    let output = tempdir().expect("output dir");
    let app_dir = project.path().join("app");
    fs::create_dir_all(&app_dir).expect("app dir");
    fs::write(app_dir.join("App.csproj"), "<Project />\n").expect("project file");
    let custom = write_profile(project.path(), "app", "linux-x64");
    fs::write(&custom, "<Project><!-- custom --></Project>\n").expect("custom profile");
    let mut ctx = context(project.path(), output.path());
    ctx.embedded = true;

    let summary = run_publish(&ctx, &mock_settings(), CancellationToken::new())
        .await
        .expect("run completes");

    assert_eq!(summary.profiles_found, 12);
    assert_eq!(summary.succeeded.len(), 12);
    assert_eq!(invocations(project.path()).len(), 12);

    let profile_dir = app_dir.join("Properties").join("PublishProfiles");
    let remaining: Vec<String> = fs::read_dir(&profile_dir)
        .expect("profile dir still exists")
        .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(remaining, vec!["linux-x64.pubxml"]);
    assert_eq!(
        fs::read_to_string(&custom).expect("custom profile kept"),
        "<Project><!-- custom --></Project>\n"
    );
}

#[tokio::test]
async fn embedded_without_project_files_finds_nothing() {
    let project = tempdir().expect("project dir");
    let output = tempdir().expect("output dir");
    let mut ctx = context(project.path(), output.path());
    ctx.embedded = true;

    let summary = run_publish(&ctx, &mock_settings(), CancellationToken::new())
        .await
        .expect("run completes");

    assert_eq!(summary.profiles_found, 0);
}

#[tokio::test]
async fn cancellation_kills_running_build_and_stops_the_run() {
    let project = tempdir().expect("project dir");
    let output = tempdir().expect("output dir");
    write_profile(project.path(), "app", "a-hang");
    write_profile(project.path(), "app", "b-linux");
    let mut ctx = context(project.path(), output.path());
    ctx.package = true;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let summary = run_publish(&ctx, &mock_settings(), cancel)
        .await
        .expect("run completes");

    assert!(summary.cancelled);
    assert!(
        started.elapsed() < Duration::from_secs(20),
        "hung build must be killed"
    );
    assert_eq!(invocations(project.path()), vec!["a-hang"]);
    assert!(summary.succeeded.is_empty());
    assert!(!output.path().join("b-linux.zip").exists());
}
