//! End-to-end tests for the session command

mod common;

use common::TestProject;
use predicates::prelude::*;

#[test]
fn test_session_with_explicit_paths_prints_wiring() {
    let project = TestProject::new();
    project.write_file("firefox", "binary");
    project.write_file("tps.xpi", "addon");
    // Keep the driver runnable on any machine
    project.write_file(
        "upkeep.yaml",
        "session:\n  browser_url: \"http://127.0.0.1:1/build.tar\"\n  addon_url: \"http://127.0.0.1:1/tps.xpi\"\n  driver_program: \"true\"\n",
    );

    let browser = project.root.join("firefox");
    let addon = project.root.join("tps.xpi");

    project
        .upkeep()
        .arg("session")
        .arg("--browser")
        .arg(&browser)
        .arg("--addon")
        .arg(&addon)
        .assert()
        .success()
        .stdout(predicate::str::contains("browser:"))
        .stdout(predicate::str::contains("profile:"))
        .stdout(predicate::str::contains("browser.source = provided"))
        .stdout(predicate::str::contains("addon.source = provided"));
}

#[test]
fn test_session_profile_is_written() {
    let project = TestProject::new();
    project.write_file("firefox", "binary");
    project.write_file("tps.xpi", "addon");
    project.write_file(
        "upkeep.yaml",
        "session:\n  browser_url: \"http://127.0.0.1:1/build.tar\"\n  addon_url: \"http://127.0.0.1:1/tps.xpi\"\n  driver_program: \"true\"\n",
    );

    let output = project
        .upkeep()
        .arg("session")
        .arg("--browser")
        .arg(project.root.join("firefox"))
        .arg("--addon")
        .arg(project.root.join("tps.xpi"))
        .output()
        .expect("Failed to run upkeep session");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let profile_line = stdout
        .lines()
        .find(|line| line.trim_start().starts_with("profile:"))
        .expect("No profile line in output");
    let profile_path = profile_line.split_once("profile:").unwrap().1.trim();

    let user_js = std::fs::read_to_string(std::path::Path::new(profile_path).join("user.js"))
        .expect("Failed to read user.js");
    assert!(user_js.contains("services.sync.log.logger"));
    assert!(user_js.contains("tps.seconds_since_epoch"));
    assert!(std::path::Path::new(profile_path)
        .join("extensions/tps.xpi")
        .exists());

    // The session work dir is a keeper; clean it up ourselves.
    if let Some(work_dir) = std::path::Path::new(profile_path).parent() {
        let _ = std::fs::remove_dir_all(work_dir);
    }
}
