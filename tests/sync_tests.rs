//! End-to-end tests for the upstream file sync

mod common;

use common::TestProject;
use httpmock::prelude::*;
use predicates::prelude::*;

fn sync_config(server: &MockServer, files: &[&str]) -> String {
    let mut yaml = format!(
        "sync:\n  remote_base: \"{}/raw/\"\n  target_dir: vendor\n  files:\n",
        server.base_url()
    );
    for file in files {
        yaml.push_str(&format!("    - \"{}\"\n", file));
    }
    yaml
}

#[test]
fn test_sync_adopts_and_reports_new_files() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/raw/toolkit/One.mjs");
        then.status(200).body("one");
    });
    server.mock(|when, then| {
        when.method(GET).path("/raw/toolkit/shared/Two.mjs");
        then.status(200).body("two");
    });

    let project = TestProject::new();
    project.write_file(
        "upkeep.yaml",
        &sync_config(&server, &["toolkit/One.mjs", "toolkit/shared/Two.mjs"]),
    );

    project
        .upkeep()
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 new"));

    assert_eq!(project.read_file("vendor/One.mjs"), "one");
    // Remote paths flatten to their basename
    assert_eq!(project.read_file("vendor/Two.mjs"), "two");
}

#[test]
fn test_sync_is_idempotent() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/raw/toolkit/One.mjs");
        then.status(200).body("stable");
    });

    let project = TestProject::new();
    project.write_file("upkeep.yaml", &sync_config(&server, &["toolkit/One.mjs"]));

    project.upkeep().arg("sync").assert().success();
    project
        .upkeep()
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 unchanged"))
        .stdout(predicate::str::contains("0 updated"));
}

#[test]
fn test_sync_overwrites_stale_copy() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/raw/toolkit/One.mjs");
        then.status(200).body("fresh");
    });

    let project = TestProject::new();
    project.write_file("upkeep.yaml", &sync_config(&server, &["toolkit/One.mjs"]));
    project.write_file("vendor/One.mjs", "stale");

    project
        .upkeep()
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 updated"));
    assert_eq!(project.read_file("vendor/One.mjs"), "fresh");
}

#[test]
fn test_sync_http_error_is_fatal() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/raw/toolkit/Missing.mjs");
        then.status(404);
    });

    let project = TestProject::new();
    project.write_file(
        "upkeep.yaml",
        &sync_config(&server, &["toolkit/Missing.mjs", "toolkit/Never.mjs"]),
    );

    project
        .upkeep()
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("404"));

    // The batch stopped; the second file was never requested or written.
    assert!(!project.file_exists("vendor/Never.mjs"));
}
