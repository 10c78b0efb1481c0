// Regression tests for the camd binary: exercises each subcommand end to
// end against a real project directory.
// Requires: assert_cmd, predicates, tempfile crates in [dev-dependencies]

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::TempDir;

fn camd() -> Command {
    Command::cargo_bin("camd").expect("camd binary builds")
}

fn coded_project() -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    camd()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();
    fs::write(
        dir.path().join("interview.md"),
        "Asked about the [morning routine](@time $habit).\n\
         Then a [note to self](^todo) at the end.\n",
    )
    .expect("write document");
    dir
}

#[test]
fn init_creates_project_files_and_reports_them() {
    let dir = tempfile::tempdir().expect("temp dir");
    camd()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(
            contains("camd.yaml")
                .and(contains("codebook.md"))
                .and(contains(".caignore")),
        );
    assert!(dir.path().join("camd.yaml").is_file());
}

#[test]
fn status_summarizes_tags_by_kind() {
    let dir = coded_project();
    camd()
        .current_dir(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(
            contains("1 file(s) scanned")
                .and(contains("context (@)"))
                .and(contains("content ($)"))
                .and(contains("meta (^)"))
                .and(contains("undocumented tags: $habit @time ^todo")),
        );
}

#[test]
fn tag_prints_every_section_with_positions() {
    let dir = coded_project();
    camd()
        .current_dir(dir.path())
        .arg("tag")
        .arg("@time")
        .assert()
        .success()
        .stdout(
            contains("From interview.md")
                .and(contains("Line 1"))
                .and(contains("Character Number 17"))
                .and(contains("[morning routine](@time $habit)")),
        );
}

#[test]
fn tag_handles_unknown_tags_gracefully() {
    let dir = coded_project();
    camd()
        .current_dir(dir.path())
        .arg("tag")
        .arg("@nowhere")
        .assert()
        .success()
        .stdout(contains("not coded anywhere"));
}

#[test]
fn add_tracks_a_file_and_narrows_status() {
    let dir = coded_project();
    fs::write(dir.path().join("scratch.md"), "[s](@scratch)\n").expect("write document");

    camd()
        .current_dir(dir.path())
        .arg("add")
        .arg("interview.md")
        .assert()
        .success()
        .stdout(contains("tracking interview.md"));

    camd()
        .current_dir(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(contains("1 file(s) scanned").and(contains("@time")));
}

#[test]
fn sync_appends_codebook_stubs() {
    let dir = coded_project();
    camd()
        .current_dir(dir.path())
        .arg("sync")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(contains("would append 3 codebook stub(s)"));

    camd()
        .current_dir(dir.path())
        .arg("sync")
        .assert()
        .success()
        .stdout(contains("appended 3 codebook stub(s)"));

    let codebook = fs::read_to_string(dir.path().join("codebook.md")).expect("read codebook");
    assert!(codebook.contains("# added by camd sync"));
    assert!(codebook.contains("@time"));

    camd()
        .current_dir(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(contains("undocumented tags").not());
}

#[test]
fn export_emits_parseable_json() {
    let dir = coded_project();
    let output = camd()
        .current_dir(dir.path())
        .arg("export")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON report");
    let rows = report.as_array().expect("a report array");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["tag"], "$habit");
    assert_eq!(rows[0]["kind"], "content");
    assert_eq!(rows[0]["sections"][0]["file"], "interview.md");
    assert_eq!(rows[0]["sections"][0]["line"], 1);
}

#[test]
fn export_can_write_yaml_to_a_file() {
    let dir = coded_project();
    camd()
        .current_dir(dir.path())
        .arg("export")
        .arg("--format")
        .arg("yaml")
        .arg("--output")
        .arg("report.yaml")
        .assert()
        .success()
        .stdout(contains("report written to report.yaml"));

    let body = fs::read_to_string(dir.path().join("report.yaml")).expect("read report");
    assert!(body.contains("@time"), "report should mention @time: {body}");
    assert!(body.contains("kind: meta"));
}

#[test]
fn cli_reports_miette_diagnostics_outside_a_project() {
    let dir = tempfile::tempdir().expect("temp dir");
    camd()
        .current_dir(dir.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(
            contains("camd::project::not_a_project")
                .or(contains("not inside a camd project"))
                .or(contains("help:")),
        );
}
