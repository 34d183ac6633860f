use std::io::Write;

use assert_cmd::Command;
use predicates::str::contains;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("ects-planner").unwrap();
    cmd.env_remove("ECTS_TRANSCRIPT")
        .env_remove("ECTS_MAX_CANCELLED_CREDITS")
        .env_remove("ECTS_CATEGORIES");
    cmd
}

fn transcript_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn list_prints_demo_transcript() {
    cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("Subject: Physik (ID: 4, Grade: 2.7, Credits: 5, Category: nawi)"))
        .stdout(contains("Subject: Industrie Praktikum (ID: 29, Grade: ungraded, Credits: 12, Category: none)"));
}

#[test]
fn stats_prints_totals() {
    cmd()
        .arg("stats")
        .assert()
        .success()
        .stdout(contains("Subjects: 30"))
        .stdout(contains("Total credits: 180"))
        .stdout(contains("ECTS-weighted average: 1.53"));
}

#[test]
fn optimize_demo_transcript() {
    cmd()
        .arg("optimize")
        .assert()
        .success()
        .stdout(contains("New ECTS-weighted average: 1.41"))
        .stdout(contains("Cancelled credits: 13"))
        .stdout(contains("Physik (grade 2.7, 5 credits, nawi)"))
        .stdout(contains("Improvement: 0.12 grade points"));
}

#[test]
fn optimize_json_reports_status() {
    cmd()
        .args(["--json", "optimize"])
        .assert()
        .success()
        .stdout(contains("\"status\": \"optimized\""))
        .stdout(contains("\"cancelled_credits\": 13"));
}

#[test]
fn optimize_csv_transcript() {
    let file = transcript_file(
        "name,grade,credits,category\n\
         A,2.0,10,x\n\
         B,5.0,5,x\n\
         C,1.0,5,y\n",
    );
    cmd()
        .args(["optimize", "--categories", "x,y", "--csv"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(contains("New ECTS-weighted average: 1.67"))
        .stdout(contains("  - B (grade 5.0, 5 credits, x)"));
}

#[test]
fn budget_comes_from_environment() {
    cmd()
        .env("ECTS_MAX_CANCELLED_CREDITS", "0")
        .arg("optimize")
        .assert()
        .success()
        .stdout(contains("Cancelled credits: 0"))
        .stdout(contains("Improvement: 0.00 grade points"));
}

#[test]
fn ungraded_transcript_has_nothing_to_cancel() {
    let file = transcript_file(
        "name,grade,credits,category\n\
         Lab,,3,iwi\n\
         Internship,,12,\n",
    );
    cmd()
        .args(["optimize", "--csv"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(contains("No cancellable graded subjects found."));
}

#[test]
fn invalid_subject_fails_with_context() {
    let file = transcript_file("name,grade,credits,category\nBroken,2.0,0,iwi\n");
    cmd()
        .args(["list", "--csv"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(contains("failed to load transcript"))
        .stderr(contains("invalid subject on line 2"));
}

#[test]
fn duplicate_categories_are_rejected() {
    cmd()
        .args(["optimize", "--categories", "wiwi,wiwi"])
        .assert()
        .failure()
        .stderr(contains("invalid cancellation settings"));
}

#[test]
fn listing_ignores_cancellation_settings() {
    cmd()
        .args(["list", "--categories", "wiwi,wiwi"])
        .assert()
        .success()
        .stdout(contains("Subject: Bachelorarbeit (ID: 30, Grade: 1.0, Credits: 12, Category: none)"));
}

#[test]
fn report_written_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.md");
    cmd()
        .args(["report", "--out"])
        .arg(&out)
        .assert()
        .success()
        .stdout(contains("Report written to"));

    let report = std::fs::read_to_string(&out).unwrap();
    assert!(report.contains("# ECTS Cancellation Report"));
    assert!(report.contains("Generated for demo transcript"));
    assert!(report.contains("- New weighted average: 1.41"));
}
