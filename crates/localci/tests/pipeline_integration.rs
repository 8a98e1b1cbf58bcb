//! Integration tests: parse a definition from disk, then run it.

use localci::{parse_file, Dialect, Executor, RunOptions, SkipSet, StepFailure};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

fn write_yaml(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).expect("create yaml");
    file.write_all(content.as_bytes()).expect("write yaml");
    path
}

fn executor() -> Executor<Vec<u8>> {
    Executor::new(
        RunOptions {
            step_delay: Duration::ZERO,
            ..RunOptions::default()
        },
        Vec::new(),
    )
}

/// Test: a GitLab pipeline of no-op commands runs to success
#[tokio::test]
async fn test_noop_gitlab_pipeline_succeeds() {
    let dir = tempfile::tempdir().expect("tempdir");
    let yaml = r#"
stages: [build, test]
compile:
  stage: build
  script:
    - "true"
    - "true"
unit:
  stage: test
  script:
    - "true"
"#;
    let path = write_yaml(dir.path(), ".gitlab-ci.yml", yaml);

    let pipeline = parse_file(Dialect::GitLab, &path).expect("parse failed");
    assert_eq!(pipeline.stage_names(), vec!["build", "test"]);

    let summary = executor()
        .run(&pipeline, &SkipSet::new())
        .await
        .expect("pipeline should succeed");
    assert_eq!(summary.stages_run, 2);
    assert_eq!(summary.steps_run, 3);
}

/// Test: a failing step halts the run before later steps
#[tokio::test]
async fn test_failure_halts_before_later_steps() {
    let dir = tempfile::tempdir().expect("tempdir");
    let sentinel = dir.path().join("sentinel");
    let yaml = format!(
        r#"
jobs:
  build:
    steps:
      - name: Prepare
        run: "true"
      - name: Break
        run: "false"
      - name: Never
        run: touch '{0}'
  deploy:
    steps:
      - name: Also never
        run: touch '{0}'
"#,
        sentinel.display()
    );
    let path = write_yaml(dir.path(), "ci.yml", &yaml);

    let pipeline = parse_file(Dialect::GitHub, &path).expect("parse failed");
    let err = executor()
        .run(&pipeline, &SkipSet::new())
        .await
        .expect_err("pipeline should fail");

    assert_eq!(err.stage, "build");
    assert_eq!(err.step, "Break");
    assert!(matches!(err.source, StepFailure::Exit(_)));
    assert!(!sentinel.exists(), "later steps must not run");
}

/// Test: steps of a skipped stage never execute, wherever it sits
#[tokio::test]
async fn test_skipped_stage_never_executes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let first = dir.path().join("first");
    let middle = dir.path().join("middle");
    let last = dir.path().join("last");
    let yaml = format!(
        r#"
stages: [first, middle, last]
a:
  stage: first
  script: ["touch '{}'"]
b:
  stage: middle
  script: ["touch '{}'"]
c:
  stage: last
  script: ["touch '{}'"]
"#,
        first.display(),
        middle.display(),
        last.display()
    );
    let path = write_yaml(dir.path(), ".gitlab-ci.yml", &yaml);
    let pipeline = parse_file(Dialect::GitLab, &path).expect("parse failed");

    let summary = executor()
        .run(&pipeline, &SkipSet::parse("first,last"))
        .await
        .expect("pipeline should succeed");

    assert_eq!(summary.stages_skipped, 2);
    assert!(!first.exists());
    assert!(middle.exists());
    assert!(!last.exists());
}

/// Test: unreadable file surfaces a read error and nothing runs
#[tokio::test]
async fn test_missing_file_is_read_error() {
    let err = parse_file(Dialect::GitHub, Path::new("/nonexistent/ci.yml")).unwrap_err();
    assert!(matches!(err, localci::ParseError::Read { .. }));
}

/// Test: spawn failure is reported like any other step failure
#[tokio::test]
async fn test_missing_shell_fails_first_step() {
    let pipeline = Dialect::GitLab
        .parse(b"build:\n  script: [make]\n")
        .expect("parse failed");

    let mut executor = Executor::new(
        RunOptions {
            shell: "/nonexistent-shell-that-does-not-exist".to_string(),
            step_delay: Duration::ZERO,
        },
        Vec::new(),
    );
    let err = executor
        .run(&pipeline, &SkipSet::new())
        .await
        .expect_err("pipeline should fail");

    assert_eq!(err.stage, "default");
    assert_eq!(err.step, "make");
    assert!(matches!(err.source, StepFailure::Spawn(_)));
}
