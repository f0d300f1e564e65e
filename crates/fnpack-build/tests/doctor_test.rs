use std::path::Path;

use fnpack_build::{
    CheckResult, Doctor, Invocation, ProcessError, ProcessOutput, ProcessRunner, Stage,
};
use fnpack_core::{FnpackConfig, Language};
use mockall::mock;

mock! {
    Runner {}

    impl ProcessRunner for Runner {
        async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ProcessError>;
    }
}

fn version(stdout: &str) -> Result<ProcessOutput, ProcessError> {
    Ok(ProcessOutput {
        stdout: stdout.to_owned(),
        stderr: String::new(),
    })
}

fn not_found(program: &str) -> Result<ProcessOutput, ProcessError> {
    Err(ProcessError::NotFound {
        program: program.to_owned(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
    })
}

#[tokio::test]
async fn doctor_all_tools_present() {
    let mut mock = MockRunner::new();
    mock.expect_run()
        .withf(|inv| inv.program == "yarn" && inv.args == ["--version"])
        .returning(|_| version("1.22.19\n"));
    mock.expect_run()
        .withf(|inv| inv.program == "tsc")
        .returning(|_| version("Version 5.4.5\n"));
    mock.expect_run()
        .withf(|inv| inv.program == "zip" && inv.args == ["-h"])
        .returning(|_| version("\nCopyright (c) 1990-2008 Info-ZIP\n"));
    mock.expect_run()
        .withf(|inv| ["rm", "xargs", "touch"].contains(&inv.program.as_str()))
        .times(3)
        .returning(|_| version("GNU coreutils 9.4\n"));

    let doctor = Doctor::with_runner(mock);
    let mut report = doctor
        .check(&FnpackConfig::default(), Language::Compiled, Path::new("."))
        .await;
    report.config_file = CheckResult::ok("defaults");

    assert!(report.all_passed());
    let stages: Vec<Stage> = report.tools.iter().map(|t| t.stage).collect();
    assert_eq!(
        stages,
        vec![
            Stage::Clean,
            Stage::Install,
            Stage::Compile,
            Stage::Normalize,
            Stage::Normalize,
            Stage::Bundle
        ]
    );
    let yarn = &report.tools[1];
    assert_eq!(yarn.program, "yarn");
    assert_eq!(yarn.result.detail, "1.22.19");
    let zip = &report.tools[5];
    assert_eq!(zip.result.detail, "Copyright (c) 1990-2008 Info-ZIP");
}

#[tokio::test]
async fn doctor_skips_compiler_for_interpreted() {
    let mut mock = MockRunner::new();
    mock.expect_run()
        .withf(|inv| inv.program == "tsc")
        .times(0)
        .returning(|_| version("Version 5.4.5\n"));
    mock.expect_run()
        .withf(|inv| inv.program != "tsc")
        .times(5)
        .returning(|_| version("ok\n"));

    let doctor = Doctor::with_runner(mock);
    let report = doctor
        .check(&FnpackConfig::default(), Language::Interpreted, Path::new("."))
        .await;

    assert!(report.tools.iter().all(|t| t.stage != Stage::Compile));
}

#[tokio::test]
async fn doctor_reports_missing_installer() {
    let mut mock = MockRunner::new();
    mock.expect_run()
        .withf(|inv| inv.program == "yarn")
        .returning(|_| not_found("yarn"));
    mock.expect_run()
        .withf(|inv| inv.program != "yarn")
        .returning(|_| version("ok\n"));

    let doctor = Doctor::with_runner(mock);
    let mut report = doctor
        .check(&FnpackConfig::default(), Language::Compiled, Path::new("."))
        .await;
    report.config_file = CheckResult::ok("defaults");

    assert!(!report.all_passed());
    let yarn = report.tools.iter().find(|t| t.program == "yarn").unwrap();
    assert!(!yarn.result.passed);
    assert!(yarn.result.detail.contains("not found"));

    let rendered = report.to_string();
    assert!(rendered.contains("NG"));
    assert!(rendered.contains("yarn"));
}
