use std::fmt;
use std::path::Path;

use fnpack_core::{FnpackConfig, Language};

use crate::runner::{Invocation, ProcessRunner, TokioRunner};
use crate::stage::Stage;

/// Probes the external tools a pipeline run depends on.
pub struct Doctor<R: ProcessRunner = TokioRunner> {
    runner: R,
}

impl Doctor<TokioRunner> {
    pub fn new() -> Self {
        Self {
            runner: TokioRunner,
        }
    }
}

impl Default for Doctor<TokioRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ProcessRunner> Doctor<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    /// Run every probe without early return.
    ///
    /// The compiler is only probed for compiled languages, matching which
    /// stages the pipeline would actually run.
    pub async fn check(
        &self,
        config: &FnpackConfig,
        language: Language,
        dir: &Path,
    ) -> DoctorReport {
        let mut probes: Vec<(Stage, &str, &str)> = vec![
            (Stage::Clean, "rm", "--version"),
            (
                Stage::Install,
                first_word(&config.toolchain.installer),
                "--version",
            ),
        ];
        if language.requires_compile() {
            probes.push((
                Stage::Compile,
                first_word(&config.toolchain.compiler),
                "--version",
            ));
        }
        probes.push((Stage::Normalize, "xargs", "--version"));
        probes.push((Stage::Normalize, "touch", "--version"));
        // `zip -v` reads stdin when it is not a terminal; `-h` is safe.
        probes.push((Stage::Bundle, config.toolchain.archiver.as_str(), "-h"));

        let mut report = DoctorReport::default();
        for (stage, program, flag) in probes {
            let result = self.probe(program, flag, dir).await;
            report.tools.push(ToolCheck {
                stage,
                program: program.to_owned(),
                result,
            });
        }
        report
    }

    async fn probe(&self, program: &str, flag: &str, dir: &Path) -> CheckResult {
        if program.is_empty() {
            return CheckResult::fail("no command configured");
        }
        let invocation = Invocation::new(program, dir).arg(flag);
        match self.runner.run(&invocation).await {
            Ok(output) => match first_line(&output.stdout).or_else(|| first_line(&output.stderr)) {
                Some(version) => CheckResult::ok(version),
                None => CheckResult::ok("available"),
            },
            Err(e) => CheckResult::fail(&e.to_string()),
        }
    }
}

fn first_word(command: &[String]) -> &str {
    match command.first() {
        Some(program) => program,
        None => "",
    }
}

fn first_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|l| !l.is_empty())
}

// ── Report types ──

#[derive(Debug, Default)]
pub struct DoctorReport {
    pub tools: Vec<ToolCheck>,
    pub config_file: CheckResult,
}

impl DoctorReport {
    pub fn all_passed(&self) -> bool {
        self.config_file.passed && self.tools.iter().all(|t| t.result.passed)
    }
}

impl fmt::Display for DoctorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "fnpack doctor")?;
        writeln!(f, "─────────────")?;
        writeln!(
            f,
            "{:<12}{:<4} {}",
            "fnpack.toml",
            self.config_file.icon(),
            self.config_file.detail
        )?;
        for tool in &self.tools {
            writeln!(
                f,
                "{:<12}{:<4} {} ({})",
                tool.stage.name(),
                tool.result.icon(),
                tool.program,
                tool.result.detail
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ToolCheck {
    pub stage: Stage,
    pub program: String,
    pub result: CheckResult,
}

#[derive(Debug, Default, Clone)]
pub struct CheckResult {
    pub passed: bool,
    pub detail: String,
}

impl CheckResult {
    pub fn ok(detail: &str) -> Self {
        Self {
            passed: true,
            detail: detail.to_owned(),
        }
    }

    pub fn fail(detail: &str) -> Self {
        Self {
            passed: false,
            detail: detail.to_owned(),
        }
    }

    pub fn icon(&self) -> &'static str {
        if self.passed { "OK" } else { "NG" }
    }
}
