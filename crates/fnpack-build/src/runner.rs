use std::path::{Path, PathBuf};

/// One external process to run: program, arguments, working directory, and
/// optional bytes piped to stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub stdin: Option<Vec<u8>>,
}

impl Invocation {
    pub fn new(program: impl Into<String>, cwd: &Path) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
            stdin: None,
        }
    }

    /// Build from a configured command line (`["yarn", "--no-lockfile"]`).
    /// Returns `None` for an empty command line.
    pub fn from_command_line(command: &[String], cwd: &Path) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self::new(program.as_str(), cwd).args(args))
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn stdin(mut self, data: Vec<u8>) -> Self {
        self.stdin = Some(data);
        self
    }

    /// Shell-like rendering for logs and error messages.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured output of a successful process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Abstraction over external process execution for testability.
///
/// Production code uses [`TokioRunner`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait ProcessRunner: Send + Sync {
    /// Run the invocation to completion. A non-zero exit is an error carrying
    /// the captured output.
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ProcessError>;
}

/// Runs invocations with `tokio::process`.
///
/// On unix each child leads its own process group. Dropping the returned
/// future before the child finished kills the whole group, so a caller-side
/// timeout also takes down whatever `sh -c`, `xargs` or the installer
/// started. Elsewhere only the direct child is killed.
pub struct TokioRunner;

impl ProcessRunner for TokioRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ProcessError> {
        use std::process::Stdio;
        use tokio::io::AsyncWriteExt;

        tracing::debug!(
            command = %invocation.command_line(),
            cwd = %invocation.cwd.display(),
            "spawning"
        );

        let stdin = if invocation.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        };

        let mut command = tokio::process::Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(stdin)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        command.process_group(0);

        let mut child = command
            .spawn()
            .map_err(|e| ProcessError::spawn(&invocation.program, e))?;
        #[cfg(unix)]
        let mut group = ProcessGroupGuard(child.id());

        // Feed stdin concurrently with draining stdout/stderr so neither pipe
        // can fill up and stall the child.
        let writer = match (invocation.stdin.clone(), child.stdin.take()) {
            (Some(data), Some(mut pipe)) => Some(tokio::spawn(async move {
                pipe.write_all(&data).await?;
                pipe.shutdown().await
            })),
            _ => None,
        };

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ProcessError::Wait {
                program: invocation.program.clone(),
                source: e,
            })?;
        #[cfg(unix)]
        group.disarm();

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(ProcessError::Failed {
                command: invocation.command_line(),
                status: output.status.to_string(),
                stdout,
                stderr,
            });
        }

        if let Some(writer) = writer {
            writer
                .await
                .map_err(std::io::Error::other)
                .and_then(|written| written)
                .map_err(|e| ProcessError::StdinWrite {
                    program: invocation.program.clone(),
                    source: e,
                })?;
        }

        Ok(ProcessOutput { stdout, stderr })
    }
}

/// Sends `SIGKILL` to a child's process group when dropped while armed.
#[cfg(unix)]
struct ProcessGroupGuard(Option<u32>);

#[cfg(unix)]
impl ProcessGroupGuard {
    fn disarm(&mut self) {
        self.0 = None;
    }
}

#[cfg(unix)]
impl Drop for ProcessGroupGuard {
    fn drop(&mut self) {
        let Some(pgid) = self.0.take() else {
            return;
        };
        // SAFETY: killpg takes plain integers and only delivers a signal.
        let rc = unsafe { libc::killpg(pgid as libc::pid_t, libc::SIGKILL) };
        if rc != 0 {
            tracing::debug!(
                pgid,
                error = %std::io::Error::last_os_error(),
                "process group already gone"
            );
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("`{program}` not found — is it installed and on PATH?")]
    NotFound {
        program: String,
        source: std::io::Error,
    },

    #[error("failed to start `{program}`")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("failed to write to `{program}` stdin")]
    StdinWrite {
        program: String,
        source: std::io::Error,
    },

    #[error("failed waiting for `{program}`")]
    Wait {
        program: String,
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}{}", diagnostics(stdout, stderr))]
    Failed {
        command: String,
        status: String,
        stdout: String,
        stderr: String,
    },
}

impl ProcessError {
    fn spawn(program: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                program: program.to_owned(),
                source,
            }
        } else {
            Self::Spawn {
                program: program.to_owned(),
                source,
            }
        }
    }

    /// True when the program could not be found at all.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Compilers such as `tsc` report diagnostics on stdout, installers on
/// stderr; show whichever the tool wrote, verbatim.
fn diagnostics(stdout: &str, stderr: &str) -> String {
    let mut out = String::new();
    for stream in [stderr.trim_end(), stdout.trim_end()] {
        if !stream.is_empty() {
            out.push('\n');
            out.push_str(stream);
        }
    }
    out
}
