//! Script execution
//!
//! [`ScriptRunner`] is the seam between script assembly and the operating
//! system. Production code uses [`OsaScriptRunner`]; tests substitute a
//! scripted runner that records what it was asked to run.

use crate::error::{ConnectorError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Raw result of one script invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

impl ScriptOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Convert a non-zero exit into an execution error
    pub fn into_stdout(self) -> Result<String> {
        if self.success() {
            Ok(self.stdout)
        } else {
            Err(ConnectorError::Execution {
                code: self.exit_code,
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

#[async_trait]
pub trait ScriptRunner: Send + Sync {
    /// Run one script to completion or until `timeout` elapses
    async fn run(&self, script: &str, timeout: Duration) -> Result<ScriptOutput>;
}

/// Runs scripts through the `osascript` command line tool
#[derive(Debug, Clone)]
pub struct OsaScriptRunner {
    program: String,
}

impl OsaScriptRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for OsaScriptRunner {
    fn default() -> Self {
        Self::new("osascript")
    }
}

#[async_trait]
impl ScriptRunner for OsaScriptRunner {
    async fn run(&self, script: &str, timeout: Duration) -> Result<ScriptOutput> {
        // The script goes in on stdin ("-") so it never appears in argv
        let mut child = Command::new(&self.program)
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let stdin = child.stdin.take();
        let exchange = async move {
            if let Some(mut stdin) = stdin {
                let written = match stdin.write_all(script.as_bytes()).await {
                    Ok(()) => stdin.shutdown().await,
                    Err(e) => Err(e),
                };
                // A child that exits without reading closes the pipe; its
                // exit status and stderr are reported below
                if let Err(e) = written {
                    tracing::debug!(error = %e, "osascript closed stdin early");
                }
            }
            child.wait_with_output().await
        };

        match tokio::time::timeout(timeout, exchange).await {
            Ok(output) => {
                let output = output?;
                Ok(ScriptOutput {
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    exit_code: output.status.code(),
                })
            }
            // Dropping the future drops the child, which kills it
            Err(_) => {
                tracing::warn!(timeout_secs = timeout.as_secs(), "osascript timed out");
                Err(ConnectorError::Timeout(timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_stdout_maps_exit_codes() {
        let ok = ScriptOutput {
            stdout: "t1\u{4}".into(),
            stderr: String::new(),
            exit_code: Some(0),
        };
        assert_eq!(ok.into_stdout().unwrap(), "t1\u{4}");

        let failed = ScriptOutput {
            stdout: String::new(),
            stderr: "execution error: Can't get task. (-1728)\n".into(),
            exit_code: Some(1),
        };
        match failed.into_stdout() {
            Err(ConnectorError::Execution { code, stderr }) => {
                assert_eq!(code, Some(1));
                assert_eq!(stderr, "execution error: Can't get task. (-1728)");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let runner = OsaScriptRunner::new("/nonexistent/osascript-binary");
        let err = runner
            .run("return 1", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectorError::Spawn(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_runner_feeds_script_on_stdin() {
        // `cat -` echoes the script back, standing in for osascript
        let runner = OsaScriptRunner::new("cat");
        let output = runner
            .run("hello\u{4}", Duration::from_secs(5))
            .await
            .unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, "hello\u{4}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_child_ignoring_stdin_reports_exit_status() {
        // `false` exits 1 without reading; a large script hits the closed pipe
        let runner = OsaScriptRunner::new("false");
        let script = "x".repeat(1 << 20);
        let output = runner.run(&script, Duration::from_secs(5)).await.unwrap();
        assert!(!output.success());
        assert!(matches!(
            output.into_stdout(),
            Err(ConnectorError::Execution { code: Some(1), .. })
        ));
    }
}
