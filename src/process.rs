//! Spawn-without-wait primitive for supervised external processes.
//!
//! Unlike a run-to-completion command, a supervised process keeps running
//! after the spawn call returns; the owner polls [`ProcessHandle::status`]
//! and eventually calls [`ProcessHandle::stop`].

use std::collections::BTreeMap;
use std::path::Path;
use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::{Child, Command};

use crate::error::{Error, Result};

/// How long `stop` waits for a killed process to be reaped.
const STOP_REAP_TIMEOUT: Duration = Duration::from_secs(10);

/// Observed state of a supervised process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    /// The process is still alive.
    Running,
    /// The process exited cleanly (status zero).
    Finished,
    /// The process exited abnormally; carries the exit code when one exists
    /// (signal-terminated processes have none).
    Errored(Option<i32>),
}

/// Handle to a live (or recently exited) supervised OS process.
#[derive(Debug)]
pub struct ProcessHandle {
    program: String,
    child: Child,
}

impl ProcessHandle {
    /// Spawn `program` with the given arguments and environment overrides.
    ///
    /// Overrides are applied on top of the inherited environment. Stdio is
    /// inherited so the process's own warning/error output stays visible on
    /// the pipeline's console.
    ///
    /// The call returns as soon as the OS process exists; it never waits for
    /// completion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Launch`] if the process could not be created
    /// (executable not found, permission denied, resource exhaustion).
    pub fn spawn(
        program: &Path,
        args: &[String],
        env: &BTreeMap<String, String>,
    ) -> Result<Self> {
        let program_name = program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| program.to_string_lossy().to_string());

        let mut cmd = Command::new(program);
        cmd.args(args);
        cmd.envs(env);
        // If the handle is dropped without a stop, do not leak the process.
        cmd.kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| Error::Launch {
            tool: program_name.clone(),
            message: format!("failed to spawn: {e}"),
        })?;

        tracing::info!(program = %program_name, pid = ?child.id(), "spawned supervised process");

        Ok(Self {
            program: program_name,
            child,
        })
    }

    /// Name of the supervised program (for diagnostics).
    pub fn program(&self) -> &str {
        &self.program
    }

    /// OS process id, while the process is alive.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Poll the process without blocking.
    pub fn status(&mut self) -> Result<ProcessStatus> {
        match self.child.try_wait()? {
            None => Ok(ProcessStatus::Running),
            Some(status) if status.success() => Ok(ProcessStatus::Finished),
            Some(status) => Ok(ProcessStatus::Errored(status.code())),
        }
    }

    /// Kill the process (if still alive) and reap it.
    ///
    /// Returns the final exit status. If the process had already exited on
    /// its own, that status is returned and no signal is sent.
    pub async fn stop(&mut self) -> Result<ExitStatus> {
        if let Some(status) = self.child.try_wait()? {
            return Ok(status);
        }

        self.child.start_kill()?;

        match tokio::time::timeout(STOP_REAP_TIMEOUT, self.child.wait()).await {
            Ok(waited) => Ok(waited?),
            Err(_elapsed) => Err(Error::Internal(format!(
                "{} did not exit within {STOP_REAP_TIMEOUT:?} of kill",
                self.program
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::path::PathBuf;

    fn sh(script: &str) -> Result<ProcessHandle> {
        ProcessHandle::spawn(
            Path::new("sh"),
            &["-c".to_string(), script.to_string()],
            &BTreeMap::new(),
        )
    }

    /// Poll until the process leaves `Running`, with a generous deadline.
    async fn wait_for_exit(handle: &mut ProcessHandle) -> ProcessStatus {
        for _ in 0..200 {
            let status = handle.status().unwrap();
            if status != ProcessStatus::Running {
                return status;
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
        panic!("process did not exit in time");
    }

    #[tokio::test]
    async fn spawn_nonexistent_is_launch_error() {
        let result = ProcessHandle::spawn(
            Path::new("nonexistent_tool_xyz_12345"),
            &[],
            &BTreeMap::new(),
        );
        let err = result.unwrap_err();
        assert_matches!(err, Error::Launch { .. });
        assert!(err.to_string().contains("failed to spawn"));
    }

    #[tokio::test]
    async fn clean_exit_is_finished() {
        let mut handle = sh("exit 0").unwrap();
        assert_eq!(wait_for_exit(&mut handle).await, ProcessStatus::Finished);
    }

    #[tokio::test]
    async fn nonzero_exit_is_errored_with_code() {
        let mut handle = sh("exit 3").unwrap();
        assert_eq!(
            wait_for_exit(&mut handle).await,
            ProcessStatus::Errored(Some(3))
        );
    }

    #[tokio::test]
    async fn long_lived_process_reports_running_then_stops() {
        let mut handle = sh("sleep 30").unwrap();
        assert_eq!(handle.status().unwrap(), ProcessStatus::Running);
        assert!(handle.id().is_some());

        let status = handle.stop().await.unwrap();
        // Killed, so not a clean exit.
        assert!(!status.success());
    }

    #[tokio::test]
    async fn stop_after_natural_exit_returns_real_status() {
        let mut handle = sh("exit 0").unwrap();
        wait_for_exit(&mut handle).await;
        let status = handle.stop().await.unwrap();
        assert!(status.success());
    }

    #[tokio::test]
    async fn env_overrides_reach_the_process() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("env.txt");
        let mut env = BTreeMap::new();
        env.insert("PIPEFEED_TEST_VAR".to_string(), "hello".to_string());

        let mut handle = ProcessHandle::spawn(
            Path::new("sh"),
            &[
                "-c".to_string(),
                format!("printf %s \"$PIPEFEED_TEST_VAR\" > {}", out.display()),
            ],
            &env,
        )
        .unwrap();
        assert_eq!(wait_for_exit(&mut handle).await, ProcessStatus::Finished);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "hello");
    }

    #[tokio::test]
    async fn program_name_uses_file_name() {
        let handle = sh("exit 0").unwrap();
        assert_eq!(handle.program(), "sh");
        drop(handle);

        let result = ProcessHandle::spawn(
            &PathBuf::from("/no/such/dir/ffmpeg"),
            &[],
            &BTreeMap::new(),
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("[ffmpeg]"), "got: {err}");
    }
}
