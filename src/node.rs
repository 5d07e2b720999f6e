//! The shared pipeline-node contract.
//!
//! A pipeline is a graph of heterogeneous nodes, each supervising at most one
//! external process. The orchestrator manipulates nodes only through
//! [`PipelineNode`], typically as `Box<dyn PipelineNode>`. Concrete nodes
//! compose a [`NodeBase`] for the process bookkeeping instead of reimplementing
//! it.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::process::{ProcessHandle, ProcessStatus};

/// A unit of work in the pipeline graph, capable of being started, polled
/// for liveness, and stopped.
#[async_trait]
pub trait PipelineNode: Send + Sync {
    /// A short, human-readable name for this node (e.g. "LoopInputNode").
    fn name(&self) -> &'static str;

    /// Launch the node's supervised process.
    ///
    /// Never blocks on process completion and never retries; launch failures
    /// propagate to the orchestrator, which owns retry policy.
    async fn start(&mut self) -> Result<()>;

    /// Poll the supervised process without blocking.
    fn check_status(&mut self) -> Result<ProcessStatus>;

    /// Kill the supervised process (if any) and release it.
    async fn stop(&mut self) -> Result<()>;
}

/// Per-node process bookkeeping shared by every concrete node.
///
/// Holds the optional [`ProcessHandle`] and enforces the one-live-process
/// invariant: a node may not spawn while its previous process is still alive.
/// Once an exit has been observed, a fresh spawn is permitted.
#[derive(Debug)]
pub struct NodeBase {
    name: &'static str,
    process: Option<ProcessHandle>,
}

impl NodeBase {
    /// Create base state for a node with the given name.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            process: None,
        }
    }

    /// Whether a supervised process is currently alive.
    pub fn is_running(&mut self) -> bool {
        matches!(
            self.process.as_mut().map(ProcessHandle::status),
            Some(Ok(ProcessStatus::Running))
        )
    }

    /// Spawn the node's process, storing the handle on success.
    ///
    /// # Errors
    ///
    /// - [`Error::Node`] if a live process is already being supervised; the
    ///   call fails fast without spawning a second one.
    /// - [`Error::Launch`] propagated from [`ProcessHandle::spawn`].
    pub fn spawn(
        &mut self,
        program: &Path,
        args: &[String],
        env: &BTreeMap<String, String>,
    ) -> Result<()> {
        if self.is_running() {
            return Err(Error::node(
                self.name,
                "already supervising a live process",
            ));
        }
        self.process = Some(ProcessHandle::spawn(program, args, env)?);
        Ok(())
    }

    /// Poll the supervised process.
    ///
    /// # Errors
    ///
    /// [`Error::Node`] if the node was never started (or was stopped).
    pub fn check_status(&mut self) -> Result<ProcessStatus> {
        match self.process.as_mut() {
            Some(handle) => handle.status(),
            None => Err(Error::node(self.name, "no supervised process")),
        }
    }

    /// Kill and reap the supervised process, clearing the handle.
    ///
    /// A no-op when nothing is running, so teardown may call this
    /// unconditionally.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(mut handle) = self.process.take() {
            let status = handle.stop().await?;
            tracing::info!(node = self.name, %status, "stopped supervised process");
        }
        Ok(())
    }
}
