//! A node that runs an arbitrary user-supplied command as a pipeline stage.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;
use crate::node::{NodeBase, PipelineNode};
use crate::process::ProcessStatus;

const NODE_NAME: &str = "ExternalCommandNode";

/// Wraps a shell command in the node contract so user-defined stages can be
/// supervised exactly like the built-in ones.
///
/// The command runs under `sh -c`, so shell syntax (redirection, pipes) is
/// available. The node itself performs no argument or environment shaping.
pub struct ExternalCommandNode {
    command: String,
    base: NodeBase,
}

impl ExternalCommandNode {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            base: NodeBase::new(NODE_NAME),
        }
    }
}

#[async_trait]
impl PipelineNode for ExternalCommandNode {
    fn name(&self) -> &'static str {
        NODE_NAME
    }

    async fn start(&mut self) -> Result<()> {
        tracing::debug!(command = %self.command, "starting external command");
        self.base.spawn(
            Path::new("sh"),
            &["-c".to_string(), self.command.clone()],
            &BTreeMap::new(),
        )
    }

    fn check_status(&mut self) -> Result<ProcessStatus> {
        self.base.check_status()
    }

    async fn stop(&mut self) -> Result<()> {
        self.base.stop().await
    }
}
