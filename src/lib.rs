//! # pipefeed
//!
//! Pipeline node supervision for real-time media delivery.
//!
//! This crate provides:
//!
//! - **The node contract** ([`PipelineNode`], [`NodeBase`]) -- start, poll,
//!   and stop a supervised external process, one live process per node.
//! - **Process supervision** ([`ProcessHandle`]) -- spawn-without-wait with
//!   non-blocking status polling and kill-and-reap shutdown.
//! - **Tool discovery** ([`ToolRegistry`]) -- find and cache paths to ffmpeg
//!   and ffprobe.
//! - **Concrete nodes** ([`nodes`]) -- [`LoopInputNode`] loops a local media
//!   file into a named pipe in real time; [`ExternalCommandNode`] runs a
//!   user-supplied shell command as a stage.
//!
//! The orchestrator that wires nodes into a graph, creates the named pipes,
//! and sequences start/stop lives outside this crate; it holds nodes as
//! `Box<dyn PipelineNode>` and drives them through the contract.

pub mod config;
pub mod error;
pub mod node;
pub mod nodes;
pub mod process;
pub mod tools;

// ---- Re-exports for convenience ----

pub use config::{PipelineConfig, ToolsConfig};
pub use error::{Error, Result};
pub use node::{NodeBase, PipelineNode};
pub use nodes::{ExternalCommandNode, LoopInputNode};
pub use process::{ProcessHandle, ProcessStatus};
pub use tools::{ToolConfig, ToolInfo, ToolRegistry};
