//! A node that uses ffmpeg to loop a local file into a named pipe.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::node::{NodeBase, PipelineNode};
use crate::process::ProcessStatus;
use crate::tools::ToolRegistry;

const NODE_NAME: &str = "LoopInputNode";

/// Verbosity for ffmpeg's `FFREPORT` file logging (its info level). This is
/// independent of the `-loglevel` switch on the command line.
const REPORT_LOG_LEVEL: u32 = 32;

/// Reads one local media file and re-emits it, looped indefinitely and paced
/// in real time, onto an output sink (typically a pre-created named pipe).
///
/// The node repackages the container for pipe transport; it never re-encodes
/// the elementary streams. Both the output sink and the downstream reader are
/// the orchestrator's responsibility -- a real-time writer blocks if nothing
/// drains the pipe.
pub struct LoopInputNode {
    config: Arc<PipelineConfig>,
    tools: Arc<ToolRegistry>,
    input_path: String,
    output_path: String,
    base: NodeBase,
}

impl LoopInputNode {
    // TODO: Take an input object instead of a raw path.
    pub fn new(
        config: Arc<PipelineConfig>,
        tools: Arc<ToolRegistry>,
        input_path: impl Into<String>,
        output_path: impl Into<String>,
    ) -> Self {
        Self {
            config,
            tools,
            input_path: input_path.into(),
            output_path: output_path.into(),
            base: NodeBase::new(NODE_NAME),
        }
    }
}

/// Build the ffmpeg argument list for looping `input` into `output`.
///
/// Fully deterministic: identical inputs yield an identical vector.
fn build_args(config: &PipelineConfig, input: &str, output: &str) -> Vec<String> {
    let mut args: Vec<String> = vec![
        // Loop the input forever.
        "-stream_loop".into(),
        "-1".into(),
        // Read input in real time.
        "-re".into(),
    ];

    if config.quiet {
        // Suppresses all messages except errors.
        args.extend(["-loglevel".into(), "error".into()]);
    } else {
        // Suppresses all messages except warnings and errors. By using this
        // instead of the default, we suppress the status line showing progress
        // and transcoding speed. The transcoder node will show this instead,
        // which will indicate overall pipeline speed. If we show both at once,
        // it will be unreadable.
        args.extend(["-loglevel".into(), "warning".into()]);
    }

    args.extend([
        // The input itself.
        "-i".into(),
        input.into(),
        // Format the output as MPEG2-TS, which works well in a pipe.
        "-f".into(),
        "mpegts".into(),
        // Copy the video stream directly.
        "-c:v".into(),
        "copy".into(),
        // Copy the audio stream directly.
        "-c:a".into(),
        "copy".into(),
        // Do not prompt for output files that already exist. Since the
        // orchestrator created the named pipe in advance, it definitely
        // already exists. A prompt would block ffmpeg to wait for user input.
        "-y".into(),
        // The output itself.
        output.into(),
    ]);

    args
}

/// Build the environment overrides for the invocation.
///
/// When debug logs are enabled, `FFREPORT` turns on ffmpeg's own file-based
/// logging. The log file carries the input filename so that multiple loop
/// nodes in one pipeline never share a log file.
fn build_report_env(config: &PipelineConfig, input: &str) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();
    if config.debug_logs {
        env.insert(
            "FFREPORT".to_string(),
            format!(
                "file={NODE_NAME}-{}.log:level={REPORT_LOG_LEVEL}",
                sanitize_for_log_name(input)
            ),
        );
    }
    env
}

/// A safe version of the input path that can go into a log filename.
///
/// Only path separators are substituted, so two inputs that differ solely in
/// separator characters collide on one log name. That matches the historical
/// behavior and is left as-is.
fn sanitize_for_log_name(input: &str) -> String {
    input.replace(['/', '\\'], "-")
}

#[async_trait]
impl PipelineNode for LoopInputNode {
    fn name(&self) -> &'static str {
        NODE_NAME
    }

    async fn start(&mut self) -> Result<()> {
        let ffmpeg = self.tools.require("ffmpeg")?;
        let args = build_args(&self.config, &self.input_path, &self.output_path);
        let env = build_report_env(&self.config, &self.input_path);

        tracing::debug!(
            input = %self.input_path,
            output = %self.output_path,
            ?args,
            "starting loop input"
        );

        self.base.spawn(&ffmpeg.path, &args, &env)
    }

    fn check_status(&mut self) -> Result<ProcessStatus> {
        self.base.check_status()
    }

    async fn stop(&mut self) -> Result<()> {
        self.base.stop().await
    }
}
