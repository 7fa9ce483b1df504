//! Shell scripts sent to the stream processing engine
//!
//! Scripts are never assembled by string interpolation of raw values: every
//! argument is emitted as a JSON literal, which is also a valid JavaScript
//! literal once U+2028 and U+2029 are escaped.

use serde::Serialize;

use crate::pipeline::{Pipeline, ProcessOptions};

/// A single command evaluated by the remote shell
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    /// `sp.createStreamProcessor(name, pipeline)`
    CreateStreamProcessor { name: String, pipeline: Pipeline },
    /// `sp.process(pipeline[, options])`, run once and not registered
    Process {
        pipeline: Pipeline,
        options: Option<ProcessOptions>,
    },
}

impl ShellCommand {
    pub fn create_stream_processor(name: impl Into<String>, pipeline: Pipeline) -> Self {
        ShellCommand::CreateStreamProcessor {
            name: name.into(),
            pipeline,
        }
    }

    pub fn process(pipeline: Pipeline, options: Option<ProcessOptions>) -> Self {
        ShellCommand::Process { pipeline, options }
    }

    /// Render the command as script text
    pub fn to_script(&self) -> serde_json::Result<String> {
        match self {
            ShellCommand::CreateStreamProcessor { name, pipeline } => Ok(format!(
                "sp.createStreamProcessor({}, {})",
                js_literal(name)?,
                js_literal(pipeline)?
            )),
            ShellCommand::Process { pipeline, options } => match options {
                Some(options) if !options.is_empty() => Ok(format!(
                    "sp.process({}, {})",
                    js_literal(pipeline)?,
                    js_literal(options)?
                )),
                _ => Ok(format!("sp.process({})", js_literal(pipeline)?)),
            },
        }
    }
}

fn js_literal<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let json = serde_json::to_string(value)?;
    Ok(json.replace('\u{2028}', "\\u2028").replace('\u{2029}', "\\u2029"))
}
