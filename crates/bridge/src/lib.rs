//! Invocation of the external `skills` command-line tool.
//!
//! The tool is treated as a text-producing black box: a [`ToolRequest`] goes
//! in, a [`ToolOutput`] with raw stdout/stderr and the exit code comes out.
//! Installing, removing and updating skills on disk is entirely its job.

pub mod error;
pub mod request;
pub mod runner;

pub use {
    error::{Error, Result},
    request::{ToolRequest, ToolVerb},
    runner::{CliToolRunner, OutputStream, ToolEvent, ToolOutput, ToolRunner},
};
