//! Tool implementations handed to agents.

pub mod filesystem;
pub mod function;

pub use filesystem::{
    read_tools, write_tools, ListDirectory, ReadFile, RunCommand, WriteFile, COMMAND_TIMEOUT,
};
pub use function::{tool, FnTool};
