//! Built-in filesystem and shell tools.
//!
//! Paths are resolved against the process working directory.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::fs;
use tokio::process::Command;
use tracing::debug;

use crate::domain::ports::{parse_args, Tool, ToolError};

/// Default wall-clock limit for `run_command`.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(120);

fn absolute(tool: &str, path: &str) -> Result<PathBuf, ToolError> {
    let path = Path::new(path);
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|source| io_error(tool, source))
}

fn io_error(tool: &str, source: std::io::Error) -> ToolError {
    ToolError::Io {
        tool: tool.to_string(),
        source,
    }
}

#[derive(Debug, Deserialize)]
struct ReadFileInput {
    file_path: String,
}

/// Read and return the contents of a file.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReadFile;

#[async_trait]
impl Tool for ReadFile {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read and return the contents of a file."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_path": { "type": "string", "description": "Path of the file to read" }
            },
            "required": ["file_path"]
        })
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let input: ReadFileInput = parse_args(self.name(), args)?;
        let path = absolute(self.name(), &input.file_path)?;
        debug!(path = %path.display(), "read_file");
        fs::read_to_string(&path)
            .await
            .map_err(|e| io_error(self.name(), e))
    }
}

#[derive(Debug, Deserialize)]
struct WriteFileInput {
    file_path: String,
    content: String,
}

/// Write content to a file, creating parent directories as needed.
#[derive(Debug, Default, Clone, Copy)]
pub struct WriteFile;

#[async_trait]
impl Tool for WriteFile {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write content to a file. Creates parent directories if needed."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_path": { "type": "string", "description": "Path of the file to write" },
                "content": { "type": "string", "description": "Full file content" }
            },
            "required": ["file_path", "content"]
        })
    }

    fn mutates(&self) -> bool {
        true
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let input: WriteFileInput = parse_args(self.name(), args)?;
        let path = absolute(self.name(), &input.file_path)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(self.name(), e))?;
        }
        fs::write(&path, &input.content)
            .await
            .map_err(|e| io_error(self.name(), e))?;

        debug!(path = %path.display(), bytes = input.content.len(), "write_file");
        Ok(format!(
            "Wrote {} chars to {}",
            input.content.chars().count(),
            path.display()
        ))
    }
}

#[derive(Debug, Deserialize)]
struct ListDirectoryInput {
    #[serde(default = "current_dir_arg")]
    directory: String,
}

fn current_dir_arg() -> String {
    ".".to_string()
}

/// List a directory, one `d name` / `f name` line per entry, sorted by name.
#[derive(Debug, Default, Clone, Copy)]
pub struct ListDirectory;

#[async_trait]
impl Tool for ListDirectory {
    fn name(&self) -> &str {
        "list_directory"
    }

    fn description(&self) -> &str {
        "List files and directories at the given path."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "directory": {
                    "type": "string",
                    "description": "Directory to list",
                    "default": "."
                }
            }
        })
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let args = if args.is_null() { json!({}) } else { args };
        let input: ListDirectoryInput = parse_args(self.name(), args)?;
        let path = absolute(self.name(), &input.directory)?;

        let mut reader = fs::read_dir(&path)
            .await
            .map_err(|e| io_error(self.name(), e))?;
        let mut entries = Vec::new();
        while let Some(entry) = reader
            .next_entry()
            .await
            .map_err(|e| io_error(self.name(), e))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            // Follows symlinks, so a link to a directory lists as `d`.
            let is_dir = fs::metadata(entry.path())
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false);
            entries.push((name, is_dir));
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(entries
            .into_iter()
            .map(|(name, is_dir)| format!("{}{}", if is_dir { "d " } else { "f " }, name))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

#[derive(Debug, Deserialize)]
struct RunCommandInput {
    command: String,
}

/// Run a shell command and return its combined output.
#[derive(Debug, Clone, Copy)]
pub struct RunCommand {
    timeout: Duration,
}

impl Default for RunCommand {
    fn default() -> Self {
        Self {
            timeout: COMMAND_TIMEOUT,
        }
    }
}

impl RunCommand {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Tool for RunCommand {
    fn name(&self) -> &str {
        "run_command"
    }

    fn description(&self) -> &str {
        "Run a shell command and return stdout + stderr. Use for git, tests, linting, etc."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": { "type": "string", "description": "Shell command line" }
            },
            "required": ["command"]
        })
    }

    fn mutates(&self) -> bool {
        true
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let input: RunCommandInput = parse_args(self.name(), args)?;
        debug!(command = %input.command, "run_command");

        let child = Command::new("sh")
            .arg("-c")
            .arg(&input.command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| ToolError::Timeout {
                tool: self.name().to_string(),
                timeout_secs: self.timeout.as_secs(),
            })?
            .map_err(|e| io_error(self.name(), e))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        let mut result = stdout.into_owned();
        if !stderr.is_empty() {
            result.push('\n');
            result.push_str(&stderr);
        }
        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            result.push_str(&format!("\n[exit code: {code}]"));
        }
        Ok(result.trim().to_string())
    }
}

/// Tools that only inspect the workspace.
pub fn read_tools() -> Vec<Arc<dyn Tool>> {
    vec![Arc::new(ReadFile), Arc::new(ListDirectory)]
}

/// Every built-in tool, including those that modify the workspace.
pub fn write_tools() -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(ReadFile),
        Arc::new(WriteFile),
        Arc::new(ListDirectory),
        Arc::new(RunCommand::default()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(tools: &[Arc<dyn Tool>]) -> Vec<&str> {
        tools.iter().map(|t| t.name()).collect()
    }

    #[test]
    fn test_tool_sets() {
        assert_eq!(names(&read_tools()), vec!["read_file", "list_directory"]);
        assert_eq!(
            names(&write_tools()),
            vec!["read_file", "write_file", "list_directory", "run_command"]
        );
        assert!(read_tools().iter().all(|t| !t.mutates()));
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/notes.txt");
        let path_str = path.to_string_lossy().to_string();

        let reply = WriteFile
            .call(json!({"file_path": path_str, "content": "héllo"}))
            .await
            .unwrap();
        assert_eq!(reply, format!("Wrote 5 chars to {}", path.display()));

        let content = ReadFile.call(json!({"file_path": path_str})).await.unwrap();
        assert_eq!(content, "héllo");
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.txt");
        let err = ReadFile
            .call(json!({"file_path": path.to_string_lossy()}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Io { .. }));
    }

    #[tokio::test]
    async fn test_list_directory_sorted_with_prefixes() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("b.txt"), "").unwrap();
        std::fs::write(dir.path().join("a.txt"), "").unwrap();

        let listing = ListDirectory
            .call(json!({"directory": dir.path().to_string_lossy()}))
            .await
            .unwrap();
        assert_eq!(listing, "f a.txt\nf b.txt\nd src");
    }

    #[tokio::test]
    async fn test_run_command_success() {
        let out = RunCommand::default()
            .call(json!({"command": "echo hello"}))
            .await
            .unwrap();
        assert_eq!(out, "hello");
    }

    #[tokio::test]
    async fn test_run_command_reports_stderr_and_exit_code() {
        let out = RunCommand::default()
            .call(json!({"command": "echo out; echo err >&2; exit 3"}))
            .await
            .unwrap();
        assert_eq!(out, "out\n\nerr\n\n[exit code: 3]");
    }

    #[tokio::test]
    async fn test_run_command_timeout() {
        let err = RunCommand::with_timeout(Duration::from_millis(100))
            .call(json!({"command": "sleep 5"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_run_command_requires_command() {
        let err = RunCommand::default().call(json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }
}
