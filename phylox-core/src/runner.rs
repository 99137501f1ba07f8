//! Blocking subprocess capability and PATH-based tool discovery.
//!
//! Every external invocation in this crate goes through [`ProcessRunner`]
//! and every binary lookup goes through [`ToolResolver`], so tests can
//! substitute fakes for both and the drivers stay free of process-spawning
//! details.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::types::{ToolError, ToolResult};

/// A single external tool invocation: program, arguments, optional text
/// piped to stdin, optional working directory.
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    pub program: String,
    pub args: Vec<String>,
    pub stdin: Option<String>,
    pub cwd: Option<PathBuf>,
}

impl ProcessRequest {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            stdin: None,
            cwd: None,
        }
    }

    /// Pipe `text` to the child's stdin.
    pub fn stdin_text(mut self, text: impl Into<String>) -> Self {
        self.stdin = Some(text.into());
        self
    }

    /// Run the child with `dir` as its working directory.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// The command as it would be typed in a shell; logged before launch
    /// and reported back to callers for display.
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Captured result of a finished subprocess.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// Failure text for display: stderr when the tool wrote any, the exit
    /// status otherwise.
    pub fn error_text(&self) -> String {
        if self.stderr.trim().is_empty() {
            match self.code {
                Some(code) => format!("process exited with status {}", code),
                None => "process terminated by signal".to_string(),
            }
        } else {
            self.stderr.clone()
        }
    }
}

/// Blocking run-to-completion subprocess capability.
///
/// There is no timeout and no cancellation: the call returns when the
/// child exits.
pub trait ProcessRunner {
    fn run(&self, request: &ProcessRequest) -> ToolResult<ProcessOutput>;
}

/// [`ProcessRunner`] over `std::process::Command`.
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, request: &ProcessRequest) -> ToolResult<ProcessOutput> {
        log::info!("Running: {}", request.command_line());

        let mut cmd = Command::new(&request.program);
        cmd.args(&request.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd.stdin(if request.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });
        if let Some(dir) = &request.cwd {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ToolError::ToolNotFound(request.program.clone())
            } else {
                ToolError::Io(e)
            }
        })?;

        // Feed stdin from a separate thread so a child that fills the
        // stdout pipe while we are still writing cannot deadlock us.
        let writer = match (&request.stdin, child.stdin.take()) {
            (Some(text), Some(mut handle)) => {
                let text = text.clone();
                Some(std::thread::spawn(move || {
                    use std::io::Write;
                    let _ = handle.write_all(text.as_bytes());
                }))
            }
            _ => None,
        };

        let output = child.wait_with_output()?;
        if let Some(writer) = writer {
            let _ = writer.join();
        }

        Ok(ProcessOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// PATH lookup for external binaries, injectable for tests.
pub trait ToolResolver {
    /// Resolve the first available of `names`, probed in order.
    fn resolve(&self, names: &[&str]) -> Option<PathBuf>;

    fn is_available(&self, name: &str) -> bool {
        self.resolve(&[name]).is_some()
    }
}

/// Resolver backed by the execution PATH.
pub struct PathResolver;

impl ToolResolver for PathResolver {
    fn resolve(&self, names: &[&str]) -> Option<PathBuf> {
        names.iter().find_map(|name| which::which(name).ok())
    }
}

/// Names of required external tools missing from the resolver, in the
/// order the pipeline uses them. Either accepted IQ-TREE binary name
/// satisfies that requirement.
pub fn missing_tools(resolver: &dyn ToolResolver) -> Vec<String> {
    let mut missing = Vec::new();
    for tool in [crate::align::MAFFT_BIN, crate::trim::TRIMAL_BIN] {
        if !resolver.is_available(tool) {
            missing.push(tool.to_string());
        }
    }
    if resolver.resolve(&crate::tree::IQTREE_BINS).is_none() {
        missing.push("iqtree (or iqtree3)".to_string());
    }
    missing
}
