//! Fakes shared by the unit tests: a scripted process runner and a fixed
//! tool resolver.

use std::cell::RefCell;
use std::path::PathBuf;

use crate::runner::{ProcessOutput, ProcessRequest, ProcessRunner, ToolResolver};
use crate::types::ToolResult;

pub fn ok_output(stdout: &str) -> ProcessOutput {
    ProcessOutput {
        success: true,
        code: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

pub fn failed_output(stderr: &str) -> ProcessOutput {
    ProcessOutput {
        success: false,
        code: Some(1),
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

/// Runner that records every request and replays scripted results in
/// order.
pub struct ScriptedRunner {
    requests: RefCell<Vec<ProcessRequest>>,
    results: RefCell<Vec<ToolResult<ProcessOutput>>>,
}

impl ScriptedRunner {
    pub fn new(results: Vec<ToolResult<ProcessOutput>>) -> Self {
        Self {
            requests: RefCell::new(Vec::new()),
            results: RefCell::new(results),
        }
    }

    pub fn succeeding(stdout: &str) -> Self {
        Self::new(vec![Ok(ok_output(stdout))])
    }

    pub fn failing(stderr: &str) -> Self {
        Self::new(vec![Ok(failed_output(stderr))])
    }

    pub fn request(&self, index: usize) -> ProcessRequest {
        self.requests.borrow()[index].clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, request: &ProcessRequest) -> ToolResult<ProcessOutput> {
        self.requests.borrow_mut().push(request.clone());
        self.results.borrow_mut().remove(0)
    }
}

/// Runner that delegates to a closure, for tests that need to create the
/// tool's output files on the fly.
pub struct FnRunner<F>(pub F)
where
    F: Fn(&ProcessRequest) -> ToolResult<ProcessOutput>;

impl<F> ProcessRunner for FnRunner<F>
where
    F: Fn(&ProcessRequest) -> ToolResult<ProcessOutput>,
{
    fn run(&self, request: &ProcessRequest) -> ToolResult<ProcessOutput> {
        self.0(request)
    }
}

/// Resolver that knows a fixed set of tool names.
pub struct FixedResolver {
    available: Vec<String>,
}

impl FixedResolver {
    pub fn with(names: &[&str]) -> Self {
        Self {
            available: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    pub fn none() -> Self {
        Self::with(&[])
    }
}

impl ToolResolver for FixedResolver {
    fn resolve(&self, names: &[&str]) -> Option<PathBuf> {
        names
            .iter()
            .find(|name| self.available.iter().any(|have| have.as_str() == **name))
            .map(|name| PathBuf::from(*name))
    }
}
