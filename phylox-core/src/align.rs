//! MAFFT driver.
//!
//! Builds the exact flag sequence for each alignment mode, pipes the
//! FASTA text to the binary on stdin, and returns stdout as the aligned
//! result.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::runner::{ProcessRequest, ProcessRunner};
use crate::types::{ToolError, ToolResult};

pub const MAFFT_BIN: &str = "mafft";

/// MAFFT strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignMode {
    /// Let MAFFT pick a strategy (`--auto`).
    Auto,
    /// L-INS-i: local pairwise, 1000 refinement iterations.
    Linsi,
    /// G-INS-i: global pairwise, 1000 refinement iterations.
    Ginsi,
    /// E-INS-i: generalized affine gap costs with zero gap extension
    /// penalty.
    Einsi,
}

impl AlignMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlignMode::Auto => "auto",
            AlignMode::Linsi => "linsi",
            AlignMode::Ginsi => "ginsi",
            AlignMode::Einsi => "einsi",
        }
    }
}

impl FromStr for AlignMode {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(AlignMode::Auto),
            "linsi" => Ok(AlignMode::Linsi),
            "ginsi" => Ok(AlignMode::Ginsi),
            "einsi" => Ok(AlignMode::Einsi),
            other => Err(ToolError::InvalidParams(format!(
                "unknown alignment mode: {} (expected auto, linsi, ginsi, or einsi)",
                other
            ))),
        }
    }
}

/// Argument list for one invocation: the thread flag is always present,
/// followed by exactly one mode flag group, followed by `-` so MAFFT
/// reads the sequences from stdin.
pub fn build_mafft_args(mode: AlignMode, threads: u32) -> Vec<String> {
    let mut args = vec!["--thread".to_string(), threads.to_string()];
    match mode {
        AlignMode::Auto => args.push("--auto".to_string()),
        AlignMode::Linsi => {
            args.extend(["--localpair", "--maxiterate", "1000"].map(String::from));
        }
        AlignMode::Ginsi => {
            args.extend(["--globalpair", "--maxiterate", "1000"].map(String::from));
        }
        AlignMode::Einsi => {
            args.extend(["--genafpair", "--maxiterate", "1000", "--ep", "0"].map(String::from));
        }
    }
    args.push("-".to_string());
    args
}

/// Aligns `fasta_text` with MAFFT and returns the aligned FASTA.
///
/// A thread count below 1 is rejected up front; it never reaches the
/// binary.
pub fn run_mafft(
    runner: &dyn ProcessRunner,
    fasta_text: &str,
    threads: u32,
    mode: AlignMode,
) -> ToolResult<String> {
    if threads < 1 {
        return Err(ToolError::InvalidParams(
            "threads must be at least 1".to_string(),
        ));
    }

    let request =
        ProcessRequest::new(MAFFT_BIN, build_mafft_args(mode, threads)).stdin_text(fasta_text);
    let output = runner.run(&request)?;
    if !output.success {
        return Err(ToolError::ExternalTool(output.error_text()));
    }
    Ok(output.stdout)
}
