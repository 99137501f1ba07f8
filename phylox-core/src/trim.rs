//! trimAl driver.
//!
//! The alignment is written to a temporary `.fasta` file and trimAl is
//! invoked with explicit input/output/HTML-report paths plus a single
//! mode flag. The output and report files survive a successful run for
//! the caller to consume; a failed run removes everything it created.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::runner::{ProcessRequest, ProcessRunner};
use crate::types::{ToolError, ToolResult};

pub const TRIMAL_BIN: &str = "trimal";

/// trimAl trimming heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrimMode {
    Automated1,
    Gappyout,
    Strict,
    Strictplus,
    Nogaps,
}

impl TrimMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrimMode::Automated1 => "automated1",
            TrimMode::Gappyout => "gappyout",
            TrimMode::Strict => "strict",
            TrimMode::Strictplus => "strictplus",
            TrimMode::Nogaps => "nogaps",
        }
    }

    /// Flag form passed to trimAl, e.g. `-automated1`.
    pub fn flag(&self) -> String {
        format!("-{}", self.as_str())
    }
}

impl FromStr for TrimMode {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "automated1" => Ok(TrimMode::Automated1),
            "gappyout" => Ok(TrimMode::Gappyout),
            "strict" => Ok(TrimMode::Strict),
            "strictplus" => Ok(TrimMode::Strictplus),
            "nogaps" => Ok(TrimMode::Nogaps),
            other => Err(ToolError::InvalidParams(format!(
                "unknown trim mode: {} (expected automated1, gappyout, strict, strictplus, or nogaps)",
                other
            ))),
        }
    }
}

/// Result of a successful trim run. Both paths stay on disk until the
/// caller removes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrimOutcome {
    pub trimmed: String,
    pub output_path: PathBuf,
    pub html_path: PathBuf,
}

fn persisted_temp(suffix: &str, content: Option<&str>) -> ToolResult<PathBuf> {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile()?;
    if let Some(text) = content {
        file.write_all(text.as_bytes())?;
    }
    let (_, path) = file.keep().map_err(|e| ToolError::Io(e.error))?;
    Ok(path)
}

/// Trims `alignment` with trimAl in the given mode.
///
/// On failure all three temporary files are removed before the error is
/// returned; no partial files are left behind.
pub fn run_trimal(
    runner: &dyn ProcessRunner,
    alignment: &str,
    mode: TrimMode,
) -> ToolResult<TrimOutcome> {
    let input_path = persisted_temp(".fasta", Some(alignment))?;
    let output_path = persisted_temp(".fasta", None)?;
    let html_path = persisted_temp(".html", None)?;

    let args = vec![
        "-in".to_string(),
        input_path.display().to_string(),
        "-out".to_string(),
        output_path.display().to_string(),
        "-htmlout".to_string(),
        html_path.display().to_string(),
        mode.flag(),
    ];

    let err = match runner.run(&ProcessRequest::new(TRIMAL_BIN, args)) {
        Ok(output) if output.success => {
            let trimmed = fs::read_to_string(&output_path)?;
            // The input copy has served its purpose once trimAl has read it.
            let _ = fs::remove_file(&input_path);
            return Ok(TrimOutcome {
                trimmed,
                output_path,
                html_path,
            });
        }
        Ok(output) => ToolError::ExternalTool(output.error_text()),
        Err(e) => e,
    };

    for path in [&input_path, &output_path, &html_path] {
        let _ = fs::remove_file(path);
    }
    Err(err)
}

/// `trimal --version`, shown verbatim in the trim options form. trimAl
/// prints its banner on stdout; stderr is the fallback.
pub fn trimal_version(runner: &dyn ProcessRunner) -> String {
    const FAILED: &str = "Failed to retrieve version";

    let request = ProcessRequest::new(TRIMAL_BIN, vec!["--version".to_string()]);
    match runner.run(&request) {
        Ok(output) if output.success => {
            let text = if output.stdout.trim().is_empty() {
                output.stderr.trim()
            } else {
                output.stdout.trim()
            };
            if text.is_empty() {
                FAILED.to_string()
            } else {
                text.to_string()
            }
        }
        _ => FAILED.to_string(),
    }
}
