//! IQ-TREE driver.
//!
//! Each run gets a fresh temporary directory: the alignment is written
//! inside it, IQ-TREE executes with it as the working directory, and the
//! `.treefile` / `.iqtree` outputs are reported back by path. Successive
//! runs can therefore never collide.

use std::io::Write;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::runner::{ProcessRequest, ProcessRunner, ToolResolver};
use crate::types::{ToolError, ToolResult};

/// Accepted binary names, probed in preference order.
pub const IQTREE_BINS: [&str; 2] = ["iqtree", "iqtree3"];

/// Parameters for one inference run, numeric fields kept textual exactly
/// as collected from the form. Non-numeric counts coerce to 0, which
/// omits the corresponding flag, rather than failing the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IqTreeParams {
    /// Thread count; `0` or non-numeric becomes `-nt AUTO`.
    pub threads: String,
    /// Ultrafast bootstrap replicates (`-bb`).
    pub ufboot: String,
    /// SH-aLRT replicates (`-alrt`).
    pub sh_alrt: String,
    /// Local bootstrap probability replicates (`-lbp`).
    pub lbp: String,
    /// Approximate Bayes test (`-abayes`).
    pub abayes: bool,
    /// Substitution model; `auto` (case-insensitive) selects ModelFinder
    /// (`-m MFP`), anything else passes through verbatim.
    pub model: String,
    /// Output prefix for the run's files.
    pub prefix: String,
}

impl Default for IqTreeParams {
    fn default() -> Self {
        Self {
            threads: "0".to_string(),
            ufboot: "1000".to_string(),
            sh_alrt: "1000".to_string(),
            lbp: "0".to_string(),
            abayes: false,
            model: "auto".to_string(),
            prefix: "tmp".to_string(),
        }
    }
}

/// Lenient integer parse: anything non-numeric counts as 0.
fn parse_or_zero(text: &str) -> i64 {
    text.trim().parse().unwrap_or(0)
}

/// Argument list after the binary name. Input, prefix, and thread flags
/// are always present; replicate flags appear only for non-zero counts.
pub fn build_iqtree_args(input: &Path, params: &IqTreeParams) -> Vec<String> {
    let mut args = vec![
        "-s".to_string(),
        input.display().to_string(),
        "--prefix".to_string(),
        params.prefix.clone(),
        "-nt".to_string(),
    ];
    let nt = parse_or_zero(&params.threads);
    args.push(if nt == 0 {
        "AUTO".to_string()
    } else {
        nt.to_string()
    });

    let bb = parse_or_zero(&params.ufboot);
    if bb != 0 {
        args.extend(["-bb".to_string(), bb.to_string()]);
    }
    let alrt = parse_or_zero(&params.sh_alrt);
    if alrt != 0 {
        args.extend(["-alrt".to_string(), alrt.to_string()]);
    }
    let lbp = parse_or_zero(&params.lbp);
    if lbp != 0 {
        args.extend(["-lbp".to_string(), lbp.to_string()]);
    }
    if params.abayes {
        args.push("-abayes".to_string());
    }

    args.push("-m".to_string());
    if params.model.eq_ignore_ascii_case("auto") {
        args.push("MFP".to_string());
    } else {
        args.push(params.model.clone());
    }
    args
}

/// Result of a successful inference run. Everything lives inside
/// `output_dir`, which the caller owns and cleans up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeOutcome {
    /// The Newick tree (`<prefix>.treefile`).
    pub treefile: PathBuf,
    /// The companion text report (`<prefix>.iqtree`).
    pub report_file: PathBuf,
    /// The alignment copy the run consumed.
    pub input_file: PathBuf,
    pub output_dir: PathBuf,
    /// The exact command that was executed, for display.
    pub command_line: String,
}

/// Infers a tree from `alignment` with IQ-TREE.
///
/// The binary is probed under both accepted names; neither being present
/// is a [`ToolError::ToolNotFound`], distinct from a failed run.
pub fn run_iqtree(
    runner: &dyn ProcessRunner,
    resolver: &dyn ToolResolver,
    alignment: &str,
    params: &IqTreeParams,
) -> ToolResult<TreeOutcome> {
    let binary = resolver
        .resolve(&IQTREE_BINS)
        .ok_or_else(|| ToolError::ToolNotFound("iqtree".to_string()))?;

    let output_dir = tempfile::Builder::new()
        .prefix("tmp_iqtree_")
        .tempdir()?
        .keep();
    let mut input = tempfile::Builder::new()
        .prefix("tmp_input")
        .suffix(".fasta")
        .tempfile_in(&output_dir)?;
    input.write_all(alignment.as_bytes())?;
    let (_, input_file) = input.keep().map_err(|e| ToolError::Io(e.error))?;

    let request = ProcessRequest::new(
        binary.display().to_string(),
        build_iqtree_args(&input_file, params),
    )
    .current_dir(&output_dir);
    let command_line = request.command_line();

    let output = runner.run(&request)?;
    if !output.success {
        return Err(ToolError::ExternalTool(output.error_text()));
    }

    Ok(TreeOutcome {
        treefile: output_dir.join(format!("{}.treefile", params.prefix)),
        report_file: output_dir.join(format!("{}.iqtree", params.prefix)),
        input_file,
        output_dir,
        command_line,
    })
}

/// Version number from `iqtree --version`, as shown in the options form.
///
/// Takes the first line of the banner and captures the dotted number
/// after the word "version"; falls back to the raw first line when no
/// number is present, and to a fixed sentinel on any failure.
pub fn iqtree_version(runner: &dyn ProcessRunner, resolver: &dyn ToolResolver) -> String {
    const FAILED: &str = "Failed to retrieve version";

    let Some(binary) = resolver.resolve(&IQTREE_BINS) else {
        return FAILED.to_string();
    };
    let request = ProcessRequest::new(binary.display().to_string(), vec!["--version".to_string()]);
    let output = match runner.run(&request) {
        Ok(output) if output.success => output,
        _ => return FAILED.to_string(),
    };

    let text = if output.stdout.trim().is_empty() {
        output.stderr.trim().to_string()
    } else {
        output.stdout.trim().to_string()
    };
    if text.is_empty() {
        return FAILED.to_string();
    }
    let first_line = text.lines().next().unwrap_or(text.as_str());

    if let Ok(re) = Regex::new(r"(?i)version\s+([0-9.]+)") {
        if let Some(caps) = re.captures(first_line) {
            return caps[1].to_string();
        }
    }
    first_line.to_string()
}
