//! IQ-TREE report scanning.
//!
//! The `.iqtree` companion report is line-oriented text; two labeled
//! lines carry the fields worth showing next to the tree: the selected
//! substitution model and the definition of the node support values.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub const MODEL_PREFIX: &str = "Model of substitution:";
pub const SUPPORT_PREFIX: &str = "Numbers in parentheses are";
pub const SUPPORT_LABEL: &str = "Node support(s):";

/// Pulls the substitution-model line and the node-support definition out
/// of an IQ-TREE report. First match wins for each target; the support
/// line is relabeled from its report phrasing to `Node support(s):`.
///
/// Returns display text in every case: the two lines joined by a newline,
/// the model line alone when no support line exists, a fixed sentinel
/// when neither is present, and the read error text when the file cannot
/// be read.
pub fn extract_model_summary(path: &Path) -> String {
    match scan_report(path) {
        Ok((Some(model), Some(support))) => format!("{}\n{}", model, support),
        Ok((Some(model), None)) => model,
        Ok((None, _)) => "Model information not found".to_string(),
        Err(e) => format!("Failed to retrieve information: {}", e),
    }
}

fn scan_report(path: &Path) -> std::io::Result<(Option<String>, Option<String>)> {
    let reader = BufReader::new(File::open(path)?);
    let mut model = None;
    let mut support = None;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if model.is_none() && line.starts_with(MODEL_PREFIX) {
            model = Some(line.to_string());
        }
        if support.is_none() {
            if let Some(rest) = line.strip_prefix(SUPPORT_PREFIX) {
                support = Some(format!("{}{}", SUPPORT_LABEL, rest));
            }
        }
        if model.is_some() && support.is_some() {
            break;
        }
    }
    Ok((model, support))
}
