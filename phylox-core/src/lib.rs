//! PhyloX Core Library
//!
//! Command builders and blocking drivers for the external tools of the
//! align/trim/infer pipeline (MAFFT, trimAl, IQ-TREE), plus report
//! extraction and gene-name annotation of the resulting Newick text.

pub mod types;
pub mod runner;
pub mod align;
pub mod trim;
pub mod tree;
pub mod report;
pub mod annotate;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export commonly used types and functions
pub use types::{ToolError, ToolResult};
pub use runner::{
    missing_tools, PathResolver, ProcessOutput, ProcessRequest, ProcessRunner, SystemRunner,
    ToolResolver,
};
pub use align::{build_mafft_args, run_mafft, AlignMode};
pub use trim::{run_trimal, trimal_version, TrimMode, TrimOutcome};
pub use tree::{build_iqtree_args, iqtree_version, run_iqtree, IqTreeParams, TreeOutcome};
pub use report::extract_model_summary;
pub use annotate::{annotate_tree, GeneMap};

/// Version information for the PhyloX core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
