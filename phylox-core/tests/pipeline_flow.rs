//! End-to-end flow over the public API with a stand-in process runner:
//! trim an alignment, "infer" a tree, extract the report summary, and
//! annotate the result.

use std::fs;
use std::path::PathBuf;

use phylox_core::{
    annotate_tree, extract_model_summary, run_iqtree, run_trimal, GeneMap, IqTreeParams,
    ProcessOutput, ProcessRequest, ProcessRunner, ToolResolver, ToolResult, TrimMode,
};

/// Stand-in for the external binaries: writes canned output files to the
/// paths named in the arguments.
struct CannedTools;

fn arg_after(request: &ProcessRequest, flag: &str) -> Option<PathBuf> {
    request
        .args
        .iter()
        .position(|a| a == flag)
        .map(|i| PathBuf::from(&request.args[i + 1]))
}

impl ProcessRunner for CannedTools {
    fn run(&self, request: &ProcessRequest) -> ToolResult<ProcessOutput> {
        match request.program.as_str() {
            "trimal" => {
                fs::write(arg_after(request, "-out").unwrap(), ">s1\nACGT\n>s2\nACGA\n")?;
                fs::write(arg_after(request, "-htmlout").unwrap(), "<html></html>")?;
            }
            "iqtree" => {
                let dir = request.cwd.clone().unwrap();
                let prefix = arg_after(request, "--prefix").unwrap();
                let prefix = prefix.to_string_lossy();
                fs::write(
                    dir.join(format!("{}.treefile", prefix)),
                    "(AT1G01010:0.1,AT1G01020:0.2);\n",
                )?;
                fs::write(
                    dir.join(format!("{}.iqtree", prefix)),
                    "Model of substitution: GTR+F+I\n\
                     Numbers in parentheses are SH-aLRT support (%)\n",
                )?;
            }
            other => panic!("unexpected program: {}", other),
        }
        Ok(ProcessOutput {
            success: true,
            code: Some(0),
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}

struct IqTreeOnly;

impl ToolResolver for IqTreeOnly {
    fn resolve(&self, names: &[&str]) -> Option<PathBuf> {
        names
            .iter()
            .find(|name| **name == "iqtree")
            .map(|name| PathBuf::from(*name))
    }
}

#[test]
fn trim_then_tree_then_annotate() {
    let trim = run_trimal(&CannedTools, ">s1\nAC--GT\n>s2\nAC--GA\n", TrimMode::Automated1)
        .expect("trim run");
    assert_eq!(trim.trimmed, ">s1\nACGT\n>s2\nACGA\n");

    let params = IqTreeParams {
        ufboot: "1000".to_string(),
        sh_alrt: "1000".to_string(),
        ..IqTreeParams::default()
    };
    let tree = run_iqtree(&CannedTools, &IqTreeOnly, &trim.trimmed, &params).expect("tree run");

    let newick = fs::read_to_string(&tree.treefile).expect("treefile");
    assert!(newick.starts_with('('));

    let summary = extract_model_summary(&tree.report_file);
    assert_eq!(
        summary,
        "Model of substitution: GTR+F+I\nNode support(s): SH-aLRT support (%)"
    );

    let genes = GeneMap::from_pairs([("AT1G01010", "NAC001"), ("AT1G01020", "ARV1")]);
    let annotated = annotate_tree(&newick, &genes);
    assert_eq!(
        annotated.trim_end(),
        "(AT1G01010<NAC001>:0.1,AT1G01020<ARV1>:0.2);"
    );

    // Stage outputs are caller-owned; clean them up here.
    fs::remove_file(&trim.output_path).unwrap();
    fs::remove_file(&trim.html_path).unwrap();
    fs::remove_dir_all(&tree.output_dir).unwrap();
}
