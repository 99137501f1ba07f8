use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use phylox_core::{
    annotate_tree, extract_model_summary, iqtree_version, missing_tools, run_iqtree, run_mafft,
    run_trimal, trimal_version, AlignMode, GeneMap, IqTreeParams, PathResolver, SystemRunner,
    ToolResolver, TrimMode,
};

#[derive(Parser)]
#[command(name = "phylox")]
#[command(about = "PhyloX - align, trim, and infer phylogenies with MAFFT, trimAl, and IQ-TREE")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Align sequences with MAFFT
    Align {
        /// Input FASTA file (stdin when omitted)
        input: Option<PathBuf>,

        /// Number of threads (must be at least 1)
        #[arg(short, long, default_value = "4")]
        threads: u32,

        /// Alignment mode (auto, linsi, ginsi, einsi)
        #[arg(short, long, default_value = "auto")]
        mode: String,

        /// Write the alignment here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Trim an alignment with trimAl
    Trim {
        /// Input alignment file (stdin when omitted)
        input: Option<PathBuf>,

        /// Trim mode (automated1, gappyout, strict, strictplus, nogaps)
        #[arg(short, long, default_value = "automated1")]
        mode: String,

        /// Write the trimmed alignment here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep the trimAl output and HTML report files and print their paths
        #[arg(long)]
        keep_files: bool,
    },

    /// Infer a tree with IQ-TREE
    Tree {
        /// Input alignment file (stdin when omitted)
        input: Option<PathBuf>,

        /// Number of threads (0 = auto)
        #[arg(short, long, default_value = "0")]
        threads: String,

        /// Ultrafast bootstrap replicates (0 disables)
        #[arg(long, default_value = "1000")]
        ufboot: String,

        /// SH-aLRT replicates (0 disables)
        #[arg(long = "sh-alrt", default_value = "1000")]
        sh_alrt: String,

        /// Local bootstrap probability replicates (0 disables)
        #[arg(long, default_value = "0")]
        lbp: String,

        /// Run the approximate Bayes test
        #[arg(long)]
        abayes: bool,

        /// Substitution model (auto = ModelFinder)
        #[arg(short, long, default_value = "auto")]
        model: String,

        /// Output prefix for the IQ-TREE run
        #[arg(short, long, default_value = "tmp")]
        prefix: String,

        /// Write the Newick tree here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Add gene names to a Newick tree
    Annotate {
        /// Input tree file (stdin when omitted)
        input: Option<PathBuf>,

        /// Two-column identifier/name mapping file
        #[arg(short, long)]
        genes: PathBuf,

        /// Write the annotated tree here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract the model/support summary from an IQ-TREE report
    Report {
        /// The .iqtree report file
        report: PathBuf,
    },

    /// Check that the external tools are installed
    Tools,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Align {
            input,
            threads,
            mode,
            output,
        } => cmd_align(input, threads, &mode, output),
        Commands::Trim {
            input,
            mode,
            output,
            keep_files,
        } => cmd_trim(input, &mode, output, keep_files),
        Commands::Tree {
            input,
            threads,
            ufboot,
            sh_alrt,
            lbp,
            abayes,
            model,
            prefix,
            output,
        } => {
            let params = IqTreeParams {
                threads,
                ufboot,
                sh_alrt,
                lbp,
                abayes,
                model,
                prefix,
            };
            cmd_tree(input, params, output)
        }
        Commands::Annotate {
            input,
            genes,
            output,
        } => cmd_annotate(input, &genes, output),
        Commands::Report { report } => {
            println!("{}", extract_model_summary(&report));
            Ok(())
        }
        Commands::Tools => cmd_tools(),
    }
}

fn read_input(path: &Option<PathBuf>) -> Result<String> {
    match path {
        Some(p) => Ok(fs::read_to_string(p)?),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn write_output(output: &Option<PathBuf>, text: &str) -> Result<()> {
    match output {
        Some(p) => {
            fs::write(p, text)?;
            log::info!("Result saved: {}", p.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn cmd_align(
    input: Option<PathBuf>,
    threads: u32,
    mode: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let mode: AlignMode = mode.parse()?;
    let fasta = read_input(&input)?;
    let aligned = run_mafft(&SystemRunner, &fasta, threads, mode)?;
    write_output(&output, &aligned)
}

fn cmd_trim(
    input: Option<PathBuf>,
    mode: &str,
    output: Option<PathBuf>,
    keep_files: bool,
) -> Result<()> {
    let mode: TrimMode = mode.parse()?;
    log::debug!("trimAl: {}", trimal_version(&SystemRunner));

    let alignment = read_input(&input)?;
    let outcome = run_trimal(&SystemRunner, &alignment, mode)?;

    if keep_files {
        log::info!("Trimmed alignment: {}", outcome.output_path.display());
        log::info!("HTML report: {}", outcome.html_path.display());
    } else {
        let _ = fs::remove_file(&outcome.output_path);
        let _ = fs::remove_file(&outcome.html_path);
    }
    write_output(&output, &outcome.trimmed)
}

fn cmd_tree(input: Option<PathBuf>, params: IqTreeParams, output: Option<PathBuf>) -> Result<()> {
    log::debug!(
        "IQ-TREE version: {}",
        iqtree_version(&SystemRunner, &PathResolver)
    );

    let alignment = read_input(&input)?;
    let outcome = run_iqtree(&SystemRunner, &PathResolver, &alignment, &params)?;

    for line in extract_model_summary(&outcome.report_file).lines() {
        log::info!("{}", line);
    }
    log::info!("Output files: {}", outcome.output_dir.display());

    let tree = fs::read_to_string(&outcome.treefile)?;
    write_output(&output, &tree)
}

fn cmd_annotate(input: Option<PathBuf>, genes: &PathBuf, output: Option<PathBuf>) -> Result<()> {
    let map = GeneMap::load(genes)?;
    log::debug!("Loaded {} gene names from {}", map.len(), genes.display());

    let tree = read_input(&input)?;
    write_output(&output, &annotate_tree(&tree, &map))
}

fn cmd_tools() -> Result<()> {
    let resolver = PathResolver;
    println!("mafft:   {}", availability(&resolver, "mafft"));
    println!("trimal:  {}", trimal_version(&SystemRunner));
    println!("iqtree:  {}", iqtree_version(&SystemRunner, &resolver));

    let missing = missing_tools(&resolver);
    if missing.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("Missing required tools:\n{}", missing.join("\n"))
    }
}

fn availability(resolver: &dyn ToolResolver, name: &str) -> String {
    match resolver.resolve(&[name]) {
        Some(path) => path.display().to_string(),
        None => "not found".to_string(),
    }
}
