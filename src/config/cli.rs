use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "foldprep")]
#[command(about = "FASTA preparation and AlphaFold batch tooling for binder campaigns")]
#[command(after_help = "\
TYPICAL WORKFLOW:
  foldprep campaign --output runs            # fetch UniProt, write variant pairs
  foldprep replace --input-dir runs/MMP2 --replacement-sequence <SEQ>
  foldprep jobs --input-dir output_fastas    # AlphaFold Server batch JSON
  foldprep rename --directory results        # tidy downloaded result archives
  foldprep scores --directory results        # ipTM/pTM table")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log CPU and memory usage of the run
    #[arg(long, global = true)]
    pub monitor: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch sequences from UniProt and write ligand-variant × target FASTA pairs
    Campaign {
        /// Campaign TOML; the built-in TIMP3 campaign is used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override output.directory
        #[arg(short, long)]
        output: Option<String>,

        /// Override source.base_url
        #[arg(long)]
        base_url: Option<String>,

        /// Validate and print the plan without fetching anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Replace the second protein in every FASTA file of a directory
    Replace {
        #[arg(long, default_value = "input_fastas")]
        input_dir: PathBuf,

        #[arg(long, default_value = "output_fastas")]
        output_dir: PathBuf,

        /// The sequence to replace the second protein with
        #[arg(long)]
        replacement_sequence: String,

        /// Residues per sequence line, 0 for unwrapped
        #[arg(long, default_value = "60")]
        line_width: usize,
    },

    /// Split colon-separated complexes into one record per chain
    Separate {
        input_folder: PathBuf,
        output_folder: PathBuf,
    },

    /// Build an AlphaFold Server batch JSON from a directory of FASTA files
    Jobs {
        #[arg(long, default_value = "output_fastas")]
        input_dir: PathBuf,

        #[arg(short, long, default_value = "alphafold_jobs.json")]
        output: PathBuf,

        /// Model seeds to request for every job
        #[arg(long, value_delimiter = ',')]
        seeds: Vec<String>,

        /// Merge identical chains into one entity with a copy count
        #[arg(long)]
        collapse_identical: bool,

        /// Split output into numbered files of at most N jobs
        #[arg(long)]
        max_jobs_per_file: Option<usize>,
    },

    /// Rename fold_{ligand}_variant_{variant}_{target}.zip result archives
    Rename {
        #[arg(short, long, default_value = "./AlphaFold")]
        directory: PathBuf,

        #[arg(long)]
        dry_run: bool,
    },

    /// Collect summary confidences from result archives into a CSV
    Scores {
        #[arg(short, long, default_value = "./AlphaFold")]
        directory: PathBuf,

        #[arg(short, long, default_value = "alphafold_scores.csv")]
        output: PathBuf,
    },
}
