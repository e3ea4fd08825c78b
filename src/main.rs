use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pairtile::{
    CoverageSource, CoverageTable, SimulateConfig, DEFAULT_COVERAGE, DEFAULT_INSERT_LEN,
    DEFAULT_QUAL_CHAR, DEFAULT_READ_LEN,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Perfectly tiled paired-end read simulation from reference genomes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate read pairs from a genome at one constant coverage
    Single {
        /// Path to fasta file containing reference sequence record(s)
        fasta: PathBuf,

        /// Mean coverage to simulate
        #[arg(short = 'c', long = "coverage", default_value_t = DEFAULT_COVERAGE)]
        coverage: u64,

        /// Read length
        #[arg(short = 'l', long = "read-len", default_value_t = DEFAULT_READ_LEN)]
        read_len: usize,

        /// Insert length between the two mates
        #[arg(short = 'i', long = "insert-len", default_value_t = DEFAULT_INSERT_LEN)]
        insert_len: usize,

        /// Fill character for quality lines
        #[arg(short = 'q', long = "qual-char", default_value_t = DEFAULT_QUAL_CHAR)]
        qual_char: char,

        /// Prefix for read names (defaults to the sequence header)
        #[arg(short = 'p', long = "prefix")]
        prefix: Option<String>,

        /// Output directory
        #[arg(short = 'o', long = "outdir", default_value = ".")]
        outdir: PathBuf,

        /// Path to JSON summary file
        #[arg(long = "summary")]
        summary: Option<PathBuf>,

        /// Suppress progress reporting
        #[arg(long = "quiet", default_value_t = false)]
        quiet: bool,
    },

    /// Simulate read pairs from multiple genomes with per-header coverages
    Multi {
        /// Path to fasta file containing reference sequence record(s)
        fasta: PathBuf,

        /// Tab-separated header/coverage table, one record per line
        #[arg(short = 'f', long = "coverage-file")]
        coverage_file: PathBuf,

        /// Read length
        #[arg(short = 'l', long = "read-len", default_value_t = DEFAULT_READ_LEN)]
        read_len: usize,

        /// Insert length between the two mates
        #[arg(short = 'i', long = "insert-len", default_value_t = DEFAULT_INSERT_LEN)]
        insert_len: usize,

        /// Fill character for quality lines
        #[arg(short = 'q', long = "qual-char", default_value_t = DEFAULT_QUAL_CHAR)]
        qual_char: char,

        /// Output directory
        #[arg(short = 'o', long = "outdir", default_value = ".")]
        outdir: PathBuf,

        /// Path to JSON summary file
        #[arg(long = "summary")]
        summary: Option<PathBuf>,

        /// Suppress progress reporting
        #[arg(long = "quiet", default_value_t = false)]
        quiet: bool,
    },
}

fn parse_qual_char(qual_char: char) -> Result<u8> {
    u8::try_from(qual_char)
        .map_err(|_| anyhow::anyhow!("Quality character must be ASCII: {:?}", qual_char))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.command {
        Commands::Single {
            fasta,
            coverage,
            read_len,
            insert_len,
            qual_char,
            prefix,
            outdir,
            summary,
            quiet,
        } => SimulateConfig {
            fasta_path: fasta,
            read_len,
            insert_len,
            qual_char: parse_qual_char(qual_char)?,
            read_name_prefix: prefix,
            outdir,
            coverage: CoverageSource::Uniform(coverage),
            summary_path: summary,
            quiet,
        },
        Commands::Multi {
            fasta,
            coverage_file,
            read_len,
            insert_len,
            qual_char,
            outdir,
            summary,
            quiet,
        } => {
            // Table problems abort here, before the FASTA is opened and
            // before any output file is created
            let table = CoverageTable::from_path(&coverage_file)?;
            SimulateConfig {
                fasta_path: fasta,
                read_len,
                insert_len,
                qual_char: parse_qual_char(qual_char)?,
                read_name_prefix: None,
                outdir,
                coverage: CoverageSource::Table(table),
                summary_path: summary,
                quiet,
            }
        }
    };

    pairtile::run(&config).context("Failed to simulate read pairs")?;

    Ok(())
}
