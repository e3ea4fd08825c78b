use crate::coverage::CoverageSource;
use crate::output::{output_paths, PairWriter};
use crate::pairs::split_fragment;
use crate::tiling::PhasePlan;
use crate::SimulateConfig;
use anyhow::{anyhow, Context, Result};
use needletail::parse_fastx_file;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::time::Instant;

/// End-of-run accounting, written as JSON when a summary path is given.
#[derive(Debug, Serialize, Deserialize)]
pub struct SimulateSummary {
    pub version: String,
    pub input: String,
    pub output1: String,
    pub output2: String,
    pub mode: String,
    pub read_len: usize,
    pub insert_len: usize,
    pub fragment_len: usize,
    pub sequences: u64,
    pub pairs: u64,
    pub bp_out: u64,
    pub time: f64,
    pub pairs_per_second: u64,
}

/// Check paths and parameters before any work happens.
fn check_config(config: &SimulateConfig) -> Result<()> {
    if !config.fasta_path.exists() {
        return Err(anyhow!(
            "Input file does not exist: {}",
            config.fasta_path.display()
        ));
    }
    if !config.outdir.is_dir() {
        return Err(anyhow!(
            "Output directory does not exist: {}",
            config.outdir.display()
        ));
    }
    if config.read_len == 0 {
        return Err(anyhow!("Read length must be positive"));
    }
    if !config.qual_char.is_ascii_graphic() {
        return Err(anyhow!(
            "Quality character must be a printable ASCII character"
        ));
    }
    if let Some(prefix) = &config.read_name_prefix {
        if prefix.is_empty() {
            return Err(anyhow!("Read name prefix must not be empty"));
        }
    }
    Ok(())
}

/// Tile every input sequence into perfectly spaced read pairs and write
/// them to the two FASTQ outputs.
///
/// Sequences are processed one at a time and held in memory whole, which
/// bounds per-genome memory to the sequence length. Fine for the
/// viral/microbial scale this targets; not a tool for human chromosomes.
pub fn run(config: &SimulateConfig) -> Result<SimulateSummary> {
    let start_time = Instant::now();
    let version = env!("CARGO_PKG_VERSION").to_string();

    check_config(config)?;

    let fragment_len = config.fragment_len();
    let (mode, filename_coverage) = match &config.coverage {
        CoverageSource::Uniform(cov) => ("single", Some(*cov)),
        CoverageSource::Table(_) => ("multi", None),
    };

    if !config.quiet {
        eprintln!(
            "pairtile v{}; mode: {}; read_len: {}; insert_len: {}; fragment_len: {}",
            version, mode, config.read_len, config.insert_len, fragment_len
        );
    }

    // Constant-coverage runs tile every record identically; building the
    // plan up front also rejects degenerate parameters before any output
    // file is created.
    let uniform_plan = match &config.coverage {
        CoverageSource::Uniform(cov) => Some(PhasePlan::new(
            config.read_len,
            config.insert_len,
            *cov,
        )?),
        CoverageSource::Table(_) => None,
    };

    let (path1, path2) = output_paths(
        &config.fasta_path,
        &config.outdir,
        config.read_len,
        config.insert_len,
        filename_coverage,
    );
    let mut writer = PairWriter::create(&path1, &path2, config.qual_char)?;

    let mut reader = parse_fastx_file(&config.fasta_path).with_context(|| {
        format!("Failed to open input file {}", config.fasta_path.display())
    })?;

    let mut sequences: u64 = 0;
    let mut pairs: u64 = 0;
    let mut bp_out: u64 = 0;
    // Shared between the two streams and never reset between sequences
    let mut frag_num: u64 = 1;

    while let Some(record_result) = reader.next() {
        let record = record_result.context("Error reading FASTA record")?;
        let header = std::str::from_utf8(record.id())
            .context("Sequence header is not valid UTF-8")?
            .to_string();
        let seq = record.seq();
        let genome_len = seq.len();

        let coverage = config.coverage.resolve(&header)?;
        let record_plan;
        let plan = match &uniform_plan {
            Some(plan) => plan,
            None => {
                record_plan = PhasePlan::new(config.read_len, config.insert_len, coverage)?;
                &record_plan
            }
        };

        let name = config.read_name_prefix.as_deref().unwrap_or(&header);

        let starts = plan.fragment_starts(genome_len);
        for &start in &starts {
            let end = start + fragment_len - 1;
            let pair = split_fragment(&seq[start..=end], config.read_len);
            bp_out += (pair.mate1.len() + pair.mate2.len()) as u64;
            writer.write_pair(name, &header, frag_num, start, end, &pair)?;
            frag_num += 1;
            pairs += 1;
        }

        sequences += 1;
        if !config.quiet {
            eprintln!(
                "  {} ({}bp): cov {}, {} fragments",
                header,
                genome_len,
                coverage,
                starts.len()
            );
        }
    }

    writer.finish()?;

    let time = start_time.elapsed();
    let pairs_per_second = (pairs as f64 / time.as_secs_f64()) as u64;

    if !config.quiet {
        eprintln!(
            "Wrote {} read pairs ({} bp) from {} sequence(s) in {:.2?} ({} pairs/s)",
            pairs, bp_out, sequences, time, pairs_per_second
        );
    }

    let summary = SimulateSummary {
        version: format!("pairtile {}", version),
        input: config.fasta_path.to_string_lossy().to_string(),
        output1: path1.to_string_lossy().to_string(),
        output2: path2.to_string_lossy().to_string(),
        mode: mode.to_string(),
        read_len: config.read_len,
        insert_len: config.insert_len,
        fragment_len,
        sequences,
        pairs,
        bp_out,
        time: time.as_secs_f64(),
        pairs_per_second,
    };

    if let Some(summary_path) = &config.summary_path {
        let file = File::create(summary_path)
            .with_context(|| format!("Failed to create summary {}", summary_path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &summary)
            .context("Failed to write summary")?;
        if !config.quiet {
            eprintln!("Summary saved to {}", summary_path.display());
        }
    }

    Ok(summary)
}
