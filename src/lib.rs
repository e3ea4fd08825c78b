//! # pairtile
//!
//! Deterministic paired-end read simulation: tiles perfectly even,
//! error-free read pairs across one or more reference sequences at a
//! requested coverage, writing a synchronized pair of FASTQ files for
//! use as ground-truth test data in sequencing-analysis pipelines.
//!
//! This crate provides both a library and a binary.

pub mod coverage;
pub mod output;
pub mod pairs;
pub mod simulate;
pub mod tiling;

// Re-export the important structures and functions for library users
pub use coverage::{CoverageSource, CoverageTable};
pub use output::output_paths;
pub use pairs::{complement, split_fragment, MatePair};
pub use simulate::{run, SimulateSummary};
pub use tiling::PhasePlan;

use std::path::PathBuf;

pub const DEFAULT_READ_LEN: usize = 150;
pub const DEFAULT_INSERT_LEN: usize = 100;
pub const DEFAULT_COVERAGE: u64 = 10;
pub const DEFAULT_QUAL_CHAR: char = 'I';

/// Configuration for one simulation run
pub struct SimulateConfig {
    /// Path to the input FASTA file
    pub fasta_path: PathBuf,

    /// Length of each mate read
    pub read_len: usize,

    /// Unsequenced gap between the two mates of a fragment
    pub insert_len: usize,

    /// Fill character for the synthetic quality lines
    pub qual_char: u8,

    /// Read name prefix; the record header is used when absent
    pub read_name_prefix: Option<String>,

    /// Directory receiving the two FASTQ files
    pub outdir: PathBuf,

    /// Constant or per-header coverage
    pub coverage: CoverageSource,

    /// Path to optional JSON run summary
    pub summary_path: Option<PathBuf>,

    /// Suppress progress reporting
    pub quiet: bool,
}

impl SimulateConfig {
    /// Full fragment length: both mates plus the insert gap.
    pub fn fragment_len(&self) -> usize {
        2 * self.read_len + self.insert_len
    }
}
