use anyhow::{anyhow, Result};

/// Scale a requested per-base coverage into a fragment-count coverage.
///
/// A fragment of `fragment_len` bases only sequences `2 * read_len` of
/// them; the insert gap in the middle is never read. Depositing the
/// requested per-base coverage therefore takes proportionally more
/// fragment tilings.
pub fn effective_coverage(requested: u64, fragment_len: usize, read_len: usize) -> f64 {
    requested as f64 * fragment_len as f64 / (2.0 * read_len as f64)
}

/// Spacing between phase seeds: the fragment length divided by the
/// effective coverage, rounded to the nearest whole base.
///
/// A zero effective coverage, or a coverage so high that the step rounds
/// to zero, cannot tile anything and is rejected up front.
pub fn phase_step(fragment_len: usize, effective: f64) -> Result<usize> {
    if effective <= 0.0 {
        return Err(anyhow!("Requested coverage is zero; nothing to tile"));
    }
    let step = (fragment_len as f64 / effective).round() as usize;
    if step == 0 {
        return Err(anyhow!(
            "Effective coverage {:.2} is too high for fragment length {}: phase step rounds to zero",
            effective,
            fragment_len
        ));
    }
    Ok(step)
}

/// Initial offsets staggering the repeated tilings across the genome.
///
/// Seeds run `0, step, 2*step, ..` up to and including `fragment_len`,
/// truncated to at most `floor(effective)` seeds. Truncation toward zero
/// is the declared policy: a fractional effective coverage yields fewer
/// seeds, never more.
pub fn phase_seeds(fragment_len: usize, step: usize, effective: f64) -> Vec<usize> {
    (0..=fragment_len)
        .step_by(step)
        .take(effective as usize)
        .collect()
}

/// Fragment start positions for one phase, tiled at `fragment_len` stride
/// from `seed`.
///
/// The phase contributes `floor((genome_len - seed + 1) / fragment_len)`
/// positions; a genome too short for the seed simply contributes none.
/// A start whose fragment would run past the end of the sequence is
/// dropped rather than truncated.
pub fn phase_starts(genome_len: usize, seed: usize, fragment_len: usize) -> Vec<usize> {
    if seed >= genome_len {
        return Vec::new();
    }
    let count = (genome_len - seed + 1) / fragment_len;
    (0..count)
        .map(|i| seed + i * fragment_len)
        .filter(|start| start + fragment_len <= genome_len)
        .collect()
}

/// A tiling plan for one (read length, insert length, coverage)
/// combination, reusable across sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhasePlan {
    fragment_len: usize,
    seeds: Vec<usize>,
}

impl PhasePlan {
    pub fn new(read_len: usize, insert_len: usize, coverage: u64) -> Result<Self> {
        let fragment_len = 2 * read_len + insert_len;
        let effective = effective_coverage(coverage, fragment_len, read_len);
        let step = phase_step(fragment_len, effective)?;
        let seeds = phase_seeds(fragment_len, step, effective);
        Ok(PhasePlan {
            fragment_len,
            seeds,
        })
    }

    pub fn fragment_len(&self) -> usize {
        self.fragment_len
    }

    pub fn seeds(&self) -> &[usize] {
        &self.seeds
    }

    /// All fragment start positions for a genome of `genome_len` bases,
    /// phase-major: every position of the first seed, then the second,
    /// and so on. This order fixes fragment numbering and the output
    /// record order, so it must not change.
    pub fn fragment_starts(&self, genome_len: usize) -> Vec<usize> {
        self.seeds
            .iter()
            .flat_map(|&seed| phase_starts(genome_len, seed, self.fragment_len))
            .collect()
    }
}
