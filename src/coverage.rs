use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Per-header target coverages loaded from a two-column TSV file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageTable {
    coverages: HashMap<String, u64>,
}

impl CoverageTable {
    /// Load `header<TAB>coverage` records from a file.
    ///
    /// Duplicate headers, missing fields and non-integer coverage values
    /// are fatal. Blank lines are skipped and the trailing newline is
    /// optional.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read coverage file {}", path.display()))?;
        Self::parse(&text, path)
    }

    fn parse(text: &str, origin: &Path) -> Result<Self> {
        let mut coverages = HashMap::new();
        for (index, line) in text.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let (header, value) = line.split_once('\t').ok_or_else(|| {
                anyhow!(
                    "{}:{}: expected two tab-separated fields, got {:?}",
                    origin.display(),
                    index + 1,
                    line
                )
            })?;
            if header.is_empty() {
                return Err(anyhow!(
                    "{}:{}: empty header field",
                    origin.display(),
                    index + 1
                ));
            }
            let coverage: u64 = value.trim_end().parse().with_context(|| {
                format!(
                    "{}:{}: invalid coverage value {:?}",
                    origin.display(),
                    index + 1,
                    value
                )
            })?;
            if coverages.insert(header.to_string(), coverage).is_some() {
                return Err(anyhow!("{} is repeated in {}", header, origin.display()));
            }
        }
        Ok(CoverageTable { coverages })
    }

    pub fn get(&self, header: &str) -> Option<u64> {
        self.coverages.get(header).copied()
    }

    pub fn len(&self) -> usize {
        self.coverages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coverages.is_empty()
    }
}

/// Where per-sequence coverage values come from: one constant for every
/// record, or a per-header table.
#[derive(Debug, Clone)]
pub enum CoverageSource {
    Uniform(u64),
    Table(CoverageTable),
}

impl CoverageSource {
    /// Coverage for one sequence header.
    ///
    /// With a table source, a header absent from the table is fatal and
    /// aborts the whole run.
    pub fn resolve(&self, header: &str) -> Result<u64> {
        match self {
            CoverageSource::Uniform(coverage) => Ok(*coverage),
            CoverageSource::Table(table) => table.get(header).ok_or_else(|| {
                anyhow!(
                    "{} is present in the input but not in the coverage file",
                    header
                )
            }),
        }
    }
}
