use crate::pairs::MatePair;
use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const OUTPUT_BUFFER_SIZE: usize = 1024 * 1024;

/// Input file name with its directory and final extension stripped.
fn input_stem(fasta_path: &Path) -> String {
    fasta_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("reads")
        .to_string()
}

/// Compose the two output file paths.
///
/// Constant-coverage runs embed the coverage in the name; table-driven
/// runs omit it since coverage varies per sequence.
pub fn output_paths(
    fasta_path: &Path,
    outdir: &Path,
    read_len: usize,
    insert_len: usize,
    coverage: Option<u64>,
) -> (PathBuf, PathBuf) {
    let stem = input_stem(fasta_path);
    let base = match coverage {
        Some(cov) => format!("{}.cov_{}.len_{}.ins_{}", stem, cov, read_len, insert_len),
        None => format!("{}.len_{}.ins_{}", stem, read_len, insert_len),
    };
    (
        outdir.join(format!("{}.1.fq", base)),
        outdir.join(format!("{}.2.fq", base)),
    )
}

/// Format one mate as a four-line FASTQ record into `buffer`.
///
/// `start` and `end` are 0-based fragment coordinates; the emitted
/// metadata is 1-based inclusive.
fn format_mate(
    buffer: &mut Vec<u8>,
    name: &str,
    header: &str,
    read: &[u8],
    frag_num: u64,
    mate: u8,
    start: usize,
    end: usize,
    qual_char: u8,
) -> Result<()> {
    buffer.clear();
    writeln!(buffer, "@{}_read_{}/{}", name, frag_num, mate)?;
    buffer.extend_from_slice(read);
    buffer.push(b'\n');
    writeln!(buffer, "+{} frag_start={} frag_end={}", header, start + 1, end + 1)?;
    buffer.extend(std::iter::repeat(qual_char).take(read.len()));
    buffer.push(b'\n');
    Ok(())
}

/// Writes synchronized mate records to the two FASTQ sinks.
///
/// Both sinks are owned for the duration of the run and appended to in
/// strict emission order, keeping fragment numbers aligned across the
/// two files.
pub struct PairWriter {
    out1: BufWriter<File>,
    out2: BufWriter<File>,
    qual_char: u8,
    buffer: Vec<u8>,
}

impl PairWriter {
    pub fn create(path1: &Path, path2: &Path, qual_char: u8) -> Result<Self> {
        Ok(PairWriter {
            out1: create_writer(path1)?,
            out2: create_writer(path2)?,
            qual_char,
            buffer: Vec::with_capacity(1024),
        })
    }

    /// Append one mate pair to both streams.
    pub fn write_pair(
        &mut self,
        name: &str,
        header: &str,
        frag_num: u64,
        start: usize,
        end: usize,
        pair: &MatePair,
    ) -> Result<()> {
        format_mate(
            &mut self.buffer,
            name,
            header,
            &pair.mate1,
            frag_num,
            1,
            start,
            end,
            self.qual_char,
        )?;
        self.out1.write_all(&self.buffer)?;
        format_mate(
            &mut self.buffer,
            name,
            header,
            &pair.mate2,
            frag_num,
            2,
            start,
            end,
            self.qual_char,
        )?;
        self.out2.write_all(&self.buffer)?;
        Ok(())
    }

    /// Flush both streams.
    pub fn finish(mut self) -> Result<()> {
        self.out1.flush().context("Failed to flush mate 1 output")?;
        self.out2.flush().context("Failed to flush mate 2 output")?;
        Ok(())
    }
}

fn create_writer(path: &Path) -> Result<BufWriter<File>> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    Ok(BufWriter::with_capacity(OUTPUT_BUFFER_SIZE, file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairs::split_fragment;
    use tempfile::tempdir;

    #[test]
    fn test_output_paths_with_constant_coverage() {
        let (p1, p2) = output_paths(
            Path::new("refs/phage.fa"),
            Path::new("out"),
            150,
            100,
            Some(10),
        );
        assert_eq!(p1, PathBuf::from("out/phage.cov_10.len_150.ins_100.1.fq"));
        assert_eq!(p2, PathBuf::from("out/phage.cov_10.len_150.ins_100.2.fq"));
    }

    #[test]
    fn test_output_paths_without_coverage() {
        let (p1, p2) = output_paths(Path::new("viruses.fasta"), Path::new("."), 100, 50, None);
        assert_eq!(p1, PathBuf::from("./viruses.len_100.ins_50.1.fq"));
        assert_eq!(p2, PathBuf::from("./viruses.len_100.ins_50.2.fq"));
    }

    #[test]
    fn test_format_mate_record() {
        let mut buffer = Vec::new();
        format_mate(&mut buffer, "phage", "phage", b"ACGTA", 3, 1, 0, 11, b'I').unwrap();
        assert_eq!(
            buffer,
            b"@phage_read_3/1\nACGTA\n+phage frag_start=1 frag_end=12\nIIIII\n"
        );
    }

    #[test]
    fn test_format_mate_uses_name_for_id_and_header_for_comment() {
        let mut buffer = Vec::new();
        format_mate(&mut buffer, "lambda", "NC_001416.1", b"TT", 1, 2, 4, 9, b'#').unwrap();
        assert_eq!(
            buffer,
            b"@lambda_read_1/2\nTT\n+NC_001416.1 frag_start=5 frag_end=10\n##\n"
        );
    }

    #[test]
    fn test_pair_writer_round_trip() {
        let temp_dir = tempdir().unwrap();
        let path1 = temp_dir.path().join("reads.1.fq");
        let path2 = temp_dir.path().join("reads.2.fq");

        let mut writer = PairWriter::create(&path1, &path2, b'I').unwrap();
        let pair = split_fragment(b"AATTCCGG", 3);
        writer.write_pair("s", "s", 1, 0, 7, &pair).unwrap();
        writer.finish().unwrap();

        let fq1 = std::fs::read_to_string(&path1).unwrap();
        let fq2 = std::fs::read_to_string(&path2).unwrap();
        assert_eq!(fq1, "@s_read_1/1\nAAT\n+s frag_start=1 frag_end=8\nIII\n");
        assert_eq!(fq2, "@s_read_1/2\nCCG\n+s frag_start=1 frag_end=8\nIII\n");
    }
}
