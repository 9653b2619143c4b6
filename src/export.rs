//! CSV output of scaled stereo samples.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// Writes `time_s,ch1_<unit>,ch2_<unit>` rows, one per frame.
pub struct CsvSink<W: Write> {
    writer: W,
    sample_rate: u32,
    frames_written: u64,
}

impl CsvSink<BufWriter<File>> {
    pub fn create(path: &Path, sample_rate: u32, units: [&str; 2]) -> Result<Self> {
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        Ok(Self::new(BufWriter::new(file), sample_rate, units)?)
    }
}

impl<W: Write> CsvSink<W> {
    pub fn new(mut writer: W, sample_rate: u32, units: [&str; 2]) -> io::Result<Self> {
        writeln!(
            writer,
            "time_s,ch1_{},ch2_{}",
            column_unit(units[0]),
            column_unit(units[1])
        )?;
        Ok(Self {
            writer,
            sample_rate: sample_rate.max(1),
            frames_written: 0,
        })
    }

    /// Append one interleaved stereo block.
    pub fn write_block(&mut self, block: &[f32]) -> io::Result<()> {
        for frame in block.chunks_exact(2) {
            let time_s = self.frames_written as f64 / f64::from(self.sample_rate);
            writeln!(self.writer, "{time_s:.6},{},{}", frame[0], frame[1])?;
            self.frames_written += 1;
        }
        Ok(())
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Units like `m/s^2` become `m_s_2` so headers stay one CSV token.
fn column_unit(unit: &str) -> String {
    unit.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_timestamped_rows() {
        let mut sink = CsvSink::new(Vec::new(), 4, ["V", "g"]).unwrap();
        sink.write_block(&[0.5, -0.25, 1.0, 2.0]).unwrap();
        sink.write_block(&[3.0, 4.0]).unwrap();
        assert_eq!(sink.frames_written(), 3);
        let text = String::from_utf8(sink.finish().unwrap()).unwrap();
        assert_eq!(
            text,
            "time_s,ch1_V,ch2_g\n0.000000,0.5,-0.25\n0.250000,1,2\n0.500000,3,4\n"
        );
    }

    #[test]
    fn sanitizes_unit_headers() {
        let sink = CsvSink::new(Vec::new(), 48_000, ["m/s^2", "psi"]).unwrap();
        let text = String::from_utf8(sink.finish().unwrap()).unwrap();
        assert_eq!(text, "time_s,ch1_m_s_2,ch2_psi\n");
    }

    #[test]
    fn creates_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.csv");
        let mut sink = CsvSink::create(&path, 2, ["V", "V"]).unwrap();
        sink.write_block(&[0.125, 0.25]).unwrap();
        sink.finish().unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("time_s,ch1_V,ch2_V\n"));
        assert!(text.contains("0.000000,0.125,0.25"));
    }
}
