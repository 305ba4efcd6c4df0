use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use crate::drivers::{AcquisitionError, Sample};

/// Append-only `<elapsed_seconds> <raw_value>` log of accepted samples.
pub struct DataRecorder<W: Write = BufWriter<File>> {
    writer: Option<W>,
    lines: usize,
}

impl DataRecorder {
    /// Opens `path`, truncating anything left from a previous run.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, AcquisitionError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(AcquisitionError::LogWrite)?;
        info!("💾 Recording to {}", path.display());
        Ok(Self::from_writer(BufWriter::new(file)))
    }
}

impl<W: Write> DataRecorder<W> {
    pub fn from_writer(writer: W) -> Self {
        Self { writer: Some(writer), lines: 0 }
    }

    /// Writes the raw (never filtered) reading and flushes it out.
    pub fn append(&mut self, sample: &Sample) -> Result<(), AcquisitionError> {
        let Some(w) = self.writer.as_mut() else {
            return Err(AcquisitionError::LogWrite(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "recorder already finished",
            )));
        };
        writeln!(w, "{} {}", sample.t, sample.value).map_err(AcquisitionError::LogWrite)?;
        w.flush().map_err(AcquisitionError::LogWrite)?;
        self.lines += 1;
        Ok(())
    }

    #[cfg(test)]
    pub fn lines_written(&self) -> usize {
        self.lines
    }

    /// Flushes and releases the writer.
    pub fn finish(&mut self) -> Result<Option<W>, AcquisitionError> {
        if let Some(mut w) = self.writer.take() {
            w.flush().map_err(AcquisitionError::LogWrite)?;
            info!("💾 Recording saved ({} lines).", self.lines);
            return Ok(Some(w));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::parser::Reading;
    use std::io;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn numeric(t: f64, text: &str) -> Sample {
        Sample {
            t,
            value: Reading::Numeric { value: text.parse().unwrap(), text: text.to_owned() },
        }
    }

    #[test]
    fn writes_one_space_separated_line_per_sample() {
        let mut rec = DataRecorder::from_writer(Vec::new());
        rec.append(&numeric(0.25, "3.50")).unwrap();
        rec.append(&Sample { t: 1.5, value: Reading::Text("abc".into()) }).unwrap();
        assert_eq!(rec.lines_written(), 2);
        let out = rec.finish().unwrap().unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0.25 3.50\n1.5 abc\n");
    }

    #[test]
    fn create_truncates_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        std::fs::write(&path, "stale line\n").unwrap();
        let mut rec = DataRecorder::create(&path).unwrap();
        rec.append(&numeric(2.0, "-1.0")).unwrap();
        rec.finish().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "2 -1.0\n");
    }

    #[test]
    fn write_failure_is_reported() {
        let mut rec = DataRecorder::from_writer(FailingWriter);
        let err = rec
            .append(&numeric(0.0, "1.0"))
            .unwrap_err();
        assert!(matches!(err, AcquisitionError::LogWrite(_)));
    }

    #[test]
    fn append_after_finish_fails() {
        let mut rec = DataRecorder::from_writer(Vec::new());
        rec.finish().unwrap();
        assert!(rec.append(&numeric(0.0, "1.0")).is_err());
    }
}
