//! Recorder writing scalar metrics into TensorBoard event files.
use catdqn_core::record::{Record, RecordValue, Recorder};
use log::{trace, warn};
use std::path::Path;
use tensorboard_rs::summary_writer::SummaryWriter;

/// Write records to TFRecord.
///
/// Each record must hold a scalar under the step key (`"frame"` by default),
/// which gives the x-axis of the other scalars in the record.
pub struct TensorboardRecorder {
    writer: SummaryWriter,
    step_key: String,
}

impl TensorboardRecorder {
    /// Construct a [`TensorboardRecorder`].
    ///
    /// TFRecord will be stored in `logdir`.
    pub fn new<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
            step_key: "frame".to_string(),
        }
    }

    /// Sets the key of the step value in records.
    pub fn step_key(mut self, key: impl Into<String>) -> Self {
        self.step_key = key.into();
        self
    }
}

impl Recorder for TensorboardRecorder {
    /// Write a given [`Record`] into a TFRecord.
    ///
    /// Only [`RecordValue::Scalar`] values are written.
    fn write(&mut self, record: Record) {
        let step = match record.get_scalar(&self.step_key) {
            Ok(v) => v as usize,
            Err(e) => {
                warn!("Record without step is not written: {}", e);
                return;
            }
        };

        for (k, v) in record.iter() {
            if *k == self.step_key {
                continue;
            }
            match v {
                RecordValue::Scalar(v) => self.writer.add_scalar(k, *v, step),
                _ => trace!("Skip non-scalar value {}", k),
            }
        }
    }

    fn flush(&mut self) {
        self.writer.flush();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::Result;
    use tempdir::TempDir;

    #[test]
    fn test_write_event_file() -> Result<()> {
        let dir = TempDir::new("tensorboard")?;
        let logdir = dir.path().join("pong");
        let mut recorder = TensorboardRecorder::new(&logdir);
        recorder.write(Record::from_slice(&[
            ("frame", RecordValue::Scalar(1000.0)),
            ("reward_100", RecordValue::Scalar(-20.5)),
            ("note", RecordValue::String("ignored".to_string())),
        ]));
        // No step, skipped
        recorder.write(Record::from_scalar("loss", 0.1));
        recorder.flush();
        // The event file is written by the writer thread joined on drop
        drop(recorder);

        let files = std::fs::read_dir(&logdir)?.collect::<std::io::Result<Vec<_>>>()?;
        assert_eq!(files.len(), 1);
        assert!(files[0].metadata()?.len() > 0);
        Ok(())
    }
}
