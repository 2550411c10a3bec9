//! Types and traits for recording training metrics.
//!
//! A [`Record`] is a set of named values produced by an environment step, an
//! optimization step or the trainer itself. Records are handed to a [`Recorder`],
//! which decides where they go: nowhere ([`NullRecorder`]), into memory
//! ([`BufferedRecorder`]) or into TensorBoard event files (`catdqn-tensorboard`).
//!
//! ```rust
//! use catdqn_core::record::{Record, RecordValue};
//!
//! let mut record = Record::from_scalar("frame", 1000.0);
//! record.insert("reward", RecordValue::Scalar(-21.0));
//! record.insert("epsilon", RecordValue::Scalar(0.99));
//! assert_eq!(record.get_scalar("reward").unwrap(), -21.0);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
