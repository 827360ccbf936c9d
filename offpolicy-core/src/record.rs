//! Types and traits for recording metrics during training and evaluation.
//!
//! # Core Components
//!
//! * [`Record`] - A container of key-value pairs of various data types
//! * [`RecordValue`] - The values that can be stored
//! * [`Recorder`] - Writes a record to an output destination immediately
//! * [`AggregateRecorder`] - Stores records and writes aggregated values on flush
//! * [`RecordStorage`] - Aggregation of stored records
//! * [`LogRecorder`] - Writes aggregated values through the `log` facade
//! * [`BufferedRecorder`] - Keeps records in memory
//! * [`NullRecorder`] - Discards all records
//!
//! # Basic Usage
//!
//! ```rust
//! use offpolicy_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("train/episode_reward", RecordValue::Scalar(-12.5));
//! record.insert("train/episode", RecordValue::Scalar(3.));
//! assert_eq!(record.get_scalar("train/episode").unwrap(), 3.);
//! ```
//!
//! [`Trainer`](crate::Trainer) stores records in an [`AggregateRecorder`] and
//! flushes it with the current environment step at episode boundaries.
mod base;
mod buffered_recorder;
mod log_recorder;
mod null_recorder;
mod recorder;
mod storage;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use log_recorder::LogRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::{AggregateRecorder, Recorder};
pub use storage::RecordStorage;
