//! Fixed-capacity replay buffer for off-policy training.
//!
//! # Key Components
//!
//! - [`SimpleReplayBuffer`]: a ring buffer of transitions with uniform sampling
//! - [`GenericTransitionBatch`]: a batch of transitions, stored column by column
//! - [`BatchBase`]: storage of one column (observations or actions)
//! - [`ArrayBatch`]: a [`BatchBase`] for `f32` vectors, independent of any tensor backend
//! - [`SimpleStepProcessor`]: converts environment steps into transitions
//!
//! # Examples
//!
//! ```rust
//! use offpolicy_core::{
//!     replay_buffer::{ArrayBatch, SimpleReplayBuffer, SimpleReplayBufferConfig},
//!     ReplayBufferBase,
//! };
//!
//! let config = SimpleReplayBufferConfig::default().capacity(1000).seed(42);
//! let mut buffer = SimpleReplayBuffer::<ArrayBatch, ArrayBatch>::build(&config);
//! assert!(buffer.batch(4).is_err());
//!
//! for _ in 0..4 {
//!     buffer
//!         .add(
//!             vec![0.0, 1.0].into(),
//!             vec![0.5].into(),
//!             1.0,
//!             vec![0.1, 1.1].into(),
//!             false,
//!             false,
//!         )
//!         .unwrap();
//! }
//! let batch = buffer.batch(4).unwrap();
//! assert_eq!(batch.reward, vec![1.0; 4]);
//! ```
mod array_batch;
mod base;
mod batch;
mod config;
mod step_proc;
pub use array_batch::ArrayBatch;
pub use base::SimpleReplayBuffer;
pub use batch::{BatchBase, GenericTransitionBatch};
pub use config::SimpleReplayBufferConfig;
pub use step_proc::{SimpleStepProcessor, SimpleStepProcessorConfig};
