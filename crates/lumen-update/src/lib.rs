//! The update context for Lumen.
//!
//! Network decoding runs on its own task; world changes that the GUI can
//! see must happen on the update loop. This crate provides the two pieces
//! that loop needs:
//!
//! - [`UpdateTaskManager`]: a thread-safe queue of closures run once per
//!   frame, with a separate queue for work deferred to the next frame.
//! - [`FrameClock`]: a fixed-rate timer with overrun detection.

mod clock;
mod tasks;

pub use clock::{FrameClock, FrameConfig, FrameInfo};
pub use tasks::{DrainReport, Task, TaskContext, UpdateConfig, UpdateTaskManager};
