//! # Scheduler
//!
//! The shared worker pool and the ready queue it consumes.
//!
//! ## Key Concepts
//! - Ready queue: one entry per delivered message, naming the target actor
//! - Workers: a fixed number of OS threads, each running one step at a time
//! - Execution right: taken from the actor cell before a step, so no actor
//!   runs on two workers at once

pub mod pool;
pub mod queue;
pub mod worker;

pub use pool::WorkerPool;
pub use queue::ReadyQueue;
pub use worker::Worker;
