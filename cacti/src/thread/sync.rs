//! Lock helpers for the runtime's mutexes and condition variables.
//!
//! A poisoned runtime lock means a thread panicked inside a critical section
//! that maintains scheduler invariants. There is no meaningful recovery from
//! that, so every helper here turns poisoning into a process exit.

use std::fmt::Display;
use std::sync::{Condvar, Mutex, MutexGuard};

use tracing::error;

/// Exit status used for unrecoverable runtime faults.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Log `reason` and terminate the process.
pub fn fatal(reason: impl Display) -> ! {
    error!("fatal: {}", reason);
    std::process::exit(FATAL_EXIT_CODE)
}

pub(crate) fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> MutexGuard<'a, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(_) => fatal(format_args!("{} lock poisoned", what)),
    }
}

pub(crate) fn wait<'a, T>(
    condvar: &Condvar,
    guard: MutexGuard<'a, T>,
    what: &str,
) -> MutexGuard<'a, T> {
    match condvar.wait(guard) {
        Ok(guard) => guard,
        Err(_) => fatal(format_args!("{} lock poisoned while waiting", what)),
    }
}
