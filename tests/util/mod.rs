//! Shared harness for the pipe integration tests.
#![allow(dead_code, unused_macros)]


#[allow(unused_imports)]
pub use {eyre::*, xorshift::*};

use std::time::{Duration, Instant};

pub fn testinit() {
    eyre::install();
}

/// Polls `cond` until it holds or `POLL_PATIENCE` runs out.
pub fn eventually(mut cond: impl FnMut() -> TestResult<bool>) -> TestResult<bool> {
    const POLL_PATIENCE: Duration = Duration::from_secs(5);
    let deadline = Instant::now() + POLL_PATIENCE;
    while Instant::now() < deadline {
        if cond()? {
            return Ok(true);
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    Ok(false)
}
