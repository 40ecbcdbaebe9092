//! Shared test utilities for snacc-ber integration tests.

// Allow dead code and unused imports since not all test files use all utilities
#![allow(dead_code)]
#![allow(unused_imports)]

mod fixtures;
mod logging;

pub use fixtures::*;
pub use logging::init_tracing;
