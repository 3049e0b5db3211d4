//! Process-spawning and test-double infrastructure.
//!
//! `runner` executes shell command lines for the metric collector; `mock`
//! holds the fake metric source and recording display used by the tests.

pub mod mock;
pub mod runner;
