#![forbid(unsafe_code)]

//! Scenario harness for the hauler drag engine.
//!
//! Scripted pointer sequences run against the in-memory
//! [`TestTree`](hauler_core::testenv::TestTree) environment and capture the
//! resulting event trace. The binary replays the built-in scenario set and
//! dumps traces as JSON; the integration tests assert on the same scenarios
//! end to end.

pub mod scenario;

pub use scenario::{Policy, Run, Scenario, Step, Trace, builtin_scenarios, two_lists};
