#![forbid(unsafe_code)]

//! Scenario replay binary.
//!
//! Runs the built-in drag scenarios against the in-memory tree and prints
//! each event trace as JSON, one trace per scenario.
//!
//! # Running
//!
//! ```sh
//! cargo run -p hauler-harness
//! cargo run -p hauler-harness -- revert-on-spill
//! RUST_LOG=hauler_core=debug cargo run -p hauler-harness
//! ```
//!
//! With a name argument only matching scenarios run. `RUST_LOG` controls the
//! engine's transition logging through the standard env filter.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use hauler_harness::{Trace, builtin_scenarios};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let filter: Option<String> = std::env::args().nth(1);
    let scenarios = builtin_scenarios();
    let mut ran = 0usize;

    for scenario in &scenarios {
        if let Some(name) = &filter
            && scenario.name != name
        {
            continue;
        }
        tracing::info!(scenario = scenario.name, "running");
        let run = scenario.run();
        let trace = Trace {
            scenario: scenario.name,
            events: &run.events,
        };
        match serde_json::to_string_pretty(&trace) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("failed to serialize trace for {}: {err}", scenario.name);
                return ExitCode::FAILURE;
            }
        }
        ran += 1;
    }

    if ran == 0 {
        eprintln!(
            "no scenario named {:?}; available: {}",
            filter.as_deref().unwrap_or(""),
            scenarios
                .iter()
                .map(|s| s.name)
                .collect::<Vec<_>>()
                .join(", ")
        );
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
