//! End-to-end tests for wright-lib through its public API.

mod compose_tests;
mod discovery_tests;
mod run_tests;
