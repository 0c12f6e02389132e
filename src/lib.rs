//! git-p4-sync library crate — re-exports for integration tests.
//!
//! The primary interface is the `git-p4-sync` binary. This lib.rs
//! exposes the engine modules so integration tests can exercise the
//! driver, comparator, and replay logic directly without going through
//! the CLI.

pub mod compare;
pub mod config;
pub mod diff;
pub mod error;
pub mod exec;
pub mod fsutil;
pub mod git;
pub mod ignore;
pub mod replay;
pub mod run;
pub mod session;
pub mod snapshot;
pub mod submit;
pub mod telemetry;
