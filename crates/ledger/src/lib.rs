//! Ledger rule checking and block application.
//!
//! [`check::BlockCheckContext`] is the pure rule evaluator: it classifies
//! one candidate block against a read view of the store and, on success,
//! derives the sideband to persist. [`apply`] turns an accepted block and
//! its sideband into store writes. The two halves meet in the block
//! processor, which runs them under one write view.

pub mod apply;
pub mod check;
pub mod genesis;
pub mod process_result;

pub use check::BlockCheckContext;
pub use process_result::ProcessResult;
