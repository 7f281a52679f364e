//! The block processor: a bounded queue in front of the ledger, drained by a
//! single validation thread. Processing a block is potentially a long store
//! operation, so this isolates insertion from the network-facing tasks that
//! produce blocks.

pub mod config;
pub mod events;
pub mod processor;

pub use config::ProcessorConfig;
pub use events::{InsertedEvent, ProcessedEvent};
pub use processor::BlockProcessor;
