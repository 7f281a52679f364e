//! Ascending bootstrap: discovery of missing ledger blocks from untrusted
//! peers.
//!
//! The attempt repeatedly picks an account worth extending, leases a peer
//! connection, issues an ascending bulk-pull from the local chain head, and
//! streams the response into the block processor. Ledger outcomes feed back
//! into the account selection weights, so progress concentrates requests
//! where they pay off and gaps push chains aside until their dependencies
//! arrive.

pub mod account_sets;
pub mod ascending;
pub mod config;
pub mod deserializer;
pub mod server;
pub mod transport;
pub mod wire;

pub use ascending::AscendingBootstrap;
pub use config::BootstrapConfig;
pub use transport::{Connection, Transport};
