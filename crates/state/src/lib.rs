//! Ledger-facing data types: block variants with their frozen wire forms,
//! validator sideband, per-account metadata, and network params.

pub mod account;
pub mod block;
pub mod ids;
pub mod params;
pub mod pending;
pub mod prelude;
pub mod sideband;
