//! Cross-cutting utilities for node binaries.

pub mod logging;
