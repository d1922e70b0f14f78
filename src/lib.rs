// Public API - packet core, probe driver, and statistics
pub mod config;
pub mod icmp;
pub mod probe;
pub mod stats;

// Internal implementation - not part of public API
pub(crate) mod cli;
