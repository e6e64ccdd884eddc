//! Command implementations for the CLI
//!
//! - start: Start the HTTP server
//! - test: Test configuration validity
//! - config: Configuration display and validation
//! - estimate: Price a project offline

pub mod config;
pub mod estimate;
pub mod start;
pub mod test;
