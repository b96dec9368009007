// Library interface for csh2sh
// This allows the binary, benchmarks and tests to access the converter

pub mod batch;
pub mod config;
pub mod error;
pub mod registry;
pub mod review;
pub mod transpile;
