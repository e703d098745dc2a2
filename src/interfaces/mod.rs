//! Transport adapters: CSV files for the command line and an HTTP API.

pub mod csv;
pub mod http;
