// ABOUTME: Library root for dbr - exposes the session driver and config for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod error;
pub mod session;
