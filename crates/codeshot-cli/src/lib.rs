//! # codeshot-cli
//!
//! Command-line interface for the CodeShot agent runtime.
//!
//! ## Commands
//!
//! - `codeshot serve` — Serve the configured agent over HTTP
//! - `codeshot validate` — Check the base prompt and few-shots
//! - `codeshot handshake` — Print the handshake document
//! - `codeshot storage` — Get, set, delete and list user storage keys
//! - `codeshot config` — Show configuration

pub mod commands;

pub use commands::Cli;
