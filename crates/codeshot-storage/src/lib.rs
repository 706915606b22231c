//! # codeshot-storage
//!
//! A per-user key-value store reachable over HTTP. Values are
//! [`StorageValue`]s: JSON plus raw bytes, which travel as a marker object
//! (`{"type": "_bytes_ascii", "data": "<base64>"}`) so ordinary JSON consumers
//! can still read everything else.

pub mod client;
pub mod codec;

pub use client::UserStorage;
pub use codec::{StorageValue, decode, encode, from_json_string, to_json_string};
