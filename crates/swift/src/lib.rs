//! ojs-swift: Swift and Keystone adapter for the ojs CLI client
//!
//! This crate provides the implementations of the ObjectStore and Identity
//! traits using reqwest. It is the only crate that talks HTTP.

mod http;
pub mod client;
pub mod keystone;

#[cfg(test)]
mod test_server;

pub use client::SwiftClient;
pub use keystone::KeystoneClient;
