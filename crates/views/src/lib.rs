//! Live, asynchronously computed views for an editor extension.
//!
//! The host UI wants display state back immediately while the data behind it
//! arrives later. This crate bridges the two:
//! * [`panel`]: Owns an embedded panel, renders its document and runs its
//!   message protocol
//! * [`results`]: Tree nodes that fetch their children lazily and answer
//!   display queries within a fixed latency
//! * [`cache::ResultCell`]: The coalescing, replaceable computation slot both
//!   of them build on
//! * [`hierarchy`]: Folder grouping for path-carrying items
//!
//! Host facilities (panels, settings, commands, version control) are reached
//! through the traits in [`host`].

#![warn(missing_docs)]

pub mod cache;
pub mod config;
pub mod env;
pub mod error;
mod gate;
pub mod hierarchy;
pub mod host;
pub mod panel;
pub mod results;
pub mod sort;
mod spawn;
pub mod subscription;
#[cfg(test)]
mod testing;

pub use error::{Error, Result};
