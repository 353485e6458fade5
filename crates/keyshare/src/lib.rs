// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Ingestion of decryption key shares and decryption keys.
//!
//! Each inbound message goes through `validate` and, if accepted, `handle`. Handling rebuilds
//! the epoch aggregator from every share stored for the epoch so the outcome never depends on
//! what this process happened to keep in memory.

mod db;
mod decryption_key;
mod decryption_key_share;
mod error;
mod handler;
mod locks;
mod repo;
mod verifier;

pub use db::*;
pub use decryption_key::*;
pub use decryption_key_share::*;
pub use error::*;
pub use handler::*;
pub use locks::*;
pub use repo::*;
pub use verifier::*;
