// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Threshold epoch key primitives on BN254.
//!
//! An eon's DKG leaves every keyper `i` with a secret scalar `sk_i` on a degree `t - 1`
//! polynomial and everyone with `pk_i = sk_i · g2`. For an epoch the keyper publishes
//! `sk_i · P(epoch)` where `P` hashes the epoch id onto G1. Any `t` such shares interpolate to
//! `sk · P(epoch)`, the epoch secret key.

mod dealer;
mod dkg;
mod epoch;
mod error;
mod keys;
mod scheme;

pub use dealer::*;
pub use dkg::*;
pub use epoch::*;
pub use error::*;
pub use keys::*;
pub use scheme::*;
