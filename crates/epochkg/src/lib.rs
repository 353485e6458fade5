// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Accumulates epoch secret key shares for one eon and reconstructs each epoch's key once
//! `threshold` distinct keypers have contributed.

mod context;
mod epochkg;
mod error;

pub use context::*;
pub use epochkg::*;
pub use error::*;
