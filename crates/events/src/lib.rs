// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod epoch_id;
mod ids;
mod p2pmsg;

pub use epoch_id::*;
pub use ids::*;
pub use p2pmsg::*;
