// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

/// Numbered era with its own DKG key material.
pub type Eon = u64;

/// Position of a keyper in the eon's keyper set, `0..num_keypers`.
pub type KeyperIndex = u64;

/// Identifies the deployment a message belongs to. Messages for other instances are dropped.
pub type InstanceId = u64;
