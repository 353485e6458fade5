// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use derivative::Derivative;
use keyper_utils::ArcBytes;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use crate::{Eon, EpochId, EpochIdError, InstanceId};

/// A reconstructed epoch secret key, re-broadcast once threshold is reached.
#[derive(Derivative, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derivative(Debug)]
pub struct DecryptionKey {
    pub instance_id: InstanceId,
    pub eon: Eon,
    #[derivative(Debug(format_with = "keyper_utils::formatters::hexf"))]
    pub epoch_id: ArcBytes,
    #[derivative(Debug(format_with = "keyper_utils::formatters::hexf"))]
    pub key: ArcBytes,
}

impl DecryptionKey {
    pub fn parse_epoch_id(&self) -> Result<EpochId, EpochIdError> {
        EpochId::from_slice(&self.epoch_id)
    }
}

impl Display for DecryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let epoch = self
            .parse_epoch_id()
            .map(|e| e.hex())
            .unwrap_or_else(|_| "<invalid>".to_string());
        write!(
            f,
            "DecryptionKey {{ instance_id: {}, eon: {}, epoch: {} }}",
            self.instance_id, self.eon, epoch
        )
    }
}
