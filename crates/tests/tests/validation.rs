// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{bail, Result};
use keyper_events::{DecryptionKeyShares, EpochId, KeyShare};
use keyper_keyshare::{DecryptionKeyShareHandler, DkgResultRecord, KeyperDb, ValidationError};
use keyper_test_helpers::{TestEon, TestStore};
use keyper_utils::ArcBytes;

const INSTANCE: u64 = 5;

async fn rejected(handler: &DecryptionKeyShareHandler, msg: &DecryptionKeyShares) -> Result<ValidationError> {
    match handler.validate(msg).await {
        Ok(_) => bail!("message should have been rejected: {msg}"),
        Err(err) => Ok(err),
    }
}

#[actix::test]
async fn every_check_rejects_on_its_own() -> Result<()> {
    let eon = TestEon::new(INSTANCE, 2, 4, 3)?;
    let store = TestStore::start();
    eon.seed(store.repositories.as_ref()).await?;
    let handler = DecryptionKeyShareHandler::new(INSTANCE, store.repositories.clone());
    let epoch = EpochId::from_u64(12);
    let good = eon.share_message(1, &epoch);

    let verified = handler.validate(&good).await?;
    assert_eq!((verified.eon, verified.sender, verified.epoch), (2, 1, epoch));

    let msg = DecryptionKeyShares {
        instance_id: INSTANCE + 1,
        ..good.clone()
    };
    assert!(matches!(
        rejected(&handler, &msg).await?,
        ValidationError::WrongInstance { want: INSTANCE, have } if have == INSTANCE + 1
    ));

    let msg = DecryptionKeyShares {
        eon: i64::MAX as u64 + 1,
        ..good.clone()
    };
    assert!(matches!(
        rejected(&handler, &msg).await?,
        ValidationError::EonOverflow(_)
    ));

    let msg = DecryptionKeyShares {
        eon: 3,
        ..good.clone()
    };
    assert!(matches!(
        rejected(&handler, &msg).await?,
        ValidationError::NoDkgResult(3)
    ));

    for shares in [vec![], vec![good.shares[0].clone(), good.shares[0].clone()]] {
        let count = shares.len();
        let msg = DecryptionKeyShares {
            shares,
            ..good.clone()
        };
        assert!(matches!(
            rejected(&handler, &msg).await?,
            ValidationError::WrongShareArity(n) if n == count
        ));
    }

    let msg = DecryptionKeyShares {
        shares: vec![KeyShare {
            epoch_id: ArcBytes::from_bytes(vec![1; 31]),
            share: good.shares[0].share.clone(),
        }],
        ..good.clone()
    };
    assert!(matches!(
        rejected(&handler, &msg).await?,
        ValidationError::BadEpochId(_)
    ));

    let msg = DecryptionKeyShares {
        keyper_index: 4,
        ..good.clone()
    };
    assert!(matches!(
        rejected(&handler, &msg).await?,
        ValidationError::SenderOutOfRange {
            sender: 4,
            num_keypers: 4
        }
    ));

    let msg = DecryptionKeyShares::single(INSTANCE, 2, 1, &epoch, vec![0xff; 32]);
    assert!(matches!(
        rejected(&handler, &msg).await?,
        ValidationError::MalformedShare(_)
    ));

    assert_eq!(store.log().await?.len(), 1, "validation must not write");
    Ok(())
}

#[actix::test]
async fn unsuccessful_dkg_counts_as_missing() -> Result<()> {
    let eon = TestEon::new(INSTANCE, 6, 3, 2)?;
    let store = TestStore::start();
    store
        .repositories
        .insert_dkg_result(
            6,
            &DkgResultRecord {
                success: false,
                pure_result: vec![],
            },
        )
        .await?;
    let handler = DecryptionKeyShareHandler::new(INSTANCE, store.repositories.clone());

    let err = rejected(&handler, &eon.share_message(0, &EpochId::from_u64(1))).await?;
    assert!(matches!(err, ValidationError::NoDkgResult(6)));
    Ok(())
}
