// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::sync::Arc;

use anyhow::{bail, Result};
use keyper_events::{DecryptionKey, EpochId, P2PMessage};
use keyper_keyshare::{DecryptionKeyHandler, HandlerError, KeyperDb, MessageRouter, ValidationError};
use keyper_test_helpers::{init_test_tracing, TestEon, TestStore};
use keyper_utils::ArcBytes;

const INSTANCE: u64 = 9;

fn key_message(eon: &TestEon, epoch: &EpochId, key: Vec<u8>) -> DecryptionKey {
    DecryptionKey {
        instance_id: INSTANCE,
        eon: eon.eon(),
        epoch_id: ArcBytes::from_bytes(epoch.to_vec()),
        key: ArcBytes::from_bytes(key),
    }
}

#[actix::test]
async fn foreign_keys_are_checked_and_stored_once() -> Result<()> {
    let _guard = init_test_tracing();
    let eon = TestEon::new(INSTANCE, 0, 4, 3)?;
    let store = TestStore::start();
    eon.seed(store.repositories.as_ref()).await?;
    let handler = DecryptionKeyHandler::new(INSTANCE, store.repositories.clone());
    let epoch = EpochId::from_u64(40);

    let good = key_message(&eon, &epoch, eon.expected_key(&epoch)?.to_bytes());
    assert_eq!(handler.validate(&good).await?, epoch);
    assert!(handler.handle(&good).await?.is_empty());
    let after_first = store.log().await?;
    assert!(handler.handle(&good).await?.is_empty());
    assert_eq!(store.log().await?, after_first);

    let other_epoch = key_message(&eon, &EpochId::from_u64(41), good.key.extract_bytes());
    let Err(err) = handler.validate(&other_epoch).await else {
        bail!("key for another epoch must not validate");
    };
    assert!(matches!(err, ValidationError::KeyVerificationFailed(_)));

    let garbage = key_message(&eon, &epoch, vec![1, 2, 3]);
    assert!(matches!(
        handler.validate(&garbage).await,
        Err(ValidationError::MalformedKey(_))
    ));
    Ok(())
}

#[actix::test]
async fn router_dispatches_by_kind_and_known_keys_silence_shares() -> Result<()> {
    let _guard = init_test_tracing();
    let eon = TestEon::new(INSTANCE, 0, 4, 2)?;
    let store = TestStore::start();
    eon.seed(store.repositories.as_ref()).await?;
    let db: Arc<dyn KeyperDb> = store.repositories.clone();
    let router = MessageRouter::keyper(INSTANCE, db);
    let epoch = EpochId::from_u64(3);

    let key: P2PMessage = key_message(&eon, &epoch, eon.expected_key(&epoch)?.to_bytes()).into();
    assert!(router.deliver(&key).await?.is_empty());
    assert!(store.repositories.exists_key(eon.eon(), &epoch).await?);

    for sender in 0..4 {
        let share: P2PMessage = eon.share_message(sender, &epoch).into();
        assert!(router.deliver(&share).await?.is_empty());
    }
    assert!(store
        .repositories
        .select_shares(eon.eon(), &epoch)
        .await?
        .is_empty());

    let next = EpochId::from_u64(4);
    let json = serde_json::to_string(&P2PMessage::from(eon.share_message(1, &next)))?;
    let decoded: P2PMessage = serde_json::from_str(&json)?;
    assert!(router.deliver(&decoded).await?.is_empty());
    let out = router
        .deliver(&eon.share_message(3, &next).into())
        .await?;
    assert!(matches!(out.as_slice(), [P2PMessage::DecryptionKey(_)]));

    let forged: P2PMessage = eon.forged_share_message(0, &EpochId::from_u64(5)).into();
    assert!(matches!(
        router.deliver(&forged).await,
        Err(HandlerError::Rejected(ValidationError::CryptoVerificationFailed { .. }))
    ));

    let empty = MessageRouter::new();
    assert!(matches!(
        empty.validate(&forged).await,
        Err(ValidationError::UnexpectedMessage(_))
    ));
    Ok(())
}
