// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::sync::Arc;

use anyhow::{bail, Result};
use keyper_data::{DataOp, DataStore, Repositories, SledStore};
use keyper_epochkg::ReconstructionError;
use keyper_events::{EpochId, KeyperIndex, P2PMessage};
use keyper_keyshare::{
    DecryptionKeyShareHandler, DkgResultRecord, HandlerError, KeyperDb, ValidationError,
};
use keyper_shcrypto::{
    Bn254Scheme, CryptoError, EonPublicKey, EonPublicKeyShare, EpochKeyScheme, EpochPoint,
    EpochSecretKey, EpochSecretKeyShare,
};
use keyper_test_helpers::{init_test_tracing, TestEon, TestStore};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha20Rng;

const INSTANCE: u64 = 77;

async fn setup(n: u64, t: u64) -> Result<(TestEon, TestStore, DecryptionKeyShareHandler)> {
    let eon = TestEon::new(INSTANCE, 3, n, t)?;
    let store = TestStore::start();
    eon.seed(store.repositories.as_ref()).await?;
    let handler = DecryptionKeyShareHandler::new(INSTANCE, store.repositories.clone());
    Ok((eon, store, handler))
}

/// validate then handle, the way the network layer drives the handler
async fn submit(
    handler: &DecryptionKeyShareHandler,
    eon: &TestEon,
    sender: KeyperIndex,
    epoch: &EpochId,
) -> Result<Vec<P2PMessage>> {
    let msg = eon.share_message(sender, epoch);
    handler.validate(&msg).await?;
    Ok(handler.handle(&msg).await?)
}

fn single_key(out: &[P2PMessage]) -> Result<keyper_events::DecryptionKey> {
    match out {
        [P2PMessage::DecryptionKey(key)] => Ok(key.clone()),
        other => bail!("expected one decryption key, got {other:?}"),
    }
}

#[actix::test]
async fn threshold_three_of_four() -> Result<()> {
    let _guard = init_test_tracing();
    let (eon, store, handler) = setup(4, 3).await?;
    let epoch = EpochId::from_u64(1000);

    assert!(submit(&handler, &eon, 0, &epoch).await?.is_empty());
    assert!(submit(&handler, &eon, 1, &epoch).await?.is_empty());
    assert!(!store.repositories.exists_key(eon.eon(), &epoch).await?);

    let out = submit(&handler, &eon, 2, &epoch).await?;
    let key = single_key(&out)?;
    let expected = eon.expected_key(&epoch)?.to_bytes();
    assert_eq!(key.instance_id, INSTANCE);
    assert_eq!(key.eon, eon.eon());
    assert_eq!(key.parse_epoch_id()?, epoch);
    assert_eq!(key.key.extract_bytes(), expected);
    assert_eq!(
        store.repositories.get_key(eon.eon(), &epoch).await?,
        Some(expected)
    );

    let before = store.log().await?;
    assert!(submit(&handler, &eon, 0, &epoch).await?.is_empty());
    assert_eq!(store.log().await?, before);
    Ok(())
}

#[actix::test]
async fn invalid_share_is_rejected_and_leaves_storage_alone() -> Result<()> {
    let _guard = init_test_tracing();
    let (eon, store, handler) = setup(4, 3).await?;
    let epoch = EpochId::from_u64(5);
    let before = store.log().await?;

    let forged = eon.forged_share_message(1, &epoch);
    let Err(err) = handler.validate(&forged).await else {
        bail!("forged share must not validate");
    };
    assert!(matches!(
        err,
        ValidationError::CryptoVerificationFailed { sender: 1, .. }
    ));
    assert_eq!(store.log().await?, before);
    Ok(())
}

#[actix::test]
async fn exactly_one_key_per_epoch_in_any_order() -> Result<()> {
    let _guard = init_test_tracing();
    let (eon, store, handler) = setup(5, 3).await?;
    let mut rng = ChaCha20Rng::seed_from_u64(1);

    for round in 0..4u64 {
        let epoch = EpochId::from_u64(round);
        let mut senders: Vec<KeyperIndex> = (0..5).chain(0..5).collect();
        senders.shuffle(&mut rng);

        let mut emitted = vec![];
        for sender in senders {
            emitted.extend(submit(&handler, &eon, sender, &epoch).await?);
        }
        let key = single_key(&emitted)?;
        assert_eq!(key.key.extract_bytes(), eon.expected_key(&epoch)?.to_bytes());
    }

    let keys_written = store
        .log()
        .await?
        .into_iter()
        .filter(|op| matches!(op, DataOp::Insert(i) if i.key().starts_with(b"//decryption_key/")))
        .count();
    assert_eq!(keys_written, 4);
    Ok(())
}

#[actix::test]
async fn second_share_from_a_sender_does_not_count() -> Result<()> {
    let _guard = init_test_tracing();
    let (eon, store, handler) = setup(4, 3).await?;
    let epoch = EpochId::from_u64(9);

    // a differing share stored for sender 1 behind the validator's back
    let other = eon.share(2, &epoch).to_bytes();
    store
        .repositories
        .insert_share(eon.eon(), &epoch, 1, &other)
        .await?;

    assert!(submit(&handler, &eon, 1, &epoch).await?.is_empty());
    assert!(submit(&handler, &eon, 0, &epoch).await?.is_empty());
    assert!(!store.repositories.exists_key(eon.eon(), &epoch).await?);

    assert_eq!(submit(&handler, &eon, 3, &epoch).await?.len(), 1);
    Ok(())
}

#[actix::test]
async fn shares_after_finalization_are_no_ops() -> Result<()> {
    let _guard = init_test_tracing();
    let (eon, store, handler) = setup(4, 2).await?;
    let epoch = EpochId::from_u64(3);

    submit(&handler, &eon, 0, &epoch).await?;
    assert_eq!(submit(&handler, &eon, 1, &epoch).await?.len(), 1);
    let before = store.log().await?;

    assert!(submit(&handler, &eon, 3, &epoch).await?.is_empty());
    // handle never re-checks validity, so an unverifiable share must be inert too
    assert!(handler
        .handle(&eon.forged_share_message(2, &epoch))
        .await?
        .is_empty());
    assert_eq!(store.log().await?, before);
    Ok(())
}

#[actix::test]
async fn corrupt_stored_share_is_skipped() -> Result<()> {
    let _guard = init_test_tracing();
    let (eon, store, handler) = setup(4, 3).await?;
    let epoch = EpochId::from_u64(11);

    store
        .repositories
        .insert_share(eon.eon(), &epoch, 0, &[0xde, 0xad])
        .await?;
    assert!(submit(&handler, &eon, 1, &epoch).await?.is_empty());
    assert!(submit(&handler, &eon, 2, &epoch).await?.is_empty());
    let key = single_key(&submit(&handler, &eon, 3, &epoch).await?)?;
    assert_eq!(key.key.extract_bytes(), eon.expected_key(&epoch)?.to_bytes());
    Ok(())
}

#[actix::test]
async fn below_threshold_stays_quiet() -> Result<()> {
    let _guard = init_test_tracing();
    let (eon, store, handler) = setup(7, 5).await?;
    let epoch = EpochId::from_u64(2);

    for sender in [6, 0, 3, 0] {
        assert!(submit(&handler, &eon, sender, &epoch).await?.is_empty());
    }
    assert_eq!(
        store.repositories.select_shares(eon.eon(), &epoch).await?.len(),
        3
    );
    Ok(())
}

#[actix::test]
async fn failed_dkg_never_produces_keys() -> Result<()> {
    let _guard = init_test_tracing();
    let (eon, store, handler) = setup(3, 1).await?;
    let epoch = EpochId::from_u64(1);
    let msg = eon.share_message(0, &epoch);
    handler.validate(&msg).await?;

    store
        .repositories
        .insert_dkg_result(
            eon.eon(),
            &DkgResultRecord {
                success: false,
                pure_result: vec![],
            },
        )
        .await?;
    assert!(handler.handle(&msg).await?.is_empty());
    assert!(!store.repositories.exists_key(eon.eon(), &epoch).await?);
    Ok(())
}

#[actix::test]
async fn concurrent_handles_emit_one_key() -> Result<()> {
    let _guard = init_test_tracing();
    let (eon, store, handler) = setup(6, 3).await?;
    let handler = Arc::new(handler);
    let epoch = EpochId::from_u64(77);

    let tasks: Vec<_> = (0..6)
        .map(|sender| {
            let handler = handler.clone();
            let msg = eon.share_message(sender, &epoch);
            tokio::spawn(async move { handler.handle(&msg).await })
        })
        .collect();

    let mut emitted = vec![];
    for task in tasks {
        emitted.extend(task.await??);
    }
    single_key(&emitted)?;
    assert!(store.repositories.exists_key(eon.eon(), &epoch).await?);
    Ok(())
}

/// Hands back a key that does not match the eon.
struct BrokenScheme;

impl EpochKeyScheme for BrokenScheme {
    fn epoch_point(&self, epoch_id: &EpochId) -> EpochPoint {
        Bn254Scheme.epoch_point(epoch_id)
    }

    fn verify_share(
        &self,
        share: &EpochSecretKeyShare,
        public_key_share: &EonPublicKeyShare,
        point: &EpochPoint,
    ) -> bool {
        Bn254Scheme.verify_share(share, public_key_share, point)
    }

    fn reconstruct_key(
        &self,
        _threshold: u64,
        _keyper_indices: &[KeyperIndex],
        _shares: &[EpochSecretKeyShare],
    ) -> Result<EpochSecretKey, CryptoError> {
        Err(CryptoError::InvalidKeyperSet("broken".into()))
    }

    fn verify_key(
        &self,
        key: &EpochSecretKey,
        public_key: &EonPublicKey,
        point: &EpochPoint,
    ) -> bool {
        Bn254Scheme.verify_key(key, public_key, point)
    }
}

#[actix::test]
async fn reconstruction_failure_is_reported_and_not_retried() -> Result<()> {
    let _guard = init_test_tracing();
    let eon = TestEon::new(INSTANCE, 3, 4, 2)?;
    let store = TestStore::start();
    eon.seed(store.repositories.as_ref()).await?;
    let handler = DecryptionKeyShareHandler::with_scheme(
        INSTANCE,
        store.repositories.clone(),
        Arc::new(BrokenScheme),
    );
    let epoch = EpochId::from_u64(4);

    assert!(submit(&handler, &eon, 0, &epoch).await?.is_empty());
    for sender in [1, 2] {
        let msg = eon.share_message(sender, &epoch);
        let Err(err) = handler.handle(&msg).await else {
            bail!("reconstruction failure must surface");
        };
        assert!(matches!(
            err,
            HandlerError::Reconstruction {
                source: ReconstructionError::Crypto(_),
                ..
            }
        ));
    }
    assert!(!store.repositories.exists_key(eon.eon(), &epoch).await?);
    Ok(())
}

#[actix::test]
async fn works_on_sled() -> Result<()> {
    let _guard = init_test_tracing();
    let dir = tempfile::tempdir()?;
    let addr = SledStore::new(&dir.path().join("db"))?;
    let db = Arc::new(Repositories::new(DataStore::from(&addr)));
    let eon = TestEon::new(INSTANCE, 1, 3, 2)?;
    eon.seed(db.as_ref()).await?;
    let handler = DecryptionKeyShareHandler::new(INSTANCE, db.clone());
    let epoch = EpochId::from_u64(8);

    assert!(submit(&handler, &eon, 2, &epoch).await?.is_empty());
    assert_eq!(submit(&handler, &eon, 0, &epoch).await?.len(), 1);
    assert!(submit(&handler, &eon, 1, &epoch).await?.is_empty());
    assert_eq!(
        db.get_key(eon.eon(), &epoch).await?,
        Some(eon.expected_key(&epoch)?.to_bytes())
    );
    Ok(())
}
