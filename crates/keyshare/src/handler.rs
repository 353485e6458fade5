// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::sync::Arc;

use async_trait::async_trait;
use keyper_events::{InstanceId, MessageKind, P2PMessage};
use tracing::debug;

use crate::{
    DecryptionKeyHandler, DecryptionKeyShareHandler, EpochLocks, HandlerError, KeyperDb,
    ValidationError,
};

/// The seam the network layer dispatches through.
///
/// `validate_message` runs before a message is propagated and must not write.
/// `handle_message` runs only for messages that validated and returns what to broadcast.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    fn message_prototypes(&self) -> &'static [MessageKind];

    async fn validate_message(&self, msg: &P2PMessage) -> Result<(), ValidationError>;

    async fn handle_message(&self, msg: &P2PMessage) -> Result<Vec<P2PMessage>, HandlerError>;
}

#[async_trait]
impl MessageHandler for DecryptionKeyShareHandler {
    fn message_prototypes(&self) -> &'static [MessageKind] {
        &[MessageKind::DecryptionKeyShares]
    }

    async fn validate_message(&self, msg: &P2PMessage) -> Result<(), ValidationError> {
        match msg {
            P2PMessage::DecryptionKeyShares(m) => self.validate(m).await.map(|_| ()),
            other => Err(ValidationError::UnexpectedMessage(other.kind())),
        }
    }

    async fn handle_message(&self, msg: &P2PMessage) -> Result<Vec<P2PMessage>, HandlerError> {
        match msg {
            P2PMessage::DecryptionKeyShares(m) => self.handle(m).await,
            other => Err(ValidationError::UnexpectedMessage(other.kind()).into()),
        }
    }
}

#[async_trait]
impl MessageHandler for DecryptionKeyHandler {
    fn message_prototypes(&self) -> &'static [MessageKind] {
        &[MessageKind::DecryptionKey]
    }

    async fn validate_message(&self, msg: &P2PMessage) -> Result<(), ValidationError> {
        match msg {
            P2PMessage::DecryptionKey(m) => self.validate(m).await.map(|_| ()),
            other => Err(ValidationError::UnexpectedMessage(other.kind())),
        }
    }

    async fn handle_message(&self, msg: &P2PMessage) -> Result<Vec<P2PMessage>, HandlerError> {
        match msg {
            P2PMessage::DecryptionKey(m) => self.handle(m).await,
            other => Err(ValidationError::UnexpectedMessage(other.kind()).into()),
        }
    }
}

/// Dispatches messages to the handler registered for their kind.
#[derive(Default)]
pub struct MessageRouter {
    handlers: Vec<Arc<dyn MessageHandler>>,
}

impl MessageRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Both keyper handlers over one store, sharing their epoch locks.
    pub fn keyper(instance_id: InstanceId, db: Arc<dyn KeyperDb>) -> Self {
        let locks = EpochLocks::new();
        let mut router = Self::new();
        router
            .register(Arc::new(
                DecryptionKeyShareHandler::new(instance_id, db.clone()).with_locks(locks.clone()),
            ))
            .register(Arc::new(
                DecryptionKeyHandler::new(instance_id, db).with_locks(locks),
            ));
        router
    }

    pub fn register(&mut self, handler: Arc<dyn MessageHandler>) -> &mut Self {
        self.handlers.push(handler);
        self
    }

    fn handler_for(&self, kind: MessageKind) -> Result<&Arc<dyn MessageHandler>, ValidationError> {
        self.handlers
            .iter()
            .find(|h| h.message_prototypes().contains(&kind))
            .ok_or(ValidationError::UnexpectedMessage(kind))
    }

    pub async fn validate(&self, msg: &P2PMessage) -> Result<(), ValidationError> {
        self.handler_for(msg.kind())?.validate_message(msg).await
    }

    /// Validate, then handle. Rejected messages surface as `HandlerError::Rejected`.
    pub async fn deliver(&self, msg: &P2PMessage) -> Result<Vec<P2PMessage>, HandlerError> {
        let handler = self.handler_for(msg.kind())?;
        handler.validate_message(msg).await?;
        let out = handler.handle_message(msg).await?;
        debug!(kind = %msg.kind(), outgoing = out.len(), "message handled");
        Ok(out)
    }
}
