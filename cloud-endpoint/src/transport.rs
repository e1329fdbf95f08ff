/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Contract of the underlying message-transport session.

use crate::message::{MessageId, QoS};
use async_trait::async_trait;
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

/// Failure reported by a transport session call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for TransportError {}

/// A connect/disconnect-able session shared by every publisher and subscriber of an
/// endpoint.
///
/// Implementations report asynchronous session events to the listeners added through
/// [`DataTransport::add_session_listener`].
#[async_trait]
pub trait DataTransport: Send + Sync {
    async fn connect(&self) -> Result<(), TransportError>;

    /// Disconnects, allowing in-flight work up to `quiesce_timeout` to complete.
    async fn disconnect(&self, quiesce_timeout: Duration) -> Result<(), TransportError>;

    fn is_connected(&self) -> bool;

    /// Publishes one message and returns the id the transport assigned to it.
    async fn publish(
        &self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
        priority: u8,
    ) -> Result<MessageId, TransportError>;

    async fn subscribe(&self, topic_filter: &str, qos: QoS) -> Result<(), TransportError>;

    async fn unsubscribe(&self, topic_filter: &str) -> Result<(), TransportError>;

    fn add_session_listener(&self, listener: Arc<dyn SessionListener>);

    fn remove_session_listener(&self, listener: &Arc<dyn SessionListener>);
}

/// Callbacks a [`DataTransport`] delivers from its own tasks.
#[async_trait]
pub trait SessionListener: Send + Sync {
    async fn on_connection_established(&self);

    async fn on_disconnecting(&self);

    async fn on_disconnected(&self);

    async fn on_connection_lost(&self, cause: TransportError);

    async fn on_message_arrived(&self, topic: &str, payload: &[u8], qos: QoS, retained: bool);

    async fn on_message_published(&self, message_id: MessageId, topic: &str);

    async fn on_message_confirmed(&self, message_id: MessageId, topic: &str);
}
