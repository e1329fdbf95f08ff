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

//! Narrow listener capabilities applications register with an endpoint.

use crate::message::{CloudMessage, MessageId};
use async_trait::async_trait;
use std::sync::Arc;

/// Observer of the shared session's lifecycle.
#[async_trait]
pub trait ConnectionListener: Send + Sync {
    async fn on_connection_established(&self);

    async fn on_connection_lost(&self);

    async fn on_disconnected(&self);
}

/// Observer of delivery confirmations for messages published with QoS > 0.
#[async_trait]
pub trait DeliveryListener: Send + Sync {
    async fn on_message_confirmed(&self, message_id: MessageId);
}

/// Receiver of inbound messages whose topic matches a registered filter.
#[async_trait]
pub trait SubscriberListener: Send + Sync {
    async fn on_message_arrived(&self, message: Arc<CloudMessage>);
}
