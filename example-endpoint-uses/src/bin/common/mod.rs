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

use async_trait::async_trait;
use cloud_endpoint::{CloudMessage, ConnectionListener, DeliveryListener, MessageId, SubscriberListener};
use std::sync::Arc;
use tracing::info;

pub struct PrintingSubscriber;

#[async_trait]
impl SubscriberListener for PrintingSubscriber {
    async fn on_message_arrived(&self, message: Arc<CloudMessage>) {
        info!(
            topic = message.topic().unwrap_or_default(),
            payload = %String::from_utf8_lossy(message.payload()),
            "PrintingSubscriber: received message"
        );
    }
}

pub struct PrintingConnectionListener;

#[async_trait]
impl ConnectionListener for PrintingConnectionListener {
    async fn on_connection_established(&self) {
        info!("PrintingConnectionListener: connection established");
    }

    async fn on_connection_lost(&self) {
        info!("PrintingConnectionListener: connection lost");
    }

    async fn on_disconnected(&self) {
        info!("PrintingConnectionListener: disconnected");
    }
}

pub struct PrintingDeliveryListener;

#[async_trait]
impl DeliveryListener for PrintingDeliveryListener {
    async fn on_message_confirmed(&self, message_id: MessageId) {
        info!(msg_id = %message_id, "PrintingDeliveryListener: delivery confirmed");
    }
}
