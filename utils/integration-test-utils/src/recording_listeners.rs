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
use cloud_endpoint::{
    CloudMessage, ConnectionListener, DeliveryListener, MessageId, SubscriberListener,
};
use std::sync::{Arc, Mutex};
use tracing::debug;

pub struct RecordingSubscriber {
    messages: Mutex<Vec<Arc<CloudMessage>>>,
}

impl RecordingSubscriber {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }

    pub fn messages(&self) -> Vec<Arc<CloudMessage>> {
        self.messages.lock().expect("lock messages").clone()
    }

    pub fn topics(&self) -> Vec<String> {
        self.messages
            .lock()
            .expect("lock messages")
            .iter()
            .map(|message| message.topic().unwrap_or_default().to_string())
            .collect()
    }

    pub fn count(&self) -> usize {
        self.messages.lock().expect("lock messages").len()
    }
}

impl Default for RecordingSubscriber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubscriberListener for RecordingSubscriber {
    async fn on_message_arrived(&self, message: Arc<CloudMessage>) {
        debug!("recording_subscriber received: {:?}", message.topic());
        self.messages.lock().expect("lock messages").push(message);
    }
}

/// Subscriber whose callback always panics.
pub struct PanickingSubscriber;

#[async_trait]
impl SubscriberListener for PanickingSubscriber {
    async fn on_message_arrived(&self, message: Arc<CloudMessage>) {
        panic!("panicking_subscriber refused {:?}", message.topic());
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConnectionEvent {
    Established,
    Lost,
    Disconnected,
}

pub struct RecordingConnectionListener {
    events: Mutex<Vec<ConnectionEvent>>,
}

impl RecordingConnectionListener {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<ConnectionEvent> {
        self.events.lock().expect("lock events").clone()
    }

    fn record(&self, event: ConnectionEvent) {
        debug!("recording_connection_listener observed: {event:?}");
        self.events.lock().expect("lock events").push(event);
    }
}

impl Default for RecordingConnectionListener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionListener for RecordingConnectionListener {
    async fn on_connection_established(&self) {
        self.record(ConnectionEvent::Established);
    }

    async fn on_connection_lost(&self) {
        self.record(ConnectionEvent::Lost);
    }

    async fn on_disconnected(&self) {
        self.record(ConnectionEvent::Disconnected);
    }
}

pub struct RecordingDeliveryListener {
    confirmed: Mutex<Vec<MessageId>>,
}

impl RecordingDeliveryListener {
    pub fn new() -> Self {
        Self {
            confirmed: Mutex::new(Vec::new()),
        }
    }

    pub fn confirmed(&self) -> Vec<MessageId> {
        self.confirmed.lock().expect("lock confirmed").clone()
    }
}

impl Default for RecordingDeliveryListener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeliveryListener for RecordingDeliveryListener {
    async fn on_message_confirmed(&self, message_id: MessageId) {
        self.confirmed.lock().expect("lock confirmed").push(message_id);
    }
}
