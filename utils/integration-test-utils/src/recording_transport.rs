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
    DataTransport, MessageId, MqttTopicMatcher, QoS, SessionListener, TopicMatcher,
    TransportError,
};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

/// One subscribe or unsubscribe call as it reached the transport.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WireCall {
    Subscribe { filter: String, qos: QoS },
    Unsubscribe { filter: String },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PublishedMessage {
    pub message_id: MessageId,
    pub topic: String,
    pub payload: Vec<u8>,
    pub qos: QoS,
    pub retain: bool,
    pub priority: u8,
}

#[derive(Default)]
struct Failures {
    connect: AtomicBool,
    disconnect: AtomicBool,
    disconnect_hangs: AtomicBool,
    publish: AtomicBool,
    subscribe: AtomicBool,
    unsubscribe: AtomicBool,
}

/// In-memory [`DataTransport`] that records every call.
///
/// In loopback mode a publish on a topic matching an active wire subscription is handed
/// back to the session listeners as an inbound message, the way a broker echoes it.
/// Publishes with QoS above 0 are confirmed right after being published.
pub struct RecordingTransport {
    name: String,
    loopback: bool,
    connected: AtomicBool,
    next_message_id: AtomicU32,
    wire_delay_ms: AtomicU64,
    subscribe_stalls: Mutex<HashMap<String, Duration>>,
    failures: Failures,
    session_listeners: Mutex<Vec<Arc<dyn SessionListener>>>,
    active_filters: Mutex<Vec<String>>,
    wire_calls: Mutex<Vec<WireCall>>,
    published: Mutex<Vec<PublishedMessage>>,
}

impl RecordingTransport {
    pub fn new(name: &str) -> Self {
        Self::build(name, false)
    }

    pub fn loopback(name: &str) -> Self {
        Self::build(name, true)
    }

    fn build(name: &str, loopback: bool) -> Self {
        Self {
            name: name.to_string(),
            loopback,
            connected: AtomicBool::new(false),
            next_message_id: AtomicU32::new(1),
            wire_delay_ms: AtomicU64::new(0),
            subscribe_stalls: Mutex::new(HashMap::new()),
            failures: Failures::default(),
            session_listeners: Mutex::new(Vec::new()),
            active_filters: Mutex::new(Vec::new()),
            wire_calls: Mutex::new(Vec::new()),
            published: Mutex::new(Vec::new()),
        }
    }

    pub fn set_connect_failure(&self, failing: bool) {
        self.failures.connect.store(failing, Ordering::SeqCst);
    }

    pub fn set_disconnect_failure(&self, failing: bool) {
        self.failures.disconnect.store(failing, Ordering::SeqCst);
    }

    /// Makes `disconnect` never complete.
    pub fn set_disconnect_hangs(&self, hangs: bool) {
        self.failures.disconnect_hangs.store(hangs, Ordering::SeqCst);
    }

    pub fn set_publish_failure(&self, failing: bool) {
        self.failures.publish.store(failing, Ordering::SeqCst);
    }

    pub fn set_subscribe_failure(&self, failing: bool) {
        self.failures.subscribe.store(failing, Ordering::SeqCst);
    }

    pub fn set_unsubscribe_failure(&self, failing: bool) {
        self.failures.unsubscribe.store(failing, Ordering::SeqCst);
    }

    /// Delay applied after recording each subscribe/unsubscribe call.
    pub fn set_wire_delay(&self, delay: Duration) {
        self.wire_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Holds every `subscribe` of exactly `filter` for `stall` after recording it.
    pub fn set_subscribe_stall(&self, filter: &str, stall: Duration) {
        self.subscribe_stalls
            .lock()
            .expect("lock subscribe_stalls")
            .insert(filter.to_string(), stall);
    }

    pub fn wire_calls(&self) -> Vec<WireCall> {
        self.wire_calls.lock().expect("lock wire_calls").clone()
    }

    pub fn subscribe_count(&self, filter: &str) -> usize {
        self.wire_calls()
            .iter()
            .filter(|call| matches!(call, WireCall::Subscribe { filter: f, .. } if f == filter))
            .count()
    }

    pub fn unsubscribe_count(&self, filter: &str) -> usize {
        self.wire_calls()
            .iter()
            .filter(|call| matches!(call, WireCall::Unsubscribe { filter: f } if f == filter))
            .count()
    }

    pub fn published(&self) -> Vec<PublishedMessage> {
        self.published.lock().expect("lock published").clone()
    }

    pub fn session_listener_count(&self) -> usize {
        self.session_listeners
            .lock()
            .expect("lock session_listeners")
            .len()
    }

    fn listeners(&self) -> Vec<Arc<dyn SessionListener>> {
        self.session_listeners
            .lock()
            .expect("lock session_listeners")
            .clone()
    }

    async fn wire_delay(&self) {
        let delay_ms = self.wire_delay_ms.load(Ordering::SeqCst);
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
    }

    /// Hands an inbound message to every session listener.
    pub async fn deliver(&self, topic: &str, payload: &[u8], qos: QoS, retained: bool) {
        for listener in self.listeners() {
            listener
                .on_message_arrived(topic, payload, qos, retained)
                .await;
        }
    }

    pub async fn establish_connection(&self) {
        self.connected.store(true, Ordering::SeqCst);
        for listener in self.listeners() {
            listener.on_connection_established().await;
        }
    }

    pub async fn lose_connection(&self, reason: &str) {
        self.connected.store(false, Ordering::SeqCst);
        for listener in self.listeners() {
            listener
                .on_connection_lost(TransportError::new(reason))
                .await;
        }
    }

    /// Announces a disconnect without completing it.
    pub async fn begin_disconnect(&self) {
        for listener in self.listeners() {
            listener.on_disconnecting().await;
        }
    }

    pub async fn confirm(&self, message_id: MessageId, topic: &str) {
        for listener in self.listeners() {
            listener.on_message_confirmed(message_id, topic).await;
        }
    }
}

#[async_trait]
impl DataTransport for RecordingTransport {
    async fn connect(&self) -> Result<(), TransportError> {
        debug!("{}: connect", self.name);
        if self.failures.connect.load(Ordering::SeqCst) {
            return Err(TransportError::new("broker unreachable"));
        }
        self.establish_connection().await;
        Ok(())
    }

    async fn disconnect(&self, quiesce_timeout: Duration) -> Result<(), TransportError> {
        debug!("{}: disconnect within {:?}", self.name, quiesce_timeout);
        if self.failures.disconnect_hangs.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.failures.disconnect.load(Ordering::SeqCst) {
            return Err(TransportError::new("disconnect refused"));
        }

        self.begin_disconnect().await;
        self.connected.store(false, Ordering::SeqCst);
        for listener in self.listeners() {
            listener.on_disconnected().await;
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn publish(
        &self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
        priority: u8,
    ) -> Result<MessageId, TransportError> {
        if self.failures.publish.load(Ordering::SeqCst) {
            return Err(TransportError::new("publish refused"));
        }
        if !self.is_connected() {
            return Err(TransportError::new("not connected"));
        }

        let message_id = MessageId::new(self.next_message_id.fetch_add(1, Ordering::SeqCst));
        debug!("{}: publish {} on {}", self.name, message_id, topic);
        self.published
            .lock()
            .expect("lock published")
            .push(PublishedMessage {
                message_id,
                topic: topic.to_string(),
                payload: payload.to_vec(),
                qos,
                retain,
                priority,
            });

        for listener in self.listeners() {
            listener.on_message_published(message_id, topic).await;
        }

        if self.loopback {
            let echoed = self
                .active_filters
                .lock()
                .expect("lock active_filters")
                .iter()
                .any(|filter| MqttTopicMatcher.matches(filter, topic));
            if echoed {
                self.deliver(topic, payload, qos, retain).await;
            }
        }

        if qos != QoS::AtMostOnce {
            self.confirm(message_id, topic).await;
        }
        Ok(message_id)
    }

    async fn subscribe(&self, topic_filter: &str, qos: QoS) -> Result<(), TransportError> {
        self.wire_calls
            .lock()
            .expect("lock wire_calls")
            .push(WireCall::Subscribe {
                filter: topic_filter.to_string(),
                qos,
            });
        self.wire_delay().await;
        let stall = self
            .subscribe_stalls
            .lock()
            .expect("lock subscribe_stalls")
            .get(topic_filter)
            .copied();
        if let Some(stall) = stall {
            debug!("{}: stalling subscribe on {} for {:?}", self.name, topic_filter, stall);
            tokio::time::sleep(stall).await;
        }

        if self.failures.subscribe.load(Ordering::SeqCst) {
            return Err(TransportError::new("subscribe refused"));
        }
        self.active_filters
            .lock()
            .expect("lock active_filters")
            .push(topic_filter.to_string());
        Ok(())
    }

    async fn unsubscribe(&self, topic_filter: &str) -> Result<(), TransportError> {
        self.wire_calls
            .lock()
            .expect("lock wire_calls")
            .push(WireCall::Unsubscribe {
                filter: topic_filter.to_string(),
            });
        self.wire_delay().await;

        if self.failures.unsubscribe.load(Ordering::SeqCst) {
            return Err(TransportError::new("unsubscribe refused"));
        }
        self.active_filters
            .lock()
            .expect("lock active_filters")
            .retain(|filter| filter != topic_filter);
        Ok(())
    }

    fn add_session_listener(&self, listener: Arc<dyn SessionListener>) {
        let mut listeners = self
            .session_listeners
            .lock()
            .expect("lock session_listeners");
        if !listeners
            .iter()
            .any(|existing| std::ptr::addr_eq(Arc::as_ptr(existing), Arc::as_ptr(&listener)))
        {
            listeners.push(listener);
        }
    }

    fn remove_session_listener(&self, listener: &Arc<dyn SessionListener>) {
        self.session_listeners
            .lock()
            .expect("lock session_listeners")
            .retain(|existing| !std::ptr::addr_eq(Arc::as_ptr(existing), Arc::as_ptr(listener)));
    }
}
