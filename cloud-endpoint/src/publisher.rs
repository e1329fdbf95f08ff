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

//! Publisher-facing adapter that stamps configured defaults onto outgoing payloads.

use crate::config::{OptionsSnapshot, Properties, PublisherOptions, Versioned};
use crate::data_plane::event_broadcaster::ConnectionEventBroadcaster;
use crate::endpoint::CloudEndpoint;
use crate::error::EndpointError;
use crate::listener::{ConnectionListener, DeliveryListener};
use crate::message::{CloudMessage, MessageId, MessageProperty};
use crate::observability::events;
use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use std::sync::{Arc, Weak};
use tracing::{info, warn};

const COMPONENT: &str = "cloud_publisher";

/// Publishes payloads on one configured topic through a bound [`CloudEndpoint`].
///
/// The publisher follows its endpoint's connection and delivery events and forwards them
/// to its own listeners. It only binds the endpoint whose service PID matches its
/// `cloud.endpoint.service.pid` option. The endpoint refers back to the publisher weakly,
/// so dropping a bound publisher releases both.
pub struct CloudPublisher {
    name: String,
    options: OptionsSnapshot<PublisherOptions>,
    binding: ArcSwapOption<Binding>,
    broadcaster: ConnectionEventBroadcaster,
}

struct Binding {
    endpoint: Arc<CloudEndpoint>,
    link: Arc<EndpointLink>,
}

impl Binding {
    fn detach(&self) {
        let connection_listener: Arc<dyn ConnectionListener> = self.link.clone();
        let delivery_listener: Arc<dyn DeliveryListener> = self.link.clone();
        self.endpoint
            .unregister_connection_listener(&connection_listener);
        self.endpoint.unregister_delivery_listener(&delivery_listener);
    }
}

/// Listener registered on the endpoint on behalf of a publisher.
struct EndpointLink {
    publisher: Weak<CloudPublisher>,
}

impl CloudPublisher {
    pub fn new(name: &str, options: PublisherOptions) -> Self {
        Self {
            name: name.to_string(),
            options: OptionsSnapshot::new(options),
            binding: ArcSwapOption::empty(),
            broadcaster: ConnectionEventBroadcaster::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attaches to `endpoint`, detaching from any endpoint bound before.
    ///
    /// Returns false, leaving the current binding untouched, when the endpoint's
    /// service PID is not the one this publisher is configured for.
    pub fn bind_endpoint(self: &Arc<Self>, endpoint: Arc<CloudEndpoint>) -> bool {
        let options = self.options.load();
        let endpoint_options = endpoint.options();
        if endpoint_options.service_pid() != options.endpoint_service_pid() {
            warn!(
                event = events::ENDPOINT_BIND_REJECTED,
                component = COMPONENT,
                publisher = %self.name,
                endpoint = endpoint.name(),
                wanted_pid = options.endpoint_service_pid(),
                offered_pid = endpoint_options.service_pid(),
                "endpoint service pid does not match; not binding"
            );
            return false;
        }

        let link = Arc::new(EndpointLink {
            publisher: Arc::downgrade(self),
        });
        endpoint.register_connection_listener(link.clone());
        endpoint.register_delivery_listener(link.clone());
        info!(
            event = events::ENDPOINT_BOUND,
            component = COMPONENT,
            publisher = %self.name,
            endpoint = endpoint.name(),
            "bound cloud endpoint"
        );

        if let Some(previous) = self.binding.swap(Some(Arc::new(Binding { endpoint, link }))) {
            previous.detach();
        }
        true
    }

    pub fn unbind_endpoint(&self) -> Option<Arc<CloudEndpoint>> {
        let previous = self.binding.swap(None)?;
        previous.detach();
        info!(
            event = events::ENDPOINT_UNBOUND,
            component = COMPONENT,
            publisher = %self.name,
            endpoint = previous.endpoint.name(),
            "unbound cloud endpoint"
        );
        Some(previous.endpoint.clone())
    }

    pub fn endpoint(&self) -> Option<Arc<CloudEndpoint>> {
        self.binding
            .load_full()
            .map(|binding| binding.endpoint.clone())
    }

    /// Applies a new configuration record and returns its snapshot version.
    ///
    /// A bound endpoint whose service PID no longer matches is unbound; the caller binds
    /// the newly selected one.
    pub fn updated(&self, properties: &Properties) -> u64 {
        let version = self
            .options
            .replace(PublisherOptions::from_properties(properties));
        info!(
            event = events::OPTIONS_UPDATED,
            component = COMPONENT,
            publisher = %self.name,
            version,
            "replaced publisher options"
        );

        let wanted = self.options.load();
        let stale = self.endpoint().is_some_and(|endpoint| {
            endpoint.options().service_pid() != wanted.endpoint_service_pid()
        });
        if stale {
            self.unbind_endpoint();
        }
        version
    }

    pub fn options(&self) -> Arc<Versioned<PublisherOptions>> {
        self.options.load()
    }

    /// Publishes `payload` with the topic, QoS, retain flag and priority in effect.
    pub async fn publish(&self, payload: Vec<u8>) -> Result<Option<MessageId>, EndpointError> {
        let endpoint = self.endpoint().ok_or(EndpointError::TransportUnavailable)?;
        let options = self.options.load();
        let properties = Properties::new()
            .with(MessageProperty::Topic.key(), options.topic())
            .with(MessageProperty::Qos.key(), options.qos().level())
            .with(MessageProperty::Retain.key(), options.retain())
            .with(MessageProperty::Priority.key(), options.priority());

        endpoint
            .publish(&CloudMessage::new(payload, properties))
            .await
    }

    pub fn is_connected(&self) -> bool {
        self.endpoint()
            .is_some_and(|endpoint| endpoint.is_connected())
    }

    pub fn register_connection_listener(&self, listener: Arc<dyn ConnectionListener>) -> bool {
        self.broadcaster.add_connection_listener(&listener)
    }

    pub fn unregister_connection_listener(&self, listener: &Arc<dyn ConnectionListener>) -> bool {
        self.broadcaster.remove_connection_listener(listener)
    }

    pub fn register_delivery_listener(&self, listener: Arc<dyn DeliveryListener>) -> bool {
        self.broadcaster.add_delivery_listener(&listener)
    }

    pub fn unregister_delivery_listener(&self, listener: &Arc<dyn DeliveryListener>) -> bool {
        self.broadcaster.remove_delivery_listener(listener)
    }
}

impl Drop for CloudPublisher {
    fn drop(&mut self) {
        if let Some(binding) = self.binding.swap(None) {
            binding.detach();
        }
    }
}

#[async_trait]
impl ConnectionListener for EndpointLink {
    async fn on_connection_established(&self) {
        if let Some(publisher) = self.publisher.upgrade() {
            publisher.broadcaster.broadcast_established().await;
        }
    }

    async fn on_connection_lost(&self) {
        if let Some(publisher) = self.publisher.upgrade() {
            publisher.broadcaster.broadcast_lost().await;
        }
    }

    async fn on_disconnected(&self) {
        if let Some(publisher) = self.publisher.upgrade() {
            publisher.broadcaster.broadcast_disconnected().await;
        }
    }
}

#[async_trait]
impl DeliveryListener for EndpointLink {
    async fn on_message_confirmed(&self, message_id: MessageId) {
        if let Some(publisher) = self.publisher.upgrade() {
            publisher
                .broadcaster
                .broadcast_delivery_confirmed(message_id)
                .await;
        }
    }
}
