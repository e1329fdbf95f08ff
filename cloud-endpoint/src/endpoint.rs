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

//! Cloud endpoint facade over one shared transport session.

use crate::config::{EndpointOptions, OptionsSnapshot, Properties, Versioned};
use crate::control_plane::connection_state::{ConnectionState, ConnectionStateMirror};
use crate::data_plane::event_broadcaster::ConnectionEventBroadcaster;
use crate::data_plane::subscriber_registry::{ListenerRegistry, SubscriptionInfo};
use crate::error::EndpointError;
use crate::listener::{ConnectionListener, DeliveryListener, SubscriberListener};
use crate::message::{CloudMessage, MessageId, MessageProperty, QoS, DEFAULT_PRIORITY};
use crate::observability::{events, fields};
use crate::routing::topic_filter::{MqttTopicMatcher, TopicMatcher};
use crate::transport::{DataTransport, SessionListener, TransportError};
use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

const COMPONENT: &str = "cloud_endpoint";

struct BoundTransport {
    transport: Arc<dyn DataTransport>,
}

/// Routing fields extracted from a generic outbound [`CloudMessage`].
#[derive(Debug, PartialEq)]
struct PublishRequest {
    topic: String,
    qos: QoS,
    retain: bool,
    priority: u8,
}

impl PublishRequest {
    fn from_properties(properties: &Properties) -> Result<Self, EndpointError> {
        let topic_key = MessageProperty::Topic.key();
        let topic = match properties.get_typed::<String>(topic_key) {
            Ok(Some(topic)) => topic,
            Ok(None) | Err(_) => {
                return Err(EndpointError::MissingRequiredProperty {
                    key: topic_key.to_string(),
                })
            }
        };

        let qos = match properties.get_typed::<i64>(MessageProperty::Qos.key())? {
            None => QoS::default(),
            Some(level) => QoS::from_level(level).ok_or_else(|| out_of_range(MessageProperty::Qos))?,
        };
        let retain = properties
            .get_typed::<bool>(MessageProperty::Retain.key())?
            .unwrap_or(false);
        let priority = match properties.get_typed::<i64>(MessageProperty::Priority.key())? {
            None => DEFAULT_PRIORITY,
            Some(priority) => {
                u8::try_from(priority).map_err(|_| out_of_range(MessageProperty::Priority))?
            }
        };

        Ok(Self {
            topic,
            qos,
            retain,
            priority,
        })
    }
}

fn out_of_range(property: MessageProperty) -> EndpointError {
    let expected = match property {
        MessageProperty::Qos => "integer between 0 and 2",
        MessageProperty::Priority => "integer between 0 and 255",
        MessageProperty::Topic | MessageProperty::Retain => "valid value",
    };
    EndpointError::InvalidPropertyType {
        key: property.key().to_string(),
        expected,
        found: "out-of-range integer",
    }
}

///
/// [`CloudEndpoint`] lets many application components publish and subscribe through one
/// shared [`DataTransport`] session.
///
/// Subscriptions are reference counted per topic filter: the transport sees one
/// `subscribe` when a filter gains its first listener and one `unsubscribe` when it loses
/// its last. Inbound messages are fanned out to every listener whose filter matches.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use cloud_endpoint::{CloudEndpoint, DataTransport, EndpointOptions};
///
/// # mod transport_foo {
/// #     use async_trait::async_trait;
/// #     use cloud_endpoint::{DataTransport, MessageId, QoS, SessionListener, TransportError};
/// #     use std::sync::Arc;
/// #     use std::time::Duration;
/// #     pub struct TransportFoo;
/// #
/// #     #[async_trait]
/// #     impl DataTransport for TransportFoo {
/// #         async fn connect(&self) -> Result<(), TransportError> {
/// #             Ok(())
/// #         }
/// #
/// #         async fn disconnect(&self, _quiesce_timeout: Duration) -> Result<(), TransportError> {
/// #             Ok(())
/// #         }
/// #
/// #         fn is_connected(&self) -> bool {
/// #             false
/// #         }
/// #
/// #         async fn publish(
/// #             &self,
/// #             _topic: &str,
/// #             _payload: &[u8],
/// #             _qos: QoS,
/// #             _retain: bool,
/// #             _priority: u8,
/// #         ) -> Result<MessageId, TransportError> {
/// #             Ok(MessageId::new(1))
/// #         }
/// #
/// #         async fn subscribe(&self, _topic_filter: &str, _qos: QoS) -> Result<(), TransportError> {
/// #             Ok(())
/// #         }
/// #
/// #         async fn unsubscribe(&self, _topic_filter: &str) -> Result<(), TransportError> {
/// #             Ok(())
/// #         }
/// #
/// #         fn add_session_listener(&self, _listener: Arc<dyn SessionListener>) {}
/// #
/// #         fn remove_session_listener(&self, _listener: &Arc<dyn SessionListener>) {}
/// #     }
/// # }
///
/// let transport: Arc<dyn DataTransport> = Arc::new(transport_foo::TransportFoo);
///
/// let endpoint = Arc::new(CloudEndpoint::new("telemetry", EndpointOptions::default()));
/// endpoint.bind_transport(transport);
/// ```
pub struct CloudEndpoint {
    name: String,
    options: OptionsSnapshot<EndpointOptions>,
    transport: ArcSwapOption<BoundTransport>,
    registry: ListenerRegistry,
    broadcaster: ConnectionEventBroadcaster,
    state: ConnectionStateMirror,
}

impl CloudEndpoint {
    /// Creates an endpoint that routes inbound messages with MQTT wildcard semantics.
    pub fn new(name: &str, options: EndpointOptions) -> Self {
        Self::with_matcher(name, options, Arc::new(MqttTopicMatcher))
    }

    pub fn with_matcher(
        name: &str,
        options: EndpointOptions,
        matcher: Arc<dyn TopicMatcher>,
    ) -> Self {
        Self {
            name: name.to_string(),
            options: OptionsSnapshot::new(options),
            transport: ArcSwapOption::empty(),
            registry: ListenerRegistry::new(matcher),
            broadcaster: ConnectionEventBroadcaster::new(),
            state: ConnectionStateMirror::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn transport(&self) -> Option<Arc<dyn DataTransport>> {
        self.transport
            .load_full()
            .map(|bound| bound.transport.clone())
    }

    fn require_transport(&self) -> Result<Arc<dyn DataTransport>, EndpointError> {
        self.transport().ok_or(EndpointError::TransportUnavailable)
    }

    /// Attaches the session this endpoint drives, replacing any previous one.
    pub fn bind_transport(&self, transport: Arc<dyn DataTransport>) {
        let previous = self
            .transport
            .swap(Some(Arc::new(BoundTransport { transport })));
        info!(
            event = events::TRANSPORT_BOUND,
            component = COMPONENT,
            endpoint = %self.name,
            replaced = previous.is_some(),
            "bound transport session"
        );
    }

    /// Detaches the bound session, if any, and stops listening to it.
    ///
    /// The connection state falls back to [`ConnectionState::Disconnected`]; the
    /// subscription registry is kept.
    pub fn unbind_transport(self: &Arc<Self>) -> Option<Arc<dyn DataTransport>> {
        let previous = self.transport.swap(None)?;
        let session_listener: Arc<dyn SessionListener> = self.clone();
        previous.transport.remove_session_listener(&session_listener);
        self.state.store(ConnectionState::Disconnected);
        info!(
            event = events::TRANSPORT_UNBOUND,
            component = COMPONENT,
            endpoint = %self.name,
            "unbound transport session"
        );
        Some(previous.transport.clone())
    }

    /// Starts receiving session callbacks from the bound transport.
    pub fn activate(self: &Arc<Self>) -> Result<(), EndpointError> {
        let transport = self.require_transport()?;
        let session_listener: Arc<dyn SessionListener> = self.clone();
        transport.add_session_listener(session_listener);
        if transport.is_connected() {
            self.state.store(ConnectionState::Connected);
        }
        info!(
            event = events::ENDPOINT_ACTIVATED,
            component = COMPONENT,
            endpoint = %self.name,
            service_pid = %self.options.load().service_pid(),
            "activated cloud endpoint"
        );
        Ok(())
    }

    /// Stops receiving session callbacks. Registered listeners are kept.
    pub fn deactivate(self: &Arc<Self>) {
        if let Some(transport) = self.transport() {
            let session_listener: Arc<dyn SessionListener> = self.clone();
            transport.remove_session_listener(&session_listener);
        }
        info!(
            event = events::ENDPOINT_DEACTIVATED,
            component = COMPONENT,
            endpoint = %self.name,
            "deactivated cloud endpoint"
        );
    }

    /// Replaces the options in effect and returns the new snapshot version.
    pub fn reconfigure(&self, properties: &Properties) -> u64 {
        let options = EndpointOptions::from_properties(properties);
        let version = self.options.replace(options);
        info!(
            event = events::OPTIONS_UPDATED,
            component = COMPONENT,
            endpoint = %self.name,
            version,
            "replaced endpoint options"
        );
        version
    }

    pub fn options(&self) -> Arc<Versioned<EndpointOptions>> {
        self.options.load()
    }

    /// Publishes a generic message, reading routing fields from its properties.
    ///
    /// `TOPIC` is required; `QOS`, `RETAIN` and `PRIORITY` default to 0, `false` and 7.
    pub async fn publish(&self, message: &CloudMessage) -> Result<Option<MessageId>, EndpointError> {
        let request = match PublishRequest::from_properties(message.properties()) {
            Ok(request) => request,
            Err(err) => {
                warn!(
                    event = events::PUBLISH_REJECTED,
                    component = COMPONENT,
                    endpoint = %self.name,
                    err = %err,
                    "rejected publish request"
                );
                return Err(err);
            }
        };

        self.publish_to(
            &request.topic,
            message.payload(),
            request.qos,
            request.retain,
            request.priority,
        )
        .await
    }

    /// Publishes `payload` on `topic`.
    ///
    /// Returns the transport-assigned id for QoS 1 and 2, and `None` for QoS 0 where no
    /// delivery confirmation follows.
    pub async fn publish_to(
        &self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
        priority: u8,
    ) -> Result<Option<MessageId>, EndpointError> {
        let transport = self.require_transport()?;

        debug!(
            event = events::PUBLISH_ATTEMPT,
            component = COMPONENT,
            endpoint = %self.name,
            topic,
            qos = fields::format_qos(qos),
            retain,
            priority,
            "publishing message"
        );

        match transport.publish(topic, payload, qos, retain, priority).await {
            Ok(message_id) => {
                let reported = (qos != QoS::AtMostOnce).then_some(message_id);
                debug!(
                    event = events::PUBLISH_OK,
                    component = COMPONENT,
                    endpoint = %self.name,
                    topic,
                    msg_id = %fields::format_message_id(reported),
                    "published message"
                );
                Ok(reported)
            }
            Err(cause) => {
                warn!(
                    event = events::PUBLISH_FAILED,
                    component = COMPONENT,
                    endpoint = %self.name,
                    topic,
                    err = %cause,
                    "transport rejected publish"
                );
                Err(EndpointError::PublishFailed(cause))
            }
        }
    }

    /// Registers `listener` for messages whose topic matches `filter`.
    ///
    /// The first listener of a filter triggers a transport subscription at `qos`. A failed
    /// or impossible subscription is logged; the registration stands either way.
    pub async fn register_subscriber(
        &self,
        filter: &str,
        qos: QoS,
        listener: Arc<dyn SubscriberListener>,
    ) -> Result<(), EndpointError> {
        let registration = self.registry.register(filter, qos, listener).await?;
        if registration.is_new_filter() {
            self.subscribe_on_wire(filter, qos).await;
        }
        Ok(())
    }

    /// Registers `listener` using the `TOPIC` and `QOS` entries of a subscription record.
    pub async fn register_subscriber_with_properties(
        &self,
        properties: &Properties,
        listener: Arc<dyn SubscriberListener>,
    ) -> Result<(), EndpointError> {
        let topic_key = MessageProperty::Topic.key();
        let filter = match properties.get_typed::<String>(topic_key) {
            Ok(Some(filter)) => filter,
            Ok(None) | Err(_) => {
                return Err(EndpointError::MissingRequiredProperty {
                    key: topic_key.to_string(),
                })
            }
        };
        let qos = match properties.get_typed::<i64>(MessageProperty::Qos.key())? {
            None => QoS::default(),
            Some(level) => QoS::from_level(level).ok_or_else(|| out_of_range(MessageProperty::Qos))?,
        };

        self.register_subscriber(&filter, qos, listener).await
    }

    /// Removes every registration of `listener`; filters left without listeners are
    /// unsubscribed from the transport.
    pub async fn unregister_subscriber(&self, listener: &Arc<dyn SubscriberListener>) {
        for filter in self.registry.unregister(listener).await {
            if let Some(wire_turn) = self.registry.retire(&filter, listener).await {
                self.unsubscribe_on_wire(&filter).await;
                drop(wire_turn);
            }
        }
    }

    /// Live subscriptions ordered by filter.
    pub async fn subscriptions(&self) -> Vec<SubscriptionInfo> {
        self.registry.subscriptions().await
    }

    async fn subscribe_on_wire(&self, filter: &str, qos: QoS) {
        let Some(transport) = self.transport() else {
            warn!(
                event = events::TRANSPORT_MISSING,
                component = COMPONENT,
                endpoint = %self.name,
                filter,
                reason = fields::REASON_NO_TRANSPORT,
                "cannot subscribe; keeping registration"
            );
            return;
        };

        match transport.subscribe(filter, qos).await {
            Ok(()) => debug!(
                event = events::WIRE_SUBSCRIBE_OK,
                component = COMPONENT,
                endpoint = %self.name,
                filter,
                qos = fields::format_qos(qos),
                "subscribed topic filter"
            ),
            Err(cause) => {
                let err = EndpointError::SubscribeFailed {
                    filter: filter.to_string(),
                    cause,
                };
                warn!(
                    event = events::WIRE_SUBSCRIBE_FAILED,
                    component = COMPONENT,
                    endpoint = %self.name,
                    filter,
                    err = %err,
                    "subscribe failed; keeping registration"
                );
            }
        }
    }

    async fn unsubscribe_on_wire(&self, filter: &str) {
        let Some(transport) = self.transport() else {
            warn!(
                event = events::TRANSPORT_MISSING,
                component = COMPONENT,
                endpoint = %self.name,
                filter,
                reason = fields::REASON_NO_TRANSPORT,
                "cannot unsubscribe"
            );
            return;
        };

        match transport.unsubscribe(filter).await {
            Ok(()) => debug!(
                event = events::WIRE_UNSUBSCRIBE_OK,
                component = COMPONENT,
                endpoint = %self.name,
                filter,
                "unsubscribed topic filter"
            ),
            Err(cause) => {
                let err = EndpointError::UnsubscribeFailed {
                    filter: filter.to_string(),
                    cause,
                };
                warn!(
                    event = events::WIRE_UNSUBSCRIBE_FAILED,
                    component = COMPONENT,
                    endpoint = %self.name,
                    filter,
                    err = %err,
                    "unsubscribe failed"
                );
            }
        }
    }

    /// Adds a connection listener; returns `false` if this instance was already present.
    pub fn register_connection_listener(&self, listener: Arc<dyn ConnectionListener>) -> bool {
        self.broadcaster.add_connection_listener(&listener)
    }

    pub fn unregister_connection_listener(&self, listener: &Arc<dyn ConnectionListener>) -> bool {
        self.broadcaster.remove_connection_listener(listener)
    }

    /// Adds a delivery listener; returns `false` if this instance was already present.
    pub fn register_delivery_listener(&self, listener: Arc<dyn DeliveryListener>) -> bool {
        self.broadcaster.add_delivery_listener(&listener)
    }

    pub fn unregister_delivery_listener(&self, listener: &Arc<dyn DeliveryListener>) -> bool {
        self.broadcaster.remove_delivery_listener(listener)
    }

    /// Connects the shared session. A no-op when already connected.
    pub async fn connect(&self) -> Result<(), EndpointError> {
        let transport = self.require_transport()?;
        if self.state.load() == ConnectionState::Connected {
            debug!(
                event = events::CONNECT_START,
                component = COMPONENT,
                endpoint = %self.name,
                reason = "already_connected",
                "skipping connect"
            );
            return Ok(());
        }

        let previous = self.state.store(ConnectionState::Connecting);
        info!(
            event = events::CONNECT_START,
            component = COMPONENT,
            endpoint = %self.name,
            from = %previous,
            "connecting transport session"
        );

        if let Err(cause) = transport.connect().await {
            self.state.store(ConnectionState::Disconnected);
            warn!(
                event = events::CONNECT_FAILED,
                component = COMPONENT,
                endpoint = %self.name,
                err = %cause,
                "connect failed"
            );
            return Err(EndpointError::ConnectFailed(cause));
        }
        Ok(())
    }

    /// Disconnects the shared session, waiting at most the configured disconnect timeout.
    ///
    /// When the transport does not finish in time the connection is treated as down and
    /// the call succeeds.
    pub async fn disconnect(&self) -> Result<(), EndpointError> {
        let transport = self.require_transport()?;
        let quiesce_timeout = self.options.load().disconnect_timeout();

        self.state
            .transition(ConnectionState::Connected, ConnectionState::Disconnecting);
        info!(
            event = events::DISCONNECT_START,
            component = COMPONENT,
            endpoint = %self.name,
            timeout_ms = quiesce_timeout.as_millis() as u64,
            "disconnecting transport session"
        );

        match tokio::time::timeout(quiesce_timeout, transport.disconnect(quiesce_timeout)).await {
            Ok(Ok(())) => {
                self.state
                    .transition(ConnectionState::Disconnecting, ConnectionState::Disconnected);
                info!(
                    event = events::DISCONNECT_OK,
                    component = COMPONENT,
                    endpoint = %self.name,
                    "disconnected transport session"
                );
                Ok(())
            }
            Ok(Err(cause)) => {
                self.state.store(ConnectionState::Disconnected);
                warn!(
                    event = events::DISCONNECT_FAILED,
                    component = COMPONENT,
                    endpoint = %self.name,
                    err = %cause,
                    "disconnect failed; treating connection as down"
                );
                Err(EndpointError::DisconnectFailed(cause))
            }
            Err(_elapsed) => {
                self.state.store(ConnectionState::Disconnected);
                warn!(
                    event = events::DISCONNECT_TIMED_OUT,
                    component = COMPONENT,
                    endpoint = %self.name,
                    timeout_ms = quiesce_timeout.as_millis() as u64,
                    "disconnect timed out; treating connection as down"
                );
                Ok(())
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state.load() == ConnectionState::Connected
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.state.load()
    }

    fn change_state(&self, next: ConnectionState) {
        let previous = self.state.store(next);
        info!(
            event = events::CONNECTION_STATE_CHANGED,
            component = COMPONENT,
            endpoint = %self.name,
            from = %previous,
            to = %next,
            "connection state changed"
        );
    }
}

#[async_trait]
impl SessionListener for CloudEndpoint {
    async fn on_connection_established(&self) {
        self.change_state(ConnectionState::Connected);
        self.broadcaster.broadcast_established().await;
    }

    async fn on_disconnecting(&self) {
        self.change_state(ConnectionState::Disconnecting);
    }

    async fn on_disconnected(&self) {
        self.change_state(ConnectionState::Disconnected);
        self.broadcaster.broadcast_disconnected().await;
    }

    async fn on_connection_lost(&self, cause: TransportError) {
        warn!(
            event = events::CONNECTION_LOST,
            component = COMPONENT,
            endpoint = %self.name,
            err = %cause,
            "transport session lost"
        );
        self.change_state(ConnectionState::Disconnected);
        self.broadcaster.broadcast_lost().await;
    }

    async fn on_message_arrived(&self, topic: &str, payload: &[u8], qos: QoS, retained: bool) {
        debug!(
            event = events::MESSAGE_ARRIVED,
            component = COMPONENT,
            endpoint = %self.name,
            topic,
            qos = fields::format_qos(qos),
            retained,
            payload_len = payload.len(),
            "inbound message arrived"
        );
        let message = Arc::new(CloudMessage::arrived(topic, payload, qos, retained));
        self.registry.dispatch(topic, message).await;
    }

    async fn on_message_published(&self, message_id: MessageId, topic: &str) {
        debug!(
            event = events::MESSAGE_PUBLISHED,
            component = COMPONENT,
            endpoint = %self.name,
            topic,
            msg_id = %message_id,
            "transport published message"
        );
    }

    async fn on_message_confirmed(&self, message_id: MessageId, topic: &str) {
        debug!(
            event = events::MESSAGE_CONFIRMED,
            component = COMPONENT,
            endpoint = %self.name,
            topic,
            msg_id = %message_id,
            "transport confirmed delivery"
        );
        self.broadcaster.broadcast_delivery_confirmed(message_id).await;
    }
}
