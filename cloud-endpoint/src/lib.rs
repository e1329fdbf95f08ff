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

//! # cloud-endpoint
//!
//! `cloud-endpoint` lets many application components share one connect/disconnect-able
//! message-transport session.
//!
//! A [`CloudEndpoint`] reference-counts subscriptions per topic filter, fans inbound
//! messages out to every matching [`SubscriberListener`], and rebroadcasts session
//! lifecycle and delivery-confirmation events to identity-based listener sets.
//! [`CloudPublisher`] stamps configured defaults onto outgoing payloads.
//!
//! ## Publish and subscribe over a loopback session
//!
//! ```
//! use std::sync::Arc;
//! use cloud_endpoint::{CloudEndpoint, DataTransport, EndpointOptions, QoS, SubscriberListener};
//! use integration_test_utils::{RecordingSubscriber, RecordingTransport};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let transport = Arc::new(RecordingTransport::loopback("loopback"));
//! let endpoint = Arc::new(CloudEndpoint::new("telemetry", EndpointOptions::default()));
//! endpoint.bind_transport(transport.clone() as Arc<dyn DataTransport>);
//! endpoint.activate().unwrap();
//! endpoint.connect().await.unwrap();
//! assert!(endpoint.is_connected());
//!
//! let subscriber = Arc::new(RecordingSubscriber::new());
//! endpoint
//!     .register_subscriber("sensors/+/temp", QoS::AtMostOnce, subscriber.clone())
//!     .await
//!     .unwrap();
//!
//! endpoint
//!     .publish_to("sensors/room1/temp", b"21.5", QoS::AtMostOnce, false, 7)
//!     .await
//!     .unwrap();
//! assert_eq!(subscriber.topics(), vec!["sensors/room1/temp".to_string()]);
//!
//! let subscriber: Arc<dyn SubscriberListener> = subscriber;
//! endpoint.unregister_subscriber(&subscriber).await;
//! assert_eq!(transport.unsubscribe_count("sensors/+/temp"), 1);
//! # });
//! ```
//!
//! Wire-level subscribe and unsubscribe failures are logged and absorbed: the registry
//! stays authoritative for local delivery. Caller-input mistakes such as a malformed
//! filter are returned as [`EndpointError`].

mod config;
mod control_plane;
mod data_plane;
mod endpoint;
mod error;
mod listener;
mod message;
#[doc(hidden)]
pub mod observability;
mod publisher;
mod routing;
mod transport;

pub use config::{
    EndpointOptions, FromProperty, OptionsSnapshot, Properties, PropertyValue, PublisherOptions,
    Versioned,
};
pub use control_plane::connection_state::ConnectionState;
pub use data_plane::subscriber_registry::SubscriptionInfo;
pub use endpoint::CloudEndpoint;
pub use error::EndpointError;
pub use listener::{ConnectionListener, DeliveryListener, SubscriberListener};
pub use message::{CloudMessage, MessageId, MessageProperty, QoS, DEFAULT_PRIORITY};
pub use publisher::CloudPublisher;
pub use routing::topic_filter::{FilterError, MqttTopicMatcher, TopicMatcher};
pub use transport::{DataTransport, SessionListener, TransportError};
