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

//! Canonical structured event names used across `cloud-endpoint`.

// Subscription registry and wire events.
pub const SUBSCRIBER_REGISTER: &str = "subscriber_register";
pub const SUBSCRIBER_REGISTER_REJECTED: &str = "subscriber_register_rejected";
pub const SUBSCRIBER_UNREGISTER: &str = "subscriber_unregister";
pub const WIRE_SUBSCRIBE_OK: &str = "wire_subscribe_ok";
pub const WIRE_SUBSCRIBE_FAILED: &str = "wire_subscribe_failed";
pub const WIRE_UNSUBSCRIBE_OK: &str = "wire_unsubscribe_ok";
pub const WIRE_UNSUBSCRIBE_FAILED: &str = "wire_unsubscribe_failed";

// Inbound data path events.
pub const MESSAGE_ARRIVED: &str = "message_arrived";
pub const MESSAGE_DISPATCHED: &str = "message_dispatched";
pub const MESSAGE_PUBLISHED: &str = "message_published";
pub const MESSAGE_CONFIRMED: &str = "message_confirmed";
pub const LISTENER_PANICKED: &str = "listener_panicked";

// Outbound publish events.
pub const PUBLISH_ATTEMPT: &str = "publish_attempt";
pub const PUBLISH_OK: &str = "publish_ok";
pub const PUBLISH_FAILED: &str = "publish_failed";
pub const PUBLISH_REJECTED: &str = "publish_rejected";

// Connection lifecycle events.
pub const CONNECT_START: &str = "connect_start";
pub const CONNECT_FAILED: &str = "connect_failed";
pub const DISCONNECT_START: &str = "disconnect_start";
pub const DISCONNECT_OK: &str = "disconnect_ok";
pub const DISCONNECT_FAILED: &str = "disconnect_failed";
pub const DISCONNECT_TIMED_OUT: &str = "disconnect_timed_out";
pub const CONNECTION_STATE_CHANGED: &str = "connection_state_changed";
pub const CONNECTION_LOST: &str = "connection_lost";

// Binding and configuration events.
pub const TRANSPORT_BOUND: &str = "transport_bound";
pub const TRANSPORT_UNBOUND: &str = "transport_unbound";
pub const TRANSPORT_MISSING: &str = "transport_missing";
pub const ENDPOINT_ACTIVATED: &str = "endpoint_activated";
pub const ENDPOINT_DEACTIVATED: &str = "endpoint_deactivated";
pub const ENDPOINT_BOUND: &str = "endpoint_bound";
pub const ENDPOINT_UNBOUND: &str = "endpoint_unbound";
pub const ENDPOINT_BIND_REJECTED: &str = "endpoint_bind_rejected";
pub const OPTIONS_UPDATED: &str = "options_updated";
