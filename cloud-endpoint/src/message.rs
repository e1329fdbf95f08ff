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

//! Generic message record exchanged between applications and the endpoint.

use crate::config::{Properties, PropertyValue};
use std::fmt;
use std::fmt::{Display, Formatter};

/// Priority applied when a publish request does not carry one.
pub const DEFAULT_PRIORITY: u8 = 7;

/// Well-known keys of a [`CloudMessage`] property map.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MessageProperty {
    Topic,
    Qos,
    Retain,
    Priority,
}

impl MessageProperty {
    pub const fn key(self) -> &'static str {
        match self {
            MessageProperty::Topic => "TOPIC",
            MessageProperty::Qos => "QOS",
            MessageProperty::Retain => "RETAIN",
            MessageProperty::Priority => "PRIORITY",
        }
    }
}

impl Display for MessageProperty {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Delivery-assurance level requested from the transport.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum QoS {
    #[default]
    AtMostOnce,
    AtLeastOnce,
    ExactlyOnce,
}

impl QoS {
    pub fn from_level(level: i64) -> Option<Self> {
        match level {
            0 => Some(QoS::AtMostOnce),
            1 => Some(QoS::AtLeastOnce),
            2 => Some(QoS::ExactlyOnce),
            _ => None,
        }
    }

    pub const fn level(self) -> u8 {
        match self {
            QoS::AtMostOnce => 0,
            QoS::AtLeastOnce => 1,
            QoS::ExactlyOnce => 2,
        }
    }
}

/// Transport-assigned identifier of a published message.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MessageId(u32);

impl MessageId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for MessageId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for MessageId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A payload plus the generic properties describing where and how it travels.
///
/// Outbound messages carry at least [`MessageProperty::Topic`]; inbound messages
/// built by the endpoint carry topic, QoS and retain flag.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CloudMessage {
    properties: Properties,
    payload: Vec<u8>,
}

impl CloudMessage {
    pub fn new(payload: Vec<u8>, properties: Properties) -> Self {
        Self {
            properties,
            payload,
        }
    }

    /// Builds the record handed to subscribers for one inbound transport message.
    pub(crate) fn arrived(topic: &str, payload: &[u8], qos: QoS, retained: bool) -> Self {
        let properties = Properties::new()
            .with(MessageProperty::Topic.key(), topic)
            .with(MessageProperty::Qos.key(), i64::from(qos.level()))
            .with(MessageProperty::Retain.key(), retained);

        Self::new(payload.to_vec(), properties)
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn topic(&self) -> Option<&str> {
        match self.properties.get(MessageProperty::Topic.key()) {
            Some(PropertyValue::String(topic)) => Some(topic.as_str()),
            _ => None,
        }
    }

    pub fn qos(&self) -> Option<QoS> {
        match self.properties.get(MessageProperty::Qos.key()) {
            Some(PropertyValue::Integer(level)) => QoS::from_level(*level),
            _ => None,
        }
    }

    pub fn retained(&self) -> Option<bool> {
        match self.properties.get(MessageProperty::Retain.key()) {
            Some(PropertyValue::Boolean(retained)) => Some(*retained),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CloudMessage, MessageId, MessageProperty, QoS};

    #[test]
    fn qos_levels_outside_zero_to_two_are_rejected() {
        assert_eq!(QoS::from_level(0), Some(QoS::AtMostOnce));
        assert_eq!(QoS::from_level(2), Some(QoS::ExactlyOnce));
        assert_eq!(QoS::from_level(3), None);
        assert_eq!(QoS::from_level(-1), None);
    }

    #[test]
    fn arrived_message_exposes_topic_qos_and_retain() {
        let message = CloudMessage::arrived("sensors/room1/temp", b"21.5", QoS::AtLeastOnce, true);

        assert_eq!(message.topic(), Some("sensors/room1/temp"));
        assert_eq!(message.qos(), Some(QoS::AtLeastOnce));
        assert_eq!(message.retained(), Some(true));
        assert_eq!(message.payload(), b"21.5");
        assert!(message
            .properties()
            .get(MessageProperty::Priority.key())
            .is_none());
    }

    #[test]
    fn message_id_renders_as_decimal_string() {
        assert_eq!(MessageId::new(1201).to_string(), "1201");
    }
}
