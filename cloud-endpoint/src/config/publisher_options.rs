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

//! Options of a [`crate::CloudPublisher`].

use crate::config::Properties;
use crate::message::{QoS, DEFAULT_PRIORITY};

const ENDPOINT_SERVICE_PID: &str = "cloud.endpoint.service.pid";
const TOPIC: &str = "topic";
const QOS: &str = "qos";
const RETAIN: &str = "retain";
const PRIORITY: &str = "priority";

const DEFAULT_TOPIC: &str = "iot-2/evt/data/fmt/json";

/// Defaults a publisher stamps on every message it sends.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PublisherOptions {
    endpoint_service_pid: String,
    topic: String,
    qos: QoS,
    retain: bool,
    priority: u8,
}

impl PublisherOptions {
    pub fn from_properties(properties: &Properties) -> Self {
        let qos = QoS::from_level(properties.get_or(QOS, 0)).unwrap_or_default();
        let priority = u8::try_from(properties.get_or(PRIORITY, i64::from(DEFAULT_PRIORITY)))
            .unwrap_or(DEFAULT_PRIORITY);

        Self {
            endpoint_service_pid: properties.get_or(ENDPOINT_SERVICE_PID, String::new()),
            topic: properties.get_or(TOPIC, DEFAULT_TOPIC.to_string()),
            qos,
            retain: properties.get_or(RETAIN, false),
            priority,
        }
    }

    /// Service PID of the endpoint this publisher is meant to attach to.
    pub fn endpoint_service_pid(&self) -> &str {
        &self.endpoint_service_pid
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn qos(&self) -> QoS {
        self.qos
    }

    pub fn retain(&self) -> bool {
        self.retain
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }
}

impl Default for PublisherOptions {
    fn default() -> Self {
        Self::from_properties(&Properties::new())
    }
}

#[cfg(test)]
mod tests {
    use super::PublisherOptions;
    use crate::config::Properties;
    use crate::message::QoS;

    #[test]
    fn defaults_apply_to_empty_properties() {
        let options = PublisherOptions::default();

        assert_eq!(options.endpoint_service_pid(), "");
        assert_eq!(options.topic(), "iot-2/evt/data/fmt/json");
        assert_eq!(options.qos(), QoS::AtMostOnce);
        assert!(!options.retain());
        assert_eq!(options.priority(), 7);
    }

    #[test]
    fn out_of_range_qos_and_priority_fall_back() {
        let properties = Properties::new().with("qos", 4).with("priority", 1000);
        let options = PublisherOptions::from_properties(&properties);

        assert_eq!(options.qos(), QoS::AtMostOnce);
        assert_eq!(options.priority(), 7);
    }

    #[test]
    fn configured_values_are_read() {
        let properties = Properties::new()
            .with("cloud.endpoint.service.pid", "watson-endpoint-1")
            .with("topic", "iot-2/evt/status/fmt/json")
            .with("qos", 1)
            .with("retain", true)
            .with("priority", 3);
        let options = PublisherOptions::from_properties(&properties);

        assert_eq!(options.endpoint_service_pid(), "watson-endpoint-1");
        assert_eq!(options.topic(), "iot-2/evt/status/fmt/json");
        assert_eq!(options.qos(), QoS::AtLeastOnce);
        assert!(options.retain());
        assert_eq!(options.priority(), 3);
    }
}
