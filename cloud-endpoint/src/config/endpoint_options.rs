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

//! Options of a [`crate::CloudEndpoint`].

use crate::config::Properties;
use std::time::Duration;

const SERVICE_PID: &str = "kura.service.pid";
const DISCONNECT_TIMEOUT_SECONDS: &str = "disconnect.timeout.seconds";

const DEFAULT_DISCONNECT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EndpointOptions {
    service_pid: String,
    disconnect_timeout: Duration,
}

impl EndpointOptions {
    pub fn from_properties(properties: &Properties) -> Self {
        let disconnect_timeout_seconds = properties
            .get_or(
                DISCONNECT_TIMEOUT_SECONDS,
                DEFAULT_DISCONNECT_TIMEOUT_SECONDS as i64,
            )
            .try_into()
            .unwrap_or(DEFAULT_DISCONNECT_TIMEOUT_SECONDS);

        Self {
            service_pid: properties.get_or(SERVICE_PID, String::new()),
            disconnect_timeout: Duration::from_secs(disconnect_timeout_seconds),
        }
    }

    /// Identifier of the configuration record this endpoint was created from.
    pub fn service_pid(&self) -> &str {
        &self.service_pid
    }

    /// Upper bound on how long `disconnect()` waits for the transport to confirm.
    pub fn disconnect_timeout(&self) -> Duration {
        self.disconnect_timeout
    }

    pub fn with_disconnect_timeout(mut self, disconnect_timeout: Duration) -> Self {
        self.disconnect_timeout = disconnect_timeout;
        self
    }
}

impl Default for EndpointOptions {
    fn default() -> Self {
        Self::from_properties(&Properties::new())
    }
}
