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

mod recording_listeners;
mod recording_transport;

pub use recording_listeners::{
    ConnectionEvent, PanickingSubscriber, RecordingConnectionListener, RecordingDeliveryListener,
    RecordingSubscriber,
};
pub use recording_transport::{PublishedMessage, RecordingTransport, WireCall};

/// Installs a test-writer `tracing` subscriber once per test binary.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
