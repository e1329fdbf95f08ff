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

use cloud_endpoint::{CloudEndpoint, DataTransport, EndpointOptions};
use integration_test_utils::RecordingTransport;
use std::sync::Arc;

/// Endpoint bound to `transport` and listening to its session callbacks.
pub(crate) fn active_endpoint(name: &str, transport: &Arc<RecordingTransport>) -> Arc<CloudEndpoint> {
    active_endpoint_with_options(name, transport, EndpointOptions::default())
}

pub(crate) fn active_endpoint_with_options(
    name: &str,
    transport: &Arc<RecordingTransport>,
    options: EndpointOptions,
) -> Arc<CloudEndpoint> {
    let endpoint = Arc::new(CloudEndpoint::new(name, options));
    endpoint.bind_transport(transport.clone() as Arc<dyn DataTransport>);
    endpoint
        .activate()
        .expect("activation with a bound transport should succeed");
    endpoint
}

#[allow(dead_code)]
pub(crate) async fn connected_endpoint(
    name: &str,
    transport: &Arc<RecordingTransport>,
) -> Arc<CloudEndpoint> {
    let endpoint = active_endpoint(name, transport);
    endpoint
        .connect()
        .await
        .expect("connect against recording transport should succeed");
    endpoint
}
