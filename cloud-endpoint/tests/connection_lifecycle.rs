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

mod support;

use cloud_endpoint::{
    CloudEndpoint, ConnectionListener, ConnectionState, EndpointError, EndpointOptions,
    Properties, QoS,
};
use integration_test_utils::{ConnectionEvent, RecordingConnectionListener, RecordingTransport};
use std::sync::Arc;
use std::time::Duration;
use support::{active_endpoint, active_endpoint_with_options};

#[tokio::test(flavor = "multi_thread")]
async fn connect_and_lose_connection_are_broadcast() {
    integration_test_utils::init_logging();

    let transport = Arc::new(RecordingTransport::new("lifecycle"));
    let endpoint = active_endpoint("lifecycle", &transport);
    let listener = Arc::new(RecordingConnectionListener::new());
    endpoint.register_connection_listener(listener.clone());

    assert_eq!(endpoint.connection_state(), ConnectionState::Disconnected);
    endpoint.connect().await.expect("connect should succeed");
    assert!(endpoint.is_connected());

    transport.lose_connection("network down").await;
    assert_eq!(endpoint.connection_state(), ConnectionState::Disconnected);
    assert_eq!(
        listener.events(),
        vec![ConnectionEvent::Established, ConnectionEvent::Lost]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn late_listener_sees_only_later_events() {
    integration_test_utils::init_logging();

    let transport = Arc::new(RecordingTransport::new("late"));
    let endpoint = active_endpoint("late", &transport);
    endpoint.connect().await.expect("connect should succeed");

    let late = Arc::new(RecordingConnectionListener::new());
    endpoint.register_connection_listener(late.clone());
    assert!(late.events().is_empty());

    transport.lose_connection("network down").await;
    assert_eq!(late.events(), vec![ConnectionEvent::Lost]);
}

#[tokio::test(flavor = "multi_thread")]
async fn connection_listener_registration_is_identity_based() {
    integration_test_utils::init_logging();

    let transport = Arc::new(RecordingTransport::new("identity"));
    let endpoint = active_endpoint("identity", &transport);
    let recorder = Arc::new(RecordingConnectionListener::new());
    let listener: Arc<dyn ConnectionListener> = recorder.clone();

    assert!(endpoint.register_connection_listener(listener.clone()));
    assert!(!endpoint.register_connection_listener(listener.clone()));
    endpoint.connect().await.expect("connect should succeed");
    assert_eq!(recorder.events(), vec![ConnectionEvent::Established]);

    assert!(endpoint.unregister_connection_listener(&listener));
    transport.lose_connection("network down").await;
    assert_eq!(recorder.events(), vec![ConnectionEvent::Established]);
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_connect_returns_to_disconnected() {
    integration_test_utils::init_logging();

    let transport = Arc::new(RecordingTransport::new("refused"));
    transport.set_connect_failure(true);
    let endpoint = active_endpoint("refused", &transport);

    let result = endpoint.connect().await;

    assert!(matches!(result, Err(EndpointError::ConnectFailed(_))));
    assert_eq!(endpoint.connection_state(), ConnectionState::Disconnected);
}

#[tokio::test(flavor = "multi_thread")]
async fn disconnect_walks_through_disconnecting_to_disconnected() {
    integration_test_utils::init_logging();

    let transport = Arc::new(RecordingTransport::new("graceful"));
    let endpoint = active_endpoint("graceful", &transport);
    let listener = Arc::new(RecordingConnectionListener::new());
    endpoint.register_connection_listener(listener.clone());
    endpoint.connect().await.expect("connect should succeed");

    transport.begin_disconnect().await;
    assert_eq!(endpoint.connection_state(), ConnectionState::Disconnecting);

    endpoint.disconnect().await.expect("disconnect should succeed");
    assert_eq!(endpoint.connection_state(), ConnectionState::Disconnected);
    assert_eq!(
        listener.events(),
        vec![ConnectionEvent::Established, ConnectionEvent::Disconnected]
    );
}

#[tokio::test(start_paused = true)]
async fn hanging_disconnect_times_out_and_counts_as_down() {
    integration_test_utils::init_logging();

    let transport = Arc::new(RecordingTransport::new("hanging"));
    transport.set_disconnect_hangs(true);
    let endpoint = active_endpoint_with_options(
        "hanging",
        &transport,
        EndpointOptions::default().with_disconnect_timeout(Duration::from_secs(2)),
    );
    let listener = Arc::new(RecordingConnectionListener::new());
    endpoint.register_connection_listener(listener.clone());
    endpoint.connect().await.expect("connect should succeed");

    let started = tokio::time::Instant::now();
    endpoint
        .disconnect()
        .await
        .expect("a timed out disconnect is not an error");

    assert!(started.elapsed() >= Duration::from_secs(2));
    assert!(!endpoint.is_connected());
    assert_eq!(listener.events(), vec![ConnectionEvent::Established]);
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_disconnect_is_reported_and_counts_as_down() {
    integration_test_utils::init_logging();

    let transport = Arc::new(RecordingTransport::new("stubborn"));
    transport.set_disconnect_failure(true);
    let endpoint = active_endpoint("stubborn", &transport);
    endpoint.connect().await.expect("connect should succeed");

    let result = endpoint.disconnect().await;

    assert!(matches!(result, Err(EndpointError::DisconnectFailed(_))));
    assert_eq!(endpoint.connection_state(), ConnectionState::Disconnected);
}

#[tokio::test(flavor = "multi_thread")]
async fn operations_needing_a_session_fail_while_unbound() {
    integration_test_utils::init_logging();

    let endpoint = Arc::new(CloudEndpoint::new("unbound", EndpointOptions::default()));

    assert!(matches!(
        endpoint.connect().await,
        Err(EndpointError::TransportUnavailable)
    ));
    assert!(matches!(
        endpoint.disconnect().await,
        Err(EndpointError::TransportUnavailable)
    ));
    assert!(matches!(
        endpoint
            .publish_to("events", b"{}", QoS::AtMostOnce, false, 7)
            .await,
        Err(EndpointError::TransportUnavailable)
    ));
    assert!(matches!(
        endpoint.activate(),
        Err(EndpointError::TransportUnavailable)
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn unbinding_detaches_from_session_callbacks() {
    integration_test_utils::init_logging();

    let transport = Arc::new(RecordingTransport::new("detach"));
    let endpoint = active_endpoint("detach", &transport);
    endpoint.connect().await.expect("connect should succeed");
    assert_eq!(transport.session_listener_count(), 1);

    assert!(endpoint.unbind_transport().is_some());
    assert_eq!(transport.session_listener_count(), 0);
    assert_eq!(endpoint.connection_state(), ConnectionState::Disconnected);

    transport.establish_connection().await;
    assert!(!endpoint.is_connected());
    assert!(endpoint.unbind_transport().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn activation_adopts_an_already_connected_session() {
    integration_test_utils::init_logging();

    let transport = Arc::new(RecordingTransport::new("warm"));
    transport.establish_connection().await;

    let endpoint = active_endpoint("warm", &transport);
    assert!(endpoint.is_connected());

    endpoint.deactivate();
    assert_eq!(transport.session_listener_count(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn reconfigure_swaps_options_with_new_version() {
    integration_test_utils::init_logging();

    let transport = Arc::new(RecordingTransport::new("reconfigure"));
    let endpoint = active_endpoint("reconfigure", &transport);
    let before = endpoint.options();

    let record = Properties::from_json5(
        "{ 'kura.service.pid': 'org.eclipse.kura.cloud.CloudService', 'disconnect.timeout.seconds': 3 }",
    )
    .expect("valid JSON5 record");
    let version = endpoint.reconfigure(&record);

    let after = endpoint.options();
    assert_eq!(before.version(), 0);
    assert_eq!(version, 1);
    assert_eq!(after.version(), 1);
    assert_eq!(after.service_pid(), "org.eclipse.kura.cloud.CloudService");
    assert_eq!(after.disconnect_timeout(), Duration::from_secs(3));
    assert_eq!(before.disconnect_timeout(), Duration::from_secs(10));
}
