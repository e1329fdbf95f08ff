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

use async_trait::async_trait;
use cloud_endpoint::{CloudMessage, QoS, SubscriberListener};
use integration_test_utils::{PanickingSubscriber, RecordingSubscriber, RecordingTransport};
use std::sync::{Arc, Mutex};
use support::{active_endpoint, connected_endpoint};

struct Tagged {
    tag: usize,
    log: Arc<Mutex<Vec<usize>>>,
}

#[async_trait]
impl SubscriberListener for Tagged {
    async fn on_message_arrived(&self, _message: Arc<CloudMessage>) {
        self.log.lock().expect("lock log").push(self.tag);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn wildcard_filters_route_each_topic_to_matching_listeners_only() {
    integration_test_utils::init_logging();

    let transport = Arc::new(RecordingTransport::new("fanout"));
    let endpoint = active_endpoint("fanout", &transport);
    let temperatures = Arc::new(RecordingSubscriber::new());
    let room1 = Arc::new(RecordingSubscriber::new());

    endpoint
        .register_subscriber("sensors/+/temp", QoS::AtMostOnce, temperatures.clone())
        .await
        .expect("valid filter");
    endpoint
        .register_subscriber("sensors/room1/#", QoS::AtMostOnce, room1.clone())
        .await
        .expect("valid filter");

    for topic in [
        "sensors/room1/temp",
        "sensors/room2/temp",
        "sensors/room1/humidity",
        "actuators/room1/fan",
    ] {
        transport.deliver(topic, b"{}", QoS::AtMostOnce, false).await;
    }

    assert_eq!(
        temperatures.topics(),
        vec![
            "sensors/room1/temp".to_string(),
            "sensors/room2/temp".to_string()
        ]
    );
    assert_eq!(
        room1.topics(),
        vec![
            "sensors/room1/temp".to_string(),
            "sensors/room1/humidity".to_string()
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn listeners_of_one_filter_are_called_in_registration_order() {
    integration_test_utils::init_logging();

    let transport = Arc::new(RecordingTransport::new("order"));
    let endpoint = active_endpoint("order", &transport);
    let log = Arc::new(Mutex::new(Vec::new()));

    for tag in 0..3 {
        endpoint
            .register_subscriber(
                "alerts/#",
                QoS::AtMostOnce,
                Arc::new(Tagged {
                    tag,
                    log: log.clone(),
                }),
            )
            .await
            .expect("valid filter");
    }
    transport
        .deliver("alerts/fire", b"1", QoS::AtMostOnce, false)
        .await;

    assert_eq!(*log.lock().expect("lock log"), vec![0, 1, 2]);
}

#[tokio::test(flavor = "multi_thread")]
async fn inbound_message_carries_topic_qos_retain_and_payload() {
    integration_test_utils::init_logging();

    let transport = Arc::new(RecordingTransport::new("inbound"));
    let endpoint = active_endpoint("inbound", &transport);
    let recorder = Arc::new(RecordingSubscriber::new());

    endpoint
        .register_subscriber("plant/#", QoS::AtLeastOnce, recorder.clone())
        .await
        .expect("valid filter");
    transport
        .deliver("plant/line1/status", b"running", QoS::AtLeastOnce, true)
        .await;

    let messages = recorder.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].topic(), Some("plant/line1/status"));
    assert_eq!(messages[0].qos(), Some(QoS::AtLeastOnce));
    assert_eq!(messages[0].retained(), Some(true));
    assert_eq!(messages[0].payload(), b"running");
}

#[tokio::test(flavor = "multi_thread")]
async fn panicking_subscriber_does_not_block_the_others() {
    integration_test_utils::init_logging();

    let transport = Arc::new(RecordingTransport::new("panic"));
    let endpoint = active_endpoint("panic", &transport);
    let survivor = Arc::new(RecordingSubscriber::new());

    endpoint
        .register_subscriber("alerts/#", QoS::AtMostOnce, Arc::new(PanickingSubscriber))
        .await
        .expect("valid filter");
    endpoint
        .register_subscriber("alerts/#", QoS::AtMostOnce, survivor.clone())
        .await
        .expect("valid filter");

    transport
        .deliver("alerts/fire", b"1", QoS::AtMostOnce, false)
        .await;
    transport
        .deliver("alerts/smoke", b"2", QoS::AtMostOnce, false)
        .await;

    assert_eq!(survivor.count(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn system_topics_are_not_matched_by_leading_wildcards() {
    integration_test_utils::init_logging();

    let transport = Arc::new(RecordingTransport::new("system"));
    let endpoint = active_endpoint("system", &transport);
    let everything = Arc::new(RecordingSubscriber::new());
    let system = Arc::new(RecordingSubscriber::new());

    endpoint
        .register_subscriber("#", QoS::AtMostOnce, everything.clone())
        .await
        .expect("valid filter");
    endpoint
        .register_subscriber("$SYS/#", QoS::AtMostOnce, system.clone())
        .await
        .expect("valid filter");

    transport
        .deliver("$SYS/broker/uptime", b"42", QoS::AtMostOnce, false)
        .await;

    assert_eq!(everything.count(), 0);
    assert_eq!(system.count(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn unregistered_listener_receives_nothing_afterwards() {
    integration_test_utils::init_logging();

    let transport = Arc::new(RecordingTransport::loopback("loopback"));
    let endpoint = connected_endpoint("loopback", &transport).await;
    let leaving = Arc::new(RecordingSubscriber::new());
    let staying = Arc::new(RecordingSubscriber::new());
    let leaving_listener: Arc<dyn SubscriberListener> = leaving.clone();

    endpoint
        .register_subscriber("sensors/+/temp", QoS::AtMostOnce, leaving_listener.clone())
        .await
        .expect("valid filter");
    endpoint
        .register_subscriber("sensors/#", QoS::AtMostOnce, staying.clone())
        .await
        .expect("valid filter");

    endpoint
        .publish_to("sensors/room1/temp", b"20", QoS::AtMostOnce, false, 7)
        .await
        .expect("connected loopback publish");
    endpoint.unregister_subscriber(&leaving_listener).await;
    endpoint
        .publish_to("sensors/room1/temp", b"21", QoS::AtMostOnce, false, 7)
        .await
        .expect("connected loopback publish");

    assert_eq!(leaving.count(), 1);
    assert_eq!(staying.count(), 2);
    assert_eq!(transport.unsubscribe_count("sensors/+/temp"), 1);
}
