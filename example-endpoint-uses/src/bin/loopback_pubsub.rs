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

mod common;

use clap::Parser;
use cloud_endpoint::{
    CloudEndpoint, DataTransport, EndpointError, EndpointOptions, QoS, SubscriberListener,
};
use common::{PrintingConnectionListener, PrintingDeliveryListener, PrintingSubscriber};
use integration_test_utils::RecordingTransport;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(version, about = "Publishes through a loopback session and prints what comes back", long_about = None)]
struct Args {
    /// Topic filter the printing subscriber registers
    #[arg(long, default_value = "demo/+/status")]
    filter: String,
    /// Topic the messages are published on
    #[arg(long, default_value = "demo/device1/status")]
    topic: String,
    /// Number of messages to publish
    #[arg(long, default_value_t = 3)]
    count: u32,
    /// Publish QoS level (0, 1 or 2)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=2))]
    qos: u8,
}

#[tokio::main]
async fn main() -> Result<(), EndpointError> {
    let _ = tracing_subscriber::fmt::try_init();
    let args = Args::parse();
    let qos = QoS::from_level(i64::from(args.qos)).unwrap_or_default();

    info!("Started loopback_pubsub.");

    let transport = Arc::new(RecordingTransport::loopback("loopback"));
    let endpoint = Arc::new(CloudEndpoint::new("loopback", EndpointOptions::default()));
    endpoint.bind_transport(transport.clone() as Arc<dyn DataTransport>);
    endpoint.activate()?;
    endpoint.register_connection_listener(Arc::new(PrintingConnectionListener));
    endpoint.register_delivery_listener(Arc::new(PrintingDeliveryListener));
    endpoint.connect().await?;

    let subscriber: Arc<dyn SubscriberListener> = Arc::new(PrintingSubscriber);
    endpoint
        .register_subscriber(&args.filter, qos, subscriber.clone())
        .await?;

    for sequence in 0..args.count {
        let payload = format!("{{\"sequence\":{sequence}}}");
        let message_id = endpoint
            .publish_to(&args.topic, payload.as_bytes(), qos, false, 7)
            .await?;
        info!(sequence, ?message_id, "published");
    }

    endpoint.unregister_subscriber(&subscriber).await;
    endpoint.disconnect().await?;
    endpoint.deactivate();

    info!(
        published = transport.published().len(),
        wire_calls = transport.wire_calls().len(),
        "Finished loopback_pubsub."
    );
    Ok(())
}
