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

//! Identity-based connection and delivery listener sets.

use crate::data_plane::listener_identity::ListenerIdentity;
use crate::listener::{ConnectionListener, DeliveryListener};
use crate::message::MessageId;
use crate::observability::{events, fields};
use arc_swap::ArcSwap;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::warn;

const COMPONENT: &str = "event_broadcaster";

type ListenerSet<T> = ArcSwap<Vec<ListenerIdentity<T>>>;

fn add_to_set<T: ?Sized>(set: &ListenerSet<T>, listener: &Arc<T>) -> bool {
    let mut added = false;
    set.rcu(|current| {
        added = !current.iter().any(|handle| handle.is(listener));
        if !added {
            return Arc::clone(current);
        }
        let mut next = Vec::clone(current);
        next.push(ListenerIdentity::new(listener.clone()));
        Arc::new(next)
    });
    added
}

fn remove_from_set<T: ?Sized>(set: &ListenerSet<T>, listener: &Arc<T>) -> bool {
    let mut removed = false;
    set.rcu(|current| {
        removed = current.iter().any(|handle| handle.is(listener));
        if !removed {
            return Arc::clone(current);
        }
        Arc::new(
            current
                .iter()
                .filter(|handle| !handle.is(listener))
                .cloned()
                .collect::<Vec<_>>(),
        )
    });
    removed
}

async fn isolate(callback: BoxFuture<'_, ()>, callback_name: &'static str) {
    if let Err(payload) = AssertUnwindSafe(callback).catch_unwind().await {
        warn!(
            event = events::LISTENER_PANICKED,
            component = COMPONENT,
            callback = callback_name,
            reason = fields::REASON_LISTENER_PANIC,
            err = %fields::format_panic_payload(payload.as_ref()),
            "listener panicked; continuing broadcast"
        );
    }
}

/// Fan-out of session lifecycle and delivery-confirmation events.
///
/// Each set is replaced copy-on-write, so a broadcast walks the snapshot it loaded:
/// listeners added meanwhile are not called by it and removals cannot disturb it.
pub(crate) struct ConnectionEventBroadcaster {
    connection_listeners: ListenerSet<dyn ConnectionListener>,
    delivery_listeners: ListenerSet<dyn DeliveryListener>,
}

impl ConnectionEventBroadcaster {
    pub(crate) fn new() -> Self {
        Self {
            connection_listeners: ArcSwap::from_pointee(Vec::new()),
            delivery_listeners: ArcSwap::from_pointee(Vec::new()),
        }
    }

    pub(crate) fn add_connection_listener(&self, listener: &Arc<dyn ConnectionListener>) -> bool {
        add_to_set(&self.connection_listeners, listener)
    }

    pub(crate) fn remove_connection_listener(
        &self,
        listener: &Arc<dyn ConnectionListener>,
    ) -> bool {
        remove_from_set(&self.connection_listeners, listener)
    }

    pub(crate) fn add_delivery_listener(&self, listener: &Arc<dyn DeliveryListener>) -> bool {
        add_to_set(&self.delivery_listeners, listener)
    }

    pub(crate) fn remove_delivery_listener(&self, listener: &Arc<dyn DeliveryListener>) -> bool {
        remove_from_set(&self.delivery_listeners, listener)
    }

    pub(crate) async fn broadcast_established(&self) {
        let listeners = self.connection_listeners.load_full();
        for handle in listeners.iter() {
            isolate(
                handle.listener().on_connection_established(),
                "on_connection_established",
            )
            .await;
        }
    }

    pub(crate) async fn broadcast_lost(&self) {
        let listeners = self.connection_listeners.load_full();
        for handle in listeners.iter() {
            isolate(handle.listener().on_connection_lost(), "on_connection_lost").await;
        }
    }

    pub(crate) async fn broadcast_disconnected(&self) {
        let listeners = self.connection_listeners.load_full();
        for handle in listeners.iter() {
            isolate(handle.listener().on_disconnected(), "on_disconnected").await;
        }
    }

    pub(crate) async fn broadcast_delivery_confirmed(&self, message_id: MessageId) {
        let listeners = self.delivery_listeners.load_full();
        for handle in listeners.iter() {
            isolate(
                handle.listener().on_message_confirmed(message_id),
                "on_message_confirmed",
            )
            .await;
        }
    }
}
