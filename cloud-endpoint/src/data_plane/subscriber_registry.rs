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

//! Reference-counted subscriber registry keyed by topic filter.

use crate::control_plane::filter_locks::{FilterLocks, WireTurn};
use crate::data_plane::listener_identity::ListenerIdentity;
use crate::error::EndpointError;
use crate::listener::SubscriberListener;
use crate::message::{CloudMessage, QoS};
use crate::observability::{events, fields};
use crate::routing::topic_filter::TopicMatcher;
use futures::FutureExt;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

const COMPONENT: &str = "subscriber_registry";

type SubscriberHandle = ListenerIdentity<dyn SubscriberListener>;

struct SubscriptionEntry {
    listeners: Arc<Vec<SubscriberHandle>>,
    qos: QoS,
}

/// Read-only view of one live subscription entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscriptionInfo {
    pub filter: String,
    pub qos: QoS,
    pub listener_count: usize,
}

/// Outcome of a registration.
///
/// A registration that created its entry holds the filter's wire turn, so the caller
/// issues its `subscribe` before dropping it and no later transition of the same filter
/// reaches the transport first.
pub(crate) struct Registration<'a> {
    wire_turn: Option<WireTurn<'a>>,
}

impl Registration<'_> {
    pub(crate) fn is_new_filter(&self) -> bool {
        self.wire_turn.is_some()
    }
}

/// Bookkeeping of which listeners want which topic filters.
///
/// One entry exists per distinct filter string while at least one listener is registered
/// under it. The bookkeeping mutex is never held across a listener callback or a
/// transport call. Only a change of an entry's existence waits for the filter's wire turn.
pub(crate) struct ListenerRegistry {
    matcher: Arc<dyn TopicMatcher>,
    entries: Mutex<HashMap<String, SubscriptionEntry>>,
    wire_locks: FilterLocks,
}

impl ListenerRegistry {
    pub(crate) fn new(matcher: Arc<dyn TopicMatcher>) -> Self {
        Self {
            matcher,
            entries: Mutex::new(HashMap::new()),
            wire_locks: FilterLocks::new(),
        }
    }

    /// Appends `listener` under `filter`, creating the entry when the filter is unseen.
    pub(crate) async fn register(
        &self,
        filter: &str,
        qos: QoS,
        listener: Arc<dyn SubscriberListener>,
    ) -> Result<Registration<'_>, EndpointError> {
        if let Err(reason) = self.matcher.validate_filter(filter) {
            warn!(
                event = events::SUBSCRIBER_REGISTER_REJECTED,
                component = COMPONENT,
                filter,
                reason = %reason,
                "rejected malformed topic filter"
            );
            return Err(EndpointError::InvalidFilter {
                filter: filter.to_string(),
                reason,
            });
        }

        let appended = append_to(&mut *self.entries.lock().await, filter, &listener);
        let registration = if appended {
            Registration { wire_turn: None }
        } else {
            let wire_turn = self.wire_locks.lock(filter).await;
            let mut entries = self.entries.lock().await;
            if append_to(&mut entries, filter, &listener) {
                Registration { wire_turn: None }
            } else {
                entries.insert(
                    filter.to_string(),
                    SubscriptionEntry {
                        listeners: Arc::new(vec![ListenerIdentity::new(listener)]),
                        qos,
                    },
                );
                Registration {
                    wire_turn: Some(wire_turn),
                }
            }
        };

        debug!(
            event = events::SUBSCRIBER_REGISTER,
            component = COMPONENT,
            filter,
            qos = fields::format_qos(qos),
            is_new_filter = registration.is_new_filter(),
            "registered subscriber"
        );
        Ok(registration)
    }

    /// Filters under which `listener` is currently registered.
    pub(crate) async fn filters_of(&self, listener: &Arc<dyn SubscriberListener>) -> Vec<String> {
        self.entries
            .lock()
            .await
            .iter()
            .filter(|(_, entry)| entry.listeners.iter().any(|handle| handle.is(listener)))
            .map(|(filter, _)| filter.clone())
            .collect()
    }

    /// Removes `listener` from every entry it shares with other listeners.
    ///
    /// Returns the filters where `listener` is all that is left; each is handed to
    /// [`ListenerRegistry::retire`] so the emptying removal happens on the filter's wire
    /// turn.
    pub(crate) async fn unregister(&self, listener: &Arc<dyn SubscriberListener>) -> Vec<String> {
        let mut sole: Vec<String> = {
            let mut entries = self.entries.lock().await;
            entries
                .iter_mut()
                .filter(|(_, entry)| entry.listeners.iter().any(|handle| handle.is(listener)))
                .filter_map(|(filter, entry)| {
                    if entry.listeners.iter().all(|handle| handle.is(listener)) {
                        Some(filter.clone())
                    } else {
                        Arc::make_mut(&mut entry.listeners).retain(|handle| !handle.is(listener));
                        None
                    }
                })
                .collect()
        };
        sole.sort();

        debug!(
            event = events::SUBSCRIBER_UNREGISTER,
            component = COMPONENT,
            last_listener_of = sole.len(),
            "unregistered subscriber"
        );
        sole
    }

    /// Removes `listener` from `filter` on the filter's wire turn.
    ///
    /// Returns the held turn when the entry was emptied; the caller unsubscribes before
    /// dropping it.
    pub(crate) async fn retire(
        &self,
        filter: &str,
        listener: &Arc<dyn SubscriberListener>,
    ) -> Option<WireTurn<'_>> {
        let wire_turn = self.wire_locks.lock(filter).await;
        let emptied = remove_from(&mut *self.entries.lock().await, filter, listener);

        debug!(
            event = events::SUBSCRIBER_UNREGISTER,
            component = COMPONENT,
            filter,
            emptied,
            "retired last listener"
        );
        emptied.then_some(wire_turn)
    }

    /// Delivers `message` to every listener of every entry whose filter matches `topic`.
    ///
    /// Returns the number of listener invocations, panicked ones included.
    pub(crate) async fn dispatch(&self, topic: &str, message: Arc<CloudMessage>) -> usize {
        let matching: Vec<(String, Arc<Vec<SubscriberHandle>>)> = {
            let entries = self.entries.lock().await;
            entries
                .iter()
                .filter(|(filter, _)| self.matcher.matches(filter, topic))
                .map(|(filter, entry)| (filter.clone(), entry.listeners.clone()))
                .collect()
        };

        let mut deliveries = 0;
        for (filter, listeners) in matching {
            for handle in listeners.iter() {
                deliveries += 1;
                let delivery = handle.listener().on_message_arrived(message.clone());
                if let Err(payload) = AssertUnwindSafe(delivery).catch_unwind().await {
                    warn!(
                        event = events::LISTENER_PANICKED,
                        component = COMPONENT,
                        filter = %filter,
                        topic,
                        reason = fields::REASON_LISTENER_PANIC,
                        err = %fields::format_panic_payload(payload.as_ref()),
                        "subscriber listener panicked; continuing delivery"
                    );
                }
            }
        }

        debug!(
            event = events::MESSAGE_DISPATCHED,
            component = COMPONENT,
            topic,
            deliveries,
            "dispatched inbound message"
        );
        deliveries
    }

    pub(crate) async fn subscriptions(&self) -> Vec<SubscriptionInfo> {
        let mut subscriptions: Vec<SubscriptionInfo> = self
            .entries
            .lock()
            .await
            .iter()
            .map(|(filter, entry)| SubscriptionInfo {
                filter: filter.clone(),
                qos: entry.qos,
                listener_count: entry.listeners.len(),
            })
            .collect();
        subscriptions.sort_by(|left, right| left.filter.cmp(&right.filter));
        subscriptions
    }
}

/// Appends `listener` to a live entry; false when `filter` has none.
fn append_to(
    entries: &mut HashMap<String, SubscriptionEntry>,
    filter: &str,
    listener: &Arc<dyn SubscriberListener>,
) -> bool {
    match entries.get_mut(filter) {
        Some(entry) => {
            Arc::make_mut(&mut entry.listeners).push(ListenerIdentity::new(listener.clone()));
            true
        }
        None => false,
    }
}

/// Drops every occurrence of `listener` under `filter`; true iff the entry was removed.
fn remove_from(
    entries: &mut HashMap<String, SubscriptionEntry>,
    filter: &str,
    listener: &Arc<dyn SubscriberListener>,
) -> bool {
    let Some(entry) = entries.get_mut(filter) else {
        return false;
    };
    if !entry.listeners.iter().any(|handle| handle.is(listener)) {
        return false;
    }

    Arc::make_mut(&mut entry.listeners).retain(|handle| !handle.is(listener));
    if entry.listeners.is_empty() {
        entries.remove(filter);
        true
    } else {
        false
    }
}
