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

//! Per-filter async locks that order wire-level calls for one topic filter.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as SyncMutex, PoisonError};
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Orders subscribe/unsubscribe calls for one topic filter with the bookkeeping
/// transitions that caused them.
///
/// Locks are keyed by the exact filter string and exist only while some caller holds or
/// waits for them. They guard no data of their own, and distinct filters never wait for
/// each other.
pub(crate) struct FilterLocks {
    locks: SyncMutex<HashMap<String, Arc<Mutex<()>>>>,
}

/// A held filter lock: the filter's wire turn.
pub(crate) struct WireTurn<'a> {
    owner: &'a FilterLocks,
    filter: String,
    lock: Arc<Mutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl FilterLocks {
    pub(crate) fn new() -> Self {
        Self {
            locks: SyncMutex::new(HashMap::new()),
        }
    }

    pub(crate) async fn lock(&self, filter: &str) -> WireTurn<'_> {
        let lock = self
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(filter.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = lock.clone().lock_owned().await;

        WireTurn {
            owner: self,
            filter: filter.to_string(),
            lock,
            guard: Some(guard),
        }
    }

    /// Number of filters with a held or awaited lock.
    pub(crate) fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Drop for WireTurn<'_> {
    fn drop(&mut self) {
        let mut locks = self
            .owner
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        drop(self.guard.take());
        // the map and this turn; anyone else waiting cloned under the map lock
        if Arc::strong_count(&self.lock) == 2 {
            locks.remove(&self.filter);
        }
    }
}
