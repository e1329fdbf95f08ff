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

//! Versioned options snapshot replaced atomically on reconfiguration.

use arc_swap::ArcSwap;
use std::ops::Deref;
use std::sync::Arc;

/// One immutable options record tagged with the version it was installed as.
#[derive(Debug)]
pub struct Versioned<T> {
    version: u64,
    options: Arc<T>,
}

impl<T> Versioned<T> {
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn options(&self) -> &T {
        &self.options
    }
}

impl<T> Deref for Versioned<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.options
    }
}

/// Holder of the options record currently in effect.
///
/// Readers get an `Arc` to one complete record; a concurrent [`OptionsSnapshot::replace`]
/// never exposes a mix of old and new fields, and versions are installed in the order
/// they are handed out.
pub struct OptionsSnapshot<T> {
    current: ArcSwap<Versioned<T>>,
}

impl<T> OptionsSnapshot<T> {
    pub fn new(options: T) -> Self {
        Self {
            current: ArcSwap::from_pointee(Versioned {
                version: 0,
                options: Arc::new(options),
            }),
        }
    }

    pub fn load(&self) -> Arc<Versioned<T>> {
        self.current.load_full()
    }

    /// Installs `options` as the record in effect and returns its version.
    pub fn replace(&self, options: T) -> u64 {
        let options = Arc::new(options);
        let previous = self.current.rcu(|current| Versioned {
            version: current.version + 1,
            options: options.clone(),
        });
        previous.version + 1
    }

    pub fn version(&self) -> u64 {
        self.current.load().version
    }
}
