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

//! Identity-based listener handles.

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// A registered listener compared by allocation identity, never by content.
///
/// Two handles are equal only when they wrap the same `Arc` allocation, so removing one
/// listener never touches another whose state happens to look the same.
pub(crate) struct ListenerIdentity<T: ?Sized> {
    listener: Arc<T>,
}

impl<T: ?Sized> ListenerIdentity<T> {
    pub(crate) fn new(listener: Arc<T>) -> Self {
        Self { listener }
    }

    pub(crate) fn listener(&self) -> &Arc<T> {
        &self.listener
    }

    pub(crate) fn is(&self, other: &Arc<T>) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.listener), Arc::as_ptr(other))
    }
}

impl<T: ?Sized> Clone for ListenerIdentity<T> {
    fn clone(&self) -> Self {
        Self {
            listener: self.listener.clone(),
        }
    }
}

impl<T: ?Sized> PartialEq for ListenerIdentity<T> {
    fn eq(&self, other: &Self) -> bool {
        self.is(&other.listener)
    }
}

impl<T: ?Sized> Eq for ListenerIdentity<T> {}

impl<T: ?Sized> Debug for ListenerIdentity<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerIdentity")
            .field("addr", &(Arc::as_ptr(&self.listener) as *const ()))
            .finish()
    }
}
