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

//! Local mirror of the shared session's connection state.

use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU8, Ordering};

/// Connection state of the session as last observed by the endpoint.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
}

impl ConnectionState {
    const fn to_raw(self) -> u8 {
        match self {
            ConnectionState::Disconnected => 0,
            ConnectionState::Connecting => 1,
            ConnectionState::Connected => 2,
            ConnectionState::Disconnecting => 3,
        }
    }

    const fn from_raw(raw: u8) -> Self {
        match raw {
            1 => ConnectionState::Connecting,
            2 => ConnectionState::Connected,
            3 => ConnectionState::Disconnecting,
            _ => ConnectionState::Disconnected,
        }
    }
}

impl Display for ConnectionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnecting => "disconnecting",
        };
        f.write_str(label)
    }
}

/// Lock-free holder of the current [`ConnectionState`].
pub(crate) struct ConnectionStateMirror {
    state: AtomicU8,
}

impl ConnectionStateMirror {
    pub(crate) fn new() -> Self {
        Self {
            state: AtomicU8::new(ConnectionState::Disconnected.to_raw()),
        }
    }

    pub(crate) fn load(&self) -> ConnectionState {
        ConnectionState::from_raw(self.state.load(Ordering::Acquire))
    }

    /// Installs `next` and returns the state it replaced.
    pub(crate) fn store(&self, next: ConnectionState) -> ConnectionState {
        ConnectionState::from_raw(self.state.swap(next.to_raw(), Ordering::AcqRel))
    }

    /// Moves to `next` only while the state is still `expected`.
    pub(crate) fn transition(&self, expected: ConnectionState, next: ConnectionState) -> bool {
        self.state
            .compare_exchange(
                expected.to_raw(),
                next.to_raw(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::{ConnectionState, ConnectionStateMirror};

    #[test]
    fn starts_disconnected() {
        assert_eq!(
            ConnectionStateMirror::new().load(),
            ConnectionState::Disconnected
        );
    }

    #[test]
    fn store_returns_previous_state() {
        let mirror = ConnectionStateMirror::new();

        assert_eq!(
            mirror.store(ConnectionState::Connecting),
            ConnectionState::Disconnected
        );
        assert_eq!(
            mirror.store(ConnectionState::Connected),
            ConnectionState::Connecting
        );
        assert_eq!(mirror.load(), ConnectionState::Connected);
    }

    #[test]
    fn transition_requires_expected_state() {
        let mirror = ConnectionStateMirror::new();

        assert!(!mirror.transition(ConnectionState::Connected, ConnectionState::Disconnecting));
        assert!(mirror.transition(ConnectionState::Disconnected, ConnectionState::Connecting));
        assert_eq!(mirror.load(), ConnectionState::Connecting);
    }

    #[test]
    fn display_uses_lowercase_labels() {
        assert_eq!(ConnectionState::Disconnecting.to_string(), "disconnecting");
    }
}
