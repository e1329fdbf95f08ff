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

//! Error taxonomy surfaced by the endpoint and its collaborators.

use crate::routing::topic_filter::FilterError;
use crate::transport::TransportError;
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Failures of endpoint and publisher operations.
///
/// Caller-input errors (`InvalidFilter`, `MissingRequiredProperty`, `InvalidPropertyType`)
/// are always returned. `SubscribeFailed` and `UnsubscribeFailed` describe wire-level
/// failures that the endpoint logs and absorbs.
#[derive(Debug)]
pub enum EndpointError {
    InvalidFilter { filter: String, reason: FilterError },
    MissingRequiredProperty { key: String },
    InvalidPropertyType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
    InvalidConfiguration { reason: String },
    TransportUnavailable,
    ConnectFailed(TransportError),
    DisconnectFailed(TransportError),
    PublishFailed(TransportError),
    SubscribeFailed { filter: String, cause: TransportError },
    UnsubscribeFailed { filter: String, cause: TransportError },
}

impl Display for EndpointError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            EndpointError::InvalidFilter { filter, reason } => {
                write!(f, "Invalid topic filter '{}': {}", filter, reason)
            }
            EndpointError::MissingRequiredProperty { key } => {
                write!(f, "Failed to extract required {} property", key)
            }
            EndpointError::InvalidPropertyType {
                key,
                expected,
                found,
            } => write!(
                f,
                "Property {} must be of type {}, found {}",
                key, expected, found
            ),
            EndpointError::InvalidConfiguration { reason } => {
                write!(f, "Invalid configuration properties: {}", reason)
            }
            EndpointError::TransportUnavailable => {
                write!(f, "No transport session is bound to the endpoint")
            }
            EndpointError::ConnectFailed(cause) => write!(f, "Failed to connect: {}", cause),
            EndpointError::DisconnectFailed(cause) => {
                write!(f, "Failed to disconnect: {}", cause)
            }
            EndpointError::PublishFailed(cause) => write!(f, "Failed to publish: {}", cause),
            EndpointError::SubscribeFailed { filter, cause } => {
                write!(f, "Failed to subscribe to '{}': {}", filter, cause)
            }
            EndpointError::UnsubscribeFailed { filter, cause } => {
                write!(f, "Failed to unsubscribe from '{}': {}", filter, cause)
            }
        }
    }
}

impl Error for EndpointError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EndpointError::InvalidFilter { reason, .. } => Some(reason),
            EndpointError::ConnectFailed(cause)
            | EndpointError::DisconnectFailed(cause)
            | EndpointError::PublishFailed(cause)
            | EndpointError::SubscribeFailed { cause, .. }
            | EndpointError::UnsubscribeFailed { cause, .. } => Some(cause),
            _ => None,
        }
    }
}
