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

//! Configuration records and their atomically swapped snapshots.
//!
//! Options are built from a flat [`Properties`] map (the shape in which hosts deliver
//! configuration records), each key falling back to a declared default when absent or
//! mistyped. A record in effect is held by an [`OptionsSnapshot`] and replaced wholesale
//! on reconfiguration.

mod endpoint_options;
mod properties;
mod publisher_options;
mod snapshot;

pub use endpoint_options::EndpointOptions;
pub use properties::{FromProperty, Properties, PropertyValue};
pub use publisher_options::PublisherOptions;
pub use snapshot::{OptionsSnapshot, Versioned};
