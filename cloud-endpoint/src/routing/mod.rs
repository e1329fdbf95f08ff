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

//! Topic-filter routing policy.
//!
//! ```
//! use cloud_endpoint::{MqttTopicMatcher, TopicMatcher};
//!
//! let matcher = MqttTopicMatcher;
//! assert!(matcher.validate_filter("sensors/+/temp").is_ok());
//! assert!(matcher.matches("sensors/+/temp", "sensors/room1/temp"));
//! assert!(!matcher.matches("sensors/+/temp", "sensors/room1/humidity"));
//! ```

pub(crate) mod topic_filter;
