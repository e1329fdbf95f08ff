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

//! Flat, loosely typed property maps.

use crate::error::EndpointError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single configuration or message property value.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Boolean(bool),
    Integer(i64),
    String(String),
}

impl PropertyValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Boolean(_) => "boolean",
            PropertyValue::Integer(_) => "integer",
            PropertyValue::String(_) => "string",
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Boolean(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Integer(i64::from(value))
    }
}

impl From<u8> for PropertyValue {
    fn from(value: u8) -> Self {
        PropertyValue::Integer(i64::from(value))
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

/// Conversion from a [`PropertyValue`] into a concrete Rust type.
pub trait FromProperty: Sized {
    /// Human-readable type name reported when a value does not convert.
    const EXPECTED: &'static str;

    fn from_property(value: &PropertyValue) -> Option<Self>;
}

impl FromProperty for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_property(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }
}

impl FromProperty for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_property(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Integer(value) => Some(*value),
            _ => None,
        }
    }
}

impl FromProperty for String {
    const EXPECTED: &'static str = "string";

    fn from_property(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::String(value) => Some(value.clone()),
            _ => None,
        }
    }
}

/// String-keyed property map used for configuration records and message metadata.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Properties(HashMap<String, PropertyValue>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON5 object of scalar values, as written in configuration files.
    pub fn from_json5(text: &str) -> Result<Self, EndpointError> {
        json5::from_str(text).map_err(|err| EndpointError::InvalidConfiguration {
            reason: err.to_string(),
        })
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the value under `key`, or `default` when it is absent or of another type.
    pub fn get_or<T: FromProperty>(&self, key: &str, default: T) -> T {
        self.get(key)
            .and_then(T::from_property)
            .unwrap_or(default)
    }

    /// Strict lookup: absent keys yield `None`, mistyped values are an error.
    pub fn get_typed<T: FromProperty>(&self, key: &str) -> Result<Option<T>, EndpointError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => T::from_property(value).map(Some).ok_or_else(|| {
                EndpointError::InvalidPropertyType {
                    key: key.to_string(),
                    expected: T::EXPECTED,
                    found: value.type_name(),
                }
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Properties, PropertyValue};
    use crate::error::EndpointError;

    #[test]
    fn get_or_falls_back_on_absent_or_mistyped_values() {
        let properties = Properties::new()
            .with("publish.device.info", "yes")
            .with("qos", 1);

        assert!(properties.get_or("publish.device.info", true));
        assert_eq!(properties.get_or("qos", 0_i64), 1);
        assert_eq!(properties.get_or("missing", 9_i64), 9);
    }

    #[test]
    fn get_typed_reports_expected_type_for_mistyped_values() {
        let properties = Properties::new().with("RETAIN", "true");

        match properties.get_typed::<bool>("RETAIN") {
            Err(EndpointError::InvalidPropertyType {
                key,
                expected,
                found,
            }) => {
                assert_eq!(key, "RETAIN");
                assert_eq!(expected, "boolean");
                assert_eq!(found, "string");
            }
            other => panic!("expected InvalidPropertyType, got {other:?}"),
        }
        assert_eq!(properties.get_typed::<i64>("QOS").unwrap(), None);
    }

    #[test]
    fn from_json5_reads_scalar_values() {
        let properties = Properties::from_json5(
            r#"{
                // endpoint record
                "kura.service.pid": "org.eclipse.kura.cloud.watson.mqtt.WatsonCloudEndpoint",
                "disconnect.timeout.seconds": 5,
                retain: false,
            }"#,
        )
        .expect("valid json5 properties");

        assert_eq!(properties.len(), 3);
        assert_eq!(
            properties.get("disconnect.timeout.seconds"),
            Some(&PropertyValue::Integer(5))
        );
        assert_eq!(
            properties.get("retain"),
            Some(&PropertyValue::Boolean(false))
        );
    }

    #[test]
    fn from_json5_rejects_nested_values() {
        let result = Properties::from_json5(r#"{ "topic": { "nested": true } }"#);

        assert!(matches!(
            result,
            Err(EndpointError::InvalidConfiguration { .. })
        ));
    }
}
