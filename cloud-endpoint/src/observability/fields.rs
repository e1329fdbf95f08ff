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

//! Canonical structured field values and value-format helpers.

use crate::message::{MessageId, QoS};

pub const NONE: &str = "none";
pub const REASON_NO_TRANSPORT: &str = "no_transport_bound";
pub const REASON_LISTENER_PANIC: &str = "listener_panic";

pub fn format_message_id(message_id: Option<MessageId>) -> String {
    message_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| NONE.to_string())
}

pub fn format_qos(qos: QoS) -> u8 {
    qos.level()
}

/// Renders a panic payload captured by `catch_unwind` for a log field.
pub fn format_panic_payload(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{format_message_id, format_panic_payload, NONE};
    use crate::message::MessageId;

    #[test]
    fn format_message_id_returns_decimal_when_present() {
        assert_eq!(format_message_id(Some(MessageId::new(42))), "42");
    }

    #[test]
    fn format_message_id_returns_none_when_absent() {
        assert_eq!(format_message_id(None), NONE);
    }

    #[test]
    fn format_panic_payload_handles_static_and_owned_strings() {
        let borrowed: Box<dyn std::any::Any + Send> = Box::new("boom");
        let owned: Box<dyn std::any::Any + Send> = Box::new(String::from("owned boom"));
        let other: Box<dyn std::any::Any + Send> = Box::new(7_u32);

        assert_eq!(format_panic_payload(borrowed.as_ref()), "boom");
        assert_eq!(format_panic_payload(owned.as_ref()), "owned boom");
        assert_eq!(
            format_panic_payload(other.as_ref()),
            "non-string panic payload"
        );
    }
}
