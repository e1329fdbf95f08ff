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

//! Topic-filter contract and the MQTT wildcard implementation of it.

use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};

const LEVEL_SEPARATOR: char = '/';
const SINGLE_LEVEL_WILDCARD: &str = "+";
const MULTI_LEVEL_WILDCARD: &str = "#";
const MAX_FILTER_LENGTH: usize = 65_535;

/// Reason a topic filter was rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FilterError {
    Empty,
    TooLong,
    NullCharacter,
    MisplacedMultiLevelWildcard,
    MisplacedSingleLevelWildcard,
}

impl Display for FilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::Empty => write!(f, "topic filter must not be empty"),
            FilterError::TooLong => {
                write!(f, "topic filter exceeds {} bytes", MAX_FILTER_LENGTH)
            }
            FilterError::NullCharacter => write!(f, "topic filter contains a null character"),
            FilterError::MisplacedMultiLevelWildcard => write!(
                f,
                "multi-level wildcard '#' must be the last level on its own"
            ),
            FilterError::MisplacedSingleLevelWildcard => {
                write!(f, "single-level wildcard '+' must occupy a whole level")
            }
        }
    }
}

impl Error for FilterError {}

/// Topic-filter syntax and matching rules used to route inbound messages.
pub trait TopicMatcher: Send + Sync {
    fn validate_filter(&self, filter: &str) -> Result<(), FilterError>;

    /// Whether `topic` falls under `filter`. `filter` is assumed to be valid.
    fn matches(&self, filter: &str, topic: &str) -> bool;
}

/// MQTT 3.1.1 topic-filter semantics: `+` matches one level, a trailing `#` matches the
/// parent level and everything below it, and topics starting with `$` are not matched by
/// a leading wildcard.
#[derive(Clone, Copy, Debug, Default)]
pub struct MqttTopicMatcher;

impl TopicMatcher for MqttTopicMatcher {
    fn validate_filter(&self, filter: &str) -> Result<(), FilterError> {
        if filter.is_empty() {
            return Err(FilterError::Empty);
        }
        if filter.len() > MAX_FILTER_LENGTH {
            return Err(FilterError::TooLong);
        }
        if filter.contains('\0') {
            return Err(FilterError::NullCharacter);
        }

        let mut levels = filter.split(LEVEL_SEPARATOR).peekable();
        while let Some(level) = levels.next() {
            if level.contains(MULTI_LEVEL_WILDCARD)
                && (level != MULTI_LEVEL_WILDCARD || levels.peek().is_some())
            {
                return Err(FilterError::MisplacedMultiLevelWildcard);
            }
            if level.contains(SINGLE_LEVEL_WILDCARD) && level != SINGLE_LEVEL_WILDCARD {
                return Err(FilterError::MisplacedSingleLevelWildcard);
            }
        }

        Ok(())
    }

    fn matches(&self, filter: &str, topic: &str) -> bool {
        if filter == topic {
            return true;
        }

        let mut filter_levels = filter.split(LEVEL_SEPARATOR);
        let mut topic_levels = topic.split(LEVEL_SEPARATOR).peekable();

        if topic.starts_with('$')
            && (filter.starts_with(SINGLE_LEVEL_WILDCARD)
                || filter.starts_with(MULTI_LEVEL_WILDCARD))
        {
            return false;
        }

        loop {
            let next_topic_level = topic_levels.peek().copied();
            match (filter_levels.next(), next_topic_level) {
                (Some(MULTI_LEVEL_WILDCARD), _) => return true,
                (Some(_), None) => return false,
                (Some(SINGLE_LEVEL_WILDCARD), Some(_)) => {
                    topic_levels.next();
                }
                (Some(filter_level), Some(topic_level)) => {
                    if filter_level != topic_level {
                        return false;
                    }
                    topic_levels.next();
                }
                (None, remaining) => return remaining.is_none(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FilterError, MqttTopicMatcher, TopicMatcher};

    #[test]
    fn validate_accepts_well_formed_filters() {
        let matcher = MqttTopicMatcher;

        for filter in [
            "sensors/+/temp",
            "alerts/#",
            "#",
            "+",
            "+/+/+",
            "iot-2/cmd/+/fmt/json",
            "a//b",
        ] {
            assert_eq!(matcher.validate_filter(filter), Ok(()), "filter {filter}");
        }
    }

    #[test]
    fn validate_rejects_misplaced_wildcards() {
        let matcher = MqttTopicMatcher;

        assert_eq!(matcher.validate_filter(""), Err(FilterError::Empty));
        assert_eq!(
            matcher.validate_filter("alerts/#/critical"),
            Err(FilterError::MisplacedMultiLevelWildcard)
        );
        assert_eq!(
            matcher.validate_filter("alerts#"),
            Err(FilterError::MisplacedMultiLevelWildcard)
        );
        assert_eq!(
            matcher.validate_filter("sensors/room+/temp"),
            Err(FilterError::MisplacedSingleLevelWildcard)
        );
        assert_eq!(
            matcher.validate_filter("bad\0filter"),
            Err(FilterError::NullCharacter)
        );
        assert_eq!(
            matcher.validate_filter(&"a".repeat(65_536)),
            Err(FilterError::TooLong)
        );
    }

    #[test]
    fn single_level_wildcard_matches_exactly_one_level() {
        let matcher = MqttTopicMatcher;

        assert!(matcher.matches("sensors/+/temp", "sensors/room1/temp"));
        assert!(!matcher.matches("sensors/+/temp", "sensors/room1/humidity"));
        assert!(!matcher.matches("sensors/+/temp", "sensors/temp"));
        assert!(!matcher.matches("sensors/+", "sensors/room1/temp"));
        assert!(matcher.matches("sensors/+", "sensors/"));
    }

    #[test]
    fn multi_level_wildcard_matches_parent_and_descendants() {
        let matcher = MqttTopicMatcher;

        assert!(matcher.matches("alerts/#", "alerts"));
        assert!(matcher.matches("alerts/#", "alerts/fire"));
        assert!(matcher.matches("alerts/#", "alerts/fire/floor/3"));
        assert!(!matcher.matches("alerts/#", "alert"));
        assert!(matcher.matches("#", "anything/at/all"));
        assert!(matcher.matches("+/b/#", "a/b/c/d"));
        assert!(!matcher.matches("+/b/#", "a/x/c/d"));
    }

    #[test]
    fn exact_filters_match_only_the_same_topic() {
        let matcher = MqttTopicMatcher;

        assert!(matcher.matches("a/b/c", "a/b/c"));
        assert!(!matcher.matches("a/b/c", "a/b"));
        assert!(!matcher.matches("a/b", "a/b/c"));
    }

    #[test]
    fn leading_wildcards_do_not_match_dollar_topics() {
        let matcher = MqttTopicMatcher;

        assert!(!matcher.matches("#", "$SYS/broker/uptime"));
        assert!(!matcher.matches("+/broker/uptime", "$SYS/broker/uptime"));
        assert!(matcher.matches("$SYS/#", "$SYS/broker/uptime"));
    }
}
