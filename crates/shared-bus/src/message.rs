//! # Bus Messages
//!
//! The envelope every payload travels in, and the filter subscribers use
//! to pick the topics they care about.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A message as published on the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusMessage {
    /// Topic the message was published to.
    pub topic: String,
    /// Partitioning key. Messages sharing a key keep their relative order.
    pub key: String,
    /// JSON payload.
    pub payload: serde_json::Value,
    /// Bus-wide sequence number assigned at publish time.
    pub offset: u64,
    /// Wall-clock publish time.
    pub published_at: DateTime<Utc>,
}

impl BusMessage {
    /// Decode the payload into a typed record.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.payload)
    }
}

/// Filter for subscribing to specific topics on behalf of a consumer group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<String>,
    /// Consumer group the subscription belongs to.
    pub group_id: String,
}

impl TopicFilter {
    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics<I, S>(group_id: impl Into<String>, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            topics: topics.into_iter().map(Into::into).collect(),
            group_id: group_id.into(),
        }
    }

    /// Create a filter for a single topic.
    #[must_use]
    pub fn topic(group_id: impl Into<String>, topic: impl Into<String>) -> Self {
        Self::topics(group_id, [topic.into()])
    }

    /// Create a filter that accepts all topics.
    #[must_use]
    pub fn all(group_id: impl Into<String>) -> Self {
        Self {
            topics: Vec::new(),
            group_id: group_id.into(),
        }
    }

    /// Check if a message matches this filter.
    #[must_use]
    pub fn matches(&self, message: &BusMessage) -> bool {
        self.topics.is_empty() || self.topics.iter().any(|t| *t == message.topic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(topic: &str) -> BusMessage {
        BusMessage {
            topic: topic.to_string(),
            key: "k".to_string(),
            payload: json!({ "n": 1 }),
            offset: 0,
            published_at: Utc::now(),
        }
    }

    #[test]
    fn test_filter_all_matches_everything() {
        let filter = TopicFilter::all("g");
        assert!(filter.matches(&message("a")));
        assert!(filter.matches(&message("b")));
    }

    #[test]
    fn test_filter_topics() {
        let filter = TopicFilter::topics("g", ["a", "c"]);
        assert!(filter.matches(&message("a")));
        assert!(!filter.matches(&message("b")));
        assert!(filter.matches(&message("c")));
    }

    #[test]
    fn test_decode_payload() {
        #[derive(Deserialize)]
        struct N {
            n: u32,
        }

        let decoded: N = message("a").decode().unwrap();
        assert_eq!(decoded.n, 1);
        assert!(message("a").decode::<Vec<u8>>().is_err());
    }
}
