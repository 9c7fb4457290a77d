//! Data types for the Broadcastt client.

use serde::{Deserialize, Deserializer, Serialize};

/// One or more channel names for a trigger call.
///
/// Built from a single name or any sequence of names:
///
/// ```
/// use broadcastt::Channels;
///
/// assert_eq!(Channels::from("orders").len(), 1);
/// assert_eq!(Channels::from(["orders", "invoices"]).len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Channels(Vec<String>);

impl Channels {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Channels {
    fn from(channel: &str) -> Self {
        Self(vec![channel.to_string()])
    }
}

impl From<String> for Channels {
    fn from(channel: String) -> Self {
        Self(vec![channel])
    }
}

impl From<Vec<String>> for Channels {
    fn from(channels: Vec<String>) -> Self {
        Self(channels)
    }
}

impl From<Vec<&str>> for Channels {
    fn from(channels: Vec<&str>) -> Self {
        Self(channels.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for Channels {
    fn from(channels: &[&str]) -> Self {
        Self(channels.iter().map(|s| s.to_string()).collect())
    }
}

impl From<&[String]> for Channels {
    fn from(channels: &[String]) -> Self {
        Self(channels.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for Channels {
    fn from(channels: [&str; N]) -> Self {
        Self(channels.iter().map(|s| s.to_string()).collect())
    }
}

/// Options for a trigger call.
#[derive(Debug, Clone, Default)]
pub struct TriggerOptions {
    /// Socket ID of a subscriber that should not receive the event.
    pub socket_id: Option<String>,
    /// `data` is already JSON text and is sent as-is (default: false).
    pub json_encoded: bool,
}

impl TriggerOptions {
    /// Create new trigger options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude the subscriber with this socket ID.
    pub fn socket_id(mut self, socket_id: impl Into<String>) -> Self {
        self.socket_id = Some(socket_id.into());
        self
    }

    /// Mark the data as already JSON encoded.
    pub fn json_encoded(mut self, json_encoded: bool) -> Self {
        self.json_encoded = json_encoded;
        self
    }
}

/// One event of a batch trigger.
///
/// Unlike a single trigger, every entry names its own channel. `data` is
/// `None` only when the field is missing; an explicit `null` is kept as data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEvent<T = serde_json::Value> {
    pub channel: String,
    pub name: String,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        bound(deserialize = "T: Deserialize<'de>")
    )]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket_id: Option<String>,
}

fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl<T> BatchEvent<T> {
    /// Create an entry without data; set it with [`data`](Self::data).
    pub fn new(channel: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            name: name.into(),
            data: None,
            socket_id: None,
        }
    }

    /// Set the event payload.
    pub fn data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    /// Exclude the subscriber with this socket ID.
    pub fn socket_id(mut self, socket_id: impl Into<String>) -> Self {
        self.socket_id = Some(socket_id.into());
        self
    }
}

// HTTP API types

#[derive(Debug, Serialize)]
pub(crate) struct TriggerRequest<'a> {
    pub name: &'a str,
    pub data: serde_json::Value,
    pub channels: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socket_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct BatchEntry<'a> {
    pub channel: &'a str,
    pub name: &'a str,
    pub data: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socket_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct BatchRequest<'a> {
    pub batch: Vec<BatchEntry<'a>>,
}

// Channel auth types

#[derive(Debug, Serialize)]
pub(crate) struct AuthResponse<'a> {
    pub auth: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_data: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PresenceData<'a, T: Serialize> {
    pub user_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_info: Option<&'a T>,
}
