//! Private and presence channel authentication tokens.
//!
//! A subscriber asks the app server for a token before joining a restricted
//! channel. The token is `app_key:hex(HMAC-SHA256(secret, message))` where the
//! message is `socket_id:channel`, followed by `:channel_data` when custom data
//! is attached. `channel_data` is signed byte for byte, so presence data is
//! serialized exactly once and reused for both the message and the response.

use serde::Serialize;
use serde_json::Value;

use crate::dispatch::encode_json;
use crate::error::Result;
use crate::signer::Signer;
use crate::types::{AuthResponse, PresenceData};
use crate::validation::{validate_channel, validate_socket_id};

/// Build the JSON auth response for a private channel.
///
/// `custom_data`, when present and non-empty, is signed and echoed back as
/// `channel_data`.
///
/// # Example
///
/// ```
/// use broadcastt::{auth, Signer};
///
/// let signer = Signer::new("testkey", "testsecret");
/// let token = auth::private_auth(&signer, "test-channel", "1.1", None).unwrap();
///
/// assert_eq!(
///     token,
///     r#"{"auth":"testkey:67b492396edbe136bed8a131fd3c5ba7c28316a0a93c083973ecf69ceb2b474b"}"#
/// );
/// ```
pub fn private_auth(
    signer: &Signer,
    channel: &str,
    socket_id: &str,
    custom_data: Option<&str>,
) -> Result<String> {
    validate_channel(channel)?;
    validate_socket_id(Some(socket_id))?;

    let custom_data = custom_data.filter(|data| !data.is_empty());

    let message = match custom_data {
        Some(data) => format!("{}:{}:{}", socket_id, channel, data),
        None => format!("{}:{}", socket_id, channel),
    };

    let response = AuthResponse {
        auth: format!("{}:{}", signer.app_key(), signer.sign(&message)),
        channel_data: custom_data,
    };

    encode_json(&response)
}

/// Build the JSON auth response for a presence channel.
///
/// The channel data is `{"user_id":..,"user_info":..}`; `user_info` is left
/// out when it is `None` or serializes to a blank value (`null`, `false`,
/// `0`, `""`, `[]` or `{}`).
pub fn presence_auth<T>(
    signer: &Signer,
    channel: &str,
    socket_id: &str,
    user_id: &str,
    user_info: Option<&T>,
) -> Result<String>
where
    T: Serialize + std::fmt::Debug,
{
    let user_info = user_info.filter(|info| !is_blank(*info));
    let channel_data = encode_json(&PresenceData { user_id, user_info })?;

    private_auth(signer, channel, socket_id, Some(&channel_data))
}

fn is_blank<T: Serialize>(value: &T) -> bool {
    match serde_json::to_value(value) {
        Ok(Value::Null) | Ok(Value::Bool(false)) => true,
        Ok(Value::Number(n)) => n.as_f64() == Some(0.0),
        Ok(Value::String(s)) => s.is_empty(),
        Ok(Value::Array(items)) => items.is_empty(),
        Ok(Value::Object(map)) => map.is_empty(),
        _ => false,
    }
}
