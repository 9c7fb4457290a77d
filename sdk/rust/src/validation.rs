//! Channel, socket ID and host validation.
//!
//! All checks run before a request is built; nothing reaches the transport
//! unless it passed here.

use crate::error::{BroadcasttError, Result};

/// Maximum number of channels a single trigger call may target.
pub const MAX_CHANNELS: usize = 100;

fn is_channel_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '=' | '@' | ',' | '.' | ';')
}

/// Validate a channel name against `^[-a-zA-Z0-9_=@,.;]+$`.
///
/// # Example
///
/// ```
/// use broadcastt::validation::validate_channel;
///
/// assert!(validate_channel("private-orders").is_ok());
/// assert!(validate_channel("orders:created").is_err());
/// ```
pub fn validate_channel(channel: &str) -> Result<()> {
    if channel.is_empty() || !channel.chars().all(is_channel_char) {
        return Err(BroadcasttError::InvalidChannelName(channel.to_string()));
    }

    Ok(())
}

/// Validate the size of a channel list and every name in it.
pub fn validate_channels<S: AsRef<str>>(channels: &[S]) -> Result<()> {
    if channels.len() > MAX_CHANNELS {
        return Err(BroadcasttError::TooManyChannels {
            count: channels.len(),
            max: MAX_CHANNELS,
        });
    }

    channels
        .iter()
        .try_for_each(|channel| validate_channel(channel.as_ref()))
}

/// Validate an optional socket ID against `^\d+\.\d+$`.
///
/// `None` is always accepted.
pub fn validate_socket_id(socket_id: Option<&str>) -> Result<()> {
    let Some(socket_id) = socket_id else {
        return Ok(());
    };

    let valid = match socket_id.split_once('.') {
        Some((whole, fraction)) => is_digits(whole) && is_digits(fraction),
        None => false,
    };

    if !valid {
        return Err(BroadcasttError::InvalidSocketId(socket_id.to_string()));
    }

    Ok(())
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Reject hosts that embed a scheme.
pub fn validate_host(host: &str) -> Result<()> {
    if host.starts_with("http://") || host.starts_with("https://") {
        return Err(BroadcasttError::InvalidHost(host.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INVALID_CHANNELS: &[&str] = &[
        "test-channel:",
        ":test-channel",
        "test-channel\n:",
        ":\ntest-channel",
        "",
        "test channel",
        "test-channel\n",
    ];

    const INVALID_SOCKET_IDS: &[&str] = &[
        "1.",
        ".1",
        "1.1:",
        ":1.1",
        "1.1\n:",
        ":\n1.1",
        "",
        "1",
        "1.1.1",
        "a.1",
        "1.1\n",
    ];

    #[test]
    fn test_valid_channels() {
        assert!(validate_channel("test-channel").is_ok());
        assert!(validate_channel("-azAZ9_=@,.;").is_ok());
        assert!(validate_channel("presence-room@42").is_ok());
    }

    #[test]
    fn test_invalid_channels() {
        for channel in INVALID_CHANNELS {
            assert!(
                matches!(
                    validate_channel(channel),
                    Err(BroadcasttError::InvalidChannelName(_))
                ),
                "expected {:?} to be rejected",
                channel
            );
        }
    }

    #[test]
    fn test_hundred_channels_pass() {
        let channels: Vec<String> = (0..MAX_CHANNELS).map(|i| format!("test-channel{}", i)).collect();
        assert!(validate_channels(&channels).is_ok());
        assert!(validate_channels(&channels[..1]).is_ok());
    }

    #[test]
    fn test_too_many_channels_regardless_of_content() {
        let valid: Vec<String> = (0..=MAX_CHANNELS).map(|i| format!("ch{}", i)).collect();
        let invalid: Vec<&str> = vec!["bad:channel"; MAX_CHANNELS + 1];

        for channels in [
            valid.iter().map(String::as_str).collect::<Vec<_>>(),
            invalid,
        ] {
            assert!(matches!(
                validate_channels(&channels),
                Err(BroadcasttError::TooManyChannels { count: 101, max: 100 })
            ));
        }
    }

    #[test]
    fn test_channel_list_with_invalid_entry() {
        assert!(matches!(
            validate_channels(&["test-channel", "test-channel:"]),
            Err(BroadcasttError::InvalidChannelName(name)) if name == "test-channel:"
        ));
    }

    #[test]
    fn test_socket_ids() {
        assert!(validate_socket_id(None).is_ok());
        assert!(validate_socket_id(Some("1.1")).is_ok());
        assert!(validate_socket_id(Some("98765.12345678")).is_ok());

        for socket_id in INVALID_SOCKET_IDS {
            assert!(
                matches!(
                    validate_socket_id(Some(socket_id)),
                    Err(BroadcasttError::InvalidSocketId(_))
                ),
                "expected {:?} to be rejected",
                socket_id
            );
        }
    }

    #[test]
    fn test_host_prefix() {
        assert!(validate_host("eu.broadcastt.xyz").is_ok());
        assert!(validate_host("localhost").is_ok());
        assert!(validate_host("httpbin.org").is_ok());
        assert!(matches!(
            validate_host("http://eu.broadcastt.xyz"),
            Err(BroadcasttError::InvalidHost(_))
        ));
        assert!(matches!(
            validate_host("https://eu.broadcastt.xyz"),
            Err(BroadcasttError::InvalidHost(_))
        ));
    }
}
