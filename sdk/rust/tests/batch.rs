mod common;

use std::collections::BTreeMap;

use broadcastt::dispatch::body_md5;
use broadcastt::{BatchEvent, BroadcasttError, Method, TransportError};
use serde_json::{json, Value};

use common::{client, parse_uri, signature_is_valid, signed_query_pattern, RecordingTransport, APP_ID};

fn batch() -> Vec<BatchEvent> {
    vec![
        BatchEvent::new("test-channel", "test-event").data(json!({"test-key": "test-val"})),
        BatchEvent::new("test-channel2", "test-event2").data(json!({"test-key": "test-val2"})),
    ]
}

#[tokio::test]
async fn test_can_trigger_batch() {
    let transport = RecordingTransport::new(200);
    let client = client(APP_ID, &transport);

    assert!(client.trigger_batch(&batch(), false).await.unwrap());

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);

    let request = &requests[0];
    let uri = parse_uri(request);
    assert_eq!(request.method, Method::Post);
    assert_eq!(uri.path(), "/apps/testid/events");
    assert_eq!(request.header("Content-Type"), Some("application/json"));

    let expected_body = concat!(
        r#"{"batch":["#,
        r#"{"channel":"test-channel","name":"test-event","data":"{\"test-key\":\"test-val\"}"},"#,
        r#"{"channel":"test-channel2","name":"test-event2","data":"{\"test-key\":\"test-val2\"}"}"#,
        r#"]}"#
    );
    assert_eq!(request.body.as_deref(), Some(expected_body));

    let query = uri.query().unwrap();
    assert!(signed_query_pattern(&format!("&body_md5={}", body_md5(expected_body))).is_match(query));
    assert!(signature_is_valid("POST", uri.path(), query));
}

#[tokio::test]
async fn test_events_is_an_alias() {
    let transport = RecordingTransport::new(200);
    let client = client(APP_ID, &transport);

    assert!(client.events(&batch(), false).await.unwrap());
    assert_eq!(parse_uri(&transport.requests()[0]).path(), "/apps/testid/events");
}

#[tokio::test]
async fn test_can_trigger_batch_with_socket_id_and_encoded_data() {
    let transport = RecordingTransport::new(200);
    let client = client(APP_ID, &transport);

    let batch = vec![BatchEvent::new("test-channel", "test-event")
        .data(r#"{"a":1}"#.to_string())
        .socket_id("1.1")];
    client.trigger_batch(&batch, true).await.unwrap();

    let body: Value =
        serde_json::from_str(transport.requests()[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(
        body,
        json!({"batch": [{"channel": "test-channel", "name": "test-event", "data": "{\"a\":1}", "socket_id": "1.1"}]})
    );
}

#[tokio::test]
async fn test_batch_read_from_json() {
    let transport = RecordingTransport::new(200);
    let client = client(APP_ID, &transport);

    let batch: Vec<BatchEvent> = serde_json::from_str(
        r#"[{"channel":"test-channel","name":"test-event","data":{"test-key":"test-val"}}]"#,
    )
    .unwrap();
    assert!(client.trigger_batch(&batch, false).await.unwrap());
}

#[tokio::test]
async fn test_batch_sends_explicit_null_data() {
    let transport = RecordingTransport::new(200);
    let client = client(APP_ID, &transport);

    let batch: Vec<BatchEvent> = serde_json::from_str(
        r#"[{"channel":"test-channel","name":"test-event","data":null}]"#,
    )
    .unwrap();
    assert!(client.trigger_batch(&batch, false).await.unwrap());

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].body.as_deref(),
        Some(r#"{"batch":[{"channel":"test-channel","name":"test-event","data":"null"}]}"#)
    );
}

#[tokio::test]
async fn test_can_not_trigger_batch_with_unencodable_data() {
    let transport = RecordingTransport::new(200);
    let client = client(APP_ID, &transport);

    let batch = vec![
        BatchEvent::new("test-channel", "test-event").data(BTreeMap::new()),
        BatchEvent::new("test-channel2", "test-event2")
            .data(BTreeMap::from([(vec![0xB1u8, 0x31], "test-val")])),
    ];

    match client.trigger_batch(&batch, false).await.unwrap_err() {
        BroadcasttError::JsonEncode { data, .. } => {
            assert_eq!(data, r#"{[177, 49]: "test-val"}"#);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_can_not_trigger_batch_with_invalid_channel() {
    for channel in common::invalid_channels() {
        let transport = RecordingTransport::new(200);
        let client = client(APP_ID, &transport);

        let batch = vec![BatchEvent::<Value>::new(channel, "test-event")];
        let err = client.trigger_batch(&batch, false).await.unwrap_err();

        assert!(matches!(err, BroadcasttError::InvalidChannelName(_)), "{:?}", channel);
        assert!(transport.requests().is_empty());
    }
}

#[tokio::test]
async fn test_can_not_trigger_batch_with_invalid_socket_id() {
    for socket_id in common::invalid_socket_ids() {
        let transport = RecordingTransport::new(200);
        let client = client(APP_ID, &transport);

        let batch = vec![BatchEvent::new("test-channel", "test-event")
            .data(json!("test-data"))
            .socket_id(socket_id)];
        let err = client.trigger_batch(&batch, false).await.unwrap_err();

        assert!(matches!(err, BroadcasttError::InvalidSocketId(_)), "{:?}", socket_id);
        assert!(transport.requests().is_empty());
    }
}

#[tokio::test]
async fn test_can_not_trigger_batch_without_data() {
    let transport = RecordingTransport::new(200);
    let client = client(APP_ID, &transport);

    let mut batch = batch();
    batch.push(BatchEvent::new("test-channel3", "test-event3"));

    let err = client.trigger_batch(&batch, false).await.unwrap_err();
    assert!(matches!(err, BroadcasttError::MissingEventData));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_batch_payload_too_large() {
    let transport = RecordingTransport::new(413);
    let client = client(APP_ID, &transport);

    let err = client.trigger_batch(&batch(), false).await.unwrap_err();
    assert!(matches!(
        err,
        BroadcasttError::Transport(TransportError::Status { status: 413, .. })
    ));

    let transport = RecordingTransport::new(413).http_errors(false);
    let client = common::client(APP_ID, &transport);
    assert!(!client.trigger_batch(&batch(), false).await.unwrap());
}
