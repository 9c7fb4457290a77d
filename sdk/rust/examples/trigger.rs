//! Example: Trigger events on Broadcastt

use broadcastt::{BatchEvent, Broadcastt, TriggerOptions};
use serde_json::json;

#[tokio::main]
async fn main() -> broadcastt::Result<()> {
    // Create client from BROADCASTT_URL environment variable
    let client = Broadcastt::from_env()?;

    // Single channel
    let delivered = client
        .trigger(
            "orders",
            "order.created",
            &json!({
                "order_id": "ord_123",
                "customer": "john@example.com",
                "total": 99.99
            }),
        )
        .await?;
    println!("order.created delivered: {}", delivered);

    // Several channels, skipping the socket that caused the event
    let delivered = client
        .trigger_with_options(
            ["orders", "dashboard"],
            "order.paid",
            &json!({"order_id": "ord_123"}),
            TriggerOptions::new().socket_id("1234.5678"),
        )
        .await?;
    println!("order.paid delivered: {}", delivered);

    // Batch
    let batch = vec![
        BatchEvent::new("orders", "order.shipped").data(json!({"order_id": "ord_123"})),
        BatchEvent::new("dashboard", "stats.updated").data(json!({"shipped": 1})),
    ];
    let delivered = client.trigger_batch(&batch, false).await?;
    println!("batch delivered: {}", delivered);

    Ok(())
}
