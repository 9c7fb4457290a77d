//! Example: Issue private and presence channel auth tokens

use broadcastt::Broadcastt;
use serde_json::json;

fn main() -> broadcastt::Result<()> {
    let client = Broadcastt::from_env()?;

    // Socket ID as sent by the subscriber's auth request
    let socket_id = "1234.5678";

    let token = client.private_auth("private-orders", socket_id, None)?;
    println!("private:  {}", token);

    let info = json!({"name": "Ada Lovelace"});
    let token = client.presence_auth("presence-lobby", socket_id, "user-42", Some(&info))?;
    println!("presence: {}", token);

    Ok(())
}
