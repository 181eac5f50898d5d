//! Stdout-sink [`Publisher`]
//!
//! Stands in for the downstream pub/sub topic in local runs: prints the
//! published envelope to stdout and returns a synthetic message id. There is
//! no queue here, so nothing actually retries a failed publish; this sink
//! never fails.

use async_trait::async_trait;
use uuid::Uuid;

use wsn_core::errors::Result;
use wsn_core::ports::Publisher;

pub struct StdoutPublisher;

#[async_trait]
impl Publisher for StdoutPublisher {
    async fn publish(&self, topic_id: &str, bytes: &[u8]) -> Result<String> {
        let message_id = Uuid::now_v7().to_string();
        let body = String::from_utf8_lossy(bytes);
        println!("[publish] topic={topic_id} message_id={message_id} body={body}");
        Ok(message_id)
    }
}
