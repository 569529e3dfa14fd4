use crate::{Client, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Input for [`Client::send_message`].
///
/// <https://docs.aws.amazon.com/AWSSimpleQueueService/latest/APIReference/API_SendMessage.html>
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendMessage {
    /// The queue to deliver to.
    pub queue_url: String,
    /// Message payload, 1 byte to 256 KiB of text.
    pub message_body: String,
    /// Delay before the message becomes visible, 0..=900 seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_seconds: Option<u32>,
    /// Deduplication id; FIFO queues only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_deduplication_id: Option<String>,
    /// Ordering group; FIFO queues only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_group_id: Option<String>,
}

impl SendMessage {
    /// Create a send request with just a queue and a body.
    pub fn new(queue_url: impl Into<String>, message_body: impl Into<String>) -> Self {
        Self {
            queue_url: queue_url.into(),
            message_body: message_body.into(),
            delay_seconds: None,
            message_deduplication_id: None,
            message_group_id: None,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.queue_url.is_empty() {
            return Err(Error::InvalidRequest("queue_url must not be empty".into()));
        }
        if self.message_body.is_empty() {
            return Err(Error::InvalidRequest(
                "message_body must not be empty".into(),
            ));
        }
        if let Some(delay) = self.delay_seconds {
            if delay > 900 {
                return Err(Error::InvalidRequest(format!(
                    "delay_seconds {delay} is outside 0..=900"
                )));
            }
        }
        Ok(())
    }
}

/// Output of [`Client::send_message`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendMessageOutput {
    /// Id the service assigned to the message.
    pub message_id: String,
    /// Digest of the delivered body.
    #[serde(rename = "MD5OfMessageBody")]
    pub md5_of_message_body: Option<String>,
    /// Position within the group; FIFO queues only.
    pub sequence_number: Option<String>,
}

/// Input for [`Client::receive_message`].
///
/// <https://docs.aws.amazon.com/AWSSimpleQueueService/latest/APIReference/API_ReceiveMessage.html>
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReceiveMessage {
    /// The queue to read from.
    pub queue_url: String,
    /// How many messages to receive at most, 1..=10.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_number_of_messages: Option<u32>,
    /// How long received messages stay hidden from other consumers,
    /// 0..=43200 seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility_timeout: Option<u32>,
    /// Long-poll duration, 0..=20 seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_time_seconds: Option<u32>,
}

impl ReceiveMessage {
    /// Create a receive request for a queue.
    pub fn new(queue_url: impl Into<String>) -> Self {
        Self {
            queue_url: queue_url.into(),
            max_number_of_messages: None,
            visibility_timeout: None,
            wait_time_seconds: None,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.queue_url.is_empty() {
            return Err(Error::InvalidRequest("queue_url must not be empty".into()));
        }
        if let Some(max) = self.max_number_of_messages {
            if !(1..=10).contains(&max) {
                return Err(Error::InvalidRequest(format!(
                    "max_number_of_messages {max} is outside 1..=10"
                )));
            }
        }
        if let Some(wait) = self.wait_time_seconds {
            if wait > 20 {
                return Err(Error::InvalidRequest(format!(
                    "wait_time_seconds {wait} is outside 0..=20"
                )));
            }
        }
        Ok(())
    }
}

/// One received message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Message {
    /// Id the service assigned to the message.
    pub message_id: String,
    /// Handle required to delete or extend this delivery.
    pub receipt_handle: String,
    /// Message payload.
    pub body: String,
    /// Digest of the payload.
    #[serde(rename = "MD5OfBody")]
    pub md5_of_body: Option<String>,
    /// System attributes such as `SentTimestamp`.
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

/// Output of [`Client::receive_message`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReceiveMessageOutput {
    /// Up to the requested number of messages; empty when the queue had
    /// nothing to deliver.
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct DeleteMessage<'a> {
    queue_url: &'a str,
    receipt_handle: &'a str,
}

// Successful DeleteMessage replies carry an empty JSON document.
#[derive(Debug, Deserialize)]
struct Empty {}

impl Client {
    /// Deliver a message to a queue.
    pub async fn send_message(&self, input: &SendMessage) -> Result<SendMessageOutput> {
        input.validate()?;
        self.execute("AmazonSQS.SendMessage", input).await
    }

    /// Receive up to ten messages from a queue.
    ///
    /// Received messages stay on the queue until deleted via
    /// [`delete_message`](Client::delete_message) with their receipt
    /// handle.
    pub async fn receive_message(&self, input: &ReceiveMessage) -> Result<ReceiveMessageOutput> {
        input.validate()?;
        self.execute("AmazonSQS.ReceiveMessage", input).await
    }

    /// Delete a previously received message.
    pub async fn delete_message(&self, queue_url: &str, receipt_handle: &str) -> Result<()> {
        if queue_url.is_empty() || receipt_handle.is_empty() {
            return Err(Error::InvalidRequest(
                "queue_url and receipt_handle must not be empty".into(),
            ));
        }
        let _: Empty = self
            .execute(
                "AmazonSQS.DeleteMessage",
                &DeleteMessage {
                    queue_url,
                    receipt_handle,
                },
            )
            .await?;
        Ok(())
    }
}
