//! SNS-backed implementation of the alert topic adapter.

use crate::adapters::alert_topic::AlertPublisher;

#[derive(Debug, Clone)]
pub struct SnsAlertPublisher {
    topic_arn: String,
    client: aws_sdk_sns::Client,
}

impl SnsAlertPublisher {
    pub fn new(client: aws_sdk_sns::Client, topic_arn: impl Into<String>) -> Self {
        Self {
            topic_arn: topic_arn.into(),
            client,
        }
    }
}

impl AlertPublisher for SnsAlertPublisher {
    fn publish_alert(&self, subject: &str, body: &str) -> Result<String, String> {
        let topic_arn = self.topic_arn.clone();
        let subject = subject.to_string();
        let body = body.to_string();
        let client = self.client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .publish()
                    .topic_arn(topic_arn)
                    .subject(subject)
                    .message(body)
                    .send()
                    .await
                    .map(|output| output.message_id().unwrap_or_default().to_string())
                    .map_err(|error| format!("failed to publish alert to sns: {error}"))
            })
        })
    }
}
