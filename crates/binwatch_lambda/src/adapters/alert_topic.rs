/// Notification topic the flame alerts are published to. Returns the
/// broker-assigned message id on success.
pub trait AlertPublisher {
    fn publish_alert(&self, subject: &str, body: &str) -> Result<String, String>;
}
