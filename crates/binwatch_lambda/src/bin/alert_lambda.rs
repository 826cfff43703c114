use binwatch_core::contract::{AlertResponse, SensorEvent};
use binwatch_lambda::adapters::sns::SnsAlertPublisher;
use binwatch_lambda::handlers::alert::handle_flame_report;
use binwatch_lambda::runtime::{load_sdk_config, location_map_from_env, topic_arn_from_env};
use chrono::Utc;
use lambda_runtime::{service_fn, Error, LambdaEvent};

async fn handle_request(event: LambdaEvent<serde_json::Value>) -> Result<AlertResponse, Error> {
    let sensor_event: SensorEvent = serde_json::from_value(event.payload)
        .map_err(|error| Error::from(format!("invalid sensor event: {error}")))?;

    let locations = location_map_from_env()?;
    let topic_arn = topic_arn_from_env()?;
    let sdk_config = load_sdk_config().await;
    let publisher = SnsAlertPublisher::new(aws_sdk_sns::Client::new(&sdk_config), topic_arn);

    Ok(handle_flame_report(
        &sensor_event,
        &locations,
        Utc::now(),
        &publisher,
    ))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
