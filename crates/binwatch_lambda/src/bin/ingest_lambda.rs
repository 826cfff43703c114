use binwatch_core::contract::{IngestResponse, SensorEvent};
use binwatch_lambda::adapters::dynamodb::DynamoDbStatusStore;
use binwatch_lambda::handlers::ingest::handle_sensor_report;
use binwatch_lambda::runtime::{load_sdk_config, location_map_from_env, table_name_from_env};
use chrono::Utc;
use lambda_runtime::{service_fn, Error, LambdaEvent};

async fn handle_request(event: LambdaEvent<serde_json::Value>) -> Result<IngestResponse, Error> {
    let sensor_event: SensorEvent = serde_json::from_value(event.payload)
        .map_err(|error| Error::from(format!("invalid sensor event: {error}")))?;

    let locations = location_map_from_env()?;
    let sdk_config = load_sdk_config().await;
    let store = DynamoDbStatusStore::new(
        aws_sdk_dynamodb::Client::new(&sdk_config),
        table_name_from_env(),
    );

    Ok(handle_sensor_report(
        &sensor_event,
        &locations,
        Utc::now(),
        &store,
    ))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
