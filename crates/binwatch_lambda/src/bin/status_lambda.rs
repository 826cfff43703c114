use binwatch_lambda::adapters::dynamodb::DynamoDbStatusStore;
use binwatch_lambda::handlers::http::ApiGatewayResponse;
use binwatch_lambda::handlers::status::handle_status_request;
use binwatch_lambda::runtime::{load_sdk_config, table_name_from_env};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

async fn handle_request(event: LambdaEvent<Value>) -> Result<ApiGatewayResponse, Error> {
    let sdk_config = load_sdk_config().await;
    let store = DynamoDbStatusStore::new(
        aws_sdk_dynamodb::Client::new(&sdk_config),
        table_name_from_env(),
    );

    Ok(handle_status_request(&event.payload, &store))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
