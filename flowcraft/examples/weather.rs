use flowcraft::join_all;
use flowcraft::prelude::*;
use serde_json::{json, Value};
use std::time::Duration;

const REQUEST: &str = "REQUEST";
const CREDENTIALS: &str = "CREDENTIALS_CHECK_RESULT";
const WEATHER: &str = "WEATHER_RESULT";
const RESPONSE: &str = "RESPONSE";

async fn check_credentials(request: Value) -> anyhow::Result<Value> {
    tokio::time::sleep(Duration::from_millis(20)).await;
    let valid = request["username"] == "bob" && request["password"] == "secret";
    Ok(json!({ "result": if valid { "ok" } else { "denied" } }))
}

async fn fetch_weather(request: Value) -> anyhow::Result<Value> {
    tokio::time::sleep(Duration::from_millis(50)).await;
    let postcode = request["postcode"].as_str().unwrap_or("unknown");
    Ok(json!({ "postcode": postcode, "temperature": "26F" }))
}

fn weather_flow() -> JsonFlow {
    let flows = JsonFlows::new();

    let authenticate = flows.flow_from("check credentials", REQUEST, CREDENTIALS, check_credentials);
    let credentials_valid = flows.condition_on(
        "credentials valid",
        CREDENTIALS,
        lift_predicate(|check: &Value| check["result"] == "ok"),
    );
    let lookup = flows.flow_from("fetch weather", REQUEST, WEATHER, fetch_weather);
    let format = flows.flow_from(
        "format weather",
        WEATHER,
        RESPONSE,
        lift(|weather: Value| {
            Ok(json!({
                "success": format!(
                    "It's {} in {} today",
                    weather["temperature"].as_str().unwrap_or("?"),
                    weather["postcode"].as_str().unwrap_or("?")
                )
            }))
        }),
    );
    let reject = flows.flow_from(
        "failure result",
        REQUEST,
        RESPONSE,
        lift(|request: Value| {
            Ok(json!({
                "failed": format!(
                    "Credentials for user {} invalid",
                    request["username"].as_str().unwrap_or("?")
                )
            }))
        }),
    );

    authenticate
        .then_if(credentials_valid, lookup.then(format))
        .otherwise(reject)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    Logger::init_tracing();

    println!("=== FlowCraft Weather Demo ===\n");

    let flow = weather_flow();
    println!("1. Flow structure:");
    println!("{flow}\n");

    println!("2. Concurrent requests:");
    let requests = [
        json!({ "username": "bob", "password": "secret", "postcode": "VB6 5UX" }),
        json!({ "username": "eve", "password": "guess", "postcode": "SE6 1AA" }),
    ];
    let logger = Logger::new();
    let visitor = logger.visitor(DefaultFlowVisitor);
    logger.info(&format!("dispatching {} weather requests", requests.len()));
    let runs = requests
        .into_iter()
        .map(|request| flow.run_with(JsonContext::with(REQUEST, request), &visitor));

    let responses = join_all(runs).await?;
    logger.info("all weather requests answered");

    for context in responses {
        println!("  {}", context.get(RESPONSE).cloned().unwrap_or(Value::Null));
    }

    println!("\n=== Demo Completed ===");
    Ok(())
}
