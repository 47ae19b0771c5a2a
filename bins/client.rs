//! Command-line client for the explore RPC service

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::{json, Value};
use tracing::{error, info};

/// Deadline forwarded to the server with every call
const CALL_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Function {
    #[value(name = "ListLikedYou")]
    ListLikedYou,
    #[value(name = "ListNewLikedYou")]
    ListNewLikedYou,
    #[value(name = "CountLikedYou")]
    CountLikedYou,
    #[value(name = "PutDecision")]
    PutDecision,
}

impl Function {
    fn method(self) -> &'static str {
        match self {
            Function::ListLikedYou => "ListLikedYou",
            Function::ListNewLikedYou => "ListNewLikedYou",
            Function::CountLikedYou => "CountLikedYou",
            Function::PutDecision => "PutDecision",
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "explore-client")]
#[command(about = "Call one ExploreService RPC and print the response", long_about = None)]
struct Cli {
    #[arg(long, value_enum)]
    function: Function,
    #[arg(long, default_value = "1")]
    actor: String,
    #[arg(long, default_value = "1")]
    recipient: String,
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    like: bool,
    /// Pagination token for the list calls
    #[arg(long, default_value = "1")]
    page: String,
    #[arg(long, default_value = "http://127.0.0.1:9000")]
    addr: String,
}

fn request_body(cli: &Cli) -> Value {
    match cli.function {
        Function::ListLikedYou | Function::ListNewLikedYou => json!({
            "recipientUserId": cli.recipient,
            "paginationToken": cli.page,
        }),
        Function::CountLikedYou => json!({ "recipientUserId": cli.recipient }),
        Function::PutDecision => json!({
            "actorUserId": cli.actor,
            "recipientUserId": cli.recipient,
            "likedRecipient": cli.like,
        }),
    }
}

async fn call(cli: &Cli) -> Result<Value> {
    let url = format!("{}/explore.ExploreService/{}", cli.addr.trim_end_matches('/'), cli.function.method());
    let client = reqwest::Client::builder().timeout(CALL_TIMEOUT).build()?;
    let resp = client
        .post(&url)
        .header("x-request-timeout-ms", CALL_TIMEOUT.as_millis().to_string())
        .json(&request_body(cli))
        .send()
        .await
        .with_context(|| format!("request to {url} failed"))?;
    let status = resp.status();
    let body: Value = resp.json().await.context("response is not JSON")?;
    if !status.is_success() {
        bail!("{} returned {status}: {body}", cli.function.method());
    }
    Ok(body)
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging_default();
    let cli = Cli::parse();

    match call(&cli).await {
        Ok(body) => {
            info!(function = cli.function.method(), "call succeeded");
            println!("{}", serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string()));
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            error!(function = cli.function.method(), error = %e, "call failed");
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_decision_body_uses_rpc_field_names() {
        let cli = Cli::parse_from(["explore-client", "--function", "PutDecision", "--actor", "2", "--like", "false"]);
        assert_eq!(
            request_body(&cli),
            json!({"actorUserId": "2", "recipientUserId": "1", "likedRecipient": false})
        );
    }

    #[test]
    fn list_body_carries_page_token() {
        let cli = Cli::parse_from(["explore-client", "--function", "ListNewLikedYou", "--page", "3"]);
        assert_eq!(request_body(&cli), json!({"recipientUserId": "1", "paginationToken": "3"}));
    }
}
