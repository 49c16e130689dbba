//! Ad-hoc authenticated requests against the CMS backend.

use anyhow::{Context, Result};
use clap::Args;
use reqwest::Method;
use serde_json::Value;
use shared::config::ClientConfig;

use super::GlobalArgs;

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// HTTP method (GET, POST, PUT, DELETE, ...)
    pub method: String,

    /// Path under the API base, e.g. /api/universities
    pub path: String,

    /// JSON request body
    #[arg(long, short)]
    pub data: Option<String>,
}

pub async fn send(global: &GlobalArgs, config: &ClientConfig, args: RequestArgs) -> Result<()> {
    let method = Method::from_bytes(args.method.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("invalid HTTP method `{}`", args.method))?;
    let body = args
        .data
        .as_deref()
        .map(|data| serde_json::from_str::<Value>(data))
        .transpose()
        .context("--data must be valid JSON")?;

    let api = global.gateway(config)?;
    let response = match api.send(method, &args.path, body.as_ref()).await {
        Ok(response) => response,
        Err(err) if err.is_unauthorized() => {
            return Err(anyhow::Error::new(err)
                .context("session expired or rejected; run `unicms login` to sign in again"));
        }
        Err(err) => return Err(err.into()),
    };

    let text = response
        .text()
        .await
        .context("failed to read response body")?;
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) if text.is_empty() => {}
        Err(_) => println!("{text}"),
    }
    Ok(())
}
