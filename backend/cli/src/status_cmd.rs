//! CLI Status Command
//!
//! Queries the health endpoint of a running relay.

use anyhow::{Context, Result};
use std::time::Duration;

use crate::terminal_output::note_error;

/// Default URL probed when `--url` is omitted.
pub fn default_url(port: u16) -> String {
    format!("http://localhost:{port}/")
}

pub async fn run(url: &str) -> Result<bool> {
    println!("\n📊 linedrive status ({url})\n");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .context("Failed to build HTTP client")?;

    match client.get(url).send().await {
        Ok(resp) => {
            let status = resp.status();
            let body: serde_json::Value = resp
                .json()
                .await
                .context("Health endpoint did not return JSON")?;
            println!("HTTP {status}");
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(status.is_success() && body["ok"] == true)
        }
        Err(e) => {
            note_error(&format!("linedrive is not reachable at {url}: {e}"));
            Ok(false)
        }
    }
}
