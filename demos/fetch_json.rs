//! Fetch a URL and print the tagged JSON response.
//!
//! ```text
//! cargo run --example fetch_json -- https://httpbin.org/get key=value
//! ```

use anyhow::{bail, Context};
use rest_json::{JsonDict, JsonValue, RestClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut args = std::env::args().skip(1);
    let target = args.next().context("usage: fetch_json <url> [key=value ...]")?;

    let mut params = JsonDict::new();
    for pair in args {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("expected key=value, got {}", pair))?;
        params.insert(key.to_string(), JsonValue::from(value));
    }

    let client = RestClient::new();
    let Some(body) = client.get(&target, params).await else {
        if client.no_internet() {
            bail!("no internet connection");
        }
        bail!("request to {} failed", target);
    };

    println!("status: {}", body.tag().unwrap_or(-1));
    println!("{}", body);
    Ok(())
}
