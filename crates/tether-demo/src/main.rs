//! tether-demo: stream a remote graph from the terminal.
//!
//! Point it at a running graph service and it creates a thread, streams one
//! run in `updates` mode, and prints each chunk as a JSON line. Configured
//! entirely through the environment:
//!
//! - `TETHER_API_URL`  service base URL (default `http://localhost:2024`)
//! - `TETHER_API_KEY`  optional API key
//! - `TETHER_GRAPH_ID` graph to run (default `article_writer`)
//! - `TETHER_LOG`      tracing filter, e.g. `tether_client=debug`

use futures::StreamExt;
use tether_client::{ClientConfig, GraphInput, RemoteGraphClient, RunConfig, StreamMode};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(filter) = std::env::var("TETHER_LOG") {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let api_url =
        std::env::var("TETHER_API_URL").unwrap_or_else(|_| "http://localhost:2024".to_string());
    let graph_id =
        std::env::var("TETHER_GRAPH_ID").unwrap_or_else(|_| "article_writer".to_string());

    let mut config = ClientConfig::new(api_url, graph_id);
    if let Ok(key) = std::env::var("TETHER_API_KEY") {
        config = config.with_api_key(key);
    }
    let client = RemoteGraphClient::new(config)?;

    // Create a thread (or adopt an existing one with Thread::from_id).
    let thread = client.create_thread().await?;
    eprintln!("thread: {thread}");

    let input = GraphInput::from_user("Write an article about the latest trends in AI");
    let run = RunConfig::new(&thread).with_stream_mode(StreamMode::Updates);

    let mut chunks = client.stream(&input, &run).await?;
    while let Some(chunk) = chunks.next().await {
        println!("{}", serde_json::to_string(&chunk?)?);
    }

    Ok(())
}
