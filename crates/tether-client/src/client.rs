//! Remote graph client: thread lifecycle plus one-shot and streaming runs.

use crate::config::{ClientConfig, RunConfig};
use crate::error::ClientError;
use crate::sse::SseParser;
use crate::types::{GraphInput, Thread};
use futures::stream::{self, BoxStream, StreamExt};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};

/// Client for a remote graph execution service.
///
/// Owns the transport handle, the validated endpoint and the graph id.
/// Everything is read-only after construction, so a single client may be
/// shared across concurrent calls; each call owns its own request and
/// response state exclusively.
#[derive(Debug)]
pub struct RemoteGraphClient {
    client: Client,
    base_url: String,
    graph_id: String,
    headers: HeaderMap,
}

impl RemoteGraphClient {
    /// Build a client from explicit configuration.
    ///
    /// Fails with [`ClientError::Configuration`] before any network call
    /// when a required field is missing or a header cannot be represented.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let api_url = config.api_url.trim();
        if api_url.is_empty() {
            return Err(ClientError::Configuration("api_url is required".to_string()));
        }
        let graph_id = config.graph_id.trim();
        if graph_id.is_empty() {
            return Err(ClientError::Configuration("graph_id is required".to_string()));
        }

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ClientError::Configuration(format!("invalid header name {name:?}: {e}"))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                ClientError::Configuration(format!("invalid value for header {name:?}: {e}"))
            })?;
            headers.insert(header_name, header_value);
        }

        Ok(Self {
            client: Client::new(),
            base_url: api_url.trim_end_matches('/').to_string(),
            graph_id: graph_id.to_string(),
            headers,
        })
    }

    /// The graph this client runs.
    pub fn graph_id(&self) -> &str {
        &self.graph_id
    }

    /// Request a new conversation thread from the service.
    pub async fn create_thread(&self) -> Result<Thread, ClientError> {
        let url = format!("{}/threads", self.base_url);
        tracing::debug!(url = %url, "creating thread");

        // No graph execution is involved here, so a non-success status is a
        // transport failure, not a remote execution one.
        let response = self
            .client
            .post(url)
            .headers(self.headers.clone())
            .json(&json!({}))
            .send()
            .await?
            .error_for_status()?;

        let thread: Thread = response
            .json()
            .await
            .map_err(|e| ClientError::Malformed(format!("thread create response: {e}")))?;
        tracing::debug!(thread_id = thread.id(), "thread created");
        Ok(thread)
    }

    /// Fetch the raw thread record for an existing thread.
    pub async fn get_thread(&self, thread: &Thread) -> Result<Value, ClientError> {
        let url = format!("{}/threads/{}", self.base_url, thread.id());
        let response = self
            .client
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await?
            .error_for_status()?;
        response
            .json()
            .await
            .map_err(|e| ClientError::Malformed(format!("thread record: {e}")))
    }

    /// Delete a thread on the service.
    pub async fn delete_thread(&self, thread: &Thread) -> Result<(), ClientError> {
        let url = format!("{}/threads/{}", self.base_url, thread.id());
        self.client
            .delete(url)
            .headers(self.headers.clone())
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Run the graph to completion and return the terminal result.
    ///
    /// Suspends the calling task until the remote execution finishes, the
    /// per-call timeout expires, or the transport fails.
    pub async fn invoke(&self, input: &GraphInput, config: &RunConfig) -> Result<Value, ClientError> {
        let url = format!("{}/graphs/{}/invoke", self.base_url, self.graph_id);
        let body = self.run_body(input, config, false);
        tracing::debug!(url = %url, thread_id = config.thread_id(), "invoking graph");

        let exchange = async {
            let response = self
                .client
                .post(&url)
                .headers(self.headers.clone())
                .json(&body)
                .send()
                .await?;
            let response = check_status(response).await?;
            response
                .json::<Value>()
                .await
                .map_err(|e| ClientError::Malformed(format!("invoke result: {e}")))
        };

        match config.timeout() {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .map_err(|_| ClientError::Timeout(limit))?,
            None => exchange.await,
        }
    }

    /// Run the graph and stream its output incrementally.
    ///
    /// Returns a lazy, finite, non-restartable sequence of chunks in the
    /// exact order the service emits them; the shape of each chunk is
    /// determined by the configured stream mode and is not interpreted
    /// here. The sequence is pull-based: the next frame is not read from
    /// the connection until the previous chunk has been consumed. Dropping
    /// the stream before exhaustion releases the connection.
    pub async fn stream(
        &self,
        input: &GraphInput,
        config: &RunConfig,
    ) -> Result<BoxStream<'static, Result<Value, ClientError>>, ClientError> {
        let url = format!("{}/graphs/{}/stream", self.base_url, self.graph_id);
        let body = self.run_body(input, config, true);
        let deadline = config.timeout().map(|limit| (limit, Instant::now() + limit));
        tracing::debug!(
            url = %url,
            thread_id = config.thread_id(),
            mode = %config.stream_mode(),
            "streaming graph"
        );

        let connect = async {
            let response = self
                .client
                .post(&url)
                .headers(self.headers.clone())
                .json(&body)
                .send()
                .await?;
            check_status(response).await
        };
        let response = match deadline {
            Some((limit, at)) => timeout_at(at, connect)
                .await
                .map_err(|_| ClientError::Timeout(limit))??,
            None => connect.await?,
        };

        let state = StreamState {
            body: response.bytes_stream().boxed(),
            parser: SseParser::new(),
            pending: VecDeque::new(),
            deadline,
            done: false,
        };

        Ok(stream::unfold(state, |mut st| async move {
            loop {
                if let Some(item) = st.pending.pop_front() {
                    return Some((item, st));
                }
                if st.done {
                    return None;
                }

                let next = match st.deadline {
                    Some((limit, at)) => match timeout_at(at, st.body.next()).await {
                        Ok(next) => next,
                        Err(_) => {
                            st.done = true;
                            return Some((Err(ClientError::Timeout(limit)), st));
                        }
                    },
                    None => st.body.next().await,
                };

                match next {
                    Some(Ok(bytes)) => {
                        let text = String::from_utf8_lossy(&bytes);
                        for payload in st.parser.push(&text) {
                            match serde_json::from_str::<Value>(&payload) {
                                Ok(chunk) => {
                                    tracing::trace!(%chunk, "stream chunk");
                                    st.pending.push_back(Ok(chunk));
                                }
                                Err(e) => {
                                    st.pending.push_back(Err(ClientError::Malformed(format!(
                                        "stream frame: {e}"
                                    ))));
                                    st.done = true;
                                    break;
                                }
                            }
                        }
                    }
                    Some(Err(e)) => {
                        st.done = true;
                        return Some((Err(ClientError::Http(e)), st));
                    }
                    None => {
                        if st.parser.has_partial() {
                            tracing::debug!("connection closed mid-event, dropping partial frame");
                        }
                        tracing::debug!("stream complete");
                        st.done = true;
                        return None;
                    }
                }
            }
        })
        .boxed())
    }

    /// Build the JSON request body for a run.
    fn run_body(&self, input: &GraphInput, config: &RunConfig, streaming: bool) -> Value {
        let mut body = json!({
            "input": input,
            "config": config.to_wire(),
        });
        if streaming {
            body["stream_mode"] = json!(config.stream_mode());
        }
        body
    }
}

/// Per-stream state threaded through the chunk sequence.
struct StreamState<S> {
    body: S,
    parser: SseParser,
    pending: VecDeque<Result<Value, ClientError>>,
    deadline: Option<(Duration, Instant)>,
    done: bool,
}

/// Pass through a successful response, surface anything else as a remote
/// execution failure with the body carried verbatim.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let detail = response.text().await.unwrap_or_default();
    Err(ClientError::RemoteExecution {
        status: status.as_u16(),
        detail,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StreamMode;

    fn client() -> RemoteGraphClient {
        RemoteGraphClient::new(ClientConfig::new("http://localhost:2024", "article_writer"))
            .unwrap()
    }

    #[test]
    fn test_rejects_missing_api_url() {
        let err = RemoteGraphClient::new(ClientConfig::new("", "g")).unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
        assert!(err.to_string().contains("api_url"));
    }

    #[test]
    fn test_rejects_missing_graph_id() {
        let err = RemoteGraphClient::new(ClientConfig::new("http://localhost:2024", "  "))
            .unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
        assert!(err.to_string().contains("graph_id"));
    }

    #[test]
    fn test_rejects_invalid_header_name() {
        let config = ClientConfig::new("http://localhost:2024", "g")
            .with_header("bad header", "v");
        let err = RemoteGraphClient::new(config).unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[test]
    fn test_rejects_invalid_header_value() {
        let config = ClientConfig::new("http://localhost:2024", "g")
            .with_header("x-key", "line\nbreak");
        let err = RemoteGraphClient::new(config).unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[test]
    fn test_trims_trailing_slash() {
        let c = RemoteGraphClient::new(ClientConfig::new("http://localhost:2024/", "g")).unwrap();
        assert_eq!(c.base_url, "http://localhost:2024");
    }

    #[test]
    fn test_api_key_header_prepared() {
        let c = RemoteGraphClient::new(
            ClientConfig::new("http://localhost:2024", "g").with_api_key("super-secret-key"),
        )
        .unwrap();
        assert_eq!(
            c.headers.get("x-api-key").and_then(|v| v.to_str().ok()),
            Some("super-secret-key")
        );
    }

    #[test]
    fn test_run_body_invoke_shape() {
        let c = client();
        let thread = Thread::from_id("th-1");
        let config = RunConfig::new(&thread).with_model("gpt-4o");
        let input = GraphInput::from_user("ping");

        let body = c.run_body(&input, &config, false);
        assert_eq!(body["input"]["messages"][0]["role"], "user");
        assert_eq!(body["input"]["messages"][0]["content"], "ping");
        assert_eq!(body["config"]["configurable"]["thread_id"], "th-1");
        assert_eq!(body["config"]["configurable"]["model"], "gpt-4o");
        assert!(body.get("stream_mode").is_none());
    }

    #[test]
    fn test_run_body_stream_shape() {
        let c = client();
        let thread = Thread::from_id("th-1");
        let config = RunConfig::new(&thread).with_stream_mode(StreamMode::Messages);
        let input = GraphInput::from_user("ping");

        let body = c.run_body(&input, &config, true);
        assert_eq!(body["stream_mode"], "messages");
    }
}
