//! Client and per-call configuration.
//!
//! Both are explicit values handed to the client; there is no ambient
//! process-wide state. A [`ClientConfig`] is fixed at construction, and a
//! [`RunConfig`] is built per call and immutable once passed.

use crate::types::{StreamMode, Thread};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;

/// Header carrying the API key, attached to every request when configured.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Configuration for a [`crate::RemoteGraphClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the remote graph service, e.g. `http://localhost:2024`.
    pub api_url: String,
    /// Name/id of the remote graph to run.
    pub graph_id: String,
    /// Static headers attached to every request.
    pub headers: HashMap<String, String>,
}

impl ClientConfig {
    /// Create a new configuration for the given service URL and graph id.
    pub fn new(api_url: impl Into<String>, graph_id: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            graph_id: graph_id.into(),
            headers: HashMap::new(),
        }
    }

    /// Authenticate with an API key (sent as the `x-api-key` header).
    pub fn with_api_key(self, key: impl Into<String>) -> Self {
        self.with_header(API_KEY_HEADER, key)
    }

    /// Attach an arbitrary static header to every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Per-call runtime configuration for one `invoke` or `stream`.
///
/// The same type serves both call modes; `stream_mode` is ignored by
/// `invoke`. The thread handle is required up front, so a run can never
/// reference a thread that was not created (or adopted) first.
#[derive(Debug, Clone)]
pub struct RunConfig {
    thread_id: String,
    stream_mode: StreamMode,
    configurable: Map<String, Value>,
    timeout: Option<Duration>,
}

impl RunConfig {
    /// Build a run configuration bound to an existing thread.
    pub fn new(thread: &Thread) -> Self {
        Self {
            thread_id: thread.id().to_string(),
            stream_mode: StreamMode::Updates,
            configurable: Map::new(),
            timeout: None,
        }
    }

    /// Select the granularity of streaming output frames.
    pub fn with_stream_mode(mut self, mode: StreamMode) -> Self {
        self.stream_mode = mode;
        self
    }

    /// Select the backing model for this run.
    pub fn with_model(self, model: impl Into<String>) -> Self {
        self.with_configurable("model", Value::String(model.into()))
    }

    /// Override the system prompt for this run.
    pub fn with_system(self, system: impl Into<String>) -> Self {
        self.with_configurable("system", Value::String(system.into()))
    }

    /// Set an arbitrary `configurable` parameter.
    pub fn with_configurable(mut self, key: impl Into<String>, value: Value) -> Self {
        self.configurable.insert(key.into(), value);
        self
    }

    /// Fail the call with a timeout error if no result (or next frame)
    /// arrives within `timeout` of the call starting.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The thread this run is bound to.
    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    /// The configured stream mode.
    pub fn stream_mode(&self) -> StreamMode {
        self.stream_mode
    }

    /// The per-call deadline, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The `config` object sent in the request body:
    /// `{"configurable": {"thread_id": ..., <extra parameters>}}`.
    pub fn to_wire(&self) -> Value {
        let mut configurable = self.configurable.clone();
        configurable.insert(
            "thread_id".to_string(),
            Value::String(self.thread_id.clone()),
        );
        let mut config = Map::new();
        config.insert("configurable".to_string(), Value::Object(configurable));
        Value::Object(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_api_key_header() {
        let config = ClientConfig::new("http://localhost:2024", "article_writer")
            .with_api_key("super-secret-key");
        assert_eq!(
            config.headers.get(API_KEY_HEADER).map(String::as_str),
            Some("super-secret-key")
        );
    }

    #[test]
    fn test_client_config_custom_header() {
        let config = ClientConfig::new("http://localhost:2024", "g")
            .with_header("x-tenant", "acme");
        assert_eq!(config.headers.get("x-tenant").map(String::as_str), Some("acme"));
    }

    #[test]
    fn test_run_config_defaults() {
        let thread = Thread::from_id("th-1");
        let config = RunConfig::new(&thread);
        assert_eq!(config.thread_id(), "th-1");
        assert_eq!(config.stream_mode(), StreamMode::Updates);
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_run_config_wire_shape() {
        let thread = Thread::from_id("th-2");
        let config = RunConfig::new(&thread)
            .with_model("gpt-4o")
            .with_system("Be terse.");

        let wire = config.to_wire();
        assert_eq!(wire["configurable"]["thread_id"], "th-2");
        assert_eq!(wire["configurable"]["model"], "gpt-4o");
        assert_eq!(wire["configurable"]["system"], "Be terse.");
    }

    #[test]
    fn test_run_config_thread_id_wins_over_extra() {
        // A stray "thread_id" in the extras must not detach the run from
        // the thread the config was built for.
        let thread = Thread::from_id("th-real");
        let config = RunConfig::new(&thread)
            .with_configurable("thread_id", Value::String("th-fake".to_string()));
        assert_eq!(config.to_wire()["configurable"]["thread_id"], "th-real");
    }

    #[test]
    fn test_run_config_stream_mode_and_timeout() {
        let thread = Thread::from_id("th-3");
        let config = RunConfig::new(&thread)
            .with_stream_mode(StreamMode::Messages)
            .with_timeout(Duration::from_secs(30));
        assert_eq!(config.stream_mode(), StreamMode::Messages);
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
    }
}
