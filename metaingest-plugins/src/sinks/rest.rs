//! REST sink: posts each change event to the metadata service.

use metaingest_core::error::SinkError;
use metaingest_core::metadata::MetadataChangeEvent;
use metaingest_core::sink::WriteCallback;
use metaingest_core::{
    ConfigError, PipelineContext, PluginClass, RecordEnvelope, Sink, SinkFactory, SinkReport,
    parse_plugin_config,
};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::time::Duration;
use tracing::debug;

pub const KEY: &str = "datahub-rest";

const INGEST_PATH: &str = "/entities?action=ingest";

fn default_timeout_sec() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RestSinkConfig {
    /// Base URL of the metadata service, e.g. `http://localhost:8080`.
    pub server: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_sec")]
    pub timeout_sec: u64,
}

pub struct RestSink {
    config: RestSinkConfig,
    client: Client,
    report: SinkReport,
}

impl RestSink {
    pub fn new(config: RestSinkConfig) -> Result<Self, SinkError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_sec))
            .build()
            .map_err(|e| SinkError::Request {
                url: config.server.clone(),
                message: e.to_string(),
            })?;
        Ok(Self {
            config,
            client,
            report: SinkReport::default(),
        })
    }

    fn url(&self) -> String {
        format!("{}{INGEST_PATH}", self.config.server.trim_end_matches('/'))
    }

    fn emit(&self, mce: &MetadataChangeEvent) -> Result<(), SinkError> {
        let url = self.url();
        let body = json!({ "entity": { "value": serde_json::to_value(&mce.proposed_snapshot)? } });

        let mut request = self
            .client
            .post(&url)
            .header("X-RestLi-Protocol-Version", "2.0.0")
            .json(&body);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|e| SinkError::Request {
            url: url.clone(),
            message: e.to_string(),
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Rejected {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        debug!(urn = mce.urn(), "Emitted change event");
        Ok(())
    }
}

impl Sink for RestSink {
    fn write_record_async(&mut self, envelope: RecordEnvelope, callback: Box<dyn WriteCallback>) {
        let outcome = match envelope.change_event() {
            Some(mce) => self.emit(mce),
            None => Err(SinkError::Unsupported {
                sink: KEY.to_string(),
                message: "only change events can be ingested over REST".to_string(),
            }),
        };
        match outcome {
            Ok(()) => {
                self.report.report_record_written();
                callback.on_success(&envelope, &Map::new());
            }
            Err(err) => {
                let mut metadata = Map::new();
                metadata.insert("url".to_string(), Value::String(self.url()));
                self.report.report_failure(err.to_string());
                callback.on_failure(&envelope, &err, &metadata);
            }
        }
    }

    fn get_report(&self) -> &SinkReport {
        &self.report
    }
}

#[derive(Debug, Default)]
pub struct RestSinkFactory;

impl PluginClass for RestSinkFactory {}

impl SinkFactory for RestSinkFactory {
    fn create(&self, config: &Value, _ctx: &PipelineContext) -> Result<Box<dyn Sink>, ConfigError> {
        let config: RestSinkConfig = parse_plugin_config(KEY, config)?;
        let sink = RestSink::new(config).map_err(|e| ConfigError::plugin(KEY, e))?;
        Ok(Box::new(sink))
    }
}
