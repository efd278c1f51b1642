//! Remote PII detection over HTTP (Presidio service).
//!
//! The service exposes `POST /api/processar` taking `{ texto, language }` and
//! answering `{ textoOriginal, textoTarjado, dadosOcultados }`. Response keys
//! are matched case-insensitively.

use std::time::Duration;

use async_trait::async_trait;
use ouvidoria_core::DetectorConfig;
use reqwest::Client;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::types::{RedactionRequest, RedactionResult, RedactionSource};

const PROCESS_PATH: &str = "/api/processar";

/// Why a detector call did not produce a result.
#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Decode(String),
}

/// A detector that can redact text, or report that it is unavailable.
#[async_trait]
pub trait PiiDetector: Send + Sync {
    async fn detect(&self, text: &str) -> Result<RedactionResult, DetectorError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Client for the remote Presidio detector.
pub struct RemoteDetector {
    client: Client,
    endpoint: String,
    language: String,
    timeout: Duration,
}

impl RemoteDetector {
    pub fn new(config: &DetectorConfig) -> Result<Self, DetectorError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, config))
    }

    /// Use an existing client (shares its connection pool).
    pub fn with_client(client: Client, config: &DetectorConfig) -> Self {
        Self {
            client,
            endpoint: format!("{}{}", config.base_url.trim_end_matches('/'), PROCESS_PATH),
            language: config.language.clone(),
            timeout: config.timeout,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn classify(&self, err: reqwest::Error) -> DetectorError {
        if err.is_timeout() {
            DetectorError::Timeout(self.timeout)
        } else {
            DetectorError::Transport(err)
        }
    }
}

#[async_trait]
impl PiiDetector for RemoteDetector {
    async fn detect(&self, text: &str) -> Result<RedactionResult, DetectorError> {
        let request = RedactionRequest::new(text).with_language(self.language.clone());

        debug!("Posting {} bytes to {}", text.len(), self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            return Err(DetectorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        decode_response(text, &body)
    }

    fn name(&self) -> &'static str {
        "presidio"
    }
}

/// Decode a detector response body into a result for `original`.
pub fn decode_response(original: &str, body: &str) -> Result<RedactionResult, DetectorError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| DetectorError::Decode(e.to_string()))?;
    let fields = value
        .as_object()
        .ok_or_else(|| DetectorError::Decode("expected a JSON object".into()))?;

    let redacted = field(fields, "textoTarjado")
        .and_then(Value::as_str)
        .ok_or_else(|| DetectorError::Decode("missing string field textoTarjado".into()))?;
    let hidden = field(fields, "dadosOcultados")
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| {
            DetectorError::Decode("missing non-negative integer field dadosOcultados".into())
        })?;

    Ok(RedactionResult::new(
        original,
        redacted,
        hidden,
        RedactionSource::Remote,
    ))
}

fn field<'a>(fields: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    fields.get(name).or_else(|| {
        fields
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(base_url: &str) -> DetectorConfig {
        DetectorConfig {
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(2),
            ..DetectorConfig::default()
        }
    }

    #[test]
    fn test_decode_exact_keys() {
        let body = r#"{"textoOriginal":"x","textoTarjado":"[NOME OCULTO]","dadosOcultados":1}"#;
        let result = decode_response("João Silva", body).unwrap();
        assert_eq!(result.original_text, "João Silva");
        assert_eq!(result.redacted_text, "[NOME OCULTO]");
        assert_eq!(result.hidden_count, 1);
        assert_eq!(result.source, RedactionSource::Remote);
    }

    #[test]
    fn test_decode_case_insensitive_keys() {
        let body = r#"{"TextoTarjado":"ok","DADOSOCULTADOS":3}"#;
        let result = decode_response("orig", body).unwrap();
        assert_eq!(result.redacted_text, "ok");
        assert_eq!(result.hidden_count, 3);
    }

    #[test]
    fn test_decode_rejects_bad_shapes() {
        for body in [
            "not json",
            "[]",
            r#"{"textoTarjado":"ok"}"#,
            r#"{"textoTarjado":"ok","dadosOcultados":-1}"#,
            r#"{"textoTarjado":"ok","dadosOcultados":"2"}"#,
            r#"{"textoTarjado":null,"dadosOcultados":2}"#,
        ] {
            let err = decode_response("orig", body).unwrap_err();
            assert!(matches!(err, DetectorError::Decode(_)), "body {body:?}");
        }
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let detector = RemoteDetector::new(&config_for("http://presidio:8000/")).unwrap();
        assert_eq!(detector.endpoint(), "http://presidio:8000/api/processar");
    }

    #[tokio::test]
    async fn test_detect_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/processar"))
            .and(body_json(json!({ "texto": "Fale com Ana", "language": "pt" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "textoOriginal": "Fale com Ana",
                "textoTarjado": "Fale com [NOME]",
                "dadosOcultados": 1,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let detector = RemoteDetector::new(&config_for(&server.uri())).unwrap();
        let result = detector.detect("Fale com Ana").await.unwrap();
        assert_eq!(result.original_text, "Fale com Ana");
        assert_eq!(result.redacted_text, "Fale com [NOME]");
        assert_eq!(result.hidden_count, 1);
        assert_eq!(result.source, RedactionSource::Remote);
    }

    #[tokio::test]
    async fn test_detect_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/processar"))
            .respond_with(ResponseTemplate::new(503).set_body_string("loading model"))
            .mount(&server)
            .await;

        let detector = RemoteDetector::new(&config_for(&server.uri())).unwrap();
        let err = detector.detect("texto").await.unwrap_err();
        match err {
            DetectorError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "loading model");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_detect_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/processar"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let detector = RemoteDetector::new(&config_for(&server.uri())).unwrap();
        let err = detector.detect("texto").await.unwrap_err();
        assert!(matches!(err, DetectorError::Decode(_)));
    }

    #[tokio::test]
    async fn test_detect_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/processar"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(5))
                    .set_body_json(json!({ "textoTarjado": "x", "dadosOcultados": 0 })),
            )
            .mount(&server)
            .await;

        let config = DetectorConfig {
            timeout: Duration::from_millis(100),
            ..config_for(&server.uri())
        };
        let detector = RemoteDetector::new(&config).unwrap();
        let err = detector.detect("texto").await.unwrap_err();
        assert!(matches!(err, DetectorError::Timeout(_)), "got {err}");
    }

    #[tokio::test]
    async fn test_detect_connection_refused() {
        // Nothing listens on the discard port.
        let detector = RemoteDetector::new(&config_for("http://127.0.0.1:9")).unwrap();
        let err = detector.detect("texto").await.unwrap_err();
        assert!(matches!(err, DetectorError::Transport(_)));
    }
}
