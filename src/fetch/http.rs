// src/fetch/http.rs

use async_trait::async_trait;
use reqwest::{header, Client};
use tracing::{debug, error, instrument, trace};
use url::Url;

use super::encoding::{decode_utf16le, encode_utf16le};
use super::Transport;
use crate::error::{ConfigError, TransportError};
use crate::tdl::RequestDocument;

const CONTENT_TYPE: &str = "text/xml;charset=utf-16";

/// Posts request documents to the engine's HTTP listener as UTF-16LE XML.
/// Content-Length is set by reqwest from the encoded body.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(client: Client, server: &str, port: u16) -> Result<Self, ConfigError> {
        let endpoint = Url::parse(&format!("http://{server}:{port}/"))
            .map_err(|e| ConfigError::InvalidEndpoint(format!("{server}:{port}: {e}")))?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(level = "debug", skip(self, document), fields(endpoint = %self.endpoint))]
    async fn send(&self, document: &RequestDocument) -> Result<String, TransportError> {
        let body = encode_utf16le(document.as_str());
        debug!(bytes = body.len(), "posting request");

        let resp = self
            .client
            .post(self.endpoint.clone())
            .header(header::CONTENT_TYPE, CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "request error");
                TransportError::Request(e)
            })?;

        let status = resp.status();
        if !status.is_success() {
            error!(%status, "engine rejected request");
            return Err(TransportError::Status(status));
        }

        let bytes = resp.bytes().await?;
        let reply = decode_utf16le(&bytes);
        debug!(bytes = bytes.len(), "received reply");
        trace!(%reply, "reply document");
        Ok(reply)
    }
}
