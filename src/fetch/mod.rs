// src/fetch/mod.rs
//
// The round trip to the engine. The rest of the crate only sees `Transport`,
// so nothing outside this module depends on the wire text encoding.

pub mod encoding;
pub mod http;

pub use http::HttpTransport;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::tdl::RequestDocument;

/// One request document in, one complete reply out.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, document: &RequestDocument) -> Result<String, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn send(&self, document: &RequestDocument) -> Result<String, TransportError> {
        (**self).send(document).await
    }
}
