use crate::core::normalizer::{failure_envelope, normalize};
use crate::core::resources::{Branches, Clubs, Members};
use crate::core::transport::HttpTransport;
use crate::domain::model::Envelope;
use crate::domain::ports::{ApiRequest, ConfigProvider, HttpMethod, Transport};
use crate::utils::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// The single boundary between callers and the backend.
///
/// Every method resolves to an envelope: transport errors, error statuses and
/// undecodable bodies are all folded into `ok: false` here, once.
pub struct ApiClient<T: Transport = HttpTransport> {
    transport: T,
}

impl ApiClient<HttpTransport> {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        tracing::debug!("Backend base URL: {}", config.api_base_url());
        Ok(Self::new(HttpTransport::from_config(config)?))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Normalized body as an untyped JSON value.
    pub async fn send_raw(&self, request: ApiRequest) -> Value {
        normalize(self.transport.send(&request).await)
    }

    pub async fn request<R: DeserializeOwned>(&self, request: ApiRequest) -> Envelope<R> {
        Envelope::from_value(self.send_raw(request).await)
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Envelope<R> {
        self.request(ApiRequest::new(HttpMethod::Get, path)).await
    }

    pub async fn post<B, R>(&self, path: &str, body: &B) -> Envelope<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.with_body(HttpMethod::Post, path, body).await
    }

    pub async fn put<B, R>(&self, path: &str, body: &B) -> Envelope<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.with_body(HttpMethod::Put, path, body).await
    }

    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> Envelope<R> {
        self.request(ApiRequest::new(HttpMethod::Delete, path)).await
    }

    async fn with_body<B, R>(&self, method: HttpMethod, path: &str, body: &B) -> Envelope<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        match serde_json::to_value(body) {
            Ok(json) => {
                self.request(ApiRequest::new(method, path).with_body(json))
                    .await
            }
            Err(e) => {
                // Never left the client, so this is a request-construction failure.
                tracing::error!("Request error: {} {} ({})", method, path, e);
                Envelope::from_value(failure_envelope(&e.to_string()))
            }
        }
    }

    pub fn branches(&self) -> Branches<'_, T> {
        Branches::new(self)
    }

    pub fn clubs(&self) -> Clubs<'_, T> {
        Clubs::new(self)
    }

    pub fn members(&self) -> Members<'_, T> {
        Members::new(self)
    }
}
