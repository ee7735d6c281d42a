//! HTTP client for the user/role REST service.
//!
//! [`Backend`] is the seam between the store and the service. [`HttpBackend`]
//! is the real implementation; tests substitute scripted backends.
//!
//! | Operation | Method | Path |
//! |---|---|---|
//! | list | GET | `/{collection}` |
//! | create | POST | `/{collection}` |
//! | update | PUT | `/{collection}/{id}` |
//! | delete | DELETE | `/{collection}/{id}` |

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;

use crate::config::ConsoleConfig;
use crate::error::ClientError;
use crate::models::{Entity, EntityId};

/// Remote collection operations, generic over the entity type.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetch the full collection.
    async fn list<E: Entity>(&self) -> Result<Vec<E>, ClientError>;

    async fn create<E: Entity>(&self, draft: &E::Draft) -> Result<E, ClientError>;

    async fn update<E: Entity>(&self, id: &EntityId, draft: &E::Draft) -> Result<E, ClientError>;

    async fn delete<E: Entity>(&self, id: &EntityId) -> Result<(), ClientError>;
}

#[async_trait]
impl<T: Backend> Backend for Arc<T> {
    async fn list<E: Entity>(&self) -> Result<Vec<E>, ClientError> {
        (**self).list::<E>().await
    }

    async fn create<E: Entity>(&self, draft: &E::Draft) -> Result<E, ClientError> {
        (**self).create::<E>(draft).await
    }

    async fn update<E: Entity>(&self, id: &EntityId, draft: &E::Draft) -> Result<E, ClientError> {
        (**self).update::<E>(id, draft).await
    }

    async fn delete<E: Entity>(&self, id: &EntityId) -> Result<(), ClientError> {
        (**self).delete::<E>(id).await
    }
}

/// reqwest-backed [`Backend`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    client: Client,
}

impl HttpBackend {
    /// Create a client from console configuration.
    pub fn new(config: &ConsoleConfig) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(config.base_url.clone()));
        }

        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { base_url, client })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(&ConsoleConfig::from_env())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve path segments against the base URL. Segments are percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> reqwest::RequestBuilder {
        let url = self.url(segments);
        tracing::debug!("{} {}", method, url.path());
        self.client.request(method, url)
    }

    /// Handle response, converting non-2xx statuses to ClientError.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(ClientError::Status { status, body })
        }
    }

    /// Handle response whose body is ignored (DELETE may answer 200 or 204).
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<(), ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ClientError::Status { status, body })
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list<E: Entity>(&self) -> Result<Vec<E>, ClientError> {
        let response = self
            .request(Method::GET, &[E::KIND.collection_path()])
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn create<E: Entity>(&self, draft: &E::Draft) -> Result<E, ClientError> {
        let response = self
            .request(Method::POST, &[E::KIND.collection_path()])
            .json(draft)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn update<E: Entity>(&self, id: &EntityId, draft: &E::Draft) -> Result<E, ClientError> {
        let id = id.to_string();
        let response = self
            .request(Method::PUT, &[E::KIND.collection_path(), &id])
            .json(draft)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn delete<E: Entity>(&self, id: &EntityId) -> Result<(), ClientError> {
        let id = id.to_string();
        let response = self
            .request(Method::DELETE, &[E::KIND.collection_path(), &id])
            .send()
            .await?;
        self.handle_empty_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(url: &str) -> HttpBackend {
        HttpBackend::new(&ConsoleConfig::default().with_base_url(url)).unwrap()
    }

    #[test]
    fn builds_collection_and_item_urls() {
        let backend = backend("http://localhost:3001");
        assert_eq!(
            backend.url(&["users"]).as_str(),
            "http://localhost:3001/users"
        );
        assert_eq!(
            backend.url(&["roles", "12"]).as_str(),
            "http://localhost:3001/roles/12"
        );
    }

    #[test]
    fn keeps_base_path_prefix() {
        let backend = backend("http://example.test/api/v1/");
        assert_eq!(
            backend.url(&["users", "3"]).as_str(),
            "http://example.test/api/v1/users/3"
        );
    }

    #[test]
    fn encodes_text_ids() {
        let backend = backend("http://localhost:3001");
        assert_eq!(
            backend.url(&["users", "a/b c"]).as_str(),
            "http://localhost:3001/users/a%2Fb%20c"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        let config = ConsoleConfig::default().with_base_url("not a url");
        assert!(matches!(
            HttpBackend::new(&config),
            Err(ClientError::InvalidUrl(_))
        ));

        let config = ConsoleConfig::default().with_base_url("mailto:admin@example.com");
        assert!(matches!(
            HttpBackend::new(&config),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
