use hyper::header::CONTENT_TYPE;
use log::{debug, error};
use mime::APPLICATION_JSON;
use reqwest_middleware::{
    self,
    reqwest::{Method, Response, StatusCode, Url},
    ClientWithMiddleware,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::domain::giveaways::{CommunityStats, Giveaway, NewGiveaway};

#[derive(Error, Debug)]
pub enum Error {
    #[error("problem sending request to backend: {0}")]
    Send(#[from] reqwest_middleware::reqwest::Error),
    #[error("problem sending request to backend: {0}")]
    SendMiddleware(#[from] reqwest_middleware::Error),
    #[error("backend responded with status {status}: {body}")]
    Rejected { status: StatusCode, body: String },
    #[error("malformed response from backend: {0}")]
    Decode(String),
    #[error("problem building backend request: {0}")]
    Request(String),
}

impl Error {
    /// The backend answered, but not with a success status
    pub fn is_rejection(&self) -> bool {
        matches!(self, Error::Rejected { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackendHealth {
    pub status: String,
    #[serde(default)]
    pub database: Option<String>,
}

impl BackendHealth {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[derive(Serialize)]
struct LoginPayload<'a> {
    password: &'a str,
}

/// Operations the site needs from the giveaway backend.
///
/// Each call is attempted exactly once, callers decide how a failure is surfaced.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn list_giveaways(&self) -> Result<Vec<Giveaway>, Error>;
    async fn login(&self, password: &str) -> Result<(), Error>;
    async fn create_giveaway(&self, giveaway: &NewGiveaway) -> Result<(), Error>;
    async fn delete_giveaway(&self, giveaway_id: &str) -> Result<(), Error>;
    async fn health(&self) -> Result<BackendHealth, Error>;
    async fn stats(&self) -> Result<CommunityStats, Error>;
}

#[cfg(test)]
mockall::mock! {
    pub BackendClient {}

    #[async_trait::async_trait]
    impl Backend for BackendClient {
        async fn list_giveaways(&self) -> Result<Vec<Giveaway>, Error>;
        async fn login(&self, password: &str) -> Result<(), Error>;
        async fn create_giveaway(&self, giveaway: &NewGiveaway) -> Result<(), Error>;
        async fn delete_giveaway(&self, giveaway_id: &str) -> Result<(), Error>;
        async fn health(&self) -> Result<BackendHealth, Error>;
        async fn stats(&self) -> Result<CommunityStats, Error>;
    }
}

#[derive(Clone)]
pub struct BackendClient {
    pub base_url: Url,
    pub client: ClientWithMiddleware,
}

impl BackendClient {
    pub fn new(client: ClientWithMiddleware, base_url: &Url) -> Self {
        Self {
            base_url: base_url.to_owned(),
            client,
        }
    }

    /// Appends `segments` to the base url, keeping any path prefix it already has
    fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                Error::Request(format!("backend url {} can't take a path", self.base_url))
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn send_request(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> Result<Response, Error> {
        let mut request = self.client.request(method, url);

        if let Some(b) = body {
            request = request
                .header(CONTENT_TYPE, APPLICATION_JSON.to_string())
                .body(b);
        }

        let response = request.send().await.map_err(|e| {
            error!("error sending to backend: {}", e);
            Error::SendMiddleware(e)
        })?;

        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(Error::Rejected { status, body })
        }
    }

    async fn send_json_request<T>(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let response = self.send_request(method, url, body).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| Error::Decode(e.to_string()))
    }
}

#[async_trait::async_trait]
impl Backend for BackendClient {
    async fn list_giveaways(&self) -> Result<Vec<Giveaway>, Error> {
        let url = self.endpoint(&["api", "giveaways"])?;
        self.send_json_request::<Vec<Giveaway>>(Method::GET, url, None)
            .await
    }

    async fn login(&self, password: &str) -> Result<(), Error> {
        let url = self.endpoint(&["api", "admin", "login"])?;
        let body = serde_json::to_vec(&LoginPayload { password })
            .map_err(|e| Error::Request(format!("Failed to serialize login: {}", e)))?;

        self.send_request(Method::POST, url, Some(body)).await?;
        Ok(())
    }

    async fn create_giveaway(&self, giveaway: &NewGiveaway) -> Result<(), Error> {
        debug!("giveaway: {:?}", giveaway);
        let url = self.endpoint(&["api", "admin", "giveaways"])?;
        let body = serde_json::to_vec(giveaway)
            .map_err(|e| Error::Request(format!("Failed to serialize giveaway: {}", e)))?;

        self.send_request(Method::POST, url, Some(body)).await?;
        Ok(())
    }

    async fn delete_giveaway(&self, giveaway_id: &str) -> Result<(), Error> {
        let url = self.endpoint(&["api", "admin", "giveaways", giveaway_id])?;
        self.send_request(Method::DELETE, url, None).await?;
        Ok(())
    }

    async fn health(&self) -> Result<BackendHealth, Error> {
        let url = self.endpoint(&["api", "health"])?;
        self.send_json_request::<BackendHealth>(Method::GET, url, None)
            .await
    }

    async fn stats(&self) -> Result<CommunityStats, Error> {
        let url = self.endpoint(&["api", "stats"])?;
        self.send_json_request::<CommunityStats>(Method::GET, url, None)
            .await
    }
}
