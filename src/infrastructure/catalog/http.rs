#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Catalog;
use crate::domain::models::CatalogError;
use crate::domain::models::CatalogResult;
use crate::domain::models::LikeOutcome;
use crate::domain::models::Movie;
use crate::domain::models::Session;

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> CatalogError {
        return CatalogError::Network(err.to_string());
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ErrorResponse {
    detail: Option<serde_json::Value>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct LoginResponse {
    access_token: String,
    token_type: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct MessageResponse {
    message: String,
}

/// Turns a non-2xx response into a rejection, keeping the service's `detail`
/// when it is a plain string.
async fn rejected(res: reqwest::Response) -> CatalogError {
    let status = res.status().as_u16();
    let detail = res
        .json::<ErrorResponse>()
        .await
        .ok()
        .and_then(|body| return body.detail)
        .and_then(|detail| return detail.as_str().map(|e| return e.to_string()));

    tracing::warn!(status, detail = ?detail, "catalog rejected request");
    return CatalogError::Rejected { status, detail };
}

async fn parse<T: DeserializeOwned>(res: reqwest::Response) -> CatalogResult<T> {
    if !res.status().is_success() {
        return Err(rejected(res).await);
    }

    let body = res.json::<T>().await.map_err(|err| {
        tracing::error!(error = ?err, "catalog response had an unexpected shape");
        return CatalogError::Network(err.to_string());
    })?;

    return Ok(body);
}

pub struct HttpCatalog {
    url: String,
    client: reqwest::Client,
}

impl Default for HttpCatalog {
    fn default() -> HttpCatalog {
        return HttpCatalog::new(&Config::get(ConfigKey::ApiURL));
    }
}

impl HttpCatalog {
    pub fn new(url: &str) -> HttpCatalog {
        return HttpCatalog {
            url: url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        };
    }
}

#[async_trait]
impl Catalog for HttpCatalog {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> CatalogResult<()> {
        let res = match self.client.get(format!("{url}/", url = self.url)).send().await {
            Ok(res) => res,
            Err(err) => {
                tracing::error!(error = ?err, "Catalog service is not running");
                return Err(err.into());
            }
        };

        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "Catalog health check failed");
            return Err(rejected(res).await);
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn register(&self, username: &str, password: &str) -> CatalogResult<()> {
        let res = self
            .client
            .post(format!("{url}/register", url = self.url))
            .query(&[("username", username), ("password", password)])
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(rejected(res).await);
        }

        tracing::debug!(username, "registered");
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn login(&self, username: &str, password: &str) -> CatalogResult<String> {
        let res = self
            .client
            .post(format!("{url}/login", url = self.url))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        let body: LoginResponse = parse(res).await?;
        tracing::debug!(username, token_type = ?body.token_type, "logged in");

        return Ok(body.access_token);
    }

    #[allow(clippy::implicit_return)]
    async fn list_movies(&self) -> CatalogResult<Vec<Movie>> {
        let res = self
            .client
            .get(format!("{url}/movies", url = self.url))
            .send()
            .await?;

        let movies: Vec<Movie> = parse(res).await?;
        tracing::debug!(count = movies.len(), "movies loaded");

        return Ok(movies);
    }

    #[allow(clippy::implicit_return)]
    async fn toggle_like(&self, session: &Session, movie_id: i64) -> CatalogResult<LikeOutcome> {
        let res = self
            .client
            .post(format!("{url}/like", url = self.url))
            .query(&[
                ("user_name", session.username.to_string()),
                ("movie_id", movie_id.to_string()),
            ])
            .bearer_auth(&session.token)
            .send()
            .await?;

        let body: MessageResponse = parse(res).await?;
        let outcome = LikeOutcome::from_message(&body.message);
        tracing::debug!(movie_id, outcome = ?outcome, message = %body.message, "like toggled");

        return Ok(outcome);
    }

    #[allow(clippy::implicit_return)]
    async fn recommendations_for(&self, movie_id: i64) -> CatalogResult<Vec<Movie>> {
        let res = self
            .client
            .get(format!("{url}/recommendations/{movie_id}", url = self.url))
            .send()
            .await?;

        return parse(res).await;
    }
}
