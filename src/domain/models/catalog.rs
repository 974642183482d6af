#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;

use async_trait::async_trait;

use super::Movie;
use super::Session;

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum CatalogError {
    /// The service answered with a non-2xx status. `detail` carries the
    /// service's own message when the error body had one.
    #[error("catalog rejected the request with status {status}")]
    Rejected { status: u16, detail: Option<String> },

    /// The request never completed, or the response had an unexpected shape.
    #[error("catalog request failed: {0}")]
    Network(String),
}

impl CatalogError {
    pub fn is_network(&self) -> bool {
        return matches!(self, CatalogError::Network(_));
    }

    /// The service's message when there is one, `fallback` otherwise.
    pub fn detail_or(&self, fallback: &str) -> String {
        if let CatalogError::Rejected {
            detail: Some(detail),
            ..
        } = self
        {
            if !detail.is_empty() {
                return detail.to_string();
            }
        }

        return fallback.to_string();
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LikeOutcome {
    Liked,
    Unliked,
}

impl LikeOutcome {
    /// The like endpoint only reports its decision as a human readable
    /// message. "unliked" contains "liked", so it has to be checked first.
    pub fn from_message(message: &str) -> LikeOutcome {
        let message = message.to_lowercase();
        if message.contains("unliked") {
            return LikeOutcome::Unliked;
        }
        if message.contains("liked") {
            return LikeOutcome::Liked;
        }

        return LikeOutcome::Unliked;
    }
}

#[async_trait]
pub trait Catalog {
    /// Used at startup to verify the catalog service is reachable.
    async fn health_check(&self) -> CatalogResult<()>;

    async fn register(&self, username: &str, password: &str) -> CatalogResult<()>;

    /// Exchanges credentials for a bearer token.
    async fn login(&self, username: &str, password: &str) -> CatalogResult<String>;

    async fn list_movies(&self) -> CatalogResult<Vec<Movie>>;

    /// Flips the like for `movie_id`. The service decides the resulting state,
    /// callers must not assume it.
    async fn toggle_like(&self, session: &Session, movie_id: i64) -> CatalogResult<LikeOutcome>;

    /// Movies similar to `movie_id`, each carrying its like count. May be
    /// empty.
    async fn recommendations_for(&self, movie_id: i64) -> CatalogResult<Vec<Movie>>;
}

pub type CatalogBox = Box<dyn Catalog + Send + Sync>;
