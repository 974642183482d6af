#[cfg(test)]
#[path = "movie_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub movie_id: i64,
    pub movie_name: String,
    pub genre: String,
    pub ratings: f64,
    /// Only set on recommendation payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<i64>,
}

impl Movie {
    /// `search` is expected to already be lowercased. An empty `genre` matches
    /// every movie.
    pub fn matches(&self, search: &str, genre: &str) -> bool {
        let matches_search = self.movie_name.to_lowercase().contains(search);
        let matches_genre = genre.is_empty() || self.genre == genre;

        return matches_search && matches_genre;
    }

    pub fn like_badge_count(&self) -> Option<i64> {
        return self.like_count.filter(|count| return *count > 0);
    }
}
