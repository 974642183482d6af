#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use super::view;
use crate::domain::models::AuthTab;
use crate::domain::models::LikeOutcome;
use crate::domain::models::LikedSet;
use crate::domain::models::Movie;
use crate::domain::models::PageName;
use crate::domain::models::Session;
use crate::domain::models::Theme;

/// What the user is looking at. Only the theme outlives the process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewState {
    pub auth_tab: AuthTab,
    pub current_page: PageName,
    pub theme: Theme,
    pub search_term: String,
    pub genre_filter: String,
}

impl Default for ViewState {
    fn default() -> ViewState {
        return ViewState {
            auth_tab: AuthTab::Login,
            current_page: PageName::AllMovies,
            theme: Theme::Dark,
            search_term: "".to_string(),
            genre_filter: "".to_string(),
        };
    }
}

#[derive(Default)]
pub struct AppState {
    pub session: Option<Session>,
    pub movies: Vec<Movie>,
    pub liked: LikedSet,
    pub view: ViewState,
}

impl AppState {
    pub fn is_authenticated(&self) -> bool {
        return self.session.is_some();
    }

    pub fn sign_in(&mut self, session: Session) {
        self.session = Some(session);
    }

    pub fn sign_out(&mut self) {
        self.session = None;
        self.liked.clear();
    }

    pub fn filtered_movies(&self) -> Vec<&Movie> {
        return view::filter_movies(
            &self.movies,
            &self.view.search_term,
            &self.view.genre_filter,
        );
    }

    pub fn find_movie(&self, movie_id: i64) -> Option<&Movie> {
        return self.movies.iter().find(|movie| return movie.movie_id == movie_id);
    }

    /// Records what the service decided for `movie_id` and returns whether it
    /// is now liked.
    pub fn apply_like(&mut self, movie_id: i64, outcome: LikeOutcome) -> bool {
        match outcome {
            LikeOutcome::Liked => {
                self.liked.insert(movie_id);
            }
            LikeOutcome::Unliked => {
                self.liked.remove(movie_id);
            }
        }

        return self.liked.contains(movie_id);
    }
}
