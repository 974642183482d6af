#[cfg(test)]
#[path = "page_test.rs"]
mod tests;

use strum::EnumIter;
use strum::IntoEnumIterator;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum AuthTab {
    Login,
    Register,
}

impl AuthTab {
    pub fn parse(text: &str) -> Option<AuthTab> {
        return AuthTab::iter().find(|e| return e.to_string() == text);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum PageName {
    AllMovies,
    Recommendations,
}

impl PageName {
    pub fn parse(text: &str) -> Option<PageName> {
        if text == "movies" {
            return Some(PageName::AllMovies);
        }
        if text == "recs" {
            return Some(PageName::Recommendations);
        }

        return PageName::iter().find(|e| return e.to_string() == text);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Unknown or missing values fall back to dark.
    pub fn parse(text: &str) -> Theme {
        return Theme::iter()
            .find(|e| return e.to_string() == text)
            .unwrap_or_default();
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Dark => return Theme::Light,
            Theme::Light => return Theme::Dark,
        }
    }

    pub fn body_class(&self) -> Option<&'static str> {
        match self {
            Theme::Dark => return None,
            Theme::Light => return Some("light-mode"),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Theme::Dark => return "🌙",
            Theme::Light => return "☀️",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum MessageKind {
    Error,
    Success,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum FormField {
    LoginUsername,
    LoginPassword,
    RegisterUsername,
    RegisterPassword,
}

/// Markup for a single movie card in the movies grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    pub movie_id: i64,
    pub markup: String,
}

/// Handle on the visible page. Created once at startup and owned by the
/// controller, every visible change goes through it.
pub trait Page {
    fn show_auth_view(&mut self);
    fn show_main_app(&mut self, username: &str);
    fn switch_auth_tab(&mut self, tab: AuthTab);
    fn switch_page(&mut self, page: PageName);

    /// Inline message area of the auth forms.
    fn show_message(&mut self, text: &str, kind: MessageKind);
    fn hide_message(&mut self);

    fn show_loading(&mut self);
    fn hide_loading(&mut self);

    /// Returns an id used to hide this specific toast later on.
    fn show_toast(&mut self, text: &str) -> u64;
    /// Does nothing when a newer toast replaced the one with `id`.
    fn hide_toast(&mut self, id: u64);

    fn apply_theme(&mut self, theme: Theme);

    fn set_genre_options(&mut self, markup: String);
    fn set_search_value(&mut self, value: &str);
    fn set_movie_grid(&mut self, cards: Vec<Card>);
    /// Updates the like button of a single grid card in place.
    fn set_like_affordance(&mut self, movie_id: i64, liked: bool);

    fn set_recommendations(&mut self, markup: String);
    fn append_recommendation_section(&mut self, markup: String);

    fn field(&self, field: FormField) -> String;
    fn set_field(&mut self, field: FormField, value: &str);
    fn reset_forms(&mut self);
}
