#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::time;

use super::view;
use super::AppState;
use super::SessionStore;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AuthTab;
use crate::domain::models::CatalogBox;
use crate::domain::models::Event;
use crate::domain::models::FormField;
use crate::domain::models::Gesture;
use crate::domain::models::MessageKind;
use crate::domain::models::Page;
use crate::domain::models::PageName;
use crate::domain::models::Session;

const FILL_ALL_FIELDS: &str = "Please fill in all fields";
const AUTH_NETWORK_ERROR: &str = "Network error. Please try again.";

#[derive(Clone, Copy, Debug)]
pub struct Timings {
    /// Delay between a successful registration and opening the login tab.
    pub tab_switch_delay: Duration,
    pub toast_duration: Duration,
}

impl Default for Timings {
    fn default() -> Timings {
        return Timings {
            tab_switch_delay: Duration::from_millis(Config::get_millis(ConfigKey::TabSwitchDelay)),
            toast_duration: Duration::from_millis(Config::get_millis(ConfigKey::ToastDuration)),
        };
    }
}

/// Owns the application state and is the only thing that mutates it. Events
/// are handled one at a time, each to completion, so nothing here needs a
/// lock. Timers feed their events back through `tx`.
pub struct Controller<P: Page> {
    state: AppState,
    catalog: CatalogBox,
    sessions: SessionStore,
    page: P,
    tx: mpsc::UnboundedSender<Event>,
    timings: Timings,
}

impl<P: Page> Controller<P> {
    pub fn new(
        catalog: CatalogBox,
        sessions: SessionStore,
        page: P,
        tx: mpsc::UnboundedSender<Event>,
        timings: Timings,
    ) -> Controller<P> {
        return Controller {
            state: AppState::default(),
            catalog,
            sessions,
            page,
            tx,
            timings,
        };
    }

    pub fn page(&self) -> &P {
        return &self.page;
    }

    pub fn state(&self) -> &AppState {
        return &self.state;
    }

    pub fn sessions(&self) -> &SessionStore {
        return &self.sessions;
    }

    /// Applies the saved theme, then restores a saved session without
    /// checking its token. An invalid token only shows up on the first call
    /// that needs it.
    pub async fn start(&mut self) -> Result<()> {
        self.state.view.theme = self.sessions.load_theme();
        self.page.apply_theme(self.state.view.theme);
        self.page.switch_auth_tab(self.state.view.auth_tab);

        if let Err(err) = self.catalog.health_check().await {
            tracing::warn!(error = ?err, "catalog health check failed");
            self.toast("Catalog service is unreachable");
        }

        if let Some(session) = self.sessions.load() {
            tracing::debug!(username = %session.username, "restored session");
            self.state.sign_in(session);
            self.show_main_app().await;
        } else {
            self.page.show_auth_view();
        }

        return Ok(());
    }

    pub async fn handle(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Gesture(gesture) => {
                self.handle_gesture(gesture).await?;
            }
            Event::AuthTabTimer(tab) => {
                if !self.state.is_authenticated() {
                    self.switch_auth_tab(tab);
                }
            }
            Event::ToastExpired(id) => {
                self.page.hide_toast(id);
            }
            Event::Help() | Event::Quit() => (),
        }

        return Ok(());
    }

    async fn handle_gesture(&mut self, gesture: Gesture) -> Result<()> {
        let authenticated = self.state.is_authenticated();

        match gesture {
            Gesture::AuthTabClick(tab) if !authenticated => {
                self.switch_auth_tab(tab);
            }
            Gesture::FieldInput(field, value) if !authenticated => {
                self.page.set_field(field, &value);
            }
            Gesture::SubmitRegister() if !authenticated => {
                self.submit_register().await;
            }
            Gesture::SubmitLogin() if !authenticated => {
                self.submit_login().await?;
            }
            Gesture::NavClick(page) if authenticated => {
                self.switch_page(page).await;
            }
            Gesture::SearchInput(term) if authenticated => {
                self.state.view.search_term = term;
                self.render_filters();
                self.render_grid();
            }
            Gesture::GenreChange(genre) if authenticated => {
                self.state.view.genre_filter = genre;
                self.render_filters();
                self.render_grid();
            }
            Gesture::LikeClick(movie_id) if authenticated => {
                self.toggle_like(movie_id).await;
            }
            Gesture::ThemeToggle() if authenticated => {
                self.toggle_theme()?;
            }
            Gesture::LogoutClick() if authenticated => {
                self.logout()?;
            }
            gesture => {
                tracing::debug!(gesture = ?gesture, authenticated, "gesture not available in this mode");
            }
        }

        return Ok(());
    }

    fn toast(&mut self, text: &str) {
        let id = self.page.show_toast(text);
        self.schedule(self.timings.toast_duration, Event::ToastExpired(id));
    }

    fn schedule(&self, delay: Duration, event: Event) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            time::sleep(delay).await;
            if tx.send(event).is_err() {
                tracing::debug!("event loop closed before timer fired");
            }
        });
    }

    fn switch_auth_tab(&mut self, tab: AuthTab) {
        self.state.view.auth_tab = tab;
        self.page.switch_auth_tab(tab);
        self.page.hide_message();
    }

    fn credentials(&self, username_field: FormField, password_field: FormField) -> Option<(String, String)> {
        let username = self.page.field(username_field).trim().to_string();
        let password = self.page.field(password_field);
        if username.is_empty() || password.is_empty() {
            return None;
        }

        return Some((username, password));
    }

    async fn submit_register(&mut self) {
        let (username, password) =
            match self.credentials(FormField::RegisterUsername, FormField::RegisterPassword) {
                Some(credentials) => credentials,
                None => {
                    self.page.show_message(FILL_ALL_FIELDS, MessageKind::Error);
                    return;
                }
            };

        self.page.show_loading();
        let res = self.catalog.register(&username, &password).await;
        self.page.hide_loading();

        match res {
            Ok(()) => {
                self.page.show_message(
                    "Registration successful! Please login.",
                    MessageKind::Success,
                );
                self.schedule(
                    self.timings.tab_switch_delay,
                    Event::AuthTabTimer(AuthTab::Login),
                );
            }
            Err(err) if err.is_network() => {
                tracing::error!(error = ?err, "register failed");
                self.page.show_message(AUTH_NETWORK_ERROR, MessageKind::Error);
            }
            Err(err) => {
                self.page
                    .show_message(&err.detail_or("Registration failed"), MessageKind::Error);
            }
        }
    }

    async fn submit_login(&mut self) -> Result<()> {
        let (username, password) =
            match self.credentials(FormField::LoginUsername, FormField::LoginPassword) {
                Some(credentials) => credentials,
                None => {
                    self.page.show_message(FILL_ALL_FIELDS, MessageKind::Error);
                    return Ok(());
                }
            };

        self.page.show_loading();
        let res = self.catalog.login(&username, &password).await;
        self.page.hide_loading();

        match res {
            Ok(token) => {
                let session = Session::new(&username, &token);
                if let Err(err) = self.sessions.save(&session) {
                    self.page.show_message(
                        "Could not save your session. Please try again.",
                        MessageKind::Error,
                    );
                    return Err(err);
                }

                self.state.sign_in(session);
                self.show_main_app().await;
            }
            Err(err) if err.is_network() => {
                tracing::error!(error = ?err, "login failed");
                self.page.show_message(AUTH_NETWORK_ERROR, MessageKind::Error);
            }
            Err(err) => {
                self.page
                    .show_message(&err.detail_or("Login failed"), MessageKind::Error);
            }
        }

        return Ok(());
    }

    async fn show_main_app(&mut self) {
        let username = self
            .state
            .session
            .as_ref()
            .map(|session| return session.username.to_string())
            .unwrap_or_default();

        self.page.show_main_app(&username);
        self.page.switch_page(self.state.view.current_page);
        self.load_movies().await;
    }

    async fn load_movies(&mut self) {
        self.page.show_loading();
        let res = self.catalog.list_movies().await;
        self.page.hide_loading();

        match res {
            Ok(movies) => {
                self.state.movies = movies;

                let genres = view::genres(&self.state.movies);
                if !genres.contains(&self.state.view.genre_filter) {
                    self.state.view.genre_filter = "".to_string();
                }

                self.render_filters();
                self.render_grid();
            }
            Err(err) if err.is_network() => {
                tracing::error!(error = ?err, "failed to load movies");
                self.toast("Network error loading movies");
            }
            Err(err) => {
                tracing::error!(error = ?err, "failed to load movies");
                self.toast("Failed to load movies");
            }
        }
    }

    /// Keeps the search box and genre select in line with the active filters.
    fn render_filters(&mut self) {
        self.page.set_search_value(&self.state.view.search_term);
        self.page.set_genre_options(view::genre_options(
            &self.state.movies,
            &self.state.view.genre_filter,
        ));
    }

    fn render_grid(&mut self) {
        let cards = view::movie_cards(&self.state.filtered_movies(), &self.state.liked);
        self.page.set_movie_grid(cards);
    }

    /// Only the affected card changes, the rest of the grid is left alone.
    async fn toggle_like(&mut self, movie_id: i64) {
        let session = match &self.state.session {
            Some(session) => session.clone(),
            None => return,
        };

        self.page.show_loading();
        let res = self.catalog.toggle_like(&session, movie_id).await;
        self.page.hide_loading();

        match res {
            Ok(outcome) => {
                let liked = self.state.apply_like(movie_id, outcome);
                self.page.set_like_affordance(movie_id, liked);
                if liked {
                    self.toast("Movie liked! ❤️");
                } else {
                    self.toast("Movie unliked");
                }
            }
            Err(err) => {
                tracing::error!(error = ?err, movie_id, "failed to toggle like");
                self.toast("Failed to update like status");
            }
        }
    }

    async fn switch_page(&mut self, page: PageName) {
        self.state.view.current_page = page;
        self.page.switch_page(page);

        if page == PageName::Recommendations {
            self.load_recommendations().await;
        }
    }

    /// One request per liked movie, in the order they were liked. A rejected
    /// request only drops its own section, a network failure stops the rest.
    async fn load_recommendations(&mut self) {
        if self.state.liked.is_empty() {
            self.page
                .set_recommendations(view::recommendations_empty_state());
            return;
        }

        self.page.show_loading();
        self.page.set_recommendations("".to_string());

        let liked_ids = self.state.liked.iter().collect::<Vec<i64>>();
        for movie_id in liked_ids {
            let movie = match self.state.find_movie(movie_id) {
                Some(movie) => movie.clone(),
                None => {
                    tracing::debug!(movie_id, "liked movie not in catalog, skipping");
                    continue;
                }
            };

            match self.catalog.recommendations_for(movie_id).await {
                Ok(recommendations) => {
                    if recommendations.is_empty() {
                        continue;
                    }

                    let section =
                        view::recommendation_section(&movie, &recommendations, &self.state.liked);
                    self.page.append_recommendation_section(section);
                }
                Err(err) if err.is_network() => {
                    tracing::error!(error = ?err, movie_id, "failed to load recommendations");
                    self.page.hide_loading();
                    self.toast("Failed to load recommendations");
                    return;
                }
                Err(err) => {
                    tracing::debug!(error = ?err, movie_id, "skipping recommendations");
                }
            }
        }

        self.page.hide_loading();
    }

    fn toggle_theme(&mut self) -> Result<()> {
        self.state.view.theme = self.state.view.theme.toggled();
        self.page.apply_theme(self.state.view.theme);
        self.sessions.save_theme(self.state.view.theme)?;

        return Ok(());
    }

    fn logout(&mut self) -> Result<()> {
        self.state.sign_out();
        self.page.reset_forms();
        self.page.show_auth_view();
        self.toast("Logged out successfully");
        self.sessions.clear()?;

        return Ok(());
    }
}
