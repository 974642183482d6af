#[cfg(test)]
#[path = "document_test.rs"]
mod tests;

use std::collections::HashMap;

use yansi::Paint;

use crate::domain::models::AuthTab;
use crate::domain::models::Card;
use crate::domain::models::FormField;
use crate::domain::models::MessageKind;
use crate::domain::models::Page;
use crate::domain::models::PageName;
use crate::domain::models::Theme;
use crate::domain::services::view;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub text: String,
}

/// In-memory page. Serializes to a full HTML document, and optionally echoes
/// messages and toasts to the terminal as they appear.
#[derive(Default)]
pub struct DocumentPage {
    echo: bool,
    auth_visible: bool,
    app_visible: bool,
    username: String,
    auth_tab: Option<AuthTab>,
    current_page: Option<PageName>,
    message: Option<(String, MessageKind)>,
    loading: bool,
    toast: Option<Toast>,
    next_toast_id: u64,
    theme: Theme,
    genre_options: String,
    search_value: String,
    grid: Vec<Card>,
    grid_renders: usize,
    recommendations: Vec<String>,
    fields: HashMap<FormField, String>,
}

impl DocumentPage {
    pub fn with_echo() -> DocumentPage {
        return DocumentPage {
            echo: true,
            ..DocumentPage::default()
        };
    }

    pub fn is_auth_view(&self) -> bool {
        return self.auth_visible && !self.app_visible;
    }

    pub fn is_main_app(&self) -> bool {
        return self.app_visible && !self.auth_visible;
    }

    pub fn username(&self) -> &str {
        return &self.username;
    }

    pub fn auth_tab(&self) -> AuthTab {
        return self.auth_tab.unwrap_or(AuthTab::Login);
    }

    pub fn current_page(&self) -> PageName {
        return self.current_page.unwrap_or(PageName::AllMovies);
    }

    pub fn message(&self) -> Option<&(String, MessageKind)> {
        return self.message.as_ref();
    }

    pub fn is_loading(&self) -> bool {
        return self.loading;
    }

    pub fn toast(&self) -> Option<&Toast> {
        return self.toast.as_ref();
    }

    pub fn theme(&self) -> Theme {
        return self.theme;
    }

    pub fn genre_options(&self) -> &str {
        return &self.genre_options;
    }

    pub fn search_value(&self) -> &str {
        return &self.search_value;
    }

    pub fn grid(&self) -> &[Card] {
        return &self.grid;
    }

    /// How many times the whole grid was replaced.
    pub fn grid_renders(&self) -> usize {
        return self.grid_renders;
    }

    pub fn recommendations(&self) -> String {
        return self.recommendations.join("");
    }

    fn hidden(visible: bool) -> &'static str {
        if visible {
            return "";
        }
        return " hidden";
    }

    fn active(is_active: bool) -> &'static str {
        if is_active {
            return " active";
        }
        return "";
    }

    fn auth_view_html(&self) -> Vec<String> {
        let tab = self.auth_tab();
        let mut lines = vec![format!(
            r#"<div id="auth-view" class="auth-view{}">"#,
            DocumentPage::hidden(self.auth_visible)
        )];

        lines.push(format!(
            r#"<div class="tabs"><button class="tab-btn{}" data-tab="login">Login</button><button class="tab-btn{}" data-tab="register">Register</button></div>"#,
            DocumentPage::active(tab == AuthTab::Login),
            DocumentPage::active(tab == AuthTab::Register),
        ));

        for (form_tab, username_field, password_field) in [
            (AuthTab::Login, FormField::LoginUsername, FormField::LoginPassword),
            (
                AuthTab::Register,
                FormField::RegisterUsername,
                FormField::RegisterPassword,
            ),
        ] {
            lines.push(format!(
                r#"<form id="{form_tab}-form" class="auth-form{}"><input id="{username_field}" type="text" value="{}"><input id="{password_field}" type="password" value=""></form>"#,
                DocumentPage::active(tab == form_tab),
                view::escape(&self.field(username_field)),
            ));
        }

        match &self.message {
            Some((text, kind)) => {
                lines.push(format!(
                    r#"<div id="auth-message" class="message {kind}">{}</div>"#,
                    view::escape(text)
                ));
            }
            None => {
                lines.push(r#"<div id="auth-message" class="message"></div>"#.to_string());
            }
        }

        lines.push("</div>".to_string());
        return lines;
    }

    fn main_app_html(&self) -> Vec<String> {
        let page = self.current_page();
        let mut lines = vec![format!(
            r#"<div id="main-app" class="main-app{}">"#,
            DocumentPage::hidden(self.app_visible)
        )];

        lines.push(format!(
            r#"<nav><span id="user-name">{}</span><button class="nav-link{}" data-page="all-movies">All Movies</button><button class="nav-link{}" data-page="recommendations">Recommendations</button><button id="theme-toggle"><span class="theme-icon">{}</span></button><button id="logout-btn">Logout</button></nav>"#,
            view::escape(&self.username),
            DocumentPage::active(page == PageName::AllMovies),
            DocumentPage::active(page == PageName::Recommendations),
            self.theme.icon(),
        ));

        let cards = self
            .grid
            .iter()
            .map(|card| return card.markup.to_string())
            .collect::<Vec<String>>()
            .join("");
        lines.push(format!(
            r#"<section id="all-movies-page" class="page{}"><input id="search-input" type="text" value="{}"><select id="genre-filter">{}</select><div id="movies-grid" class="movies-grid">{cards}</div></section>"#,
            DocumentPage::active(page == PageName::AllMovies),
            view::escape(&self.search_value),
            self.genre_options,
        ));

        lines.push(format!(
            r#"<section id="recommendations-page" class="page{}"><div id="recommendations-content">{}</div></section>"#,
            DocumentPage::active(page == PageName::Recommendations),
            self.recommendations(),
        ));

        lines.push("</div>".to_string());
        return lines;
    }

    pub fn to_html(&self) -> String {
        let body_class = self
            .theme
            .body_class()
            .map(|class| return format!(r#" class="{class}""#))
            .unwrap_or_default();

        let mut lines = vec![
            "<!DOCTYPE html>".to_string(),
            r#"<html lang="en">"#.to_string(),
            r#"<head><meta charset="utf-8"><title>Marquee</title></head>"#.to_string(),
            format!("<body{body_class}>"),
            format!(
                r#"<div id="loading" class="loading{}">Loading...</div>"#,
                DocumentPage::hidden(self.loading)
            ),
        ];

        match &self.toast {
            Some(toast) => lines.push(format!(
                r#"<div id="toast" class="toast show">{}</div>"#,
                view::escape(&toast.text)
            )),
            None => lines.push(r#"<div id="toast" class="toast"></div>"#.to_string()),
        }

        lines.extend(self.auth_view_html());
        lines.extend(self.main_app_html());
        lines.push("</body>".to_string());
        lines.push("</html>".to_string());

        return lines.join("\n");
    }
}

impl Page for DocumentPage {
    fn show_auth_view(&mut self) {
        self.auth_visible = true;
        self.app_visible = false;
        self.username = "".to_string();
    }

    fn show_main_app(&mut self, username: &str) {
        self.auth_visible = false;
        self.app_visible = true;
        self.username = username.to_string();
    }

    fn switch_auth_tab(&mut self, tab: AuthTab) {
        self.auth_tab = Some(tab);
    }

    fn switch_page(&mut self, page: PageName) {
        self.current_page = Some(page);
    }

    fn show_message(&mut self, text: &str, kind: MessageKind) {
        if self.echo {
            match kind {
                MessageKind::Error => println!("{}", Paint::red(text)),
                MessageKind::Success => println!("{}", Paint::green(text)),
            }
        }

        self.message = Some((text.to_string(), kind));
    }

    fn hide_message(&mut self) {
        self.message = None;
    }

    fn show_loading(&mut self) {
        self.loading = true;
    }

    fn hide_loading(&mut self) {
        self.loading = false;
    }

    fn show_toast(&mut self, text: &str) -> u64 {
        if self.echo {
            println!("{}", Paint::cyan(text).bold());
        }

        self.next_toast_id += 1;
        self.toast = Some(Toast {
            id: self.next_toast_id,
            text: text.to_string(),
        });

        return self.next_toast_id;
    }

    fn hide_toast(&mut self, id: u64) {
        if self.toast.as_ref().map(|toast| return toast.id) == Some(id) {
            self.toast = None;
        }
    }

    fn apply_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    fn set_genre_options(&mut self, markup: String) {
        self.genre_options = markup;
    }

    fn set_search_value(&mut self, value: &str) {
        self.search_value = value.to_string();
    }

    fn set_movie_grid(&mut self, cards: Vec<Card>) {
        self.grid = cards;
        self.grid_renders += 1;
    }

    fn set_like_affordance(&mut self, movie_id: i64, liked: bool) {
        let card = self.grid.iter_mut().find(|card| return card.movie_id == movie_id);
        if let Some(card) = card {
            card.markup = card.markup.replace(
                &view::like_button(movie_id, !liked),
                &view::like_button(movie_id, liked),
            );
        }
    }

    fn set_recommendations(&mut self, markup: String) {
        self.recommendations = vec![markup];
    }

    fn append_recommendation_section(&mut self, markup: String) {
        self.recommendations.push(markup);
    }

    fn field(&self, field: FormField) -> String {
        return self.fields.get(&field).cloned().unwrap_or_default();
    }

    fn set_field(&mut self, field: FormField, value: &str) {
        self.fields.insert(field, value.to_string());
    }

    fn reset_forms(&mut self) {
        self.fields.clear();
    }
}
