extern crate tempdir;

use std::time::Duration;

use anyhow::Result;
use mockito::Matcher;
use tempdir::TempDir;
use test_utils::movies_fixture;
use test_utils::recommendations_fixture;
use tokio::sync::mpsc;

use super::Controller;
use super::Timings;
use crate::domain::models::AuthTab;
use crate::domain::models::Event;
use crate::domain::models::FormField;
use crate::domain::models::Gesture;
use crate::domain::models::MessageKind;
use crate::domain::models::Movie;
use crate::domain::models::Page;
use crate::domain::models::PageName;
use crate::domain::models::Session;
use crate::domain::models::Storage;
use crate::domain::models::StorageBox;
use crate::domain::models::StorageKey;
use crate::domain::models::Theme;
use crate::domain::services::view;
use crate::domain::services::SessionStore;
use crate::infrastructure::catalog::http::HttpCatalog;
use crate::infrastructure::pages::DocumentPage;
use crate::infrastructure::storage::FileStorage;
use crate::infrastructure::storage::MemoryStorage;

impl Timings {
    fn for_tests() -> Timings {
        return Timings {
            tab_switch_delay: Duration::ZERO,
            toast_duration: Duration::from_secs(60),
        };
    }
}

fn new_controller_with_storage(
    url: &str,
    storage: StorageBox,
) -> (Controller<DocumentPage>, mpsc::UnboundedReceiver<Event>) {
    let (tx, rx) = mpsc::unbounded_channel::<Event>();
    let controller = Controller::new(
        Box::new(HttpCatalog::new(url)),
        SessionStore::new(storage),
        DocumentPage::default(),
        tx,
        Timings::for_tests(),
    );

    return (controller, rx);
}

fn new_controller(url: &str) -> (Controller<DocumentPage>, mpsc::UnboundedReceiver<Event>) {
    return new_controller_with_storage(url, Box::<MemoryStorage>::default());
}

fn movies() -> Vec<Movie> {
    return serde_json::from_str(movies_fixture()).unwrap();
}

/// Puts the controller straight into an authenticated session with the
/// fixture movies loaded, skipping the login round trip.
fn signed_in(controller: &mut Controller<DocumentPage>) {
    controller.state.sign_in(Session::new("alice", "tok1"));
    controller.state.movies = movies();
    controller.render_grid();
}

fn gesture(gesture: Gesture) -> Event {
    return Event::Gesture(gesture);
}

async fn fill(controller: &mut Controller<DocumentPage>, field: FormField, value: &str) -> Result<()> {
    return controller
        .handle(gesture(Gesture::FieldInput(field, value.to_string())))
        .await;
}

fn message(controller: &Controller<DocumentPage>) -> Option<(String, MessageKind)> {
    return controller.page().message().cloned();
}

fn toast_text(controller: &Controller<DocumentPage>) -> Option<String> {
    return controller
        .page()
        .toast()
        .map(|toast| return toast.text.to_string());
}

#[tokio::test]
async fn it_rejects_empty_registration_without_calling_the_catalog() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", Matcher::Regex("^/register".to_string()))
        .expect(0)
        .create();

    let (mut controller, _rx) = new_controller(&server.url());
    controller.start().await?;
    controller
        .handle(gesture(Gesture::AuthTabClick(AuthTab::Register)))
        .await?;
    fill(&mut controller, FormField::RegisterUsername, "alice").await?;
    controller.handle(gesture(Gesture::SubmitRegister())).await?;

    assert_eq!(
        message(&controller),
        Some((
            "Please fill in all fields".to_string(),
            MessageKind::Error
        ))
    );
    mock.assert();
    return Ok(());
}

#[tokio::test]
async fn it_switches_to_login_after_registering() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/register")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("username".to_string(), "alice".to_string()),
            Matcher::UrlEncoded("password".to_string(), "pw123".to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"message": "User registered successfully"}"#)
        .create();

    let (mut controller, mut rx) = new_controller(&server.url());
    controller
        .handle(gesture(Gesture::AuthTabClick(AuthTab::Register)))
        .await?;
    fill(&mut controller, FormField::RegisterUsername, "alice").await?;
    fill(&mut controller, FormField::RegisterPassword, "pw123").await?;
    controller.handle(gesture(Gesture::SubmitRegister())).await?;

    mock.assert();
    assert_eq!(
        message(&controller),
        Some((
            "Registration successful! Please login.".to_string(),
            MessageKind::Success
        ))
    );
    assert_eq!(controller.page().auth_tab(), AuthTab::Register);
    assert!(!controller.page().is_loading());

    let event = rx.recv().await.unwrap();
    assert_eq!(event, Event::AuthTabTimer(AuthTab::Login));
    controller.handle(event).await?;

    assert_eq!(controller.page().auth_tab(), AuthTab::Login);
    assert_eq!(message(&controller), None);
    return Ok(());
}

#[tokio::test]
async fn it_shows_registration_rejections_verbatim() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", Matcher::Regex("^/register".to_string()))
        .with_status(400)
        .with_body(r#"{"detail": "Username already exists"}"#)
        .create();

    let (mut controller, _rx) = new_controller(&server.url());
    fill(&mut controller, FormField::RegisterUsername, "alice").await?;
    fill(&mut controller, FormField::RegisterPassword, "pw123").await?;
    controller.handle(gesture(Gesture::SubmitRegister())).await?;

    mock.assert();
    assert_eq!(
        message(&controller),
        Some(("Username already exists".to_string(), MessageKind::Error))
    );
    return Ok(());
}

#[tokio::test]
async fn it_shows_a_generic_message_on_auth_network_errors() -> Result<()> {
    let (mut controller, _rx) = new_controller("http://127.0.0.1:1");
    fill(&mut controller, FormField::LoginUsername, "alice").await?;
    fill(&mut controller, FormField::LoginPassword, "pw123").await?;
    controller.handle(gesture(Gesture::SubmitLogin())).await?;

    assert_eq!(
        message(&controller),
        Some((
            "Network error. Please try again.".to_string(),
            MessageKind::Error
        ))
    );
    assert!(!controller.page().is_loading());
    assert!(!controller.state().is_authenticated());
    return Ok(());
}

#[tokio::test]
async fn it_logs_in_and_loads_movies() -> Result<()> {
    let mut server = mockito::Server::new();
    let login_mock = server
        .mock("POST", "/login")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("username".to_string(), "alice".to_string()),
            Matcher::UrlEncoded("password".to_string(), "pw123".to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"access_token": "tok1", "token_type": "bearer"}"#)
        .create();
    let movies_mock = server
        .mock("GET", "/movies")
        .with_status(200)
        .with_body(movies_fixture())
        .create();

    let (mut controller, _rx) = new_controller(&server.url());
    fill(&mut controller, FormField::LoginUsername, "alice").await?;
    fill(&mut controller, FormField::LoginPassword, "pw123").await?;
    controller.handle(gesture(Gesture::SubmitLogin())).await?;

    login_mock.assert();
    movies_mock.assert();
    assert_eq!(
        controller.state().session,
        Some(Session::new("alice", "tok1"))
    );
    assert_eq!(
        controller.sessions().load(),
        Some(Session::new("alice", "tok1"))
    );
    assert!(controller.page().is_main_app());
    assert_eq!(controller.page().username(), "alice");
    assert_eq!(controller.page().grid().len(), 5);
    assert!(controller.page().genre_options().contains("Animation"));
    assert!(!controller.page().is_loading());
    return Ok(());
}

#[tokio::test]
async fn it_shows_login_rejections_verbatim() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/login")
        .with_status(401)
        .with_body(r#"{"detail": "Invalid credentials"}"#)
        .create();

    let (mut controller, _rx) = new_controller(&server.url());
    fill(&mut controller, FormField::LoginUsername, "alice").await?;
    fill(&mut controller, FormField::LoginPassword, "wrong").await?;
    controller.handle(gesture(Gesture::SubmitLogin())).await?;

    mock.assert();
    assert_eq!(
        message(&controller),
        Some(("Invalid credentials".to_string(), MessageKind::Error))
    );
    assert!(!controller.state().is_authenticated());
    assert_eq!(controller.sessions().load(), None);
    return Ok(());
}

#[tokio::test]
async fn it_toasts_when_movies_fail_to_load() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server.mock("GET", "/movies").with_status(500).create();

    let (mut controller, _rx) = new_controller(&server.url());
    controller.state.sign_in(Session::new("alice", "tok1"));
    controller.load_movies().await;

    mock.assert();
    assert_eq!(
        toast_text(&controller),
        Some("Failed to load movies".to_string())
    );
    assert!(!controller.page().is_loading());

    let (mut controller, _rx) = new_controller("http://127.0.0.1:1");
    controller.state.sign_in(Session::new("alice", "tok1"));
    controller.load_movies().await;

    assert_eq!(
        toast_text(&controller),
        Some("Network error loading movies".to_string())
    );
    return Ok(());
}

#[tokio::test]
async fn it_flips_only_the_liked_card() -> Result<()> {
    let mut server = mockito::Server::new();
    let liked_mock = server
        .mock("POST", "/like")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("user_name".to_string(), "alice".to_string()),
            Matcher::UrlEncoded("movie_id".to_string(), "42".to_string()),
        ]))
        .match_header("authorization", "Bearer tok1")
        .with_status(200)
        .with_body(r#"{"message": "Movie liked"}"#)
        .create();

    let (mut controller, _rx) = new_controller(&server.url());
    signed_in(&mut controller);
    let before = controller.page().grid().to_vec();

    controller.handle(gesture(Gesture::LikeClick(42))).await?;

    liked_mock.assert();
    assert!(controller.state().liked.contains(42));
    assert_eq!(controller.page().grid_renders(), 1);
    assert_eq!(toast_text(&controller), Some("Movie liked! ❤️".to_string()));
    assert!(!controller.page().is_loading());

    for (after, before) in controller.page().grid().iter().zip(before.iter()) {
        if after.movie_id == 42 {
            assert!(after.markup.contains(&view::like_button(42, true)));
            assert_ne!(after, before);
        } else {
            assert_eq!(after, before);
        }
    }

    return Ok(());
}

#[tokio::test]
async fn it_removes_unliked_movies() -> Result<()> {
    let mut server = mockito::Server::new();
    let unliked_mock = server
        .mock("POST", Matcher::Regex("^/like".to_string()))
        .with_status(200)
        .with_body(r#"{"message": "Movie unliked"}"#)
        .create();

    let (mut controller, _rx) = new_controller(&server.url());
    signed_in(&mut controller);
    controller.state.liked.insert(42);
    controller.render_grid();

    controller.handle(gesture(Gesture::LikeClick(42))).await?;

    unliked_mock.assert();
    assert!(!controller.state().liked.contains(42));
    assert!(controller.page().grid()[4]
        .markup
        .contains(&view::like_button(42, false)));
    assert_eq!(toast_text(&controller), Some("Movie unliked".to_string()));
    return Ok(());
}

#[tokio::test]
async fn it_keeps_liked_state_when_toggling_fails() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", Matcher::Regex("^/like".to_string()))
        .with_status(404)
        .with_body(r#"{"detail": "Movie not found"}"#)
        .create();

    let (mut controller, _rx) = new_controller(&server.url());
    signed_in(&mut controller);
    let before = controller.page().grid().to_vec();

    controller.handle(gesture(Gesture::LikeClick(42))).await?;

    mock.assert();
    assert!(controller.state().liked.is_empty());
    assert_eq!(controller.page().grid(), before.as_slice());
    assert_eq!(
        toast_text(&controller),
        Some("Failed to update like status".to_string())
    );
    assert!(!controller.page().is_loading());
    return Ok(());
}

#[tokio::test]
async fn it_renders_the_empty_state_without_requests() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", Matcher::Regex("^/recommendations/".to_string()))
        .expect(0)
        .create();

    let (mut controller, _rx) = new_controller(&server.url());
    signed_in(&mut controller);
    controller
        .handle(gesture(Gesture::NavClick(PageName::Recommendations)))
        .await?;

    mock.assert();
    assert_eq!(controller.page().current_page(), PageName::Recommendations);
    assert_eq!(
        controller.page().recommendations(),
        view::recommendations_empty_state()
    );
    return Ok(());
}

#[tokio::test]
async fn it_renders_sections_in_liked_order() -> Result<()> {
    let mut server = mockito::Server::new();
    let first_mock = server
        .mock("GET", "/recommendations/42")
        .with_status(200)
        .with_body(r#"[{"movie_id": 4, "movie_name": "The Dark Knight", "genre": "Action", "ratings": 9.0, "like_count": 2}]"#)
        .create();
    let missing_mock = server
        .mock("GET", "/recommendations/99")
        .expect(0)
        .create();
    let rejected_mock = server
        .mock("GET", "/recommendations/2")
        .with_status(404)
        .with_body(r#"{"detail": "Movie not found"}"#)
        .create();
    let last_mock = server
        .mock("GET", "/recommendations/1")
        .with_status(200)
        .with_body(recommendations_fixture())
        .create();

    let (mut controller, _rx) = new_controller(&server.url());
    signed_in(&mut controller);
    controller.state.liked.insert(42);
    controller.state.liked.insert(99);
    controller.state.liked.insert(2);
    controller.state.liked.insert(1);

    controller
        .handle(gesture(Gesture::NavClick(PageName::Recommendations)))
        .await?;

    first_mock.assert();
    missing_mock.assert();
    rejected_mock.assert();
    last_mock.assert();

    let html = controller.page().recommendations();
    let first = html.find("Godzilla Minus One").unwrap();
    let last = html.find("The Godfather").unwrap();
    assert!(first < last);
    assert!(!html.contains("Spirited Away"));
    assert!(html.contains("Goodfellas"));
    assert!(html.contains(r#"<span class="like-count">👍 4</span>"#));
    assert_eq!(toast_text(&controller), None);
    assert!(!controller.page().is_loading());
    return Ok(());
}

#[tokio::test]
async fn it_aborts_recommendations_on_network_errors() -> Result<()> {
    let (mut controller, _rx) = new_controller("http://127.0.0.1:1");
    signed_in(&mut controller);
    controller.state.liked.insert(1);
    controller.state.liked.insert(42);

    controller
        .handle(gesture(Gesture::NavClick(PageName::Recommendations)))
        .await?;

    assert_eq!(controller.page().recommendations(), "");
    assert_eq!(
        toast_text(&controller),
        Some("Failed to load recommendations".to_string())
    );
    assert!(!controller.page().is_loading());
    return Ok(());
}

#[tokio::test]
async fn it_only_loads_recommendations_on_that_page() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", Matcher::Regex("^/recommendations/".to_string()))
        .expect(0)
        .create();

    let (mut controller, _rx) = new_controller(&server.url());
    signed_in(&mut controller);
    controller.state.liked.insert(1);
    controller
        .handle(gesture(Gesture::NavClick(PageName::AllMovies)))
        .await?;

    mock.assert();
    assert_eq!(controller.page().current_page(), PageName::AllMovies);
    return Ok(());
}

#[tokio::test]
async fn it_filters_the_grid() -> Result<()> {
    let (mut controller, _rx) = new_controller("http://127.0.0.1:1");
    signed_in(&mut controller);

    controller
        .handle(gesture(Gesture::GenreChange("Crime".to_string())))
        .await?;
    let ids = controller
        .page()
        .grid()
        .iter()
        .map(|card| return card.movie_id)
        .collect::<Vec<i64>>();
    assert_eq!(ids, vec![1, 3]);
    assert!(controller
        .page()
        .genre_options()
        .contains(r#"<option value="Crime" selected>Crime</option>"#));
    assert!(controller
        .page()
        .genre_options()
        .contains(r#"<option value="">All Genres</option>"#));

    controller
        .handle(gesture(Gesture::SearchInput("GOD".to_string())))
        .await?;
    let ids = controller
        .page()
        .grid()
        .iter()
        .map(|card| return card.movie_id)
        .collect::<Vec<i64>>();
    assert_eq!(ids, vec![1]);
    assert_eq!(controller.page().search_value(), "GOD");
    assert!(controller
        .page()
        .to_html()
        .contains(r#"<input id="search-input" type="text" value="GOD">"#));
    assert_eq!(controller.state().movies.len(), 5);
    return Ok(());
}

#[tokio::test]
async fn it_toggles_and_persists_the_theme() -> Result<()> {
    let (mut controller, _rx) = new_controller("http://127.0.0.1:1");
    signed_in(&mut controller);

    controller.handle(gesture(Gesture::ThemeToggle())).await?;
    assert_eq!(controller.page().theme(), Theme::Light);
    assert_eq!(controller.sessions().load_theme(), Theme::Light);

    controller.handle(gesture(Gesture::ThemeToggle())).await?;
    assert_eq!(controller.page().theme(), Theme::Dark);
    assert_eq!(controller.sessions().load_theme(), Theme::Dark);
    return Ok(());
}

#[tokio::test]
async fn it_logs_out_and_stays_logged_out_after_restart() -> Result<()> {
    let mut server = mockito::Server::new();
    server.mock("GET", "/").with_status(200).create();
    let movies_mock = server
        .mock("GET", "/movies")
        .with_status(200)
        .with_body(movies_fixture())
        .create();

    let tmp_dir = TempDir::new("marquee-controller")?;
    let store_path = tmp_dir.path().join("storage.json");

    let mut sessions = SessionStore::new(Box::new(FileStorage::open(store_path.clone())?));
    sessions.save(&Session::new("alice", "tok1"))?;

    let storage = FileStorage::open(store_path.clone())?;
    let (mut controller, _rx) = new_controller_with_storage(&server.url(), Box::new(storage));
    controller.start().await?;

    movies_mock.assert();
    assert!(controller.page().is_main_app());
    assert_eq!(controller.page().username(), "alice");

    controller.state.liked.insert(42);
    controller.page.set_field(FormField::LoginUsername, "alice");
    controller.page.set_field(FormField::LoginPassword, "pw123");
    controller.handle(gesture(Gesture::LogoutClick())).await?;

    assert!(controller.page().is_auth_view());
    assert!(!controller.state().is_authenticated());
    assert!(controller.state().liked.is_empty());
    assert_eq!(controller.page().username(), "");
    assert_eq!(controller.page().field(FormField::LoginUsername), "");
    assert_eq!(controller.page().field(FormField::LoginPassword), "");
    assert_eq!(
        toast_text(&controller),
        Some("Logged out successfully".to_string())
    );
    assert_eq!(controller.sessions().load(), None);

    let storage = FileStorage::open(store_path)?;
    let (mut restarted, _rx) = new_controller_with_storage(&server.url(), Box::new(storage));
    restarted.start().await?;

    assert!(restarted.page().is_auth_view());
    assert!(!restarted.state().is_authenticated());
    return Ok(());
}

#[tokio::test]
async fn it_ignores_gestures_outside_their_mode() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", Matcher::Regex("^/like".to_string()))
        .expect(0)
        .create();

    let (mut controller, _rx) = new_controller(&server.url());
    controller.handle(gesture(Gesture::LikeClick(42))).await?;
    mock.assert();

    signed_in(&mut controller);
    controller
        .handle(gesture(Gesture::AuthTabClick(AuthTab::Register)))
        .await?;
    assert_eq!(controller.state().view.auth_tab, AuthTab::Login);
    return Ok(());
}

#[tokio::test]
async fn it_hides_toasts_when_they_expire() -> Result<()> {
    let (mut controller, _rx) = new_controller("http://127.0.0.1:1");
    controller.toast("first");
    let first = controller.page().toast().unwrap().id;
    controller.toast("second");

    controller.handle(Event::ToastExpired(first)).await?;
    assert_eq!(toast_text(&controller), Some("second".to_string()));

    let second = controller.page().toast().unwrap().id;
    controller.handle(Event::ToastExpired(second)).await?;
    assert_eq!(toast_text(&controller), None);
    return Ok(());
}

#[tokio::test]
async fn it_stays_logged_out_when_the_session_cannot_be_saved() -> Result<()> {
    let mut server = mockito::Server::new();
    let login_mock = server
        .mock("POST", "/login")
        .with_status(200)
        .with_body(r#"{"access_token": "tok1", "token_type": "bearer"}"#)
        .expect(2)
        .create();
    let movies_mock = server.mock("GET", "/movies").expect(0).create();

    let mut storage = MemoryStorage::default();
    storage.fail_on(&[StorageKey::Username, StorageKey::AccessToken]);
    let (mut controller, _rx) = new_controller_with_storage(&server.url(), Box::new(storage));
    controller.page.show_auth_view();
    fill(&mut controller, FormField::LoginUsername, "alice").await?;
    fill(&mut controller, FormField::LoginPassword, "pw123").await?;

    let res = controller.handle(gesture(Gesture::SubmitLogin())).await;
    assert!(res.is_err());
    assert!(!controller.state().is_authenticated());
    assert!(controller.page().is_auth_view());
    assert_eq!(
        message(&controller),
        Some((
            "Could not save your session. Please try again.".to_string(),
            MessageKind::Error
        ))
    );

    let res = controller.handle(gesture(Gesture::SubmitLogin())).await;
    assert!(res.is_err());

    login_mock.assert();
    movies_mock.assert();
    return Ok(());
}

#[tokio::test]
async fn it_drops_the_token_when_logout_cannot_remove_the_username() -> Result<()> {
    let mut storage = MemoryStorage::default();
    storage.set(StorageKey::Username, "alice")?;
    storage.set(StorageKey::AccessToken, "tok1")?;
    storage.fail_on(&[StorageKey::Username]);

    let (mut controller, _rx) =
        new_controller_with_storage("http://127.0.0.1:1", Box::new(storage));
    signed_in(&mut controller);

    let res = controller.handle(gesture(Gesture::LogoutClick())).await;

    assert!(res.is_err());
    assert!(!controller.state().is_authenticated());
    assert!(controller.page().is_auth_view());
    assert_eq!(controller.sessions().load(), None);
    return Ok(());
}

#[tokio::test]
async fn it_starts_logged_out_with_a_corrupt_store() -> Result<()> {
    let tmp_dir = TempDir::new("marquee-controller")?;
    let store_path = tmp_dir.path().join("storage.json");
    std::fs::write(&store_path, r#"{"username": "alice", "access_token": "tok"#)?;

    let storage = FileStorage::open(store_path)?;
    let (mut controller, _rx) = new_controller_with_storage("http://127.0.0.1:1", Box::new(storage));
    controller.start().await?;

    assert!(controller.page().is_auth_view());
    assert!(!controller.state().is_authenticated());
    return Ok(());
}
