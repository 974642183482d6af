use super::AuthTab;
use super::FormField;
use super::PageName;

/// A user interaction with the page. Each gesture reaches exactly one
/// handler, a like click never bubbles up to the card or page it sits in.
#[derive(Clone, Debug, PartialEq)]
pub enum Gesture {
    AuthTabClick(AuthTab),
    FieldInput(FormField, String),
    SubmitLogin(),
    SubmitRegister(),
    NavClick(PageName),
    SearchInput(String),
    GenreChange(String),
    LikeClick(i64),
    ThemeToggle(),
    LogoutClick(),
}
