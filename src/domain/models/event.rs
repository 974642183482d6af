use super::AuthTab;
use super::Gesture;

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Gesture(Gesture),
    /// Fired after registering so the success message stays visible for a
    /// moment before the login tab opens.
    AuthTabTimer(AuthTab),
    ToastExpired(u64),
    Help(),
    Quit(),
}
