mod app_state;
mod controller;
mod events;
mod session_store;
pub mod view;

pub use app_state::*;
pub use controller::*;
pub use events::*;
pub use session_store::*;
