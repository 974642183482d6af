mod catalog;
mod event;
mod gesture;
mod liked;
mod movie;
mod page;
mod session;
mod slash_commands;
mod storage;

pub use catalog::*;
pub use event::*;
pub use gesture::*;
pub use liked::*;
pub use movie::*;
pub use page::*;
pub use session::*;
pub use slash_commands::*;
pub use storage::*;
