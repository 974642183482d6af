#[cfg(test)]
#[path = "session_store_test.rs"]
mod tests;

use anyhow::Result;

use crate::domain::models::Session;
use crate::domain::models::StorageBox;
use crate::domain::models::StorageKey;
use crate::domain::models::Theme;

pub struct SessionStore {
    storage: StorageBox,
}

impl SessionStore {
    pub fn new(storage: StorageBox) -> SessionStore {
        return SessionStore { storage };
    }

    /// A session is only restored when both the username and the token were
    /// saved. The token is not checked against the service here.
    pub fn load(&self) -> Option<Session> {
        let username = self.storage.get(StorageKey::Username).unwrap_or_default();
        let token = self.storage.get(StorageKey::AccessToken).unwrap_or_default();
        if username.is_empty() || token.is_empty() {
            return None;
        }

        return Some(Session { username, token });
    }

    pub fn save(&mut self, session: &Session) -> Result<()> {
        self.storage.set(StorageKey::Username, &session.username)?;
        self.storage.set(StorageKey::AccessToken, &session.token)?;

        return Ok(());
    }

    /// Attempts both removals even when the first one fails, so a leftover
    /// username never keeps the token alive.
    pub fn clear(&mut self) -> Result<()> {
        let username_res = self.storage.remove(StorageKey::Username);
        let token_res = self.storage.remove(StorageKey::AccessToken);
        username_res?;
        token_res?;

        return Ok(());
    }

    pub fn load_theme(&self) -> Theme {
        return Theme::parse(&self.storage.get(StorageKey::Theme).unwrap_or_default());
    }

    pub fn save_theme(&mut self, theme: Theme) -> Result<()> {
        return self.storage.set(StorageKey::Theme, &theme.to_string());
    }
}
