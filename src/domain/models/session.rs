#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub token: String,
}

impl Session {
    pub fn new(username: &str, token: &str) -> Session {
        return Session {
            username: username.to_string(),
            token: token.to_string(),
        };
    }
}
