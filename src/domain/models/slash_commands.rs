#[cfg(test)]
#[path = "slash_commands_test.rs"]
mod tests;

use super::AuthTab;
use super::Event;
use super::FormField;
use super::Gesture;
use super::PageName;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /login [USERNAME] [PASSWORD] - Logs in and loads the movie catalog.
- /register [USERNAME] [PASSWORD] - Creates an account, then switches to the login tab.
- /tab [login,register] - Switches between the login and register forms.
- /nav (/n) [all-movies,recommendations] - Switches pages. Opening recommendations reloads them.
- /search (/s) [TERM?] - Filters the movie grid by name. Omit TERM to clear.
- /genre (/g) [GENRE?] - Filters the movie grid by genre. Omit GENRE to show all genres.
- /like (/l) [MOVIE_ID] - Likes or unlikes a movie.
- /theme (/t) - Toggles between dark and light mode.
- /logout - Logs out and forgets the saved session.
- /quit /exit (/q) - Exit Marquee.
- /help (/h) - Provides this help menu.

PAGE:
The page is rewritten as HTML after every command. See `marquee --help` for its location.
        "#;

    return text.trim().to_string();
}

pub struct SlashCommand {
    command: String,
    pub args: Vec<String>,
    /// Everything after the command, exactly as typed.
    remainder: String,
}

impl SlashCommand {
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let text = text
            .trim_start()
            .trim_end_matches(|c: char| return c == '\r' || c == '\n');
        let (prefix, remainder) = text.split_once(' ').unwrap_or((text, ""));
        if prefix.is_empty() {
            return None;
        }

        let args = remainder
            .split_whitespace()
            .map(|e| return e.to_string())
            .collect::<Vec<String>>();

        let cmd = SlashCommand {
            command: prefix.to_string(),
            args,
            remainder: remainder.to_string(),
        };
        if cmd.is_quit()
            || cmd.is_help()
            || cmd.is_login()
            || cmd.is_register()
            || cmd.is_tab()
            || cmd.is_nav()
            || cmd.is_search()
            || cmd.is_genre()
            || cmd.is_like()
            || cmd.is_theme()
            || cmd.is_logout()
        {
            return Some(cmd);
        }

        return None;
    }

    pub fn is_quit(&self) -> bool {
        return ["/q", "/quit", "/exit"].contains(&self.command.as_str());
    }

    pub fn is_help(&self) -> bool {
        return ["/h", "/help"].contains(&self.command.as_str());
    }

    pub fn is_login(&self) -> bool {
        return ["/login"].contains(&self.command.as_str());
    }

    pub fn is_register(&self) -> bool {
        return ["/register"].contains(&self.command.as_str());
    }

    pub fn is_tab(&self) -> bool {
        return ["/tab"].contains(&self.command.as_str()) && self.args.len() == 1;
    }

    pub fn is_nav(&self) -> bool {
        return ["/n", "/nav"].contains(&self.command.as_str()) && self.args.len() == 1;
    }

    pub fn is_search(&self) -> bool {
        return ["/s", "/search"].contains(&self.command.as_str());
    }

    pub fn is_genre(&self) -> bool {
        return ["/g", "/genre"].contains(&self.command.as_str());
    }

    pub fn is_like(&self) -> bool {
        return ["/l", "/like"].contains(&self.command.as_str()) && self.args.len() == 1;
    }

    pub fn is_theme(&self) -> bool {
        return ["/t", "/theme"].contains(&self.command.as_str());
    }

    pub fn is_logout(&self) -> bool {
        return ["/logout"].contains(&self.command.as_str());
    }

    /// The typed text after the first `from` arguments, spacing untouched.
    fn rest(&self, from: usize) -> String {
        let mut remainder = self.remainder.as_str();
        for _ in 0..from {
            remainder = remainder
                .trim_start_matches(' ')
                .split_once(' ')
                .map(|(_, rest)| return rest)
                .unwrap_or("");
        }

        return remainder.to_string();
    }

    fn first(&self) -> String {
        return self.args.first().cloned().unwrap_or_default();
    }

    /// Events the command stands for, in the order they should be queued.
    /// Returns None when an argument can't be understood.
    pub fn events(&self) -> Option<Vec<Event>> {
        if self.is_quit() {
            return Some(vec![Event::Quit()]);
        }
        if self.is_help() {
            return Some(vec![Event::Help()]);
        }

        let gestures = if self.is_login() {
            vec![
                Gesture::AuthTabClick(AuthTab::Login),
                Gesture::FieldInput(FormField::LoginUsername, self.first()),
                Gesture::FieldInput(FormField::LoginPassword, self.rest(1)),
                Gesture::SubmitLogin(),
            ]
        } else if self.is_register() {
            vec![
                Gesture::AuthTabClick(AuthTab::Register),
                Gesture::FieldInput(FormField::RegisterUsername, self.first()),
                Gesture::FieldInput(FormField::RegisterPassword, self.rest(1)),
                Gesture::SubmitRegister(),
            ]
        } else if self.is_tab() {
            vec![Gesture::AuthTabClick(AuthTab::parse(&self.first())?)]
        } else if self.is_nav() {
            vec![Gesture::NavClick(PageName::parse(&self.first())?)]
        } else if self.is_search() {
            vec![Gesture::SearchInput(self.rest(0))]
        } else if self.is_genre() {
            vec![Gesture::GenreChange(self.rest(0).trim().to_string())]
        } else if self.is_like() {
            vec![Gesture::LikeClick(self.first().parse::<i64>().ok()?)]
        } else if self.is_theme() {
            vec![Gesture::ThemeToggle()]
        } else if self.is_logout() {
            vec![Gesture::LogoutClick()]
        } else {
            return None;
        };

        return Some(gestures.into_iter().map(Event::Gesture).collect());
    }
}
