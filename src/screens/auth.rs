//! Mock sign-in / sign-up screen.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    SignUp,
}

/// Submitted auth form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("{0} is required")]
    MissingField(&'static str),
}

#[derive(Debug, Clone, Default)]
pub struct AuthScreen {
    mode: AuthMode,
}

impl AuthScreen {
    #[must_use]
    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::Login,
        };
    }

    /// Validate a submission. Any complete form is accepted.
    pub fn submit(&self, credentials: &Credentials) -> Result<(), AuthError> {
        if self.mode == AuthMode::SignUp
            && credentials.name.as_deref().is_none_or(|n| n.trim().is_empty())
        {
            return Err(AuthError::MissingField("name"));
        }
        if credentials.email.trim().is_empty() {
            return Err(AuthError::MissingField("email"));
        }
        if credentials.password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(name: Option<&str>, email: &str, password: &str) -> Credentials {
        Credentials {
            name: name.map(str::to_string),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_login_needs_email_and_password() {
        let screen = AuthScreen::default();
        assert_eq!(screen.submit(&creds(None, "a@b.c", "pw")), Ok(()));
        assert_eq!(
            screen.submit(&creds(None, " ", "pw")),
            Err(AuthError::MissingField("email"))
        );
        assert_eq!(
            screen.submit(&creds(None, "a@b.c", "")),
            Err(AuthError::MissingField("password"))
        );
    }

    #[test]
    fn test_sign_up_also_needs_name() {
        let mut screen = AuthScreen::default();
        screen.toggle_mode();
        assert_eq!(screen.mode(), AuthMode::SignUp);
        assert_eq!(
            screen.submit(&creds(None, "a@b.c", "pw")),
            Err(AuthError::MissingField("name"))
        );
        assert_eq!(screen.submit(&creds(Some("Alex Doe"), "a@b.c", "pw")), Ok(()));
    }
}
