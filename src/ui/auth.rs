use crate::screens::auth::{AuthMode, AuthScreen};

use super::action_button;

pub(super) fn render(screen: &AuthScreen) -> String {
    let (heading, submit, toggle, name_field) = match screen.mode() {
        AuthMode::Login => (
            "Welcome back",
            "Log In",
            "Don't have an account? Sign Up",
            "",
        ),
        AuthMode::SignUp => (
            "Create your account",
            "Sign Up",
            "Already have an account? Log In",
            r#"<label>Full name<input type="text" name="name" autocomplete="name" required></label>"#,
        ),
    };

    format!(
        r#"<section class="auth card">
    <h1 class="brand">Vayama</h1>
    <h2>{heading}</h2>
    <form method="post" action="/auth/login" class="stack">
        {name_field}
        <label>Email<input type="email" name="email" autocomplete="email" required></label>
        <label>Password<input type="password" name="password" autocomplete="current-password" required></label>
        <button type="submit" class="btn primary">{submit}</button>
    </form>
    {}
</section>"#,
        action_button("/auth/mode", &[], toggle, "link")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_up_asks_for_name() {
        let mut screen = AuthScreen::default();
        assert!(!render(&screen).contains(r#"name="name""#));
        screen.toggle_mode();
        let html = render(&screen);
        assert!(html.contains(r#"name="name""#));
        assert!(html.contains("Already have an account? Log In"));
    }
}
