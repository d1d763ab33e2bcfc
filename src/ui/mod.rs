//! Server-rendered HTML.
//!
//! Every page is a full document built from the client's [`Shell`]. Buttons
//! are small POST forms; the server answers each with a redirect back to `/`.
//! While a time-driven effect is pending the page refreshes itself.

mod assistant;
mod auth;
mod booking;
mod inbox;
mod profile;
mod reels;
mod social;

use std::time::Instant;

use axum::http::StatusCode;

use crate::shell::{Shell, Tab, View};

/// Escape text for HTML element content and attribute values.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// A one-button POST form. `label` is raw HTML; field names and values are
/// escaped.
pub(crate) fn action_button(action: &str, fields: &[(&str, &str)], label: &str, class: &str) -> String {
    let hidden: String = fields
        .iter()
        .map(|(name, value)| {
            format!(
                r#"<input type="hidden" name="{}" value="{}">"#,
                escape(name),
                escape(value)
            )
        })
        .collect();
    format!(
        r#"<form method="post" action="{action}" class="inline">{hidden}<button type="submit" class="{class}">{label}</button></form>"#
    )
}

fn document(title: &str, theme: &str, refresh: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en" class="{theme}">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Vayama travel super-app">
    {refresh}
    <title>{title} - Vayama</title>
    <link rel="stylesheet" href="/static/app.css">
</head>
<body>
    <div id="app-shell">
{body}
    </div>
</body>
</html>"#
    )
}

fn bottom_nav(active: Tab) -> String {
    let items: String = Tab::ALL
        .into_iter()
        .map(|tab| {
            let class = if tab == active { "nav-item active" } else { "nav-item" };
            action_button(&format!("/tab/{}", tab.slug()), &[], tab.label(), class)
        })
        .collect();
    format!(r#"<nav class="bottom-nav">{items}</nav>"#)
}

fn toast(message: &str) -> String {
    format!(
        r#"<div class="toast" role="status"><span>{}</span>{}</div>"#,
        escape(message),
        action_button("/notification/dismiss", &[], "&times;", "toast-close")
    )
}

/// Render the whole page for `shell` at `now`.
#[must_use]
pub fn render_page(shell: &Shell, now: Instant) -> String {
    let refresh = shell
        .refresh_after(now)
        .map(|wait| {
            let secs = wait.as_millis().div_ceil(1000).max(1);
            format!(r#"<meta http-equiv="refresh" content="{secs}">"#)
        })
        .unwrap_or_default();

    let (title, main) = if shell.is_authenticated() {
        let tab = shell.tab();
        let content = match shell.view() {
            View::Assistant(screen) => assistant::render(screen),
            View::Booking(screen) => booking::render(screen),
            View::Social(screen) => social::render(screen, now),
            View::Reels(screen) => reels::render(screen),
            View::Inbox(screen) => inbox::render(screen),
            View::Profile(screen) => profile::render(screen, shell.theme(), shell.language()),
        };
        (
            tab.label(),
            format!(r#"<main id="app" class="screen-{}">{content}</main>{}"#, tab.slug(), bottom_nav(tab)),
        )
    } else {
        ("Welcome", format!(r#"<main id="app" class="screen-auth">{}</main>"#, auth::render(shell.auth())))
    };

    let notification = shell.notification(now).map(toast).unwrap_or_default();
    document(title, shell.theme().as_str(), &refresh, &format!("{main}{notification}"))
}

/// Standalone error page with a link back to the app.
#[must_use]
pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        r#"<main id="app" class="screen-error">
    <h1>{}</h1>
    <p>{}</p>
    <a href="/" class="btn primary">Back to Vayama</a>
</main>"#,
        status.as_u16(),
        escape(message)
    );
    document(status.canonical_reason().unwrap_or("Error"), "dark", "", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimingConfig;
    use crate::llm::scripted::ScriptedDriver;
    use crate::prefs::Theme;
    use crate::screens::auth::Credentials;

    fn shell() -> Shell {
        Shell::new(ScriptedDriver::new(vec![]), TimingConfig::default(), Theme::Light)
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">Tom & 'Jerry'</a>"#), "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;");
    }

    #[test]
    fn test_signed_out_page_shows_only_auth() {
        let html = render_page(&shell(), Instant::now());
        assert!(html.contains(r#"action="/auth/login""#));
        assert!(!html.contains("bottom-nav"));
        assert!(html.contains(r#"class="light""#));
    }

    #[test]
    fn test_page_shows_nav_toast_and_refresh() {
        let now = Instant::now();
        let mut shell = shell();
        shell
            .login(&Credentials {
                name: None,
                email: "a@b.c".to_string(),
                password: "pw".to_string(),
            })
            .unwrap();
        shell.notify("Share feature is a mock.", now);

        let html = render_page(&shell, now);
        assert!(html.contains("bottom-nav"));
        assert!(html.contains(r#"nav-item active">AI Plan"#));
        assert!(html.contains("Share feature is a mock."));
        assert!(html.contains(r#"http-equiv="refresh" content="4""#));
    }

    #[test]
    fn test_error_page_escapes_message() {
        let html = error_page(StatusCode::NOT_FOUND, "no post <1>");
        assert!(html.contains("404"));
        assert!(html.contains("no post &lt;1&gt;"));
    }
}
