use crate::fixtures::BookingStatus;
use crate::prefs::{Language, Theme};
use crate::screens::profile::ProfileScreen;

use super::{action_button, escape};

fn render_top_up(screen: &ProfileScreen) -> String {
    let methods: String = screen
        .top_up_methods()
        .iter()
        .copied()
        .map(|m| action_button("/profile/topup", &[("method", m)], &escape(m), "btn wide"))
        .collect();
    format!(
        r#"<div class="modal" role="dialog"><div class="card">
    <h3>Top up wallet</h3>
    {methods}
    {}
</div></div>"#,
        action_button("/profile/topup/close", &[], "Cancel", "link")
    )
}

fn status_class(status: BookingStatus) -> &'static str {
    match status {
        BookingStatus::Confirmed => "status confirmed",
        BookingStatus::Completed => "status completed",
        BookingStatus::Cancelled => "status cancelled",
    }
}

pub(super) fn render(screen: &ProfileScreen, theme: Theme, language: Language) -> String {
    let user = screen.user();
    let languages: String = Language::ALL
        .into_iter()
        .map(|l| {
            let selected = if l == language { " selected" } else { "" };
            format!(
                r#"<option value="{}"{selected}>{}</option>"#,
                l.display_name(),
                l.display_name()
            )
        })
        .collect();
    let bookings: String = screen
        .booking_history()
        .iter()
        .map(|b| {
            format!(
                r#"<li><div><strong>{}</strong><span class="meta">{} &middot; {}</span></div><span class="{}">{}</span></li>"#,
                escape(b.details),
                b.booking_type,
                escape(b.date),
                status_class(b.status),
                b.status.as_str()
            )
        })
        .collect();
    let payments: String = screen
        .payment_history()
        .iter()
        .map(|p| {
            format!(
                r#"<li><div><strong>{}</strong><span class="meta">{}</span></div><span class="amount{}">{}</span></li>"#,
                escape(p.item),
                escape(p.date),
                if p.is_credit() { " credit" } else { "" },
                escape(p.amount)
            )
        })
        .collect();
    let modal = if screen.is_top_up_open() {
        render_top_up(screen)
    } else {
        String::new()
    };
    let next_theme = match theme.toggled() {
        Theme::Light => "Switch to light mode",
        Theme::Dark => "Switch to dark mode",
    };

    format!(
        r#"<header class="screen-header"><h1>Profile</h1></header>
<section class="card user-card">
    <h2>{}</h2>
    <p class="meta">{}</p>
    <p class="meta">{}</p>
</section>
<section class="card wallet">
    <span>Wallet balance</span><strong>{}</strong>
    {}
</section>
<section class="card settings">
    <h3>Settings</h3>
    {}
    <form method="post" action="/profile/language" class="inline">
        <label>AI language<select name="language">{languages}</select></label>
        <button type="submit" class="btn small">Save</button>
    </form>
</section>
<section class="card"><h3>Booking history</h3><ul class="history">{bookings}</ul></section>
<section class="card"><h3>Payment history</h3><ul class="history">{payments}</ul></section>
<section class="card actions">{}{}</section>
{modal}"#,
        escape(user.name),
        escape(user.email),
        escape(user.country),
        escape(user.wallet_balance),
        action_button("/profile/topup/open", &[], "Top Up", "btn primary small"),
        action_button("/profile/theme", &[], next_theme, "btn small"),
        action_button("/profile/feedback", &[], "Send Feedback", "btn wide"),
        action_button("/auth/logout", &[], "Log Out", "btn danger wide"),
    )
}
