use crate::itinerary::BookingType;
use crate::screens::booking::{BookingForm, BookingScreen, BookingStep, PaymentMethod, TAB_CATEGORIES};

use super::{action_button, escape};

/// Form-field name, label, input type and current value.
type Field<'a> = (&'static str, &'static str, &'static str, &'a str);

fn fields(category: BookingType, form: &BookingForm) -> Vec<Field<'_>> {
    match category {
        BookingType::Ride => vec![
            ("from", "Pickup location", "text", form.from.as_str()),
            ("to", "Destination", "text", form.to.as_str()),
        ],
        BookingType::Flight => vec![
            ("from", "From", "text", form.from.as_str()),
            ("to", "To", "text", form.to.as_str()),
            ("checkin", "Departure date", "date", form.checkin.as_str()),
        ],
        BookingType::Hotel => vec![
            ("location", "City or hotel", "text", form.location.as_str()),
            ("checkin", "Check-in", "date", form.checkin.as_str()),
            ("checkout", "Check-out", "date", form.checkout.as_str()),
        ],
        BookingType::Food => vec![
            ("cuisine", "Restaurant or cuisine", "text", form.cuisine.as_str()),
            ("delivery_location", "Delivery location", "text", form.delivery_location.as_str()),
        ],
        BookingType::Activity => vec![("location", "Where", "text", form.location.as_str())],
    }
}

fn render_form(screen: &BookingScreen) -> String {
    let inputs: String = fields(screen.category(), screen.form())
        .into_iter()
        .map(|(name, label, kind, value)| {
            format!(
                r#"<label>{label}<input type="{kind}" name="{name}" value="{}"></label>"#,
                escape(value)
            )
        })
        .collect();
    format!(
        r#"<form method="post" action="/booking/search" class="stack card">
    {inputs}
    <button type="submit" class="btn primary">Search {}</button>
</form>"#,
        screen.category()
    )
}

fn render_results(screen: &BookingScreen) -> String {
    let items: String = screen
        .results()
        .iter()
        .map(|option| {
            let id = option.id.to_string();
            format!(
                r#"<li class="result card"><div><strong>{}</strong><span class="meta">{}</span></div><span class="price">{}</span>{}</li>"#,
                escape(option.name),
                escape(option.detail),
                escape(option.price),
                action_button(
                    "/booking/select",
                    &[("option_id", id.as_str())],
                    "Select",
                    "btn small"
                )
            )
        })
        .collect();
    format!(
        r#"{}<ul class="results">{items}</ul>"#,
        action_button("/booking/back", &[], "&larr; Back", "link")
    )
}

fn render_payment(screen: &BookingScreen) -> String {
    let chosen = screen.payment_method();
    let methods: String = PaymentMethod::ALL
        .into_iter()
        .map(|method| {
            let class = if method == chosen { "pay-method selected" } else { "pay-method" };
            action_button("/booking/payment-method", &[("method", method.label())], method.label(), class)
        })
        .collect();
    let summary = screen
        .selected()
        .map(|option| {
            format!(
                r#"<div class="card summary"><strong>{}</strong><span class="price">{}</span></div>"#,
                escape(option.name),
                escape(option.price)
            )
        })
        .unwrap_or_default();
    let price = screen.selected().map(|o| o.price).unwrap_or_default();
    format!(
        r#"{}{summary}<h3>Payment method</h3><div class="pay-methods">{methods}</div>{}"#,
        action_button("/booking/back", &[], "&larr; Back", "link"),
        action_button("/booking/pay", &[], &format!("Pay {}", escape(price)), "btn primary wide")
    )
}

pub(super) fn render(screen: &BookingScreen) -> String {
    let tabs: String = TAB_CATEGORIES
        .into_iter()
        .map(|category| {
            let class = if category == screen.category() { "seg active" } else { "seg" };
            action_button("/booking/category", &[("category", category.as_str())], category.as_str(), class)
        })
        .collect();
    let body = match screen.step() {
        BookingStep::Form => render_form(screen),
        BookingStep::Results => render_results(screen),
        BookingStep::Payment => render_payment(screen),
    };
    format!(
        r#"<header class="screen-header"><h1>Book</h1></header>
<div class="segmented">{tabs}</div>
{body}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::booking::BookingRequest;

    #[test]
    fn test_handoff_prefills_form() {
        let screen = BookingScreen::mount(Some(BookingRequest::for_activity(
            BookingType::Hotel,
            "Bo \"Town\"",
        )));
        let html = render(&screen);
        assert!(html.contains(r#"name="location" value="Bo &quot;Town&quot;""#));
        assert!(html.contains("Search Hotel"));
    }

    #[test]
    fn test_payment_step_lists_methods() {
        let mut screen = BookingScreen::mount(None);
        screen.search(&Default::default());
        assert!(render(&screen).contains("Standard Ride"));
        screen.select_option(1).unwrap();
        let html = render(&screen);
        assert_eq!(html.matches("pay-method").count(), 6);
        assert!(html.contains("pay-method selected\">Pay with Wallet"));
        assert!(html.contains("Pay Le 50,000"));
    }
}
