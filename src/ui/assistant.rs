use crate::itinerary::ItineraryPlan;
use crate::screens::assistant::{AssistantScreen, ConversationTurn, Sender};

use super::{action_button, escape};

fn render_plan(turn_id: u64, plan: &ItineraryPlan) -> String {
    let turn = turn_id.to_string();
    plan.days()
        .iter()
        .enumerate()
        .map(|(day_idx, day)| {
            let day_field = day_idx.to_string();
            let activities: String = day
                .activities
                .iter()
                .enumerate()
                .map(|(act_idx, activity)| {
                    let book = activity
                        .booking_type
                        .map(|kind| {
                            let act_field = act_idx.to_string();
                            action_button(
                                "/assistant/book",
                                &[("turn_id", turn.as_str()), ("day", day_field.as_str()), ("activity", act_field.as_str())],
                                &format!("Book {kind}"),
                                "btn small",
                            )
                        })
                        .unwrap_or_default();
                    format!(
                        r#"<li class="activity">
    <span class="time">{}</span>
    <div class="details"><strong>{}</strong><span class="meta">{} &middot; {}</span></div>
    {book}
</li>"#,
                        escape(&activity.time),
                        escape(&activity.description),
                        escape(&activity.location),
                        escape(&activity.estimated_cost),
                    )
                })
                .collect();
            format!(
                r#"<section class="plan-day"><h3>Day {}: {}</h3><ul>{activities}</ul></section>"#,
                day.day,
                escape(&day.title)
            )
        })
        .collect()
}

fn render_turn(turn: &ConversationTurn) -> String {
    let class = match turn.sender {
        Sender::User => "bubble user",
        Sender::Assistant => "bubble assistant",
    };
    let plan = turn
        .itinerary
        .as_ref()
        .map(|plan| render_plan(turn.id, plan))
        .unwrap_or_default();
    format!(
        r#"<div class="{class}"><p>{}</p>{plan}</div>"#,
        escape(&turn.text)
    )
}

pub(super) fn render(screen: &AssistantScreen) -> String {
    let turns: String = screen.turns().iter().map(render_turn).collect();
    let (typing, disabled) = if screen.is_loading() {
        (r#"<div class="bubble assistant typing">Vayama is thinking&hellip;</div>"#, " disabled")
    } else {
        ("", "")
    };

    format!(
        r#"<header class="screen-header"><h1>Vayama AI Assistant</h1><span class="chip">{}</span></header>
<section class="chat-log">{turns}{typing}</section>
<form method="post" action="/assistant/send" class="composer">
    <textarea name="message" rows="1" placeholder="Plan a trip, e.g. a weekend in Bo"{disabled}></textarea>
    <button type="submit" class="btn primary"{disabled}>Send</button>
</form>"#,
        screen.language()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::scripted::ScriptedDriver;
    use crate::prefs::Language;
    use crate::screens::assistant::Greeting;

    const PLAN: &str = r#"[{"day":1,"title":"Bo & back","activities":[
        {"time":"09:00","description":"Ride to Bo","estimated_cost":"Le 50,000","location":"Freetown","booking_type":"Ride"},
        {"time":"18:00","description":"Sunset walk","estimated_cost":"Free","location":"Bo Park"}
    ]}]"#;

    #[tokio::test]
    async fn test_plan_renders_days_and_book_buttons() {
        let mut screen = AssistantScreen::mount(
            ScriptedDriver::new(vec![Ok(PLAN.to_string())]),
            Language::English,
            Greeting::Intro,
        );
        let pending = screen.begin_send("Plan me a weekend in Bo").unwrap();
        assert!(render(&screen).contains("disabled"));
        screen.apply(pending.run().await);

        let html = render(&screen);
        assert_eq!(html.matches(r#"class="plan-day""#).count(), 1);
        assert!(html.contains("Day 1: Bo &amp; back"));
        assert_eq!(html.matches("/assistant/book").count(), 1);
        assert!(html.contains("Book Ride"));
        assert!(!html.contains("disabled"));
    }
}
