use crate::fixtures::{Conversation, InboxMessage, Side};
use crate::screens::inbox::InboxScreen;

use super::{action_button, escape};

fn render_list(conversations: &[Conversation]) -> String {
    let items: String = conversations
        .iter()
        .map(|c| {
            let id = c.id.to_string();
            let online = if c.online { r#"<span class="dot online"></span>"# } else { "" };
            let unread = if c.unread > 0 {
                format!(r#"<span class="badge">{}</span>"#, c.unread)
            } else {
                String::new()
            };
            let label = format!(
                r#"<span class="name">{}{online}</span><span class="meta">{}</span><span class="time">{}</span>{unread}"#,
                escape(c.name),
                escape(c.last_message),
                escape(c.time)
            );
            format!(
                "<li>{}</li>",
                action_button("/inbox/open", &[("conversation_id", id.as_str())], &label, "conversation")
            )
        })
        .collect();
    format!(r#"<header class="screen-header"><h1>Messages</h1></header><ul class="conversations">{items}</ul>"#)
}

fn render_message(message: &InboxMessage) -> String {
    let (class, receipt) = match message.side {
        Side::Me if message.read => ("msg me", r#"<span class="receipt read">&#10003;&#10003;</span>"#),
        Side::Me => ("msg me", r#"<span class="receipt">&#10003;</span>"#),
        Side::Other => ("msg other", ""),
    };
    format!(
        r#"<div class="{class}"><p>{}</p><span class="time">{}</span>{receipt}</div>"#,
        escape(&message.text),
        escape(&message.time)
    )
}

fn render_thread(screen: &InboxScreen, conversation: &Conversation) -> String {
    let messages: String = screen.thread().iter().map(render_message).collect();
    let typing = if screen.is_typing() {
        r#"<div class="msg other typing">typing&hellip;</div>"#
    } else {
        ""
    };
    let status = if conversation.online { "Online" } else { "Offline" };
    format!(
        r#"<header class="screen-header thread-header">
    {}
    <div><h1>{}</h1><span class="meta">{status}</span></div>
    <div class="actions">{}{}</div>
</header>
<section class="thread">{messages}{typing}</section>
<div class="thread-tools">
    <form method="post" action="/inbox/attach" enctype="multipart/form-data" class="inline">
        <input type="file" name="file" required>
        <button type="submit" class="btn small">Attach</button>
    </form>
    {}{}
</div>
<form method="post" action="/inbox/send" class="composer">
    <input type="text" name="message" placeholder="Type a message" autocomplete="off">
    <button type="submit" class="btn primary">Send</button>
</form>"#,
        action_button("/inbox/close", &[], "&larr;", "icon"),
        escape(conversation.name),
        action_button("/inbox/call", &[("kind", "audio")], "Call", "icon"),
        action_button("/inbox/call", &[("kind", "video")], "Video", "icon"),
        action_button("/inbox/voice", &[], "Voice note", "btn small"),
        action_button("/inbox/video", &[], "Send video", "btn small"),
    )
}

pub(super) fn render(screen: &InboxScreen) -> String {
    match screen.selected() {
        Some(conversation) => render_thread(screen, conversation),
        None => render_list(screen.conversations()),
    }
}
